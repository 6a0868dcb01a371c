use axum::http::StatusCode;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use axum_extra::headers::{authorization::Bearer, Authorization};
use axum_extra::TypedHeader;
use lottery_core::Participant;
use lottery_shared::{ApiError, DrawRequest, DrawResponse, ParticipantView};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::service::LotteryService;
use crate::store::{AuditLog, NonceStore, StateStore};

pub struct AppState<S> {
    pub service: LotteryService<S>,
    pub api_key: String,
}

fn status_of(e: &ApiError) -> StatusCode {
    match e {
        ApiError::Invalid(_) => StatusCode::BAD_REQUEST,
        ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
        ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

async fn route_draw<S: StateStore + AuditLog + NonceStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    TypedHeader(Authorization(bearer)): TypedHeader<Authorization<Bearer>>,
    Json(req): Json<DrawRequest>,
) -> Result<Json<DrawResponse>, StatusCode> {
    if bearer.token() != state.api_key {
        return Err(status_of(&ApiError::Unauthorized));
    }
    if req.participant_id.trim().is_empty() {
        return Err(status_of(&ApiError::Invalid("participant_id".into())));
    }
    let participant = Participant::new(req.participant_id, req.participant_name);
    Ok(Json(state.service.draw(&participant).await))
}

async fn route_participant<S: StateStore + AuditLog + NonceStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    TypedHeader(Authorization(bearer)): TypedHeader<Authorization<Bearer>>,
    Path(participant_id): Path<String>,
) -> Result<Json<ParticipantView>, StatusCode> {
    if bearer.token() != state.api_key {
        return Err(status_of(&ApiError::Unauthorized));
    }
    let s = state.service.state(&participant_id).await;
    Ok(Json(ParticipantView {
        participant_id,
        attempt_count: s.attempt_count,
        last_attempt_ms: s.last_attempt_ms,
        in_pity: s.in_pity,
    }))
}

pub fn router<S: StateStore + AuditLog + NonceStore + 'static>(state: Arc<AppState<S>>) -> Router {
    Router::new()
        .route("/draw", post(route_draw::<S>))
        .route("/participants/:id", get(route_participant::<S>))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
