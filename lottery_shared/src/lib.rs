use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DrawRequest {
    pub participant_id: String,
    pub participant_name: String,
}

/// Result of one draw request as seen by the host.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "result", rename_all = "lowercase")]
pub enum DrawResponse {
    Denied {
        reason: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        retry_after_secs: Option<u64>,
    },
    Win {
        reward_actions: Vec<String>, // placeholders already expanded
        weight: f64,
        forced: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        preview: Option<String>,
        timestamp: String,
        pity_triggered: bool,
        /// Provably-fair nonce the sample was derived from. Absent for forced
        /// draws and for sources without a nonce.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        nonce: Option<u64>,
    },
    Lose {
        pity_triggered: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        nonce: Option<u64>,
    },
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ParticipantView {
    pub participant_id: String,
    pub attempt_count: u32,
    pub last_attempt_ms: i64,
    pub in_pity: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AuditLogEntry {
    pub id: i64,
    pub participant_name: String,
    pub outcome_description: String,
    pub timestamp: DateTime<Utc>,
}

/// Stored attempt counts are signed columns. Negative values read as 0 and
/// anything past `u32::MAX` saturates.
pub fn attempt_count_from_db(stored: i64) -> u32 {
    u32::try_from(stored.max(0)).unwrap_or(u32::MAX)
}

/// Formats an instant the way winning details and audit rows display it.
pub fn display_timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("invalid request: {0}")]
    Invalid(String),
    #[error("unauthorized")]
    Unauthorized,
    #[error("internal server error")]
    Internal,
}
