use lottery_core::ParticipantState;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tracing::info;

use super::{nonce_from_db, nonce_to_db, AuditLog, AuditRecord, NonceStore, StateRow, StateStore, StorageError};

/// Embedded single-file engine. Schema lives in `migrations/sqlite`.
#[derive(Clone)]
pub struct SqliteStore {
    db: SqlitePool,
}

impl SqliteStore {
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StorageError> {
        // every connection to :memory: is a separate database
        let max_connections = if url.contains(":memory:") { 1 } else { max_connections };
        let db = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;
        sqlx::migrate!("./migrations/sqlite").run(&db).await?;
        info!(url, "sqlite store ready");
        Ok(Self { db })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.db
    }

    pub async fn close(&self) {
        self.db.close().await;
    }
}

impl StateStore for SqliteStore {
    async fn get(&self, participant_id: &str) -> Result<ParticipantState, StorageError> {
        let row = sqlx::query_as::<_, StateRow>(
            "SELECT attempt_count, last_attempt_time, in_pity FROM participant_state WHERE participant_id = ?",
        )
        .bind(participant_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(ParticipantState::from).unwrap_or_default())
    }

    async fn apply_draw_result(
        &self,
        participant_id: &str,
        state: &ParticipantState,
    ) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO participant_state (participant_id, attempt_count, last_attempt_time, in_pity) VALUES (?, ?, ?, ?) \
             ON CONFLICT(participant_id) DO UPDATE SET \
             attempt_count = excluded.attempt_count, \
             last_attempt_time = excluded.last_attempt_time, \
             in_pity = excluded.in_pity",
        )
        .bind(participant_id)
        .bind(state.attempt_count as i64)
        .bind(state.last_attempt_ms)
        .bind(state.in_pity)
        .execute(&self.db)
        .await?;
        Ok(())
    }
}

impl AuditLog for SqliteStore {
    async fn append(&self, record: &AuditRecord) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO audit_log (participant_name, outcome_description, timestamp) VALUES (?, ?, ?)",
        )
        .bind(&record.participant_name)
        .bind(&record.outcome_description)
        .bind(record.timestamp.to_rfc3339())
        .execute(&self.db)
        .await?;
        Ok(())
    }
}

impl NonceStore for SqliteStore {
    async fn load_nonce(&self) -> Result<u64, StorageError> {
        let nonce: Option<i64> = sqlx::query_scalar("SELECT nonce FROM rng_state WHERE id = 1")
            .fetch_optional(&self.db)
            .await?;
        Ok(nonce.map(nonce_from_db).unwrap_or(0))
    }

    async fn save_nonce(&self, next: u64) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO rng_state (id, nonce) VALUES (1, ?) \
             ON CONFLICT(id) DO UPDATE SET nonce = MAX(nonce, excluded.nonce)",
        )
        .bind(nonce_to_db(next))
        .execute(&self.db)
        .await?;
        Ok(())
    }
}
