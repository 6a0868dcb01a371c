use lottery_core::ParticipantState;
use sqlx::{mysql::MySqlPoolOptions, MySqlPool};
use tracing::info;

use super::{nonce_from_db, nonce_to_db, AuditLog, AuditRecord, NonceStore, StateRow, StateStore, StorageError};

/// Networked relational engine. Schema lives in `migrations/mysql`.
#[derive(Clone)]
pub struct MySqlStore {
    db: MySqlPool,
}

impl MySqlStore {
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StorageError> {
        let db = MySqlPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;
        sqlx::migrate!("./migrations/mysql").run(&db).await?;
        info!("mysql store ready");
        Ok(Self { db })
    }

    pub async fn close(&self) {
        self.db.close().await;
    }
}

impl StateStore for MySqlStore {
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
             ON DUPLICATE KEY UPDATE \
             attempt_count = VALUES(attempt_count), \
             last_attempt_time = VALUES(last_attempt_time), \
             in_pity = VALUES(in_pity)",
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

impl AuditLog for MySqlStore {
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

impl NonceStore for MySqlStore {
    async fn load_nonce(&self) -> Result<u64, StorageError> {
        let nonce: Option<i64> = sqlx::query_scalar("SELECT nonce FROM rng_state WHERE id = 1")
            .fetch_optional(&self.db)
            .await?;
        Ok(nonce.map(nonce_from_db).unwrap_or(0))
    }

    async fn save_nonce(&self, next: u64) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO rng_state (id, nonce) VALUES (1, ?) \
             ON DUPLICATE KEY UPDATE nonce = GREATEST(nonce, VALUES(nonce))",
        )
        .bind(nonce_to_db(next))
        .execute(&self.db)
        .await?;
        Ok(())
    }
}
