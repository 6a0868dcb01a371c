use chrono::{DateTime, Utc};
use lottery_core::ParticipantState;
use std::future::Future;
use std::time::Duration;

use crate::config::{StorageConfig, StorageKind};

pub mod memory;
pub mod mysql;
pub mod sqlite;

pub use memory::MemoryStore;
pub use mysql::MySqlStore;
pub use sqlite::SqliteStore;

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("storage call timed out after {0:?}")]
    Timeout(Duration),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// One audit row. Never read back by the draw path.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditRecord {
    pub participant_name: String,
    pub outcome_description: String,
    pub timestamp: DateTime<Utc>,
}

/// Durable per-participant state.
///
/// `apply_draw_result` writes all fields in one atomic upsert keyed by the
/// participant id; callers serialize the read-modify-write cycle themselves.
pub trait StateStore: Send + Sync {
    /// Stored state, or the zero state when the participant is unknown.
    fn get(
        &self,
        participant_id: &str,
    ) -> impl Future<Output = Result<ParticipantState, StorageError>> + Send;

    fn apply_draw_result(
        &self,
        participant_id: &str,
        state: &ParticipantState,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;
}

pub trait AuditLog: Send + Sync {
    fn append(&self, record: &AuditRecord) -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// Next provably-fair nonce, kept across restarts so a reboot never replays
/// a sequence. Saves never move the stored value backwards.
pub trait NonceStore: Send + Sync {
    /// 0 when nothing was saved yet.
    fn load_nonce(&self) -> impl Future<Output = Result<u64, StorageError>> + Send;

    fn save_nonce(&self, next: u64) -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// Backing engine selected at startup.
pub enum Store {
    Sqlite(SqliteStore),
    MySql(MySqlStore),
    Memory(MemoryStore),
}

impl Store {
    pub async fn open(cfg: &StorageConfig) -> Result<Self, StorageError> {
        let store = match cfg.kind {
            StorageKind::Sqlite => Store::Sqlite(SqliteStore::connect(&cfg.url, cfg.max_connections).await?),
            StorageKind::Mysql => Store::MySql(MySqlStore::connect(&cfg.url, cfg.max_connections).await?),
            StorageKind::Memory => Store::Memory(MemoryStore::default()),
        };
        Ok(store)
    }

    pub async fn close(&self) {
        match self {
            Store::Sqlite(s) => s.close().await,
            Store::MySql(s) => s.close().await,
            Store::Memory(_) => {}
        }
    }
}

impl StateStore for Store {
    async fn get(&self, participant_id: &str) -> Result<ParticipantState, StorageError> {
        match self {
            Store::Sqlite(s) => s.get(participant_id).await,
            Store::MySql(s) => s.get(participant_id).await,
            Store::Memory(s) => s.get(participant_id).await,
        }
    }

    async fn apply_draw_result(
        &self,
        participant_id: &str,
        state: &ParticipantState,
    ) -> Result<(), StorageError> {
        match self {
            Store::Sqlite(s) => s.apply_draw_result(participant_id, state).await,
            Store::MySql(s) => s.apply_draw_result(participant_id, state).await,
            Store::Memory(s) => s.apply_draw_result(participant_id, state).await,
        }
    }
}

impl AuditLog for Store {
    async fn append(&self, record: &AuditRecord) -> Result<(), StorageError> {
        match self {
            Store::Sqlite(s) => s.append(record).await,
            Store::MySql(s) => s.append(record).await,
            Store::Memory(s) => s.append(record).await,
        }
    }
}

impl NonceStore for Store {
    async fn load_nonce(&self) -> Result<u64, StorageError> {
        match self {
            Store::Sqlite(s) => s.load_nonce().await,
            Store::MySql(s) => s.load_nonce().await,
            Store::Memory(s) => s.load_nonce().await,
        }
    }

    async fn save_nonce(&self, next: u64) -> Result<(), StorageError> {
        match self {
            Store::Sqlite(s) => s.save_nonce(next).await,
            Store::MySql(s) => s.save_nonce(next).await,
            Store::Memory(s) => s.save_nonce(next).await,
        }
    }
}

// nonces live in signed BIGINT columns
fn nonce_to_db(nonce: u64) -> i64 {
    i64::try_from(nonce).unwrap_or(i64::MAX)
}

fn nonce_from_db(stored: i64) -> u64 {
    stored.max(0) as u64
}

#[derive(Debug, sqlx::FromRow)]
struct StateRow {
    attempt_count: i64,
    last_attempt_time: i64,
    in_pity: bool,
}

impl From<StateRow> for ParticipantState {
    fn from(row: StateRow) -> Self {
        ParticipantState {
            attempt_count: lottery_shared::attempt_count_from_db(row.attempt_count),
            last_attempt_ms: row.last_attempt_time,
            in_pity: row.in_pity,
        }
    }
}
