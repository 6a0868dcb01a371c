pub mod config;
pub mod executor;
pub mod routes;
pub mod service;
pub mod store;

pub use config::{ConfigError, LotteryConfig, StorageConfig, StorageKind};
pub use executor::TracingExecutor;
pub use routes::{router, AppState};
pub use service::{DrawRules, LotteryService};
pub use store::{
    AuditLog, AuditRecord, MemoryStore, MySqlStore, NonceStore, SqliteStore, StateStore, StorageError,
    Store,
};
