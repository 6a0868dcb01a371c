use lottery_core::ParticipantState;
use std::collections::HashMap;
use tokio::sync::Mutex;

use super::{AuditLog, AuditRecord, NonceStore, StateStore, StorageError};

/// Process-local engine for tests and throwaway deployments.
#[derive(Default)]
pub struct MemoryStore {
    states: Mutex<HashMap<String, ParticipantState>>,
    audit: Mutex<Vec<AuditRecord>>,
    nonce: Mutex<u64>,
}

impl MemoryStore {
    pub async fn audit_records(&self) -> Vec<AuditRecord> {
        self.audit.lock().await.clone()
    }
}

impl StateStore for MemoryStore {
    async fn get(&self, participant_id: &str) -> Result<ParticipantState, StorageError> {
        Ok(self
            .states
            .lock()
            .await
            .get(participant_id)
            .copied()
            .unwrap_or_default())
    }

    async fn apply_draw_result(
        &self,
        participant_id: &str,
        state: &ParticipantState,
    ) -> Result<(), StorageError> {
        self.states
            .lock()
            .await
            .insert(participant_id.to_string(), *state);
        Ok(())
    }
}

impl AuditLog for MemoryStore {
    async fn append(&self, record: &AuditRecord) -> Result<(), StorageError> {
        self.audit.lock().await.push(record.clone());
        Ok(())
    }
}

impl NonceStore for MemoryStore {
    async fn load_nonce(&self) -> Result<u64, StorageError> {
        Ok(*self.nonce.lock().await)
    }

    async fn save_nonce(&self, next: u64) -> Result<(), StorageError> {
        let mut nonce = self.nonce.lock().await;
        *nonce = (*nonce).max(next);
        Ok(())
    }
}
