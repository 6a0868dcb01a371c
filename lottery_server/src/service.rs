use chrono::{DateTime, Utc};
use lottery_core::{
    expand_placeholders, reward_preview, DenyReason, DrawEngine, DrawOutcome, Eligibility,
    EligibilityGate, Participant, ParticipantState, PityTracker, PrizeTables, RandomSource,
    RewardExecutor, TierResolver,
};
use lottery_shared::{display_timestamp, DrawResponse};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::{error, info, warn};

use crate::store::{AuditLog, AuditRecord, NonceStore, StateStore, StorageError};

/// Everything the draw path needs from configuration.
#[derive(Debug, Clone)]
pub struct DrawRules {
    pub gate: EligibilityGate,
    pub engine: DrawEngine,
    pub tracker: PityTracker,
    pub tables: PrizeTables,
}

/// Lock table keyed by participant id. Different participants never block
/// each other.
#[derive(Default)]
struct ParticipantLocks {
    inner: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl ParticipantLocks {
    const PRUNE_AT: usize = 1024;

    async fn acquire(&self, participant_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            if map.len() >= Self::PRUNE_AT {
                // only the map holds these, nobody is waiting on them
                map.retain(|_, l| Arc::strong_count(l) > 1);
            }
            map.entry(participant_id.to_string())
                .or_default()
                .clone()
        };
        lock.lock_owned().await
    }
}

pub struct LotteryService<S> {
    store: S,
    rules: DrawRules,
    resolver: Arc<dyn TierResolver>,
    executor: Arc<dyn RewardExecutor>,
    rng: Mutex<Box<dyn RandomSource>>,
    locks: ParticipantLocks,
    storage_timeout: Duration,
}

impl<S: StateStore + AuditLog + NonceStore> LotteryService<S> {
    pub fn new(
        store: S,
        rules: DrawRules,
        resolver: Arc<dyn TierResolver>,
        executor: Arc<dyn RewardExecutor>,
        rng: Box<dyn RandomSource>,
        storage_timeout: Duration,
    ) -> Self {
        Self {
            store,
            rules,
            resolver,
            executor,
            rng: Mutex::new(rng),
            locks: ParticipantLocks::default(),
            storage_timeout,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    async fn bounded<T>(
        &self,
        fut: impl Future<Output = Result<T, StorageError>>,
    ) -> Result<T, StorageError> {
        tokio::time::timeout(self.storage_timeout, fut)
            .await
            .map_err(|_| StorageError::Timeout(self.storage_timeout))?
    }

    /// Current state. Read failures degrade to the zero state.
    pub async fn state(&self, participant_id: &str) -> ParticipantState {
        match self.bounded(self.store.get(participant_id)).await {
            Ok(state) => state,
            Err(e) => {
                error!(participant = participant_id, error = %e, "failed to read participant state, using default");
                ParticipantState::default()
            }
        }
    }

    pub async fn draw(&self, participant: &Participant) -> DrawResponse {
        self.draw_at(participant, Utc::now()).await
    }

    /// One full draw cycle for `participant` at instant `now`. The cycle is
    /// serialized per participant from the state read to the state write.
    pub async fn draw_at(&self, participant: &Participant, now: DateTime<Utc>) -> DrawResponse {
        let _guard = self.locks.acquire(&participant.id).await;
        let now_ms = now.timestamp_millis();

        let state = self.state(&participant.id).await;
        let tier = self.resolver.resolve(&participant.id);

        if let Eligibility::Denied {
            reason,
            retry_after_secs,
        } = self.rules.gate.check(&state, tier, now_ms)
        {
            info!(participant = %participant.id, %tier, %reason, "draw denied");
            return DrawResponse::Denied {
                reason: reason.to_string(),
                retry_after_secs,
            };
        }

        let forced = state.in_pity;
        let (outcome, nonce) = {
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            let before = rng.nonce();
            let outcome = self
                .rules
                .engine
                .draw(self.rules.tables.for_tier(tier), forced, rng.as_mut());
            // forced draws take no sample and leave the nonce where it was
            let used = before.filter(|_| rng.nonce() != before);
            (outcome, used)
        };
        let next = self.rules.tracker.record_attempt(state, forced, now_ms);
        let pity_triggered = PityTracker::triggered(&state, &next);

        if let Some(n) = nonce {
            if let Err(e) = self.bounded(self.store.save_nonce(n + 1)).await {
                error!(participant = %participant.id, nonce = n, error = %e, "failed to persist draw nonce, draw discarded");
                return unavailable();
            }
        }

        if let Err(e) = self
            .bounded(self.store.apply_draw_result(&participant.id, &next))
            .await
        {
            if matches!(e, StorageError::Timeout(_)) && self.landed(&participant.id, &next).await {
                warn!(participant = %participant.id, error = %e, "state write acknowledged late but committed");
            } else {
                error!(participant = %participant.id, error = %e, "failed to persist draw result, draw discarded");
                return unavailable();
            }
        }

        let actions = expand_placeholders(participant, outcome.reward_actions());
        let record = AuditRecord {
            participant_name: participant.name.clone(),
            outcome_description: describe(&outcome, &actions, nonce),
            timestamp: now,
        };
        if let Err(e) = self.bounded(self.store.append(&record)).await {
            warn!(participant = %participant.id, error = %e, "failed to append audit record");
        }

        info!(
            participant = %participant.id,
            %tier,
            forced,
            win = outcome.is_win(),
            attempts = next.attempt_count,
            pity_triggered,
            "draw resolved"
        );

        match outcome {
            DrawOutcome::Win(entry) => {
                self.executor.execute(participant, &actions);
                DrawResponse::Win {
                    preview: reward_preview(&actions),
                    reward_actions: actions,
                    weight: entry.weight,
                    forced,
                    timestamp: display_timestamp(now),
                    pity_triggered,
                    nonce,
                }
            }
            DrawOutcome::Lose => DrawResponse::Lose { pity_triggered, nonce },
        }
    }

    /// After a timed-out write, checks under the participant guard whether
    /// the write committed anyway.
    async fn landed(&self, participant_id: &str, next: &ParticipantState) -> bool {
        match self.bounded(self.store.get(participant_id)).await {
            Ok(stored) => stored == *next,
            Err(e) => {
                error!(participant = participant_id, error = %e, "could not confirm timed-out state write");
                false
            }
        }
    }
}

fn unavailable() -> DrawResponse {
    DrawResponse::Denied {
        reason: DenyReason::TemporarilyUnavailable.to_string(),
        retry_after_secs: None,
    }
}

fn describe(outcome: &DrawOutcome, actions: &[String], nonce: Option<u64>) -> String {
    let desc = match outcome {
        DrawOutcome::Win(_) => format!("[{}]", actions.join(", ")),
        DrawOutcome::Lose => "lose".to_string(),
    };
    match nonce {
        Some(n) => format!("{desc} (nonce {n})"),
        None => desc,
    }
}
