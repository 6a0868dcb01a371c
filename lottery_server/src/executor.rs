use lottery_core::{Participant, RewardExecutor};
use tracing::info;

/// Records reward actions for the host. The host receives the same list in
/// the draw response and applies it; this side only leaves a trace.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingExecutor;

impl RewardExecutor for TracingExecutor {
    fn execute(&self, participant: &Participant, actions: &[String]) {
        for action in actions {
            info!(participant = %participant.id, action = %action, "reward action dispatched");
        }
    }
}
