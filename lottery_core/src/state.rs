use serde::{Deserialize, Serialize};

/// Persistent per-participant draw state.
///
/// A participant that has never drawn is represented by `Default`:
/// zero attempts, timestamp 0 and no pending pity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantState {
    /// Attempts since the last consumed pity draw.
    pub attempt_count: u32,
    /// Milliseconds since the unix epoch, 0 = never drawn.
    pub last_attempt_ms: i64,
    /// The next draw is forced to the guaranteed outcome.
    pub in_pity: bool,
}

/// Stable identity of a participant plus the display name used for
/// audit records and reward placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub name: String,
}

impl Participant {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
