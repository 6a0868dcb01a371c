use crate::state::ParticipantState;

/// Arms the guaranteed outcome after `threshold` consecutive non-pity draws.
/// A threshold of 0 disables pity.
#[derive(Debug, Clone, Copy)]
pub struct PityTracker {
    pub threshold: u32,
}

impl PityTracker {
    pub fn new(threshold: u32) -> Self {
        Self { threshold }
    }

    /// State after a draw. `pity_draw` marks that the draw consumed the
    /// guaranteed outcome. The outcome of a normal draw does not matter:
    /// wins and losses both count as attempts, and newly armed pity only
    /// affects the next draw.
    pub fn record_attempt(
        &self,
        state: ParticipantState,
        pity_draw: bool,
        now_ms: i64,
    ) -> ParticipantState {
        if pity_draw {
            return ParticipantState {
                attempt_count: 0,
                last_attempt_ms: now_ms,
                in_pity: false,
            };
        }
        let attempt_count = state.attempt_count.saturating_add(1);
        let in_pity = state.in_pity || (self.threshold > 0 && attempt_count >= self.threshold);
        ParticipantState {
            attempt_count,
            last_attempt_ms: now_ms,
            in_pity,
        }
    }

    /// Whether the transition from `before` to `after` armed pity.
    pub fn triggered(before: &ParticipantState, after: &ParticipantState) -> bool {
        !before.in_pity && after.in_pity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arms_on_threshold_and_resets_on_consume() {
        let tracker = PityTracker::new(3);
        let mut state = ParticipantState::default();
        for (i, expect_pity) in [(1, false), (2, false), (3, true)] {
            state = tracker.record_attempt(state, false, i as i64 * 1000);
            assert_eq!(state.attempt_count, i);
            assert_eq!(state.in_pity, expect_pity);
        }
        state = tracker.record_attempt(state, true, 5000);
        assert_eq!(state, ParticipantState { attempt_count: 0, last_attempt_ms: 5000, in_pity: false });
    }

    #[test]
    fn test_zero_threshold_disables() {
        let tracker = PityTracker::new(0);
        let state = tracker.record_attempt(ParticipantState::default(), false, 1);
        assert!(!state.in_pity);
    }

    #[test]
    fn test_triggered_only_on_transition() {
        let tracker = PityTracker::new(1);
        let before = ParticipantState::default();
        let after = tracker.record_attempt(before, false, 1);
        assert!(PityTracker::triggered(&before, &after));
        assert!(!PityTracker::triggered(&after, &after));
    }
}
