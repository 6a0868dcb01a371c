use crate::{state::ParticipantState, tier::Tier};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DenyReason {
    CountLimitReached,
    CooldownActive,
    TemporarilyUnavailable,
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DenyReason::CountLimitReached => "count-limit-reached",
            DenyReason::CooldownActive => "cooldown-active",
            DenyReason::TemporarilyUnavailable => "temporarily-unavailable",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    Allowed,
    Denied {
        reason: DenyReason,
        retry_after_secs: Option<u64>,
    },
}

/// Maximum attempts per tier, 0 = unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierLimits {
    pub default: u32,
    pub member: u32,
    pub privileged: u32,
}

impl Default for TierLimits {
    fn default() -> Self {
        Self {
            default: 3,
            member: 5,
            privileged: 10,
        }
    }
}

impl TierLimits {
    pub fn for_tier(&self, tier: Tier) -> u32 {
        match tier {
            Tier::Default => self.default,
            Tier::Member => self.member,
            Tier::Privileged => self.privileged,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EligibilityGate {
    pub count_limit_enabled: bool,
    pub limits: TierLimits,
    pub cooldown_secs: u64,
    /// When set, a participant in pity skips the count and cooldown checks.
    /// Off by default: both checks run first and pity does not bypass them.
    pub pity_bypasses_limits: bool,
}

impl EligibilityGate {
    pub fn check(&self, state: &ParticipantState, tier: Tier, now_ms: i64) -> Eligibility {
        if self.pity_bypasses_limits && state.in_pity {
            return Eligibility::Allowed;
        }

        let max = self.limits.for_tier(tier);
        if self.count_limit_enabled && max > 0 && state.attempt_count >= max {
            return Eligibility::Denied {
                reason: DenyReason::CountLimitReached,
                retry_after_secs: None,
            };
        }

        if self.cooldown_secs > 0 {
            let cooldown_ms = self.cooldown_secs.saturating_mul(1000);
            // a timestamp in the future counts as "just drawn"
            let elapsed_ms = now_ms.saturating_sub(state.last_attempt_ms).max(0) as u64;
            if elapsed_ms < cooldown_ms {
                return Eligibility::Denied {
                    reason: DenyReason::CooldownActive,
                    retry_after_secs: Some((cooldown_ms - elapsed_ms) / 1000),
                };
            }
        }

        Eligibility::Allowed
    }
}
