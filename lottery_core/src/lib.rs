pub mod draw;
pub mod eligibility;
pub mod executor;
pub mod pity;
pub mod preview;
pub mod prize;
pub mod rng;
pub mod state;
pub mod tier;

pub use crate::draw::{select, DrawEngine, DrawOutcome, GUARANTEED_WEIGHT};
pub use crate::eligibility::{DenyReason, Eligibility, EligibilityGate, TierLimits};
pub use crate::executor::{expand_placeholders, RewardExecutor};
pub use crate::pity::PityTracker;
pub use crate::preview::reward_preview;
pub use crate::prize::{validate_actions, PrizeEntry, PrizeTable, PrizeTables, RawPrizeEntry};
pub use crate::rng::{derive_hash_hex, os_random, seeded_random, FixedRandom, ProvablyFairRng, RandomSource};
pub use crate::state::{Participant, ParticipantState};
pub use crate::tier::{AuthorityTierResolver, ListAuthority, PermissionAuthority, Tier, TierResolver};
