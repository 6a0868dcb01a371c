use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Participant classification that selects the prize table and draw limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Default,
    Member,
    Privileged,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Tier::Default => "default",
            Tier::Member => "member",
            Tier::Privileged => "privileged",
        };
        f.write_str(s)
    }
}

/// External authority answering "does this participant hold tier X".
pub trait PermissionAuthority: Send + Sync {
    fn holds(&self, participant_id: &str, tier: Tier) -> bool;
}

/// Resolves a participant to exactly one tier, highest first.
pub trait TierResolver: Send + Sync {
    fn resolve(&self, participant_id: &str) -> Tier;
}

/// Without an authority every participant is `Tier::Default`.
pub struct AuthorityTierResolver<A> {
    authority: Option<A>,
}

impl<A: PermissionAuthority> AuthorityTierResolver<A> {
    pub fn new(authority: A) -> Self {
        Self {
            authority: Some(authority),
        }
    }

    pub fn without_authority() -> Self {
        Self { authority: None }
    }
}

impl<A: PermissionAuthority> TierResolver for AuthorityTierResolver<A> {
    fn resolve(&self, participant_id: &str) -> Tier {
        match &self.authority {
            Some(a) if a.holds(participant_id, Tier::Privileged) => Tier::Privileged,
            Some(a) if a.holds(participant_id, Tier::Member) => Tier::Member,
            _ => Tier::Default,
        }
    }
}

/// Authority backed by fixed id lists.
#[derive(Debug, Clone, Default)]
pub struct ListAuthority {
    privileged: HashSet<String>,
    members: HashSet<String>,
}

impl ListAuthority {
    pub fn new(
        privileged: impl IntoIterator<Item = String>,
        members: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            privileged: privileged.into_iter().collect(),
            members: members.into_iter().collect(),
        }
    }
}

impl PermissionAuthority for ListAuthority {
    fn holds(&self, participant_id: &str, tier: Tier) -> bool {
        match tier {
            Tier::Privileged => self.privileged.contains(participant_id),
            Tier::Member => self.members.contains(participant_id),
            Tier::Default => true,
        }
    }
}
