use lottery_core::{
    os_random, seeded_random, validate_actions, DrawEngine, EligibilityGate, ListAuthority,
    PityTracker, PrizeTable, PrizeTables, ProvablyFairRng, RandomSource, RawPrizeEntry,
    TierLimits,
};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

use crate::service::DrawRules;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    Sqlite,
    Mysql,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct StorageConfig {
    #[serde(rename = "type")]
    pub kind: StorageKind,
    pub url: String,
    pub max_connections: u32,
    pub timeout_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            kind: StorageKind::Sqlite,
            url: "sqlite://lottery.db?mode=rwc".to_string(),
            max_connections: 5,
            timeout_ms: 2000,
        }
    }
}

impl StorageConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Participant ids granted the member and privileged tiers.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct TierConfig {
    pub privileged: Vec<String>,
    pub members: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct RngConfig {
    /// Derive draws with HMAC from this secret.
    pub server_seed: Option<String>,
    /// Public half of the HMAC message, `"lottery"` when unset.
    pub client_seed: Option<String>,
    /// Reproducible run from a fixed seed.
    pub seed: Option<u64>,
}

impl RngConfig {
    /// `start_nonce` is the nonce saved by the previous run, ignored by
    /// sources that have none.
    pub fn build(&self, start_nonce: u64) -> Box<dyn RandomSource> {
        match (&self.server_seed, self.seed) {
            (Some(secret), _) => {
                let client_seed = self.client_seed.as_deref().unwrap_or("lottery");
                let rng = ProvablyFairRng::new(secret.as_str(), client_seed, start_nonce);
                info!(
                    server_seed_hash = %rng.server_seed_hash_hex(),
                    client_seed,
                    nonce = start_nonce,
                    "provably fair draws enabled"
                );
                Box::new(rng)
            }
            (None, Some(seed)) => Box::new(seeded_random(seed)),
            (None, None) => Box::new(os_random()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct LotteryConfig {
    pub count_limit_enabled: bool,
    pub cooldown_seconds: u64,
    pub guarantee_count: u32,
    pub max_draw_count: u32,
    pub member_max_draw_count: u32,
    pub op_max_draw_count: u32,
    pub prizes: Vec<RawPrizeEntry>,
    pub member_prizes: Vec<RawPrizeEntry>,
    pub op_prizes: Vec<RawPrizeEntry>,
    #[serde(alias = "guarantee-commands")]
    pub guarantee_reward_actions: Vec<serde_json::Value>,
    pub pity_bypasses_limits: bool,
    pub storage: StorageConfig,
    pub tiers: TierConfig,
    pub rng: RngConfig,
}

impl Default for LotteryConfig {
    fn default() -> Self {
        let limits = TierLimits::default();
        Self {
            count_limit_enabled: false,
            cooldown_seconds: 0,
            guarantee_count: 10,
            max_draw_count: limits.default,
            member_max_draw_count: limits.member,
            op_max_draw_count: limits.privileged,
            prizes: Vec::new(),
            member_prizes: Vec::new(),
            op_prizes: Vec::new(),
            guarantee_reward_actions: Vec::new(),
            pity_bypasses_limits: false,
            storage: StorageConfig::default(),
            tiers: TierConfig::default(),
            rng: RngConfig::default(),
        }
    }
}

impl LotteryConfig {
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// A missing file falls back to the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(s) => Self::from_toml(&s),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "config file not found, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Read {
                path: path.display().to_string(),
                source,
            }),
        }
    }

    /// `DATABASE_URL` overrides `storage.url`.
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("DATABASE_URL") {
            self.storage.url = url;
        }
    }

    pub fn authority(&self) -> ListAuthority {
        ListAuthority::new(self.tiers.privileged.clone(), self.tiers.members.clone())
    }

    /// Validates prize tables and assembles the draw rules. Bad entries are
    /// logged and skipped.
    pub fn rules(&self) -> DrawRules {
        let tables = PrizeTables {
            default: PrizeTable::from_raw("prizes", &self.prizes),
            member: PrizeTable::from_raw("member-prizes", &self.member_prizes),
            privileged: PrizeTable::from_raw("op-prizes", &self.op_prizes),
        };
        for (name, table) in [
            ("prizes", &tables.default),
            ("member-prizes", &tables.member),
            ("op-prizes", &tables.privileged),
        ] {
            let total = table.total_weight();
            if total > 100.0 {
                warn!(table = name, total, "prize weights exceed 100, trailing entries may be unreachable");
            }
        }

        let guaranteed = validate_actions("guarantee-reward-actions", &self.guarantee_reward_actions);
        if self.guarantee_count > 0 && guaranteed.is_empty() {
            warn!("pity is enabled but guarantee-reward-actions is empty");
        }

        DrawRules {
            gate: EligibilityGate {
                count_limit_enabled: self.count_limit_enabled,
                limits: TierLimits {
                    default: self.max_draw_count,
                    member: self.member_max_draw_count,
                    privileged: self.op_max_draw_count,
                },
                cooldown_secs: self.cooldown_seconds,
                pity_bypasses_limits: self.pity_bypasses_limits,
            },
            engine: DrawEngine::new(guaranteed),
            tracker: PityTracker::new(self.guarantee_count),
            tables,
        }
    }
}
