use crate::tier::Tier;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrizeEntry {
    pub weight: f64, // percentage, 0..=100
    pub reward_actions: Vec<String>,
}

/// Ordered prize list. Order is significant: the cumulative walk picks the
/// first entry whose boundary exceeds the sample. Weights are never
/// normalised, so a sum below 100 leaves an implicit losing mass and a sum
/// above 100 makes trailing entries unreachable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrizeTable(pub Vec<PrizeEntry>);

impl PrizeTable {
    /// Builds a table from raw configuration, skipping entries whose weight
    /// is malformed and actions that are not usable strings.
    pub fn from_raw(name: &str, raw: &[RawPrizeEntry]) -> Self {
        let entries = raw
            .iter()
            .enumerate()
            .filter_map(|(idx, entry)| entry.validate(name, idx))
            .collect();
        Self(entries)
    }

    pub fn total_weight(&self) -> f64 {
        self.0.iter().map(|e| e.weight).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Prize entry as written in configuration. Weight may be a number or a
/// numeric string; actions are checked one by one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPrizeEntry {
    #[serde(alias = "probability", default)]
    pub weight: Value,
    #[serde(alias = "commands", default)]
    pub actions: Vec<Value>,
}

impl RawPrizeEntry {
    fn validate(&self, table: &str, idx: usize) -> Option<PrizeEntry> {
        let Some(weight) = parse_weight(&self.weight) else {
            warn!(table, entry = idx, weight = %self.weight, "malformed prize weight, entry skipped");
            return None;
        };
        let reward_actions = validate_actions(table, &self.actions);
        Some(PrizeEntry {
            weight,
            reward_actions,
        })
    }
}

fn parse_weight(v: &Value) -> Option<f64> {
    let w = match v {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (w.is_finite() && (0.0..=100.0).contains(&w)).then_some(w)
}

/// One prize table per tier.
#[derive(Debug, Clone, Default)]
pub struct PrizeTables {
    pub default: PrizeTable,
    pub member: PrizeTable,
    pub privileged: PrizeTable,
}

impl PrizeTables {
    pub fn for_tier(&self, tier: Tier) -> &PrizeTable {
        match tier {
            Tier::Default => &self.default,
            Tier::Member => &self.member,
            Tier::Privileged => &self.privileged,
        }
    }
}

/// Keeps the non-blank string actions, warning about the rest.
pub fn validate_actions(list: &str, raw: &[Value]) -> Vec<String> {
    raw.iter()
        .enumerate()
        .filter_map(|(pos, action)| match action {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            other => {
                warn!(list, action = pos, value = %other, "invalid reward action skipped");
                None
            }
        })
        .collect()
}
