use crate::{
    prize::{PrizeEntry, PrizeTable},
    rng::RandomSource,
};

/// Weight reported for the guaranteed outcome.
pub const GUARANTEED_WEIGHT: f64 = 100.0;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOutcome {
    Win(PrizeEntry),
    Lose,
}

impl DrawOutcome {
    pub fn is_win(&self) -> bool {
        matches!(self, DrawOutcome::Win(_))
    }

    pub fn reward_actions(&self) -> &[String] {
        match self {
            DrawOutcome::Win(entry) => &entry.reward_actions,
            DrawOutcome::Lose => &[],
        }
    }
}

/// Cumulative probability walk over `table` for a sample `r` in `[0,100)`.
/// The first entry whose running total exceeds `r` wins.
pub fn select(table: &PrizeTable, r: f64) -> Option<&PrizeEntry> {
    let mut cumulative = 0.0;
    for entry in &table.0 {
        cumulative += entry.weight;
        if r < cumulative {
            return Some(entry);
        }
    }
    None
}

#[derive(Debug, Clone, Default)]
pub struct DrawEngine {
    guaranteed: Vec<String>,
}

impl DrawEngine {
    pub fn new(guaranteed_actions: Vec<String>) -> Self {
        Self {
            guaranteed: guaranteed_actions,
        }
    }

    pub fn guaranteed_actions(&self) -> &[String] {
        &self.guaranteed
    }

    /// Resolves one draw. A pity draw never touches the random source.
    /// Resetting the pity state afterwards is the caller's job.
    pub fn draw(
        &self,
        table: &PrizeTable,
        pity_active: bool,
        rng: &mut dyn RandomSource,
    ) -> DrawOutcome {
        if pity_active {
            return DrawOutcome::Win(PrizeEntry {
                weight: GUARANTEED_WEIGHT,
                reward_actions: self.guaranteed.clone(),
            });
        }
        let r = rng.next_unit() * 100.0;
        match select(table, r) {
            Some(entry) => DrawOutcome::Win(entry.clone()),
            None => DrawOutcome::Lose,
        }
    }
}
