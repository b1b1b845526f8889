//! Prize evaluator — how much one play won against one draw.
//!
//! One rules module per game, dispatched through a single `evaluate` entry
//! point with an exhaustive match on `Game`. Evaluation is a pure function
//! of its inputs: no shared state, nothing cached, and every missing-data
//! path degrades to `Outcome::zero()` instead of an error so settlement
//! stays total over incomplete history.

pub mod loto;
pub mod loto3;
pub mod loto4;
pub mod racha;

use rust_decimal::Decimal;
use std::collections::HashSet;

use crate::cost::CostModel;
use crate::registry::{DrawRecord, TierKey};
use crate::types::{Game, Outcome};

// ---------------------------------------------------------------------------
// Evaluator
// ---------------------------------------------------------------------------

/// Per-game payout rules behind one call. Holds the only piece of payout
/// configuration there is: the Loto3 stake its fixed multiples scale from.
#[derive(Debug, Clone)]
pub struct PrizeEvaluator {
    loto3_stake: Decimal,
}

impl Default for PrizeEvaluator {
    fn default() -> Self {
        PrizeEvaluator::from_costs(&CostModel::default())
    }
}

impl PrizeEvaluator {
    pub fn new(loto3_stake: Decimal) -> Self {
        PrizeEvaluator { loto3_stake }
    }

    /// The Loto3 payout multiples are pinned to the sub-bet price, so the
    /// evaluator takes its stake straight from the cost model.
    pub fn from_costs(costs: &CostModel) -> Self {
        PrizeEvaluator::new(costs.loto3_sub_bet)
    }

    /// Evaluate one play against one draw.
    ///
    /// Fails closed: no registry record, winning numbers not yet known, or
    /// a number-set of the wrong length all yield a zero outcome.
    pub fn evaluate(&self, game: Game, numbers: &[u8], record: Option<&DrawRecord>) -> Outcome {
        let Some(record) = record else {
            return Outcome::zero();
        };
        if record.winning_numbers.is_empty() || numbers.len() != game.pick_size() {
            return Outcome::zero();
        }

        match game {
            Game::Loto => loto::evaluate(numbers, record),
            Game::Loto3 => loto3::evaluate(numbers, &record.winning_numbers, self.loto3_stake),
            Game::Loto4 => loto4::evaluate(numbers, record),
            Game::Racha => racha::evaluate(numbers, &record.winning_numbers),
        }
    }
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Set-membership hit count: how many played numbers appear in the draw.
pub(crate) fn hit_count(played: &[u8], winning: &[u8]) -> usize {
    let drawn: HashSet<u8> = winning.iter().copied().collect();
    played.iter().filter(|n| drawn.contains(n)).count()
}

/// Pari-mutuel tier payout: `floor(pool / winners)` per person, zero when
/// the tier is vacant for this draw.
pub(crate) fn pari_mutuel(record: &DrawRecord, tier: TierKey, label: &str) -> Outcome {
    let count = record.winners(tier);
    if count == 0 {
        return Outcome::zero();
    }
    let total = record.pool(tier);
    Outcome {
        amount: record.per_winner_share(tier),
        category: label.to_string(),
        formula: format!("${total} / {count}"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
