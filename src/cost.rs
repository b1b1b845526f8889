//! Cost model — stake cost of a single play.
//!
//! Flat per-game prices except Loto3, where the flat-betting strategy buys
//! one sub-bet per category and the trio category is only purchasable when
//! the combination allows it.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::types::Game;

/// Per-game stake prices, in pesos. Defaults are the official counter
/// prices; overridable from `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostModel {
    /// Fixed price of one Loto play.
    #[serde(default = "default_loto")]
    pub loto: Decimal,
    /// Price of one Loto3 sub-bet (one category). Also the base stake the
    /// fixed payout multiples are pinned to.
    #[serde(default = "default_loto3_sub_bet")]
    pub loto3_sub_bet: Decimal,
    /// Fixed price of one Loto4 play.
    #[serde(default = "default_loto4")]
    pub loto4: Decimal,
    /// Fixed price of one Racha play.
    #[serde(default = "default_racha")]
    pub racha: Decimal,
}

fn default_loto() -> Decimal {
    dec!(1000)
}
fn default_loto3_sub_bet() -> Decimal {
    dec!(100)
}
fn default_loto4() -> Decimal {
    dec!(500)
}
fn default_racha() -> Decimal {
    dec!(500)
}

impl Default for CostModel {
    fn default() -> Self {
        CostModel {
            loto: default_loto(),
            loto3_sub_bet: default_loto3_sub_bet(),
            loto4: default_loto4(),
            racha: default_racha(),
        }
    }
}

impl CostModel {
    /// Stake cost of one play. Deterministic in `(game, numbers)`.
    ///
    /// Loto3 is additive: the exact, pair, and last-digit sub-bets are
    /// always bought; the trio sub-bet only exists when the 3 positions
    /// hold 2 or 3 distinct values — a triple repeat cannot be played as
    /// a trio, so that category is not charged.
    pub fn cost(&self, game: Game, numbers: &[u8]) -> Decimal {
        match game {
            Game::Loto => self.loto,
            Game::Loto4 => self.loto4,
            Game::Racha => self.racha,
            Game::Loto3 => {
                let mut total = self.loto3_sub_bet * dec!(3);
                if trio_playable(numbers) {
                    total += self.loto3_sub_bet;
                }
                total
            }
        }
    }
}

/// Whether a Loto3 combination can carry a trio sub-bet: 2 or 3 distinct
/// values among its positions.
pub fn trio_playable(numbers: &[u8]) -> bool {
    let distinct = numbers.iter().collect::<HashSet<_>>().len();
    distinct == 2 || distinct == 3
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
