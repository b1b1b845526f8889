//! Racha payout rules: 10-pick streak game with fixed symmetric tiers.
//!
//! Both extremes pay: matching nearly everything or nearly nothing. Hit
//! counts in the middle band (4 to 6) are worthless.

use rust_decimal_macros::dec;

use crate::types::Outcome;

use super::hit_count;

pub(super) fn evaluate(played: &[u8], winning: &[u8]) -> Outcome {
    let (amount, category) = match hit_count(played, winning) {
        10 | 0 => (dec!(6000000), "Racha Max"),
        9 | 1 => (dec!(30000), "Racha Media"),
        8 | 2 => (dec!(1500), "Racha Baja"),
        7 | 3 => (dec!(500), "Racha Min"),
        _ => return Outcome::zero(),
    };
    Outcome {
        amount,
        category: category.to_string(),
        formula: format!("Fijo ${amount}"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
