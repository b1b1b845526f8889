//! Loto3 (3-digit positional game) payout rules.
//!
//! Non-exclusive categories; every one that matches pays, amounts are
//! summed and labels concatenated in test order. Exacta covers the whole
//! sequence, so the positional sub-categories (Par, Terminación) do not
//! stack on top of it; Trio is a separate sub-bet and does. Payouts are
//! fixed multiples of the sub-bet stake (pinned to a reference stake of
//! 100, scaling linearly: `payout = stake × multiple`).

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::cost::trio_playable;
use crate::types::Outcome;

const MULT_EXACTA: Decimal = dec!(400);
const MULT_TRIO_PAR: Decimal = dec!(130);
const MULT_TRIO_AZAR: Decimal = dec!(65);
const MULT_PAR: Decimal = dec!(20);
const MULT_TERMINACION: Decimal = dec!(4);

pub(super) fn evaluate(played: &[u8], winning: &[u8], stake: Decimal) -> Outcome {
    let mut total = Decimal::ZERO;
    let mut categories: Vec<&str> = Vec::new();
    let mut formulas: Vec<String> = Vec::new();

    let mut award = |multiple: Decimal, label: &'static str| {
        total += stake * multiple;
        categories.push(label);
        formulas.push(format!("{stake} x {multiple}"));
    };

    // Exacta: all three positions in order
    let exacta = played == winning;
    if exacta {
        award(MULT_EXACTA, "Exacta");
    }

    // Trío: same multiset of digits, any order. Only lives when the play
    // holds 2 or 3 distinct values; a triple repeat has no trio sub-bet.
    if trio_playable(played) {
        let mut played_sorted = played.to_vec();
        let mut winning_sorted = winning.to_vec();
        played_sorted.sort_unstable();
        winning_sorted.sort_unstable();

        if played_sorted == winning_sorted {
            if distinct_values(played) == 2 {
                award(MULT_TRIO_PAR, "Trio Par");
            } else {
                award(MULT_TRIO_AZAR, "Trio Azar");
            }
        }
    }

    if !exacta {
        // Par: leading pair or trailing pair in position — either alone
        // pays, and both together still pay only once.
        let front = played[0] == winning[0] && played[1] == winning[1];
        let back = played[1] == winning[1] && played[2] == winning[2];
        if front || back {
            award(MULT_PAR, "Par");
        }

        // Terminación: last digit in position
        if played[2] == winning[2] {
            award(MULT_TERMINACION, "Terminacion");
        }
    }

    if total.is_zero() {
        Outcome::zero()
    } else {
        Outcome {
            amount: total,
            category: categories.join(" + "),
            formula: formulas.join(" + "),
        }
    }
}

fn distinct_values(numbers: &[u8]) -> usize {
    let mut seen = numbers.to_vec();
    seen.sort_unstable();
    seen.dedup();
    seen.len()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
