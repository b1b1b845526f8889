//! Loto (classic 6-number game) payout rules.
//!
//! Numbers match by set membership; the comodín upgrades the 5-, 4-, 3-
//! and 2-hit tiers. All tiers below the jackpot are pari-mutuel. The
//! jackpot pays the draw's own pool when one was distributed, otherwise
//! the published accumulated-pool estimate, and the formula records which
//! source was used.

use crate::registry::{DrawRecord, TierKey};
use crate::types::Outcome;

use super::{hit_count, pari_mutuel};

pub(super) fn evaluate(played: &[u8], record: &DrawRecord) -> Outcome {
    let hits = hit_count(played, &record.winning_numbers);
    let has_wildcard = record.wildcard.is_some_and(|c| played.contains(&c));

    match (hits, has_wildcard) {
        (6, _) => jackpot(record),
        (5, true) => pari_mutuel(record, TierKey::SuperQuina, "Super Quina"),
        (5, false) => pari_mutuel(record, TierKey::Quina, "Quina"),
        (4, true) => pari_mutuel(record, TierKey::SuperCuaterna, "Super Cuaterna"),
        (4, false) => pari_mutuel(record, TierKey::Cuaterna, "Cuaterna"),
        (3, true) => pari_mutuel(record, TierKey::SuperTerna, "Super Terna"),
        (3, false) => pari_mutuel(record, TierKey::Terna, "Terna"),
        (2, true) => pari_mutuel(record, TierKey::SuperDupla, "Super Dupla"),
        _ => Outcome::zero(),
    }
}

/// Six hits. The distributed jackpot column is zero whenever the draw went
/// vacant; in that case the accumulated-pool estimate stands in, flagged in
/// the formula so audit tables can tell the sources apart.
fn jackpot(record: &DrawRecord) -> Outcome {
    let distributed = record.pool(TierKey::Jackpot);
    let (amount, formula) = if distributed.is_zero() {
        (record.pool(TierKey::AccumulatedPool), "Pozo Acumulado (estimado)")
    } else {
        (distributed, "Pozo Repartido")
    };
    Outcome {
        amount,
        category: "LOTO 6 Aciertos".to_string(),
        formula: formula.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
