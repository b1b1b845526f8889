//! Loto4 payout rules: unordered 4-number match, pari-mutuel on every
//! tier, no wildcard.

use crate::registry::{DrawRecord, TierKey};
use crate::types::Outcome;

use super::{hit_count, pari_mutuel};

pub(super) fn evaluate(played: &[u8], record: &DrawRecord) -> Outcome {
    match hit_count(played, &record.winning_numbers) {
        4 => pari_mutuel(record, TierKey::FourPoints, "4 Puntos"),
        3 => pari_mutuel(record, TierKey::ThreePoints, "3 Puntos"),
        2 => pari_mutuel(record, TierKey::TwoPoints, "2 Puntos"),
        _ => Outcome::zero(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
