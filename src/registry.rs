//! Draw registry — winning numbers, prize pools, and winner counts per draw.
//!
//! Pure data store: populated once by the ingest layer, then treated as an
//! immutable snapshot for the lifetime of a settlement pass. Every lookup
//! fails closed — a missing draw, tier, or winner count reads as zero so
//! settlement never aborts on incomplete historical data.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::types::Game;

// ---------------------------------------------------------------------------
// Tier keys
// ---------------------------------------------------------------------------

/// Prize-category keys across all games.
///
/// Loto uses the ladder from `Jackpot` down to `SuperDupla` plus the
/// `AccumulatedPool` estimate published for vacant jackpots; Loto4 uses the
/// point tiers. Loto3 and Racha pay fixed amounts and never hit the
/// registry's pool tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TierKey {
    // Loto
    Jackpot,
    SuperQuina,
    Quina,
    SuperCuaterna,
    Cuaterna,
    SuperTerna,
    Terna,
    SuperDupla,
    /// Published carryover estimate for a vacant jackpot. Informational:
    /// used only as the jackpot fallback, never divided among winners.
    AccumulatedPool,
    // Loto4
    FourPoints,
    ThreePoints,
    TwoPoints,
}

impl fmt::Display for TierKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = match self {
            TierKey::Jackpot => "LOTO",
            TierKey::SuperQuina => "SQUINA",
            TierKey::Quina => "QUINA",
            TierKey::SuperCuaterna => "SCUATERNA",
            TierKey::Cuaterna => "CUATERNA",
            TierKey::SuperTerna => "STERNA",
            TierKey::Terna => "TERNA",
            TierKey::SuperDupla => "SDUPLA",
            TierKey::AccumulatedPool => "POZO_REAL",
            TierKey::FourPoints => "4P",
            TierKey::ThreePoints => "3P",
            TierKey::TwoPoints => "2P",
        };
        write!(f, "{key}")
    }
}

// ---------------------------------------------------------------------------
// Draw record
// ---------------------------------------------------------------------------

/// One historical draw for one game: winning numbers, wildcard, and the
/// published prize distribution.
#[derive(Debug, Clone, Default)]
pub struct DrawRecord {
    pub draw_id: u32,
    pub date: Option<NaiveDate>,
    /// Ordered as published; length = the game's pick-size.
    pub winning_numbers: Vec<u8>,
    /// Comodín, Loto only.
    pub wildcard: Option<u8>,
    prize_pools: HashMap<TierKey, Decimal>,
    winner_counts: HashMap<TierKey, u32>,
}

impl DrawRecord {
    pub fn new(draw_id: u32) -> Self {
        DrawRecord {
            draw_id,
            ..Default::default()
        }
    }

    pub fn set_pool(&mut self, tier: TierKey, amount: Decimal) {
        self.prize_pools.insert(tier, amount);
    }

    pub fn set_winners(&mut self, tier: TierKey, count: u32) {
        self.winner_counts.insert(tier, count);
    }

    /// Total pool for a tier; zero when the feed carried nothing.
    pub fn pool(&self, tier: TierKey) -> Decimal {
        self.prize_pools.get(&tier).copied().unwrap_or(Decimal::ZERO)
    }

    /// Winner count for a tier; zero when the feed carried nothing.
    pub fn winners(&self, tier: TierKey) -> u32 {
        self.winner_counts.get(&tier).copied().unwrap_or(0)
    }

    /// A tier with nobody in it. Its pool (if any) carries over and pays
    /// zero to this draw's predictions.
    pub fn is_vacant(&self, tier: TierKey) -> bool {
        self.winners(tier) == 0
    }

    /// Pari-mutuel share: `floor(pool / winners)`, zero for vacant tiers.
    /// Integer floor, no remainder distribution.
    pub fn per_winner_share(&self, tier: TierKey) -> Decimal {
        let count = self.winners(tier);
        if count == 0 {
            return Decimal::ZERO;
        }
        (self.pool(tier) / Decimal::from(count)).floor()
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// All known draws, keyed by game then draw id.
///
/// Draw ids are kept sorted so ledger computations can walk draws in
/// ascending order without re-sorting.
#[derive(Debug, Clone, Default)]
pub struct DrawRegistry {
    games: HashMap<Game, BTreeMap<u32, DrawRecord>>,
}

impl DrawRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, game: Game, record: DrawRecord) {
        self.games
            .entry(game)
            .or_default()
            .insert(record.draw_id, record);
    }

    /// Full record for a draw, if known.
    pub fn record(&self, game: Game, draw_id: u32) -> Option<&DrawRecord> {
        self.games.get(&game)?.get(&draw_id)
    }

    /// Winning numbers for a draw. `None` until the draw has been played
    /// and ingested; callers treat that as "invest, no return yet".
    pub fn winning_numbers(&self, game: Game, draw_id: u32) -> Option<&[u8]> {
        let record = self.record(game, draw_id)?;
        if record.winning_numbers.is_empty() {
            None
        } else {
            Some(&record.winning_numbers)
        }
    }

    pub fn wildcard(&self, game: Game, draw_id: u32) -> Option<u8> {
        self.record(game, draw_id)?.wildcard
    }

    /// Number of known draws for a game.
    pub fn draw_count(&self, game: Game) -> usize {
        self.games.get(&game).map_or(0, |m| m.len())
    }

    /// Highest ingested draw id for a game.
    pub fn latest_draw(&self, game: Game) -> Option<u32> {
        self.games.get(&game)?.keys().next_back().copied()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn make_record() -> DrawRecord {
        let mut r = DrawRecord::new(5263);
        r.winning_numbers = vec![4, 11, 19, 23, 30, 38];
        r.wildcard = Some(7);
        r.set_pool(TierKey::SuperQuina, dec!(130000));
        r.set_winners(TierKey::SuperQuina, 2);
        r.set_pool(TierKey::Quina, dec!(900000));
        r.set_winners(TierKey::Quina, 0);
        r
    }

    #[test]
    fn test_pool_defaults_to_zero() {
        let r = DrawRecord::new(1);
        assert_eq!(r.pool(TierKey::Jackpot), Decimal::ZERO);
        assert_eq!(r.winners(TierKey::Jackpot), 0);
    }

    #[test]
    fn test_per_winner_share_floors() {
        let mut r = DrawRecord::new(1);
        r.set_pool(TierKey::Terna, dec!(100));
        r.set_winners(TierKey::Terna, 3);
        // 100 / 3 = 33.33… → 33, remainder stays in the pool
        assert_eq!(r.per_winner_share(TierKey::Terna), dec!(33));
    }

    #[test]
    fn test_per_winner_share_exact_division() {
        let r = make_record();
        assert_eq!(r.per_winner_share(TierKey::SuperQuina), dec!(65000));
    }

    #[test]
    fn test_vacant_tier_pays_zero_despite_pool() {
        let r = make_record();
        // Quina has a 900k pool and zero winners — vacant, pays nothing
        assert!(r.is_vacant(TierKey::Quina));
        assert_eq!(r.per_winner_share(TierKey::Quina), Decimal::ZERO);
        assert_eq!(r.pool(TierKey::Quina), dec!(900000));
    }

    #[test]
    fn test_registry_insert_and_lookup() {
        let mut reg = DrawRegistry::new();
        reg.insert(Game::Loto, make_record());

        let rec = reg.record(Game::Loto, 5263).unwrap();
        assert_eq!(rec.draw_id, 5263);
        assert_eq!(reg.wildcard(Game::Loto, 5263), Some(7));
        assert_eq!(
            reg.winning_numbers(Game::Loto, 5263).unwrap(),
            &[4, 11, 19, 23, 30, 38]
        );
    }

    #[test]
    fn test_registry_missing_draw() {
        let reg = DrawRegistry::new();
        assert!(reg.record(Game::Loto, 999).is_none());
        assert!(reg.winning_numbers(Game::Loto, 999).is_none());
        assert!(reg.wildcard(Game::Loto, 999).is_none());
        assert_eq!(reg.draw_count(Game::Loto), 0);
    }

    #[test]
    fn test_registry_games_are_isolated() {
        let mut reg = DrawRegistry::new();
        reg.insert(Game::Loto, make_record());
        // Same draw id under a different game is a different draw
        assert!(reg.record(Game::Loto4, 5263).is_none());
    }

    #[test]
    fn test_winning_numbers_empty_reads_as_unknown() {
        let mut reg = DrawRegistry::new();
        // Pool data published before the numbers (partial feed row)
        let mut r = DrawRecord::new(880);
        r.set_pool(TierKey::FourPoints, dec!(5000000));
        reg.insert(Game::Loto4, r);

        assert!(reg.record(Game::Loto4, 880).is_some());
        assert!(reg.winning_numbers(Game::Loto4, 880).is_none());
    }

    #[test]
    fn test_latest_draw() {
        let mut reg = DrawRegistry::new();
        for id in [10, 30, 20] {
            reg.insert(Game::Racha, DrawRecord::new(id));
        }
        assert_eq!(reg.latest_draw(Game::Racha), Some(30));
        assert_eq!(reg.draw_count(Game::Racha), 3);
        assert_eq!(reg.latest_draw(Game::Loto), None);
    }

    #[test]
    fn test_tier_key_display_matches_feed_keys() {
        assert_eq!(format!("{}", TierKey::Jackpot), "LOTO");
        assert_eq!(format!("{}", TierKey::AccumulatedPool), "POZO_REAL");
        assert_eq!(format!("{}", TierKey::FourPoints), "4P");
    }
}
