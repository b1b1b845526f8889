//! Shared types for the SORTEO settlement engine.
//!
//! These types form the data model used across all modules.
//! They are designed to be stable so that ingest, payout, and
//! settlement modules can depend on them without circular references.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Game
// ---------------------------------------------------------------------------

/// The four supported lottery games.
///
/// A closed enum rather than a string discriminator: every evaluation
/// path matches on it exhaustively, so a new variant cannot be added
/// without the compiler pointing at every place that must handle it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Game {
    /// Classic 6-number game, unordered, with a wildcard (comodín).
    Loto,
    /// 3-digit positional game with additive flat-bet categories.
    Loto3,
    /// 4-number unordered game, pari-mutuel tiers, no wildcard.
    Loto4,
    /// 10-pick streak game with fixed symmetric tiers.
    Racha,
}

impl Game {
    /// All known games (useful for iteration).
    pub const ALL: &'static [Game] = &[Game::Loto, Game::Loto3, Game::Loto4, Game::Racha];

    /// How many numbers a play for this game holds.
    pub fn pick_size(&self) -> usize {
        match self {
            Game::Loto => 6,
            Game::Loto3 => 3,
            Game::Loto4 => 4,
            Game::Racha => 10,
        }
    }

    /// Whether the game draws a wildcard number alongside the main draw.
    pub fn has_wildcard(&self) -> bool {
        matches!(self, Game::Loto)
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Game::Loto => write!(f, "LOTO"),
            Game::Loto3 => write!(f, "LOTO3"),
            Game::Loto4 => write!(f, "LOTO4"),
            Game::Racha => write!(f, "RACHA"),
        }
    }
}

/// Parse a feed game tag. Feeds are inconsistent: plain names ("LOTO3"),
/// suffixed variants ("LOTO_HISTORIAL", "RACHA_MAESTRO"), mixed case.
/// "LOTO" must not swallow "LOTO3"/"LOTO4", so digit-suffixed games are
/// tried first.
impl std::str::FromStr for Game {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_uppercase();
        if tag == "LOTO3" || tag.starts_with("LOTO3_") {
            Ok(Game::Loto3)
        } else if tag == "LOTO4" || tag.starts_with("LOTO4_") {
            Ok(Game::Loto4)
        } else if tag == "RACHA" || tag.starts_with("RACHA_") {
            Ok(Game::Racha)
        } else if tag == "LOTO"
            || (tag.starts_with("LOTO") && !tag.chars().nth(4).is_some_and(|c| c.is_ascii_digit()))
        {
            Ok(Game::Loto)
        } else {
            Err(FeedError::UnknownGame(s.to_string()))
        }
    }
}

// ---------------------------------------------------------------------------
// Algorithm
// ---------------------------------------------------------------------------

/// The generating heuristic behind a prediction.
///
/// Feed tags are free text ("oraculo_neural_v4_refit"); they are resolved
/// to a variant once at ingestion by substring containment, first match
/// wins. Tags matching no known key land in `Other`, which is excluded
/// from per-algorithm breakdowns but still counted in draw totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Algorithm {
    Forense,
    Gauss,
    Delta,
    Markov,
    OraculoV3,
    OraculoV4,
    Consenso,
    Other,
}

impl Algorithm {
    /// Known algorithms, in resolution order. `Other` is not listed: it is
    /// the fallback, never matched.
    pub const KNOWN: &'static [Algorithm] = &[
        Algorithm::Forense,
        Algorithm::Gauss,
        Algorithm::Delta,
        Algorithm::Markov,
        Algorithm::OraculoV3,
        Algorithm::OraculoV4,
        Algorithm::Consenso,
    ];

    /// The substring a feed tag must contain to resolve to this variant.
    fn key(&self) -> &'static str {
        match self {
            Algorithm::Forense => "forense",
            Algorithm::Gauss => "gauss",
            Algorithm::Delta => "delta",
            Algorithm::Markov => "markov",
            Algorithm::OraculoV3 => "oraculo_neural_v3",
            Algorithm::OraculoV4 => "oraculo_neural_v4",
            Algorithm::Consenso => "consenso",
            Algorithm::Other => "",
        }
    }

    /// Short display label used in ledgers and tables.
    pub fn label(&self) -> &'static str {
        match self {
            Algorithm::Forense => "Bio",
            Algorithm::Gauss => "Gauss",
            Algorithm::Delta => "Delta",
            Algorithm::Markov => "Markov",
            Algorithm::OraculoV3 => "Oraculo V3",
            Algorithm::OraculoV4 => "Oraculo V4",
            Algorithm::Consenso => "Consenso",
            Algorithm::Other => "Otros",
        }
    }

    /// Resolve a free-text feed tag to a variant. First match wins.
    pub fn resolve(tag: &str) -> Algorithm {
        let tag = tag.trim().to_lowercase();
        for algo in Self::KNOWN {
            if tag.contains(algo.key()) {
                return *algo;
            }
        }
        Algorithm::Other
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ---------------------------------------------------------------------------
// Audit state
// ---------------------------------------------------------------------------

/// Whether a prediction has been checked against a closed draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditState {
    Pending,
    Audited,
}

impl fmt::Display for AuditState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditState::Pending => write!(f, "PENDIENTE"),
            AuditState::Audited => write!(f, "AUDITADO"),
        }
    }
}

impl std::str::FromStr for AuditState {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "AUDITADO" => Ok(AuditState::Audited),
            "PENDIENTE" | "" => Ok(AuditState::Pending),
            other => Err(FeedError::UnknownAuditState(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Prediction & Play
// ---------------------------------------------------------------------------

/// One generated number-set aimed at a specific draw.
///
/// Built by the ingest layer, already normalized: `numbers` is a plain
/// ordered integer sequence and `algorithm` is resolved from the raw tag.
/// The core consumes predictions read-only and never mutates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub id: String,
    /// When the prediction was generated (recency tie-break in audit tables).
    pub generated_at: DateTime<Utc>,
    pub game: Game,
    /// Ordered number-set; length should equal `game.pick_size()`.
    pub numbers: Vec<u8>,
    /// The draw this prediction targets.
    pub target_draw: u32,
    pub algorithm: Algorithm,
    /// Raw generating-heuristic tag, opaque to the core.
    pub algorithm_tag: String,
    pub audit_state: AuditState,
    /// Hit count recorded by the upstream auditor (display only).
    pub hits: Option<u32>,
    /// Affinity score recorded upstream (display only, not settled).
    pub affinity: Option<f64>,
}

impl Prediction {
    pub fn is_audited(&self) -> bool {
        self.audit_state == AuditState::Audited
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] #{} {:?} {} ({})",
            self.game, self.target_draw, self.numbers, self.algorithm, self.audit_state,
        )
    }
}

/// A ticket that was actually purchased, from the recorded-plays feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Play {
    pub game: Game,
    pub numbers: Vec<u8>,
    pub target_draw: u32,
}

impl fmt::Display for Play {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] #{} {:?}", self.game, self.target_draw, self.numbers)
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// The financial result of one prediction against one draw.
///
/// Computed fresh on every evaluation, never cached. `category` joins all
/// simultaneously triggered tier labels with " + " (the 3-digit game can
/// win several categories at once); `formula` is a human-readable
/// derivation kept for audit display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub amount: Decimal,
    pub category: String,
    pub formula: String,
}

impl Outcome {
    /// The no-win outcome. Also what every failure mode degrades to.
    pub fn zero() -> Self {
        Outcome {
            amount: Decimal::ZERO,
            category: String::new(),
            formula: String::new(),
        }
    }

    pub fn is_winning(&self) -> bool {
        self.amount > Decimal::ZERO
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_winning() {
            write!(f, "${} {} ({})", self.amount, self.category, self.formula)
        } else {
            write!(f, "sin premio")
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Typed errors raised at the ingestion boundary. The core itself is
/// total: inside settlement every failure degrades to a zero/skip outcome.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("unparseable number set: {0:?}")]
    NumberSet(String),

    #[error("unknown game tag: {0:?}")]
    UnknownGame(String),

    #[error("unknown audit state: {0:?}")]
    UnknownAuditState(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
