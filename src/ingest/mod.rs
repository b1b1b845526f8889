//! Feed ingestion — CSV loaders that normalize the upstream exports into
//! the typed model.
//!
//! Everything downstream of this module works on clean data: games and
//! algorithms are resolved to closed enums here, number-sets are parsed
//! once, and rows that cannot be normalized are dropped with a warning
//! rather than aborting the load. Opening a configured feed that does not
//! exist is still an error; a broken row inside it never is.

pub mod numbers;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::registry::{DrawRecord, DrawRegistry, TierKey};
use crate::types::{Algorithm, AuditState, Game, Play, Prediction};

use numbers::parse_number_set;

// ---------------------------------------------------------------------------
// Header lookup
// ---------------------------------------------------------------------------

/// Name-based column access over a CSV header row. The upstream exports
/// shuffle column order between dumps, so position is never trusted.
struct HeaderIndex {
    names: Vec<String>,
}

impl HeaderIndex {
    fn new(headers: &csv::StringRecord) -> Self {
        HeaderIndex {
            names: headers.iter().map(|h| h.trim().to_string()).collect(),
        }
    }

    fn column(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|h| h == name)
    }

    /// Trimmed cell value under a named column, `None` when the column is
    /// absent or the cell empty.
    fn get<'r>(&self, record: &'r csv::StringRecord, name: &str) -> Option<&'r str> {
        let value = record.get(self.column(name)?)?.trim();
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }
}

// ---------------------------------------------------------------------------
// Tolerant scalar parsing
// ---------------------------------------------------------------------------

fn parse_amount(raw: Option<&str>) -> Decimal {
    raw.and_then(|s| Decimal::from_str(s.trim()).ok())
        .unwrap_or(Decimal::ZERO)
}

fn parse_count(raw: Option<&str>) -> u32 {
    raw.and_then(|s| s.trim().parse::<u32>().ok()).unwrap_or(0)
}

/// Dates come as "2025-11-03" or "2025-11-03 21:00:00"; only the day part
/// matters for draw records.
fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    let day = raw?.split_whitespace().next()?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Generation timestamps come with or without a time component.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;
    Some(naive.and_utc())
}

// ---------------------------------------------------------------------------
// Master feeds
// ---------------------------------------------------------------------------

/// Winning-number columns per game. Loto's export prefixes them; the
/// others use bare `n1..nN`.
fn number_columns(game: Game) -> Vec<String> {
    match game {
        Game::Loto => (1..=6).map(|i| format!("LOTO_n{i}")).collect(),
        _ => (1..=game.pick_size()).map(|i| format!("n{i}")).collect(),
    }
}

/// Prize-tier columns per game: (tier, amount column, winners column).
/// Loto3 and Racha pay fixed amounts and carry no tier columns.
fn tier_columns(game: Game) -> &'static [(TierKey, &'static str, &'static str)] {
    match game {
        Game::Loto => &[
            (TierKey::Jackpot, "LOTO_MONTO", "LOTO_GANADORES"),
            (
                TierKey::SuperQuina,
                "SUPER_QUINA_5_ACIERTOS_COMODIN_MONTO",
                "SUPER_QUINA_5_ACIERTOS_COMODIN_GANADORES",
            ),
            (
                TierKey::Quina,
                "QUINA_5_ACIERTOS_MONTO",
                "QUINA_5_ACIERTOS_GANADORES",
            ),
            (
                TierKey::SuperCuaterna,
                "SUPER_CUATERNA_4_ACIERTOS_COMODIN_MONTO",
                "SUPER_CUATERNA_4_ACIERTOS_COMODIN_GANADORES",
            ),
            (
                TierKey::Cuaterna,
                "CUATERNA_4_ACIERTOS_MONTO",
                "CUATERNA_4_ACIERTOS_GANADORES",
            ),
            (
                TierKey::SuperTerna,
                "SUPER_TERNA_3_ACIERTOS_COMODIN_MONTO",
                "SUPER_TERNA_3_ACIERTOS_COMODIN_GANADORES",
            ),
            (
                TierKey::Terna,
                "TERNA_3_ACIERTOS_MONTO",
                "TERNA_3_ACIERTOS_GANADORES",
            ),
            (
                TierKey::SuperDupla,
                "SUPER_DUPLA_2_ACIERTOS_COMODIN_MONTO",
                "SUPER_DUPLA_2_ACIERTOS_COMODIN_GANADORES",
            ),
            (TierKey::AccumulatedPool, "LOTO_POZO_REAL", "LOTO_GANADORES"),
        ],
        Game::Loto4 => &[
            (TierKey::FourPoints, "4_PUNTOS_MONTO", "4_PUNTOS_GANADORES"),
            (TierKey::ThreePoints, "3_PUNTOS_MONTO", "3_PUNTOS_GANADORES"),
            (TierKey::TwoPoints, "2_PUNTOS_MONTO", "2_PUNTOS_GANADORES"),
        ],
        Game::Loto3 | Game::Racha => &[],
    }
}

/// Load one game's draw-history feed into the registry.
///
/// Rows without a draw id are skipped; missing prize columns read as
/// zero. Returns the number of draws ingested.
pub fn load_master(registry: &mut DrawRegistry, game: Game, path: &Path) -> Result<usize> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open master feed: {}", path.display()))?;

    let index = HeaderIndex::new(
        reader
            .headers()
            .with_context(|| format!("Failed to read headers: {}", path.display()))?,
    );
    let num_cols = number_columns(game);
    let tiers = tier_columns(game);

    let mut loaded = 0usize;
    for (line, row) in reader.records().enumerate() {
        let record = match row {
            Ok(r) => r,
            Err(e) => {
                warn!(game = %game, line, error = %e, "skipping unreadable master row");
                continue;
            }
        };

        let Some(draw_id) = index.get(&record, "sorteo").and_then(|s| s.parse::<u32>().ok())
        else {
            debug!(game = %game, line, "master row without a draw id");
            continue;
        };

        let mut draw = DrawRecord::new(draw_id);
        draw.date = parse_date(index.get(&record, "fecha"));

        // A draw is either fully known or unknown. A partial set from
        // corrupt cells must not reach the evaluator: a truncated Racha
        // draw would pay the 0-hit extreme against every play.
        let parsed: Vec<u8> = num_cols
            .iter()
            .filter_map(|col| index.get(&record, col))
            .filter_map(|cell| cell.parse::<u8>().ok())
            .collect();
        draw.winning_numbers = if parsed.len() == game.pick_size() {
            parsed
        } else {
            if !parsed.is_empty() {
                warn!(
                    game = %game,
                    draw_id,
                    got = parsed.len(),
                    expected = game.pick_size(),
                    "partial winning numbers in master row, treating draw as unknown"
                );
            }
            Vec::new()
        };
        if game.has_wildcard() {
            draw.wildcard = index
                .get(&record, "LOTO_comodin")
                .and_then(|c| c.parse::<u8>().ok());
        }

        for (tier, amount_col, winners_col) in tiers {
            draw.set_pool(*tier, parse_amount(index.get(&record, amount_col)));
            draw.set_winners(*tier, parse_count(index.get(&record, winners_col)));
        }

        registry.insert(game, draw);
        loaded += 1;
    }

    info!(game = %game, draws = loaded, path = %path.display(), "master feed loaded");
    Ok(loaded)
}

// ---------------------------------------------------------------------------
// Simulations feed
// ---------------------------------------------------------------------------

/// Load the prediction export. Rows that fail to normalize (bad game tag,
/// bad timestamp, unparseable number-set) are skipped with a warning.
pub fn load_simulations(path: &Path) -> Result<Vec<Prediction>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open simulations feed: {}", path.display()))?;

    let index = HeaderIndex::new(
        reader
            .headers()
            .with_context(|| format!("Failed to read headers: {}", path.display()))?,
    );

    let mut predictions = Vec::new();
    let mut skipped = 0usize;
    for (line, row) in reader.records().enumerate() {
        let record = match row {
            Ok(r) => r,
            Err(e) => {
                warn!(line, error = %e, "skipping unreadable simulation row");
                skipped += 1;
                continue;
            }
        };

        match parse_simulation(&index, &record) {
            Ok(prediction) => predictions.push(prediction),
            Err(reason) => {
                warn!(line, reason, "skipping simulation row");
                skipped += 1;
            }
        }
    }

    info!(
        predictions = predictions.len(),
        skipped,
        path = %path.display(),
        "simulations feed loaded"
    );
    Ok(predictions)
}

fn parse_simulation(
    index: &HeaderIndex,
    record: &csv::StringRecord,
) -> std::result::Result<Prediction, &'static str> {
    let id = index.get(record, "id").ok_or("missing id")?.to_string();
    let generated_at = index
        .get(record, "fecha")
        .and_then(parse_timestamp)
        .ok_or("bad timestamp")?;
    let game = index
        .get(record, "juego")
        .map_or(Ok(Game::Loto), Game::from_str)
        .map_err(|_| "unknown game tag")?;
    let numbers =
        parse_number_set(index.get(record, "numeros").ok_or("missing number set")?)
            .map_err(|_| "bad number set")?;
    let target_draw = index
        .get(record, "objetivo")
        .and_then(|s| s.parse::<u32>().ok())
        .ok_or("bad target draw")?;
    let audit_state = index
        .get(record, "estado")
        .map_or(Ok(AuditState::Pending), AuditState::from_str)
        .map_err(|_| "unknown audit state")?;
    let algorithm_tag = index
        .get(record, "algoritmo")
        .unwrap_or("unknown")
        .to_string();

    Ok(Prediction {
        id,
        generated_at,
        game,
        numbers,
        target_draw,
        algorithm: Algorithm::resolve(&algorithm_tag),
        algorithm_tag,
        audit_state,
        hits: index.get(record, "aciertos").and_then(|s| s.parse().ok()),
        affinity: index.get(record, "score").and_then(|s| s.parse().ok()),
    })
}

// ---------------------------------------------------------------------------
// Plays feed
// ---------------------------------------------------------------------------

/// Load the recorded-plays export. Only rows confirmed as purchased
/// (`jugado == SI`) are kept; a row without a game tag is legacy Loto.
pub fn load_plays(path: &Path) -> Result<Vec<Play>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open plays feed: {}", path.display()))?;

    let index = HeaderIndex::new(
        reader
            .headers()
            .with_context(|| format!("Failed to read headers: {}", path.display()))?,
    );

    let mut plays = Vec::new();
    for (line, row) in reader.records().enumerate() {
        let record = match row {
            Ok(r) => r,
            Err(e) => {
                warn!(line, error = %e, "skipping unreadable play row");
                continue;
            }
        };

        if index.get(&record, "jugado") != Some("SI") {
            continue;
        }

        let game = match index.get(&record, "juego").map_or(Ok(Game::Loto), Game::from_str) {
            Ok(g) => g,
            Err(e) => {
                warn!(line, error = %e, "skipping play row");
                continue;
            }
        };
        let numbers = match index
            .get(&record, "numeros")
            .ok_or("missing number set")
            .and_then(|raw| parse_number_set(raw).map_err(|_| "bad number set"))
        {
            Ok(n) => n,
            Err(reason) => {
                warn!(line, reason, "skipping play row");
                continue;
            }
        };
        let Some(target_draw) = index
            .get(&record, "objetivo")
            .and_then(|s| s.parse::<u32>().ok())
        else {
            warn!(line, "skipping play row without a target draw");
            continue;
        };

        plays.push(Play {
            game,
            numbers,
            target_draw,
        });
    }

    info!(plays = plays.len(), path = %path.display(), "plays feed loaded");
    Ok(plays)
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// One complete, immutable view of all feeds. Rebuilt from scratch on
/// every refresh tick and swapped in whole; settlement never sees a
/// half-loaded state.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub registry: DrawRegistry,
    pub predictions: Vec<Prediction>,
    pub plays: Vec<Play>,
}

impl Snapshot {
    pub fn load(config: &AppConfig) -> Result<Snapshot> {
        let mut registry = DrawRegistry::new();
        for game in Game::ALL {
            load_master(&mut registry, *game, &config.feeds.master_path(*game))?;
        }
        let predictions = load_simulations(&config.feeds.simulations_path())?;
        let plays = load_plays(&config.feeds.plays_path())?;
        Ok(Snapshot {
            registry,
            predictions,
            plays,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
