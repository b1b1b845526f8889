//! Report persistence.
//!
//! Writes the result of a settlement pass to a JSON file so dashboards
//! and spreadsheets can pick it up without talking to the engine.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use tracing::debug;

use crate::settlement::{DrawSettlement, LedgerRow};
use crate::types::Game;

/// Default report file path.
const DEFAULT_REPORT_FILE: &str = "sorteo_report.json";

/// One game's slice of a settlement pass.
#[derive(Debug, Clone, Serialize)]
pub struct GameReport {
    pub game: Game,
    /// Full historical ledger, ascending draw order.
    pub ledger: Vec<LedgerRow>,
    /// Detailed settlement of the most recent targeted draw, when any.
    pub latest: Option<DrawSettlement>,
}

/// Everything one refresh tick produced.
#[derive(Debug, Clone, Serialize)]
pub struct PassReport {
    pub generated_at: DateTime<Utc>,
    pub games: Vec<GameReport>,
}

impl PassReport {
    pub fn new(games: Vec<GameReport>) -> Self {
        PassReport {
            generated_at: Utc::now(),
            games,
        }
    }
}

/// Write a pass report to a JSON file.
pub fn save_report(report: &PassReport, path: Option<&str>) -> Result<()> {
    let path = path.unwrap_or(DEFAULT_REPORT_FILE);
    let json = serde_json::to_string_pretty(report).context("Failed to serialise report")?;

    std::fs::write(path, &json).context(format!("Failed to write report to {path}"))?;

    debug!(path, games = report.games.len(), "Report saved");
    Ok(())
}

/// Delete the report file (for testing or reset).
pub fn delete_report(path: Option<&str>) -> Result<()> {
    let path = path.unwrap_or(DEFAULT_REPORT_FILE);
    if Path::new(path).exists() {
        std::fs::remove_file(path).context(format!("Failed to delete report file {path}"))?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path() -> String {
        let mut p = std::env::temp_dir();
        p.push(format!("sorteo_test_report_{}.json", uuid::Uuid::new_v4()));
        p.to_string_lossy().to_string()
    }

    #[test]
    fn test_save_and_delete() {
        let path = temp_path();
        let report = PassReport::new(vec![GameReport {
            game: Game::Loto3,
            ledger: vec![],
            latest: None,
        }]);

        save_report(&report, Some(&path)).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"Loto3\""));
        assert!(written.contains("generated_at"));

        delete_report(Some(&path)).unwrap();
        assert!(!Path::new(&path).exists());
    }

    #[test]
    fn test_delete_missing_file_is_fine() {
        delete_report(Some(&temp_path())).unwrap();
    }
}
