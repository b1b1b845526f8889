//! SORTEO — Lottery prediction settlement and audit engine
//!
//! Entry point. Loads configuration, initialises structured logging, and
//! runs the ingest→settle loop: on every tick the CSV feeds are re-read
//! into a fresh snapshot and each game's ledger is recomputed and logged.
//! Graceful shutdown on ctrl-c.

use anyhow::Result;
use std::time::Duration;
use tracing::{error, info};

use sorteo::config;
use sorteo::ingest::Snapshot;
use sorteo::report::{self, GameReport, PassReport};
use sorteo::settlement::SettlementEngine;
use sorteo::types::Game;

const BANNER: &str = r#"
 ____  ___  ____ _____ _____ ___
/ ___|/ _ \|  _ \_   _| ____/ _ \
\___ \ | | | |_) || | |  _|| | | |
 ___) | |_| |  _ < | | | |__| |_| |
|____/ \___/|_| \_\|_| |_____\___/

  Settlement & Audit Engine
  v0.1.0
"#;

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = config::AppConfig::load("config.toml")?;

    init_logging();

    println!("{BANNER}");
    info!(
        refresh_interval_secs = cfg.engine.refresh_interval_secs,
        data_dir = %cfg.feeds.data_dir.display(),
        "SORTEO starting up"
    );

    let engine = SettlementEngine::new(cfg.costs.clone());

    let mut interval = tokio::time::interval(Duration::from_secs(cfg.engine.refresh_interval_secs));

    loop {
        tokio::select! {
            _ = interval.tick() => {
                match Snapshot::load(&cfg) {
                    Ok(snapshot) => run_pass(&engine, &snapshot),
                    Err(e) => {
                        error!(error = %e, "Feed refresh failed — keeping previous results");
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received.");
                break;
            }
        }
    }

    info!("SORTEO shut down cleanly.");
    Ok(())
}

/// One settlement pass over a freshly loaded snapshot: per game, recompute
/// the full ledger, settle the latest targeted draw, log the bottom line,
/// and persist the whole pass as a JSON report.
fn run_pass(engine: &SettlementEngine, snapshot: &Snapshot) {
    let mut games = Vec::with_capacity(Game::ALL.len());

    for game in Game::ALL {
        let ledger = engine.rollup(&snapshot.registry, *game, &snapshot.predictions);
        let Some(last) = ledger.last() else {
            info!(game = %game, "no audited predictions");
            games.push(GameReport {
                game: *game,
                ledger,
                latest: None,
            });
            continue;
        };

        info!(
            game = %game,
            draws = ledger.len(),
            balance = %last.balance,
            "ledger recomputed"
        );

        let settlement = engine.settle_draw(
            &snapshot.registry,
            *game,
            last.draw_id,
            &snapshot.predictions,
            &snapshot.plays,
        );
        info!(
            game = %game,
            draw = settlement.draw_id,
            hypothetical_net = %settlement.hypothetical_net(),
            real_net = %settlement.real_net(),
            winners = settlement.winning_rows.len(),
            "latest draw settled"
        );
        for row in &settlement.winning_rows {
            info!(
                game = %game,
                id = %row.prediction.id,
                algorithm = %row.prediction.algorithm,
                amount = %row.outcome.amount,
                category = %row.outcome.category,
                "winning prediction"
            );
        }

        games.push(GameReport {
            game: *game,
            ledger,
            latest: Some(settlement),
        });
    }

    if let Err(e) = report::save_report(&PassReport::new(games), None) {
        error!(error = %e, "Failed to save report");
    }
}

/// Structured logging via tracing. `RUST_LOG` overrides the default
/// filter; `SORTEO_LOG_JSON` switches to JSON output for ingestion into
/// log pipelines.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("sorteo=info"));

    if std::env::var("SORTEO_LOG_JSON").is_ok() {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt().with_env_filter(env_filter).with_target(true).init();
    }
}
