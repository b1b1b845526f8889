//! Settlement aggregator — turns a snapshot of predictions, plays, and
//! draw history into per-draw financial summaries and a running ledger.
//!
//! Pure aggregation over immutable inputs. Everything here is total: a
//! prediction it cannot settle is skipped or settled at zero, never an
//! error.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::cost::CostModel;
use crate::payout::PrizeEvaluator;
use crate::registry::DrawRegistry;
use crate::types::{Algorithm, Game, Outcome, Play, Prediction};

// ---------------------------------------------------------------------------
// Output shapes
// ---------------------------------------------------------------------------

/// One audited prediction that actually won something.
#[derive(Debug, Clone, Serialize)]
pub struct WinningRow {
    pub prediction: Prediction,
    pub outcome: Outcome,
}

/// The financial summary of one draw for one game.
///
/// "Hypothetical" covers every audited prediction targeting the draw, as
/// if each had been purchased. "Real" covers only recorded plays.
#[derive(Debug, Clone, Serialize)]
pub struct DrawSettlement {
    pub draw_id: u32,
    pub hypothetical_investment: Decimal,
    pub hypothetical_return: Decimal,
    pub real_investment: Decimal,
    pub real_return: Decimal,
    /// Winning predictions, amount descending, ties broken by most recent
    /// generation time first.
    pub winning_rows: Vec<WinningRow>,
}

impl DrawSettlement {
    pub fn hypothetical_net(&self) -> Decimal {
        self.hypothetical_return - self.hypothetical_investment
    }

    pub fn real_net(&self) -> Decimal {
        self.real_return - self.real_investment
    }
}

/// Per-algorithm slice of a ledger row.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AlgoTotals {
    pub investment: Decimal,
    pub ret: Decimal,
}

/// One draw's line in the historical ledger.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerRow {
    pub draw_id: u32,
    pub prediction_count: u32,
    pub winner_count: u32,
    pub loser_count: u32,
    pub investment: Decimal,
    pub ret: Decimal,
    /// Per-algorithm breakdown. `Algorithm::Other` is never keyed here;
    /// its money still lands in the row totals.
    pub by_algorithm: BTreeMap<Algorithm, AlgoTotals>,
    /// `ret - investment` for this draw alone.
    pub net: Decimal,
    /// Running net carried forward in ascending draw order.
    pub balance: Decimal,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Settles predictions and plays against the draw registry.
#[derive(Debug, Clone)]
pub struct SettlementEngine {
    costs: CostModel,
    evaluator: PrizeEvaluator,
}

impl Default for SettlementEngine {
    fn default() -> Self {
        SettlementEngine::new(CostModel::default())
    }
}

impl SettlementEngine {
    pub fn new(costs: CostModel) -> Self {
        let evaluator = PrizeEvaluator::from_costs(&costs);
        SettlementEngine { costs, evaluator }
    }

    /// Settle one draw of one game.
    ///
    /// Audited predictions targeting the draw make up the hypothetical
    /// side; recorded plays matched by (game, draw) make up the real side.
    /// Predictions with a wrong-sized number-set are skipped outright, on
    /// both sides of the ledger. A draw whose winning numbers are still
    /// unknown costs money and returns nothing.
    pub fn settle_draw(
        &self,
        registry: &DrawRegistry,
        game: Game,
        draw_id: u32,
        predictions: &[Prediction],
        plays: &[Play],
    ) -> DrawSettlement {
        let record = registry.record(game, draw_id);

        let mut hypothetical_investment = Decimal::ZERO;
        let mut hypothetical_return = Decimal::ZERO;
        let mut winning_rows: Vec<WinningRow> = Vec::new();

        for prediction in predictions
            .iter()
            .filter(|p| p.game == game && p.target_draw == draw_id && p.is_audited())
        {
            if prediction.numbers.len() != game.pick_size() {
                debug!(
                    id = %prediction.id,
                    got = prediction.numbers.len(),
                    expected = game.pick_size(),
                    "skipping prediction with wrong-sized number set"
                );
                continue;
            }
            hypothetical_investment += self.costs.cost(game, &prediction.numbers);
            let outcome = self.evaluator.evaluate(game, &prediction.numbers, record);
            if outcome.is_winning() {
                hypothetical_return += outcome.amount;
                winning_rows.push(WinningRow {
                    prediction: prediction.clone(),
                    outcome,
                });
            }
        }

        winning_rows.sort_by(|a, b| {
            b.outcome
                .amount
                .cmp(&a.outcome.amount)
                .then(b.prediction.generated_at.cmp(&a.prediction.generated_at))
        });

        let mut real_investment = Decimal::ZERO;
        let mut real_return = Decimal::ZERO;
        for play in plays
            .iter()
            .filter(|p| p.game == game && p.target_draw == draw_id)
        {
            if play.numbers.len() != game.pick_size() {
                debug!(
                    draw_id,
                    got = play.numbers.len(),
                    expected = game.pick_size(),
                    "skipping play with wrong-sized number set"
                );
                continue;
            }
            real_investment += self.costs.cost(game, &play.numbers);
            real_return += self.evaluator.evaluate(game, &play.numbers, record).amount;
        }

        DrawSettlement {
            draw_id,
            hypothetical_investment,
            hypothetical_return,
            real_investment,
            real_return,
            winning_rows,
        }
    }

    /// Build the historical ledger for one game: one row per targeted
    /// draw, ascending, with a cumulative balance carried forward. Callers
    /// wanting newest-first reverse the result.
    pub fn rollup(
        &self,
        registry: &DrawRegistry,
        game: Game,
        predictions: &[Prediction],
    ) -> Vec<LedgerRow> {
        // Group audited, well-formed predictions by target draw.
        let mut by_draw: BTreeMap<u32, Vec<&Prediction>> = BTreeMap::new();
        for prediction in predictions.iter().filter(|p| p.game == game && p.is_audited()) {
            if prediction.numbers.len() != game.pick_size() {
                continue;
            }
            by_draw.entry(prediction.target_draw).or_default().push(prediction);
        }

        let mut ledger = Vec::with_capacity(by_draw.len());
        let mut balance = Decimal::ZERO;

        for (draw_id, group) in by_draw {
            let record = registry.record(game, draw_id);

            let mut investment = Decimal::ZERO;
            let mut ret = Decimal::ZERO;
            let mut winner_count = 0u32;
            let mut by_algorithm: BTreeMap<Algorithm, AlgoTotals> = BTreeMap::new();

            for prediction in &group {
                let cost = self.costs.cost(game, &prediction.numbers);
                let outcome = self.evaluator.evaluate(game, &prediction.numbers, record);

                investment += cost;
                ret += outcome.amount;
                if outcome.is_winning() {
                    winner_count += 1;
                }

                if prediction.algorithm != Algorithm::Other {
                    let slot = by_algorithm.entry(prediction.algorithm).or_default();
                    slot.investment += cost;
                    slot.ret += outcome.amount;
                }
            }

            let net = ret - investment;
            balance += net;

            ledger.push(LedgerRow {
                draw_id,
                prediction_count: group.len() as u32,
                winner_count,
                loser_count: group.len() as u32 - winner_count,
                investment,
                ret,
                by_algorithm,
                net,
                balance,
            });
        }

        ledger
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::DrawRecord;
    use crate::types::AuditState;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn make_prediction(
        id: &str,
        game: Game,
        numbers: Vec<u8>,
        target_draw: u32,
        ts_secs: i64,
    ) -> Prediction {
        Prediction {
            id: id.to_string(),
            generated_at: Utc.timestamp_opt(ts_secs, 0).unwrap(),
            game,
            numbers,
            target_draw,
            algorithm: Algorithm::Gauss,
            algorithm_tag: "gauss_v2".to_string(),
            audit_state: AuditState::Audited,
            hits: None,
            affinity: None,
        }
    }

    fn make_loto3_registry(draw_id: u32, winning: Vec<u8>) -> DrawRegistry {
        let mut registry = DrawRegistry::new();
        let mut record = DrawRecord::new(draw_id);
        record.winning_numbers = winning;
        registry.insert(Game::Loto3, record);
        registry
    }

    #[test]
    fn test_settle_draw_hypothetical_totals() {
        let registry = make_loto3_registry(900, vec![4, 7, 9]);
        let engine = SettlementEngine::default();

        let predictions = vec![
            // Terminación only: 4x stake = 400
            make_prediction("a", Game::Loto3, vec![1, 2, 9], 900, 10),
            // No win
            make_prediction("b", Game::Loto3, vec![1, 2, 3], 900, 20),
        ];

        let s = engine.settle_draw(&registry, Game::Loto3, 900, &predictions, &[]);
        // Both distinct triples: 3 sub-bets + trio each = 400 per play
        assert_eq!(s.hypothetical_investment, dec!(800));
        assert_eq!(s.hypothetical_return, dec!(400));
        assert_eq!(s.hypothetical_net(), dec!(-400));
        assert_eq!(s.winning_rows.len(), 1);
        assert_eq!(s.winning_rows[0].prediction.id, "a");
    }

    #[test]
    fn test_settle_draw_skips_wrong_sized_sets_entirely() {
        let registry = make_loto3_registry(900, vec![4, 7, 9]);
        let engine = SettlementEngine::default();

        let predictions = vec![make_prediction("bad", Game::Loto3, vec![4, 7], 900, 10)];
        let s = engine.settle_draw(&registry, Game::Loto3, 900, &predictions, &[]);
        assert_eq!(s.hypothetical_investment, Decimal::ZERO);
        assert_eq!(s.hypothetical_return, Decimal::ZERO);
    }

    #[test]
    fn test_settle_draw_unknown_numbers_costs_but_returns_nothing() {
        // Registry has no record for the draw at all
        let registry = DrawRegistry::new();
        let engine = SettlementEngine::default();

        let predictions = vec![make_prediction("a", Game::Loto3, vec![4, 7, 9], 901, 10)];
        let s = engine.settle_draw(&registry, Game::Loto3, 901, &predictions, &[]);
        assert_eq!(s.hypothetical_investment, dec!(400));
        assert_eq!(s.hypothetical_return, Decimal::ZERO);
        assert!(s.winning_rows.is_empty());
    }

    #[test]
    fn test_settle_draw_ignores_pending_predictions() {
        let registry = make_loto3_registry(900, vec![4, 7, 9]);
        let engine = SettlementEngine::default();

        let mut pending = make_prediction("p", Game::Loto3, vec![4, 7, 9], 900, 10);
        pending.audit_state = AuditState::Pending;
        let s = engine.settle_draw(&registry, Game::Loto3, 900, &[pending], &[]);
        assert_eq!(s.hypothetical_investment, Decimal::ZERO);
        assert_eq!(s.hypothetical_return, Decimal::ZERO);
    }

    #[test]
    fn test_winning_rows_sorted_by_amount_then_recency() {
        let registry = make_loto3_registry(900, vec![4, 7, 9]);
        let engine = SettlementEngine::default();

        let predictions = vec![
            // Terminación: 400, older
            make_prediction("old", Game::Loto3, vec![1, 2, 9], 900, 10),
            // Terminación: 400, newer
            make_prediction("new", Game::Loto3, vec![3, 2, 9], 900, 20),
            // Back pair + terminación: 2400
            make_prediction("big", Game::Loto3, vec![1, 7, 9], 900, 5),
        ];

        let s = engine.settle_draw(&registry, Game::Loto3, 900, &predictions, &[]);
        let ids: Vec<&str> = s.winning_rows.iter().map(|r| r.prediction.id.as_str()).collect();
        assert_eq!(ids, vec!["big", "new", "old"]);
    }

    #[test]
    fn test_settle_draw_real_side_matches_plays_only() {
        let registry = make_loto3_registry(900, vec![4, 7, 9]);
        let engine = SettlementEngine::default();

        let plays = vec![
            Play {
                game: Game::Loto3,
                numbers: vec![4, 7, 9],
                target_draw: 900,
            },
            // Wrong draw, ignored
            Play {
                game: Game::Loto3,
                numbers: vec![4, 7, 9],
                target_draw: 901,
            },
        ];

        // Wrong-sized play is skipped on both sides of the real ledger
        let mut with_bad = plays.clone();
        with_bad.push(Play {
            game: Game::Loto3,
            numbers: vec![4, 7],
            target_draw: 900,
        });

        let s = engine.settle_draw(&registry, Game::Loto3, 900, &[], &with_bad);
        assert_eq!(s.real_investment, dec!(400));
        // Exacta 400x + trio azar 65x = 465 x 100
        assert_eq!(s.real_return, dec!(46500));
        assert_eq!(s.real_net(), dec!(46100));
    }

    #[test]
    fn test_rollup_carries_cumulative_balance() {
        // Three draws; the middle one pays
        let mut registry = DrawRegistry::new();
        for (draw, winning) in [(900u32, vec![4, 7, 9]), (901, vec![1, 1, 1]), (902, vec![5, 5, 5])] {
            let mut record = DrawRecord::new(draw);
            record.winning_numbers = winning;
            registry.insert(Game::Loto3, record);
        }
        let engine = SettlementEngine::default();

        let predictions = vec![
            make_prediction("a", Game::Loto3, vec![1, 2, 3], 900, 10), // lose 400
            make_prediction("b", Game::Loto3, vec![1, 1, 2], 901, 11), // front pair: 2000, cost 400
            make_prediction("c", Game::Loto3, vec![6, 6, 6], 902, 12), // lose 300
        ];

        let ledger = engine.rollup(&registry, Game::Loto3, &predictions);
        assert_eq!(ledger.len(), 3);
        assert_eq!(
            ledger.iter().map(|r| r.draw_id).collect::<Vec<_>>(),
            vec![900, 901, 902]
        );

        assert_eq!(ledger[0].net, dec!(-400));
        assert_eq!(ledger[0].balance, dec!(-400));
        assert_eq!(ledger[1].net, dec!(1600));
        assert_eq!(ledger[1].balance, dec!(1200));
        // Triple repeat has no trio sub-bet: cost 300
        assert_eq!(ledger[2].net, dec!(-300));
        assert_eq!(ledger[2].balance, dec!(900));

        assert_eq!(ledger[1].winner_count, 1);
        assert_eq!(ledger[1].loser_count, 0);
        assert_eq!(ledger[0].winner_count, 0);
        assert_eq!(ledger[0].loser_count, 1);
    }

    #[test]
    fn test_rollup_excludes_other_from_breakdown_but_not_totals() {
        let registry = make_loto3_registry(900, vec![4, 7, 9]);
        let engine = SettlementEngine::default();

        let mut known = make_prediction("k", Game::Loto3, vec![1, 2, 3], 900, 10);
        known.algorithm = Algorithm::Gauss;
        let mut other = make_prediction("o", Game::Loto3, vec![1, 2, 3], 900, 11);
        other.algorithm = Algorithm::Other;
        other.algorithm_tag = "experimental_x".to_string();

        let ledger = engine.rollup(&registry, Game::Loto3, &[known, other]);
        assert_eq!(ledger.len(), 1);
        let row = &ledger[0];

        assert_eq!(row.prediction_count, 2);
        assert_eq!(row.investment, dec!(800));
        assert!(!row.by_algorithm.contains_key(&Algorithm::Other));
        assert_eq!(row.by_algorithm[&Algorithm::Gauss].investment, dec!(400));
    }

    #[test]
    fn test_rollup_breakdown_sums_to_totals_when_all_known() {
        let registry = make_loto3_registry(900, vec![4, 7, 9]);
        let engine = SettlementEngine::default();

        let mut a = make_prediction("a", Game::Loto3, vec![1, 2, 9], 900, 10);
        a.algorithm = Algorithm::Markov;
        let b = make_prediction("b", Game::Loto3, vec![1, 2, 3], 900, 11);

        let ledger = engine.rollup(&registry, Game::Loto3, &[a, b]);
        let row = &ledger[0];
        let breakdown_inv: Decimal = row.by_algorithm.values().map(|t| t.investment).sum();
        let breakdown_ret: Decimal = row.by_algorithm.values().map(|t| t.ret).sum();
        assert_eq!(breakdown_inv, row.investment);
        assert_eq!(breakdown_ret, row.ret);
    }
}
