//! Batches of independent trials run across worker threads.
//!
//! Every trial owns its board and RNG, and trial seeds depend only on the
//! base seed and the trial index. The summary is therefore the same for
//! any number of workers.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::driver::{GoldfishDriver, TrialReport};
use crate::cards::{CardCatalog, DeckList};
use crate::core::{EngineResult, SimConfig};

/// Aggregate results of a batch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrialSummary {
    pub trials: u64,

    /// Mean cumulative damage at the end of each turn.
    pub mean_damage_by_turn: Vec<f64>,

    /// Mean kill turn over the trials that killed.
    pub mean_kill_turn: Option<f64>,

    /// Fraction of trials that killed within the turn limit.
    pub kill_rate: f64,

    pub mean_mana_spent: f64,
    pub mean_cards_drawn: f64,
}

impl TrialSummary {
    /// Aggregate reports; their order does not matter.
    pub fn from_reports(reports: &[TrialReport]) -> Self {
        let n = reports.len() as f64;
        let turns = reports.iter().map(|r| r.damage_by_turn.len()).max().unwrap_or(0);
        let mean = |total: f64| if reports.is_empty() { 0.0 } else { total / n };

        let mean_damage_by_turn = (0..turns)
            .map(|t| {
                let total: i64 = reports
                    .iter()
                    .map(|r| r.damage_by_turn.get(t).copied().unwrap_or(0))
                    .sum();
                mean(total as f64)
            })
            .collect();

        let kills: Vec<u32> = reports.iter().filter_map(|r| r.kill_turn).collect();
        let mean_kill_turn = if kills.is_empty() {
            None
        } else {
            Some(kills.iter().map(|&t| f64::from(t)).sum::<f64>() / kills.len() as f64)
        };

        Self {
            trials: reports.len() as u64,
            mean_damage_by_turn,
            mean_kill_turn,
            kill_rate: mean(kills.len() as f64),
            mean_mana_spent: mean(reports.iter().map(|r| f64::from(r.mana_spent)).sum()),
            mean_cards_drawn: mean(reports.iter().map(|r| f64::from(r.cards_drawn)).sum()),
        }
    }
}

/// Runs `config.trials` trials of one deck.
pub struct TrialRunner {
    catalog: CardCatalog,
    deck: DeckList,
    config: SimConfig,
}

impl TrialRunner {
    /// Create a runner, checking every card of the deck against the catalog.
    pub fn new(catalog: CardCatalog, deck: DeckList, config: SimConfig) -> EngineResult<Self> {
        for name in deck.cards.iter().chain(deck.leader.iter()) {
            catalog.resolve(name)?;
        }
        Ok(Self { catalog, deck, config })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Run every trial and return the reports in index order.
    pub fn run_reports(&self) -> EngineResult<Vec<TrialReport>> {
        let workers = self.config.worker_count() as u64;
        let trials = self.config.trials;
        let driver = GoldfishDriver::new(&self.catalog, &self.deck, &self.config);
        info!(trials, workers, seed = self.config.seed, "running trials");

        let results: Vec<EngineResult<Vec<TrialReport>>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..workers)
                .map(|worker| {
                    let driver = &driver;
                    scope.spawn(move || {
                        let reports = (worker..trials)
                            .step_by(workers as usize)
                            .map(|index| driver.run_trial(index))
                            .collect::<EngineResult<Vec<_>>>();
                        debug!(worker, "worker done");
                        reports
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
                .collect()
        });

        let mut reports = Vec::with_capacity(trials as usize);
        for batch in results {
            reports.extend(batch?);
        }
        reports.sort_by_key(|r| r.index);
        Ok(reports)
    }

    /// Run every trial and aggregate.
    pub fn run(&self) -> EngineResult<TrialSummary> {
        let reports = self.run_reports()?;
        let summary = TrialSummary::from_reports(&reports);
        info!(
            trials = summary.trials,
            kill_rate = summary.kill_rate,
            mean_kill_turn = ?summary.mean_kill_turn,
            "trials finished"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardDefinition, Category};
    use crate::core::EngineError;
    use crate::mana::{ManaSymbol, ManaUnit};

    fn runner(threads: usize) -> TrialRunner {
        let mut catalog = CardCatalog::new();
        catalog.register(
            CardDefinition::new("Mountain", Category::Land)
                .basic()
                .producing(ManaUnit::single(ManaSymbol::Red)),
        );
        catalog.register(
            CardDefinition::new("Goblin", Category::Creature)
                .with_cost("R")
                .with_stats(2, 1),
        );
        let deck = DeckList::new().with_card("Mountain", 17).with_card("Goblin", 23);
        let config = SimConfig::new()
            .with_seed(11)
            .with_trials(12)
            .with_threads(threads)
            .with_max_turns(5);
        TrialRunner::new(catalog, deck, config).unwrap()
    }

    #[test]
    fn test_summary_independent_of_threads() {
        let one = runner(1).run().unwrap();
        let four = runner(4).run().unwrap();
        assert_eq!(one, four);
        assert_eq!(one.trials, 12);
        assert_eq!(one.mean_damage_by_turn.len(), 5);
    }

    #[test]
    fn test_reports_in_index_order() {
        let reports = runner(3).run_reports().unwrap();
        let indices: Vec<u64> = reports.iter().map(|r| r.index).collect();
        assert_eq!(indices, (0..12).collect::<Vec<_>>());
    }

    #[test]
    fn test_unknown_card_rejected() {
        let deck = DeckList::new().with_card("Nope", 1);
        let err = TrialRunner::new(CardCatalog::new(), deck, SimConfig::new()).err();
        assert_eq!(err, Some(EngineError::UnknownCard("Nope".to_string())));
    }

    #[test]
    fn test_empty_summary() {
        let summary = TrialSummary::from_reports(&[]);
        assert_eq!(summary.trials, 0);
        assert_eq!(summary.kill_rate, 0.0);
        assert_eq!(summary.mean_kill_turn, None);
    }
}
