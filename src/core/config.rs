//! Simulation configuration.
//!
//! The trial driver reads a `SimConfig` at startup. Every field has a
//! default, so a config file only needs to name what it changes:
//!
//! ```
//! use goldfish_engine::core::SimConfig;
//!
//! let config = SimConfig::from_json(r#"{ "max_turns": 8, "trials": 200 }"#).unwrap();
//! assert_eq!(config.max_turns, 8);
//! assert_eq!(config.starting_life, 40);
//! ```

use serde::{Deserialize, Serialize};

use super::error::EngineResult;

/// Settings shared by every trial of a batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Our life total at the start of a trial.
    pub starting_life: i64,

    /// Life of the absent opponent; damage reaching it marks the kill turn.
    pub opponent_life: i64,

    /// Cards in the opening hand.
    pub opening_hand_size: usize,

    /// Hand size enforced at end of turn.
    pub max_hand_size: usize,

    /// Turns played per trial.
    pub max_turns: u32,

    /// Number of independent trials in a batch.
    pub trials: u64,

    /// Base seed; trial seeds derive from it.
    pub seed: u64,

    /// Worker threads. `0` uses the available parallelism.
    pub threads: usize,

    /// Land drops allowed per turn.
    pub land_drops_per_turn: u32,

    /// Draw a card on turn 1.
    pub draw_on_first_turn: bool,

    /// Extra generic cost per previous cast of the leader from its zone.
    pub leader_tax_step: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            starting_life: 40,
            opponent_life: 40,
            opening_hand_size: 7,
            max_hand_size: 7,
            max_turns: 10,
            trials: 1000,
            seed: 0,
            threads: 0,
            land_drops_per_turn: 1,
            draw_on_first_turn: false,
            leader_tax_step: 2,
        }
    }
}

impl SimConfig {
    /// Create a config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from JSON; missing fields keep their defaults.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub fn with_max_turns(mut self, turns: u32) -> Self {
        self.max_turns = turns;
        self
    }

    #[must_use]
    pub fn with_trials(mut self, trials: u64) -> Self {
        self.trials = trials;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    #[must_use]
    pub fn with_starting_life(mut self, life: i64) -> Self {
        self.starting_life = life;
        self
    }

    #[must_use]
    pub fn with_opponent_life(mut self, life: i64) -> Self {
        self.opponent_life = life;
        self
    }

    #[must_use]
    pub fn with_opening_hand_size(mut self, size: usize) -> Self {
        self.opening_hand_size = size;
        self
    }

    /// Worker count to actually use for a batch.
    #[must_use]
    pub fn worker_count(&self) -> usize {
        let requested = if self.threads == 0 {
            std::thread::available_parallelism().map_or(1, |n| n.get())
        } else {
            self.threads
        };
        requested.clamp(1, self.trials.max(1) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SimConfig::new();
        assert_eq!(config.starting_life, 40);
        assert_eq!(config.opening_hand_size, 7);
        assert_eq!(config.land_drops_per_turn, 1);
        assert!(!config.draw_on_first_turn);
    }

    #[test]
    fn test_partial_json() {
        let config = SimConfig::from_json(r#"{ "seed": 9, "draw_on_first_turn": true }"#).unwrap();
        assert_eq!(config.seed, 9);
        assert!(config.draw_on_first_turn);
        assert_eq!(config.max_turns, 10);
    }

    #[test]
    fn test_bad_json() {
        assert!(SimConfig::from_json("{ not json").is_err());
    }

    #[test]
    fn test_worker_count_clamped_to_trials() {
        let config = SimConfig::new().with_trials(2).with_threads(16);
        assert_eq!(config.worker_count(), 2);

        let config = SimConfig::new().with_trials(0).with_threads(4);
        assert_eq!(config.worker_count(), 1);
    }
}
