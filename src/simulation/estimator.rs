//! Monte Carlo estimate of the draw probabilities for one configuration.
//!
//! Iterations run in fixed-size batches. Batch `i` draws from its own
//! generator derived from `(seed, i)`, so a seeded estimate gives the same
//! numbers whether the batches run on the rayon pool or one after another.

use crate::hypergeometric::{exact_result, ExactResult};
use crate::rng::GameRng;
use crate::simulation::cancel::CancelToken;
use crate::simulation::config::{ConfigError, SimulationConfig};
use crate::simulation::deck::DeckError;
use crate::simulation::engine::run_game;
use crate::simulation::mulligan::{MulliganPolicy, MAX_MULLIGANS};
use log::debug;
use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;

/// Games simulated per generator stream
pub const BATCH_SIZE: usize = 4096;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimulationError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Deck error: {0}")]
    Deck(#[from] DeckError),
    #[error("Cannot compute probabilities from 0 iterations")]
    NoIterations,
    #[error("Simulation cancelled")]
    Cancelled,
}

/// Number of games kept at each hand size
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MulliganHistogram {
    pub no_mulligan: usize,
    #[serde(rename = "mulligans_to_6")]
    pub to_six: usize,
    #[serde(rename = "mulligans_to_5")]
    pub to_five: usize,
    #[serde(rename = "mulligans_to_4")]
    pub to_four: usize,
}

impl MulliganHistogram {
    /// Count one game kept after `depth` mulligans
    pub fn record(&mut self, depth: u32) {
        match depth {
            0 => self.no_mulligan += 1,
            1 => self.to_six += 1,
            2 => self.to_five += 1,
            3 => self.to_four += 1,
            _ => unreachable!("mulligan depth {} exceeds {}", depth, MAX_MULLIGANS),
        }
    }

    /// Games that took exactly `depth` mulligans
    pub fn count(&self, depth: u32) -> usize {
        match depth {
            0 => self.no_mulligan,
            1 => self.to_six,
            2 => self.to_five,
            3 => self.to_four,
            _ => 0,
        }
    }

    pub fn total(&self) -> usize {
        self.no_mulligan + self.to_six + self.to_five + self.to_four
    }

    fn merge(self, other: Self) -> Self {
        MulliganHistogram {
            no_mulligan: self.no_mulligan + other.no_mulligan,
            to_six: self.to_six + other.to_six,
            to_five: self.to_five + other.to_five,
            to_four: self.to_four + other.to_four,
        }
    }
}

/// Running counts over a set of games
#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    games: usize,
    count_desired: usize,
    count_any_land: usize,
    mulligans: MulliganHistogram,
}

impl Tally {
    fn merge(self, other: Self) -> Self {
        Tally {
            games: self.games + other.games,
            count_desired: self.count_desired + other.count_desired,
            count_any_land: self.count_any_land + other.count_any_land,
            mulligans: self.mulligans.merge(other.mulligans),
        }
    }
}

/// Probabilities and counts over every simulated game
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AggregateResult {
    pub iterations: usize,
    pub count_desired: usize,
    pub count_any_land: usize,
    #[serde(rename = "prob_desired_land")]
    pub prob_desired: f64,
    pub prob_any_land: f64,
    pub mulligan_counts: MulliganHistogram,
}

impl AggregateResult {
    fn from_tally(tally: Tally) -> Result<Self, SimulationError> {
        if tally.games == 0 {
            return Err(SimulationError::NoIterations);
        }
        let n = tally.games as f64;
        Ok(AggregateResult {
            iterations: tally.games,
            count_desired: tally.count_desired,
            count_any_land: tally.count_any_land,
            prob_desired: tally.count_desired as f64 / n,
            prob_any_land: tally.count_any_land as f64 / n,
            mulligan_counts: tally.mulligans,
        })
    }
}

/// Inputs and outputs of one estimate, as written by `simulate --json`
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    #[serde(rename = "in")]
    pub config: SimulationConfig,
    #[serde(rename = "out")]
    pub result: AggregateResult,
    /// Closed-form probabilities when mulligans are off
    pub exact: Option<ExactResult>,
}

impl SimulationReport {
    pub fn new(config: SimulationConfig, result: AggregateResult) -> Self {
        SimulationReport {
            exact: exact_result(&config),
            config,
            result,
        }
    }
}

/// Repeats single games and aggregates hit counts
#[derive(Debug, Clone, Copy)]
pub struct MonteCarloEstimator {
    policy: MulliganPolicy,
    parallel: bool,
}

impl Default for MonteCarloEstimator {
    fn default() -> Self {
        MonteCarloEstimator {
            policy: MulliganPolicy::default(),
            parallel: true,
        }
    }
}

impl MonteCarloEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run batches on the rayon pool (default) or on the calling thread
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    /// Estimate `config` with a generator per batch derived from `seed`
    pub fn estimate(
        &self,
        config: &SimulationConfig,
        seed: u64,
        cancel: &CancelToken,
    ) -> Result<AggregateResult, SimulationError> {
        let iterations = config.iterations();
        let batches = iterations.div_ceil(BATCH_SIZE);
        debug!(
            "Estimating {} ({} iterations in {} batches, seed {})",
            config.describe(),
            iterations,
            batches,
            seed
        );

        let run = |batch: usize| -> Result<Tally, SimulationError> {
            if cancel.is_cancelled() {
                return Err(SimulationError::Cancelled);
            }
            let games = BATCH_SIZE.min(iterations - batch * BATCH_SIZE);
            let mut rng = GameRng::for_stream(seed, batch as u64);
            Ok(self.run_games(config, games, &mut rng)?)
        };

        let tally = if self.parallel {
            (0..batches)
                .into_par_iter()
                .map(run)
                .try_reduce(Tally::default, |a, b| Ok(a.merge(b)))?
        } else {
            (0..batches).try_fold(Tally::default(), |acc, batch| {
                run(batch).map(|tally| acc.merge(tally))
            })?
        };

        AggregateResult::from_tally(tally)
    }

    /// Estimate `config` sequentially from a caller-supplied generator
    pub fn estimate_with_rng(
        &self,
        config: &SimulationConfig,
        rng: &mut GameRng,
    ) -> Result<AggregateResult, SimulationError> {
        let tally = self.run_games(config, config.iterations(), rng)?;
        AggregateResult::from_tally(tally)
    }

    fn run_games(&self, config: &SimulationConfig, games: usize, rng: &mut GameRng) -> Result<Tally, DeckError> {
        let mut tally = Tally::default();
        for _ in 0..games {
            let result = run_game(config, &self.policy, rng)?;
            tally.games += 1;
            if result.hit_desired {
                tally.count_desired += 1;
            }
            if result.hit_any_land {
                tally.count_any_land += 1;
            }
            tally.mulligans.record(result.mulligan_depth);
        }
        Ok(tally)
    }
}
