use crate::hypergeometric::exact_result;
use crate::rng::mix_seed;
use crate::simulation::cancel::CancelToken;
use crate::simulation::config::{ConfigError, SimulationConfig};
use crate::simulation::estimator::{MonteCarloEstimator, SimulationError};
use log::{debug, info, warn};
use rayon::prelude::*;
use std::time::Instant;

/// First turn column of a curve table
pub const FIRST_TABLE_TURN: u32 = 2;

/// Inclusive range of land counts swept by a curve table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LandRange {
    low: u32,
    high: u32,
}

impl LandRange {
    pub fn new(low: u32, high: u32) -> Result<Self, ConfigError> {
        if low > high {
            return Err(ConfigError::EmptyLandRange { low, high });
        }
        Ok(LandRange { low, high })
    }

    pub fn low(&self) -> u32 {
        self.low
    }

    pub fn high(&self) -> u32 {
        self.high
    }

    pub fn len(&self) -> usize {
        ((self.high - self.low) as usize).saturating_add(1)
    }

    pub fn is_empty(&self) -> bool {
        self.low > self.high
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> {
        self.low..=self.high
    }
}

/// P(at least T lands by turn T): rows are land counts ascending, columns turns 2..=turns
#[derive(Debug, Clone, PartialEq)]
pub struct CurveTable {
    pub lands: LandRange,
    pub turns: u32,
    pub rows: Vec<Vec<f64>>,
}

impl CurveTable {
    pub fn row(&self, n_lands: u32) -> Option<&[f64]> {
        n_lands
            .checked_sub(self.lands.low)
            .and_then(|idx| self.rows.get(idx as usize))
            .map(|row| row.as_slice())
    }

    pub fn cell(&self, n_lands: u32, turn: u32) -> Option<f64> {
        let col = turn.checked_sub(FIRST_TABLE_TURN)? as usize;
        self.row(n_lands)?.get(col).copied()
    }
}

/// One (land count, turn) cell to evaluate
#[derive(Debug, Clone, Copy)]
struct Cell {
    row: usize,
    col: usize,
    config: SimulationConfig,
}

/// Sweeps land counts and turns with desired lands = all lands
#[derive(Debug, Clone)]
pub struct CurveTableBuilder {
    deck_size: u32,
    lands: LandRange,
    turns: u32,
    on_play: bool,
    consider_mulligans: bool,
    iterations: usize,
    seed: u64,
    exact: bool,
    estimator: MonteCarloEstimator,
}

impl CurveTableBuilder {
    pub fn new(deck_size: u32, lands: LandRange, turns: u32) -> Self {
        CurveTableBuilder {
            deck_size,
            lands,
            turns,
            on_play: false,
            consider_mulligans: true,
            iterations: 10_000,
            seed: 0,
            exact: false,
            estimator: MonteCarloEstimator::default(),
        }
    }

    pub fn on_play(mut self, on_play: bool) -> Self {
        self.on_play = on_play;
        self
    }

    pub fn consider_mulligans(mut self, consider_mulligans: bool) -> Self {
        self.consider_mulligans = consider_mulligans;
        self
    }

    pub fn iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Use the closed form instead of simulating when mulligans are off
    pub fn exact(mut self, exact: bool) -> Self {
        self.exact = exact;
        self
    }

    /// Evaluate cells on the rayon pool (default) or on the calling thread
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.estimator = self.estimator.parallel(parallel);
        self
    }

    /// Number of cells the sweep will evaluate
    pub fn cell_count(&self) -> usize {
        self.lands
            .len()
            .saturating_mul(self.turns.saturating_sub(FIRST_TABLE_TURN - 1) as usize)
    }

    fn cell_config(&self, n_lands: u32, turn: u32) -> Result<SimulationConfig, ConfigError> {
        SimulationConfig::new(
            self.deck_size,
            n_lands,
            n_lands,
            turn,
            self.on_play,
            self.consider_mulligans,
            self.iterations,
        )
    }

    /// Validate every cell's configuration up front
    fn cells(&self) -> Result<Vec<Cell>, ConfigError> {
        if self.turns < FIRST_TABLE_TURN {
            return Err(ConfigError::SweepNeedsTurns { turns: self.turns });
        }
        // most lands and most draws: if this corner is valid, so is every cell
        self.cell_config(self.lands.high, self.turns)?;

        let mut cells = Vec::with_capacity(self.cell_count());
        for (row, n_lands) in self.lands.iter().enumerate() {
            for (col, turn) in (FIRST_TABLE_TURN..=self.turns).enumerate() {
                let config = self.cell_config(n_lands, turn)?;
                cells.push(Cell { row, col, config });
            }
        }
        Ok(cells)
    }

    pub fn build(&self, cancel: &CancelToken) -> Result<CurveTable, SimulationError> {
        self.build_with_progress(cancel, || {})
    }

    /// Build the table, calling `on_cell` once per finished cell.
    /// Aborts on the first failing cell.
    pub fn build_with_progress<F>(&self, cancel: &CancelToken, on_cell: F) -> Result<CurveTable, SimulationError>
    where
        F: Fn() + Sync,
    {
        let cells = self.cells()?;
        let use_exact = self.exact && !self.consider_mulligans;
        if self.exact && !use_exact {
            warn!("Exact mode needs mulligans disabled; falling back to Monte Carlo");
        }

        info!(
            "Building curve table: lands {}..={}, turns {}..={}, {} cells, {}",
            self.lands.low,
            self.lands.high,
            FIRST_TABLE_TURN,
            self.turns,
            cells.len(),
            if use_exact { "exact".to_string() } else { format!("{} iterations per cell", self.iterations) }
        );
        let start = Instant::now();

        let evaluate = |cell: &Cell| -> Result<(usize, usize, f64), SimulationError> {
            if cancel.is_cancelled() {
                return Err(SimulationError::Cancelled);
            }
            let closed_form = if use_exact { exact_result(&cell.config) } else { None };
            let prob = match closed_form {
                Some(exact) => exact.prob_desired,
                None => {
                    let stream = (u64::from(cell.config.n_lands()) << 32) | u64::from(cell.config.turns());
                    self.estimator
                        .estimate(&cell.config, mix_seed(self.seed, stream), cancel)?
                        .prob_desired
                }
            };
            debug!(
                "Cell lands={} turn={}: {:.6}",
                cell.config.n_lands(),
                cell.config.turns(),
                prob
            );
            on_cell();
            Ok((cell.row, cell.col, prob))
        };

        let results: Vec<(usize, usize, f64)> = if self.estimator.is_parallel() {
            cells.par_iter().map(evaluate).collect::<Result<_, _>>()?
        } else {
            cells.iter().map(evaluate).collect::<Result<_, _>>()?
        };

        let columns = (self.turns - FIRST_TABLE_TURN + 1) as usize;
        let mut rows = vec![vec![0.0; columns]; self.lands.len()];
        for (row, col, prob) in results {
            rows[row][col] = prob;
        }

        info!("Curve table finished in {:.2?}", start.elapsed());
        Ok(CurveTable {
            lands: self.lands,
            turns: self.turns,
            rows,
        })
    }
}
