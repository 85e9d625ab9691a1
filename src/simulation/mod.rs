pub mod cancel;
pub mod config;
pub mod curve;
pub mod deck;
pub mod engine;
pub mod estimator;
pub mod hand;
pub mod mulligan;

pub use cancel::CancelToken;
pub use config::{ConfigError, SimulationConfig, HAND_SIZE};
pub use curve::{CurveTable, CurveTableBuilder, LandRange};
pub use deck::{DeckError, DeckState, DrawOutcome};
pub use engine::{run_game, SimulationResult};
pub use estimator::{AggregateResult, MonteCarloEstimator, MulliganHistogram, SimulationError, SimulationReport};
pub use hand::HandState;
pub use mulligan::{MulliganPolicy, OpeningHand, MAX_LANDS, MAX_MULLIGANS, MIN_LANDS};
