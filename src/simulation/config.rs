use crate::simulation::deck::{DeckError, DeckState};
use serde::Serialize;
use thiserror::Error;

/// Cards in an opening hand before any mulligan
pub const HAND_SIZE: u32 = 7;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("n_desired_lands ({n_desired_lands}) must not exceed n_lands ({n_lands})")]
    DesiredExceedsLands { n_desired_lands: u32, n_lands: u32 },
    #[error("n_lands ({n_lands}) must not exceed deck_size ({deck_size})")]
    LandsExceedDeck { n_lands: u32, deck_size: u32 },
    #[error("deck_size ({deck_size}) must be at least the opening hand size ({hand_size})")]
    DeckTooSmall { deck_size: u32, hand_size: u32 },
    #[error("turns must be at least 1 (got {turns})")]
    NoTurns { turns: u32 },
    #[error("iterations must be greater than 0")]
    NoIterations,
    #[error("simulating {turns} turns needs {draws} draws but the deck only has {deck_size} cards")]
    TooManyDraws { turns: u32, draws: u32, deck_size: u32 },
    #[error("land range is empty: low ({low}) is greater than high ({high})")]
    EmptyLandRange { low: u32, high: u32 },
    #[error("a curve table needs turns >= 2 (got {turns})")]
    SweepNeedsTurns { turns: u32 },
}

/// Parameters of one simulated configuration. Only constructible through
/// [`SimulationConfig::new`], so every instance is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SimulationConfig {
    deck_size: u32,
    n_lands: u32,
    n_desired_lands: u32,
    turns: u32,
    on_play: bool,
    consider_mulligans: bool,
    iterations: usize,
}

impl SimulationConfig {
    pub fn new(
        deck_size: u32,
        n_lands: u32,
        n_desired_lands: u32,
        turns: u32,
        on_play: bool,
        consider_mulligans: bool,
        iterations: usize,
    ) -> Result<Self, ConfigError> {
        if n_desired_lands > n_lands {
            return Err(ConfigError::DesiredExceedsLands { n_desired_lands, n_lands });
        }
        if n_lands > deck_size {
            return Err(ConfigError::LandsExceedDeck { n_lands, deck_size });
        }
        if deck_size < HAND_SIZE {
            return Err(ConfigError::DeckTooSmall { deck_size, hand_size: HAND_SIZE });
        }
        if turns < 1 {
            return Err(ConfigError::NoTurns { turns });
        }
        if iterations == 0 {
            return Err(ConfigError::NoIterations);
        }

        let config = SimulationConfig {
            deck_size,
            n_lands,
            n_desired_lands,
            turns,
            on_play,
            consider_mulligans,
            iterations,
        };

        let draws = config.total_draws();
        if draws > deck_size {
            return Err(ConfigError::TooManyDraws { turns, draws, deck_size });
        }

        Ok(config)
    }

    pub fn deck_size(&self) -> u32 {
        self.deck_size
    }

    pub fn n_lands(&self) -> u32 {
        self.n_lands
    }

    pub fn n_desired_lands(&self) -> u32 {
        self.n_desired_lands
    }

    pub fn turns(&self) -> u32 {
        self.turns
    }

    pub fn on_play(&self) -> bool {
        self.on_play
    }

    pub fn consider_mulligans(&self) -> bool {
        self.consider_mulligans
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// First turn with a draw step (no draw on turn 1 on the play)
    pub fn first_draw_turn(&self) -> u32 {
        if self.on_play {
            2
        } else {
            1
        }
    }

    /// Number of draw steps from `first_draw_turn` through `turns`
    pub fn draw_steps(&self) -> u32 {
        if self.turns < self.first_draw_turn() {
            return 0;
        }
        (self.turns - self.first_draw_turn()).saturating_add(1)
    }

    /// Opening hand plus every draw step, saturating at `u32::MAX`
    pub fn total_draws(&self) -> u32 {
        HAND_SIZE.saturating_add(self.draw_steps())
    }

    /// A fresh, full deck for one hand-draw attempt
    pub fn fresh_deck(&self) -> Result<DeckState, DeckError> {
        DeckState::new(self.deck_size, self.n_lands, self.n_desired_lands)
    }

    /// One-line description of the configuration
    pub fn describe(&self) -> String {
        format!(
            "{} card deck | {} lands | {} desired lands | {} | run for {} turns {} mulligan",
            self.deck_size,
            self.n_lands,
            self.n_desired_lands,
            if self.on_play { "on the play" } else { "on the draw" },
            self.turns,
            if self.consider_mulligans { "with" } else { "without" },
        )
    }
}
