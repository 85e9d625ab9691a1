use crate::rng::GameRng;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckError {
    #[error("Cannot draw from an exhausted deck (0 cards left)")]
    Exhausted,
    #[error("Invalid deck counts: {n_desired_lands} desired lands, {n_lands} lands, {n_cards} cards")]
    InvalidCounts {
        n_cards: u32,
        n_lands: u32,
        n_desired_lands: u32,
    },
}

/// Category of a single drawn card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawOutcome {
    DesiredLand,
    OtherLand,
    Spell,
}

impl DrawOutcome {
    pub fn is_land(self) -> bool {
        !matches!(self, DrawOutcome::Spell)
    }
}

/// Finite population of cards split into desired lands, other lands and spells.
///
/// Only the counts are tracked: positions `1..=n_desired_lands` are desired lands,
/// `..=n_lands` other lands and the rest spells. Drawing shrinks exactly the bucket
/// the card came from, which is sampling without replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckState {
    n_cards: u32,
    n_lands: u32,
    n_desired_lands: u32,
}

impl DeckState {
    /// Counts must satisfy `n_desired_lands <= n_lands <= n_cards`
    pub fn new(n_cards: u32, n_lands: u32, n_desired_lands: u32) -> Result<Self, DeckError> {
        if n_desired_lands > n_lands || n_lands > n_cards {
            return Err(DeckError::InvalidCounts {
                n_cards,
                n_lands,
                n_desired_lands,
            });
        }
        Ok(DeckState {
            n_cards,
            n_lands,
            n_desired_lands,
        })
    }

    pub fn n_cards(&self) -> u32 {
        self.n_cards
    }

    pub fn n_lands(&self) -> u32 {
        self.n_lands
    }

    pub fn n_desired_lands(&self) -> u32 {
        self.n_desired_lands
    }

    /// Remove one uniformly random card and report its category
    pub fn draw(&mut self, rng: &mut GameRng) -> Result<DrawOutcome, DeckError> {
        if self.n_cards == 0 {
            return Err(DeckError::Exhausted);
        }

        let position = rng.random_card_position(self.n_cards);
        let outcome = if position <= self.n_desired_lands {
            DrawOutcome::DesiredLand
        } else if position <= self.n_lands {
            DrawOutcome::OtherLand
        } else {
            DrawOutcome::Spell
        };

        self.n_cards -= 1;
        match outcome {
            DrawOutcome::DesiredLand => {
                self.n_lands -= 1;
                self.n_desired_lands -= 1;
            }
            DrawOutcome::OtherLand => self.n_lands -= 1,
            DrawOutcome::Spell => {}
        }

        Ok(outcome)
    }

    /// Put `count` cards on the bottom after a mulligan.
    /// They only grow the total, never the land buckets.
    pub fn bottom_cards(&mut self, count: u32) {
        self.n_cards += count;
    }
}
