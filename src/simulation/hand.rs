use crate::rng::GameRng;
use crate::simulation::deck::{DeckError, DeckState, DrawOutcome};

/// Land counts of the cards drawn so far in one game
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HandState {
    pub lands_in_hand: u32,
    pub desired_lands_in_hand: u32,
    pub hand_size: u32,
}

impl HandState {
    /// Draw `hand_size` cards from `deck` into a new hand
    pub fn draw_from(deck: &mut DeckState, hand_size: u32, rng: &mut GameRng) -> Result<Self, DeckError> {
        let mut hand = HandState::default();
        for _ in 0..hand_size {
            hand.add(deck.draw(rng)?);
        }
        Ok(hand)
    }

    /// Record one more drawn card
    pub fn add(&mut self, outcome: DrawOutcome) {
        self.hand_size += 1;
        if outcome.is_land() {
            self.lands_in_hand += 1;
        }
        if outcome == DrawOutcome::DesiredLand {
            self.desired_lands_in_hand += 1;
        }
    }
}
