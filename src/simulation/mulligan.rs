use crate::rng::GameRng;
use crate::simulation::config::{SimulationConfig, HAND_SIZE};
use crate::simulation::deck::{DeckError, DeckState};
use crate::simulation::hand::HandState;

/// Fewest lands in a 7-card hand that is still kept
pub const MIN_LANDS: u32 = 2;
/// Most lands in a 7-card hand that is still kept
pub const MAX_LANDS: u32 = 5;
/// Mulligans taken before the hand is kept no matter what (7 -> 6 -> 5 -> 4)
pub const MAX_MULLIGANS: u32 = 3;

/// Hand the player goes into the game with, plus the deck it left behind
#[derive(Debug, Clone)]
pub struct OpeningHand {
    pub deck: DeckState,
    pub hand: HandState,
    /// Number of redraws performed (0 = kept 7, 3 = forced keep at 4)
    pub mulligan_depth: u32,
}

/// Keep/mulligan rule: redraw any 7 with too few or too many lands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MulliganPolicy {
    min_lands: u32,
    max_lands: u32,
}

impl Default for MulliganPolicy {
    fn default() -> Self {
        MulliganPolicy {
            min_lands: MIN_LANDS,
            max_lands: MAX_LANDS,
        }
    }
}

impl MulliganPolicy {
    /// Decide whether to keep a freshly drawn 7
    pub fn should_keep(&self, hand: &HandState) -> bool {
        (self.min_lands..=self.max_lands).contains(&hand.lands_in_hand)
    }

    /// Draw opening hands from fresh decks until one is kept.
    ///
    /// Every attempt draws a full 7 from a full deck. A hand kept after `d`
    /// mulligans puts `d` cards on the bottom; those only go back into the
    /// total deck count, not into the land buckets, and the land counts of
    /// all 7 drawn cards stay in hand.
    pub fn opening_hand(&self, config: &SimulationConfig, rng: &mut GameRng) -> Result<OpeningHand, DeckError> {
        let mut depth = 0;
        loop {
            let mut deck = config.fresh_deck()?;
            let mut hand = HandState::draw_from(&mut deck, HAND_SIZE, rng)?;

            if depth == MAX_MULLIGANS || self.should_keep(&hand) {
                deck.bottom_cards(depth);
                hand.hand_size = HAND_SIZE - depth;
                return Ok(OpeningHand {
                    deck,
                    hand,
                    mulligan_depth: depth,
                });
            }
            depth += 1;
        }
    }

    /// Single 7-card draw with no keep check
    pub fn draw_seven(config: &SimulationConfig, rng: &mut GameRng) -> Result<OpeningHand, DeckError> {
        let mut deck = config.fresh_deck()?;
        let hand = HandState::draw_from(&mut deck, HAND_SIZE, rng)?;
        Ok(OpeningHand {
            deck,
            hand,
            mulligan_depth: 0,
        })
    }
}
