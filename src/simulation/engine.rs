use crate::rng::GameRng;
use crate::simulation::config::SimulationConfig;
use crate::simulation::deck::DeckError;
use crate::simulation::mulligan::MulliganPolicy;

/// Result of a single game simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationResult {
    /// At least `turns` desired lands seen by the last turn
    pub hit_desired: bool,
    /// At least `turns` lands of any kind seen by the last turn
    pub hit_any_land: bool,
    /// Redraws taken for the opening hand (0..=3)
    pub mulligan_depth: u32,
}

/// Play one game: opening hand, then one draw per draw step up to `turns`
pub fn run_game(
    config: &SimulationConfig,
    policy: &MulliganPolicy,
    rng: &mut GameRng,
) -> Result<SimulationResult, DeckError> {
    let mut opening = if config.consider_mulligans() {
        policy.opening_hand(config, rng)?
    } else {
        MulliganPolicy::draw_seven(config, rng)?
    };

    for _turn in config.first_draw_turn()..=config.turns() {
        let outcome = opening.deck.draw(rng)?;
        opening.hand.add(outcome);
    }

    let hand = opening.hand;
    Ok(SimulationResult {
        hit_desired: hand.desired_lands_in_hand >= config.turns(),
        hit_any_land: hand.lands_in_hand >= config.turns(),
        mulligan_depth: opening.mulligan_depth,
    })
}
