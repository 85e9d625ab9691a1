//! Exact hypergeometric probabilities.
//!
//! Arguments are signed so that out-of-domain inputs (negative counts, a sample
//! larger than the population) give probability 0 instead of an error.

use crate::simulation::config::SimulationConfig;
use serde::Serialize;

/// Binomial coefficient C(n, k) as a float; 0 when `k < 0`, `n < 0` or `k > n`
pub fn combinations(n: i64, k: i64) -> f64 {
    if n < 0 || k < 0 || k > n {
        return 0.0;
    }
    let k = k.min(n - k);
    let mut result = 1.0;
    for i in 1..=k {
        result = result * (n - k + i) as f64 / i as f64;
    }
    result
}

/// P(X = succ_sample) when drawing `sample` cards from `pop` of which `succ_pop` are successes
pub fn point_probability(pop: i64, succ_pop: i64, sample: i64, succ_sample: i64) -> f64 {
    let total = combinations(pop, sample);
    if total == 0.0 {
        return 0.0;
    }
    combinations(succ_pop, succ_sample) * combinations(pop - succ_pop, sample - succ_sample) / total
}

/// P(X <= k)
pub fn cumulative_probability(pop: i64, succ_pop: i64, sample: i64, k: i64) -> f64 {
    (0..=k)
        .map(|succ| point_probability(pop, succ_pop, sample, succ))
        .sum::<f64>()
        .min(1.0)
}

/// P(X >= k)
pub fn at_least_probability(pop: i64, succ_pop: i64, sample: i64, k: i64) -> f64 {
    (1.0 - cumulative_probability(pop, succ_pop, sample, k - 1)).max(0.0)
}

/// Closed-form counterpart of a Monte Carlo estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExactResult {
    pub prob_desired: f64,
    pub prob_any_land: f64,
}

/// Exact hit probabilities for a configuration that never mulligans.
///
/// Without mulligans a game is one draw of `total_draws` cards without
/// replacement, so each criterion is an "at least `turns` successes" tail.
/// Returns `None` when mulligans are on.
pub fn exact_result(config: &SimulationConfig) -> Option<ExactResult> {
    if config.consider_mulligans() {
        return None;
    }
    let pop = i64::from(config.deck_size());
    let sample = i64::from(config.total_draws());
    let needed = i64::from(config.turns());

    Some(ExactResult {
        prob_desired: at_least_probability(pop, i64::from(config.n_desired_lands()), sample, needed),
        prob_any_land: at_least_probability(pop, i64::from(config.n_lands()), sample, needed),
    })
}
