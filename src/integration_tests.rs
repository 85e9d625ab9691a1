//! Integration tests for the mana curve simulator
//! Checks Monte Carlo estimates against the exact distribution with known seeds

use crate::hypergeometric::at_least_probability;
use crate::rng::GameRng;
use crate::simulation::{
    run_game, CancelToken, ConfigError, CurveTableBuilder, DeckState, LandRange, MonteCarloEstimator,
    MulliganPolicy, SimulationConfig, SimulationError, MAX_MULLIGANS,
};
use crate::table::{CsvTableSink, DEFAULT_PRECISION};

#[test]
fn test_one_land_in_opening_hand_converges() {
    let config = SimulationConfig::new(60, 17, 17, 1, true, false, 200_000).expect("valid config");
    let result = MonteCarloEstimator::new()
        .estimate(&config, 12345, &CancelToken::new())
        .expect("estimate runs");

    let exact = at_least_probability(60, 17, 7, 1);
    assert!(
        (result.prob_any_land - exact).abs() < 0.01,
        "simulated {} vs exact {}",
        result.prob_any_land,
        exact
    );
    assert_eq!(result.prob_desired, result.prob_any_land, "pools coincide");
}

#[test]
fn test_three_lands_by_turn_three_on_the_play() {
    // 7 opening + draws on turns 2 and 3
    let config = SimulationConfig::new(60, 20, 20, 3, true, false, 50_000).expect("valid config");
    let result = MonteCarloEstimator::new()
        .estimate(&config, 54321, &CancelToken::new())
        .expect("estimate runs");

    let exact = at_least_probability(60, 20, 9, 3);
    assert!(
        (result.prob_desired - exact).abs() < 0.015,
        "simulated {} vs exact {}",
        result.prob_desired,
        exact
    );
}

#[test]
fn test_desired_subset_converges_with_injected_rng() {
    let config = SimulationConfig::new(60, 24, 10, 2, false, false, 50_000).expect("valid config");
    let mut rng = GameRng::new(Some(2718));
    let result = MonteCarloEstimator::new()
        .estimate_with_rng(&config, &mut rng)
        .expect("estimate runs");

    // on the draw, turn 2 = 7 + 2 cards
    let exact_desired = at_least_probability(60, 10, 9, 2);
    let exact_any = at_least_probability(60, 24, 9, 2);
    assert!((result.prob_desired - exact_desired).abs() < 0.015);
    assert!((result.prob_any_land - exact_any).abs() < 0.015);
}

#[test]
fn test_mulligans_never_exceed_floor() {
    let policy = MulliganPolicy::default();
    for lands in [0, 8, 17, 24, 40, 60] {
        let config = SimulationConfig::new(60, lands, lands, 4, false, true, 1).expect("valid config");
        let mut rng = GameRng::new(Some(u64::from(lands)));

        let mut deepest = 0;
        for _ in 0..2_000 {
            let result = run_game(&config, &policy, &mut rng).expect("game runs");
            assert!(result.mulligan_depth <= MAX_MULLIGANS, "{} lands: depth {}", lands, result.mulligan_depth);
            deepest = deepest.max(result.mulligan_depth);
        }

        // decks with no keepable 7 always hit the forced keep at 4 cards
        if lands == 0 || lands == 60 {
            assert_eq!(deepest, MAX_MULLIGANS);
        }
    }
}

#[test]
fn test_mulligans_help_a_land_light_deck() {
    let cancel = CancelToken::new();
    let with = SimulationConfig::new(60, 16, 16, 2, false, true, 40_000).expect("valid config");
    let without = SimulationConfig::new(60, 16, 16, 2, false, false, 40_000).expect("valid config");

    let p_with = MonteCarloEstimator::new().estimate(&with, 8, &cancel).expect("estimate runs");
    let p_without = MonteCarloEstimator::new().estimate(&without, 8, &cancel).expect("estimate runs");

    assert!(p_with.prob_any_land > p_without.prob_any_land);
}

#[test]
fn test_simulated_table_is_monotonic_in_lands() {
    let table = CurveTableBuilder::new(60, LandRange::new(10, 30).expect("valid range"), 4)
        .on_play(true)
        .consider_mulligans(false)
        .iterations(20_000)
        .seed(99)
        .build(&CancelToken::new())
        .expect("table builds");

    // rows 10 lands apart differ by far more than the sampling noise
    for col in 0..3 {
        let low = table.rows[0][col];
        let mid = table.rows[10][col];
        let high = table.rows[20][col];
        assert!(low <= mid && mid <= high, "column {}: {} {} {}", col, low, mid, high);
    }
}

#[test]
fn test_seeded_table_is_reproducible() {
    let build = || {
        CurveTableBuilder::new(60, LandRange::new(16, 18).expect("valid range"), 3)
            .iterations(3_000)
            .seed(42)
            .build(&CancelToken::new())
            .expect("table builds")
    };
    assert_eq!(build(), build());
}

#[test]
fn test_table_written_as_csv() {
    let table = CurveTableBuilder::new(60, LandRange::new(16, 26).expect("valid range"), 7)
        .iterations(1_000)
        .seed(7)
        .build(&CancelToken::new())
        .expect("table builds");

    let mut sink = CsvTableSink::new(Vec::new(), DEFAULT_PRECISION);
    table.write_to(&mut sink).expect("table writes");
    let text = String::from_utf8(sink.into_inner().expect("flush")).expect("utf8");

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 11, "one row per land count 16..=26");
    for line in lines {
        let cells: Vec<&str> = line.split(',').collect();
        assert_eq!(cells.len(), 6, "one column per turn 2..=7");
        for cell in cells {
            assert_eq!(cell.split('.').nth(1).map(str::len), Some(DEFAULT_PRECISION));
            let p: f64 = cell.parse().expect("cell is a number");
            assert!((0.0..=1.0).contains(&p));
        }
    }
}

#[test]
fn test_invalid_config_runs_no_games() {
    assert_eq!(
        SimulationConfig::new(60, 20, 21, 3, true, false, 50_000),
        Err(ConfigError::DesiredExceedsLands { n_desired_lands: 21, n_lands: 20 })
    );
}

#[test]
fn test_exhaustion_conserves_counts() {
    let mut rng = GameRng::new(Some(31415));
    for (cards, lands, desired) in [(7, 3, 1), (40, 17, 17), (60, 24, 0), (1, 0, 0)] {
        let mut deck = DeckState::new(cards, lands, desired).expect("valid counts");
        for _ in 0..cards {
            deck.draw(&mut rng).expect("cards remain");
        }
        assert_eq!(deck, DeckState::new(0, 0, 0).expect("valid counts"));
        assert!(deck.draw(&mut rng).is_err());
    }
}

#[test]
fn test_oversized_sweep_fails_before_sampling() {
    let result = CurveTableBuilder::new(60, LandRange::new(16, 26).expect("valid range"), 1_000_000_000)
        .iterations(10)
        .build(&CancelToken::new());

    assert!(matches!(
        result,
        Err(SimulationError::Config(ConfigError::TooManyDraws { .. }))
    ));
}
