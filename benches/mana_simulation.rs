use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mana_curve::rng::GameRng;
use mana_curve::simulation::{
    run_game, CancelToken, CurveTableBuilder, LandRange, MonteCarloEstimator, MulliganPolicy, SimulationConfig,
};

fn benchmark_single_game(c: &mut Criterion) {
    let config = SimulationConfig::new(60, 24, 24, 5, false, true, 1).expect("valid config");
    let policy = MulliganPolicy::default();
    let mut rng = GameRng::new(Some(12345));

    c.bench_function("single_game_with_mulligans", |b| {
        b.iter(|| run_game(black_box(&config), black_box(&policy), &mut rng))
    });
}

fn benchmark_estimate(c: &mut Criterion) {
    let config = SimulationConfig::new(60, 24, 24, 5, false, true, 10_000).expect("valid config");
    let cancel = CancelToken::new();

    c.bench_function("estimate_10000_games", |b| {
        b.iter(|| MonteCarloEstimator::new().estimate(black_box(&config), black_box(42), &cancel))
    });
}

fn benchmark_curve_table(c: &mut Criterion) {
    let builder = CurveTableBuilder::new(60, LandRange::new(20, 24).expect("valid range"), 5)
        .iterations(2_000)
        .seed(7);
    let cancel = CancelToken::new();

    c.bench_function("curve_table_5x4", |b| b.iter(|| builder.build(black_box(&cancel))));
}

criterion_group!(benches, benchmark_single_game, benchmark_estimate, benchmark_curve_table);
criterion_main!(benches);
