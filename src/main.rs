use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use mana_curve::hypergeometric::exact_result;
use mana_curve::rng::GameRng;
use mana_curve::simulation::{
    CancelToken, CurveTableBuilder, LandRange, MonteCarloEstimator, SimulationConfig, SimulationReport,
};
use mana_curve::table::{write_table_file, DEFAULT_PRECISION};
use std::fmt::Display;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mana-curve")]
#[command(about = "Land count and mana curve probability simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Deck and game parameters shared by every subcommand
#[derive(Args)]
struct GameArgs {
    /// Number of cards in the deck
    #[arg(long, default_value = "60")]
    deck_size: u32,

    /// Simulate up to and including this turn
    #[arg(short, long, default_value = "7")]
    turns: u32,

    /// Start on the play (no draw on turn 1)
    #[arg(long)]
    on_play: bool,

    /// Keep every opening 7 instead of mulliganing bad hands
    #[arg(long)]
    no_mulligans: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate the probabilities for a single deck configuration
    Simulate {
        #[command(flatten)]
        game: GameArgs,

        /// Total lands in the deck
        #[arg(short, long, default_value = "24")]
        lands: u32,

        /// Lands of the desired type (defaults to all lands)
        #[arg(long)]
        desired: Option<u32>,

        /// Number of games to simulate
        #[arg(short, long, default_value = "10000")]
        iterations: usize,

        /// Seed for reproducibility
        #[arg(short, long)]
        seed: Option<u64>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Run on the calling thread only
        #[arg(long)]
        sequential: bool,
    },

    /// Build the land count x turn probability table and write it as CSV
    Table {
        #[command(flatten)]
        game: GameArgs,

        /// Lowest land count (first row)
        #[arg(long, default_value = "16")]
        low: u32,

        /// Highest land count (last row)
        #[arg(long, default_value = "26")]
        high: u32,

        /// Number of games per cell
        #[arg(short, long, default_value = "10000")]
        iterations: usize,

        /// Seed for reproducibility
        #[arg(short, long)]
        seed: Option<u64>,

        /// Directory the table is written to
        #[arg(short, long, default_value = "data/simulations")]
        output: PathBuf,

        /// Decimal places per cell
        #[arg(long, default_value_t = DEFAULT_PRECISION)]
        precision: usize,

        /// Use the closed form instead of simulating (requires --no-mulligans)
        #[arg(long)]
        exact: bool,

        /// Run on the calling thread only
        #[arg(long)]
        sequential: bool,
    },

    /// Print exact probabilities next to a Monte Carlo estimate (no mulligans)
    Exact {
        #[command(flatten)]
        game: GameArgs,

        /// Total lands in the deck
        #[arg(short, long, default_value = "24")]
        lands: u32,

        /// Lands of the desired type (defaults to all lands)
        #[arg(long)]
        desired: Option<u32>,

        /// Games for the comparison estimate
        #[arg(short, long, default_value = "100000")]
        iterations: usize,

        /// Seed for reproducibility
        #[arg(short, long)]
        seed: Option<u64>,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            game,
            lands,
            desired,
            iterations,
            seed,
            json,
            sequential,
        } => {
            let config = build_config(&game, lands, desired.unwrap_or(lands), iterations, !game.no_mulligans);
            run_simulate(&config, seed, json, sequential);
        }
        Commands::Table {
            game,
            low,
            high,
            iterations,
            seed,
            output,
            precision,
            exact,
            sequential,
        } => {
            println!("\n=== Mana Curve Table ===\n");
            let lands = LandRange::new(low, high).unwrap_or_else(|e| fail("Invalid land range", e));
            let builder = CurveTableBuilder::new(game.deck_size, lands, game.turns)
                .on_play(game.on_play)
                .consider_mulligans(!game.no_mulligans)
                .iterations(iterations)
                .seed(resolve_seed(seed))
                .exact(exact)
                .parallel(!sequential);
            run_table(&builder, &output, precision);
        }
        Commands::Exact {
            game,
            lands,
            desired,
            iterations,
            seed,
        } => {
            let config = build_config(&game, lands, desired.unwrap_or(lands), iterations, false);
            run_exact(&config, seed);
        }
    }
}

fn fail(context: &str, err: impl Display) -> ! {
    eprintln!("✗ {}: {}", context, err);
    std::process::exit(1);
}

fn build_config(game: &GameArgs, lands: u32, desired: u32, iterations: usize, mulligans: bool) -> SimulationConfig {
    SimulationConfig::new(
        game.deck_size,
        lands,
        desired,
        game.turns,
        game.on_play,
        mulligans,
        iterations,
    )
    .unwrap_or_else(|e| fail("Invalid configuration", e))
}

fn resolve_seed(seed: Option<u64>) -> u64 {
    let seed = GameRng::new(seed).seed();
    println!("Seed: {}", seed);
    seed
}

fn run_simulate(config: &SimulationConfig, seed: Option<u64>, json: bool, sequential: bool) {
    if !json {
        println!("\n=== Mana Curve Simulation ===\n");
        println!("Simulation conditions: {}", config.describe());
    }
    let seed = if json { GameRng::new(seed).seed() } else { resolve_seed(seed) };

    let start = std::time::Instant::now();
    let result = MonteCarloEstimator::new()
        .parallel(!sequential)
        .estimate(config, seed, &CancelToken::new())
        .unwrap_or_else(|e| fail("Simulation failed", e));
    let elapsed = start.elapsed();

    let report = SimulationReport::new(*config, result);
    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{}", text),
            Err(e) => fail("Failed to serialize report", e),
        }
        return;
    }

    println!("\n=== Results ===\n");
    println!(
        "Prob good mana curve: {:.4} ({}/{})",
        result.prob_desired, result.count_desired, result.iterations
    );
    println!(
        "Prob enough lands:    {:.4} ({}/{})",
        result.prob_any_land, result.count_any_land, result.iterations
    );
    if let Some(exact) = report.exact {
        println!("Exact:                {:.4} / {:.4}", exact.prob_desired, exact.prob_any_land);
    }

    if config.consider_mulligans() {
        println!("\nMulligans:");
        let labels = ["Kept 7", "To 6", "To 5", "To 4"];
        for (depth, label) in labels.iter().enumerate() {
            let count = result.mulligan_counts.count(depth as u32);
            let pct = count as f64 / result.iterations as f64 * 100.0;
            let bar = "█".repeat((pct / 2.0) as usize);
            println!("  {:7} {:5.1}% {} ({})", label, pct, bar, count);
        }
    }

    println!(
        "\nSimulation completed in {:.2?} ({:.0} games/sec)",
        elapsed,
        result.iterations as f64 / elapsed.as_secs_f64()
    );
}

fn run_table(builder: &CurveTableBuilder, output: &std::path::Path, precision: usize) {
    let progress = ProgressBar::new(builder.cell_count() as u64);
    progress.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} cells [{elapsed_precise}]")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let table = builder
        .build_with_progress(&CancelToken::new(), || progress.inc(1))
        .unwrap_or_else(|e| {
            progress.abandon();
            fail("Failed to build table", e)
        });
    progress.finish();

    println!();
    for (i, row) in table.rows.iter().enumerate() {
        let cells: Vec<String> = row.iter().map(|p| format!("{:5.1}%", p * 100.0)).collect();
        println!("  {:2} lands: {}", table.lands.low() as usize + i, cells.join(" "));
    }

    match write_table_file(output, &table, precision) {
        Ok(path) => println!("\n✓ Table saved to: {}", path.display()),
        Err(e) => fail("Failed to write table", e),
    }
}

fn run_exact(config: &SimulationConfig, seed: Option<u64>) {
    println!("\n=== Exact vs Simulated ===\n");
    println!("Conditions: {}", config.describe());
    let seed = resolve_seed(seed);

    let Some(exact) = exact_result(config) else {
        fail("Exact result unavailable", "mulligans must be disabled");
    };
    let simulated = MonteCarloEstimator::new()
        .estimate(config, seed, &CancelToken::new())
        .unwrap_or_else(|e| fail("Simulation failed", e));

    println!("\n{:20} {:>10} {:>10} {:>10}", "Metric", "Exact", "Simulated", "Diff");
    println!("{:-<53}", "");
    println!(
        "{:20} {:>10.4} {:>10.4} {:>+10.4}",
        "Desired lands",
        exact.prob_desired,
        simulated.prob_desired,
        simulated.prob_desired - exact.prob_desired
    );
    println!(
        "{:20} {:>10.4} {:>10.4} {:>+10.4}",
        "Any lands",
        exact.prob_any_land,
        simulated.prob_any_land,
        simulated.prob_any_land - exact.prob_any_land
    );
}
