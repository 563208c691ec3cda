use std::path::PathBuf;

use clap::Parser;

use cluedo_bench::config::{BenchConfig, ResolvedOutputs};
use cluedo_bench::logging::init_logging;
use cluedo_bench::tournament::Tournament;

/// Tournament harness for the computer players.
#[derive(Debug, Parser)]
#[command(
    name = "cluedo-bench",
    author,
    version,
    about = "Deterministic deduction-game tournament harness"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/bench.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of games to play.
    #[arg(long, value_name = "GAMES")]
    games: Option<usize>,

    /// Override the RNG seed for game generation.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Exit after validating the configuration (no tournament is run).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = BenchConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(games) = cli.games {
        config.games.count = games;
    }

    if let Some(seed) = cli.seed {
        config.games.seed = Some(seed);
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let seat_count = config.seats.len();
    let run_id = config.run_id.clone();
    let games = config.games.count;
    let rotations = config.games.rotations;

    println!(
        "Loaded configuration '{run_id}' with {seat_count} seats ({games} games, {rotations} rotation{})",
        if rotations == 1 { "" } else { "s" }
    );

    let _logging_guard = init_logging(&config.logging, &outputs)?;
    let tournament = Tournament::new(config, outputs)?;

    if cli.validate_only {
        println!("Validation-only mode: tournament execution skipped.");
        return Ok(());
    }

    let summary = tournament.run()?;
    println!(
        "Tournament complete for '{run_id}': {} games ({} decided) → {} rows at {}",
        summary.games_played,
        summary.decided,
        summary.rows_written,
        summary.jsonl_path.display()
    );
    println!("Summary table: {}", summary.summary_path.display());
    if let Some(telemetry_path) = summary.telemetry_path.as_ref() {
        println!("Telemetry log: {}", telemetry_path.display());
    }
    for report in &summary.reports {
        println!(
            "  {}: {} wins in {} games ({:.1}%)",
            report.name,
            report.wins,
            report.games,
            report.win_rate * 100.0
        );
    }

    Ok(())
}
