use std::path::PathBuf;

use clap::Parser;

use chase_replay::config::{ResolvedOutputs, ScenarioConfig};
use chase_replay::logging::init_logging;
use chase_replay::replay::ReplayRunner;

/// Scripted replay harness for recorded pursuits.
#[derive(Debug, Parser)]
#[command(
    name = "chase-replay",
    author,
    version,
    about = "Deterministic pursuit replay harness"
)]
struct Cli {
    /// Path to the YAML scenario file.
    #[arg(short, long, value_name = "FILE", default_value = "demos/scenarios/opening.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the board data directory.
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Exit after validating the scenario (no steps are replayed).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = ScenarioConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(data_dir) = cli.data_dir {
        config.data.dir = data_dir;
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let run_id = config.run_id.clone();
    let step_count = config.steps.len();
    let detective_count = config.game.detectives.len();

    println!(
        "Loaded scenario '{run_id}' with {detective_count} detective{} ({step_count} steps)",
        if detective_count == 1 { "" } else { "s" }
    );

    let _logging_guard = init_logging(&config.logging, &outputs)?;
    let runner = ReplayRunner::new(config, outputs);

    if cli.validate_only {
        println!("Validation-only mode: replay execution skipped.");
        return Ok(());
    }

    let summary = runner.run()?;
    println!(
        "Replay complete for '{run_id}': {} steps, {} rows at {}",
        summary.steps_played,
        summary.rows_written,
        summary.jsonl_path.display()
    );
    println!(
        "Final possibility count: {}",
        summary.final_candidates
    );
    println!("Summary table: {}", summary.summary_path.display());
    if let Some(plot_path) = summary.plot_path.as_ref() {
        println!("Candidate plot: {}", plot_path.display());
    }
    if let Some(trace_path) = summary.trace_path.as_ref() {
        println!("Trace log: {}", trace_path.display());
    }

    Ok(())
}
