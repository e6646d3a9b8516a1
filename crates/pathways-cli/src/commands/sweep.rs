//! Sweep command implementation.
//!
//! `pathways sweep [--grid <grid.yaml>] [--seed <u64>] [--sequential] [--export <file>]`

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use console::style;

use pathways_core::SweepSession;

use super::common::{SweepProgress, cli_args, describe, load_grid, resolve_seed};
use crate::report::{Report, ReproducibilityInfo, SweepResult};

/// Execute the sweep command.
pub fn execute(
    grid_path: Option<&str>,
    seed: Option<u64>,
    parallel: bool,
    output: Option<&str>,
) -> Result<()> {
    let grid = load_grid(grid_path)?;
    let seed = resolve_seed(seed);

    println!(
        "{} {} configurations (seed {})",
        style("Sweeping").cyan().bold(),
        grid.len(),
        seed
    );

    let progress = Arc::new(SweepProgress::new(grid.len())?);
    let mut session = SweepSession::with_seed(seed)
        .parallel(parallel)
        .with_observer(progress.clone());

    let start = Instant::now();
    let outcome = session.sweep(&grid);
    progress.finish();
    let outcome = outcome?;
    let elapsed = start.elapsed();

    println!("\n{} Best configuration:", style("✓").green().bold());
    println!("  {}", describe(&outcome.configuration));
    println!(
        "  Error:       {}",
        style(format!("{:.6e}", outcome.error)).yellow().bold()
    );
    println!("  Noise seed:  {}", outcome.noise_seed);
    println!("  Elapsed:     {:.2?}", elapsed);

    if let Some(output_path) = output {
        let result = SweepResult {
            best_configuration: outcome.configuration,
            best_error: outcome.error,
            index: outcome.index,
            noise_seed: outcome.noise_seed,
            running_best: session.running_best(),
        };
        let info = ReproducibilityInfo::capture(&cli_args(), seed, session.is_parallel());
        Report::new(result, info).to_file(Path::new(output_path))?;
        eprintln!(
            "{} Report written to {}",
            style("OK").green().bold(),
            output_path
        );
    }

    Ok(())
}
