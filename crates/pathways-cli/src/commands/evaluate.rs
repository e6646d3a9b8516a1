//! Evaluate command implementation.
//!
//! `pathways evaluate -n 3 -t 5 --dt 1.0 --v0 1.0 -g 0.2 --noise 0.01 -p 7 [--per-step] [--export <file>]`

use std::path::Path;

use anyhow::Result;
use console::style;
use rand::SeedableRng;
use rand::rngs::StdRng;

use pathways_core::{Configuration, TrajectoryEvaluator};

use super::common::{cli_args, describe, resolve_seed};
use crate::report::{EvaluationResult, Report, ReproducibilityInfo};

/// Execute the evaluate command.
pub fn execute(
    config: &Configuration,
    seed: Option<u64>,
    per_step: bool,
    output: Option<&str>,
) -> Result<()> {
    let seed = resolve_seed(seed);
    let mut rng = StdRng::seed_from_u64(seed);
    let reconciliation = TrajectoryEvaluator::new().reconcile(config, &mut rng)?;

    println!("{}", describe(config));
    println!(
        "  Total error: {}",
        style(format!("{:.6e}", reconciliation.total_error)).yellow().bold()
    );
    if !config.is_noiseless() {
        println!("  Noise seed:  {seed}");
    }

    if per_step {
        println!();
        println!("{}", style("Per-step error").bold().underlined());
        for (t, error) in reconciliation.step_errors.iter().enumerate() {
            println!("  t={t:>3}  {error:.6e}");
        }
    }

    if let Some(output_path) = output {
        let result = EvaluationResult {
            configuration: *config,
            total_error: reconciliation.total_error,
            step_errors: reconciliation.step_errors.clone(),
            forward: reconciliation.forward.probabilities(),
            backward: reconciliation.backward.probabilities(),
        };
        let report = Report::new(result, ReproducibilityInfo::capture(&cli_args(), seed, false));
        report.to_file(Path::new(output_path))?;
        eprintln!(
            "{} Report written to {}",
            style("OK").green().bold(),
            output_path
        );
    }

    Ok(())
}
