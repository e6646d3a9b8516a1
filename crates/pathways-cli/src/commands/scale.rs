//! Scale command implementation.
//!
//! `pathways scale [--grid <grid.yaml>] [--sizes 25,50,100,200] [--seed <u64>] [--export <file>]`
//!
//! The grid's lattice axis is ignored; every size in `--sizes` gets its own
//! sweep over the remaining axes.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use console::style;
use tracing::info;

use pathways_core::{ScalingStudy, SweepSession};

use super::common::{SweepProgress, cli_args, load_grid, resolve_seed};
use crate::report::{Report, ReproducibilityInfo, ScalingResult};

/// Execute the scale command.
pub fn execute(
    grid_path: Option<&str>,
    sizes: &[usize],
    seed: Option<u64>,
    parallel: bool,
    output: Option<&str>,
) -> Result<()> {
    if sizes.is_empty() {
        anyhow::bail!("No lattice sizes given");
    }
    let grid = load_grid(grid_path)?;
    let seed = resolve_seed(seed);
    let per_size = grid.clone().with_lattice_sizes(vec![1]).len();

    println!(
        "{} sizes {:?}, {} configurations each (seed {})",
        style("Scaling").cyan().bold(),
        sizes,
        per_size,
        seed
    );

    let progress = Arc::new(SweepProgress::new(per_size * sizes.len())?);
    let session = SweepSession::with_seed(seed)
        .parallel(parallel)
        .with_observer(progress.clone());
    let mut study = ScalingStudy::new(session);

    let records = study.run(sizes, &grid);
    progress.finish();
    let records = records?;

    println!();
    println!(
        "  {:>6}  {:>14}  {:>14}  {}",
        style("N").bold(),
        style("best error").bold(),
        style("gap std").bold(),
        style("best (dt, V0, g, noise, p)").bold()
    );
    for r in &records {
        info!(n = r.lattice_size, noise_seed = r.noise_seed, "scaling record");
        let c = &r.best_configuration;
        println!(
            "  {:>6}  {:>14.6e}  {:>14.6e}  ({}, {}, {}, {}, {})",
            r.lattice_size,
            r.best_error,
            r.gap_uniformity,
            c.time_step,
            c.potential_scale,
            c.coupling,
            c.noise_amplitude,
            c.phase_precision
        );
    }

    if let Some(output_path) = output {
        let parallel = study.session().is_parallel();
        let result = ScalingResult {
            sizes: sizes.to_vec(),
            evaluations: study.session().history().len(),
            records,
        };
        let info = ReproducibilityInfo::capture(&cli_args(), seed, parallel);
        Report::new(result, info).to_file(Path::new(output_path))?;
        eprintln!(
            "{} Report written to {}",
            style("OK").green().bold(),
            output_path
        );
    }

    Ok(())
}
