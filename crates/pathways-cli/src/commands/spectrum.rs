//! Spectrum command implementation.

use std::path::Path;

use anyhow::Result;
use console::style;
use rand::SeedableRng;
use rand::rngs::StdRng;

use pathways_core::{Configuration, Hamiltonian, SpectrumReport};

use super::common::{cli_args, describe, resolve_seed};
use crate::report::{Report, ReproducibilityInfo, SpectrumResult};

/// Execute the spectrum command.
pub fn execute(
    config: &Configuration,
    seed: Option<u64>,
    show_eigenvalues: bool,
    output: Option<&str>,
) -> Result<()> {
    let seed = resolve_seed(seed);
    let hamiltonian = Hamiltonian::tight_binding(config, &mut StdRng::seed_from_u64(seed))?;
    let report = SpectrumReport::analyze(&hamiltonian)?;

    println!("{}", describe(config));
    if let (Some(lo), Some(hi)) = (report.eigenvalues.first(), report.eigenvalues.last()) {
        println!("  Spectrum:      [{lo:.6}, {hi:.6}]");
    }
    println!("  Mean gap:      {:.6e}", report.mean_gap);
    println!(
        "  Gap std:       {}",
        style(format!("{:.6e}", report.gap_uniformity)).yellow().bold()
    );

    if show_eigenvalues {
        println!();
        println!("{}", style("Eigenvalues").bold().underlined());
        for (k, value) in report.eigenvalues.iter().enumerate() {
            println!("  {k:>4}  {value:>12.8}");
        }
    }

    if let Some(output_path) = output {
        let result = SpectrumResult {
            configuration: *config,
            spectrum: report,
        };
        let info = ReproducibilityInfo::capture(&cli_args(), seed, false);
        Report::new(result, info).to_file(Path::new(output_path))?;
        eprintln!(
            "{} Report written to {}",
            style("OK").green().bold(),
            output_path
        );
    }

    Ok(())
}
