//! Shared helpers for CLI commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rand::Rng;
use tracing::{debug, info};

use pathways_core::{Configuration, ParameterGrid, SweepObserver};

/// Load a parameter grid from a YAML or JSON file, or the reference grid
/// when no path is given.
pub fn load_grid(path: Option<&str>) -> Result<ParameterGrid> {
    let Some(path) = path else {
        debug!("no grid file given, using reference grid");
        return Ok(ParameterGrid::reference());
    };
    let path_obj = Path::new(path);

    if !path_obj.exists() {
        anyhow::bail!("File not found: {path}");
    }

    let source =
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))?;

    let ext = path_obj.extension().and_then(|e| e.to_str()).unwrap_or("");

    let grid: ParameterGrid = match ext.to_lowercase().as_str() {
        "json" => serde_json::from_str(&source)
            .with_context(|| format!("Invalid JSON grid: {path}"))?,
        "yaml" | "yml" | "" => serde_yaml_ng::from_str(&source)
            .with_context(|| format!("Invalid YAML grid: {path}"))?,
        other => anyhow::bail!("Unsupported grid format: '.{other}'. Use .yaml, .yml or .json"),
    };
    grid.validate()?;
    info!(
        path,
        format = ext,
        axes = ?grid.axis_lens(),
        total = grid.len(),
        "loaded parameter grid"
    );
    Ok(grid)
}

/// The given seed, or a fresh one from the thread RNG.
pub fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| rand::thread_rng().r#gen())
}

/// CLI arguments of this process, for reproducibility blocks.
pub fn cli_args() -> Vec<String> {
    std::env::args().collect()
}

/// One-line summary of a configuration.
pub fn describe(config: &Configuration) -> String {
    format!(
        "N={} T={} dt={} V0={} g={} noise={} precision={}",
        style(config.lattice_size).cyan(),
        style(config.num_steps).cyan(),
        style(config.time_step).cyan(),
        style(config.potential_scale).cyan(),
        style(config.coupling).cyan(),
        style(config.noise_amplitude).cyan(),
        style(config.phase_precision).cyan(),
    )
}

/// Progress bar fed by sweep callbacks.
pub struct SweepProgress {
    bar: ProgressBar,
}

impl SweepProgress {
    /// A bar expecting `total` evaluations.
    pub fn new(total: usize) -> Result<Self> {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
                .context("Invalid progress template")?
                .progress_chars("=> "),
        );
        Ok(Self { bar })
    }

    /// Remove the bar from the terminal.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl SweepObserver for SweepProgress {
    fn evaluated(&self, _index: usize, _total: usize) {
        self.bar.inc(1);
    }

    fn improved(&self, _config: &Configuration, error: f64) {
        self.bar.set_message(format!("best {error:.6e}"));
    }
}
