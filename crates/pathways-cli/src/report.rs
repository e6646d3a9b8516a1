//! JSON reports with timestamp and reproducibility metadata.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pathways_core::{Configuration, ScalingRecord, SpectrumReport};

/// Schema version of every report written by this binary.
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Information for reproducing a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReproducibilityInfo {
    /// Pathways version used.
    pub pathways_version: String,
    /// CLI arguments used for this run.
    pub cli_args: Vec<String>,
    /// Schema version of the output format.
    pub schema_version: String,
    /// Noise seed (base seed for sweeps).
    pub seed: u64,
    /// Whether evaluations fanned out over threads.
    pub parallel: bool,
}

impl ReproducibilityInfo {
    /// Capture the current invocation.
    pub fn capture(cli_args: &[String], seed: u64, parallel: bool) -> Self {
        Self {
            pathways_version: env!("CARGO_PKG_VERSION").to_string(),
            cli_args: cli_args.to_vec(),
            schema_version: SCHEMA_VERSION.into(),
            seed,
            parallel,
        }
    }
}

/// A command result wrapped with run metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report<T> {
    /// When the report was generated.
    pub timestamp: DateTime<Utc>,
    /// How to reproduce it.
    pub reproducibility: ReproducibilityInfo,
    /// The command result.
    pub result: T,
}

impl<T: Serialize> Report<T> {
    /// Wrap `result`, stamped with the current time.
    pub fn new(result: T, reproducibility: ReproducibilityInfo) -> Self {
        Self {
            timestamp: Utc::now(),
            reproducibility,
            result,
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize report")
    }

    /// Write pretty-printed JSON to `path`.
    pub fn to_file(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write {}", path.display()))
    }
}

/// Output of `pathways evaluate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// The evaluated configuration.
    pub configuration: Configuration,
    /// Sum of `step_errors`.
    pub total_error: f64,
    /// Distribution mismatch at every time step.
    pub step_errors: Vec<f64>,
    /// Forward distributions, one row per time step.
    pub forward: Vec<Vec<f64>>,
    /// Backward distributions, one row per time step.
    pub backward: Vec<Vec<f64>>,
}

/// Output of `pathways sweep`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepResult {
    /// Configuration with the lowest error.
    pub best_configuration: Configuration,
    /// Its total error.
    pub best_error: f64,
    /// Enumeration index of the winner.
    pub index: usize,
    /// Seed the winner's noise was drawn with.
    pub noise_seed: u64,
    /// Best-so-far error after each evaluation.
    pub running_best: Vec<f64>,
}

/// Output of `pathways scale`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalingResult {
    /// Lattice sizes in the order they were swept.
    pub sizes: Vec<usize>,
    /// One record per size.
    pub records: Vec<ScalingRecord>,
    /// Total number of evaluations across all sizes.
    pub evaluations: usize,
}

/// Output of `pathways spectrum`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpectrumResult {
    /// Configuration the Hamiltonian was built from.
    pub configuration: Configuration,
    /// Eigenvalues and gap statistics.
    pub spectrum: SpectrumReport,
}
