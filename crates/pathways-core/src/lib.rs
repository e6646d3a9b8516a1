//! `pathways-core` - forward/backward trajectory reconciliation.
//!
//! A 1-D tight-binding lattice with a quasi-periodic on-site potential is
//! propagated forward from the uniform state. The backward path is rebuilt
//! from the final probability distribution alone (the final phase is thrown
//! away), rewound with the inverse propagator, and repaired with an
//! index-dependent phase rotation. The squared mismatch between forward and
//! backward distributions, summed over all time steps, is the error that the
//! parameter sweep minimises.
//!
//! ```text
//! ScalingStudy ─▶ SweepSession ─▶ TrajectoryEvaluator ─▶ Hamiltonian
//!      │                                   ├──────────▶ Propagator
//!      │                                   └──────────▶ PhaseRealignment
//!      └──────▶ spectral (gap uniformity of each winner)
//! ```
//!
//! # Quick start
//!
//! ```rust
//! use pathways_core::{Configuration, ParameterGrid, SweepSession};
//!
//! // Noiseless single evaluation.
//! let config = Configuration::new(3, 1, 1.0)
//!     .with_potential(0.0)
//!     .with_phase_precision(5);
//! let error = pathways_core::evaluate(&config).unwrap();
//! assert!(error >= 0.0);
//!
//! // Reproducible sweep over a small grid.
//! let grid = ParameterGrid {
//!     lattice_size: vec![4],
//!     num_steps: vec![2],
//!     time_step: vec![0.8, 1.0],
//!     potential_scale: vec![1.0],
//!     coupling: vec![0.2],
//!     noise_amplitude: vec![0.01],
//!     phase_precision: vec![5, 7],
//! };
//! let outcome = SweepSession::with_seed(42).sweep(&grid).unwrap();
//! assert!(outcome.error >= 0.0);
//! ```

pub mod config;
pub mod error;
pub mod evaluator;
pub mod grid;
pub mod hamiltonian;
pub mod phase;
pub mod propagator;
pub mod scaling;
pub mod spectral;
pub mod state;
pub mod sweep;

pub use config::Configuration;
pub use error::{PathwayError, PathwayResult};
pub use evaluator::{Reconciliation, TrajectoryEvaluator};
pub use grid::ParameterGrid;
pub use hamiltonian::Hamiltonian;
pub use phase::PhaseRealignment;
pub use propagator::{ExpMethod, Propagator};
pub use scaling::{ScalingRecord, ScalingStudy};
pub use spectral::SpectrumReport;
pub use state::{StateVector, Trajectory};
pub use sweep::{SweepObserver, SweepOutcome, SweepSession};

/// Total reconciliation error of `config`. Noise, if any, is drawn fresh
/// from the thread RNG.
pub fn evaluate(config: &Configuration) -> PathwayResult<f64> {
    TrajectoryEvaluator::new().evaluate(config, &mut rand::thread_rng())
}

/// Best configuration and error over `grid`, in a fresh session.
pub fn sweep(grid: &ParameterGrid) -> PathwayResult<(Configuration, f64)> {
    let outcome = SweepSession::new().sweep(grid)?;
    Ok((outcome.configuration, outcome.error))
}

/// Scaling records for `sizes`, in a fresh session.
pub fn scaling_study(
    sizes: &[usize],
    template: &ParameterGrid,
) -> PathwayResult<Vec<ScalingRecord>> {
    ScalingStudy::new(SweepSession::new()).run(sizes, template)
}

/// Gap uniformity of the Hamiltonian built for `config`. Noise, if any, is
/// drawn fresh from the thread RNG.
pub fn spectral_gap_uniformity(config: &Configuration) -> PathwayResult<f64> {
    let hamiltonian = Hamiltonian::tight_binding(config, &mut rand::thread_rng())?;
    spectral::gap_uniformity(&hamiltonian)
}
