//! Exhaustive parameter sweeps.
//!
//! A [`SweepSession`] owns everything that outlives a single sweep: the
//! append-only error history, the base noise seed, and the evaluator
//! settings. Create a new session to start a fresh history.
//!
//! Evaluation fans out over grid enumeration indices (rayon, when the
//! `parallel` feature is enabled); the reduction runs on the calling thread
//! in enumeration order, so parallel and sequential sweeps produce the same
//! best configuration and the same history.
//!
//! Every evaluation draws its Hamiltonian noise from its own `StdRng`
//! seeded with `base_seed + history_index`, which makes any individual
//! evaluation (in particular the winner) reproducible after the fact.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::Configuration;
use crate::error::{PathwayError, PathwayResult};
use crate::evaluator::TrajectoryEvaluator;
use crate::grid::ParameterGrid;
use crate::hamiltonian::Hamiltonian;

/// Progress callbacks for long sweeps.
///
/// `evaluated` may be called from worker threads and in completion order;
/// `improved` is called on the sweeping thread in enumeration order.
pub trait SweepObserver: Send + Sync {
    /// One configuration finished (successfully or not).
    fn evaluated(&self, _index: usize, _total: usize) {}

    /// A new best error was found.
    fn improved(&self, _config: &Configuration, _error: f64) {}
}

/// Best result of one sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepOutcome {
    /// Configuration with the lowest error (first seen on ties).
    pub configuration: Configuration,
    /// Its total error.
    pub error: f64,
    /// Its enumeration index within the grid.
    pub index: usize,
    /// Seed its Hamiltonian noise was drawn with.
    pub noise_seed: u64,
}

impl SweepOutcome {
    /// Rebuild the exact Hamiltonian the winning evaluation used.
    pub fn hamiltonian(&self) -> PathwayResult<Hamiltonian> {
        let mut rng = StdRng::seed_from_u64(self.noise_seed);
        Hamiltonian::tight_binding(&self.configuration, &mut rng)
    }
}

/// Optimizer state scoped to one caller-controlled session.
pub struct SweepSession {
    evaluator: TrajectoryEvaluator,
    base_seed: u64,
    parallel: bool,
    history: Vec<f64>,
    observer: Option<Arc<dyn SweepObserver>>,
}

impl SweepSession {
    /// A session with a base seed drawn from the thread RNG.
    pub fn new() -> Self {
        Self::with_seed(rand::thread_rng().r#gen())
    }

    /// A session with a fixed base seed.
    pub fn with_seed(base_seed: u64) -> Self {
        Self {
            evaluator: TrajectoryEvaluator::new(),
            base_seed,
            parallel: true,
            history: Vec::new(),
            observer: None,
        }
    }

    /// Replace the evaluator.
    #[must_use]
    pub fn with_evaluator(mut self, evaluator: TrajectoryEvaluator) -> Self {
        self.evaluator = evaluator;
        self
    }

    /// Enable or disable parallel fan-out. Has no effect without the
    /// `parallel` feature.
    #[must_use]
    pub fn parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Attach a progress observer.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn SweepObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Base seed of this session.
    pub fn base_seed(&self) -> u64 {
        self.base_seed
    }

    /// Whether evaluation fans out over threads.
    pub fn is_parallel(&self) -> bool {
        self.parallel && cfg!(feature = "parallel")
    }

    /// The evaluator used for every configuration.
    pub fn evaluator(&self) -> &TrajectoryEvaluator {
        &self.evaluator
    }

    /// Every error computed in this session, in enumeration order.
    pub fn history(&self) -> &[f64] {
        &self.history
    }

    /// Best-so-far error after each history entry.
    pub fn running_best(&self) -> Vec<f64> {
        self.history
            .iter()
            .scan(f64::INFINITY, |best, &e| {
                *best = best.min(e);
                Some(*best)
            })
            .collect()
    }

    /// Noise seed for the evaluation stored at `history_index`.
    pub fn noise_seed(&self, history_index: usize) -> u64 {
        self.base_seed.wrapping_add(history_index as u64)
    }

    /// Evaluate every configuration of `grid` and return the best.
    ///
    /// Aborts on the first failing configuration in enumeration order; the
    /// errors of the configurations before it stay in the history.
    pub fn sweep(&mut self, grid: &ParameterGrid) -> PathwayResult<SweepOutcome> {
        grid.validate()?;
        let total = grid.len();
        let offset = self.history.len();
        info!(
            total,
            parallel = self.is_parallel(),
            base_seed = self.base_seed,
            "sweeping parameter grid"
        );

        let results = self.evaluate_all(grid, offset);

        let mut best: Option<SweepOutcome> = None;
        for (index, result) in results.into_iter().enumerate() {
            let error = match result {
                Ok(error) => error,
                Err(err) => {
                    warn!(index, %err, "sweep aborted");
                    return Err(err);
                }
            };
            self.history.push(error);

            if best.is_none_or(|b| error < b.error) {
                let configuration = grid
                    .configuration(index)
                    .ok_or(PathwayError::EmptyGrid { axis: "lattice_size" })?;
                debug!(index, error, %configuration, "new best error");
                if let Some(observer) = &self.observer {
                    observer.improved(&configuration, error);
                }
                best = Some(SweepOutcome {
                    configuration,
                    error,
                    index,
                    noise_seed: self.noise_seed(offset + index),
                });
            }
        }

        let best = best.ok_or(PathwayError::EmptyGrid { axis: "lattice_size" })?;
        info!(error = best.error, configuration = %best.configuration, "sweep complete");
        Ok(best)
    }

    fn evaluate_all(&self, grid: &ParameterGrid, offset: usize) -> Vec<PathwayResult<f64>> {
        let total = grid.len();
        let evaluate_one = |index: usize| -> PathwayResult<f64> {
            let config = grid
                .configuration(index)
                .ok_or(PathwayError::EmptyGrid { axis: "lattice_size" })?;
            let mut rng = StdRng::seed_from_u64(self.noise_seed(offset + index));
            let result = self.evaluator.evaluate(&config, &mut rng);
            if let Some(observer) = &self.observer {
                observer.evaluated(index, total);
            }
            result
        };

        #[cfg(feature = "parallel")]
        if self.parallel {
            return (0..total).into_par_iter().map(&evaluate_one).collect();
        }

        let mut results = Vec::with_capacity(total);
        for index in 0..total {
            let result = evaluate_one(index);
            let failed = result.is_err();
            results.push(result);
            if failed {
                break;
            }
        }
        results
    }
}

impl Default for SweepSession {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SweepSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SweepSession")
            .field("evaluator", &self.evaluator)
            .field("base_seed", &self.base_seed)
            .field("parallel", &self.parallel)
            .field("history_len", &self.history.len())
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_grid() -> ParameterGrid {
        ParameterGrid {
            lattice_size: vec![4],
            num_steps: vec![1, 2],
            time_step: vec![0.8, 1.0],
            potential_scale: vec![1.0],
            coupling: vec![0.2],
            noise_amplitude: vec![0.0],
            phase_precision: vec![5, 7],
        }
    }

    #[test]
    fn test_history_grows_per_sweep() {
        let mut session = SweepSession::with_seed(3);
        session.sweep(&small_grid()).unwrap();
        assert_eq!(session.history().len(), 8);
        session.sweep(&small_grid()).unwrap();
        assert_eq!(session.history().len(), 16);
    }

    #[test]
    fn test_running_best_is_non_increasing() {
        let mut session = SweepSession::with_seed(3);
        session.sweep(&small_grid()).unwrap();
        let curve = session.running_best();
        assert!(curve.windows(2).all(|w| w[1] <= w[0]));
    }

    #[test]
    fn test_empty_grid_is_error() {
        let mut grid = small_grid();
        grid.phase_precision.clear();
        let mut session = SweepSession::with_seed(0);
        assert!(matches!(
            session.sweep(&grid),
            Err(PathwayError::EmptyGrid { axis: "phase_precision" })
        ));
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_ties_keep_first_seen() {
        // T = 0 scores exactly zero for every configuration.
        let grid = ParameterGrid {
            num_steps: vec![0],
            ..small_grid()
        };
        let outcome = SweepSession::with_seed(0).sweep(&grid).unwrap();
        assert_eq!(outcome.index, 0);
        assert_eq!(outcome.error, 0.0);
    }

    #[test]
    fn test_noise_seed_offsets_by_history() {
        let session = SweepSession::with_seed(10);
        assert_eq!(session.noise_seed(0), 10);
        assert_eq!(session.noise_seed(5), 15);
        assert_eq!(SweepSession::with_seed(u64::MAX).noise_seed(1), 0);
    }
}
