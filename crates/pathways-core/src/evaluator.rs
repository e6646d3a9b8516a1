//! Forward/backward trajectory reconciliation.
//!
//! Algorithm for one configuration:
//!
//! ```text
//!   ψ_f[0]  = (1, …, 1) / √N
//!   ψ_f[t+1] = U ψ_f[t]                          t = 0 … T-1
//!   P(T)    = |ψ_f[T]|²                          (final phase discarded)
//!   ψ_b[T]  = √P(T)                              (zero-phase hypothesis)
//!   ψ_b[t]  = Realign(U⁻¹ ψ_b[t+1])              t = T-1 … 0
//!   error   = Σ_t Σ_k (|ψ_f[t]_k|² − |ψ_b[t]_k|²)²
//! ```
//!
//! The boundary term at t = T is scored against P(T) itself, the distribution
//! ψ_b[T] was built from, so it contributes exactly zero.

use rand::Rng;
use tracing::trace;

use crate::config::Configuration;
use crate::error::{PathwayError, PathwayResult};
use crate::hamiltonian::Hamiltonian;
use crate::phase::PhaseRealignment;
use crate::propagator::{ExpMethod, Propagator};
use crate::state::{StateVector, Trajectory};

/// Full output of one evaluation.
#[derive(Debug, Clone)]
pub struct Reconciliation {
    /// Forward trajectory, T+1 states.
    pub forward: Trajectory,
    /// Backward reconstruction, T+1 states.
    pub backward: Trajectory,
    /// Squared distribution mismatch per time step.
    pub step_errors: Vec<f64>,
    /// Sum of `step_errors`.
    pub total_error: f64,
}

/// Runs the forward propagation, backward reconstruction and scoring.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrajectoryEvaluator {
    method: ExpMethod,
}

impl TrajectoryEvaluator {
    /// Evaluator using [`ExpMethod::Auto`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the matrix-exponential method.
    #[must_use]
    pub fn with_method(mut self, method: ExpMethod) -> Self {
        self.method = method;
        self
    }

    /// Total error for `config`, drawing Hamiltonian noise from `rng`.
    pub fn evaluate<R: Rng + ?Sized>(
        &self,
        config: &Configuration,
        rng: &mut R,
    ) -> PathwayResult<f64> {
        Ok(self.reconcile(config, rng)?.total_error)
    }

    /// Full reconciliation for `config`, drawing Hamiltonian noise from `rng`.
    pub fn reconcile<R: Rng + ?Sized>(
        &self,
        config: &Configuration,
        rng: &mut R,
    ) -> PathwayResult<Reconciliation> {
        let hamiltonian = Hamiltonian::tight_binding(config, rng)?;
        self.reconcile_hamiltonian(config, &hamiltonian)
    }

    /// Full reconciliation against an already-built Hamiltonian.
    ///
    /// `config` supplies T, dt and the phase precision; its lattice size must
    /// match the Hamiltonian.
    pub fn reconcile_hamiltonian(
        &self,
        config: &Configuration,
        hamiltonian: &Hamiltonian,
    ) -> PathwayResult<Reconciliation> {
        config.validate()?;
        if hamiltonian.dim() != config.lattice_size {
            return Err(PathwayError::DimensionMismatch {
                expected: hamiltonian.dim(),
                found: config.lattice_size,
            });
        }

        let propagator = Propagator::with_method(hamiltonian, config.time_step, self.method)?;
        let realign = PhaseRealignment::new(config.phase_precision);
        let steps = config.num_steps;

        // Forward evolution.
        let mut forward = Vec::with_capacity(steps + 1);
        forward.push(StateVector::uniform(config.lattice_size));
        for _ in 0..steps {
            let next = propagator.step_forward(&forward[forward.len() - 1])?;
            if !next.is_finite() {
                return Err(PathwayError::NumericalInstability {
                    stage: "forward propagation",
                });
            }
            forward.push(next);
        }

        // Only the final distribution crosses over to the backward path.
        let final_distribution = forward[steps].probabilities();

        let mut backward = vec![StateVector::from_distribution(&final_distribution)];
        for _ in 0..steps {
            let rewound = propagator.step_backward(&backward[backward.len() - 1])?;
            backward.push(realign.apply(&rewound)?);
        }
        backward.reverse();

        let mut step_errors = Vec::with_capacity(steps + 1);
        for t in 0..=steps {
            let p_fwd = forward[t].probabilities();
            let p_bwd = if t == steps {
                final_distribution.clone()
            } else {
                backward[t].probabilities()
            };
            step_errors.push(distribution_mismatch(&p_fwd, &p_bwd));
        }
        let total_error: f64 = step_errors.iter().sum();

        if !total_error.is_finite() {
            return Err(PathwayError::NumericalInstability { stage: "scoring" });
        }
        trace!(%config, total_error, "evaluated configuration");

        Ok(Reconciliation {
            forward: Trajectory::from_states(forward),
            backward: Trajectory::from_states(backward),
            step_errors,
            total_error,
        })
    }
}

/// `Σ_k (p_k − q_k)²`.
pub fn distribution_mismatch(p: &[f64], q: &[f64]) -> f64 {
    p.iter().zip(q).map(|(a, b)| (a - b) * (a - b)).sum()
}
