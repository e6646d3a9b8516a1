//! Evaluation configuration.
//!
//! A [`Configuration`] fully determines one forward/backward evaluation:
//! lattice size, number of time steps, step length, the quasi-periodic
//! potential amplitude, the hopping strength, the noise amplitude used to
//! jitter the Hamiltonian, and the period of the phase-realignment rotation.
//!
//! # Example
//!
//! ```rust
//! use pathways_core::Configuration;
//!
//! let config = Configuration::new(3, 1, 1.0)
//!     .with_potential(0.0)
//!     .with_coupling(1.0)
//!     .with_phase_precision(5);
//! assert!(config.validate().is_ok());
//! assert!(config.is_noiseless());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PathwayError, PathwayResult};

/// Immutable parameters for one evaluation. Equality is structural.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// Number of lattice sites N (Hilbert-space dimension).
    pub lattice_size: usize,
    /// Number of propagation steps T; trajectories hold T+1 states.
    pub num_steps: usize,
    /// Time step dt.
    pub time_step: f64,
    /// Amplitude V0 of the on-site potential V0·cos(2πi/N).
    pub potential_scale: f64,
    /// Nearest-neighbour coupling g.
    pub coupling: f64,
    /// Standard deviation scale of the Gaussian Hamiltonian jitter.
    pub noise_amplitude: f64,
    /// Period of the index-dependent phase rotation.
    pub phase_precision: u32,
}

impl Configuration {
    /// A noiseless configuration with `V0 = 1`, `g = 1` and precision 1.
    pub fn new(lattice_size: usize, num_steps: usize, time_step: f64) -> Self {
        Self {
            lattice_size,
            num_steps,
            time_step,
            potential_scale: 1.0,
            coupling: 1.0,
            noise_amplitude: 0.0,
            phase_precision: 1,
        }
    }

    /// Set the on-site potential amplitude V0.
    #[must_use]
    pub fn with_potential(mut self, v0: f64) -> Self {
        self.potential_scale = v0;
        self
    }

    /// Set the hopping strength g.
    #[must_use]
    pub fn with_coupling(mut self, g: f64) -> Self {
        self.coupling = g;
        self
    }

    /// Set the Gaussian noise amplitude.
    #[must_use]
    pub fn with_noise(mut self, noise: f64) -> Self {
        self.noise_amplitude = noise;
        self
    }

    /// Set the phase-realignment period.
    #[must_use]
    pub fn with_phase_precision(mut self, precision: u32) -> Self {
        self.phase_precision = precision;
        self
    }

    /// Replace the lattice size.
    #[must_use]
    pub fn with_lattice_size(mut self, n: usize) -> Self {
        self.lattice_size = n;
        self
    }

    /// True when the Hamiltonian carries no random jitter.
    pub fn is_noiseless(&self) -> bool {
        self.noise_amplitude == 0.0
    }

    /// Reject configurations that cannot be evaluated.
    ///
    /// `num_steps == 0` is accepted: the trajectory is the initial state
    /// alone and the error is zero.
    pub fn validate(&self) -> PathwayResult<()> {
        if self.lattice_size == 0 {
            return Err(PathwayError::invalid("lattice_size", "must be at least 1"));
        }
        if !self.time_step.is_finite() || self.time_step <= 0.0 {
            return Err(PathwayError::invalid(
                "time_step",
                format!("must be finite and positive, got {}", self.time_step),
            ));
        }
        if self.phase_precision == 0 {
            return Err(PathwayError::invalid("phase_precision", "must be at least 1"));
        }
        if !self.noise_amplitude.is_finite() || self.noise_amplitude < 0.0 {
            return Err(PathwayError::invalid(
                "noise_amplitude",
                format!("must be finite and non-negative, got {}", self.noise_amplitude),
            ));
        }
        if !self.potential_scale.is_finite() {
            return Err(PathwayError::invalid("potential_scale", "must be finite"));
        }
        if !self.coupling.is_finite() {
            return Err(PathwayError::invalid("coupling", "must be finite"));
        }
        Ok(())
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "N={} T={} dt={} V0={} g={} noise={} precision={}",
            self.lattice_size,
            self.num_steps,
            self.time_step,
            self.potential_scale,
            self.coupling,
            self.noise_amplitude,
            self.phase_precision
        )
    }
}
