//! Heuristic phase realignment for backward-reconstructed states.
//!
//! The backward path starts from `√P(T)` with an assumed zero phase, so every
//! rewound state carries the wrong relative phases. The realignment rotates
//! basis component k by
//!
//!   exp(i · 2π k / precision)
//!
//! and renormalises. The rotation period is `precision`, independent of the
//! lattice size, so indices wrap when `precision < N`. This is a heuristic
//! under study, not phase estimation: no ancillas, no eigenvalue readout.

use std::f64::consts::TAU;

use num_complex::Complex64;

use crate::error::PathwayResult;
use crate::state::StateVector;

/// Index-dependent phase rotation with a fixed period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseRealignment {
    precision: u32,
}

impl PhaseRealignment {
    /// A realignment with the given rotation period (must be non-zero;
    /// configurations are validated before reaching here).
    pub fn new(precision: u32) -> Self {
        Self { precision }
    }

    /// The rotation period.
    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// Unit phase factor applied to basis index `k`.
    pub fn phase_factor(&self, k: usize) -> Complex64 {
        // Reduce first so large k keeps full angle precision.
        let reduced = (k % self.precision as usize) as f64;
        Complex64::from_polar(1.0, TAU * reduced / f64::from(self.precision))
    }

    /// Rotate every component and renormalise to unit norm.
    ///
    /// Fails with `ZeroNormState` for a zero or non-finite input.
    pub fn apply(&self, state: &StateVector) -> PathwayResult<StateVector> {
        let mut amplitudes = state.amplitudes().clone();
        for (k, amp) in amplitudes.iter_mut().enumerate() {
            *amp *= self.phase_factor(k);
        }
        StateVector::from_amplitudes(amplitudes).normalized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PathwayError;
    use nalgebra::DVector;

    #[test]
    fn test_phase_factor_period() {
        let r = PhaseRealignment::new(5);
        assert!((r.phase_factor(0) - Complex64::new(1.0, 0.0)).norm() < 1e-15);
        assert!((r.phase_factor(7) - r.phase_factor(2)).norm() < 1e-15);
        let quarter = PhaseRealignment::new(4).phase_factor(1);
        assert!((quarter - Complex64::new(0.0, 1.0)).norm() < 1e-15);
    }

    #[test]
    fn test_magnitudes_preserved_for_unit_input() {
        let s = StateVector::uniform(6);
        let out = PhaseRealignment::new(4).apply(&s).unwrap();
        for (a, b) in out.probabilities().iter().zip(s.probabilities()) {
            assert!((a - b).abs() < 1e-15);
        }
    }

    #[test]
    fn test_renormalises() {
        let s = StateVector::from_amplitudes(DVector::from_element(3, Complex64::new(2.0, 0.0)));
        let out = PhaseRealignment::new(7).apply(&s).unwrap();
        assert!((out.norm() - 1.0).abs() < 1e-14);
    }

    #[test]
    fn test_precision_one_is_identity_rotation() {
        let s = StateVector::uniform(4);
        let out = PhaseRealignment::new(1).apply(&s).unwrap();
        assert!((out.amplitudes() - s.amplitudes()).norm() < 1e-15);
    }

    #[test]
    fn test_zero_state_is_error() {
        let s = StateVector::from_amplitudes(DVector::zeros(3));
        assert_eq!(
            PhaseRealignment::new(3).apply(&s),
            Err(PathwayError::ZeroNormState)
        );
    }
}
