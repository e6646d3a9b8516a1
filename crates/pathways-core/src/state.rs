//! Lattice state vectors and trajectories.

use nalgebra::DVector;
use num_complex::Complex64;

use crate::error::{PathwayError, PathwayResult};

/// A complex amplitude vector over the lattice basis.
///
/// Constructors that claim unit norm (`uniform`, `from_distribution`,
/// `normalized`) guarantee it; raw propagation results are unit-norm only up
/// to the accuracy of the evolution operator.
#[derive(Debug, Clone, PartialEq)]
pub struct StateVector {
    amplitudes: DVector<Complex64>,
}

impl StateVector {
    /// Uniform superposition: every amplitude `1/√N` with zero phase.
    pub fn uniform(n: usize) -> Self {
        let amp = Complex64::new(1.0 / (n as f64).sqrt(), 0.0);
        Self {
            amplitudes: DVector::from_element(n, amp),
        }
    }

    /// Wrap raw amplitudes without normalising.
    pub fn from_amplitudes(amplitudes: DVector<Complex64>) -> Self {
        Self { amplitudes }
    }

    /// Real, non-negative amplitudes `√p_k` built from a probability
    /// distribution. The phase is taken to be zero everywhere.
    pub fn from_distribution(probabilities: &[f64]) -> Self {
        Self {
            amplitudes: DVector::from_iterator(
                probabilities.len(),
                probabilities.iter().map(|p| Complex64::new(p.sqrt(), 0.0)),
            ),
        }
    }

    /// Number of basis states.
    pub fn len(&self) -> usize {
        self.amplitudes.len()
    }

    /// True for the empty vector.
    pub fn is_empty(&self) -> bool {
        self.amplitudes.is_empty()
    }

    /// The amplitude vector.
    pub fn amplitudes(&self) -> &DVector<Complex64> {
        &self.amplitudes
    }

    /// Consume and return the amplitude vector.
    pub fn into_amplitudes(self) -> DVector<Complex64> {
        self.amplitudes
    }

    /// L2 norm.
    pub fn norm(&self) -> f64 {
        self.amplitudes.iter().map(Complex64::norm_sqr).sum::<f64>().sqrt()
    }

    /// Squared magnitudes `|ψ_k|²`.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(Complex64::norm_sqr).collect()
    }

    /// True if every amplitude is finite.
    pub fn is_finite(&self) -> bool {
        self.amplitudes.iter().all(|a| a.re.is_finite() && a.im.is_finite())
    }

    /// Rescale to unit L2 norm.
    pub fn normalized(mut self) -> PathwayResult<Self> {
        let norm = self.norm();
        if norm == 0.0 || !norm.is_finite() {
            return Err(PathwayError::ZeroNormState);
        }
        self.amplitudes.unscale_mut(norm);
        Ok(self)
    }
}

/// An ordered sequence of states, one per time step (T+1 for T steps).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trajectory {
    states: Vec<StateVector>,
}

impl Trajectory {
    /// Build from states ordered by time step.
    pub fn from_states(states: Vec<StateVector>) -> Self {
        Self { states }
    }

    /// States ordered by time step.
    pub fn states(&self) -> &[StateVector] {
        &self.states
    }

    /// Number of recorded time steps.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// True when no state has been recorded.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Final state, if any.
    pub fn last(&self) -> Option<&StateVector> {
        self.states.last()
    }

    /// Probability distribution at every time step.
    pub fn probabilities(&self) -> Vec<Vec<f64>> {
        self.states.iter().map(StateVector::probabilities).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_is_unit_norm() {
        for n in [1, 2, 3, 17, 200] {
            let s = StateVector::uniform(n);
            assert_eq!(s.len(), n);
            assert!((s.norm() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_from_distribution_reproduces_probabilities() {
        let p = [0.5, 0.25, 0.25];
        let s = StateVector::from_distribution(&p);
        for (a, b) in s.probabilities().iter().zip(p) {
            assert!((a - b).abs() < 1e-15);
        }
        assert!(s.amplitudes().iter().all(|a| a.im == 0.0 && a.re >= 0.0));
    }

    #[test]
    fn test_normalized_rescales() {
        let s = StateVector::from_amplitudes(DVector::from_vec(vec![
            Complex64::new(3.0, 0.0),
            Complex64::new(0.0, 4.0),
        ]));
        let n = s.normalized().unwrap();
        assert!((n.norm() - 1.0).abs() < 1e-15);
        assert!((n.amplitudes()[0].re - 0.6).abs() < 1e-15);
        assert!((n.amplitudes()[1].im - 0.8).abs() < 1e-15);
    }

    #[test]
    fn test_zero_norm_rejected() {
        let s = StateVector::from_amplitudes(DVector::zeros(4));
        assert_eq!(s.normalized(), Err(PathwayError::ZeroNormState));
    }

    #[test]
    fn test_non_finite_norm_rejected() {
        let s = StateVector::from_amplitudes(DVector::from_element(2, Complex64::new(f64::NAN, 0.0)));
        assert!(!s.is_finite());
        assert_eq!(s.normalized(), Err(PathwayError::ZeroNormState));
    }
}
