//! Unitary time-evolution operators.
//!
//! For a Hamiltonian H and time step dt the propagator holds
//!
//!   U   = exp(-i H dt)
//!   U⁻¹ = exp(+i H dt)
//!
//! # Spectral method (Hermitian H)
//!
//!   H = V · diag(λ) · V†   ⇒   U = V · diag(e^{-iλ dt}) · V†
//!
//! One eigendecomposition yields both operators, and U⁻¹ = U† holds to
//! working precision. This is the default for every lattice Hamiltonian the
//! builder produces.
//!
//! # Padé method (any square H)
//!
//! Scaling-and-squaring with a Padé approximant (nalgebra `Matrix::exp`).
//! Used automatically when H is not Hermitian within [`HERMITIAN_TOL`].

use nalgebra::{DMatrix, SymmetricEigen};
use num_complex::Complex64;
use tracing::debug;

use crate::error::{PathwayError, PathwayResult};
use crate::hamiltonian::Hamiltonian;
use crate::state::StateVector;

/// Largest `max |H − H†|` treated as Hermitian.
pub const HERMITIAN_TOL: f64 = 1e-12;

/// How the matrix exponential is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpMethod {
    /// `Spectral` for Hermitian input, `Pade` otherwise.
    #[default]
    Auto,
    /// Hermitian eigendecomposition.
    Spectral,
    /// Padé approximant with scaling and squaring.
    Pade,
}

/// Forward and inverse evolution operators for one (H, dt) pair.
#[derive(Debug, Clone)]
pub struct Propagator {
    forward: DMatrix<Complex64>,
    inverse: DMatrix<Complex64>,
    method: ExpMethod,
}

impl Propagator {
    /// Build both operators with [`ExpMethod::Auto`].
    pub fn new(hamiltonian: &Hamiltonian, dt: f64) -> PathwayResult<Self> {
        Self::with_method(hamiltonian, dt, ExpMethod::Auto)
    }

    /// Build both operators with an explicit exponentiation method.
    pub fn with_method(
        hamiltonian: &Hamiltonian,
        dt: f64,
        method: ExpMethod,
    ) -> PathwayResult<Self> {
        if !hamiltonian.is_finite() || !dt.is_finite() {
            return Err(PathwayError::NumericalInstability {
                stage: "hamiltonian",
            });
        }

        let defect = hamiltonian.hermiticity_defect();
        let method = match method {
            ExpMethod::Auto if defect <= HERMITIAN_TOL => ExpMethod::Spectral,
            ExpMethod::Auto => ExpMethod::Pade,
            ExpMethod::Spectral if defect > HERMITIAN_TOL => {
                return Err(PathwayError::NotHermitian { defect });
            }
            other => other,
        };

        debug!(n = hamiltonian.dim(), dt, ?method, "building propagator");

        let (forward, inverse) = match method {
            ExpMethod::Pade => pade_pair(hamiltonian.matrix(), dt),
            _ => spectral_pair(hamiltonian.matrix(), dt)?,
        };

        if !all_finite(&forward) || !all_finite(&inverse) {
            return Err(PathwayError::NumericalInstability {
                stage: "matrix exponential",
            });
        }

        Ok(Self {
            forward,
            inverse,
            method,
        })
    }

    /// U = exp(-i H dt).
    pub fn forward(&self) -> &DMatrix<Complex64> {
        &self.forward
    }

    /// U⁻¹ = exp(+i H dt).
    pub fn inverse(&self) -> &DMatrix<Complex64> {
        &self.inverse
    }

    /// The method actually used (never `Auto`).
    pub fn method(&self) -> ExpMethod {
        self.method
    }

    /// Hilbert-space dimension.
    pub fn dim(&self) -> usize {
        self.forward.nrows()
    }

    /// Advance `state` by one step.
    pub fn step_forward(&self, state: &StateVector) -> PathwayResult<StateVector> {
        apply(&self.forward, state)
    }

    /// Rewind `state` by one step.
    pub fn step_backward(&self, state: &StateVector) -> PathwayResult<StateVector> {
        apply(&self.inverse, state)
    }

    /// Frobenius norm of `U†U − I`.
    pub fn unitarity_defect(&self) -> f64 {
        let n = self.dim();
        (self.forward.adjoint() * &self.forward - DMatrix::<Complex64>::identity(n, n)).norm()
    }
}

/// Matrix-vector product `operator · state`.
pub fn apply(operator: &DMatrix<Complex64>, state: &StateVector) -> PathwayResult<StateVector> {
    if operator.ncols() != state.len() {
        return Err(PathwayError::DimensionMismatch {
            expected: operator.ncols(),
            found: state.len(),
        });
    }
    Ok(StateVector::from_amplitudes(operator * state.amplitudes()))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn spectral_pair(
    h: &DMatrix<Complex64>,
    dt: f64,
) -> PathwayResult<(DMatrix<Complex64>, DMatrix<Complex64>)> {
    // max_niter = 0 iterates to convergence; input finiteness is checked above.
    let eigen = SymmetricEigen::try_new(h.clone(), f64::EPSILON, 0).ok_or(
        PathwayError::NumericalInstability {
            stage: "eigendecomposition",
        },
    )?;
    let n = h.nrows();
    let v = &eigen.eigenvectors;
    let v_adj = v.adjoint();

    // V · diag(e^{sign·iλ dt}) · V†
    let evolve = |sign: f64| {
        let scaled = DMatrix::from_fn(n, n, |i, j| {
            v[(i, j)] * Complex64::from_polar(1.0, sign * eigen.eigenvalues[j] * dt)
        });
        scaled * &v_adj
    };

    Ok((evolve(-1.0), evolve(1.0)))
}

fn pade_pair(h: &DMatrix<Complex64>, dt: f64) -> (DMatrix<Complex64>, DMatrix<Complex64>) {
    let generator = h * Complex64::new(0.0, -dt);
    let forward = generator.exp();
    let inverse = (-generator).exp();
    (forward, inverse)
}

fn all_finite(m: &DMatrix<Complex64>) -> bool {
    m.iter().all(|z| z.re.is_finite() && z.im.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pauli_x() -> Hamiltonian {
        Hamiltonian::from_real_rows(2, &[0.0, 1.0, 1.0, 0.0]).unwrap()
    }

    #[test]
    fn test_pauli_x_rotation() {
        // exp(-i X t) = cos t · I − i sin t · X
        let t = 0.7_f64;
        let p = Propagator::new(&pauli_x(), t).unwrap();
        let u = p.forward();
        assert!((u[(0, 0)] - Complex64::new(t.cos(), 0.0)).norm() < 1e-12);
        assert!((u[(0, 1)] - Complex64::new(0.0, -t.sin())).norm() < 1e-12);
        assert_eq!(p.method(), ExpMethod::Spectral);
    }

    #[test]
    fn test_pade_matches_spectral() {
        let h = Hamiltonian::from_real_rows(3, &[0.3, 1.0, 0.0, 1.0, -0.2, 0.5, 0.0, 0.5, 0.9])
            .unwrap();
        let a = Propagator::with_method(&h, 0.8, ExpMethod::Spectral).unwrap();
        let b = Propagator::with_method(&h, 0.8, ExpMethod::Pade).unwrap();
        assert!((a.forward() - b.forward()).norm() < 1e-10);
        assert!((a.inverse() - b.inverse()).norm() < 1e-10);
    }

    #[test]
    fn test_spectral_rejects_non_hermitian() {
        let h = Hamiltonian::from_real_rows(2, &[0.0, 1.0, 0.0, 0.0]).unwrap();
        let err = Propagator::with_method(&h, 1.0, ExpMethod::Spectral).unwrap_err();
        assert!(matches!(err, PathwayError::NotHermitian { .. }));
        let auto = Propagator::new(&h, 1.0).unwrap();
        assert_eq!(auto.method(), ExpMethod::Pade);
    }

    #[test]
    fn test_non_finite_hamiltonian_is_instability() {
        let h = Hamiltonian::from_real_rows(2, &[f64::NAN, 0.0, 0.0, 1.0]).unwrap();
        assert!(matches!(
            Propagator::new(&h, 1.0),
            Err(PathwayError::NumericalInstability { .. })
        ));
    }

    #[test]
    fn test_apply_dimension_mismatch() {
        let p = Propagator::new(&pauli_x(), 1.0).unwrap();
        let state = StateVector::uniform(3);
        assert_eq!(
            p.step_forward(&state).unwrap_err(),
            PathwayError::DimensionMismatch {
                expected: 2,
                found: 3
            }
        );
    }
}
