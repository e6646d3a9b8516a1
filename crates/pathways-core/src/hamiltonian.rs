//! Tight-binding lattice Hamiltonians.
//!
//! The model is a 1-D open chain of N sites with nearest-neighbour hopping
//! and a quasi-periodic on-site potential:
//!
//!   H_ii      = V0 · cos(2π i / N)  + σ ξ_i
//!   H_i,i+1   = H_i+1,i = g         + σ η_i
//!
//! where ξ_i, η_i ~ N(0, 1) are independent and σ is the configuration's
//! noise amplitude. Each coupling draw is shared by both off-diagonal
//! entries, so noisy Hamiltonians stay real symmetric.
//!
//! # Example
//!
//! ```rust
//! use pathways_core::{Configuration, Hamiltonian};
//!
//! let config = Configuration::new(3, 1, 1.0).with_potential(0.0);
//! let h = Hamiltonian::tight_binding(&config, &mut rand::thread_rng()).unwrap();
//! assert_eq!(h.dim(), 3);
//! assert_eq!(h.hermiticity_defect(), 0.0);
//! ```

use std::f64::consts::PI;

use nalgebra::DMatrix;
use num_complex::Complex64;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

use crate::config::Configuration;
use crate::error::{PathwayError, PathwayResult};

/// A dense N×N complex Hamiltonian.
#[derive(Debug, Clone, PartialEq)]
pub struct Hamiltonian {
    matrix: DMatrix<Complex64>,
}

impl Hamiltonian {
    /// Build the lattice Hamiltonian for `config`.
    ///
    /// Gaussian jitter is drawn from `rng` in site order: the diagonal entry
    /// of site i, then the coupling to site i+1. A noiseless configuration
    /// draws nothing and leaves `rng` untouched.
    pub fn tight_binding<R: Rng + ?Sized>(
        config: &Configuration,
        rng: &mut R,
    ) -> PathwayResult<Self> {
        config.validate()?;
        let n = config.lattice_size;
        let noise = config.noise_amplitude;
        let mut jitter = || -> f64 {
            if noise == 0.0 {
                0.0
            } else {
                let xi: f64 = StandardNormal.sample(&mut *rng);
                noise * xi
            }
        };

        let mut matrix = DMatrix::zeros(n, n);
        for i in 0..n {
            let onsite = on_site_potential(i, n, config.potential_scale) + jitter();
            matrix[(i, i)] = Complex64::new(onsite, 0.0);
            if i + 1 < n {
                let hop = Complex64::new(config.coupling + jitter(), 0.0);
                matrix[(i, i + 1)] = hop;
                matrix[(i + 1, i)] = hop;
            }
        }
        Ok(Self { matrix })
    }

    /// Wrap an explicit matrix. The matrix must be square.
    pub fn from_matrix(matrix: DMatrix<Complex64>) -> PathwayResult<Self> {
        if !matrix.is_square() {
            return Err(PathwayError::NotSquare {
                rows: matrix.nrows(),
                cols: matrix.ncols(),
            });
        }
        Ok(Self { matrix })
    }

    /// Build from a real matrix given row-major.
    pub fn from_real_rows(n: usize, rows: &[f64]) -> PathwayResult<Self> {
        if rows.len() != n * n {
            return Err(PathwayError::NotSquare {
                rows: n,
                cols: rows.len() / n.max(1),
            });
        }
        let matrix = DMatrix::from_row_iterator(n, n, rows.iter().map(|&x| Complex64::new(x, 0.0)));
        Ok(Self { matrix })
    }

    /// Hilbert-space dimension N.
    pub fn dim(&self) -> usize {
        self.matrix.nrows()
    }

    /// The underlying matrix.
    pub fn matrix(&self) -> &DMatrix<Complex64> {
        &self.matrix
    }

    /// `max_ij |H_ij − conj(H_ji)|`; zero for an exactly Hermitian matrix.
    pub fn hermiticity_defect(&self) -> f64 {
        let n = self.dim();
        let mut worst = 0.0_f64;
        for i in 0..n {
            for j in i..n {
                let d = (self.matrix[(i, j)] - self.matrix[(j, i)].conj()).norm();
                worst = worst.max(d);
            }
        }
        worst
    }

    /// True if `hermiticity_defect() <= tol`.
    pub fn is_hermitian(&self, tol: f64) -> bool {
        self.hermiticity_defect() <= tol
    }

    /// The Hermitian part `(H + H†) / 2`.
    #[must_use]
    pub fn hermitian_part(&self) -> Self {
        let sym = (&self.matrix + self.matrix.adjoint()).unscale(2.0);
        Self { matrix: sym }
    }

    /// True if every entry is finite.
    pub fn is_finite(&self) -> bool {
        self.matrix
            .iter()
            .all(|z| z.re.is_finite() && z.im.is_finite())
    }
}

/// Quasi-periodic on-site energy `V0 · cos(2π i / N)` of site `i`.
pub fn on_site_potential(i: usize, n: usize, v0: f64) -> f64 {
    v0 * (2.0 * PI * i as f64 / n as f64).cos()
}
