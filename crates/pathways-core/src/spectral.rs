//! Spectral gap statistics.
//!
//! Eigenvalues are computed with a dense Hermitian eigensolver, sorted
//! ascending, and differenced. The population standard deviation of the
//! gaps is the *gap uniformity*: zero for an evenly spaced spectrum, larger
//! as the spacing becomes irregular.
//!
//! Noisy lattice Hamiltonians are real symmetric by construction. A matrix
//! supplied from elsewhere that is not Hermitian within [`HERMITIAN_TOL`] is
//! replaced by its Hermitian part `(H + H†)/2` before solving, and a warning
//! is logged.

use nalgebra::SymmetricEigen;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{PathwayError, PathwayResult};
use crate::hamiltonian::Hamiltonian;
use crate::propagator::HERMITIAN_TOL;

/// Eigenvalues and gap statistics of one Hamiltonian.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectrumReport {
    /// Eigenvalues, ascending.
    pub eigenvalues: Vec<f64>,
    /// Consecutive differences of `eigenvalues`.
    pub gaps: Vec<f64>,
    /// Mean of `gaps` (0 when there are none).
    pub mean_gap: f64,
    /// Population standard deviation of `gaps` (0 when there are none).
    pub gap_uniformity: f64,
}

impl SpectrumReport {
    /// Analyse `hamiltonian`.
    pub fn analyze(hamiltonian: &Hamiltonian) -> PathwayResult<Self> {
        let eigenvalues = eigenvalues(hamiltonian)?;
        let gaps = energy_gaps(&eigenvalues);
        let (mean_gap, gap_uniformity) = mean_and_std(&gaps);
        Ok(Self {
            eigenvalues,
            gaps,
            mean_gap,
            gap_uniformity,
        })
    }
}

/// Sorted real eigenvalues of `hamiltonian` (of its Hermitian part if it is
/// not Hermitian).
pub fn eigenvalues(hamiltonian: &Hamiltonian) -> PathwayResult<Vec<f64>> {
    if !hamiltonian.is_finite() {
        return Err(PathwayError::NumericalInstability {
            stage: "eigendecomposition",
        });
    }

    let defect = hamiltonian.hermiticity_defect();
    let matrix = if defect > HERMITIAN_TOL {
        warn!(defect, "non-Hermitian Hamiltonian, solving its Hermitian part");
        hamiltonian.hermitian_part().matrix().clone()
    } else {
        hamiltonian.matrix().clone()
    };

    let eigen = SymmetricEigen::try_new(matrix, f64::EPSILON, 0).ok_or(
        PathwayError::NumericalInstability {
            stage: "eigendecomposition",
        },
    )?;
    let mut vals: Vec<f64> = eigen.eigenvalues.iter().copied().collect();
    if vals.iter().any(|v| !v.is_finite()) {
        return Err(PathwayError::NumericalInstability {
            stage: "eigendecomposition",
        });
    }
    vals.sort_by(f64::total_cmp);
    Ok(vals)
}

/// Consecutive differences of sorted eigenvalues.
pub fn energy_gaps(sorted: &[f64]) -> Vec<f64> {
    sorted.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Gap uniformity of `hamiltonian`.
pub fn gap_uniformity(hamiltonian: &Hamiltonian) -> PathwayResult<f64> {
    Ok(SpectrumReport::analyze(hamiltonian)?.gap_uniformity)
}

fn mean_and_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    (mean, var.sqrt())
}
