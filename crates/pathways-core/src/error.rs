//! Error types for the reconciliation engine.

use thiserror::Error;

/// Errors produced while building, propagating, or scoring a lattice model.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum PathwayError {
    /// A configuration field is out of range; raised before any matrix work.
    #[error("invalid configuration: {field} {reason}")]
    InvalidConfiguration {
        /// Name of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// A parameter grid axis has no candidate values.
    #[error("parameter grid axis '{axis}' has no candidates")]
    EmptyGrid {
        /// Name of the empty axis.
        axis: &'static str,
    },

    /// An explicit Hamiltonian matrix is not square.
    #[error("Hamiltonian must be square, got {rows}x{cols}")]
    NotSquare {
        /// Row count.
        rows: usize,
        /// Column count.
        cols: usize,
    },

    /// An exact spectral exponential was requested for a non-Hermitian matrix.
    #[error("Hamiltonian is not Hermitian (defect {defect:e}); use the Padé exponential")]
    NotHermitian {
        /// `max |H − H†|`.
        defect: f64,
    },

    /// An operator and a state vector disagree on dimension.
    #[error("dimension mismatch: operator is {expected}x{expected}, state has {found} amplitudes")]
    DimensionMismatch {
        /// Operator dimension.
        expected: usize,
        /// State length.
        found: usize,
    },

    /// A matrix exponential, eigen-decomposition or propagation step produced
    /// non-finite values.
    #[error("numerical instability during {stage}")]
    NumericalInstability {
        /// The stage that produced the non-finite value.
        stage: &'static str,
    },

    /// A vector with zero (or non-finite) norm reached normalisation.
    #[error("cannot normalise a state with zero norm")]
    ZeroNormState,
}

impl PathwayError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            field,
            reason: reason.into(),
        }
    }
}

/// Result type for reconciliation operations.
pub type PathwayResult<T> = Result<T, PathwayError>;
