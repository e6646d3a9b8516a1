//! Lattice-size scaling studies.
//!
//! For each requested size the template grid's lattice axis is replaced by
//! that single size, the grid is swept, and the winning Hamiltonian (rebuilt
//! from the winner's noise seed) is handed to the spectral analyser.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::Configuration;
use crate::error::PathwayResult;
use crate::grid::ParameterGrid;
use crate::spectral;
use crate::sweep::SweepSession;

/// Best result for one lattice size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalingRecord {
    /// Lattice size N.
    pub lattice_size: usize,
    /// Lowest total error over the grid at this size.
    pub best_error: f64,
    /// Gap uniformity of the winning Hamiltonian.
    pub gap_uniformity: f64,
    /// The winning configuration.
    pub best_configuration: Configuration,
    /// Noise seed of the winning evaluation.
    pub noise_seed: u64,
}

/// Drives a [`SweepSession`] across a sequence of lattice sizes.
#[derive(Debug)]
pub struct ScalingStudy {
    session: SweepSession,
    records: Vec<ScalingRecord>,
}

impl ScalingStudy {
    /// Wrap a session; its history keeps growing across sizes.
    pub fn new(session: SweepSession) -> Self {
        Self {
            session,
            records: Vec::new(),
        }
    }

    /// Sweep `template` at each size in `sizes`, in order.
    ///
    /// Returns the records of this call; they are also appended to
    /// [`records`](Self::records). Repeated sizes produce repeated records.
    ///
    /// If a size fails, the error is returned and the records of the sizes
    /// before it stay in [`records`](Self::records).
    pub fn run(
        &mut self,
        sizes: &[usize],
        template: &ParameterGrid,
    ) -> PathwayResult<Vec<ScalingRecord>> {
        let mut produced = Vec::with_capacity(sizes.len());
        for &n in sizes {
            let grid = template.clone().with_lattice_sizes(vec![n]);
            let outcome = self.session.sweep(&grid)?;
            let hamiltonian = outcome.hamiltonian()?;
            let gap_uniformity = spectral::gap_uniformity(&hamiltonian)?;

            info!(
                n,
                best_error = outcome.error,
                gap_uniformity,
                configuration = %outcome.configuration,
                "scaling step complete"
            );

            let record = ScalingRecord {
                lattice_size: n,
                best_error: outcome.error,
                gap_uniformity,
                best_configuration: outcome.configuration,
                noise_seed: outcome.noise_seed,
            };
            self.records.push(record.clone());
            produced.push(record);
        }
        Ok(produced)
    }

    /// Every record produced by this study so far.
    pub fn records(&self) -> &[ScalingRecord] {
        &self.records
    }

    /// The underlying session.
    pub fn session(&self) -> &SweepSession {
        &self.session
    }

    /// Release the session, e.g. to inspect its full history.
    pub fn into_session(self) -> SweepSession {
        self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template() -> ParameterGrid {
        ParameterGrid {
            lattice_size: vec![99],
            num_steps: vec![2],
            time_step: vec![1.0],
            potential_scale: vec![0.8],
            coupling: vec![0.2],
            noise_amplitude: vec![0.0],
            phase_precision: vec![5, 7],
        }
    }

    #[test]
    fn test_records_follow_input_order() {
        let mut study = ScalingStudy::new(SweepSession::with_seed(1));
        let records = study.run(&[5, 3, 5], &template()).unwrap();
        let sizes: Vec<usize> = records.iter().map(|r| r.lattice_size).collect();
        assert_eq!(sizes, vec![5, 3, 5]);
        assert!(records
            .iter()
            .all(|r| r.best_configuration.lattice_size == r.lattice_size));
        assert_eq!(study.records().len(), 3);
        assert_eq!(study.session().history().len(), 6);
    }

    #[test]
    fn test_template_size_is_ignored() {
        let mut study = ScalingStudy::new(SweepSession::with_seed(1));
        let records = study.run(&[4], &template()).unwrap();
        assert_eq!(records[0].best_configuration.lattice_size, 4);
    }

    #[test]
    fn test_failed_size_keeps_earlier_records() {
        let mut study = ScalingStudy::new(SweepSession::with_seed(1));
        let err = study.run(&[4, 0, 5], &template()).unwrap_err();
        assert!(matches!(
            err,
            crate::error::PathwayError::InvalidConfiguration { field: "lattice_size", .. }
        ));
        assert_eq!(study.records().len(), 1);
        assert_eq!(study.records()[0].lattice_size, 4);
    }

    #[test]
    fn test_into_session_exposes_full_history() {
        let mut study = ScalingStudy::new(SweepSession::with_seed(2));
        study.run(&[3, 4], &template()).unwrap();
        let session = study.into_session();
        assert_eq!(session.history().len(), 4);
        assert_eq!(session.running_best().len(), 4);
        assert_eq!(session.base_seed(), 2);
    }

    #[test]
    fn test_empty_sizes_produce_no_records() {
        let mut study = ScalingStudy::new(SweepSession::with_seed(1));
        assert!(study.run(&[], &template()).unwrap().is_empty());
    }
}
