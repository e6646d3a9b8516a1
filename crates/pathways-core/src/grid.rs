//! Cartesian parameter grids.
//!
//! A [`ParameterGrid`] holds one ordered candidate list per configuration
//! field. Combinations are enumerated in nested lexicographic order with the
//! fields in declaration order, outermost first:
//!
//! ```text
//! lattice_size › num_steps › time_step › potential_scale › coupling
//!     › noise_amplitude › phase_precision (fastest)
//! ```
//!
//! Enumeration is lazy and random-access: [`ParameterGrid::configuration`]
//! decodes an enumeration index directly, which is what the parallel sweep
//! fans out over.
//!
//! Grids deserialize from the short field names used by experiment scripts
//! (`N`, `T`, `dt`, `V0`, `g`, `noise`) as well as the full names.

use serde::{Deserialize, Serialize};

use crate::config::Configuration;
use crate::error::{PathwayError, PathwayResult};

const AXES: [&str; 7] = [
    "lattice_size",
    "num_steps",
    "time_step",
    "potential_scale",
    "coupling",
    "noise_amplitude",
    "phase_precision",
];

/// Candidate values for every configuration field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParameterGrid {
    /// Lattice sizes N.
    #[serde(alias = "N")]
    pub lattice_size: Vec<usize>,
    /// Step counts T.
    #[serde(alias = "T")]
    pub num_steps: Vec<usize>,
    /// Time steps dt.
    #[serde(alias = "dt")]
    pub time_step: Vec<f64>,
    /// Potential amplitudes V0.
    #[serde(alias = "V0")]
    pub potential_scale: Vec<f64>,
    /// Couplings g.
    #[serde(alias = "g")]
    pub coupling: Vec<f64>,
    /// Noise amplitudes.
    #[serde(alias = "noise")]
    pub noise_amplitude: Vec<f64>,
    /// Phase-realignment periods.
    pub phase_precision: Vec<u32>,
}

impl ParameterGrid {
    /// The 192-point grid of the reference experiment, at N = 3.
    ///
    /// Scaling studies override the lattice axis per size.
    pub fn reference() -> Self {
        Self {
            lattice_size: vec![3],
            num_steps: vec![4, 5],
            time_step: vec![0.8, 1.0],
            potential_scale: vec![0.8, 1.0],
            coupling: vec![0.15, 0.2],
            noise_amplitude: vec![0.005, 0.01],
            phase_precision: vec![5, 7, 10],
        }
    }

    /// A one-point grid containing exactly `config`.
    pub fn single(config: &Configuration) -> Self {
        Self {
            lattice_size: vec![config.lattice_size],
            num_steps: vec![config.num_steps],
            time_step: vec![config.time_step],
            potential_scale: vec![config.potential_scale],
            coupling: vec![config.coupling],
            noise_amplitude: vec![config.noise_amplitude],
            phase_precision: vec![config.phase_precision],
        }
    }

    /// Replace the lattice-size axis.
    #[must_use]
    pub fn with_lattice_sizes(mut self, sizes: Vec<usize>) -> Self {
        self.lattice_size = sizes;
        self
    }

    /// Number of candidates per axis, in enumeration order.
    pub fn axis_lens(&self) -> [usize; 7] {
        [
            self.lattice_size.len(),
            self.num_steps.len(),
            self.time_step.len(),
            self.potential_scale.len(),
            self.coupling.len(),
            self.noise_amplitude.len(),
            self.phase_precision.len(),
        ]
    }

    /// Total number of combinations.
    pub fn len(&self) -> usize {
        self.axis_lens().iter().product()
    }

    /// True if any axis is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fail with `EmptyGrid` naming the first empty axis.
    pub fn validate(&self) -> PathwayResult<()> {
        for (axis, len) in AXES.into_iter().zip(self.axis_lens()) {
            if len == 0 {
                return Err(PathwayError::EmptyGrid { axis });
            }
        }
        Ok(())
    }

    /// The configuration at enumeration position `index`.
    pub fn configuration(&self, index: usize) -> Option<Configuration> {
        if index >= self.len() {
            return None;
        }
        let lens = self.axis_lens();
        let mut digits = [0usize; 7];
        let mut rem = index;
        for axis in (0..lens.len()).rev() {
            digits[axis] = rem % lens[axis];
            rem /= lens[axis];
        }
        Some(Configuration {
            lattice_size: self.lattice_size[digits[0]],
            num_steps: self.num_steps[digits[1]],
            time_step: self.time_step[digits[2]],
            potential_scale: self.potential_scale[digits[3]],
            coupling: self.coupling[digits[4]],
            noise_amplitude: self.noise_amplitude[digits[5]],
            phase_precision: self.phase_precision[digits[6]],
        })
    }

    /// Iterate over every combination in enumeration order.
    pub fn iter(&self) -> GridIter<'_> {
        GridIter {
            grid: self,
            next: 0,
            len: self.len(),
        }
    }
}

impl Default for ParameterGrid {
    fn default() -> Self {
        Self::reference()
    }
}

impl<'a> IntoIterator for &'a ParameterGrid {
    type Item = Configuration;
    type IntoIter = GridIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazy iterator over a [`ParameterGrid`].
#[derive(Debug, Clone)]
pub struct GridIter<'a> {
    grid: &'a ParameterGrid,
    next: usize,
    len: usize,
}

impl Iterator for GridIter<'_> {
    type Item = Configuration;

    fn next(&mut self) -> Option<Configuration> {
        if self.next >= self.len {
            return None;
        }
        let config = self.grid.configuration(self.next);
        self.next += 1;
        config
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for GridIter<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_grid_size() {
        assert_eq!(ParameterGrid::reference().len(), 192);
    }

    #[test]
    fn test_enumeration_is_lexicographic() {
        let grid = ParameterGrid {
            lattice_size: vec![2, 3],
            num_steps: vec![1],
            time_step: vec![1.0],
            potential_scale: vec![0.0],
            coupling: vec![1.0],
            noise_amplitude: vec![0.0],
            phase_precision: vec![5, 7],
        };
        let order: Vec<(usize, u32)> = grid
            .iter()
            .map(|c| (c.lattice_size, c.phase_precision))
            .collect();
        assert_eq!(order, vec![(2, 5), (2, 7), (3, 5), (3, 7)]);
    }

    #[test]
    fn test_random_access_matches_iteration() {
        let grid = ParameterGrid::reference();
        for (i, config) in grid.iter().enumerate() {
            assert_eq!(grid.configuration(i), Some(config));
        }
        assert_eq!(grid.configuration(grid.len()), None);
    }

    #[test]
    fn test_exact_size() {
        let grid = ParameterGrid::reference();
        let mut it = grid.iter();
        it.next();
        assert_eq!(it.len(), 191);
    }

    #[test]
    fn test_empty_axis_detected() {
        let mut grid = ParameterGrid::reference();
        grid.coupling.clear();
        assert!(grid.is_empty());
        assert_eq!(
            grid.validate(),
            Err(PathwayError::EmptyGrid { axis: "coupling" })
        );
        assert_eq!(grid.iter().count(), 0);
    }

    #[test]
    fn test_single_round_trips() {
        let config = Configuration::new(4, 2, 0.5).with_noise(0.01);
        let grid = ParameterGrid::single(&config);
        assert_eq!(grid.iter().collect::<Vec<_>>(), vec![config]);
    }

    #[test]
    fn test_short_field_aliases() {
        let json = r#"{"N":[3],"T":[1],"dt":[1.0],"V0":[0.0],"g":[1.0],"noise":[0.0],"phase_precision":[5]}"#;
        let grid: ParameterGrid = serde_json::from_str(json).unwrap();
        assert_eq!(grid.len(), 1);
        assert_eq!(grid.configuration(0).unwrap().phase_precision, 5);
    }
}
