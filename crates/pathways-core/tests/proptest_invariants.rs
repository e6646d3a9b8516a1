//! Property-based tests for reconciliation invariants.
//!
//! Covers non-negativity of the error, the zero-step identity, unitarity of
//! the propagator and the grid enumeration order over random inputs.

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use pathways_core::{Configuration, Hamiltonian, ParameterGrid, Propagator, TrajectoryEvaluator};

/// Small but otherwise arbitrary valid configurations.
fn arb_configuration() -> impl Strategy<Value = Configuration> {
    (
        1_usize..=12,
        0_usize..=5,
        0.05_f64..2.0,
        -2.0_f64..2.0,
        -1.0_f64..1.0,
        prop_oneof![Just(0.0), 0.0_f64..0.05],
        1_u32..=12,
    )
        .prop_map(|(n, t, dt, v0, g, noise, precision)| Configuration {
            lattice_size: n,
            num_steps: t,
            time_step: dt,
            potential_scale: v0,
            coupling: g,
            noise_amplitude: noise,
            phase_precision: precision,
        })
}

proptest! {
    #[test]
    fn error_is_non_negative(config in arb_configuration(), seed in any::<u64>()) {
        let error = TrajectoryEvaluator::new()
            .evaluate(&config, &mut StdRng::seed_from_u64(seed))
            .unwrap();
        prop_assert!(error >= 0.0);
        prop_assert!(error.is_finite());
    }

    #[test]
    fn zero_steps_score_zero(config in arb_configuration(), seed in any::<u64>()) {
        let config = Configuration { num_steps: 0, ..config };
        let error = TrajectoryEvaluator::new()
            .evaluate(&config, &mut StdRng::seed_from_u64(seed))
            .unwrap();
        prop_assert_eq!(error, 0.0);
    }

    #[test]
    fn trajectories_have_t_plus_one_unit_states(config in arb_configuration()) {
        let r = TrajectoryEvaluator::new()
            .reconcile(&config, &mut StdRng::seed_from_u64(0))
            .unwrap();
        prop_assert_eq!(r.forward.len(), config.num_steps + 1);
        prop_assert_eq!(r.backward.len(), config.num_steps + 1);
        for s in r.forward.states().iter().chain(r.backward.states()) {
            prop_assert!((s.norm() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn propagator_is_unitary(config in arb_configuration(), seed in any::<u64>()) {
        let h = Hamiltonian::tight_binding(&config, &mut StdRng::seed_from_u64(seed)).unwrap();
        let p = Propagator::new(&h, config.time_step).unwrap();
        prop_assert!(p.unitarity_defect() < 1e-8);
    }

    #[test]
    fn grid_index_decodes_in_order(
        sizes in prop::collection::vec(1_usize..50, 1..4),
        precisions in prop::collection::vec(1_u32..20, 1..4),
    ) {
        let grid = ParameterGrid {
            lattice_size: sizes.clone(),
            num_steps: vec![1, 2],
            time_step: vec![1.0],
            potential_scale: vec![0.5],
            coupling: vec![0.2],
            noise_amplitude: vec![0.0],
            phase_precision: precisions.clone(),
        };
        let configs: Vec<Configuration> = grid.iter().collect();
        prop_assert_eq!(configs.len(), sizes.len() * 2 * precisions.len());
        // Outermost axis changes slowest.
        let block = 2 * precisions.len();
        for (i, c) in configs.iter().enumerate() {
            prop_assert_eq!(c.lattice_size, sizes[i / block]);
            prop_assert_eq!(c.phase_precision, precisions[i % precisions.len()]);
        }
    }
}
