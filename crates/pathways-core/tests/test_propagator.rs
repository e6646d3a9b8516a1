//! Tests for unitary evolution operators.

use rand::SeedableRng;
use rand::rngs::StdRng;

use nalgebra::DVector;
use num_complex::Complex64;
use pathways_core::propagator::apply;
use pathways_core::{
    Configuration, ExpMethod, Hamiltonian, PathwayError, Propagator, StateVector,
};

fn lattice(n: usize, noise: f64, seed: u64) -> Hamiltonian {
    let config = Configuration::new(n, 1, 1.0)
        .with_potential(1.0)
        .with_coupling(0.2)
        .with_noise(noise);
    Hamiltonian::tight_binding(&config, &mut StdRng::seed_from_u64(seed)).unwrap()
}

fn random_state(n: usize, seed: u64) -> StateVector {
    use rand::Rng;
    let mut rng = StdRng::seed_from_u64(seed);
    let amps = DVector::from_fn(n, |_, _| {
        Complex64::new(rng.r#gen::<f64>() - 0.5, rng.r#gen::<f64>() - 0.5)
    });
    StateVector::from_amplitudes(amps).normalized().unwrap()
}

// ---------------------------------------------------------------------------
// Unitarity
// ---------------------------------------------------------------------------

#[test]
fn unitary_at_two_hundred_sites() {
    let p = Propagator::new(&lattice(200, 0.0, 0), 1.0).unwrap();
    assert!(p.unitarity_defect() < 1e-8, "defect {}", p.unitarity_defect());
}

#[test]
fn noisy_lattice_still_unitary() {
    let p = Propagator::new(&lattice(64, 0.01, 5), 0.8).unwrap();
    assert_eq!(p.method(), ExpMethod::Spectral);
    assert!(p.unitarity_defect() < 1e-8);
}

#[test]
fn forward_then_inverse_round_trips() {
    let p = Propagator::new(&lattice(25, 0.0, 0), 1.0).unwrap();
    let psi = random_state(25, 11);
    let back = p.step_backward(&p.step_forward(&psi).unwrap()).unwrap();
    for (a, b) in back.amplitudes().iter().zip(psi.amplitudes().iter()) {
        assert!((a - b).norm() < 1e-9);
    }
}

#[test]
fn inverse_is_adjoint() {
    let p = Propagator::new(&lattice(10, 0.0, 0), 0.8).unwrap();
    assert!((p.inverse() - p.forward().adjoint()).norm() < 1e-12);
}

#[test]
fn propagation_preserves_norm() {
    let p = Propagator::new(&lattice(30, 0.0, 0), 1.0).unwrap();
    let mut psi = StateVector::uniform(30);
    for _ in 0..20 {
        psi = p.step_forward(&psi).unwrap();
    }
    assert!((psi.norm() - 1.0).abs() < 1e-10);
}

// ---------------------------------------------------------------------------
// Methods
// ---------------------------------------------------------------------------

#[test]
fn pade_agrees_with_spectral_on_lattice() {
    let h = lattice(20, 0.0, 0);
    let a = Propagator::with_method(&h, 1.0, ExpMethod::Spectral).unwrap();
    let b = Propagator::with_method(&h, 1.0, ExpMethod::Pade).unwrap();
    assert!((a.forward() - b.forward()).norm() < 1e-10);
}

#[test]
fn zero_hamiltonian_gives_identity() {
    let h = Hamiltonian::from_real_rows(2, &[0.0; 4]).unwrap();
    let p = Propagator::new(&h, 3.0).unwrap();
    let id = nalgebra::DMatrix::<Complex64>::identity(2, 2);
    assert!((p.forward() - &id).norm() < 1e-14);
}

#[test]
fn overflowing_hamiltonian_is_numerical_instability() {
    // Entries near f64::MAX overflow inside the exponential.
    let config = Configuration::new(4, 2, 1.0)
        .with_potential(1e308)
        .with_coupling(1e308);
    let h = Hamiltonian::tight_binding(&config, &mut StdRng::seed_from_u64(0)).unwrap();
    assert!(h.is_finite());
    assert!(matches!(
        Propagator::new(&h, config.time_step),
        Err(PathwayError::NumericalInstability { .. })
    ));
}

#[test]
fn apply_is_pure() {
    let p = Propagator::new(&lattice(6, 0.0, 0), 1.0).unwrap();
    let psi = StateVector::uniform(6);
    let snapshot = psi.clone();
    let _ = apply(p.forward(), &psi).unwrap();
    assert_eq!(psi, snapshot);
}
