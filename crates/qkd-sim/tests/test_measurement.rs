//! Statistical tests for gate application and measurement collapse.

use rand::SeedableRng;
use rand::rngs::StdRng;

use qkd_sim::{Gate, NoiseChannel, QuantumRegister, QubitState, measure, measure_qubit};

/// χ² critical value for 1 degree of freedom at α = 0.001.
const CHI2_CRIT_1DOF: f64 = 10.828;

fn chi_square_uniform(ones: usize, trials: usize) -> f64 {
    let expected = trials as f64 / 2.0;
    let zeros = (trials - ones) as f64;
    let ones = ones as f64;
    (ones - expected).powi(2) / expected + (zeros - expected).powi(2) / expected
}

// ---------------------------------------------------------------------------
// Deterministic outcomes
// ---------------------------------------------------------------------------

#[test]
fn pauli_x_always_reads_one() {
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..1_000 {
        let mut reg = QuantumRegister::new(1).unwrap();
        reg.apply_gate(0, Gate::PauliX).unwrap();
        assert_eq!(measure(reg, &mut rng).unwrap().bits(), &[1]);
    }
}

#[test]
fn pauli_x_twice_reads_zero() {
    let mut rng = StdRng::seed_from_u64(2);
    for _ in 0..1_000 {
        let mut reg = QuantumRegister::new(1).unwrap();
        reg.apply_gate(0, Gate::PauliX).unwrap();
        reg.apply_gate(0, Gate::PauliX).unwrap();
        assert_eq!(measure(reg, &mut rng).unwrap().bits(), &[0]);
    }
}

#[test]
fn double_hadamard_restores_classical_state() {
    let mut rng = StdRng::seed_from_u64(3);
    for start in [0u8, 1] {
        for _ in 0..1_000 {
            let mut reg = QuantumRegister::new(1).unwrap();
            if start == 1 {
                reg.apply_gate(0, Gate::PauliX).unwrap();
            }
            reg.apply_gate(0, Gate::Hadamard).unwrap();
            reg.apply_gate(0, Gate::Hadamard).unwrap();
            assert_eq!(measure(reg, &mut rng).unwrap().bits(), &[start]);
        }
    }
}

#[test]
fn identity_leaves_state_unchanged() {
    let mut reg = QuantumRegister::new(1).unwrap();
    reg.apply_gate(0, Gate::Hadamard).unwrap();
    let before = *reg.qubit(0).unwrap();
    reg.apply_gate(0, Gate::Identity).unwrap();
    assert_eq!(*reg.qubit(0).unwrap(), before);
}

// ---------------------------------------------------------------------------
// Conjugate-basis statistics
// ---------------------------------------------------------------------------

#[test]
fn hadamard_measurement_is_uniform() {
    let mut rng = StdRng::seed_from_u64(2024);
    let trials = 10_000;
    for encoded in [0u8, 1] {
        let state = {
            let base = QubitState::classical(encoded);
            Gate::Hadamard.apply(&base)
        };
        let ones: usize = (0..trials)
            .map(|_| measure_qubit(&state, &mut rng).unwrap() as usize)
            .sum();
        let chi2 = chi_square_uniform(ones, trials);
        assert!(
            chi2 < CHI2_CRIT_1DOF,
            "encoded {encoded}: {ones}/{trials} ones, χ² = {chi2:.3}"
        );
    }
}

#[test]
fn register_qubits_are_independent() {
    // Two qubits in |+⟩: all four joint outcomes should appear ~25% each.
    let mut rng = StdRng::seed_from_u64(77);
    let trials = 8_000;
    let mut counts = [0usize; 4];
    for _ in 0..trials {
        let mut reg = QuantumRegister::new(2).unwrap();
        reg.apply_gate(0, Gate::Hadamard).unwrap();
        reg.apply_gate(1, Gate::Hadamard).unwrap();
        let bits = measure(reg, &mut rng).unwrap();
        counts[(bits.bits()[0] * 2 + bits.bits()[1]) as usize] += 1;
    }
    let expected = trials as f64 / 4.0;
    let chi2: f64 = counts
        .iter()
        .map(|&c| (c as f64 - expected).powi(2) / expected)
        .sum();
    // 3 degrees of freedom, α = 0.001.
    assert!(chi2 < 16.266, "counts = {counts:?}, χ² = {chi2:.3}");
}

// ---------------------------------------------------------------------------
// Noise
// ---------------------------------------------------------------------------

#[test]
fn noise_randomizes_pauli_x_outcome() {
    // X then noise(p): P(read 0) = p / 2.
    let p = 0.9;
    let noise = NoiseChannel::depolarizing(p).unwrap();
    let mut rng = StdRng::seed_from_u64(8);
    let trials = 10_000;
    let zeros = (0..trials)
        .filter(|_| {
            let mut reg = QuantumRegister::new(1).unwrap();
            reg.apply_gate_with_noise(0, Gate::PauliX, &noise, &mut rng)
                .unwrap();
            measure(reg, &mut rng).unwrap().bits()[0] == 0
        })
        .count();
    let rate = zeros as f64 / trials as f64;
    assert!((rate - p / 2.0).abs() < 0.02, "rate = {rate}");
}

#[test]
fn noiseless_channel_draws_no_randomness() {
    // A disabled channel must not perturb the random stream.
    let noise = NoiseChannel::noiseless();
    let mut with_noise_rng = StdRng::seed_from_u64(123);
    let mut plain_rng = StdRng::seed_from_u64(123);

    let mut a = QuantumRegister::new(6).unwrap();
    let mut b = QuantumRegister::new(6).unwrap();
    for i in 0..6 {
        a.apply_gate_with_noise(i, Gate::Hadamard, &noise, &mut with_noise_rng)
            .unwrap();
        b.apply_gate(i, Gate::Hadamard).unwrap();
    }
    assert_eq!(
        measure(a, &mut with_noise_rng).unwrap(),
        measure(b, &mut plain_rng).unwrap()
    );
}
