//! Measurement engine: collapses a register to a classical bitstring.

use rand::Rng;
use rand::distributions::{Bernoulli, Distribution};
use serde::Serialize;
use tracing::debug;

use crate::error::{SimError, SimResult};
use crate::qubit::QubitState;
use crate::register::QuantumRegister;

/// Classical bits produced by measuring a register.
///
/// `bits()[i]` is the outcome of qubit `i`; there is no reversal of the
/// register order anywhere in the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeasurementOutcome {
    bits: Vec<u8>,
}

impl MeasurementOutcome {
    /// Outcome bits (each 0 or 1) in qubit index order.
    pub fn bits(&self) -> &[u8] {
        &self.bits
    }

    /// Number of measured qubits.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// True when no qubit was measured (never the case for a valid register).
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Outcome of qubit `index`, if in range.
    pub fn get(&self, index: usize) -> Option<u8> {
        self.bits.get(index).copied()
    }

    /// Number of qubits that read 1.
    pub fn count_ones(&self) -> usize {
        self.bits.iter().filter(|&&b| b == 1).count()
    }

    /// Take ownership of the bits.
    pub fn into_bits(self) -> Vec<u8> {
        self.bits
    }
}

impl std::fmt::Display for MeasurementOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for bit in &self.bits {
            write!(f, "{bit}")?;
        }
        Ok(())
    }
}

/// Measure a single qubit in the computational basis.
///
/// Draws once from Bernoulli(|β|²).
pub fn measure_qubit<R: Rng + ?Sized>(state: &QubitState, rng: &mut R) -> SimResult<u8> {
    // Rounding can leave |β|² a hair above 1.
    let p1 = state.prob_one().clamp(0.0, 1.0);
    let dist = Bernoulli::new(p1).map_err(|_| SimError::InvalidProbability(p1))?;
    Ok(u8::from(dist.sample(rng)))
}

/// Measure every qubit of `register`, consuming it.
///
/// Each qubit gets its own independent draw.
pub fn measure<R: Rng + ?Sized>(
    register: QuantumRegister,
    rng: &mut R,
) -> SimResult<MeasurementOutcome> {
    let num_qubits = register.num_qubits();
    let bits = register
        .into_qubits()
        .iter()
        .map(|q| measure_qubit(q, rng))
        .collect::<SimResult<Vec<_>>>()?;

    let outcome = MeasurementOutcome { bits };
    debug!(num_qubits, outcome = %outcome, "measured register");
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::Gate;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_fresh_register_reads_zero() {
        let mut rng = StdRng::seed_from_u64(5);
        let outcome = measure(QuantumRegister::new(8).unwrap(), &mut rng).unwrap();
        assert_eq!(outcome.bits(), &[0; 8]);
        assert_eq!(outcome.to_string(), "00000000");
    }

    #[test]
    fn test_order_is_index_order() {
        let mut reg = QuantumRegister::new(4).unwrap();
        reg.apply_gate(0, Gate::PauliX).unwrap();
        reg.apply_gate(3, Gate::PauliX).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let outcome = measure(reg, &mut rng).unwrap();
        assert_eq!(outcome.bits(), &[1, 0, 0, 1]);
        assert_eq!(outcome.to_string(), "1001");
        assert_eq!(outcome.get(0), Some(1));
        assert_eq!(outcome.get(4), None);
        assert_eq!(outcome.count_ones(), 2);
    }

    #[test]
    fn test_sample_deterministic() {
        let mut rng = StdRng::seed_from_u64(17);
        let one = Gate::PauliX.apply(&QubitState::zero());
        for _ in 0..100 {
            assert_eq!(measure_qubit(&one, &mut rng).unwrap(), 1);
            assert_eq!(measure_qubit(&QubitState::zero(), &mut rng).unwrap(), 0);
        }
    }

    #[test]
    fn test_outcome_serializes_in_index_order() {
        let mut reg = QuantumRegister::new(3).unwrap();
        reg.apply_gate(2, Gate::PauliX).unwrap();
        let outcome = measure(reg, &mut StdRng::seed_from_u64(0)).unwrap();
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json, serde_json::json!({ "bits": [0, 0, 1] }));
    }

    #[test]
    fn test_qubit_state_serializes_amplitudes() {
        let json = serde_json::to_value(QubitState::one()).unwrap();
        assert_eq!(json["alpha"], serde_json::json!([0.0, 0.0]));
        assert_eq!(json["beta"], serde_json::json!([1.0, 0.0]));
    }

    #[test]
    fn test_seeded_measurement_is_reproducible() {
        let build = || {
            let mut reg = QuantumRegister::new(16).unwrap();
            for i in 0..16 {
                reg.apply_gate(i, Gate::Hadamard).unwrap();
            }
            reg
        };
        let a = measure(build(), &mut StdRng::seed_from_u64(42)).unwrap();
        let b = measure(build(), &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }
}
