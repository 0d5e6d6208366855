//! Register of independent (unentangled) qubits.

use rand::Rng;
use tracing::{debug, trace};

use crate::error::{SimError, SimResult};
use crate::gate::Gate;
use crate::noise::NoiseChannel;
use crate::qubit::QubitState;

/// An ordered sequence of independent single-qubit states.
///
/// No entangling operation exists, so the register is stored as `n`
/// amplitude pairs instead of a `2^n` statevector.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantumRegister {
    qubits: Vec<QubitState>,
}

impl QuantumRegister {
    /// Create a register of `num_qubits` qubits, all in |0⟩.
    ///
    /// # Errors
    /// [`SimError::EmptyRegister`] when `num_qubits` is zero.
    pub fn new(num_qubits: usize) -> SimResult<Self> {
        if num_qubits == 0 {
            return Err(SimError::EmptyRegister);
        }
        Ok(Self {
            qubits: vec![QubitState::zero(); num_qubits],
        })
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }

    /// State of a single qubit.
    pub fn qubit(&self, index: usize) -> SimResult<&QubitState> {
        self.check_index(index)?;
        Ok(&self.qubits[index])
    }

    /// All qubit states in index order.
    pub fn qubits(&self) -> &[QubitState] {
        &self.qubits
    }

    /// Apply `gate` to qubit `index` in place.
    ///
    /// The normalization guard runs after the gate; see
    /// [`QubitState::renormalize`].
    pub fn apply_gate(&mut self, index: usize, gate: Gate) -> SimResult<()> {
        self.check_index(index)?;
        let qubit = &mut self.qubits[index];
        *qubit = gate.apply(qubit);
        qubit.renormalize()?;
        trace!(qubit = index, gate = gate.name(), "applied gate");
        Ok(())
    }

    /// Run `noise` once on qubit `index`. Returns whether the error fired.
    pub fn apply_noise<R: Rng + ?Sized>(
        &mut self,
        index: usize,
        noise: &NoiseChannel,
        rng: &mut R,
    ) -> SimResult<bool> {
        self.check_index(index)?;
        let fired = noise.apply(&mut self.qubits[index], rng);
        if fired {
            debug!(qubit = index, %noise, "depolarizing error collapsed qubit");
        }
        Ok(fired)
    }

    /// Apply `gate`, then `noise` if the channel is attached to that gate.
    /// Returns whether the error fired.
    pub fn apply_gate_with_noise<R: Rng + ?Sized>(
        &mut self,
        index: usize,
        gate: Gate,
        noise: &NoiseChannel,
        rng: &mut R,
    ) -> SimResult<bool> {
        self.apply_gate(index, gate)?;
        if noise.affects(gate) {
            self.apply_noise(index, noise, rng)
        } else {
            Ok(false)
        }
    }

    /// Consume the register, yielding its qubit states.
    pub(crate) fn into_qubits(self) -> Vec<QubitState> {
        self.qubits
    }

    fn check_index(&self, index: usize) -> SimResult<()> {
        if index >= self.qubits.len() {
            return Err(SimError::QubitOutOfRange {
                index,
                num_qubits: self.qubits.len(),
            });
        }
        Ok(())
    }
}
