//! Depolarizing noise channel.
//!
//! The channel is reduced to its observable effect on an unentangled pure
//! state: with probability `p` the qubit loses its coherent superposition
//! and collapses onto |0⟩ or |1⟩ chosen uniformly at random; with
//! probability `1 - p` it is left untouched.
//!
//! Like a hardware noise model, the error is attached to specific gates.
//! By default those are Pauli-X and Hadamard, the only gates the BB84
//! circuit uses, so the identity gate stays error-free.

use rand::Rng;
use serde::Serialize;

use crate::error::{SimError, SimResult};
use crate::gate::Gate;
use crate::qubit::QubitState;

/// Gates a freshly built channel is attached to.
pub const DEFAULT_NOISY_GATES: [Gate; 2] = [Gate::PauliX, Gate::Hadamard];

/// A per-gate depolarizing error channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoiseChannel {
    /// Error probability `p` in `[0, 1]`.
    p: f64,
    /// Gates after which the channel fires.
    gates: Vec<Gate>,
}

impl NoiseChannel {
    /// Depolarizing channel with error probability `p`.
    ///
    /// # Errors
    /// [`SimError::InvalidProbability`] when `p` is outside `[0, 1]` or NaN.
    pub fn depolarizing(p: f64) -> SimResult<Self> {
        validate_probability(p)?;
        Ok(Self {
            p,
            gates: DEFAULT_NOISY_GATES.to_vec(),
        })
    }

    /// A channel that never fires.
    pub fn noiseless() -> Self {
        Self {
            p: 0.0,
            gates: DEFAULT_NOISY_GATES.to_vec(),
        }
    }

    /// Attach the channel to a different gate set.
    #[must_use]
    pub fn with_gates(mut self, gates: &[Gate]) -> Self {
        self.gates = gates.to_vec();
        self
    }

    /// Error probability.
    pub fn probability(&self) -> f64 {
        self.p
    }

    /// Gates the channel is attached to.
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// True when the channel can never change a state.
    pub fn is_noiseless(&self) -> bool {
        self.p == 0.0
    }

    /// Whether applying `gate` should be followed by this channel.
    pub fn affects(&self, gate: Gate) -> bool {
        !self.is_noiseless() && self.gates.contains(&gate)
    }

    /// Run the channel once on `state`. Returns `true` if the error fired.
    pub fn apply<R: Rng + ?Sized>(&self, state: &mut QubitState, rng: &mut R) -> bool {
        if self.is_noiseless() || !rng.gen_bool(self.p) {
            return false;
        }
        *state = if rng.gen_bool(0.5) {
            QubitState::one()
        } else {
            QubitState::zero()
        };
        true
    }
}

impl Default for NoiseChannel {
    fn default() -> Self {
        Self::noiseless()
    }
}

impl std::fmt::Display for NoiseChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "depolarizing(p={:.4})", self.p)
    }
}

/// Validate a probability parameter.
pub(crate) fn validate_probability(p: f64) -> SimResult<()> {
    if !(0.0..=1.0).contains(&p) {
        return Err(SimError::InvalidProbability(p));
    }
    Ok(())
}
