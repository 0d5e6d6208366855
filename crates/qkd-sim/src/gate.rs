//! Single-qubit gate library.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_1_SQRT_2;
use std::str::FromStr;

use crate::error::SimError;
use crate::qubit::QubitState;

const SELF_INVERSE_TOLERANCE: f64 = 1e-12;

/// The closed set of unitary operators the protocol needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gate {
    /// Identity gate.
    Identity,
    /// Pauli-X (bit flip) gate.
    PauliX,
    /// Hadamard gate.
    Hadamard,
}

impl Gate {
    /// Every gate in the library.
    pub const ALL: [Gate; 3] = [Gate::Identity, Gate::PauliX, Gate::Hadamard];

    /// Short lowercase name, as used in circuit listings.
    pub fn name(&self) -> &'static str {
        match self {
            Gate::Identity => "id",
            Gate::PauliX => "x",
            Gate::Hadamard => "h",
        }
    }

    /// Row-major 2×2 unitary matrix.
    pub fn matrix(&self) -> [[Complex64; 2]; 2] {
        let zero = Complex64::new(0.0, 0.0);
        let one = Complex64::new(1.0, 0.0);
        let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
        match self {
            Gate::Identity => [[one, zero], [zero, one]],
            Gate::PauliX => [[zero, one], [one, zero]],
            Gate::Hadamard => [[h, h], [h, -h]],
        }
    }

    /// Left-multiply the gate matrix onto `state`.
    ///
    /// The result is not renormalized; [`QuantumRegister`](crate::QuantumRegister)
    /// runs the drift guard after every application.
    pub fn apply(&self, state: &QubitState) -> QubitState {
        let a = state.alpha();
        let b = state.beta();
        match self {
            Gate::Identity => *state,
            Gate::PauliX => QubitState::from_raw(b, a),
            Gate::Hadamard => {
                QubitState::from_raw(FRAC_1_SQRT_2 * (a + b), FRAC_1_SQRT_2 * (a - b))
            }
        }
    }

    /// True when `M·M = I` for this gate's matrix, so applying it twice is a no-op.
    pub fn is_self_inverse(&self) -> bool {
        let m = self.matrix();
        (0..2).all(|r| {
            (0..2).all(|c| {
                let entry = m[r][0] * m[0][c] + m[r][1] * m[1][c];
                let expected = if r == c { 1.0 } else { 0.0 };
                (entry - Complex64::new(expected, 0.0)).norm() < SELF_INVERSE_TOLERANCE
            })
        })
    }
}

impl std::fmt::Display for Gate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Gate {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "id" | "i" | "identity" => Ok(Gate::Identity),
            "x" | "paulix" | "not" => Ok(Gate::PauliX),
            "h" | "hadamard" => Ok(Gate::Hadamard),
            other => Err(SimError::UnknownGate(other.to_string())),
        }
    }
}
