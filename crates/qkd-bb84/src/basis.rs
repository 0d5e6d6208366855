//! Preparation / measurement bases.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Basis a party encodes or measures in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Basis {
    /// Computational (Z) basis, {|0⟩, |1⟩}. Bit value 0.
    Computational,
    /// Hadamard (X) basis, {|+⟩, |−⟩}. Bit value 1.
    Hadamard,
}

impl Basis {
    /// Basis for a random-choice bit: 0 → computational, anything else → Hadamard.
    pub fn from_bit(bit: u8) -> Self {
        if bit == 0 {
            Basis::Computational
        } else {
            Basis::Hadamard
        }
    }

    /// The choice bit for this basis.
    pub fn bit(self) -> u8 {
        match self {
            Basis::Computational => 0,
            Basis::Hadamard => 1,
        }
    }

    /// Draw a basis uniformly at random.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::from_bit(rng.gen_range(0..2))
    }

    /// Whether preparing or measuring in this basis needs a Hadamard gate.
    pub fn needs_hadamard(self) -> bool {
        self == Basis::Hadamard
    }
}

impl std::fmt::Display for Basis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Basis::Computational => write!(f, "+"),
            Basis::Hadamard => write!(f, "x"),
        }
    }
}
