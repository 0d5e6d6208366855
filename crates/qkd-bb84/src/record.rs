//! Full record of one protocol run.

use serde::Serialize;

use crate::basis::Basis;
use crate::config::NoiseSetting;
use crate::sifting::SiftedKey;

/// Everything a run produced, in qubit index order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProtocolRecord {
    /// Number of qubits sent.
    pub num_qubits: usize,
    /// Noise selection in force for the run.
    pub noise: NoiseSetting,
    /// Alice's random bit values (`a`).
    pub sender_bits: Vec<u8>,
    /// Alice's random encoding bases (`b`).
    pub sender_bases: Vec<Basis>,
    /// Bob's random measurement bases (`b'`).
    pub receiver_bases: Vec<Basis>,
    /// Bob's raw measurement results (`k`).
    pub receiver_bits: Vec<u8>,
    /// Sifted key pair.
    pub key: SiftedKey,
    /// How many times the noise channel collapsed a qubit.
    pub noise_events: usize,
}

impl ProtocolRecord {
    /// Length of the sifted key.
    pub fn sifted_len(&self) -> usize {
        self.key.len()
    }

    /// Quantum bit error rate of the sifted key.
    pub fn qber(&self) -> f64 {
        self.key.qber()
    }

    /// Choice bits of Alice's bases.
    pub fn sender_basis_bits(&self) -> Vec<u8> {
        self.sender_bases.iter().map(|b| b.bit()).collect()
    }

    /// Choice bits of Bob's bases.
    pub fn receiver_basis_bits(&self) -> Vec<u8> {
        self.receiver_bases.iter().map(|b| b.bit()).collect()
    }
}
