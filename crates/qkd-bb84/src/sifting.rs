//! Basis reconciliation.
//!
//! After measurement the parties publicly compare bases and keep only the
//! positions where they agree. Both sifted keys are index-aligned with each
//! other and with [`SiftedKey::indices`], not with the original qubit
//! positions.

use serde::Serialize;

use crate::basis::Basis;
use crate::error::{ProtocolError, ProtocolResult};

/// Key material retained after sifting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SiftedKey {
    /// Qubit positions whose bases matched, ascending.
    pub indices: Vec<usize>,
    /// Alice's bits at the retained positions.
    pub sender: Vec<u8>,
    /// Bob's measured bits at the retained positions.
    pub receiver: Vec<u8>,
}

impl SiftedKey {
    /// Number of retained positions.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// True when no basis matched.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Positions (within the sifted key) where the two keys disagree.
    pub fn mismatches(&self) -> usize {
        self.sender
            .iter()
            .zip(&self.receiver)
            .filter(|(a, b)| a != b)
            .count()
    }

    /// Quantum bit error rate as a fraction in `[0, 1]`; zero for an empty key.
    pub fn qber(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.mismatches() as f64 / self.len() as f64
        }
    }

    /// True when both parties hold the same key.
    pub fn keys_agree(&self) -> bool {
        self.sender == self.receiver
    }
}

/// Keep `(sender_bits[i], receiver_bits[i])` for every `i` where the bases agree.
pub fn sift(
    sender_bits: &[u8],
    sender_bases: &[Basis],
    receiver_bases: &[Basis],
    receiver_bits: &[u8],
) -> ProtocolResult<SiftedKey> {
    let n = sender_bits.len();
    check_len("sender bases", n, sender_bases.len())?;
    check_len("receiver bases", n, receiver_bases.len())?;
    check_len("receiver bits", n, receiver_bits.len())?;

    let mut key = SiftedKey::default();
    for i in 0..n {
        if sender_bases[i] == receiver_bases[i] {
            key.indices.push(i);
            key.sender.push(sender_bits[i]);
            key.receiver.push(receiver_bits[i]);
        }
    }
    Ok(key)
}

pub(crate) fn check_len(what: &'static str, expected: usize, got: usize) -> ProtocolResult<()> {
    if expected != got {
        return Err(ProtocolError::LengthMismatch {
            what,
            expected,
            got,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basis::Basis::{Computational as Z, Hadamard as X};

    #[test]
    fn test_keeps_matching_positions() {
        let key = sift(&[1, 0, 1, 1], &[Z, X, X, Z], &[Z, Z, X, X], &[1, 1, 1, 0]).unwrap();
        assert_eq!(key.indices, vec![0, 2]);
        assert_eq!(key.sender, vec![1, 1]);
        assert_eq!(key.receiver, vec![1, 1]);
        assert!(key.keys_agree());
        assert_eq!(key.qber(), 0.0);
    }

    #[test]
    fn test_counts_mismatches() {
        let key = sift(&[0, 1, 0, 1], &[Z, Z, X, X], &[Z, Z, X, X], &[0, 0, 1, 1]).unwrap();
        assert_eq!(key.len(), 4);
        assert_eq!(key.mismatches(), 2);
        assert_eq!(key.qber(), 0.5);
        assert!(!key.keys_agree());
    }

    #[test]
    fn test_no_matches() {
        let key = sift(&[0, 1], &[Z, X], &[X, Z], &[1, 1]).unwrap();
        assert!(key.is_empty());
        assert_eq!(key.qber(), 0.0);
    }

    #[test]
    fn test_length_mismatch() {
        let err = sift(&[0, 1, 1], &[Z, X], &[X, Z, Z], &[1, 1, 0]).unwrap_err();
        assert_eq!(
            err,
            ProtocolError::LengthMismatch {
                what: "sender bases",
                expected: 3,
                got: 2
            }
        );
    }
}
