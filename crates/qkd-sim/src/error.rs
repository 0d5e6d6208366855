//! Error types for the simulation engine.

use thiserror::Error;

/// Errors produced by register construction, gate application and
/// measurement.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum SimError {
    /// A register must hold at least one qubit.
    #[error("register must contain at least one qubit")]
    EmptyRegister,

    /// An operation addressed a qubit outside the register.
    #[error("qubit index {index} out of range for register of {num_qubits} qubits")]
    QubitOutOfRange {
        /// The offending qubit index.
        index: usize,
        /// Number of qubits in the register.
        num_qubits: usize,
    },

    /// A probability parameter fell outside `[0, 1]`.
    #[error("invalid probability {0}: must be between 0.0 and 1.0")]
    InvalidProbability(f64),

    /// Amplitudes supplied by the caller are not normalized.
    #[error("amplitudes are not normalized (|α|²+|β|² = {0})")]
    NotNormalized(f64),

    /// Accumulated floating-point error pushed the norm past the drift limit.
    #[error("normalization drift: |α|²+|β|² = {norm_sqr}, outside tolerance {limit}")]
    NormalizationDrift {
        /// Observed squared norm.
        norm_sqr: f64,
        /// Largest deviation from 1 that is still repaired.
        limit: f64,
    },

    /// Gate name not present in the gate library.
    #[error("unknown gate '{0}' (expected one of: id, x, h)")]
    UnknownGate(String),
}

/// Result type for simulation operations.
pub type SimResult<T> = Result<T, SimError>;
