//! Error types for the BB84 driver.

use qkd_sim::SimError;
use thiserror::Error;

/// Errors produced while configuring or running the protocol.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// The protocol needs at least one qubit.
    #[error("qubit count must be at least 1, got {0}")]
    InvalidQubitCount(usize),

    /// Two per-qubit sequences that must be index-aligned differ in length.
    #[error("{what} has length {got}, expected {expected}")]
    LengthMismatch {
        /// Which sequence was wrong.
        what: &'static str,
        /// Required length.
        expected: usize,
        /// Actual length.
        got: usize,
    },

    /// A classical bit outside {0, 1}.
    #[error("bit at index {index} is {value}, expected 0 or 1")]
    InvalidBit {
        /// Position of the offending value.
        index: usize,
        /// The offending value.
        value: u8,
    },

    /// Batch runs must be ≥ 1.
    #[error("batch must contain at least one run")]
    InvalidRuns,

    /// Simulation engine error.
    #[error("simulation error: {0}")]
    Sim(#[from] SimError),
}

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;
