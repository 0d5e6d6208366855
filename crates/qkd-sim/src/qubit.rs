//! Single-qubit amplitude state.

use num_complex::Complex64;
use serde::Serialize;

use crate::error::{SimError, SimResult};

/// Deviation of `|α|²+|β|²` from 1 that is accepted without touching the state.
pub const NORM_TOLERANCE: f64 = 1e-10;

/// Largest deviation that [`QubitState::renormalize`] still repairs.
pub const DRIFT_LIMIT: f64 = 1e-6;

/// Amplitude pair `(α, β)` of a single qubit, `α|0⟩ + β|1⟩`.
///
/// Serialize only: states come from [`new`](Self::new) or gate application.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QubitState {
    alpha: Complex64,
    beta: Complex64,
}

impl QubitState {
    /// The classical |0⟩ state `(1, 0)`.
    pub fn zero() -> Self {
        Self {
            alpha: Complex64::new(1.0, 0.0),
            beta: Complex64::new(0.0, 0.0),
        }
    }

    /// The classical |1⟩ state `(0, 1)`.
    pub fn one() -> Self {
        Self {
            alpha: Complex64::new(0.0, 0.0),
            beta: Complex64::new(1.0, 0.0),
        }
    }

    /// Classical basis state for a bit value (0 → |0⟩, anything else → |1⟩).
    pub fn classical(bit: u8) -> Self {
        if bit == 0 { Self::zero() } else { Self::one() }
    }

    /// Build a state from explicit amplitudes.
    ///
    /// # Errors
    /// Returns [`SimError::NotNormalized`] when `|α|²+|β|²` differs from 1 by
    /// more than [`NORM_TOLERANCE`].
    pub fn new(alpha: Complex64, beta: Complex64) -> SimResult<Self> {
        let state = Self { alpha, beta };
        let norm_sqr = state.norm_sqr();
        if !norm_sqr.is_finite() || (norm_sqr - 1.0).abs() > NORM_TOLERANCE {
            return Err(SimError::NotNormalized(norm_sqr));
        }
        Ok(state)
    }

    /// Amplitudes without any validation. Callers run
    /// [`renormalize`](Self::renormalize) before the state is observed.
    pub(crate) fn from_raw(alpha: Complex64, beta: Complex64) -> Self {
        Self { alpha, beta }
    }

    /// Amplitude of |0⟩.
    pub fn alpha(&self) -> Complex64 {
        self.alpha
    }

    /// Amplitude of |1⟩.
    pub fn beta(&self) -> Complex64 {
        self.beta
    }

    /// `|α|² + |β|²`.
    pub fn norm_sqr(&self) -> f64 {
        self.alpha.norm_sqr() + self.beta.norm_sqr()
    }

    /// Probability of observing 0 in the computational basis.
    pub fn prob_zero(&self) -> f64 {
        self.alpha.norm_sqr()
    }

    /// Probability of observing 1 in the computational basis.
    pub fn prob_one(&self) -> f64 {
        self.beta.norm_sqr()
    }

    /// True when the state is within [`NORM_TOLERANCE`] of unit norm.
    pub fn is_normalized(&self) -> bool {
        (self.norm_sqr() - 1.0).abs() <= NORM_TOLERANCE
    }

    /// Restore unit norm after floating-point drift.
    ///
    /// Drift up to [`DRIFT_LIMIT`] is rescaled away. Anything larger, or a
    /// zero or non-finite norm, is an error.
    pub fn renormalize(&mut self) -> SimResult<()> {
        let norm_sqr = self.norm_sqr();
        if !norm_sqr.is_finite() || norm_sqr == 0.0 || (norm_sqr - 1.0).abs() > DRIFT_LIMIT {
            return Err(SimError::NormalizationDrift {
                norm_sqr,
                limit: DRIFT_LIMIT,
            });
        }
        if (norm_sqr - 1.0).abs() > NORM_TOLERANCE {
            let norm = norm_sqr.sqrt();
            self.alpha /= norm;
            self.beta /= norm;
        }
        Ok(())
    }
}

impl Default for QubitState {
    fn default() -> Self {
        Self::zero()
    }
}
