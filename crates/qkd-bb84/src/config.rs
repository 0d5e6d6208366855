//! Protocol run configuration.

use serde::{Deserialize, Serialize};

use qkd_sim::{NoiseChannel, SimResult};

use crate::error::{ProtocolError, ProtocolResult};

/// Qubits sent per run unless configured otherwise.
pub const DEFAULT_NUM_QUBITS: usize = 27;

/// Depolarizing error probability used when noise is switched on.
pub const DEFAULT_NOISE_PROBABILITY: f64 = 0.9;

/// Channel noise selection, fixed for the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseSetting {
    /// Whether the depolarizing channel is attached to X and H.
    pub enabled: bool,
    /// Error probability when enabled.
    pub probability: f64,
}

impl NoiseSetting {
    /// Noiseless channel.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            probability: DEFAULT_NOISE_PROBABILITY,
        }
    }

    /// Noise at [`DEFAULT_NOISE_PROBABILITY`].
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            probability: DEFAULT_NOISE_PROBABILITY,
        }
    }

    /// Override the error probability (validated when the channel is built).
    #[must_use]
    pub fn with_probability(mut self, probability: f64) -> Self {
        self.probability = probability;
        self
    }

    /// Interpret an operator's answer to "add noise?".
    ///
    /// Only an explicit `y`/`yes` (any case, surrounding whitespace ignored)
    /// enables noise. Everything else, including empty or unreadable input,
    /// falls back to the noiseless channel.
    pub fn from_answer(answer: &str) -> Self {
        match answer.trim().to_lowercase().as_str() {
            "y" | "yes" => Self::enabled(),
            _ => Self::disabled(),
        }
    }

    /// Probability actually applied: zero when disabled.
    pub fn effective_probability(&self) -> f64 {
        if self.enabled { self.probability } else { 0.0 }
    }

    /// Build the channel this setting describes.
    pub fn channel(&self) -> SimResult<NoiseChannel> {
        if self.enabled {
            NoiseChannel::depolarizing(self.probability)
        } else {
            Ok(NoiseChannel::noiseless())
        }
    }
}

impl Default for NoiseSetting {
    fn default() -> Self {
        Self::disabled()
    }
}

impl std::fmt::Display for NoiseSetting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.enabled {
            write!(f, "depolarizing(p={:.4})", self.probability)
        } else {
            write!(f, "none")
        }
    }
}

/// Configuration for a BB84 run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bb84Config {
    /// Number of qubits Alice sends.
    pub num_qubits: usize,
    /// Channel noise.
    pub noise: NoiseSetting,
    /// RNG seed; `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Bb84Config {
    /// Set the number of qubits.
    #[must_use]
    pub fn with_num_qubits(mut self, num_qubits: usize) -> Self {
        self.num_qubits = num_qubits;
        self
    }

    /// Set the noise selection.
    #[must_use]
    pub fn with_noise(mut self, noise: NoiseSetting) -> Self {
        self.noise = noise;
        self
    }

    /// Fix the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check preconditions before a run starts.
    pub fn validate(&self) -> ProtocolResult<()> {
        if self.num_qubits == 0 {
            return Err(ProtocolError::InvalidQubitCount(self.num_qubits));
        }
        self.noise.channel()?;
        Ok(())
    }
}

impl Default for Bb84Config {
    fn default() -> Self {
        Self {
            num_qubits: DEFAULT_NUM_QUBITS,
            noise: NoiseSetting::default(),
            seed: None,
        }
    }
}
