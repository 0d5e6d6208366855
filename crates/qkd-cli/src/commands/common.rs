//! Shared helpers for CLI commands.

use std::io::{self, BufRead, IsTerminal};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use console::Term;
use tracing::debug;

use qkd_bb84::{Bb84Config, NoiseSetting};

/// Question put to the operator when no noise choice was given.
pub const NOISE_PROMPT: &str = "Would you like to add noise? (y/n): ";

/// Report format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report.
    Table,
    /// JSON document on stdout.
    Json,
}

/// Noise flags shared by `run` and `batch`.
#[derive(Debug, Clone, Default, Args)]
pub struct NoiseArgs {
    /// Add depolarizing noise to X and H gates (y/n)
    #[arg(short, long, env = "QKD_NOISE")]
    pub noise: Option<String>,

    /// Depolarizing error probability when noise is enabled
    #[arg(long, env = "QKD_NOISE_PROBABILITY")]
    pub noise_probability: Option<f64>,
}

impl NoiseArgs {
    /// Resolve the noise setting, asking the operator if `prompt` is set and
    /// no answer was supplied.
    pub fn resolve(&self, prompt: bool) -> Result<NoiseSetting> {
        self.resolve_with(prompt, ask_noise)
    }

    /// Like [`resolve`](Self::resolve), with `ask` producing the operator's answer.
    pub fn resolve_with<F>(&self, prompt: bool, ask: F) -> Result<NoiseSetting>
    where
        F: FnOnce() -> Result<String>,
    {
        let setting = match (&self.noise, prompt) {
            (Some(answer), _) => NoiseSetting::from_answer(answer),
            (None, true) => NoiseSetting::from_answer(&ask()?),
            (None, false) => NoiseSetting::disabled(),
        };
        debug!(noise = %setting, "resolved noise setting");
        Ok(match self.noise_probability {
            Some(p) => setting.with_probability(p),
            None => setting,
        })
    }
}

/// Ask the noise question once.
///
/// The prompt goes to stderr so reports on stdout stay clean. An interactive
/// terminal is read through `console`; piped or redirected stdin is read as a
/// plain line. End of input is an empty answer, which means no noise.
pub fn ask_noise() -> Result<String> {
    let term = Term::stderr();
    term.write_str(NOISE_PROMPT)
        .context("Failed to write noise prompt")?;
    if term.is_term() && io::stdin().is_terminal() {
        term.read_line().context("Failed to read noise answer")
    } else {
        read_answer(io::stdin().lock())
    }
}

/// Read one answer line from `reader`.
pub fn read_answer<R: BufRead>(mut reader: R) -> Result<String> {
    let mut answer = String::new();
    reader
        .read_line(&mut answer)
        .context("Failed to read noise answer")?;
    Ok(answer)
}

/// Build and validate the run configuration.
pub fn build_config(qubits: usize, noise: NoiseSetting, seed: Option<u64>) -> Result<Bb84Config> {
    let mut config = Bb84Config::default()
        .with_num_qubits(qubits)
        .with_noise(noise);
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;
    Ok(config)
}

/// Render a per-qubit bit array as `[1 0 1 1]`.
pub fn format_bits(bits: &[u8]) -> String {
    let inner: Vec<String> = bits.iter().map(u8::to_string).collect();
    format!("[{}]", inner.join(" "))
}

/// Render a sifted key as `[1, 1]`.
pub fn format_key(bits: &[u8]) -> String {
    let inner: Vec<String> = bits.iter().map(u8::to_string).collect();
    format!("[{}]", inner.join(", "))
}

/// Render a fraction as a percentage with two decimals.
pub fn format_percent(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bits() {
        assert_eq!(format_bits(&[1, 0, 1, 1]), "[1 0 1 1]");
        assert_eq!(format_bits(&[]), "[]");
    }

    #[test]
    fn test_format_key() {
        assert_eq!(format_key(&[1, 1]), "[1, 1]");
        assert_eq!(format_key(&[0]), "[0]");
        assert_eq!(format_key(&[]), "[]");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.361125), "36.11%");
        assert_eq!(format_percent(0.0), "0.00%");
    }

    #[test]
    fn test_resolve_explicit_answer() {
        let args = NoiseArgs {
            noise: Some("y".into()),
            noise_probability: None,
        };
        let noise = args.resolve(true).unwrap();
        assert!(noise.enabled);
        assert_eq!(noise.probability, 0.9);
    }

    #[test]
    fn test_resolve_probability_override() {
        let args = NoiseArgs {
            noise: Some("yes".into()),
            noise_probability: Some(0.25),
        };
        assert_eq!(args.resolve(false).unwrap().effective_probability(), 0.25);
    }

    #[test]
    fn test_read_answer_takes_first_line() {
        assert_eq!(read_answer("y\nextra\n".as_bytes()).unwrap(), "y\n");
        assert_eq!(read_answer("".as_bytes()).unwrap(), "");
    }

    #[test]
    fn test_piped_yes_enables_noise() {
        let noise = NoiseArgs::default()
            .resolve_with(true, || read_answer("y\n".as_bytes()))
            .unwrap();
        assert!(noise.enabled);
        assert_eq!(noise.effective_probability(), 0.9);
    }

    #[test]
    fn test_piped_no_or_eof_disables_noise() {
        for input in ["n\n", "maybe\n", ""] {
            let noise = NoiseArgs::default()
                .resolve_with(true, || read_answer(input.as_bytes()))
                .unwrap();
            assert!(!noise.enabled, "input {input:?}");
        }
    }

    #[test]
    fn test_explicit_flag_skips_question() {
        let args = NoiseArgs {
            noise: Some("n".into()),
            noise_probability: None,
        };
        let noise = args
            .resolve_with(true, || panic!("operator should not be asked"))
            .unwrap();
        assert!(!noise.enabled);
    }

    #[test]
    fn test_read_error_is_reported() {
        let args = NoiseArgs::default();
        let err = args
            .resolve_with(true, || anyhow::bail!("stdin closed"))
            .unwrap_err();
        assert_eq!(err.to_string(), "stdin closed");
    }

    #[test]
    fn test_resolve_without_prompt_is_noiseless() {
        let noise = NoiseArgs::default().resolve(false).unwrap();
        assert!(!noise.enabled);
    }

    #[test]
    fn test_build_config_rejects_zero_qubits() {
        let err = build_config(0, NoiseSetting::disabled(), None).unwrap_err();
        assert!(err.to_string().contains("qubit count"));
    }

    #[test]
    fn test_build_config_rejects_bad_probability() {
        let noise = NoiseSetting::enabled().with_probability(-0.1);
        assert!(build_config(27, noise, Some(1)).is_err());
    }
}
