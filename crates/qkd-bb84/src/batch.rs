//! Batch key generation.
//!
//! Runs never share state, so a batch fans out over rayon's thread pool.
//! Run `i` gets its own `StdRng` seeded with `seed + i`. The summary then
//! depends only on the seed, not on thread scheduling.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::config::Bb84Config;
use crate::error::{ProtocolError, ProtocolResult};
use crate::protocol::Bb84Protocol;
use crate::record::ProtocolRecord;

/// Aggregate statistics over a batch of runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    /// Number of runs.
    pub runs: usize,
    /// Base seed; run `i` used `seed + i`.
    pub seed: u64,
    /// Qubits per run.
    pub num_qubits: usize,
    /// Effective depolarizing probability.
    pub noise_probability: f64,
    /// Sifted positions across all runs.
    pub total_sifted: usize,
    /// Disagreeing sifted positions across all runs.
    pub total_mismatches: usize,
    /// `total_mismatches / total_sifted`.
    pub pooled_qber: f64,
    /// Smallest per-run QBER (runs with an empty key excluded).
    pub min_qber: f64,
    /// Largest per-run QBER (runs with an empty key excluded).
    pub max_qber: f64,
    /// Average sifted key length per run.
    pub mean_sifted_len: f64,
    /// Mismatch rate the depolarizing model predicts.
    pub predicted_qber: f64,
}

/// Expected sifted-key mismatch rate for the driver's gate sequence under
/// depolarizing noise of strength `p`.
///
/// With matching bases each of the four `(a, b)` combinations is equally
/// likely. The sequence per qubit is X (if `a = 1`), H, H (if `b` is the
/// Hadamard basis), and a mismatch has probability 1/2 as soon as any
/// error fires:
///
/// | `a` | basis | gates  | P(mismatch)        |
/// |-----|-------|--------|--------------------|
/// | 0   | Z     | none   | 0                  |
/// | 1   | Z     | X      | p/2                |
/// | 0   | X     | H H    | (1 − (1−p)²)/2     |
/// | 1   | X     | X H H  | (1 − (1−p)³)/2     |
pub fn predicted_qber(p: f64) -> f64 {
    let q = 1.0 - p;
    0.25 * (p / 2.0 + (1.0 - q.powi(2)) / 2.0 + (1.0 - q.powi(3)) / 2.0)
}

/// Run `runs` independent protocol runs and summarize them.
pub fn run_batch(config: &Bb84Config, runs: usize) -> ProtocolResult<BatchSummary> {
    run_batch_with(config, runs, |_| {})
}

/// Like [`run_batch`], calling `on_run` after each run completes.
///
/// `on_run` is invoked from worker threads in completion order.
#[instrument(skip(config, on_run), fields(num_qubits = config.num_qubits))]
pub fn run_batch_with<F>(
    config: &Bb84Config,
    runs: usize,
    on_run: F,
) -> ProtocolResult<BatchSummary>
where
    F: Fn(&ProtocolRecord) + Sync,
{
    if runs == 0 {
        return Err(ProtocolError::InvalidRuns);
    }
    let protocol = Bb84Protocol::new(config.clone())?;
    let seed = config.seed.unwrap_or_else(rand::random);
    debug!(runs, seed, "starting batch");

    let records = (0..runs)
        .into_par_iter()
        .map(|i| -> ProtocolResult<ProtocolRecord> {
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(i as u64));
            let record = protocol.run(&mut rng)?;
            on_run(&record);
            Ok(record)
        })
        .collect::<ProtocolResult<Vec<_>>>()?;

    Ok(summarize(config, seed, &records))
}

fn summarize(config: &Bb84Config, seed: u64, records: &[ProtocolRecord]) -> BatchSummary {
    let total_sifted: usize = records.iter().map(ProtocolRecord::sifted_len).sum();
    let total_mismatches: usize = records.iter().map(|r| r.key.mismatches()).sum();

    let (min_qber, max_qber) = records
        .iter()
        .filter(|r| !r.key.is_empty())
        .map(ProtocolRecord::qber)
        .fold(None, |acc: Option<(f64, f64)>, q| match acc {
            None => Some((q, q)),
            Some((lo, hi)) => Some((lo.min(q), hi.max(q))),
        })
        .unwrap_or((0.0, 0.0));

    let pooled_qber = if total_sifted == 0 {
        0.0
    } else {
        total_mismatches as f64 / total_sifted as f64
    };
    let noise_probability = config.noise.effective_probability();

    BatchSummary {
        runs: records.len(),
        seed,
        num_qubits: config.num_qubits,
        noise_probability,
        total_sifted,
        total_mismatches,
        pooled_qber,
        min_qber,
        max_qber,
        mean_sifted_len: total_sifted as f64 / records.len() as f64,
        predicted_qber: predicted_qber(noise_probability),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NoiseSetting;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_predicted_qber_endpoints() {
        assert_eq!(predicted_qber(0.0), 0.0);
        assert!((predicted_qber(0.9) - 0.361_125).abs() < 1e-12);
        // Full depolarization: 1/4 · (1/2 + 1/2 + 1/2).
        assert!((predicted_qber(1.0) - 0.375).abs() < 1e-12);
    }

    #[test]
    fn test_zero_runs_rejected() {
        assert_eq!(
            run_batch(&Bb84Config::default(), 0),
            Err(ProtocolError::InvalidRuns)
        );
    }

    #[test]
    fn test_callback_sees_every_run() {
        let seen = AtomicUsize::new(0);
        let config = Bb84Config::default().with_seed(5);
        let summary = run_batch_with(&config, 40, |_| {
            seen.fetch_add(1, Ordering::Relaxed);
        })
        .unwrap();
        assert_eq!(seen.load(Ordering::Relaxed), 40);
        assert_eq!(summary.runs, 40);
    }

    #[test]
    fn test_noiseless_batch_has_no_errors() {
        let config = Bb84Config::default().with_seed(11);
        let summary = run_batch(&config, 200).unwrap();
        assert_eq!(summary.total_mismatches, 0);
        assert_eq!(summary.pooled_qber, 0.0);
        assert_eq!(summary.predicted_qber, 0.0);
        // About half of the 27 bases match.
        assert!((summary.mean_sifted_len - 13.5).abs() < 1.0);
    }

    #[test]
    fn test_batch_is_reproducible() {
        let config = Bb84Config::default()
            .with_seed(99)
            .with_noise(NoiseSetting::enabled());
        assert_eq!(
            run_batch(&config, 50).unwrap(),
            run_batch(&config, 50).unwrap()
        );
    }
}
