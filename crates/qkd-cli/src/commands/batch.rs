//! Batch command implementation.

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use qkd_bb84::{BatchSummary, run_batch_with};

use super::common::{NoiseArgs, OutputFormat, build_config, format_percent};

/// Execute the batch command.
pub fn execute(
    runs: usize,
    qubits: usize,
    noise: &NoiseArgs,
    seed: Option<u64>,
    format: OutputFormat,
) -> Result<()> {
    let noise = noise.resolve(false)?;
    let config = build_config(qubits, noise, seed)?;
    let channel = config.noise.channel()?;
    info!(runs, qubits, %channel, seed = ?config.seed, "starting batch");

    let pb = ProgressBar::new(runs as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .context("Invalid progress template")?
            .progress_chars("#>-"),
    );
    if format == OutputFormat::Json {
        pb.set_draw_target(indicatif::ProgressDrawTarget::hidden());
    }
    pb.set_message(format!("{qubits} qubits, {channel}"));

    let summary = run_batch_with(&config, runs, |_| pb.inc(1));
    pb.finish_and_clear();
    let summary = summary?;
    info!(
        observed = summary.pooled_qber,
        predicted = summary.predicted_qber,
        "batch finished"
    );

    match format {
        OutputFormat::Table => print_summary(&summary),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)
                .context("Failed to serialize batch summary")?;
            println!("{json}");
        }
    }
    Ok(())
}

fn print_summary(summary: &BatchSummary) {
    println!(
        "\n{} {} runs of {} qubits (seed {})",
        style("✓").green().bold(),
        summary.runs,
        summary.num_qubits,
        style(summary.seed).dim()
    );
    println!(
        "  Noise probability:   {}",
        style(summary.noise_probability).yellow()
    );
    println!("  Mean sifted length:  {:.2}", summary.mean_sifted_len);
    println!(
        "  Sifted bits:         {} ({} mismatched)",
        summary.total_sifted, summary.total_mismatches
    );
    println!();
    println!(
        "  Observed QBER:       {}",
        style(format_percent(summary.pooled_qber)).cyan()
    );
    println!(
        "  Predicted QBER:      {}",
        style(format_percent(summary.predicted_qber)).green()
    );
    println!(
        "  Per-run range:       {} .. {}",
        format_percent(summary.min_qber),
        format_percent(summary.max_qber)
    );
}
