//! Run command implementation.

use anyhow::{Context, Result};
use console::style;
use tracing::info;

use qkd_bb84::{Bb84Protocol, ProtocolRecord};

use super::common::{
    NoiseArgs, OutputFormat, build_config, format_bits, format_key, format_percent,
};

/// Execute the run command.
pub fn execute(
    qubits: usize,
    noise: &NoiseArgs,
    seed: Option<u64>,
    format: OutputFormat,
) -> Result<()> {
    let noise = noise.resolve(true)?;
    let config = build_config(qubits, noise, seed)?;
    info!(qubits, noise = %config.noise, seed = ?config.seed, "starting BB84 run");
    let protocol = Bb84Protocol::new(config)?;

    let record = protocol.run_seeded()?;
    info!(
        sifted = record.sifted_len(),
        qber = record.qber(),
        "run finished"
    );

    match format {
        OutputFormat::Table => print_report(&record),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&record)
                .context("Failed to serialize protocol record")?;
            println!("{json}");
        }
    }
    Ok(())
}

/// Print a run in the operator report layout.
fn print_report(record: &ProtocolRecord) {
    println!(
        "\n{} BB84 run: {} qubits, noise {}",
        style("→").cyan().bold(),
        record.num_qubits,
        style(record.noise).yellow()
    );
    println!();
    println!("Alice's random states:     {}", format_bits(&record.sender_bits));
    println!(
        "Alice's random bases:      {}",
        format_bits(&record.sender_basis_bits())
    );
    println!(
        "Bob's random bases:        {}",
        format_bits(&record.receiver_basis_bits())
    );
    println!(
        "Bob's measurements:        {}",
        style(format_bits(&record.receiver_bits)).cyan()
    );
    println!();
    println!(
        "Alice's key:               {}",
        style(format_key(&record.key.sender)).green()
    );
    println!(
        "Bob's key:                 {}",
        style(format_key(&record.key.receiver)).green()
    );
    println!();

    let qber = format_percent(record.qber());
    let qber = if record.key.keys_agree() {
        style(qber).green()
    } else {
        style(qber).red()
    };
    println!("  Sifted length: {}", style(record.sifted_len()).yellow());
    println!("  QBER:          {qber}");
    if record.noise.enabled {
        println!("  Noise events:  {}", record.noise_events);
    }
}
