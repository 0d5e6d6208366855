//! QKD command-line interface.
//!
//! Runs the BB84 key distribution protocol on the simulated qubit register,
//! either once with a full report or as a batch with QBER statistics.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::common::{NoiseArgs, OutputFormat};
use commands::{batch, run, version};

/// BB84 quantum key distribution simulator
#[derive(Parser)]
#[command(name = "qkd")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the protocol once and print the full report
    Run {
        /// Number of qubits Alice sends
        #[arg(short, long, default_value = "27")]
        qubits: usize,

        #[command(flatten)]
        noise: NoiseArgs,

        /// RNG seed for a reproducible run
        #[arg(short, long)]
        seed: Option<u64>,

        /// Output format (table, json)
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Run the protocol many times and compare observed QBER with the model
    Batch {
        /// Number of independent runs
        #[arg(short, long, default_value = "1000")]
        runs: usize,

        /// Number of qubits per run
        #[arg(short, long, default_value = "27")]
        qubits: usize,

        #[command(flatten)]
        noise: NoiseArgs,

        /// Base RNG seed; run i uses seed + i
        #[arg(short, long)]
        seed: Option<u64>,

        /// Output format (table, json)
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Run {
            qubits,
            noise,
            seed,
            format,
        } => run::execute(qubits, &noise, seed, format),

        Commands::Batch {
            runs,
            qubits,
            noise,
            seed,
            format,
        } => batch::execute(runs, qubits, &noise, seed, format),

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
