//! Version command implementation.

use console::style;

use qkd_sim::Gate;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - BB84 quantum key distribution simulator",
        style("qkd").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qkd-sim   Qubit register, gates, noise and measurement");
    println!("  qkd-bb84  Protocol driver, sifting and batch statistics");
    println!("  qkd-cli   Command-line interface");
    println!();
    let gates: Vec<&str> = Gate::ALL.iter().map(|g| g.name()).collect();
    println!("Gates:      {}", gates.join(", "));
    println!("License:    {}", style("Apache-2.0").dim());
}
