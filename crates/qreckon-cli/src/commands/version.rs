//! Version command implementation.
//!
//! Prints the version together with the settings the reckoner would run with
//! after the configuration file and environment overrides are applied.

use console::style;

use qreckon::MAX_QUBITS;

use crate::config::Config;

/// Execute the version command.
pub fn execute(config: &Config) {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - expectation values from measurement frequencies",
        style("qreckon").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();

    let reckoner = &config.reckoner;
    println!("Reckoner:");
    println!("  real_tolerance:     {:e}", reckoner.real_tolerance);
    println!(
        "  parallel:           {}",
        if reckoner.parallel { "on" } else { "off" }
    );
    println!("  parallel_threshold: {}", reckoner.parallel_threshold);
    println!("  max qubits:         {MAX_QUBITS}");
    println!();
    println!(
        "Logging:    {} ({})",
        style(&config.logging.level).dim(),
        config.logging.format
    );
}
