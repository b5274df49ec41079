//! qreckon Command-Line Interface
//!
//! Estimate Pauli-operator expectation values from measurement frequencies
//! stored as JSON or YAML documents.
//!
//! ```text
//! qreckon reckon -f counts.json -o operators.json
//! qreckon mask -iXZ
//! qreckon convert -i counts.yaml
//! qreckon marginalize -i counts.json -m 0b0101
//! qreckon bitflip -i counts.json -m 0x3 --output flipped.yaml
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::common::parse_mask;
use commands::{convert, mask, reckon, transform, version};
use config::Config;

/// qreckon - expectation values of Pauli operators from measurement counts
#[derive(Parser)]
#[command(name = "qreckon")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (YAML)
    #[arg(long, global = true, env = "QRECKON_CONFIG")]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate an expectation value and its standard error
    Reckon {
        /// Frequencies document (JSON or YAML): one table or a list
        #[arg(short, long)]
        frequencies: String,

        /// Operators document (JSON or YAML): one operator or a list
        #[arg(short, long)]
        operators: String,

        /// Output format (table, json)
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Show the measurement mask and phase of a Pauli label
    Mask {
        /// Pauli label, e.g. XZ or -iYI (rightmost character is qubit 0)
        #[arg(allow_hyphen_values = true)]
        label: String,
    },

    /// Convert counts into a quasi-distribution
    Convert {
        /// Counts document (JSON or YAML)
        #[arg(short, long)]
        input: String,

        /// Output file (stdout if omitted)
        #[arg(long)]
        output: Option<String>,
    },

    /// Marginalize a frequency table onto the bits of a mask
    Marginalize {
        /// Frequencies document (JSON or YAML)
        #[arg(short, long)]
        input: String,

        /// Bits to keep (decimal, 0x hex or 0b binary)
        #[arg(short, long, value_parser = parse_mask)]
        mask: u64,

        /// Output file
        #[arg(long)]
        output: Option<String>,
    },

    /// Flip readout bits of a frequency table
    Bitflip {
        /// Frequencies document (JSON or YAML)
        #[arg(short, long)]
        input: String,

        /// Bits to flip (decimal, 0x hex or 0b binary)
        #[arg(short, long, value_parser = parse_mask)]
        mask: u64,

        /// Output file
        #[arg(long)]
        output: Option<String>,
    },

    /// Show version information and effective settings
    Version,
}

fn init_logging(verbose: u8, config: &Config) {
    // Setup logging
    let filter = match verbose {
        0 => config.logging.level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr);

    if config.logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    };

    init_logging(cli.verbose, &config);
    tracing::debug!(?config, "configuration loaded");

    // Execute command
    let result = match cli.command {
        Commands::Reckon {
            frequencies,
            operators,
            format,
        } => reckon::execute(&frequencies, &operators, &format, config.reckoner_config()),

        Commands::Mask { label } => mask::execute(&label),

        Commands::Convert { input, output } => convert::execute(&input, output.as_deref()),

        Commands::Marginalize {
            input,
            mask,
            output,
        } => transform::execute_marginalize(&input, mask, output.as_deref()),

        Commands::Bitflip {
            input,
            mask,
            output,
        } => transform::execute_bitflip(&input, mask, output.as_deref()),

        Commands::Version => {
            version::execute(&config);
            Ok(())
        }
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
