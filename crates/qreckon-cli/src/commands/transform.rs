//! Marginalize and bitflip command implementations.

use anyhow::Result;
use console::style;
use tracing::info;

use qreckon::input::frequencies_from_value;
use qreckon::{FrequencyTable, Outcome, frequencies_to_value};

use super::common::{load_document, print_frequencies, write_document};

/// Execute the marginalize command: keep only the bits in `mask`.
pub fn execute_marginalize(input: &str, mask: Outcome, output: Option<&str>) -> Result<()> {
    let frequencies = frequencies_from_value(&load_document(input)?)?;
    let masked = frequencies.bitmask(mask);
    info!(mask, "marginalized frequencies");

    println!(
        "{} Marginalized onto mask {}",
        style("→").cyan().bold(),
        style(format!("0b{mask:b}")).cyan()
    );
    print_frequencies(&masked);
    match output {
        Some(_) => write_document(&frequencies_to_value(&masked), output),
        None => Ok(()),
    }
}

/// Execute the bitflip command: XOR every outcome with `mask`.
pub fn execute_bitflip(input: &str, mask: Outcome, output: Option<&str>) -> Result<()> {
    let frequencies = frequencies_from_value(&load_document(input)?)?;
    let flipped = frequencies.bitflip(mask);
    info!(mask, "flipped frequencies");

    println!(
        "{} Flipped bits {}",
        style("→").cyan().bold(),
        style(format!("0b{mask:b}")).cyan()
    );
    print_frequencies(&flipped);
    match output {
        Some(_) => write_document(&frequencies_to_value(&flipped), output),
        None => Ok(()),
    }
}
