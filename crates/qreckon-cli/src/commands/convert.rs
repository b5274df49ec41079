//! Convert command implementation.
//!
//! Turn exact counts into a normalized quasi-distribution.

use anyhow::Result;
use console::style;
use tracing::info;

use qreckon::input::counts_from_value;
use qreckon::{FrequenciesLike, counts_to_quasi_dist, frequencies_to_value};

use super::common::{load_document, write_document};

/// Execute the convert command.
pub fn execute(input: &str, output: Option<&str>) -> Result<()> {
    eprintln!("{} Loading counts from {}", style("→").cyan().bold(), input);

    let counts = counts_from_value(&load_document(input)?)?;
    let quasi = counts_to_quasi_dist(&counts);
    info!(outcomes = counts.len(), shots = counts.shots(), "converted counts");

    write_document(&frequencies_to_value(&FrequenciesLike::QuasiDist(quasi)), output)
}
