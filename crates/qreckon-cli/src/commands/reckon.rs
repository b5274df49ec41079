//! Reckon command implementation.
//!
//! Estimate an expectation value from frequencies and operator documents.

use anyhow::{Context, Result};
use console::style;
use tracing::debug;

use qreckon::input::{frequencies_batch_from_value, operator_batch_from_value};
use qreckon::{Expval, Reckoner, ReckonerConfig};

use super::common::load_document;

/// Execute the reckon command.
pub fn execute(
    frequencies_path: &str,
    operators_path: &str,
    format: &str,
    config: ReckonerConfig,
) -> Result<()> {
    let frequencies = frequencies_batch_from_value(&load_document(frequencies_path)?)
        .with_context(|| format!("Invalid frequencies document: {frequencies_path}"))?;
    let operators = operator_batch_from_value(&load_document(operators_path)?)
        .with_context(|| format!("Invalid operators document: {operators_path}"))?;
    debug!(
        frequencies = frequencies.len(),
        operators = operators.len(),
        "loaded documents"
    );

    let result = Reckoner::new(config).reckon(frequencies, operators)?;

    match format {
        "json" => {
            let json = serde_json::to_string_pretty(&result)
                .map_err(|e| anyhow::anyhow!("JSON serialization failed: {e}"))?;
            println!("{json}");
        }
        _ => {
            println!("\n{} Expectation value:", style("✓").green().bold());
            let expval = result.expval();
            println!("  expval:    {}", style(expval).yellow());
            if let Expval::Complex(_) = expval {
                println!("  {}", style("(imaginary part above tolerance)").dim());
            }
            println!("  std_error: {}", style(result.std_error()).yellow());
        }
    }

    Ok(())
}
