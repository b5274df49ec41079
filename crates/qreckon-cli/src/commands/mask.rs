//! Mask command implementation.
//!
//! Show which outcome bits a Pauli label measures and its phase.

use anyhow::Result;
use console::style;

use qreckon::PauliTerm;

/// Execute the mask command.
pub fn execute(label: &str) -> Result<()> {
    let term = PauliTerm::from_label(label)?;
    let mask = term.integer_mask();
    let width = term.num_qubits().max(1);
    let coeff = term.phase_coefficient();

    println!("{} Pauli {}", style("→").cyan().bold(), style(&term).bold());
    println!("  Qubits:   {}", term.num_qubits());
    println!(
        "  Mask:     {} ({})",
        style(format!("0b{mask:0width$b}")).cyan(),
        mask
    );
    println!(
        "  Measured: {:?}",
        term.measured_qubits().collect::<Vec<_>>()
    );
    println!(
        "  Phase:    (-i)^{} = {}{:+}i",
        term.phase(),
        coeff.re,
        coeff.im
    );

    Ok(())
}
