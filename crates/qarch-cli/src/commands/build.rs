//! Build command implementation.

use anyhow::Result;
use console::style;

use qarch_sim::SimulationService;

use super::common::{load_config, load_graph, print_readout, print_warnings};

/// Execute the build command.
pub fn execute(input: &str, config: Option<&str>) -> Result<()> {
    let config = load_config(config, None)?;
    let graph = load_graph(input)?;

    let output = SimulationService::new(config).build(&graph)?;
    let circuit = &output.circuit;

    println!(
        "{} Built {}: {} operations on {} qubits",
        style("✓").green().bold(),
        style(input).green(),
        circuit.len(),
        circuit.num_qubits()
    );
    print_readout(&output.readout());

    if output.is_clean() {
        return Ok(());
    }
    println!(
        "\n  {} warning(s):",
        style(output.warnings.len()).yellow().bold()
    );
    print_warnings(&output.warnings);

    Ok(())
}
