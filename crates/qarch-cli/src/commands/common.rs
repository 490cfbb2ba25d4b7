//! Shared helpers for CLI commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use tracing::debug;

use qarch_builder::{BuildWarning, EditorGraph};
use qarch_sim::{Config, SimulationResult};

/// Probability rows shown before the listing is truncated.
const MAX_ROWS: usize = 16;

/// Load an editor graph from a JSON file.
pub fn load_graph(path: &str) -> Result<EditorGraph> {
    if !Path::new(path).exists() {
        anyhow::bail!("File not found: {path}");
    }

    let source =
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))?;
    EditorGraph::from_json(&source)
        .map_err(|e| anyhow::anyhow!("Failed to parse graph {path}: {e}"))
}

/// Load configuration from an optional file plus environment, then apply
/// the command-line qubit ceiling.
pub fn load_config(path: Option<&str>, max_qubits: Option<u32>) -> Result<Config> {
    let mut config = Config::load(path)?;
    if let Some(max) = max_qubits {
        config.simulator.max_qubits = max;
        config.validate()?;
    }
    debug!("Using configuration: {:?}", config);
    Ok(config)
}

/// Print the ordered operations.
pub fn print_readout(readout: &[String]) {
    if readout.is_empty() {
        println!("  (no operations)");
        return;
    }
    for (i, line) in readout.iter().enumerate() {
        println!("  {:>3}. {}", i + 1, line);
    }
}

/// Print builder warnings.
pub fn print_warnings(warnings: &[BuildWarning]) {
    for warning in warnings {
        println!("  {} {}", style("!").yellow().bold(), warning);
    }
}

/// Print probabilities as bars, then the shot histogram if present.
pub fn print_results(result: &SimulationResult) {
    println!(
        "\n{} Probabilities ({} qubits):",
        style("✓").green().bold(),
        result.num_qubits
    );

    let nonzero: Vec<_> = result
        .probabilities
        .iter()
        .filter(|o| o.probability > 1e-12)
        .collect();

    for outcome in nonzero.iter().take(MAX_ROWS) {
        let percent = outcome.probability * 100.0;
        let bar = "█".repeat(bar_len(percent));
        println!(
            "  {}: {:>7.3}% {}",
            style(&outcome.bitstring).cyan(),
            percent,
            style(bar).green()
        );
    }

    if nonzero.len() > MAX_ROWS {
        println!("  ... and {} more outcomes", nonzero.len() - MAX_ROWS);
    }

    if let Some(counts) = &result.counts {
        let total: u32 = counts.values().sum();
        println!("\n{} Samples ({} shots):", style("✓").green().bold(), total);
        let mut sorted: Vec<_> = counts.iter().collect();
        sorted.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
        for (bitstring, count) in sorted.iter().take(MAX_ROWS) {
            println!("  {}: {:>6}", style(bitstring).cyan(), count);
        }
        if sorted.len() > MAX_ROWS {
            println!("  ... and {} more outcomes", sorted.len() - MAX_ROWS);
        }
    }

    println!("\n  Execution time: {} ms", style(result.elapsed_ms).yellow());
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn bar_len(percent: f64) -> usize {
    (percent / 2.0).round().clamp(0.0, 50.0) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_len() {
        assert_eq!(bar_len(0.0), 0);
        assert_eq!(bar_len(50.0), 25);
        assert_eq!(bar_len(100.0), 50);
    }

    #[test]
    fn test_missing_graph_file() {
        let err = load_graph("/nonexistent/graph.json").unwrap_err();
        assert!(err.to_string().contains("File not found"));
    }

    #[test]
    fn test_max_qubits_override_is_validated() {
        assert_eq!(
            load_config(None, Some(4)).unwrap().simulator.max_qubits,
            4
        );
        assert!(load_config(None, Some(0)).is_err());
    }
}
