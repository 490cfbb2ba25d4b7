//! Run command implementation.

use anyhow::{Context, Result};
use console::style;
use tracing::info;

use qarch_sim::{RunOptions, RunStatus, SimulationService};

use super::common::{load_config, load_graph, print_readout, print_results, print_warnings};
use crate::OutputFormat;

/// Arguments of the run command.
#[derive(Debug, Clone)]
pub struct RunArgs {
    pub input: String,
    pub config: Option<String>,
    pub shots: Option<u32>,
    pub seed: u64,
    pub max_qubits: Option<u32>,
    pub format: OutputFormat,
}

/// Execute the run command.
pub async fn execute(args: RunArgs) -> Result<()> {
    let config = load_config(args.config.as_deref(), args.max_qubits)?;
    let graph = load_graph(&args.input)?;
    info!(
        "Loaded {} nodes and {} edges from {}",
        graph.nodes.len(),
        graph.edges.len(),
        args.input
    );

    let service = SimulationService::new(config);
    let mut options = RunOptions::default().with_seed(args.seed);
    if let Some(shots) = args.shots {
        options = options.with_shots(shots);
    }

    match args.format {
        OutputFormat::Json => {
            let report = tokio::task::spawn_blocking(move || service.execute(&graph, &options))
                .await
                .context("Simulation task failed")?;
            println!("{}", report.to_json()?);
            if report.status != RunStatus::Completed {
                anyhow::bail!("Run ended with status '{}'", report.status);
            }
        }
        OutputFormat::Table => {
            println!(
                "{} Simulating {}",
                style("→").cyan().bold(),
                style(&args.input).green()
            );
            let result = service.run_detached(graph, options).await?;

            println!("\n  Circuit:");
            print_readout(&result.readout);
            if !result.warnings.is_empty() {
                println!("\n  Warnings:");
                print_warnings(&result.warnings);
            }
            print_results(&result);
        }
    }

    Ok(())
}
