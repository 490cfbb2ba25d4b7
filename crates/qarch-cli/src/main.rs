//! Qarch Command-Line Interface
//!
//! Builds circuit-editor graphs into circuits and simulates them.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{build, gates, run, version};

/// Qarch - state-vector simulation for circuit-editor graphs
#[derive(Parser)]
#[command(name = "qarch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for simulation results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Probability bars
    Table,
    /// The editor-facing run report
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Build an editor graph and simulate it
    Run {
        /// Editor graph (JSON)
        #[arg(short, long)]
        input: String,

        /// Configuration file (YAML)
        #[arg(short, long)]
        config: Option<String>,

        /// Also sample this many shots
        #[arg(short, long)]
        shots: Option<u32>,

        /// Sampling seed
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Override the simulator's qubit ceiling
        #[arg(long)]
        max_qubits: Option<u32>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Build an editor graph without simulating it
    Build {
        /// Editor graph (JSON)
        #[arg(short, long)]
        input: String,

        /// Configuration file (YAML)
        #[arg(short, long)]
        config: Option<String>,
    },

    /// List the supported gates
    Gates,

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    let result = match cli.command {
        Commands::Run {
            input,
            config,
            shots,
            seed,
            max_qubits,
            format,
        } => {
            let args = run::RunArgs {
                input,
                config,
                shots,
                seed,
                max_qubits,
                format,
            };
            run::execute(args).await
        }

        Commands::Build { input, config } => build::execute(&input, config.as_deref()),

        Commands::Gates => {
            gates::execute();
            Ok(())
        }

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run_defaults() {
        let cli = Cli::try_parse_from(["qarch", "run", "-i", "bell.json"]).unwrap();
        match cli.command {
            Commands::Run {
                input,
                config,
                shots,
                seed,
                max_qubits,
                format,
            } => {
                assert_eq!(input, "bell.json");
                assert!(config.is_none());
                assert!(shots.is_none());
                assert_eq!(seed, 0);
                assert!(max_qubits.is_none());
                assert_eq!(format, OutputFormat::Table);
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_parse_run_all_options() {
        let cli = Cli::try_parse_from([
            "qarch",
            "-vv",
            "run",
            "-i",
            "bell.json",
            "-c",
            "qarch.yaml",
            "--shots",
            "100",
            "--seed",
            "7",
            "--max-qubits",
            "12",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Run {
                config,
                shots,
                seed,
                max_qubits,
                format,
                ..
            } => {
                assert_eq!(config.as_deref(), Some("qarch.yaml"));
                assert_eq!(shots, Some(100));
                assert_eq!(seed, 7);
                assert_eq!(max_qubits, Some(12));
                assert_eq!(format, OutputFormat::Json);
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_parse_errors() {
        assert!(Cli::try_parse_from(["qarch"]).is_err());
        assert!(Cli::try_parse_from(["qarch", "run"]).is_err());
        assert!(Cli::try_parse_from(["qarch", "run", "-i", "g.json", "--format", "xml"]).is_err());
        assert!(Cli::try_parse_from(["qarch", "gates"]).is_ok());
    }
}
