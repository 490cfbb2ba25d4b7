//! Error types for the simulation crate.

use thiserror::Error;

use qarch_builder::BuildError;

use crate::service::RunStatus;

/// Faults raised by the state-vector engine. Any of these aborts a run.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum EngineError {
    /// Number of targets differs from the gate's arity.
    #[error("Gate '{gate}' acts on {expected} qubit(s) but {got} target(s) were given")]
    ArityMismatch {
        /// Gate name.
        gate: String,
        /// Gate arity.
        expected: u32,
        /// Number of targets supplied.
        got: usize,
    },

    /// The circuit needs more qubits than the configured ceiling.
    #[error("Circuit needs {requested} qubits but the simulator is limited to {max}")]
    CapacityExceeded {
        /// Qubits requested.
        requested: u32,
        /// Configured ceiling.
        max: u32,
    },

    /// The state drifted away from unit norm.
    #[error(
        "State norm drifted by {deviation:e} after gate '{gate}' (tolerance {tolerance:e})",
        deviation = .norm_sqr - 1.0
    )]
    NormalizationError {
        /// Squared norm after the gate.
        norm_sqr: f64,
        /// Gate just applied.
        gate: String,
        /// Allowed deviation from 1.
        tolerance: f64,
    },

    /// A target is out of range or repeated.
    #[error("Invalid target q{qubit} for gate '{gate}' on a {num_qubits}-qubit register")]
    InvalidTarget {
        /// The offending qubit index.
        qubit: u32,
        /// Gate name.
        gate: String,
        /// Register size.
        num_qubits: u32,
    },
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Why a simulation run produced no result.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimulationError {
    /// The editor graph could not be turned into a circuit.
    #[error("Invalid circuit input: {0}")]
    Build(#[from] BuildError),

    /// The simulator could not execute the circuit.
    #[error("Simulation failed: {0}")]
    Engine(#[from] EngineError),

    /// The run was cancelled between gates.
    #[error("Simulation cancelled after {applied} of {total} operations")]
    Cancelled {
        /// Operations applied before cancellation.
        applied: usize,
        /// Operations in the circuit.
        total: usize,
    },

    /// The background task running the simulation did not complete.
    #[error("Simulation task failed: {0}")]
    Dispatch(String),
}

impl SimulationError {
    /// The run status this error maps to.
    pub fn status(&self) -> RunStatus {
        match self {
            SimulationError::Build(_) => RunStatus::InvalidInput,
            SimulationError::Engine(_) | SimulationError::Dispatch(_) => RunStatus::EngineFailure,
            SimulationError::Cancelled { .. } => RunStatus::Cancelled,
        }
    }
}

/// Configuration loading errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read configuration: {0}")]
    Io(String),

    /// The configuration file is not valid YAML for this schema.
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    /// A value is out of range.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
