//! Qarch state-vector simulator
//!
//! Executes a [`CircuitModel`](qarch_ir::CircuitModel) on a dense
//! statevector and exposes the run as a service over editor graphs.
//!
//! # Example
//!
//! ```rust
//! use qarch_builder::{EditorGraph, EditorNode};
//! use qarch_sim::{RunOptions, SimulationService};
//!
//! let graph = EditorGraph::new()
//!     .node(EditorNode::new("q0", "input", 0.0, 0.0))
//!     .node(EditorNode::new("x", "X", 100.0, 0.0))
//!     .edge("q0", "x");
//!
//! let result = SimulationService::default()
//!     .run(&graph, &RunOptions::default())
//!     .unwrap();
//! assert_eq!(result.probability("1"), Some(1.0));
//! ```
//!
//! Basis states are labelled with qubit 0 as the rightmost character.

pub mod config;
pub mod error;
pub mod service;
pub mod statevector;

pub use config::{Config, MAX_SUPPORTED_QUBITS, SimConfig};
pub use error::{ConfigError, EngineError, EngineResult, SimulationError};
pub use service::{
    CancellationToken, MeasurementOutcome, RunOptions, RunReport, RunStatus, SimulationResult,
    SimulationService,
};
pub use statevector::{Statevector, bitstring};
