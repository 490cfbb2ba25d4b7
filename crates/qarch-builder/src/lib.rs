//! Qarch circuit builder
//!
//! Turns a snapshot of the visual editor's node/edge graph into an ordered
//! [`CircuitModel`](qarch_ir::CircuitModel).
//!
//! The editor graph is freely mutable and often half-finished, so the builder
//! is forgiving: only dangling edges and duplicate node ids abort a build.
//! Everything else (unknown labels, nodes between lanes, cyclic edges) is
//! repaired and reported as a [`BuildWarning`].
//!
//! # Pipeline
//!
//! 1. Input nodes become wires, numbered by declaration or top to bottom.
//! 2. Explicit edges form a precedence DAG; cycle-closing edges are dropped.
//! 3. Gate nodes are placed on wires: declaration, then predecessor wires,
//!    then the nearest lanes.
//! 4. Each wire's gates are chained left to right, linking the sub-orders of
//!    every wire a multi-qubit gate touches.
//! 5. A topological sort, ties broken by node id, fixes the final order.
//!
//! # Example
//!
//! ```rust
//! use qarch_builder::{CircuitBuilder, EditorGraph, EditorNode};
//!
//! let graph = EditorGraph::new()
//!     .node(EditorNode::new("q0", "input", 0.0, 0.0))
//!     .node(EditorNode::new("q1", "input", 0.0, 100.0))
//!     .node(EditorNode::new("1", "H", 100.0, 0.0))
//!     .node(EditorNode::new("2", "CNOT", 200.0, 50.0))
//!     .edge("q0", "1")
//!     .edge("1", "2")
//!     .edge("q1", "2");
//!
//! let output = CircuitBuilder::default().build(&graph).unwrap();
//! assert_eq!(output.readout(), vec!["H on q0", "CX on q0, q1"]);
//! assert!(output.warnings.is_empty());
//! ```

pub mod builder;
pub mod config;
pub mod dag;
pub mod error;
pub mod graph;
pub mod vocabulary;
pub mod warning;
pub mod wires;

pub use builder::{BuildOutput, CircuitBuilder};
pub use config::BuilderConfig;
pub use error::{BuildError, BuildResult};
pub use graph::{EditorEdge, EditorGraph, EditorNode, NodeData, NodeKey, Position};
pub use vocabulary::NodeTag;
pub use warning::BuildWarning;
