//! Qarch circuit model
//!
//! Core data structures shared by the circuit builder and the state-vector
//! simulator: qubit identifiers, the closed gate library with its unitary
//! matrices, gate operations, and the ordered [`CircuitModel`].
//!
//! # Example: Building a Bell State
//!
//! ```rust
//! use qarch_ir::{CircuitModel, QubitId};
//!
//! let mut circuit = CircuitModel::new(2);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.len(), 2);
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `I`, `H` | 1 | Identity, Hadamard |
//! | `X`, `Y`, `Z` | 1 | Pauli gates |
//! | `S`, `Sdg`, `T`, `Tdg`, `SX` | 1 | Clifford+T family |
//! | `Rx`, `Ry`, `Rz`, `P` | 1 | Rotation and phase gates |
//! | `CX`, `CY`, `CZ`, `CH`, `CP` | 2 | Controlled gates |
//! | `Swap` | 2 | SWAP gate |
//! | `CCX`, `CSwap` | 3 | Toffoli and Fredkin gates |

pub mod circuit;
pub mod error;
pub mod gate;
pub mod operation;
pub mod qubit;

pub use circuit::CircuitModel;
pub use error::{IrError, IrResult};
pub use gate::{Gate, GateInfo, GateLibrary, GateMatrix};
pub use operation::GateOperation;
pub use qubit::QubitId;
