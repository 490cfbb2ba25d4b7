//! Error types for the IR crate.

use crate::qubit::QubitId;
use thiserror::Error;

/// Errors that can occur while building or validating a circuit model.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum IrError {
    /// Gate name is not part of the gate library.
    #[error("Unknown gate '{0}'")]
    UnknownGate(String),

    /// Qubit index lies outside the circuit's register.
    #[error("Qubit {qubit} out of range for a {num_qubits}-qubit circuit (gate: {gate_name})")]
    QubitOutOfRange {
        /// The offending qubit.
        qubit: QubitId,
        /// Number of qubits in the circuit.
        num_qubits: u32,
        /// Name of the gate.
        gate_name: String,
    },

    /// The same qubit appears twice in one operation.
    #[error("Duplicate qubit {qubit} in operation (gate: {gate_name})")]
    DuplicateQubit {
        /// The duplicate qubit.
        qubit: QubitId,
        /// Name of the gate.
        gate_name: String,
    },

    /// Gate requires a different number of qubits.
    #[error("Gate '{gate_name}' requires {expected} qubits, got {got}")]
    QubitCountMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of qubits.
        expected: u32,
        /// Actual number of qubits provided.
        got: u32,
    },
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
