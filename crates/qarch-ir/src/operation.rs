//! Gate operations: a gate together with its ordered targets.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::gate::Gate;
use crate::qubit::QubitId;

/// A gate applied to an ordered list of target qubits.
///
/// For controlled gates the controls come first and the target last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateOperation {
    /// The gate to apply.
    pub gate: Gate,
    /// Qubits the gate acts on, in matrix order.
    pub targets: Vec<QubitId>,
    /// Editor node this operation was built from, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl GateOperation {
    /// Create a gate operation.
    pub fn new(gate: Gate, targets: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            gate,
            targets: targets.into_iter().collect(),
            source: None,
        }
    }

    /// Record the editor node this operation originates from.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl fmt::Display for GateOperation {
    /// Human-readable readout line, e.g. `H on q0` or `CX on q0, q1`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let targets: Vec<String> = self.targets.iter().map(ToString::to_string).collect();
        write!(f, "{} on {}", self.gate, targets.join(", "))
    }
}
