//! Recoverable issues recorded while building a circuit.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An advisory warning: the input was unusual but a circuit was still built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BuildWarning {
    /// A node could not be placed on a unique wire; `chosen` are the wires used.
    AmbiguousWire {
        /// Editor node id.
        node: String,
        /// Wires the node was placed on.
        chosen: Vec<u32>,
        /// Why the placement was not unique.
        reason: String,
    },
    /// A node label is not in the gate vocabulary; an identity gate was used.
    UnknownGateType {
        /// Editor node id.
        node: String,
        /// The unrecognised label.
        label: String,
    },
    /// A parametrized gate lacked angles; missing ones were taken as zero.
    MissingParameter {
        /// Editor node id.
        node: String,
        /// Gate name.
        gate: String,
        /// Number of parameters the gate takes.
        expected: usize,
        /// Number supplied.
        got: usize,
    },
    /// The circuit has fewer wires than the gate needs; the gate was dropped.
    UnassignableGate {
        /// Editor node id.
        node: String,
        /// Gate name.
        gate: String,
        /// Wires the gate needs.
        required: u32,
        /// Wires in the circuit.
        available: u32,
    },
    /// An edge would close a cycle and was ignored.
    CyclicEdge {
        /// Editor edge id.
        edge: String,
    },
    /// Canvas placement on a wire contradicts the explicit edges; edges won.
    OrderConflict {
        /// The wire both nodes sit on.
        wire: u32,
        /// Node placed first on the canvas.
        first: String,
        /// Node placed second on the canvas.
        second: String,
    },
}

impl fmt::Display for BuildWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildWarning::AmbiguousWire {
                node,
                chosen,
                reason,
            } => write!(f, "node '{node}': ambiguous wire ({reason}); using {chosen:?}"),
            BuildWarning::UnknownGateType { node, label } => {
                write!(f, "node '{node}': unknown gate type '{label}'; using identity")
            }
            BuildWarning::MissingParameter {
                node,
                gate,
                expected,
                got,
            } => write!(
                f,
                "node '{node}': gate '{gate}' takes {expected} parameter(s), got {got}; missing set to 0"
            ),
            BuildWarning::UnassignableGate {
                node,
                gate,
                required,
                available,
            } => write!(
                f,
                "node '{node}': gate '{gate}' needs {required} wire(s) but the circuit has {available}; dropped"
            ),
            BuildWarning::CyclicEdge { edge } => {
                write!(f, "edge '{edge}' would create a cycle; ignored")
            }
            BuildWarning::OrderConflict {
                wire,
                first,
                second,
            } => write!(
                f,
                "wire q{wire}: '{first}' is placed before '{second}' but edges order them the other way"
            ),
        }
    }
}
