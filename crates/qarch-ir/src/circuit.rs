//! The ordered circuit model consumed by the simulator.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::Gate;
use crate::operation::GateOperation;
use crate::qubit::QubitId;

/// A validated, totally ordered list of gate operations on `n` qubits.
///
/// Every operation stored here has as many targets as its gate's arity,
/// all within `[0, n)` and pairwise distinct.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CircuitModel {
    num_qubits: u32,
    operations: Vec<GateOperation>,
}

impl CircuitModel {
    /// Create an empty circuit on `num_qubits` qubits.
    pub fn new(num_qubits: u32) -> Self {
        Self {
            num_qubits,
            operations: vec![],
        }
    }

    /// Number of qubits.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Operations in execution order.
    #[inline]
    pub fn operations(&self) -> &[GateOperation] {
        &self.operations
    }

    /// Number of operations.
    #[inline]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Whether the circuit has no operations.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Qubit ids of this circuit.
    pub fn qubits(&self) -> impl Iterator<Item = QubitId> {
        (0..self.num_qubits).map(QubitId)
    }

    /// Validate and append an operation.
    pub fn push(&mut self, op: GateOperation) -> IrResult<&mut Self> {
        self.validate(&op)?;
        self.operations.push(op);
        Ok(self)
    }

    /// Append `gate` on `targets`.
    pub fn gate(
        &mut self,
        gate: Gate,
        targets: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.push(GateOperation::new(gate, targets))
    }

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(Gate::H, [qubit])
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(Gate::X, [qubit])
    }

    /// Apply CNOT gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.gate(Gate::CX, [control, target])
    }

    fn validate(&self, op: &GateOperation) -> IrResult<()> {
        let gate_name = op.gate.name();
        let expected = op.gate.num_qubits();
        let got = op.targets.len() as u32;
        if expected != got {
            return Err(IrError::QubitCountMismatch {
                gate_name: gate_name.to_string(),
                expected,
                got,
            });
        }

        for (i, &qubit) in op.targets.iter().enumerate() {
            if qubit.0 >= self.num_qubits {
                return Err(IrError::QubitOutOfRange {
                    qubit,
                    num_qubits: self.num_qubits,
                    gate_name: gate_name.to_string(),
                });
            }
            if op.targets[..i].contains(&qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit,
                    gate_name: gate_name.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Create a Bell state circuit: H(0), CX(0, 1).
    pub fn bell() -> IrResult<Self> {
        let mut circuit = Self::new(2);
        circuit.h(QubitId(0))?.cx(QubitId(0), QubitId(1))?;
        Ok(circuit)
    }

    /// Create an n-qubit GHZ circuit.
    pub fn ghz(n: u32) -> IrResult<Self> {
        let mut circuit = Self::new(n);
        if n == 0 {
            return Ok(circuit);
        }
        circuit.h(QubitId(0))?;
        for i in 1..n {
            circuit.cx(QubitId(i - 1), QubitId(i))?;
        }
        Ok(circuit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bell_circuit() {
        let circuit = CircuitModel::bell().unwrap();
        assert_eq!(circuit.num_qubits(), 2);
        assert_eq!(circuit.len(), 2);
        assert_eq!(circuit.operations()[1].gate, Gate::CX);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let mut circuit = CircuitModel::new(2);
        let err = circuit.h(QubitId(2)).unwrap_err();
        assert!(matches!(err, IrError::QubitOutOfRange { num_qubits: 2, .. }));
        assert!(circuit.is_empty());
    }

    #[test]
    fn test_duplicate_target_rejected() {
        let mut circuit = CircuitModel::new(2);
        let err = circuit.cx(QubitId(1), QubitId(1)).unwrap_err();
        assert!(matches!(err, IrError::DuplicateQubit { .. }));
    }

    #[test]
    fn test_arity_checked() {
        let mut circuit = CircuitModel::new(3);
        let err = circuit.gate(Gate::CCX, [QubitId(0), QubitId(1)]).unwrap_err();
        assert_eq!(
            err,
            IrError::QubitCountMismatch {
                gate_name: "ccx".into(),
                expected: 3,
                got: 2
            }
        );
    }

    #[test]
    fn test_ghz() {
        let circuit = CircuitModel::ghz(4).unwrap();
        assert_eq!(circuit.len(), 4);
        assert_eq!(circuit.qubits().count(), 4);
        assert!(CircuitModel::ghz(0).unwrap().is_empty());
    }
}
