//! Editor graph → ordered [`CircuitModel`].

use rustc_hash::FxHashMap;
use tracing::{debug, instrument, warn};

use qarch_ir::{CircuitModel, Gate, GateLibrary, GateOperation, QubitId};

use crate::config::BuilderConfig;
use crate::dag::{EdgeInsert, OrderingDag};
use crate::error::{BuildError, BuildResult};
use crate::graph::{EditorGraph, EditorNode, NodeKey};
use crate::vocabulary::NodeTag;
use crate::warning::BuildWarning;
use crate::wires::{WireLayout, number_inputs};

/// A best-effort circuit plus everything unusual found on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildOutput {
    /// The ordered circuit.
    pub circuit: CircuitModel,
    /// Advisory warnings, in the order they were found.
    pub warnings: Vec<BuildWarning>,
}

impl BuildOutput {
    /// One line per operation, e.g. `H on q0`.
    pub fn readout(&self) -> Vec<String> {
        self.circuit
            .operations()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    /// Whether the build was clean.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Translates editor graphs into circuit models.
///
/// Only structural damage (dangling edges, duplicate ids) fails a build;
/// everything else degrades to a warning so a half-edited canvas still
/// simulates.
#[derive(Debug, Clone, Default)]
pub struct CircuitBuilder {
    config: BuilderConfig,
}

impl CircuitBuilder {
    /// Create a builder with the given configuration.
    pub fn new(config: BuilderConfig) -> Self {
        Self { config }
    }

    /// Build a circuit from an editor graph snapshot.
    #[instrument(skip(self, graph), fields(nodes = graph.nodes.len(), edges = graph.edges.len()))]
    pub fn build(&self, graph: &EditorGraph) -> BuildResult<BuildOutput> {
        let nodes = &graph.nodes;
        let mut warnings = Vec::new();

        let mut index: FxHashMap<&str, usize> = FxHashMap::default();
        for (i, node) in nodes.iter().enumerate() {
            if index.insert(node.id.as_str(), i).is_some() {
                return Err(BuildError::DuplicateNode(node.id.clone()));
            }
        }

        let mut edges = Vec::with_capacity(graph.edges.len());
        for edge in &graph.edges {
            let lookup = |id: &str| {
                index
                    .get(id)
                    .copied()
                    .ok_or_else(|| BuildError::MalformedGraph {
                        edge: edge.id.clone(),
                        node: id.to_string(),
                    })
            };
            let source = lookup(&edge.source)?;
            let target = lookup(&edge.target)?;
            edges.push((NodeKey::new(&edge.id), edge, source, target));
        }
        edges.sort_by(|a, b| a.0.cmp(&b.0));

        let tags: Vec<NodeTag> = nodes.iter().map(NodeTag::of).collect();
        let keys: Vec<NodeKey> = nodes.iter().map(|n| NodeKey::new(&n.id)).collect();

        // Wires
        let inputs: Vec<usize> = (0..nodes.len())
            .filter(|&i| tags[i] == NodeTag::Input)
            .collect();
        let input_nodes: Vec<&EditorNode> = inputs.iter().map(|&i| &nodes[i]).collect();
        let numbering = number_inputs(&input_nodes);
        let layout = numbering.layout;
        let num_qubits = layout.num_wires();

        let mut node_wires: Vec<Option<Vec<u32>>> = vec![None; nodes.len()];
        for (&i, &wire) in inputs.iter().zip(&numbering.wires) {
            node_wires[i] = Some(vec![wire]);
            if numbering.declarations_ignored && nodes[i].wires.is_some() {
                warnings.push(BuildWarning::AmbiguousWire {
                    node: nodes[i].id.clone(),
                    chosen: vec![wire],
                    reason: "input wire declarations are incomplete or inconsistent; numbered by position"
                        .to_string(),
                });
            }
        }

        // Explicit precedence
        let mut dag = OrderingDag::new(keys.iter().cloned());
        let mut incoming: Vec<Vec<usize>> = vec![vec![]; nodes.len()];
        for (_, edge, source, target) in &edges {
            match dag.add_precedence(*source, *target) {
                EdgeInsert::Cycle => warnings.push(BuildWarning::CyclicEdge {
                    edge: edge.id.clone(),
                }),
                EdgeInsert::Added | EdgeInsert::Duplicate => incoming[*target].push(*source),
            }
        }

        // Gates, resolved so that predecessors come first
        let mut ops: Vec<Option<GateOperation>> = vec![None; nodes.len()];
        for i in dag.topological_order() {
            let node = &nodes[i];
            let gate = match &tags[i] {
                NodeTag::Input | NodeTag::Output => continue,
                NodeTag::Gate(info) => {
                    if node.params.len() < info.num_params {
                        warnings.push(BuildWarning::MissingParameter {
                            node: node.id.clone(),
                            gate: info.name.to_string(),
                            expected: info.num_params,
                            got: node.params.len(),
                        });
                    }
                    GateLibrary::lookup(info.name, &node.params)?
                }
                NodeTag::Unknown(label) => {
                    warnings.push(BuildWarning::UnknownGateType {
                        node: node.id.clone(),
                        label: label.clone(),
                    });
                    Gate::I
                }
            };

            let arity = gate.num_qubits();
            if num_qubits < arity {
                warnings.push(BuildWarning::UnassignableGate {
                    node: node.id.clone(),
                    gate: gate.name().to_string(),
                    required: arity,
                    available: num_qubits,
                });
                continue;
            }

            let mut candidates: Vec<u32> = vec![];
            for &pred in &incoming[i] {
                for &w in node_wires[pred].iter().flatten() {
                    if !candidates.contains(&w) {
                        candidates.push(w);
                    }
                }
            }

            let wires = self.assign_wires(node, arity as usize, &candidates, &layout, &mut warnings);
            ops[i] = Some(
                GateOperation::new(gate, wires.iter().copied().map(QubitId)).with_source(&node.id),
            );
            node_wires[i] = Some(wires);
        }

        // Per-wire sub-orders from canvas placement
        for wire in 0..num_qubits {
            let mut members: Vec<usize> = (0..nodes.len())
                .filter(|&i| {
                    ops[i].is_some()
                        && node_wires[i]
                            .as_ref()
                            .is_some_and(|ws| ws.contains(&wire))
                })
                .collect();
            members.sort_by(|&a, &b| {
                nodes[a]
                    .position
                    .x
                    .total_cmp(&nodes[b].position.x)
                    .then_with(|| keys[a].cmp(&keys[b]))
            });
            for pair in members.windows(2) {
                if dag.add_precedence(pair[0], pair[1]) == EdgeInsert::Cycle {
                    warnings.push(BuildWarning::OrderConflict {
                        wire,
                        first: nodes[pair[0]].id.clone(),
                        second: nodes[pair[1]].id.clone(),
                    });
                }
            }
        }

        let mut circuit = CircuitModel::new(num_qubits);
        for i in dag.topological_order() {
            if let Some(op) = ops[i].take() {
                circuit.push(op)?;
            }
        }

        for warning in &warnings {
            warn!("{warning}");
        }
        debug!(
            "Built circuit: {} qubits, {} operations, {} warnings",
            circuit.num_qubits(),
            circuit.len(),
            warnings.len()
        );

        Ok(BuildOutput { circuit, warnings })
    }

    /// Choose `arity` wires for a gate node.
    ///
    /// `candidates` are the wires of the node's predecessors in edge order.
    /// Callers guarantee `arity <= layout.num_wires()`.
    fn assign_wires(
        &self,
        node: &EditorNode,
        arity: usize,
        candidates: &[u32],
        layout: &WireLayout,
        warnings: &mut Vec<BuildWarning>,
    ) -> Vec<u32> {
        let num_wires = layout.num_wires();
        let mut problems: Vec<String> = vec![];

        if let Some(declared) = node.wires.as_deref() {
            let distinct = declared
                .iter()
                .enumerate()
                .all(|(i, w)| !declared[..i].contains(w));
            if declared.len() == arity && distinct && declared.iter().all(|&w| w < num_wires) {
                return declared.to_vec();
            }
            problems.push(format!("declared wires {declared:?} are invalid"));
        }

        let y = node.position.y;
        let tolerance = self.config.lane_tolerance;
        let wires = if candidates.len() == arity {
            candidates.to_vec()
        } else if arity == 1 {
            let pool: Vec<u32> = if candidates.is_empty() {
                (0..num_wires).collect()
            } else {
                candidates.to_vec()
            };
            match layout.bucket(y, &pool, tolerance) {
                Some(wire) => vec![wire],
                None => {
                    problems.push(if candidates.is_empty() {
                        "position does not fall clearly on one lane".to_string()
                    } else {
                        format!("predecessors span wires {candidates:?}")
                    });
                    layout.rank(y, &pool).into_iter().take(1).collect()
                }
            }
        } else if candidates.len() > arity {
            problems.push(format!(
                "predecessors span {} wires, gate uses {arity}",
                candidates.len()
            ));
            let nearest: Vec<u32> = layout.rank(y, candidates).into_iter().take(arity).collect();
            candidates
                .iter()
                .copied()
                .filter(|w| nearest.contains(w))
                .collect()
        } else {
            problems.push(format!(
                "only {} of {arity} wires connected; rest placed by position",
                candidates.len()
            ));
            let mut wires = candidates.to_vec();
            for wire in layout.rank_all(y) {
                if wires.len() == arity {
                    break;
                }
                if !wires.contains(&wire) {
                    wires.push(wire);
                }
            }
            wires
        };

        if !problems.is_empty() {
            warnings.push(BuildWarning::AmbiguousWire {
                node: node.id.clone(),
                chosen: wires.clone(),
                reason: problems.join("; "),
            });
        }
        wires
    }
}
