//! Editor graph snapshot: the node/edge shape produced by the canvas.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::error::BuildResult;

/// Canvas coordinates of a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal position; later on the canvas means later in time.
    pub x: f64,
    /// Vertical position; selects the wire lane.
    pub y: f64,
}

impl Position {
    /// Create a position.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A node on the editor canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorNode {
    /// Editor-assigned identifier.
    pub id: String,
    /// Node type tag (`input`, `H`, `CNOT`, ...). The tag `gate` defers to
    /// the label; a missing tag falls back to `data.type`, then `gate`.
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub tag: String,
    /// Display label; names the gate when `tag` is `gate`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Payload nested by the canvas library.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<NodeData>,
    /// Canvas placement.
    #[serde(default)]
    pub position: Position,
    /// Explicit wire assignment, controls first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wires: Option<Vec<u32>>,
    /// Angle parameters for parametrized gates.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<f64>,
}

impl EditorNode {
    /// Create a node at `(x, y)`.
    pub fn new(id: impl Into<String>, tag: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            tag: tag.into(),
            label: None,
            data: None,
            position: Position::new(x, y),
            wires: None,
            params: vec![],
        }
    }

    /// Declare the wires this node sits on.
    #[must_use]
    pub fn with_wires(mut self, wires: impl IntoIterator<Item = u32>) -> Self {
        self.wires = Some(wires.into_iter().collect());
        self
    }

    /// Attach angle parameters.
    #[must_use]
    pub fn with_params(mut self, params: impl IntoIterator<Item = f64>) -> Self {
        self.params = params.into_iter().collect();
        self
    }

    /// Attach a display label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The effective type tag: `type`, else `data.type`, else `gate`.
    pub fn effective_tag(&self) -> &str {
        let tag = self.tag.trim();
        if !tag.is_empty() {
            return tag;
        }
        self.data
            .as_ref()
            .and_then(|d| d.tag.as_deref())
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or("gate")
    }

    /// The label, read from the top level or from `data`.
    pub fn effective_label(&self) -> Option<&str> {
        self.label
            .as_deref()
            .or_else(|| self.data.as_ref().and_then(|d| d.label.as_deref()))
    }
}

/// The `data` object of a canvas node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    /// Display label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Node type.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

/// A precedence edge: `source` executes before `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorEdge {
    /// Editor-assigned identifier.
    pub id: String,
    /// Id of the earlier node.
    pub source: String,
    /// Id of the later node.
    pub target: String,
}

impl EditorEdge {
    /// Create an edge.
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
        }
    }
}

/// A snapshot of the editor's node/edge graph.
///
/// The snapshot may be inconsistent (dangling edges, cycles, overlapping
/// nodes); [`CircuitBuilder`](crate::CircuitBuilder) decides what to make of it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditorGraph {
    /// Canvas nodes.
    #[serde(default)]
    pub nodes: Vec<EditorNode>,
    /// Canvas edges.
    #[serde(default)]
    pub edges: Vec<EditorEdge>,
}

impl EditorGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the editor's JSON shape: `{ "nodes": [...], "edges": [...] }`.
    pub fn from_json(source: &str) -> BuildResult<Self> {
        Ok(serde_json::from_str(source)?)
    }

    /// Add a node.
    #[must_use]
    pub fn node(mut self, node: EditorNode) -> Self {
        self.nodes.push(node);
        self
    }

    /// Add an edge, deriving its id from the endpoints.
    #[must_use]
    pub fn edge(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        let (source, target) = (source.into(), target.into());
        let id = format!("e{source}-{target}");
        self.edges.push(EditorEdge::new(id, source, target));
        self
    }
}

/// Deterministic ordering key for editor identifiers.
///
/// Ids that parse as unsigned integers order numerically and before all other
/// ids; the rest order lexically. The raw id breaks remaining ties (`"07"` vs `"7"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeKey {
    numeric: Option<u64>,
    raw: String,
}

impl NodeKey {
    /// Key for an editor id.
    pub fn new(id: &str) -> Self {
        Self {
            numeric: id.parse().ok(),
            raw: id.to_string(),
        }
    }

    /// The raw id.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl Ord for NodeKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric, other.numeric) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.raw.cmp(&other.raw)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.raw.cmp(&other.raw),
        }
    }
}

impl PartialOrd for NodeKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_key_numeric_before_text() {
        let mut keys: Vec<NodeKey> = ["b", "10", "2", "a", "1"]
            .iter()
            .map(|s| NodeKey::new(s))
            .collect();
        keys.sort();
        let ids: Vec<&str> = keys.iter().map(NodeKey::as_str).collect();
        assert_eq!(ids, vec!["1", "2", "10", "a", "b"]);
    }

    #[test]
    fn test_parse_editor_json() {
        let json = r#"{
            "nodes": [
                {"id": "q0", "type": "input", "position": {"x": 0, "y": 0}},
                {"id": "1", "type": "gate", "label": "H", "position": {"x": 100, "y": 5}},
                {"id": "2", "type": "RX", "params": [1.57], "wires": [0]}
            ],
            "edges": [{"id": "e1", "source": "q0", "target": "1"}]
        }"#;
        let graph = EditorGraph::from_json(json).unwrap();
        assert_eq!(graph.nodes.len(), 3);
        assert_eq!(graph.nodes[1].label.as_deref(), Some("H"));
        assert_eq!(graph.nodes[2].wires, Some(vec![0]));
        assert_eq!(graph.nodes[2].position, Position::default());
        assert_eq!(graph.edges[0].target, "1");
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(EditorGraph::from_json("{\"nodes\": 3}").is_err());
    }

    #[test]
    fn test_graph_builder_helpers() {
        let graph = EditorGraph::new()
            .node(EditorNode::new("a", "input", 0.0, 0.0))
            .node(EditorNode::new("b", "h", 10.0, 0.0))
            .edge("a", "b");
        assert_eq!(graph.edges[0].id, "ea-b");
    }
}
