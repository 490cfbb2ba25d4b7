//! Node type tags understood by the builder.

use qarch_ir::{GateInfo, GateLibrary};

use crate::graph::EditorNode;

/// What an editor node stands for.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeTag {
    /// Start of a wire; each input node contributes one qubit.
    Input,
    /// End-of-wire marker (output or measurement); emits no operation.
    Output,
    /// A gate from the library.
    Gate(&'static GateInfo),
    /// A label outside the vocabulary.
    Unknown(String),
}

const INPUT_TAGS: &[&str] = &["INPUT", "IN", "QUBIT", "WIRE"];
const OUTPUT_TAGS: &[&str] = &["OUTPUT", "OUT", "MEASURE", "MEASUREMENT"];

impl NodeTag {
    /// Classify a raw tag.
    pub fn parse(tag: &str) -> Self {
        let upper = tag.trim().to_ascii_uppercase();
        if INPUT_TAGS.contains(&upper.as_str()) {
            NodeTag::Input
        } else if OUTPUT_TAGS.contains(&upper.as_str()) {
            NodeTag::Output
        } else if let Some(info) = GateLibrary::info(&upper) {
            NodeTag::Gate(info)
        } else {
            NodeTag::Unknown(tag.to_string())
        }
    }

    /// Classify a node; generic `gate` nodes are named by their label.
    pub fn of(node: &EditorNode) -> Self {
        let tag = node.effective_tag();
        if tag.eq_ignore_ascii_case("gate") {
            match node.effective_label() {
                Some(label) => Self::parse(label),
                None => NodeTag::Unknown(tag.to_string()),
            }
        } else {
            Self::parse(tag)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeData;

    #[test]
    fn test_parse_tags() {
        assert_eq!(NodeTag::parse("input"), NodeTag::Input);
        assert_eq!(NodeTag::parse("Measure"), NodeTag::Output);
        assert!(matches!(NodeTag::parse("CNOT"), NodeTag::Gate(g) if g.name == "cx"));
        assert!(matches!(NodeTag::parse("h"), NodeTag::Gate(g) if g.name == "h"));
        assert_eq!(NodeTag::parse("Oracle"), NodeTag::Unknown("Oracle".into()));
    }

    #[test]
    fn test_generic_gate_uses_label() {
        let node = EditorNode::new("1", "gate", 0.0, 0.0).with_label("X");
        assert!(matches!(NodeTag::of(&node), NodeTag::Gate(g) if g.name == "x"));

        let unlabeled = EditorNode::new("2", "gate", 0.0, 0.0);
        assert_eq!(NodeTag::of(&unlabeled), NodeTag::Unknown("gate".into()));
    }

    #[test]
    fn test_untyped_node_reads_data() {
        let mut node = EditorNode::new("gate1", "", 0.0, 0.0);
        node.data = Some(NodeData {
            label: Some("H".into()),
            tag: None,
        });
        assert!(matches!(NodeTag::of(&node), NodeTag::Gate(g) if g.name == "h"));

        node.data = Some(NodeData {
            label: Some("q[0]".into()),
            tag: Some("input".into()),
        });
        assert_eq!(NodeTag::of(&node), NodeTag::Input);
    }
}
