//! Wire numbering and positional lane lookup.

use crate::graph::{EditorNode, NodeKey};

/// Vertical lanes of the circuit's wires, indexed by wire number.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WireLayout {
    lanes: Vec<f64>,
}

/// Result of numbering the input nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct WireNumbering {
    /// Wire assigned to each input node, in the order the inputs were given.
    pub wires: Vec<u32>,
    /// Lane positions.
    pub layout: WireLayout,
    /// Whether declarations were present but unusable (positional numbering used).
    pub declarations_ignored: bool,
}

impl WireLayout {
    /// Build a layout from lane positions (index = wire).
    pub fn new(lanes: Vec<f64>) -> Self {
        Self { lanes }
    }

    /// Number of wires.
    #[allow(clippy::cast_possible_truncation)]
    pub fn num_wires(&self) -> u32 {
        self.lanes.len() as u32
    }

    /// Lane position of `wire`.
    pub fn lane(&self, wire: u32) -> Option<f64> {
        self.lanes.get(wire as usize).copied()
    }

    /// `candidates` ordered by distance from `y`, ties broken by wire number.
    pub fn rank(&self, y: f64, candidates: &[u32]) -> Vec<u32> {
        let mut ranked: Vec<(f64, u32)> = candidates
            .iter()
            .filter_map(|&w| self.lane(w).map(|lane| ((lane - y).abs(), w)))
            .collect();
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        ranked.into_iter().map(|(_, w)| w).collect()
    }

    /// All wires ordered by distance from `y`.
    pub fn rank_all(&self, y: f64) -> Vec<u32> {
        let all: Vec<u32> = (0..self.num_wires()).collect();
        self.rank(y, &all)
    }

    /// The single wire among `candidates` whose lane `y` clearly falls in:
    /// strictly nearest and within `tolerance`.
    pub fn bucket(&self, y: f64, candidates: &[u32], tolerance: f64) -> Option<u32> {
        let ranked = self.rank(y, candidates);
        let best = *ranked.first()?;
        let best_dist = (self.lane(best)? - y).abs();
        if best_dist > tolerance {
            return None;
        }
        match ranked.get(1).and_then(|&w| self.lane(w)) {
            Some(lane) if (lane - y).abs() <= best_dist => None,
            _ => Some(best),
        }
    }
}

/// Number the input nodes.
///
/// Declared wire indices are honoured only when every input declares exactly
/// one and together they are `0..n`; otherwise inputs are numbered top to
/// bottom by `y`, ties broken by node id.
#[allow(clippy::cast_possible_truncation)]
pub fn number_inputs(inputs: &[&EditorNode]) -> WireNumbering {
    let n = inputs.len();
    let declared: Option<Vec<u32>> = inputs
        .iter()
        .map(|node| match node.wires.as_deref() {
            Some([w]) => Some(*w),
            _ => None,
        })
        .collect();

    if let Some(declared) = declared {
        let mut seen = vec![false; n];
        let dense = declared.iter().all(|&w| {
            let idx = w as usize;
            idx < n && !std::mem::replace(&mut seen[idx], true)
        });
        if dense {
            let mut lanes = vec![0.0; n];
            for (node, &w) in inputs.iter().zip(&declared) {
                lanes[w as usize] = node.position.y;
            }
            return WireNumbering {
                wires: declared,
                layout: WireLayout::new(lanes),
                declarations_ignored: false,
            };
        }
    }

    let any_declared = inputs.iter().any(|node| node.wires.is_some());

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        inputs[a]
            .position
            .y
            .total_cmp(&inputs[b].position.y)
            .then_with(|| NodeKey::new(&inputs[a].id).cmp(&NodeKey::new(&inputs[b].id)))
    });

    let mut wires = vec![0; n];
    let mut lanes = Vec::with_capacity(n);
    for (wire, &idx) in order.iter().enumerate() {
        wires[idx] = wire as u32;
        lanes.push(inputs[idx].position.y);
    }

    WireNumbering {
        wires,
        layout: WireLayout::new(lanes),
        declarations_ignored: any_declared,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(id: &str, y: f64) -> EditorNode {
        EditorNode::new(id, "input", 0.0, y)
    }

    #[test]
    fn test_positional_numbering() {
        let a = input("a", 200.0);
        let b = input("b", 0.0);
        let c = input("c", 100.0);
        let numbering = number_inputs(&[&a, &b, &c]);
        assert_eq!(numbering.wires, vec![2, 0, 1]);
        assert_eq!(numbering.layout.lane(0), Some(0.0));
        assert!(!numbering.declarations_ignored);
    }

    #[test]
    fn test_declared_numbering() {
        let a = input("a", 0.0).with_wires([1]);
        let b = input("b", 100.0).with_wires([0]);
        let numbering = number_inputs(&[&a, &b]);
        assert_eq!(numbering.wires, vec![1, 0]);
        assert_eq!(numbering.layout.lane(0), Some(100.0));
    }

    #[test]
    fn test_inconsistent_declarations_fall_back() {
        let a = input("a", 0.0).with_wires([1]);
        let b = input("b", 100.0).with_wires([1]);
        let numbering = number_inputs(&[&a, &b]);
        assert_eq!(numbering.wires, vec![0, 1]);
        assert!(numbering.declarations_ignored);
    }

    #[test]
    fn test_bucket() {
        let layout = WireLayout::new(vec![0.0, 100.0]);
        assert_eq!(layout.bucket(10.0, &[0, 1], 50.0), Some(0));
        assert_eq!(layout.bucket(95.0, &[0, 1], 50.0), Some(1));
        // Equidistant between lanes.
        assert_eq!(layout.bucket(50.0, &[0, 1], 50.0), None);
        // Too far from any lane.
        assert_eq!(layout.bucket(300.0, &[0, 1], 50.0), None);
        assert_eq!(layout.rank_all(300.0), vec![1, 0]);
    }
}
