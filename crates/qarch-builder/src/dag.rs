//! Dependency DAG over editor nodes.
//!
//! The graph is kept acyclic on insertion: an edge that would close a cycle
//! is refused, so the topological sort can never fail.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use petgraph::Direction;
use petgraph::algo::has_path_connecting;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::graph::NodeKey;

/// Outcome of inserting a precedence edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeInsert {
    /// The edge was added.
    Added,
    /// An identical edge already exists.
    Duplicate,
    /// The edge would have created a cycle and was refused.
    Cycle,
}

/// Precedence graph whose node `i` is the `i`-th editor node.
#[derive(Debug)]
pub struct OrderingDag {
    graph: DiGraph<NodeKey, (), u32>,
}

impl OrderingDag {
    /// Create a DAG with one vertex per key and no edges.
    pub fn new(keys: impl IntoIterator<Item = NodeKey>) -> Self {
        let mut graph = DiGraph::default();
        for key in keys {
            graph.add_node(key);
        }
        Self { graph }
    }

    /// Require `before` to execute before `after`.
    pub fn add_precedence(&mut self, before: usize, after: usize) -> EdgeInsert {
        let (a, b) = (NodeIndex::new(before), NodeIndex::new(after));
        if a == b || has_path_connecting(&self.graph, b, a, None) {
            return EdgeInsert::Cycle;
        }
        if self.graph.find_edge(a, b).is_some() {
            return EdgeInsert::Duplicate;
        }
        self.graph.add_edge(a, b, ());
        EdgeInsert::Added
    }

    /// Kahn's algorithm; among ready vertices the smallest key goes first.
    pub fn topological_order(&self) -> Vec<usize> {
        let mut in_degree: Vec<usize> = self
            .graph
            .node_indices()
            .map(|n| {
                self.graph
                    .neighbors_directed(n, Direction::Incoming)
                    .count()
            })
            .collect();

        let mut ready: BinaryHeap<Reverse<(&NodeKey, usize)>> = self
            .graph
            .node_indices()
            .filter(|n| in_degree[n.index()] == 0)
            .map(|n| Reverse((&self.graph[n], n.index())))
            .collect();

        let mut order = Vec::with_capacity(self.graph.node_count());
        while let Some(Reverse((_, idx))) = ready.pop() {
            order.push(idx);
            for succ in self
                .graph
                .neighbors_directed(NodeIndex::new(idx), Direction::Outgoing)
            {
                let deg = &mut in_degree[succ.index()];
                *deg -= 1;
                if *deg == 0 {
                    ready.push(Reverse((&self.graph[succ], succ.index())));
                }
            }
        }
        order
    }
}
