//! Outgoing adjacency lists built once per run.

use std::collections::{HashMap, HashSet};

use crate::graph::Graph;

/// One outgoing edge as seen from its source node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbor<'g> {
    pub target: &'g str,
    pub edge: &'g str,
    pub weight: u32,
}

/// Node id → outgoing edges, in edge insertion order.
///
/// Borrows ids from the snapshot, so it lives no longer than the run.
#[derive(Debug, Default)]
pub struct Adjacency<'g> {
    outgoing: HashMap<&'g str, Vec<Neighbor<'g>>>,
}

impl<'g> Adjacency<'g> {
    /// Single pass over the edge list.
    ///
    /// Edges whose endpoints are not both nodes of the snapshot are left out.
    pub fn build(graph: &'g Graph) -> Self {
        let known: HashSet<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
        let mut outgoing: HashMap<&'g str, Vec<Neighbor<'g>>> =
            HashMap::with_capacity(graph.node_count());

        for edge in &graph.edges {
            if !known.contains(edge.source.as_str()) || !known.contains(edge.target.as_str()) {
                continue;
            }
            outgoing.entry(edge.source.as_str()).or_default().push(Neighbor {
                target: &edge.target,
                edge: &edge.id,
                weight: edge.weight,
            });
        }

        Self { outgoing }
    }

    /// Outgoing edges of `id`, empty for unknown or sink nodes.
    pub fn neighbors(&self, id: &str) -> &[Neighbor<'g>] {
        self.outgoing.get(id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Number of nodes with at least one outgoing edge.
    pub fn len(&self) -> usize {
        self.outgoing.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outgoing.is_empty()
    }
}
