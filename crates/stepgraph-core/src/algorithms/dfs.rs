//! Depth-first search with stop-on-first-hit.
//!
//! Emits exactly what a recursive DFS would, but keeps its frames on an
//! explicit stack so deep graphs cannot exhaust the thread stack.
//!
//! The path is marked while frames unwind: once a child reports success its
//! parent marks the connecting edge and then itself. Path steps therefore run
//! from the goal back towards the start, and the goal keeps its `end` state.

use std::collections::HashSet;

use super::TraceBuilder;
use crate::adjacency::{Adjacency, Neighbor};
use crate::error::Result;
use crate::graph::Graph;
use crate::step::{EdgeState, NodeState, Trace};

struct Frame<'g> {
    node: &'g str,
    /// Index of the next neighbor to consider.
    cursor: usize,
    /// Edge taken into the child currently being explored.
    child: Option<Neighbor<'g>>,
}

impl<'g> Frame<'g> {
    fn new(node: &'g str) -> Self {
        Self {
            node,
            cursor: 0,
            child: None,
        }
    }
}

/// DFS from `start`. Without `end` the whole reachable component is explored
/// and no `end`/`path` steps are produced.
pub fn dfs(graph: &Graph, start: &str, end: Option<&str>) -> Result<Trace> {
    let mut builder = TraceBuilder::new(graph);
    builder.node(
        start,
        NodeState::Start,
        format!("Starting DFS from {}", builder.label(start)),
    );
    let Some(start) = graph.node(start).map(|n| n.id.as_str()) else {
        return Ok(builder.finish());
    };

    let adjacency = Adjacency::build(graph);
    let mut visited: HashSet<&str> = HashSet::new();

    if enter(&mut builder, &mut visited, start, end) {
        return Ok(builder.finish());
    }

    let mut stack = vec![Frame::new(start)];
    // Result reported by the most recently finished child.
    let mut found = false;

    while let Some(frame) = stack.last_mut() {
        if let Some(child) = frame.child.take() {
            if found {
                let node = frame.node;
                stack.pop();
                builder.edge(
                    child.edge,
                    EdgeState::Path,
                    format!(
                        "Edge {} → {} is part of the path",
                        builder.label(node),
                        builder.label(child.target)
                    ),
                );
                builder.node(
                    node,
                    NodeState::Path,
                    format!("Node {} is part of the path", builder.label(node)),
                );
                continue;
            }
            builder.edge(
                child.edge,
                EdgeState::Traversed,
                format!("Backtracking from {}", builder.label(child.target)),
            );
        }

        let neighbors = adjacency.neighbors(frame.node);
        let next = neighbors
            .iter()
            .enumerate()
            .skip(frame.cursor)
            .find(|(_, n)| !visited.contains(n.target))
            .map(|(index, n)| (index, *n));

        match next {
            Some((index, neighbor)) => {
                frame.cursor = index + 1;
                frame.child = Some(neighbor);
                builder.edge(
                    neighbor.edge,
                    EdgeState::Traversing,
                    format!("Exploring edge to {}", builder.label(neighbor.target)),
                );
                if enter(&mut builder, &mut visited, neighbor.target, end) {
                    found = true;
                } else {
                    stack.push(Frame::new(neighbor.target));
                }
            }
            None => {
                let node = frame.node;
                stack.pop();
                builder.node(
                    node,
                    NodeState::Visited,
                    format!("Finished exploring {}", builder.label(node)),
                );
                found = false;
            }
        }
    }

    Ok(builder.finish())
}

/// Mark `node` visited and report whether it is the goal.
fn enter<'g>(
    builder: &mut TraceBuilder<'_>,
    visited: &mut HashSet<&'g str>,
    node: &'g str,
    end: Option<&str>,
) -> bool {
    visited.insert(node);
    builder.node(
        node,
        NodeState::Visiting,
        format!("Visiting node {}", builder.label(node)),
    );
    if end != Some(node) {
        return false;
    }
    builder.node(
        node,
        NodeState::End,
        format!("Target node {} found", builder.label(node)),
    );
    true
}
