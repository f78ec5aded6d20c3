//! Breadth-first search.

use std::collections::{HashMap, HashSet, VecDeque};

use super::path::{mark_path, PathWording};
use super::TraceBuilder;
use crate::adjacency::Adjacency;
use crate::error::Result;
use crate::graph::Graph;
use crate::step::{EdgeState, NodeState, Trace};

/// BFS from `start`, stopping at `end` when given.
///
/// Neighbors are discovered in edge insertion order and marked visited when
/// enqueued, so each node is expanded at most once. Reaching `end` discards
/// the rest of the queue.
pub fn bfs(graph: &Graph, start: &str, end: Option<&str>) -> Result<Trace> {
    let mut builder = TraceBuilder::new(graph);
    builder.node(
        start,
        NodeState::Start,
        format!("Starting BFS from {}", builder.label(start)),
    );
    let Some(start) = graph.node(start).map(|n| n.id.as_str()) else {
        return Ok(builder.finish());
    };

    let adjacency = Adjacency::build(graph);
    let mut visited: HashSet<&str> = HashSet::from([start]);
    let mut predecessors: HashMap<&str, &str> = HashMap::new();
    let mut queue: VecDeque<&str> = VecDeque::from([start]);

    while let Some(current) = queue.pop_front() {
        builder.node(
            current,
            NodeState::Visiting,
            format!("Visiting node {}", builder.label(current)),
        );

        if end == Some(current) {
            builder.node(
                current,
                NodeState::End,
                format!("Target node {} found", builder.label(current)),
            );
            mark_path(&mut builder, &predecessors, current, None, PathWording::Found)?;
            return Ok(builder.finish());
        }

        for neighbor in adjacency.neighbors(current) {
            if !visited.insert(neighbor.target) {
                continue;
            }
            predecessors.insert(neighbor.target, current);
            queue.push_back(neighbor.target);
            builder.edge(
                neighbor.edge,
                EdgeState::Traversing,
                format!("Exploring edge to {}", builder.label(neighbor.target)),
            );
        }

        builder.node(
            current,
            NodeState::Visited,
            format!("Finished exploring {}", builder.label(current)),
        );
    }

    Ok(builder.finish())
}
