//! Shared path marking for BFS, Dijkstra and A*.

use std::collections::HashMap;

use super::TraceBuilder;
use crate::error::{Error, Result};
use crate::step::{EdgeState, NodeState};

/// How path steps describe themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PathWording {
    /// Some path (BFS in the weighted sense)
    Found,
    /// A cost-optimal path
    Shortest,
}

impl PathWording {
    fn phrase(self) -> &'static str {
        match self {
            PathWording::Found => "is part of the path",
            PathWording::Shortest => "is on the shortest path",
        }
    }
}

/// Walk `predecessors` back from `end` and append the path steps.
///
/// Emits `path` for the start node, then for each hop the first matching edge
/// (in edge order) followed by the hop's destination node. A hop without a
/// matching edge only marks the node. Distances come from `costs` when the
/// generator tracked them, otherwise from the running sum of matched edge
/// weights.
pub(crate) fn mark_path<'g>(
    builder: &mut TraceBuilder<'g>,
    predecessors: &HashMap<&'g str, &'g str>,
    end: &'g str,
    costs: Option<&HashMap<&'g str, u64>>,
    wording: PathWording,
) -> Result<()> {
    let graph = builder.graph();
    let limit = graph.node_count();

    let mut path = vec![end];
    let mut current = end;
    while let Some(&previous) = predecessors.get(current) {
        if path.len() > limit {
            return Err(Error::PredecessorCycle {
                end: end.to_string(),
            });
        }
        path.push(previous);
        current = previous;
    }
    path.reverse();

    let phrase = wording.phrase();
    let mut running: u64 = 0;
    let mut previous: Option<&str> = None;

    for &id in &path {
        if let Some(from) = previous {
            if let Some(edge) = graph.find_edge(from, id) {
                running = running.saturating_add(u64::from(edge.weight));
                let distance = costs.and_then(|c| c.get(id).copied()).unwrap_or(running);
                let message = format!(
                    "Edge {} → {} {phrase}",
                    builder.label(from),
                    builder.label(id)
                );
                builder.edge_at(&edge.id, EdgeState::Path, message, distance);
            }
        }
        let distance = costs.and_then(|c| c.get(id).copied()).unwrap_or(running);
        let message = format!("Node {} {phrase}", builder.label(id));
        builder.node_at(id, NodeState::Path, message, distance);
        previous = Some(id);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::fixtures;
    use crate::step::EdgeState;

    #[test]
    fn marks_start_then_edge_node_pairs() {
        let graph = fixtures::abc();
        let mut builder = TraceBuilder::new(&graph);
        let predecessors: HashMap<&str, &str> = [("b", "a"), ("c", "b")].into();
        mark_path(&mut builder, &predecessors, "c", None, PathWording::Found).unwrap();
        let trace = builder.finish();

        let ids: Vec<_> = trace.iter().map(|s| s.target_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "ab", "b", "bc", "c"]);
        assert!(trace[1].is_edge(EdgeState::Path));
        let distances: Vec<_> = trace.iter().map(|s| s.distance).collect();
        assert_eq!(distances, vec![Some(0), Some(5), Some(5), Some(6), Some(6)]);
    }

    #[test]
    fn prefers_known_costs() {
        let graph = fixtures::abc();
        let mut builder = TraceBuilder::new(&graph);
        let predecessors: HashMap<&str, &str> = [("c", "a")].into();
        let costs: HashMap<&str, u64> = [("a", 0), ("c", 42)].into();
        mark_path(&mut builder, &predecessors, "c", Some(&costs), PathWording::Shortest).unwrap();
        let trace = builder.finish();
        assert_eq!(trace.last().and_then(|s| s.distance), Some(42));
        assert!(trace[0].message.as_deref().unwrap_or_default().contains("shortest"));
    }

    #[test]
    fn missing_edge_is_skipped() {
        let graph = fixtures::abc();
        let mut builder = TraceBuilder::new(&graph);
        // no c→a edge exists
        let predecessors: HashMap<&str, &str> = [("a", "c")].into();
        mark_path(&mut builder, &predecessors, "a", None, PathWording::Found).unwrap();
        let trace = builder.finish();
        assert_eq!(trace.path_nodes(), vec!["c", "a"]);
        assert!(trace.path_edges().is_empty());
    }

    #[test]
    fn predecessor_cycle_is_an_error() {
        let graph = fixtures::abc();
        let mut builder = TraceBuilder::new(&graph);
        let predecessors: HashMap<&str, &str> = [("a", "b"), ("b", "a")].into();
        let err = mark_path(&mut builder, &predecessors, "a", None, PathWording::Found).unwrap_err();
        assert_eq!(err, Error::PredecessorCycle { end: "a".into() });
    }
}
