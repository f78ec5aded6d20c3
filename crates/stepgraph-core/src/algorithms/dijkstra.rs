//! Dijkstra's shortest path.

use std::collections::{HashMap, HashSet};

use super::frontier::Frontier;
use super::path::{mark_path, PathWording};
use super::TraceBuilder;
use crate::adjacency::Adjacency;
use crate::error::Result;
use crate::graph::Graph;
use crate::step::{EdgeState, NodeState, Trace};

/// Dijkstra from `start`, stopping when `end` is finalized.
///
/// Unknown distances count as infinite. The first time a node leaves the
/// frontier its distance is final, which holds because weights are
/// non-negative.
pub fn dijkstra(graph: &Graph, start: &str, end: Option<&str>) -> Result<Trace> {
    let mut builder = TraceBuilder::new(graph);
    builder.node_at(
        start,
        NodeState::Start,
        format!("Starting Dijkstra from {}", builder.label(start)),
        0,
    );
    let Some(start) = graph.node(start).map(|n| n.id.as_str()) else {
        return Ok(builder.finish());
    };

    let adjacency = Adjacency::build(graph);
    let mut distances: HashMap<&str, u64> = HashMap::from([(start, 0)]);
    let mut predecessors: HashMap<&str, &str> = HashMap::new();
    let mut finalized: HashSet<&str> = HashSet::new();
    let mut frontier = Frontier::seeded(start);

    while let Some(current) =
        frontier.pop_min_by(|a, b| distance_of(&distances, a).cmp(&distance_of(&distances, b)))
    {
        if !finalized.insert(current) {
            continue;
        }
        let distance = distance_of(&distances, current);

        builder.node_at(
            current,
            NodeState::Visiting,
            format!("Visiting {}, distance: {distance}", builder.label(current)),
            distance,
        );

        if end == Some(current) {
            builder.node_at(
                current,
                NodeState::End,
                format!("Target {} reached, distance: {distance}", builder.label(current)),
                distance,
            );
            mark_path(
                &mut builder,
                &predecessors,
                current,
                Some(&distances),
                PathWording::Shortest,
            )?;
            break;
        }

        for neighbor in adjacency.neighbors(current) {
            if finalized.contains(neighbor.target) {
                continue;
            }
            let candidate = distance.saturating_add(u64::from(neighbor.weight));
            if candidate >= distance_of(&distances, neighbor.target) {
                continue;
            }
            distances.insert(neighbor.target, candidate);
            predecessors.insert(neighbor.target, current);
            frontier.push(neighbor.target);
            builder.edge_at(
                neighbor.edge,
                EdgeState::Traversing,
                format!(
                    "Relaxing edge to {}, new distance: {candidate}",
                    builder.label(neighbor.target)
                ),
                candidate,
            );
        }

        builder.node_at(
            current,
            NodeState::Visited,
            format!("Done with {}", builder.label(current)),
            distance,
        );
    }

    Ok(builder.finish())
}

fn distance_of(distances: &HashMap<&str, u64>, id: &str) -> u64 {
    distances.get(id).copied().unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::fixtures;
    use crate::graph::{Edge, Node};

    fn summary(trace: &Trace) -> Vec<String> {
        trace
            .iter()
            .map(|s| match s.distance {
                Some(d) => format!("{}:{}@{d}", s.target_id, s.state),
                None => format!("{}:{}", s.target_id, s.state),
            })
            .collect()
    }

    #[test]
    fn abc_scenario_prefers_cheaper_detour() {
        let graph = fixtures::abc();
        let trace = dijkstra(&graph, "a", Some("c")).unwrap();
        assert_eq!(trace.goal_distance(), Some(6));
        assert_eq!(trace.path_nodes(), vec!["a", "b", "c"]);
        assert_eq!(trace.path_edges(), vec!["ab", "bc"]);
        assert_eq!(
            summary(&trace),
            vec![
                "a:start@0",
                "a:visiting@0",
                "ab:traversing@5",
                "ac:traversing@20",
                "a:visited@0",
                "b:visiting@5",
                "bc:traversing@6",
                "b:visited@5",
                "c:visiting@6",
                "c:end@6",
                "a:path@0",
                "ab:path@5",
                "b:path@5",
                "bc:path@6",
                "c:path@6",
            ]
        );
    }

    #[test]
    fn stale_frontier_entries_are_skipped() {
        let graph = fixtures::abc();
        let trace = dijkstra(&graph, "a", None).unwrap();
        // c was pushed twice (20, then 6) but is only visited once
        let visits = trace
            .iter()
            .filter(|s| s.target_id == "c" && s.is_node(NodeState::Visiting))
            .count();
        assert_eq!(visits, 1);
        assert!(!trace.reached_goal());
    }

    #[test]
    fn equal_distances_expand_in_frontier_order() {
        let graph = Graph::from_parts(
            vec![Node::new("s", "S"), Node::new("x", "X"), Node::new("y", "Y")],
            vec![Edge::new("sy", "s", "y", 2), Edge::new("sx", "s", "x", 2)],
        );
        let trace = dijkstra(&graph, "s", None).unwrap();
        let visiting: Vec<_> = trace
            .iter()
            .filter(|s| s.is_node(NodeState::Visiting))
            .map(|s| s.target_id.as_str())
            .collect();
        assert_eq!(visiting, vec!["s", "y", "x"]);
    }

    #[test]
    fn zero_weight_edges_are_handled() {
        let graph = Graph::from_parts(
            vec![Node::new("s", "S"), Node::new("t", "T")],
            vec![Edge::new("st", "s", "t", 0)],
        );
        let trace = dijkstra(&graph, "s", Some("t")).unwrap();
        assert_eq!(trace.goal_distance(), Some(0));
    }
}
