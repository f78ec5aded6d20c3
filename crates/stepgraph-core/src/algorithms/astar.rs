//! A* search with a straight-line heuristic.

use std::collections::{HashMap, HashSet};

use super::frontier::Frontier;
use super::path::{mark_path, PathWording};
use super::TraceBuilder;
use crate::adjacency::Adjacency;
use crate::error::{Error, Result};
use crate::graph::{Graph, Point};
use crate::step::{EdgeState, NodeState, Trace};

/// Euclidean distance from each positioned node to the goal.
///
/// Nodes without a position, or any node when the goal has none, estimate 0,
/// which turns the search into plain Dijkstra for them.
struct Heuristic<'g> {
    positions: HashMap<&'g str, Point>,
    goal: Option<Point>,
}

impl<'g> Heuristic<'g> {
    fn new(graph: &'g Graph, goal: &str) -> Self {
        let positions: HashMap<&'g str, Point> = graph
            .nodes
            .iter()
            .filter_map(|n| n.position.map(|p| (n.id.as_str(), p)))
            .collect();
        let goal = positions.get(goal).copied();
        Self { positions, goal }
    }

    fn estimate(&self, id: &str) -> f64 {
        match (self.positions.get(id), self.goal) {
            (Some(from), Some(goal)) => from.euclidean(&goal),
            _ => 0.0,
        }
    }
}

/// A* from `start` to `end`.
///
/// The frontier is ordered by `f = g + h`; steps report `g` as their
/// distance. Calling without an end node is a caller bug and fails with
/// [`Error::MissingGoal`] before any step is produced.
pub fn astar(graph: &Graph, start: &str, end: Option<&str>) -> Result<Trace> {
    let Some(end) = end else {
        return Err(Error::MissingGoal { algorithm: "A*" });
    };

    let mut builder = TraceBuilder::new(graph);
    builder.node_at(
        start,
        NodeState::Start,
        format!("Starting A* from {}", builder.label(start)),
        0,
    );
    let Some(start) = graph.node(start).map(|n| n.id.as_str()) else {
        return Ok(builder.finish());
    };

    let heuristic = Heuristic::new(graph, end);
    let adjacency = Adjacency::build(graph);
    let mut g_score: HashMap<&str, u64> = HashMap::from([(start, 0)]);
    let mut f_score: HashMap<&str, f64> = HashMap::from([(start, heuristic.estimate(start))]);
    let mut predecessors: HashMap<&str, &str> = HashMap::new();
    let mut finalized: HashSet<&str> = HashSet::new();
    let mut frontier = Frontier::seeded(start);

    while let Some(current) =
        frontier.pop_min_by(|a, b| f_of(&f_score, a).total_cmp(&f_of(&f_score, b)))
    {
        if !finalized.insert(current) {
            continue;
        }
        let g = g_of(&g_score, current);
        let f = f_of(&f_score, current);

        builder.node_at(
            current,
            NodeState::Visiting,
            format!("Visiting {}, f={f:.1}, g={g}", builder.label(current)),
            g,
        );

        if current == end {
            builder.node_at(
                current,
                NodeState::End,
                format!("Target {} reached, distance: {g}", builder.label(current)),
                g,
            );
            mark_path(
                &mut builder,
                &predecessors,
                current,
                Some(&g_score),
                PathWording::Shortest,
            )?;
            break;
        }

        for neighbor in adjacency.neighbors(current) {
            if finalized.contains(neighbor.target) {
                continue;
            }
            let tentative = g.saturating_add(u64::from(neighbor.weight));
            if tentative >= g_of(&g_score, neighbor.target) {
                continue;
            }
            predecessors.insert(neighbor.target, current);
            g_score.insert(neighbor.target, tentative);
            f_score.insert(
                neighbor.target,
                tentative as f64 + heuristic.estimate(neighbor.target),
            );
            frontier.push(neighbor.target);
            builder.edge_at(
                neighbor.edge,
                EdgeState::Traversing,
                format!(
                    "Relaxing edge to {}, g={tentative}",
                    builder.label(neighbor.target)
                ),
                tentative,
            );
        }

        builder.node_at(
            current,
            NodeState::Visited,
            format!("Done with {}", builder.label(current)),
            g,
        );
    }

    Ok(builder.finish())
}

fn g_of(scores: &HashMap<&str, u64>, id: &str) -> u64 {
    scores.get(id).copied().unwrap_or(u64::MAX)
}

fn f_of(scores: &HashMap<&str, f64>, id: &str) -> f64 {
    scores.get(id).copied().unwrap_or(f64::INFINITY)
}
