//! Step generators.
//!
//! Every algorithm is a plain function with the same shape,
//! `(graph, start, end) -> Result<Trace>`, selected through [`Algorithm`].
//! Generation is eager and synchronous: the whole trace exists before any
//! playback starts.
//!
//! A start id that is not in the snapshot yields a trace holding only the
//! `start` step.

mod astar;
mod bfs;
mod dfs;
mod dijkstra;
mod frontier;
mod path;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::Result;
use crate::graph::Graph;
use crate::step::{EdgeState, NodeState, Step, Trace};

pub use astar::astar;
pub use bfs::bfs;
pub use dfs::dfs;
pub use dijkstra::dijkstra;

/// The four supported algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Algorithm {
    /// Breadth-first search
    Bfs,
    /// Depth-first search
    Dfs,
    /// Dijkstra's shortest path
    Dijkstra,
    /// A* with a Euclidean heuristic
    #[cfg_attr(feature = "serde", serde(rename = "astar"))]
    AStar,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Bfs,
        Algorithm::Dfs,
        Algorithm::Dijkstra,
        Algorithm::AStar,
    ];

    /// Display name used in messages.
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Bfs => "BFS",
            Algorithm::Dfs => "DFS",
            Algorithm::Dijkstra => "Dijkstra",
            Algorithm::AStar => "A*",
        }
    }

    /// Whether the algorithm cannot run without an end node.
    pub fn requires_goal(&self) -> bool {
        matches!(self, Algorithm::AStar)
    }

    /// Whether steps carry distances.
    pub fn is_weighted(&self) -> bool {
        matches!(self, Algorithm::Dijkstra | Algorithm::AStar)
    }

    /// Run the algorithm to completion and return its trace.
    pub fn generate(&self, graph: &Graph, start: &str, end: Option<&str>) -> Result<Trace> {
        let trace = match self {
            Algorithm::Bfs => bfs(graph, start, end),
            Algorithm::Dfs => dfs(graph, start, end),
            Algorithm::Dijkstra => dijkstra(graph, start, end),
            Algorithm::AStar => astar(graph, start, end),
        }?;
        tracing::debug!(
            algorithm = self.name(),
            start,
            end = end.unwrap_or("-"),
            steps = trace.len(),
            reached_goal = trace.reached_goal(),
            "generated trace"
        );
        Ok(trace)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown algorithm tag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown algorithm: {0}")]
pub struct UnknownAlgorithm(pub String);

impl FromStr for Algorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bfs" => Ok(Algorithm::Bfs),
            "dfs" => Ok(Algorithm::Dfs),
            "dijkstra" => Ok(Algorithm::Dijkstra),
            "astar" | "a*" => Ok(Algorithm::AStar),
            _ => Err(UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Accumulates steps for one run and resolves labels for messages.
pub(crate) struct TraceBuilder<'g> {
    graph: &'g Graph,
    labels: HashMap<&'g str, &'g str>,
    steps: Vec<Step>,
}

impl<'g> TraceBuilder<'g> {
    pub(crate) fn new(graph: &'g Graph) -> Self {
        let labels = graph
            .nodes
            .iter()
            .map(|n| (n.id.as_str(), n.label.as_str()))
            .collect();
        Self {
            graph,
            labels,
            steps: Vec::new(),
        }
    }

    pub(crate) fn graph(&self) -> &'g Graph {
        self.graph
    }

    pub(crate) fn label<'a>(&'a self, id: &'a str) -> &'a str {
        self.labels.get(id).copied().unwrap_or(id)
    }

    pub(crate) fn node(&mut self, id: &str, state: NodeState, message: String) {
        self.steps.push(Step::node(id, state).with_message(message));
    }

    pub(crate) fn node_at(&mut self, id: &str, state: NodeState, message: String, distance: u64) {
        self.steps
            .push(Step::node(id, state).with_message(message).with_distance(distance));
    }

    pub(crate) fn edge(&mut self, id: &str, state: EdgeState, message: String) {
        self.steps.push(Step::edge(id, state).with_message(message));
    }

    pub(crate) fn edge_at(&mut self, id: &str, state: EdgeState, message: String, distance: u64) {
        self.steps
            .push(Step::edge(id, state).with_message(message).with_distance(distance));
    }

    pub(crate) fn finish(self) -> Trace {
        Trace::new(self.steps)
    }
}
