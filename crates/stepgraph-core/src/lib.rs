//! Stepgraph Trace Engine
//!
//! Turns a graph snapshot into a replayable, step-by-step trace of a classic
//! traversal or shortest-path algorithm.
//!
//! # Model
//!
//! - **Graph**: ordered nodes and directed, weighted edges supplied by an editor
//! - **Adjacency**: per-run outgoing lists, in edge insertion order
//! - **Step**: one element entering one state, with optional message and distance
//! - **Trace**: the ordered steps of one run
//!
//! # Determinism
//!
//! Given the same snapshot, start and end, every generator emits the same
//! trace. All tie-breaks follow edge insertion order or, for the weighted
//! searches, the order of entries in the frontier.
//!
//! # Usage
//!
//! ```
//! use stepgraph_core::{Algorithm, Edge, Graph, Node};
//!
//! let graph = Graph::from_parts(
//!     vec![Node::new("a", "A"), Node::new("b", "B")],
//!     vec![Edge::new("ab", "a", "b", 3)],
//! );
//! let trace = Algorithm::Dijkstra.generate(&graph, "a", Some("b")).unwrap();
//! assert_eq!(trace.goal_distance(), Some(3));
//! ```

mod adjacency;
mod algorithms;
mod error;
mod graph;
mod step;

pub use adjacency::{Adjacency, Neighbor};
pub use algorithms::{astar, bfs, dfs, dijkstra, Algorithm, UnknownAlgorithm};
pub use error::{Error, Result};
pub use graph::{next_auto_label, Edge, Graph, Node, Point};
pub use step::{EdgeState, ElementKind, ElementState, NodeState, Step, Trace};
