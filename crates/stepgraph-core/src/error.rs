//! Error types for stepgraph-core.

use thiserror::Error;

/// Result type for trace generation.
pub type Result<T> = std::result::Result<T, Error>;

/// Faults raised while generating a trace.
///
/// Unreachable goals and dangling edges are not errors: they produce a
/// normal (possibly short) trace.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A goal-directed algorithm was invoked without an end node.
    #[error("{algorithm} requires an end node")]
    MissingGoal {
        /// Display name of the algorithm that was invoked.
        algorithm: &'static str,
    },

    /// Walking the predecessor map never reached the start node.
    #[error("predecessor chain from {end} does not terminate at the start node")]
    PredecessorCycle {
        /// Node the walk started from.
        end: String,
    },
}
