//! Error types for stepgraph-vis.

use stepgraph_core::Algorithm;
use thiserror::Error;

/// Result type for visualization operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Reasons a run request produced no trace.
///
/// The `Display` text is what the session shows as its status message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunError {
    #[error("Please select an algorithm")]
    NoAlgorithm,

    #[error("Please select a start node")]
    NoStartNode,

    /// Goal-directed algorithm without an end node
    #[error("{} requires a start and an end node", .algorithm.name())]
    MissingEndNode { algorithm: Algorithm },

    /// Generator fault; details go to the log, not the user
    #[error("Error while running the algorithm")]
    Generation(#[from] stepgraph_core::Error),
}

/// Reasons a graph edit was refused.
///
/// The `Display` text is what the session shows as its status message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("Edge {edge} needs a positive integer weight")]
    ZeroWeight { edge: String },

    #[error("Edge endpoint {node} does not exist")]
    UnknownNode { node: String },

    #[error("Node id {id} is already in use")]
    DuplicateNode { id: String },

    #[error("Edge id {id} is already in use")]
    DuplicateEdge { id: String },
}

/// Errors that can occur while serving a session.
#[derive(Debug, Error)]
pub enum Error {
    /// Run request rejected
    #[error(transparent)]
    Run(#[from] RunError),

    /// Graph edit rejected
    #[error(transparent)]
    Edit(#[from] EditError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
