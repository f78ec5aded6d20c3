//! Stepgraph Playback
//!
//! Step-by-step replay of algorithm traces with time-travel controls.
//!
//! # Architecture
//!
//! - **Playback**: cursor over a trace, with play/pause/step/seek and speed
//! - **Render**: node and edge states derived from the trace prefix
//! - **Session**: graph, selection, last run and status message
//! - **Driver**: timer task that advances a shared session
//! - **REST API / WebSocket**: control playback, stream status
//!
//! # Usage
//!
//! ```ignore
//! let mut session = Session::with_graph(graph);
//! session.run(RunRequest { algorithm: Some(Algorithm::Dijkstra), .. })?;
//!
//! let server = VisServer::new(session);
//! server.serve(&VisConfig::default()).await?;
//! ```

mod config;
mod driver;
mod error;
mod playback;
mod render;
mod server;
mod session;

pub use config::VisConfig;
pub use driver::PlaybackDriver;
pub use error::{EditError, Error, Result, RunError};
pub use playback::{
    Playback, PlaybackState, PlaybackStatus, TickOutcome, DEFAULT_SPEED_MS, MAX_SPEED_MS,
    MIN_SPEED_MS,
};
pub use render::RenderState;
pub use server::VisServer;
pub use session::{validate_graph, RunRequest, RunResult, Session, SessionStatus};
