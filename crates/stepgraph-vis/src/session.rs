//! One editing and playback session.
//!
//! Owns the graph being edited, the last run and its playback, plus the
//! single status line shown to the user. Every user action goes through
//! here, so the status line always describes the latest one.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use stepgraph_core::{next_auto_label, Algorithm, Edge, Graph, Node, Step, Trace};

use crate::error::{EditError, RunError};
use crate::playback::{Playback, PlaybackState, PlaybackStatus, TickOutcome};
use crate::render::RenderState;

pub const WELCOME_MESSAGE: &str = "Welcome! Click \"Add node\" to get started.";
pub const FINISHED_MESSAGE: &str = "Algorithm finished";

/// Algorithm, start and end selection for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRequest {
    #[serde(default)]
    pub algorithm: Option<Algorithm>,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
}

impl RunRequest {
    /// Check the run preconditions without touching any state.
    pub fn validate(&self) -> Result<(Algorithm, &str, Option<&str>), RunError> {
        let algorithm = self.algorithm.ok_or(RunError::NoAlgorithm)?;
        let start = self.start.as_deref().ok_or(RunError::NoStartNode)?;
        let end = self.end.as_deref();
        if algorithm.requires_goal() && end.is_none() {
            return Err(RunError::MissingEndNode { algorithm });
        }
        Ok((algorithm, start, end))
    }
}

/// Check a whole graph before it replaces the edited one.
///
/// Ids must be unique and weights positive. Dangling edges are tolerated;
/// the generators skip them.
pub fn validate_graph(graph: &Graph) -> Result<(), EditError> {
    let mut nodes = HashSet::new();
    for node in &graph.nodes {
        if !nodes.insert(node.id.as_str()) {
            return Err(EditError::DuplicateNode { id: node.id.clone() });
        }
    }
    let mut edges = HashSet::new();
    for edge in &graph.edges {
        if !edges.insert(edge.id.as_str()) {
            return Err(EditError::DuplicateEdge { id: edge.id.clone() });
        }
        if edge.weight == 0 {
            return Err(EditError::ZeroWeight { edge: edge.id.clone() });
        }
    }
    Ok(())
}

/// A completed generation.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub algorithm: Algorithm,
    pub start: String,
    pub end: Option<String>,
    pub trace: Arc<Trace>,
}

/// Observable view of a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionStatus {
    #[serde(flatten)]
    pub playback: PlaybackStatus,
    pub message: String,
    pub algorithm: Option<Algorithm>,
    pub start: Option<String>,
    pub end: Option<String>,
    /// Distance carried by the step under the cursor
    pub distance: Option<u64>,
    /// Set once playback has finished
    pub goal_reached: Option<bool>,
    pub node_count: usize,
    pub edge_count: usize,
}

#[derive(Debug)]
pub struct Session {
    graph: Graph,
    node_counter: usize,
    selection: RunRequest,
    run: Option<RunResult>,
    playback: Playback,
    render: RenderState,
    message: String,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            graph: Graph::new(),
            node_counter: 0,
            selection: RunRequest::default(),
            run: None,
            playback: Playback::new(),
            render: RenderState::default(),
            message: WELCOME_MESSAGE.to_string(),
        }
    }

    /// Create a session around an existing graph.
    pub fn with_graph(graph: Graph) -> Self {
        let mut session = Self::new();
        session.node_counter = graph.node_count();
        session.graph = graph;
        session
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn selection(&self) -> &RunRequest {
        &self.selection
    }

    pub fn last_run(&self) -> Option<&RunResult> {
        self.run.as_ref()
    }

    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    pub fn trace(&self) -> &Arc<Trace> {
        self.playback.trace()
    }

    pub fn render(&self) -> &RenderState {
        &self.render
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Replace the whole graph. Any trace is dropped.
    ///
    /// A graph that fails [`validate_graph`] is refused and nothing changes
    /// but the status message.
    pub fn load_graph(&mut self, graph: Graph) -> Result<(), EditError> {
        if let Err(err) = validate_graph(&graph) {
            self.message = err.to_string();
            return Err(err);
        }
        for slot in [&mut self.selection.start, &mut self.selection.end] {
            if slot.as_deref().is_some_and(|id| !graph.contains_node(id)) {
                *slot = None;
            }
        }
        self.message = format!(
            "Graph loaded: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        self.node_counter = graph.node_count();
        self.graph = graph;
        self.discard_trace();
        tracing::info!(
            nodes = self.graph.node_count(),
            edges = self.graph.edge_count(),
            "graph loaded"
        );
        Ok(())
    }

    /// Add a node with the next automatic label and return its id.
    pub fn add_node(&mut self, x: f64, y: f64) -> String {
        let label = next_auto_label(self.node_counter);
        let mut id = format!("node-{}", self.node_counter);
        while self.graph.contains_node(&id) {
            self.node_counter += 1;
            id = format!("node-{}", self.node_counter);
        }
        self.node_counter += 1;
        self.message = format!("Node {label} added");
        self.graph.add_node(Node::new(id.clone(), label).at(x, y));
        id
    }

    /// Connect two existing nodes with a positively weighted edge.
    pub fn add_edge(&mut self, edge: Edge) -> Result<(), EditError> {
        if let Err(err) = self.check_edge(&edge) {
            self.message = err.to_string();
            return Err(err);
        }
        self.message = format!("Edge added with weight {}", edge.weight);
        self.graph.add_edge(edge);
        Ok(())
    }

    fn check_edge(&self, edge: &Edge) -> Result<(), EditError> {
        if edge.weight == 0 {
            return Err(EditError::ZeroWeight {
                edge: edge.id.clone(),
            });
        }
        if self.graph.edges.iter().any(|e| e.id == edge.id) {
            return Err(EditError::DuplicateEdge {
                id: edge.id.clone(),
            });
        }
        for endpoint in [&edge.source, &edge.target] {
            if !self.graph.contains_node(endpoint) {
                return Err(EditError::UnknownNode {
                    node: endpoint.clone(),
                });
            }
        }
        Ok(())
    }

    /// Remove a node and its edges. Clears it from the selection.
    pub fn remove_node(&mut self, id: &str) -> bool {
        if !self.graph.remove_node(id) {
            return false;
        }
        for slot in [&mut self.selection.start, &mut self.selection.end] {
            if slot.as_deref() == Some(id) {
                *slot = None;
            }
        }
        self.message = "Node removed".to_string();
        true
    }

    pub fn remove_edge(&mut self, id: &str) -> bool {
        if !self.graph.remove_edge(id) {
            return false;
        }
        self.message = "Edge removed".to_string();
        true
    }

    /// Choose the algorithm. The current trace no longer matches and is dropped.
    pub fn select_algorithm(&mut self, algorithm: Option<Algorithm>) {
        self.selection.algorithm = algorithm;
        self.discard_trace();
        self.message = match algorithm {
            Some(algorithm) => format!("Algorithm: {}", algorithm.name()),
            None => "No algorithm selected".to_string(),
        };
    }

    pub fn set_start(&mut self, id: Option<String>) {
        self.message = match &id {
            Some(id) => format!("Start node: {}", self.graph.label_of(id)),
            None => "Start node cleared".to_string(),
        };
        self.selection.start = id;
    }

    pub fn set_end(&mut self, id: Option<String>) {
        self.message = match &id {
            Some(id) => format!("End node: {}", self.graph.label_of(id)),
            None => "End node cleared".to_string(),
        };
        self.selection.end = id;
    }

    /// Select and run in one go.
    pub fn run(&mut self, request: RunRequest) -> Result<usize, RunError> {
        self.selection = request;
        self.run_selected()
    }

    /// Generate a trace for the current selection and load it for playback.
    ///
    /// Returns the number of steps. On a rejected precondition the previous
    /// trace is left alone; on a generator fault it is discarded.
    pub fn run_selected(&mut self) -> Result<usize, RunError> {
        let outcome = self.generate();
        self.message = match &outcome {
            Ok(count) => format!("Algorithm computed: {count} steps"),
            Err(err) => err.to_string(),
        };
        outcome
    }

    fn generate(&mut self) -> Result<usize, RunError> {
        let (algorithm, start, end) = self.selection.validate()?;
        let (start, end) = (start.to_owned(), end.map(str::to_owned));

        let trace = match algorithm.generate(&self.graph, &start, end.as_deref()) {
            Ok(trace) => Arc::new(trace),
            Err(err) => {
                tracing::warn!(algorithm = algorithm.name(), error = %err, "generation failed");
                self.discard_trace();
                return Err(err.into());
            }
        };

        let count = trace.len();
        tracing::info!(algorithm = algorithm.name(), steps = count, "trace ready");
        self.playback.load_steps(Arc::clone(&trace));
        self.render = RenderState::default();
        self.run = Some(RunResult {
            algorithm,
            start,
            end,
            trace,
        });
        Ok(count)
    }

    /// Load a trace recorded elsewhere for playback.
    pub fn load_trace(&mut self, trace: Trace) {
        self.message = format!("Trace loaded: {} steps", trace.len());
        self.run = None;
        self.playback.load_steps(trace);
        self.render = RenderState::default();
    }

    /// Start automatic playback. Returns `true` if it started.
    pub fn play(&mut self) -> bool {
        let started = self.playback.play();
        if started {
            self.message = "Playing algorithm...".to_string();
            tracing::info!(from = ?self.playback.current_step_index(), "playback started");
        }
        started
    }

    pub fn pause(&mut self) {
        self.playback.pause();
        self.message = "Paused".to_string();
    }

    /// Rewind before the first step, keeping the trace.
    pub fn reset(&mut self) {
        self.playback.reset();
        self.sync_render();
        self.message = "Visualization reset".to_string();
    }

    pub fn set_speed(&mut self, ms: u64) {
        self.playback.set_speed(ms);
    }

    /// Set the speed restored by [`Session::clear`], and apply it now.
    pub fn set_default_speed(&mut self, ms: u64) {
        self.playback.set_default_speed(ms);
    }

    /// Apply a scheduled advance issued under `generation`.
    pub fn tick(&mut self, generation: u64) -> TickOutcome {
        let outcome = self.playback.tick(generation);
        tracing::debug!(generation, ?outcome, "tick");
        self.after_advance(outcome);
        outcome
    }

    pub fn step_forward(&mut self) -> TickOutcome {
        let outcome = self.playback.step_forward();
        self.after_advance(outcome);
        outcome
    }

    pub fn step_backward(&mut self) -> Option<usize> {
        let cursor = self.playback.step_backward();
        self.after_jump();
        cursor
    }

    pub fn seek(&mut self, index: Option<usize>) -> Option<usize> {
        let cursor = self.playback.seek(index);
        self.after_jump();
        cursor
    }

    /// Drop everything and start over with an empty graph.
    pub fn clear(&mut self) {
        self.graph = Graph::new();
        self.node_counter = 0;
        self.selection = RunRequest::default();
        self.run = None;
        self.playback.clear();
        self.render = RenderState::default();
        self.message = "Graph cleared".to_string();
    }

    pub fn status(&self) -> SessionStatus {
        let finished = self.playback.state() == PlaybackState::Finished;
        SessionStatus {
            playback: PlaybackStatus::from(&self.playback),
            message: self.message.clone(),
            algorithm: self.selection.algorithm,
            start: self.selection.start.clone(),
            end: self.selection.end.clone(),
            distance: self.playback.current_step().and_then(|s| s.distance),
            goal_reached: finished.then(|| self.playback.trace().reached_goal()),
            node_count: self.graph.node_count(),
            edge_count: self.graph.edge_count(),
        }
    }

    fn after_advance(&mut self, outcome: TickOutcome) {
        match outcome {
            TickOutcome::Advanced(index) => {
                self.sync_render();
                if let Some(step) = self.playback.current_step() {
                    self.message = describe(step, index, self.playback.total_steps());
                }
            }
            TickOutcome::Finished => {
                self.sync_render();
                self.message = FINISHED_MESSAGE.to_string();
                tracing::info!(
                    reached_goal = self.playback.trace().reached_goal(),
                    "playback finished"
                );
            }
            TickOutcome::Stale | TickOutcome::NotPlaying => {}
        }
    }

    fn after_jump(&mut self) {
        self.sync_render();
        self.message = match (self.playback.current_step_index(), self.playback.current_step()) {
            (Some(index), Some(step)) => describe(step, index, self.playback.total_steps()),
            _ => "Before the first step".to_string(),
        };
    }

    fn sync_render(&mut self) {
        self.render
            .move_to(self.playback.trace(), self.playback.current_step_index());
    }

    fn discard_trace(&mut self) {
        self.run = None;
        self.playback.load_steps(Trace::default());
        self.render = RenderState::default();
    }
}

fn describe(step: &Step, index: usize, total: usize) -> String {
    step.message
        .clone()
        .unwrap_or_else(|| format!("Step {}/{}", index + 1, total))
}
