//! Trace records produced by the generators.
//!
//! A [`Step`] says "element X entered state S", optionally with a message and
//! a cumulative distance. The ordered [`Trace`] of steps is the single source
//! of truth for what happened when; visual state is always derived from it.

use std::fmt;
use std::ops::Deref;

/// Visual state of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum NodeState {
    /// Untouched by the run
    #[default]
    Default,
    /// Currently being expanded
    Visiting,
    /// Fully explored / finalized
    Visited,
    /// Start of the run
    Start,
    /// Goal reached
    End,
    /// On the reported path
    Path,
}

/// Visual state of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum EdgeState {
    /// Untouched by the run
    #[default]
    Default,
    /// Being explored or relaxed
    Traversing,
    /// Explored and backtracked over
    Traversed,
    /// On the reported path
    Path,
}

/// Whether a step targets a node or an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ElementKind {
    Node,
    Edge,
}

/// Kind and state of a step in one value, so a node step can only carry a
/// node state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "kind", content = "state", rename_all = "lowercase")
)]
pub enum ElementState {
    Node(NodeState),
    Edge(EdgeState),
}

impl ElementState {
    pub fn kind(&self) -> ElementKind {
        match self {
            ElementState::Node(_) => ElementKind::Node,
            ElementState::Edge(_) => ElementKind::Edge,
        }
    }
}

impl fmt::Display for ElementState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementState::Node(NodeState::Default) | ElementState::Edge(EdgeState::Default) => {
                "default"
            }
            ElementState::Node(NodeState::Visiting) => "visiting",
            ElementState::Node(NodeState::Visited) => "visited",
            ElementState::Node(NodeState::Start) => "start",
            ElementState::Node(NodeState::End) => "end",
            ElementState::Node(NodeState::Path) | ElementState::Edge(EdgeState::Path) => "path",
            ElementState::Edge(EdgeState::Traversing) => "traversing",
            ElementState::Edge(EdgeState::Traversed) => "traversed",
        };
        f.write_str(name)
    }
}

/// One immutable record of the trace.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Step {
    /// Node or edge id the step applies to
    pub target_id: String,
    /// Kind and new state of the target
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub state: ElementState,
    /// Human-readable narration
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub message: Option<String>,
    /// Cumulative path cost at this point, for weighted runs and path marking
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub distance: Option<u64>,
}

impl Step {
    /// A node step without message or distance.
    pub fn node(id: impl Into<String>, state: NodeState) -> Self {
        Self {
            target_id: id.into(),
            state: ElementState::Node(state),
            message: None,
            distance: None,
        }
    }

    /// An edge step without message or distance.
    pub fn edge(id: impl Into<String>, state: EdgeState) -> Self {
        Self {
            target_id: id.into(),
            state: ElementState::Edge(state),
            message: None,
            distance: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_distance(mut self, distance: u64) -> Self {
        self.distance = Some(distance);
        self
    }

    pub fn kind(&self) -> ElementKind {
        self.state.kind()
    }

    /// The node state, if this is a node step.
    pub fn node_state(&self) -> Option<NodeState> {
        match self.state {
            ElementState::Node(state) => Some(state),
            ElementState::Edge(_) => None,
        }
    }

    /// The edge state, if this is an edge step.
    pub fn edge_state(&self) -> Option<EdgeState> {
        match self.state {
            ElementState::Edge(state) => Some(state),
            ElementState::Node(_) => None,
        }
    }

    pub fn is_node(&self, state: NodeState) -> bool {
        self.node_state() == Some(state)
    }

    pub fn is_edge(&self, state: EdgeState) -> bool {
        self.edge_state() == Some(state)
    }
}

/// The full ordered output of one algorithm run.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Trace(Vec<Step>);

impl Trace {
    pub fn new(steps: Vec<Step>) -> Self {
        Self(steps)
    }

    pub fn into_steps(self) -> Vec<Step> {
        self.0
    }

    /// The `end` step, present only when the goal was reached.
    pub fn end_step(&self) -> Option<&Step> {
        self.0.iter().find(|s| s.is_node(NodeState::End))
    }

    pub fn reached_goal(&self) -> bool {
        self.end_step().is_some()
    }

    /// Distance carried by the `end` step.
    pub fn goal_distance(&self) -> Option<u64> {
        self.end_step().and_then(|s| s.distance)
    }

    /// Node ids marked `path`, in emission order.
    pub fn path_nodes(&self) -> Vec<&str> {
        self.0
            .iter()
            .filter(|s| s.is_node(NodeState::Path))
            .map(|s| s.target_id.as_str())
            .collect()
    }

    /// Edge ids marked `path`, in emission order.
    pub fn path_edges(&self) -> Vec<&str> {
        self.0
            .iter()
            .filter(|s| s.is_edge(EdgeState::Path))
            .map(|s| s.target_id.as_str())
            .collect()
    }
}

impl Deref for Trace {
    type Target = [Step];

    fn deref(&self) -> &[Step] {
        &self.0
    }
}

impl From<Vec<Step>> for Trace {
    fn from(steps: Vec<Step>) -> Self {
        Self(steps)
    }
}

impl IntoIterator for Trace {
    type Item = Step;
    type IntoIter = std::vec::IntoIter<Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Trace {
    type Item = &'a Step;
    type IntoIter = std::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_follows_state() {
        assert_eq!(Step::node("a", NodeState::Start).kind(), ElementKind::Node);
        assert_eq!(Step::edge("e", EdgeState::Path).kind(), ElementKind::Edge);
    }

    #[test]
    fn state_accessors_are_exclusive() {
        let step = Step::edge("e", EdgeState::Traversing);
        assert_eq!(step.edge_state(), Some(EdgeState::Traversing));
        assert_eq!(step.node_state(), None);
        assert!(!step.is_node(NodeState::Default));
    }

    #[test]
    fn trace_summaries() {
        let trace = Trace::new(vec![
            Step::node("a", NodeState::Start),
            Step::node("b", NodeState::End).with_distance(7),
            Step::node("a", NodeState::Path),
            Step::edge("ab", EdgeState::Path),
            Step::node("b", NodeState::Path),
        ]);
        assert!(trace.reached_goal());
        assert_eq!(trace.goal_distance(), Some(7));
        assert_eq!(trace.path_nodes(), vec!["a", "b"]);
        assert_eq!(trace.path_edges(), vec!["ab"]);
    }

    #[test]
    fn no_end_step_means_goal_not_reached() {
        let trace = Trace::new(vec![Step::node("a", NodeState::Start)]);
        assert!(!trace.reached_goal());
        assert_eq!(trace.goal_distance(), None);
    }

    #[test]
    fn display_names() {
        assert_eq!(ElementState::Node(NodeState::Visiting).to_string(), "visiting");
        assert_eq!(ElementState::Edge(EdgeState::Traversed).to_string(), "traversed");
    }
}
