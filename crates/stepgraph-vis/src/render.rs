//! Visual state derived from a trace prefix.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use stepgraph_core::{EdgeState, ElementKind, ElementState, NodeState, Step};

/// State of every touched node and edge after applying steps `0..=cursor`.
///
/// Elements never touched by the prefix are absent and render as default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderState {
    pub cursor: Option<usize>,
    pub nodes: BTreeMap<String, NodeState>,
    pub edges: BTreeMap<String, EdgeState>,
}

impl RenderState {
    /// Rebuild from scratch by replaying the prefix up to `cursor`.
    pub fn from_steps(steps: &[Step], cursor: Option<usize>) -> Self {
        let mut state = Self::default();
        if let Some(cursor) = cursor {
            for (index, step) in steps.iter().enumerate().take(cursor.saturating_add(1)) {
                state.apply(index, step);
            }
        }
        state.cursor = cursor;
        state
    }

    /// Latest state assigned to one element by the prefix up to `cursor`,
    /// found by scanning backward.
    pub fn lookup(
        steps: &[Step],
        cursor: Option<usize>,
        kind: ElementKind,
        id: &str,
    ) -> Option<ElementState> {
        let end = cursor.map_or(0, |c| c.saturating_add(1).min(steps.len()));
        steps[..end]
            .iter()
            .rev()
            .find(|s| s.kind() == kind && s.target_id == id)
            .map(|s| s.state)
    }

    /// Apply step `index` on top of the state at `index - 1`.
    pub fn apply(&mut self, index: usize, step: &Step) {
        match step.state {
            ElementState::Node(state) => {
                self.nodes.insert(step.target_id.clone(), state);
            }
            ElementState::Edge(state) => {
                self.edges.insert(step.target_id.clone(), state);
            }
        }
        self.cursor = Some(index);
    }

    /// Move to `cursor`, applying one step when moving forward by one and
    /// rebuilding otherwise.
    pub fn move_to(&mut self, steps: &[Step], cursor: Option<usize>) {
        if cursor == self.cursor {
            return;
        }
        let next = self.cursor.map_or(0, |c| c.saturating_add(1));
        match (cursor, steps.get(next)) {
            (Some(target), Some(step)) if target == next => self.apply(next, step),
            _ => *self = Self::from_steps(steps, cursor),
        }
    }

    pub fn node_state(&self, id: &str) -> NodeState {
        self.nodes.get(id).copied().unwrap_or_default()
    }

    pub fn edge_state(&self, id: &str) -> EdgeState {
        self.edges.get(id).copied().unwrap_or_default()
    }
}
