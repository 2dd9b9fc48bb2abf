//! Rendering collaborator contract.
//!
//! The core never paints anything. It hands plain data to a [`RenderSink`]
//! and consumes nothing back: every call is fire-and-forget.

use crate::chart::ChartUpdate;
use crate::model::{Edge, TaskId};

/// Receives the output of a result cycle.
pub trait RenderSink {
    /// Drop every rendered edge. Called before `update_graph` when the
    /// session rebuilds the graph from scratch.
    fn clear_graph(&mut self) {}

    /// Apply an incremental edge update.
    fn update_graph(&mut self, to_remove: &[Edge], to_add: &[Edge]);

    /// Replace a task's bar-chart dataset.
    fn replace_data(&mut self, task: TaskId, update: &ChartUpdate);

    /// Show the backend's free-text log.
    fn show_output(&mut self, task: TaskId, output: &str) {
        let _ = (task, output);
    }
}

/// One call received by a [`RecordingSink`].
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    ClearGraph,
    UpdateGraph { to_remove: Vec<Edge>, to_add: Vec<Edge> },
    ReplaceData { task: TaskId, update: Box<ChartUpdate> },
    ShowOutput { task: TaskId, output: String },
}

/// Sink that keeps every call and mirrors the rendered edge list.
///
/// Useful headless, and as the reference for what a real renderer must do
/// with each call.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub calls: Vec<RenderCall>,
    /// Edges currently on screen.
    pub edges: Vec<Edge>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent chart update for `task`.
    pub fn last_chart(&self, task: TaskId) -> Option<&ChartUpdate> {
        self.calls.iter().rev().find_map(|c| match c {
            RenderCall::ReplaceData { task: t, update } if *t == task => Some(update.as_ref()),
            _ => None,
        })
    }

    pub fn last_output(&self, task: TaskId) -> Option<&str> {
        self.calls.iter().rev().find_map(|c| match c {
            RenderCall::ShowOutput { task: t, output } if *t == task => Some(output.as_str()),
            _ => None,
        })
    }
}

impl RenderSink for RecordingSink {
    fn clear_graph(&mut self) {
        self.edges.clear();
        self.calls.push(RenderCall::ClearGraph);
    }

    fn update_graph(&mut self, to_remove: &[Edge], to_add: &[Edge]) {
        let diff = crate::diff::GraphDiff {
            to_remove: to_remove.to_vec(),
            to_add: to_add.to_vec(),
        };
        diff.apply(&mut self.edges);
        self.calls.push(RenderCall::UpdateGraph { to_remove: diff.to_remove, to_add: diff.to_add });
    }

    fn replace_data(&mut self, task: TaskId, update: &ChartUpdate) {
        self.calls.push(RenderCall::ReplaceData { task, update: Box::new(update.clone()) });
    }

    fn show_output(&mut self, task: TaskId, output: &str) {
        self.calls.push(RenderCall::ShowOutput { task, output: output.to_owned() });
    }
}
