//! # Graph Diff Engine
//!
//! Computes the minimal edge add/remove set between the previously rendered
//! graph and a freshly built one, so the renderer can update in place.
//!
//! Edges are compared by content, `(source, target, labels)`, never by
//! identity. The retained [`GraphState`] is replaced wholesale by the new
//! edge list once the diff has been produced.

use chrono::{DateTime, Utc};
use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::Edge;
use crate::reconcile::partition;

/// How a cycle relates the new edge set to the retained one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffPolicy {
    /// Diff against the retained state.
    #[default]
    Incremental,
    /// Renderer clears the graph first; every new edge is an add.
    ClearAndRebuild,
}

/// Edge changes for the renderer.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct GraphDiff {
    pub to_remove: Vec<Edge>,
    pub to_add: Vec<Edge>,
}

impl GraphDiff {
    pub fn is_empty(&self) -> bool {
        self.to_remove.is_empty() && self.to_add.is_empty()
    }

    /// Apply this diff to a rendered edge list in place.
    pub fn apply(&self, edges: &mut Vec<Edge>) {
        let removed: HashSet<_> = self.to_remove.iter().map(Edge::key).collect();
        edges.retain(|e| !removed.contains(&e.key()));
        edges.extend(self.to_add.iter().cloned());
    }
}

/// Symmetric difference of two edge lists by content key.
///
/// `to_remove` holds old edges with no equal new edge, `to_add` new edges with
/// no equal old edge; both keep the order of their source list.
pub fn diff(old: &[Edge], new: &[Edge]) -> GraphDiff {
    let split = partition(old, new, Edge::key);
    GraphDiff { to_remove: split.exit, to_add: split.enter }
}

/// Edge set of the previous cycle.
#[derive(Debug, Clone, Default)]
pub struct GraphState {
    edges: Vec<Edge>,
    updated_at: Option<DateTime<Utc>>,
}

impl GraphState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// When the state was last replaced, `None` before the first cycle.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Diff `new` against the retained edges under `policy`, then retain `new`.
    pub fn advance(&mut self, new: Vec<Edge>, policy: DiffPolicy) -> GraphDiff {
        let result = match policy {
            DiffPolicy::Incremental => diff(&self.edges, &new),
            DiffPolicy::ClearAndRebuild => diff(&[], &new),
        };
        debug!(
            ?policy,
            previous = self.edges.len(),
            next = new.len(),
            removed = result.to_remove.len(),
            added = result.to_add.len(),
            "graph diff"
        );
        self.edges = new;
        self.updated_at = Some(Utc::now());
        result
    }

    pub fn clear(&mut self) {
        self.edges.clear();
        self.updated_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(src: &str, dst: &str, label: &str) -> Edge {
        Edge::new(src.into(), dst.into(), label)
    }

    #[test]
    fn test_diff_from_empty() {
        let new = vec![edge("A(x)", "B(x)", "f1"), edge("B(x)", "C(x)", "f2")];
        let d = diff(&[], &new);
        assert!(d.to_remove.is_empty());
        assert_eq!(d.to_add, new);
    }

    #[test]
    fn test_diff_no_change() {
        let edges = vec![edge("A(x)", "B(x)", "f1")];
        assert!(diff(&edges, &edges).is_empty());
    }

    #[test]
    fn test_diff_label_change_is_remove_plus_add() {
        let old = vec![edge("A(x)", "B(x)", "f1")];
        let new = vec![edge("A(x)", "B(x)", "f2")];
        let d = diff(&old, &new);
        assert_eq!(d.to_remove, old);
        assert_eq!(d.to_add, new);
    }

    #[test]
    fn test_diff_direction_matters() {
        let old = vec![edge("A(x)", "B(x)", "f")];
        let new = vec![edge("B(x)", "A(x)", "f")];
        let d = diff(&old, &new);
        assert_eq!(d.to_remove.len(), 1);
        assert_eq!(d.to_add.len(), 1);
    }

    #[test]
    fn test_apply_round_trip() {
        let old = vec![edge("A(x)", "B(x)", "f1"), edge("B(x)", "C(x)", "f1")];
        let new = vec![edge("B(x)", "C(x)", "f1"), edge("C(x)", "D(x)", "f3")];
        let mut rendered = old.clone();
        diff(&old, &new).apply(&mut rendered);
        assert_eq!(rendered, new);
    }

    #[test]
    fn test_state_advance_replaces_edges() {
        let mut state = GraphState::new();
        assert!(state.updated_at().is_none());

        let first = vec![edge("A(x)", "B(x)", "f1")];
        let d = state.advance(first.clone(), DiffPolicy::Incremental);
        assert_eq!(d.to_add, first);
        assert_eq!(state.edges(), first.as_slice());
        assert!(state.updated_at().is_some());

        let d = state.advance(first.clone(), DiffPolicy::Incremental);
        assert!(d.is_empty());

        let d = state.advance(first.clone(), DiffPolicy::ClearAndRebuild);
        assert!(d.to_remove.is_empty());
        assert_eq!(d.to_add, first);
    }
}
