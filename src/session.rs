//! Result-cycle controller.
//!
//! A [`Session`] exclusively owns everything that survives between cycles:
//! the retained [`GraphState`] and one chart pane per [`TaskId`]. A cycle
//! runs to completion before the session hands anything to the renderer.
//!
//! ## Limitations
//!
//! - **One cycle at a time**: state is locked per stage, not per cycle. Two
//!   cycles running concurrently would interleave their graph updates.
//! - **Advisory busy flag**: [`Session::begin_request`] only records that a
//!   request is outstanding. Nothing stops a second request, and the first
//!   of two overlapping guards to drop clears the flag.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use hashbrown::{HashMap, HashSet};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::canonical::canonicalize;
use crate::chart::{reconcile_bars, ChartConfig, ChartLayout};
use crate::diff::{DiffPolicy, GraphState};
use crate::graph::FormulaGraphBuilder;
use crate::model::{AtomMatch, Edge, EdgeStyle, TaskId};
use crate::render::RenderSink;
use crate::response::BackendResponse;
use crate::source::ResultSource;
use crate::Result;

// ============================================================================
// Configuration
// ============================================================================

/// Everything a session needs to know up front.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub chart: ChartConfig,
    pub matching: AtomMatch,
    pub diff_policy: DiffPolicy,
    pub edge_style: EdgeStyle,
}

// ============================================================================
// Cycle report
// ============================================================================

/// What one cycle did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleReport {
    pub task: TaskId,
    /// 1-based cycle counter across all tasks.
    pub cycle: u64,
    pub atoms: usize,
    pub duplicates: usize,
    pub formulas: usize,
    pub formulas_skipped: usize,
    pub edges: usize,
    pub edges_removed: usize,
    pub edges_added: usize,
    pub bars_entered: usize,
    pub bars_updated: usize,
    pub bars_exited: usize,
    pub completed_at: DateTime<Utc>,
}

// ============================================================================
// Session
// ============================================================================

/// Owner of the retained graph and chart state.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    config: SessionConfig,
    graph: Mutex<GraphState>,
    panes: Mutex<HashMap<TaskId, ChartPane>>,
    busy: Mutex<HashSet<TaskId>>,
    cycles: AtomicU64,
}

/// Chart state for one task.
#[derive(Debug, Clone)]
struct ChartPane {
    width: f64,
    layout: Option<ChartLayout>,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                config,
                graph: Mutex::new(GraphState::new()),
                panes: Mutex::new(HashMap::new()),
                busy: Mutex::new(HashSet::new()),
                cycles: AtomicU64::new(0),
            }),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    // ========================================================================
    // Busy flag
    // ========================================================================

    /// Mark `task` as having a request outstanding until the guard drops.
    pub fn begin_request(&self, task: TaskId) -> RequestGuard<'_> {
        if !self.inner.busy.lock().insert(task) {
            warn!(%task, "request started while another is outstanding");
        }
        RequestGuard { inner: &self.inner, task }
    }

    pub fn is_busy(&self, task: TaskId) -> bool {
        self.inner.busy.lock().contains(&task)
    }

    // ========================================================================
    // Cycles
    // ========================================================================

    /// Fetch one result from `source` and process it, busy flag held meanwhile.
    pub async fn run<S, R>(&self, source: &S, task: TaskId, sink: &mut R) -> Result<CycleReport>
    where
        S: ResultSource + ?Sized,
        R: RenderSink + ?Sized,
    {
        let _guard = self.begin_request(task);
        let response = source.fetch(task).await?;
        self.process(task, &response, sink)
    }

    /// Run every stage over one backend response and push the results to `sink`.
    ///
    /// Fails only when the probability arrays cannot be zipped; in that case
    /// no state changes and the sink is not called.
    pub fn process<R>(&self, task: TaskId, response: &BackendResponse, sink: &mut R) -> Result<CycleReport>
    where
        R: RenderSink + ?Sized,
    {
        let config = &self.inner.config;
        let probabilities = response.probabilities()?;

        let atoms = canonicalize(&response.atoms);
        let (edges, build) = FormulaGraphBuilder::new(&atoms)
            .with_matching(config.matching)
            .with_style(config.edge_style)
            .build_with_stats(&response.formulas);

        let edge_count = edges.len();
        let graph_diff = self.inner.graph.lock().advance(edges, config.diff_policy);

        let chart = {
            let mut panes = self.inner.panes.lock();
            let pane = panes.entry(task).or_insert_with(|| ChartPane::new(&config.chart));
            let next = ChartLayout::from_map(probabilities, pane.width, &config.chart);
            let update = reconcile_bars(pane.layout.as_ref(), next);
            pane.layout = Some(update.layout.clone());
            update
        };

        if config.diff_policy == DiffPolicy::ClearAndRebuild {
            sink.clear_graph();
        }
        sink.update_graph(&graph_diff.to_remove, &graph_diff.to_add);
        sink.replace_data(task, &chart);
        sink.show_output(task, &response.output);

        let report = CycleReport {
            task,
            cycle: self.inner.cycles.fetch_add(1, Ordering::Relaxed) + 1,
            atoms: atoms.len(),
            duplicates: atoms.duplicates.len(),
            formulas: build.formulas,
            formulas_skipped: build.skipped,
            edges: edge_count,
            edges_removed: graph_diff.to_remove.len(),
            edges_added: graph_diff.to_add.len(),
            bars_entered: chart.bars.enter.len(),
            bars_updated: chart.bars.update.len(),
            bars_exited: chart.bars.exit.len(),
            completed_at: Utc::now(),
        };
        debug!(%task, cycle = report.cycle, edges = report.edges, "result cycle complete");
        Ok(report)
    }

    // ========================================================================
    // Charts
    // ========================================================================

    /// Container for `task` changed size.
    ///
    /// Re-lays out the retained data without re-sorting and pushes the update
    /// to `sink`. Returns `false` if the task has not rendered a chart yet.
    pub fn resize<R>(&self, task: TaskId, width: f64, sink: &mut R) -> bool
    where
        R: RenderSink + ?Sized,
    {
        let config = &self.inner.config;
        let update = {
            let mut panes = self.inner.panes.lock();
            let pane = panes.entry(task).or_insert_with(|| ChartPane::new(&config.chart));
            pane.width = width;
            let Some(current) = pane.layout.as_ref() else {
                return false;
            };
            let update = reconcile_bars(Some(current), current.resize(width, &config.chart));
            pane.layout = Some(update.layout.clone());
            update
        };
        sink.replace_data(task, &update);
        true
    }

    /// Set a container width without rendering anything.
    pub fn set_width(&self, task: TaskId, width: f64) {
        let mut panes = self.inner.panes.lock();
        panes.entry(task).or_insert_with(|| ChartPane::new(&self.inner.config.chart)).width = width;
    }

    pub fn width(&self, task: TaskId) -> f64 {
        self.inner
            .panes
            .lock()
            .get(&task)
            .map(|p| p.width)
            .unwrap_or(self.inner.config.chart.default_width)
    }

    pub fn chart(&self, task: TaskId) -> Option<ChartLayout> {
        self.inner.panes.lock().get(&task).and_then(|p| p.layout.clone())
    }

    // ========================================================================
    // Graph
    // ========================================================================

    /// Edges retained from the last cycle.
    pub fn edges(&self) -> Vec<Edge> {
        self.inner.graph.lock().edges().to_vec()
    }

    pub fn graph_updated_at(&self) -> Option<DateTime<Utc>> {
        self.inner.graph.lock().updated_at()
    }

    /// Export the retained graph as JSON.
    pub fn export_graph(&self, writer: &mut dyn std::io::Write) -> Result<()> {
        let edges = self.edges();
        crate::export::export_graph_json(&edges, writer)
    }

    /// Forget all retained state. The next cycle diffs against nothing.
    pub fn reset(&self) {
        self.inner.graph.lock().clear();
        for pane in self.inner.panes.lock().values_mut() {
            pane.layout = None;
        }
    }

    pub fn cycles(&self) -> u64 {
        self.inner.cycles.load(Ordering::Relaxed)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl ChartPane {
    fn new(config: &ChartConfig) -> Self {
        Self { width: config.default_width, layout: None }
    }
}

/// Clears a task's busy flag on drop.
pub struct RequestGuard<'s> {
    inner: &'s SessionInner,
    task: TaskId,
}

impl RequestGuard<'_> {
    pub fn task(&self) -> TaskId {
        self.task
    }
}

impl Drop for RequestGuard<'_> {
    fn drop(&mut self) {
        self.inner.busy.lock().remove(&self.task);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingSink;

    fn response(atoms: &[&str], formulas: &[&str], probs: &[(&str, f64)]) -> BackendResponse {
        BackendResponse {
            atoms: atoms.iter().map(|s| s.to_string()).collect(),
            formulas: formulas.iter().map(|s| s.to_string()).collect(),
            result_keys: probs.iter().map(|(k, _)| k.to_string()).collect(),
            result_values: probs.iter().map(|(_, v)| (*v).into()).collect(),
            output: "ok".into(),
        }
    }

    #[test]
    fn test_busy_guard() {
        let session = Session::default();
        assert!(!session.is_busy(TaskId::Inference));
        {
            let guard = session.begin_request(TaskId::Inference);
            assert_eq!(guard.task(), TaskId::Inference);
            assert!(session.is_busy(TaskId::Inference));
            assert!(!session.is_busy(TaskId::Learning));
        }
        assert!(!session.is_busy(TaskId::Inference));
    }

    #[test]
    fn test_overlapping_requests_share_one_flag() {
        let session = Session::default();
        let outer = session.begin_request(TaskId::Learning);
        {
            let inner = session.begin_request(TaskId::Learning);
            assert_eq!(inner.task(), TaskId::Learning);
            assert!(session.is_busy(TaskId::Learning));
        }
        // the flag is a set entry, not a count: the first guard to drop clears it
        assert!(!session.is_busy(TaskId::Learning));
        drop(outer);
        assert!(!session.is_busy(TaskId::Learning));
    }

    #[test]
    fn test_second_cycle_is_incremental() {
        let session = Session::default();
        let mut sink = RecordingSink::new();

        let first = response(
            &["Smokes(Ann)", "Cancer(Ann)", "Smokes(Bob)"],
            &["Smokes(Ann) => Cancer(Ann)"],
            &[("Cancer(Ann)", 0.7)],
        );
        let report = session.process(TaskId::Inference, &first, &mut sink).unwrap();
        assert_eq!(report.edges_added, 1);
        assert_eq!(report.bars_entered, 1);
        assert_eq!(report.cycle, 1);

        let second = response(
            &["Smokes(Ann)", "Cancer(Ann)", "Smokes(Bob)"],
            &["Smokes(Ann) => Cancer(Ann)", "Smokes(Bob) => Cancer(Ann)"],
            &[("Cancer(Ann)", 0.8)],
        );
        let report = session.process(TaskId::Inference, &second, &mut sink).unwrap();
        assert_eq!(report.edges_removed, 0);
        assert_eq!(report.edges_added, 1);
        assert_eq!(report.bars_updated, 1);
        assert_eq!(sink.edges, session.edges());
    }

    #[test]
    fn test_bad_response_leaves_state_untouched() {
        let session = Session::default();
        let mut sink = RecordingSink::new();
        let mut bad = response(&["A(x)", "B(x)"], &["A(x) ^ B(x)"], &[]);
        bad.result_keys.push("orphan".into());

        assert!(session.process(TaskId::Inference, &bad, &mut sink).is_err());
        assert!(session.edges().is_empty());
        assert!(sink.calls.is_empty());
        assert_eq!(session.cycles(), 0);
    }

    #[test]
    fn test_resize_without_chart() {
        let session = Session::default();
        let mut sink = RecordingSink::new();
        assert!(!session.resize(TaskId::Learning, 320.0, &mut sink));
        assert_eq!(session.width(TaskId::Learning), 320.0);
        assert!(sink.calls.is_empty());
    }

    #[test]
    fn test_reset_forgets_state() {
        let session = Session::default();
        let mut sink = RecordingSink::new();
        let r = response(&["A(x)", "B(x)"], &["A(x) ^ B(x)"], &[("A(x)", 0.4)]);
        session.process(TaskId::Inference, &r, &mut sink).unwrap();
        session.reset();
        assert!(session.edges().is_empty());
        assert!(session.chart(TaskId::Inference).is_none());

        let report = session.process(TaskId::Inference, &r, &mut sink).unwrap();
        assert_eq!(report.edges_added, 1);
        assert_eq!(report.bars_entered, 1);
    }
}
