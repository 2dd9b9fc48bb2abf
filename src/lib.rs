//! # mlnviz — MLN Results → Visualization Data
//!
//! Turns the unstructured text an MLN inference backend returns into data a
//! renderer can apply in place: a co-occurrence graph diff and a sorted,
//! adaptively sized bar chart.
//!
//! ## Pipeline
//!
//! 1. **Canonicalize**: parse atoms, flag duplicates (`canonical`)
//! 2. **Build**: connect atoms that co-occur in a duplicate-free formula (`graph`)
//! 3. **Diff**: compare against the previously rendered edges (`diff`)
//! 4. **Lay out**: sort probabilities, compute scales and bars (`chart`)
//!
//! Every stage is a pure, synchronous transform. Only the [`Session`] keeps
//! state between cycles.
//!
//! ## Quick Start
//!
//! ```rust
//! use mlnviz::{BackendResponse, RecordingSink, Session, TaskId};
//!
//! # fn main() -> mlnviz::Result<()> {
//! let response = BackendResponse::from_json(r#"{
//!     "atoms": ["Smokes(Ann)", "Cancer(Ann)"],
//!     "formulas": ["Smokes(Ann) => Cancer(Ann)"],
//!     "resultkeys": ["Cancer(Ann)"],
//!     "resultvalues": [0.73],
//!     "output": ""
//! }"#)?;
//!
//! let session = Session::default();
//! let mut sink = RecordingSink::new();
//! let report = session.process(TaskId::Inference, &response, &mut sink)?;
//!
//! assert_eq!(report.edges_added, 1);
//! assert_eq!(sink.edges.len(), 1);
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod canonical;
pub mod graph;
pub mod reconcile;
pub mod diff;
pub mod chart;
pub mod response;
pub mod render;
pub mod source;
pub mod session;
pub mod export;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{
    Atom, ArgSet, Formula, AtomMatch,
    Edge, EdgeKey, EdgeStyle,
    BarDatum, ProbabilityMap, TaskId,
};

// ============================================================================
// Re-exports: Pipeline stages
// ============================================================================

pub use canonical::{canonicalize, CanonicalAtoms, DuplicateSet, DuplicateFlags};
pub use graph::{build_edges, FormulaGraphBuilder, BuildStats};
pub use reconcile::{partition, Partition};
pub use diff::{diff, DiffPolicy, GraphDiff, GraphState};
pub use chart::{
    reconcile_bars, BandScale, BarGeometry, ChartConfig, ChartLayout,
    ChartUpdate, LabelPlacement, LinearScale,
};

// ============================================================================
// Re-exports: Collaborators
// ============================================================================

pub use response::{BackendResponse, ProbabilityValue};
pub use render::{RecordingSink, RenderCall, RenderSink};
pub use source::{ReplaySource, ResultSource};
pub use session::{CycleReport, RequestGuard, Session, SessionConfig};
pub use export::{export_graph_json, GraphSnapshot};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Result arrays differ in length: {keys} keys, {values} values")]
    LengthMismatch { keys: usize, values: usize },

    #[error("Probability for '{key}' is not a number: {raw}")]
    InvalidProbability { key: String, raw: String },

    #[error("Result source error: {0}")]
    Source(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
