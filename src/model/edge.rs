//! Co-occurrence edge between two atoms.

use serde::{Deserialize, Serialize};
use super::Atom;

/// Visual style tag handed to the renderer with every edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EdgeStyle {
    #[default]
    #[serde(rename = "strokegreen")]
    StrokeGreen,
}

impl EdgeStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            EdgeStyle::StrokeGreen => "strokegreen",
        }
    }
}

/// Content key of an edge: `(source, target, labels)`.
///
/// Two edges with the same key are the same edge for diffing and
/// reconciliation, whatever their style.
pub type EdgeKey<'a> = (&'a str, &'a str, &'a [String]);

/// An edge connecting two atoms that co-occur in a formula.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub source: Atom,
    pub target: Atom,
    /// Texts of the formulas this edge was drawn from.
    pub labels: Vec<String>,
    pub style: EdgeStyle,
}

impl Edge {
    pub fn new(source: Atom, target: Atom, label: impl Into<String>) -> Self {
        Self {
            source,
            target,
            labels: vec![label.into()],
            style: EdgeStyle::default(),
        }
    }

    pub fn with_style(mut self, style: EdgeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn key(&self) -> EdgeKey<'_> {
        (self.source.id.as_str(), self.target.id.as_str(), self.labels.as_slice())
    }
}
