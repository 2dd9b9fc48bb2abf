//! Graph snapshot export — serialize the retained edges as `{nodes, links}`.
//!
//! Produces the node/link JSON shape force-directed renderers consume, so a
//! graph can be reloaded from scratch without replaying every cycle.
//!
//! ```text
//! GraphState edges → GraphSnapshot::from_edges() → export_graph_json()
//!   → {"nodes": [{id, predicate, args}], "links": [{source, target, labels, style}]}
//! ```

use std::io::Write;

use hashbrown::HashSet;
use serde::Serialize;

use crate::model::{ArgSet, Edge, EdgeStyle};
use crate::Result;

/// A distinct atom touched by at least one edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotNode {
    pub id: String,
    pub predicate: String,
    pub args: ArgSet,
}

/// An edge, with its endpoints reduced to atom ids.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotLink {
    pub source: String,
    pub target: String,
    pub labels: Vec<String>,
    pub style: EdgeStyle,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<SnapshotNode>,
    pub links: Vec<SnapshotLink>,
}

impl GraphSnapshot {
    /// Nodes appear in the order their atom is first seen, source before target.
    pub fn from_edges(edges: &[Edge]) -> Self {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut nodes = Vec::new();
        let mut links = Vec::with_capacity(edges.len());

        for edge in edges {
            for atom in [&edge.source, &edge.target] {
                if seen.insert(atom.id.as_str()) {
                    nodes.push(SnapshotNode {
                        id: atom.id.clone(),
                        predicate: atom.predicate.clone(),
                        args: atom.args.clone(),
                    });
                }
            }
            links.push(SnapshotLink {
                source: edge.source.id.clone(),
                target: edge.target.id.clone(),
                labels: edge.labels.clone(),
                style: edge.style,
            });
        }

        Self { nodes, links }
    }
}

/// Write the snapshot of `edges` as pretty-printed JSON followed by a newline.
pub fn export_graph_json(edges: &[Edge], writer: &mut dyn Write) -> Result<()> {
    let snapshot = GraphSnapshot::from_edges(edges);
    serde_json::to_writer_pretty(&mut *writer, &snapshot)?;
    writeln!(writer)?;
    Ok(())
}
