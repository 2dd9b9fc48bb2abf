//! # Formula Graph Builder
//!
//! Connects atoms that co-occur in the same formula.
//!
//! ```text
//! formula "Smokes(Ann) ^ Friends(Ann,Bob) => Smokes(Bob)"
//!   members: [Smokes(Ann), Friends(Ann,Bob), Smokes(Bob)]
//!   edges:   Smokes(Ann)->Friends(Ann,Bob), Smokes(Ann)->Smokes(Bob),
//!            Friends(Ann,Bob)->Smokes(Bob)
//! ```
//!
//! A formula with any duplicate-flagged member contributes no edges at all.
//! Edges from different formulas are never merged.

use serde::Serialize;
use tracing::{debug, trace};

use crate::canonical::CanonicalAtoms;
use crate::model::{AtomMatch, Edge, EdgeStyle, Formula};

/// Per-build counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BuildStats {
    pub formulas: usize,
    /// Formulas dropped because a member atom is a duplicate.
    pub skipped: usize,
    pub edges: usize,
}

/// Builds the co-occurrence edge list for one result.
pub struct FormulaGraphBuilder<'a> {
    atoms: &'a CanonicalAtoms,
    matching: AtomMatch,
    style: EdgeStyle,
}

impl<'a> FormulaGraphBuilder<'a> {
    pub fn new(atoms: &'a CanonicalAtoms) -> Self {
        Self {
            atoms,
            matching: AtomMatch::default(),
            style: EdgeStyle::default(),
        }
    }

    pub fn with_matching(mut self, matching: AtomMatch) -> Self {
        self.matching = matching;
        self
    }

    pub fn with_style(mut self, style: EdgeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn build<S: AsRef<str>>(&self, formulas: &[S]) -> Vec<Edge> {
        self.build_with_stats(formulas).0
    }

    pub fn build_with_stats<S: AsRef<str>>(&self, formulas: &[S]) -> (Vec<Edge>, BuildStats) {
        let mut edges = Vec::new();
        let mut stats = BuildStats { formulas: formulas.len(), ..Default::default() };

        for (fidx, text) in formulas.iter().enumerate() {
            let formula = Formula::new(text.as_ref());
            let members = formula.member_atoms(&self.atoms.atoms, self.matching);

            if self.atoms.duplicates.intersects(&members) {
                trace!(formula = fidx, members = members.len(), "formula has duplicate atoms, no edges");
                stats.skipped += 1;
                continue;
            }

            self.pair_members(&formula, &members, &mut edges);
        }

        stats.edges = edges.len();
        debug!(
            formulas = stats.formulas,
            skipped = stats.skipped,
            edges = stats.edges,
            "built co-occurrence graph"
        );
        (edges, stats)
    }

    /// One edge per unordered member pair, pointing from the earlier member.
    fn pair_members(&self, formula: &Formula, members: &[usize], out: &mut Vec<Edge>) {
        for (j, &src) in members.iter().enumerate() {
            for &dst in &members[j + 1..] {
                let edge = Edge::new(
                    self.atoms.atoms[src].clone(),
                    self.atoms.atoms[dst].clone(),
                    formula.text.clone(),
                )
                .with_style(self.style);
                out.push(edge);
            }
        }
    }
}

/// Build edges with the default substring matching.
pub fn build_edges<S: AsRef<str>>(formulas: &[S], atoms: &CanonicalAtoms) -> Vec<Edge> {
    FormulaGraphBuilder::new(atoms).build(formulas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::canonicalize;

    #[test]
    fn test_single_pair() {
        let atoms = canonicalize(&["Smokes(Ann)", "Cancer(Ann)"]);
        let edges = build_edges(&["Smokes(Ann) => Cancer(Ann)"], &atoms);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].source.id, "Smokes(Ann)");
        assert_eq!(edges[0].target.id, "Cancer(Ann)");
        assert_eq!(edges[0].labels, vec!["Smokes(Ann) => Cancer(Ann)".to_string()]);
        assert_eq!(edges[0].style, EdgeStyle::StrokeGreen);
    }

    #[test]
    fn test_n_choose_two() {
        let atoms = canonicalize(&["A(x)", "B(x)", "C(x)", "D(x)"]);
        let edges = build_edges(&["A(x) ^ B(x) ^ C(x) => D(x)"], &atoms);
        assert_eq!(edges.len(), 6);
        for (i, a) in edges.iter().enumerate() {
            for b in &edges[i + 1..] {
                let same = (a.source == b.source && a.target == b.target)
                    || (a.source == b.target && a.target == b.source);
                assert!(!same, "pair emitted twice: {} / {}", a.source, a.target);
            }
        }
    }

    #[test]
    fn test_duplicate_member_drops_whole_formula() {
        let atoms = canonicalize(&["Smokes(Ann)", "Cancer(Ann)", "Smokes(Ann)"]);
        let (edges, stats) = FormulaGraphBuilder::new(&atoms)
            .build_with_stats(&["Smokes(Ann) => Cancer(Ann)"]);
        assert!(edges.is_empty());
        assert_eq!(stats.skipped, 1);
    }

    #[test]
    fn test_other_formulas_survive() {
        let atoms = canonicalize(&["Knows(Ann,Ann)", "Smokes(Ann)", "Cancer(Ann)"]);
        let edges = build_edges(
            &["Knows(Ann,Ann) => Smokes(Ann)", "Smokes(Ann) => Cancer(Ann)"],
            &atoms,
        );
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].labels[0], "Smokes(Ann) => Cancer(Ann)");
    }

    #[test]
    fn test_edges_across_formulas_not_merged() {
        let atoms = canonicalize(&["Smokes(Ann)", "Cancer(Ann)"]);
        let edges = build_edges(
            &["Smokes(Ann) => Cancer(Ann)", "Cancer(Ann) v !Smokes(Ann)"],
            &atoms,
        );
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].source, edges[1].source);
        assert_ne!(edges[0].labels, edges[1].labels);
    }

    #[test]
    fn test_single_member_formula_has_no_edges() {
        let atoms = canonicalize(&["Smokes(Ann)", "Cancer(Ann)"]);
        assert!(build_edges(&["Smokes(Ann)"], &atoms).is_empty());
    }

    #[test]
    fn test_token_matching_excludes_glued_atoms() {
        let atoms = canonicalize(&["Smokes(Ann)", "Cancer(Ann)"]);
        let formulas = ["NotSmokes(Ann) => Cancer(Ann)"];
        assert_eq!(build_edges(&formulas, &atoms).len(), 1);
        let strict = FormulaGraphBuilder::new(&atoms).with_matching(AtomMatch::Token);
        assert!(strict.build(&formulas).is_empty());
    }

    #[test]
    fn test_empty_inputs() {
        let atoms = canonicalize::<&str>(&[]);
        assert!(build_edges(&["Smokes(Ann)"], &atoms).is_empty());
        let atoms = canonicalize(&["Smokes(Ann)"]);
        assert!(build_edges::<&str>(&[], &atoms).is_empty());
    }
}
