//! Property tests: determinism of duplicate detection and correctness of
//! the graph diff over generated atoms and edges.

use mlnviz::{canonicalize, diff, Edge};
use proptest::prelude::*;

// ============================================================================
// Generators
// ============================================================================

fn atom_strategy() -> impl Strategy<Value = String> {
    let predicate = prop::sample::select(vec!["Smokes", "Cancer", "Friends", "Knows"]);
    let args = prop::collection::vec(prop::sample::select(vec!["Ann", "Bob", "Eve"]), 0..4);
    (predicate, args, any::<bool>()).prop_map(|(p, args, well_formed)| {
        if well_formed {
            format!("{p}({})", args.join(","))
        } else {
            p.to_string()
        }
    })
}

fn edge_strategy() -> impl Strategy<Value = Edge> {
    let atom = prop::sample::select(vec!["A(x)", "B(x)", "C(x)", "D(y)"]);
    let label = prop::sample::select(vec!["f1", "f2", "f3"]);
    (atom.clone(), atom, label).prop_map(|(s, t, l)| Edge::new(s.into(), t.into(), l))
}

fn edge_set(edges: &[Edge]) -> Vec<(String, String, Vec<String>)> {
    let mut keys: Vec<_> = edges
        .iter()
        .map(|e| (e.source.id.clone(), e.target.id.clone(), e.labels.clone()))
        .collect();
    keys.sort();
    keys.dedup();
    keys
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_duplicate_detection_is_deterministic(atoms in prop::collection::vec(atom_strategy(), 0..12)) {
        let first = canonicalize(&atoms);
        let second = canonicalize(&atoms);
        prop_assert_eq!(first.duplicates, second.duplicates);
    }

    #[test]
    fn prop_structural_pairs_always_flagged(atoms in prop::collection::vec(atom_strategy(), 0..12)) {
        let c = canonicalize(&atoms);
        for i in 0..c.atoms.len() {
            for j in 0..c.atoms.len() {
                if i != j && c.atoms[i].structurally_eq(&c.atoms[j]) {
                    prop_assert!(c.duplicates.contains(i));
                }
            }
            if c.atoms[i].is_self_duplicate() {
                prop_assert!(c.duplicates.contains(i));
            }
        }
    }

    #[test]
    fn prop_diff_from_empty_adds_everything(new in prop::collection::vec(edge_strategy(), 0..10)) {
        let d = diff(&[], &new);
        prop_assert!(d.to_remove.is_empty());
        prop_assert_eq!(d.to_add, new);
    }

    #[test]
    fn prop_diff_against_itself_is_empty(edges in prop::collection::vec(edge_strategy(), 0..10)) {
        prop_assert!(diff(&edges, &edges).is_empty());
    }

    #[test]
    fn prop_diff_round_trip(
        old in prop::collection::vec(edge_strategy(), 0..10),
        new in prop::collection::vec(edge_strategy(), 0..10),
    ) {
        let mut rendered = old.clone();
        diff(&old, &new).apply(&mut rendered);
        prop_assert_eq!(edge_set(&rendered), edge_set(&new));
    }
}
