//! # Atom Canonicalizer
//!
//! Parses the raw atom list of a result into [`Atom`]s and flags duplicates.
//!
//! An atom is a duplicate when it binds the same argument twice
//! (`Smokes(Ann,Ann)`) or when another atom in the list has the same
//! predicate and the same argument set (`Smokes(Ann,Bob)` / `Smokes(Bob,Ann)`).
//! Both members of a structurally equal pair are flagged.

use hashbrown::HashMap;
use serde::Serialize;
use tracing::debug;

use crate::model::Atom;

/// Why an atom was flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DuplicateFlags {
    pub self_duplicate: bool,
    pub structural: bool,
}

impl DuplicateFlags {
    pub fn any(self) -> bool {
        self.self_duplicate || self.structural
    }
}

/// Indices of duplicate atoms, parallel to the atom list it was built from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DuplicateSet {
    flags: Vec<DuplicateFlags>,
}

impl DuplicateSet {
    pub fn contains(&self, idx: usize) -> bool {
        self.flags.get(idx).is_some_and(|f| f.any())
    }

    pub fn flags(&self, idx: usize) -> DuplicateFlags {
        self.flags.get(idx).copied().unwrap_or_default()
    }

    /// Flagged indices, ascending.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.flags.iter().enumerate().filter(|(_, f)| f.any()).map(|(i, _)| i)
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        !self.flags.iter().any(|f| f.any())
    }

    /// Does any of the given indices hit the set?
    pub fn intersects(&self, indices: &[usize]) -> bool {
        indices.iter().any(|&i| self.contains(i))
    }
}

/// Output of the canonicalizer: parsed atoms plus their duplicate flags.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CanonicalAtoms {
    pub atoms: Vec<Atom>,
    pub duplicates: DuplicateSet,
}

impl CanonicalAtoms {
    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }
}

/// Parse every raw atom and flag duplicates across the whole list.
pub fn canonicalize<S: AsRef<str>>(raw: &[S]) -> CanonicalAtoms {
    let atoms: Vec<Atom> = raw.iter().map(|r| Atom::parse(r.as_ref())).collect();

    let mut flags: Vec<DuplicateFlags> = atoms
        .iter()
        .map(|a| DuplicateFlags { self_duplicate: a.is_self_duplicate(), structural: false })
        .collect();

    // Grouping by structural key finds every pair that a pairwise scan would.
    // The map borrows `atoms`, so it must be gone before `atoms` moves.
    {
        let mut groups: HashMap<(&str, &[String]), Vec<usize>> = HashMap::new();
        for (idx, atom) in atoms.iter().enumerate() {
            groups.entry(atom.structural_key()).or_default().push(idx);
        }
        for members in groups.values().filter(|m| m.len() > 1) {
            for &idx in members {
                flags[idx].structural = true;
            }
        }
    }

    let duplicates = DuplicateSet { flags };
    debug!(atoms = atoms.len(), duplicates = duplicates.len(), "canonicalized atoms");

    CanonicalAtoms { atoms, duplicates }
}
