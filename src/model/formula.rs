//! Formula text and its member atoms.

use serde::{Deserialize, Serialize};
use super::Atom;

/// How an atom is recognised inside a formula string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AtomMatch {
    /// The atom's raw string occurs anywhere in the formula text.
    #[default]
    Substring,
    /// Like `Substring`, but the occurrence must not be glued to identifier
    /// characters on either side (`Smokes(Ann)` does not match `NotSmokes(Ann)`).
    Token,
}

impl AtomMatch {
    /// Does `atom` occur in `text` under this policy?
    pub fn occurs(self, atom: &str, text: &str) -> bool {
        match self {
            AtomMatch::Substring => text.contains(atom),
            AtomMatch::Token => {
                if atom.is_empty() {
                    return false;
                }
                text.match_indices(atom).any(|(start, _)| {
                    let before = text[..start].chars().next_back();
                    let after = text[start + atom.len()..].chars().next();
                    !glued(before, atom.chars().next()) && !glued(after, atom.chars().next_back())
                })
            }
        }
    }
}

fn is_ident(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// An identifier character touching an identifier character forms one token.
fn glued(neighbour: Option<char>, edge: Option<char>) -> bool {
    matches!((neighbour, edge), (Some(n), Some(e)) if is_ident(n) && is_ident(e))
}

/// A formula string returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Formula {
    pub text: String,
}

impl Formula {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Indices of the atoms occurring in this formula, in atom-list order.
    ///
    /// Atoms are de-duplicated by raw string: when the same string appears
    /// twice in `atoms`, only its first index is a member.
    pub fn member_atoms(&self, atoms: &[Atom], matching: AtomMatch) -> Vec<usize> {
        let mut members: Vec<usize> = Vec::new();
        for (idx, atom) in atoms.iter().enumerate() {
            if !matching.occurs(&atom.id, &self.text) {
                continue;
            }
            if members.iter().any(|&m| atoms[m].id == atom.id) {
                continue;
            }
            members.push(idx);
        }
        members
    }
}

impl std::fmt::Display for Formula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}
