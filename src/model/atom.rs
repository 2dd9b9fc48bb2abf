//! Ground atom in `Predicate(arg1,arg2,...)` form.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Arguments of an atom, sorted lexicographically.
pub type ArgSet = SmallVec<[String; 4]>;

/// A parsed ground atom.
///
/// The raw string is the atom's identity; `predicate` and `args` are derived
/// from it once and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Atom {
    /// Raw string as delivered by the backend.
    pub id: String,
    /// Everything before the first `(`, or the whole string if malformed.
    pub predicate: String,
    /// Arguments between the first `(` and the next `)`, sorted.
    pub args: ArgSet,
}

impl Atom {
    /// Parse a raw atom string. Never fails: a string without `(` or without
    /// a closing `)` keeps the whole string as predicate and has no arguments.
    pub fn parse(raw: impl Into<String>) -> Self {
        let id = raw.into();
        let (predicate, args) = split_atom(&id);
        Self { id, predicate, args }
    }

    /// Same variable bound twice, e.g. `Smokes(Ann,Ann)`.
    pub fn is_self_duplicate(&self) -> bool {
        // args are sorted, so equal arguments are adjacent
        self.args.windows(2).any(|pair| pair[0] == pair[1])
    }

    /// Same predicate and same argument set, regardless of argument order.
    pub fn structurally_eq(&self, other: &Atom) -> bool {
        self.predicate == other.predicate && self.args == other.args
    }

    /// Key under which structurally equal atoms collide.
    pub fn structural_key(&self) -> (&str, &[String]) {
        (self.predicate.as_str(), self.args.as_slice())
    }
}

impl std::fmt::Display for Atom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.id)
    }
}

impl From<&str> for Atom {
    fn from(raw: &str) -> Self {
        Atom::parse(raw)
    }
}

fn split_atom(raw: &str) -> (String, ArgSet) {
    let Some(open) = raw.find('(') else {
        return (raw.to_owned(), ArgSet::new());
    };
    let rest = &raw[open + 1..];
    let Some(close) = rest.find(')') else {
        return (raw.to_owned(), ArgSet::new());
    };

    let inner = &rest[..close];
    let mut args: ArgSet = if inner.is_empty() {
        ArgSet::new()
    } else {
        inner.split(',').map(str::to_owned).collect()
    };
    args.sort();

    (raw[..open].to_owned(), args)
}
