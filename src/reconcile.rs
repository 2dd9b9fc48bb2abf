//! Keyed enter/update/exit partition.
//!
//! Given what is currently rendered and what should be rendered next, split
//! the items by a stable key:
//!
//! | Bucket   | Contains                                   |
//! |----------|--------------------------------------------|
//! | `enter`  | next items whose key is not rendered yet   |
//! | `update` | next items whose key is already rendered   |
//! | `exit`   | current items whose key is gone from next  |
//!
//! Each bucket keeps the relative order of the list it was drawn from.
//! Runs in O(n + m) using hashed key sets.

use std::hash::Hash;

use hashbrown::HashSet;
use serde::Serialize;

/// Three-way partition handed to the renderer as plain data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Partition<T> {
    pub enter: Vec<T>,
    pub update: Vec<T>,
    pub exit: Vec<T>,
}

impl<T> Partition<T> {
    pub fn is_empty(&self) -> bool {
        self.enter.is_empty() && self.update.is_empty() && self.exit.is_empty()
    }

    /// Nothing to add or remove.
    pub fn is_unchanged(&self) -> bool {
        self.enter.is_empty() && self.exit.is_empty()
    }
}

impl<T> Default for Partition<T> {
    fn default() -> Self {
        Self { enter: Vec::new(), update: Vec::new(), exit: Vec::new() }
    }
}

/// Partition `next` against `current` by `key`.
pub fn partition<'a, T, K, F>(current: &'a [T], next: &'a [T], key: F) -> Partition<T>
where
    T: Clone,
    K: Eq + Hash,
    F: Fn(&'a T) -> K,
{
    let current_keys: HashSet<K> = current.iter().map(&key).collect();
    let next_keys: HashSet<K> = next.iter().map(&key).collect();

    let mut out = Partition::default();
    for item in next {
        if current_keys.contains(&key(item)) {
            out.update.push(item.clone());
        } else {
            out.enter.push(item.clone());
        }
    }
    out.exit = current
        .iter()
        .filter(|item| !next_keys.contains(&key(*item)))
        .cloned()
        .collect();
    out
}
