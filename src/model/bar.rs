//! Bar-chart data: label → probability.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// One bar: a result label and its probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarDatum {
    pub name: String,
    pub value: f64,
}

impl BarDatum {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self { name: name.into(), value }
    }
}

/// Label → probability map with unique keys, kept in first-insertion order.
///
/// Inserting an existing key overwrites its value in place.
#[derive(Debug, Clone, Default)]
pub struct ProbabilityMap {
    data: Vec<BarDatum>,
    index: HashMap<String, usize>,
}

impl ProbabilityMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        let name = name.into();
        match self.index.get(&name) {
            Some(&pos) => self.data[pos].value = value,
            None => {
                self.index.insert(name.clone(), self.data.len());
                self.data.push(BarDatum { name, value });
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.index.get(name).map(|&pos| self.data[pos].value)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BarDatum> {
        self.data.iter()
    }

    /// Flatten into bar data, in insertion order.
    pub fn into_data(self) -> Vec<BarDatum> {
        self.data
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for ProbabilityMap {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut map = ProbabilityMap::new();
        for (name, value) in iter {
            map.insert(name, value);
        }
        map
    }
}
