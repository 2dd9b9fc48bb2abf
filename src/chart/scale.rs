//! Axis scales: continuous value → pixel, and name → pixel band.

use hashbrown::HashMap;
use serde::Serialize;

/// Linear map from a numeric domain to a pixel range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn apply(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return r0;
        }
        r0 + (x - d0) / (d1 - d0) * (r1 - r0)
    }

    /// Pixel length of the whole range.
    pub fn extent(&self) -> f64 {
        self.range.1 - self.range.0
    }
}

/// Largest padding fraction a band scale accepts.
pub const MAX_BAND_PADDING: f64 = 0.9;

/// Ordinal map from names to equally sized, pixel-rounded bands.
///
/// The step between band starts is floored to a whole pixel, the band width
/// is `step * (1 - padding)` rounded, and the pixels left over by flooring
/// are split so half of them land before the first band.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandScale {
    names: Vec<String>,
    #[serde(skip)]
    index: HashMap<String, usize>,
    start: f64,
    step: f64,
    bandwidth: f64,
    padding: f64,
    range: (f64, f64),
}

impl BandScale {
    pub fn round_bands<I, S>(names: I, range: (f64, f64), padding: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ordered: Vec<String> = Vec::new();
        let mut index = HashMap::new();
        for name in names {
            let name = name.into();
            if !index.contains_key(&name) {
                index.insert(name.clone(), ordered.len());
                ordered.push(name);
            }
        }

        // padding at or above 1 would leave no room for any band
        let padding = if padding.is_nan() { 0.0 } else { padding.clamp(0.0, MAX_BAND_PADDING) };
        let (r0, r1) = range;
        let n = ordered.len() as f64;
        let (start, step, bandwidth) = if ordered.is_empty() {
            (r0, 0.0, 0.0)
        } else {
            let step = ((r1 - r0) / (n - padding)).floor();
            let leftover = r1 - r0 - (n - padding) * step;
            (r0 + (leftover / 2.0).round(), step, (step * (1.0 - padding)).round())
        };

        Self { names: ordered, index, start, step, bandwidth, padding, range }
    }

    /// Top pixel of the band for `name`.
    pub fn position(&self, name: &str) -> Option<f64> {
        self.index.get(name).map(|&i| self.start + self.step * i as f64)
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
