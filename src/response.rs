//! Backend response shape.
//!
//! One JSON object per completed inference or learning run:
//!
//! ```json
//! {
//!   "atoms":        ["Smokes(Ann)", "Cancer(Ann)"],
//!   "formulas":     ["Smokes(Ann) => Cancer(Ann)"],
//!   "resultkeys":   ["Cancer(Ann)"],
//!   "resultvalues": [0.73],
//!   "output":       "free-text log"
//! }
//! ```
//!
//! Every field is optional; learning runs usually carry only `output`.

use serde::{Deserialize, Serialize};

use crate::model::ProbabilityMap;
use crate::{Error, Result};

/// A probability as sent by the backend: a number or its textual form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProbabilityValue {
    Number(f64),
    Text(String),
}

impl ProbabilityValue {
    /// The value as a finite number. `nan` and `inf` spellings are rejected.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            ProbabilityValue::Number(v) => Some(*v),
            ProbabilityValue::Text(s) => s.trim().parse::<f64>().ok(),
        };
        value.filter(|v| v.is_finite())
    }
}

impl From<f64> for ProbabilityValue {
    fn from(v: f64) -> Self {
        ProbabilityValue::Number(v)
    }
}

impl From<&str> for ProbabilityValue {
    fn from(v: &str) -> Self {
        ProbabilityValue::Text(v.to_owned())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackendResponse {
    #[serde(default)]
    pub atoms: Vec<String>,
    #[serde(default)]
    pub formulas: Vec<String>,
    #[serde(default, rename = "resultkeys")]
    pub result_keys: Vec<String>,
    #[serde(default, rename = "resultvalues")]
    pub result_values: Vec<ProbabilityValue>,
    #[serde(default)]
    pub output: String,
}

impl BackendResponse {
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Zip `resultkeys` with `resultvalues` by index.
    ///
    /// A key that repeats keeps its first position and its last value.
    pub fn probabilities(&self) -> Result<ProbabilityMap> {
        if self.result_keys.len() != self.result_values.len() {
            return Err(Error::LengthMismatch {
                keys: self.result_keys.len(),
                values: self.result_values.len(),
            });
        }

        let mut map = ProbabilityMap::new();
        for (key, raw) in self.result_keys.iter().zip(&self.result_values) {
            let value = raw.as_f64().ok_or_else(|| Error::InvalidProbability {
                key: key.clone(),
                raw: match raw {
                    ProbabilityValue::Text(s) => s.clone(),
                    ProbabilityValue::Number(v) => v.to_string(),
                },
            })?;
            map.insert(key.clone(), value);
        }
        Ok(map)
    }
}
