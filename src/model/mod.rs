//! # Result Model
//!
//! Clean DTOs for one inference/learning result cycle.
//! These types cross every boundary: response ↔ canonicalizer ↔ graph builder
//! ↔ diff engine ↔ chart layout ↔ renderer.
//!
//! Design rule: NO rendering types, NO transport types here.
//! This module is pure data — no I/O, no state, no async.

pub mod atom;
pub mod formula;
pub mod edge;
pub mod bar;
pub mod task;

pub use atom::{Atom, ArgSet};
pub use formula::{Formula, AtomMatch};
pub use edge::{Edge, EdgeKey, EdgeStyle};
pub use bar::{BarDatum, ProbabilityMap};
pub use task::TaskId;
