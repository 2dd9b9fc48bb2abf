//! # Bar Chart Layout
//!
//! Turns a label → probability map into a sorted, positioned bar chart and
//! tells the renderer which bars to create, move, or delete.
//!
//! ```text
//!  ← label column →← value scale: [0,1] → [0, w - labels - 5 chars] →
//!  ┌──────────────┬──────────────────────────────────────────┐
//!  │ Smokes(Ann)  │████████████████████████████ 0.9000│      │  value > 0.1: label inside
//!  │ Cancer(Ann)  │████ 0.0500                              │  value ≤ 0.1: label outside
//!  └──────────────┴──────────────────────────────────────────┘
//! ```
//!
//! Layouts carry no identity beyond one render: each result or resize
//! produces a fresh [`ChartLayout`], reconciled against the previous one by
//! bar name.

pub mod scale;
pub mod layout;

pub use scale::{BandScale, LinearScale};
pub use layout::{BarGeometry, ChartConfig, ChartLayout, LabelPlacement};

use serde::Serialize;
use tracing::debug;

use crate::reconcile::{partition, Partition};

/// A new layout plus the bars to enter, update and exit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartUpdate {
    pub layout: ChartLayout,
    /// `exit` carries the previous geometry of removed bars.
    pub bars: Partition<BarGeometry>,
}

/// Reconcile `next` against what `previous` rendered, keyed by bar name.
pub fn reconcile_bars(previous: Option<&ChartLayout>, next: ChartLayout) -> ChartUpdate {
    let current: &[BarGeometry] = previous.map(|l| l.bars.as_slice()).unwrap_or(&[]);
    let bars = partition(current, &next.bars, |b| b.name.as_str());
    debug!(
        enter = bars.enter.len(),
        update = bars.update.len(),
        exit = bars.exit.len(),
        "reconciled bars"
    );
    ChartUpdate { layout: next, bars }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProbabilityMap;

    fn layout(pairs: &[(&str, f64)]) -> ChartLayout {
        let map: ProbabilityMap = pairs.iter().map(|(n, v)| (*n, *v)).collect();
        ChartLayout::from_map(map, 600.0, &ChartConfig::default())
    }

    fn names(bars: &[BarGeometry]) -> Vec<String> {
        bars.iter().map(|b| b.name.clone()).collect()
    }

    #[test]
    fn test_first_render_enters_everything() {
        let update = reconcile_bars(None, layout(&[("X", 0.9), ("Y", 0.15)]));
        assert_eq!(update.bars.enter.len(), 2);
        assert!(update.bars.update.is_empty());
        assert!(update.bars.exit.is_empty());
    }

    #[test]
    fn test_enter_update_exit() {
        let before = layout(&[("X", 0.9), ("Y", 0.15)]);
        let update = reconcile_bars(Some(&before), layout(&[("Y", 0.5), ("Z", 0.2)]));
        assert_eq!(names(&update.bars.enter), ["Z"]);
        assert_eq!(names(&update.bars.update), ["Y"]);
        assert_eq!(names(&update.bars.exit), ["X"]);
        assert_eq!(update.bars.update[0].value, 0.5);
    }

    #[test]
    fn test_empty_map_has_nothing_to_reconcile() {
        let update = reconcile_bars(None, layout(&[]));
        assert!(update.bars.is_empty());
        assert_eq!(update.layout.height, ChartConfig::default().top_offset);
    }

    #[test]
    fn test_resize_is_all_update() {
        let config = ChartConfig::default();
        let before = layout(&[("X", 0.9), ("Y", 0.15)]);
        let update = reconcile_bars(Some(&before), before.resize(300.0, &config));
        assert!(update.bars.is_unchanged());
        assert_eq!(update.bars.update.len(), 2);
    }
}
