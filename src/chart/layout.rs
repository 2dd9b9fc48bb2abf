//! Bar geometry for one probability map at one container width.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{BarDatum, ProbabilityMap};
use super::scale::{BandScale, LinearScale};

/// Fixed chart metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Height of one bar in pixels.
    pub bar_height: f64,
    /// Pixel width of one label character.
    pub font_metric: f64,
    /// Fraction of each band left empty between bars.
    pub band_padding: f64,
    /// Pixels above the first band.
    pub top_offset: f64,
    /// How far a value label sits inside the bar end.
    pub inward_label_offset: f64,
    /// How far (in characters) a value label sits past a short bar's end.
    pub outward_label_chars: f64,
    /// Values above this get their label inside the bar.
    pub label_threshold: f64,
    /// Decimals in the value label.
    pub value_precision: usize,
    /// Container width used before the renderer reports one.
    pub default_width: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            bar_height: 15.0,
            font_metric: 7.0,
            band_padding: 0.1,
            top_offset: 20.0,
            inward_label_offset: 3.0,
            outward_label_chars: 4.0,
            label_threshold: 0.1,
            value_precision: 4,
            default_width: 600.0,
        }
    }
}

/// Where the value label goes relative to the bar end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelPlacement {
    Inside,
    Outside,
}

/// Positioned rectangle plus value label for one bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarGeometry {
    pub name: String,
    pub value: f64,
    /// Top of the bar's band.
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Label anchor: the bar end.
    pub label_x: f64,
    /// Label baseline inside the band.
    pub label_y: f64,
    /// Signed label shift from `label_x`; negative moves it into the bar.
    pub label_dx: f64,
    pub placement: LabelPlacement,
    pub label: String,
}

/// Sorted data plus every derived scale and bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartLayout {
    pub sorted_data: Vec<BarDatum>,
    /// Container width the layout was computed for.
    pub width: f64,
    pub height: f64,
    pub label_column_width: f64,
    pub value_scale: LinearScale,
    pub band_scale: BandScale,
    pub bars: Vec<BarGeometry>,
}

impl ChartLayout {
    /// Lay out a probability map, largest value first.
    pub fn from_map(map: ProbabilityMap, width: f64, config: &ChartConfig) -> Self {
        Self::compute(map.into_data(), width, config)
    }

    /// Sort `data` descending by value and lay it out.
    ///
    /// Data where every value is zero lays out like no data at all.
    pub fn compute(data: impl IntoIterator<Item = BarDatum>, width: f64, config: &ChartConfig) -> Self {
        let mut sorted: Vec<BarDatum> = data.into_iter().collect();
        if sorted.iter().all(|d| d.value == 0.0) {
            sorted.clear();
        }
        sorted.sort_by(|a, b| b.value.total_cmp(&a.value));
        Self::arrange(sorted, width, config)
    }

    pub fn empty(width: f64, config: &ChartConfig) -> Self {
        Self::arrange(Vec::new(), width, config)
    }

    /// Recompute geometry for a new container width, keeping the data order.
    pub fn resize(&self, width: f64, config: &ChartConfig) -> Self {
        Self::arrange(self.sorted_data.clone(), width, config)
    }

    pub fn bar(&self, name: &str) -> Option<&BarGeometry> {
        self.bars.iter().find(|b| b.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sorted_data.iter().map(|d| d.name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.sorted_data.is_empty()
    }

    fn arrange(sorted: Vec<BarDatum>, width: f64, config: &ChartConfig) -> Self {
        let fm = config.font_metric;

        let longest = sorted.iter().map(|d| d.name.chars().count()).max().unwrap_or(0);
        let label_column_width = longest as f64 * fm;

        let plot_width = (width - label_column_width - 5.0 * fm).max(0.0);
        let value_scale = LinearScale::new((0.0, 1.0), (0.0, plot_width));

        let height = sorted.len() as f64 * 1.2 * config.bar_height + config.top_offset;
        let band_scale = BandScale::round_bands(
            sorted.iter().map(|d| d.name.clone()),
            (config.top_offset, height),
            config.band_padding,
        );

        let bars: Vec<BarGeometry> = sorted
            .iter()
            .map(|d| place_bar(d, &value_scale, &band_scale, config))
            .collect();

        debug!(bars = bars.len(), width, height, label_column_width, "laid out bar chart");

        Self { sorted_data: sorted, width, height, label_column_width, value_scale, band_scale, bars }
    }
}

fn place_bar(d: &BarDatum, x: &LinearScale, y: &BandScale, config: &ChartConfig) -> BarGeometry {
    let width = x.apply(d.value);
    let (placement, label_dx) = if d.value > config.label_threshold {
        (LabelPlacement::Inside, -config.inward_label_offset)
    } else {
        (LabelPlacement::Outside, config.outward_label_chars * config.font_metric)
    };

    BarGeometry {
        name: d.name.clone(),
        value: d.value,
        y: y.position(&d.name).unwrap_or(config.top_offset),
        width,
        height: config.bar_height,
        label_x: width,
        label_y: y.bandwidth() / 2.0,
        label_dx,
        placement,
        label: format!("{:.*}", config.value_precision, d.value),
    }
}
