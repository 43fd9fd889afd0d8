//! Chart-shaped payloads for UI consumers
//!
//! Labels are an ordered set (first-seen order). The single dataset carries
//! integer values with parallel background/border color arrays, and two
//! auxiliary string arrays ride along with the labels.

use serde::{Deserialize, Serialize};

/// Border width used by every dataset
pub const BORDER_WIDTH: u32 = 1;

/// Fill and border color of a chart entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorPair {
    pub fill: &'static str,
    pub border: &'static str,
}

/// Color of the base level, also used for levels missing from the palette
pub const ZERO_COLOR: ColorPair = ColorPair {
    fill: "rgba(255,255,255,0.7)",
    border: "rgba(255,255,255,0.8)",
};

/// Belt colors, keyed by uppercased level name
pub static PALETTE: &[(&str, ColorPair)] = &[
    ("BLUE", ColorPair { fill: "rgba(0,0,163,0.7)", border: "rgba(0,0,163,0.8)" }),
    ("GREY", ColorPair { fill: "rgba(130,130,130,0.7)", border: "rgba(130,130,130,0.8)" }),
    ("RED", ColorPair { fill: "rgba(163,0,0,0.7)", border: "rgba(163,0,0,0.8)" }),
    ("BLACK", ColorPair { fill: "rgba(20,20,20,0.7)", border: "rgba(20,20,20,0.8)" }),
    ("GREEN", ColorPair { fill: "rgba(65, 168, 95,0.7)", border: "rgba(65, 168, 95,0.8)" }),
    ("GOLD", ColorPair { fill: "rgba(250, 197, 28,0.7)", border: "rgba(250, 197, 28,0.8)" }),
    ("ZERO", ZERO_COLOR),
];

/// Color for a level name; `None` when the palette has no entry for it
pub fn belt_color(level: &str) -> Option<ColorPair> {
    let key = level.to_uppercase();
    PALETTE
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, color)| *color)
}

/// One series of chart values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSet {
    pub data: Vec<i64>,
    pub border_width: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub background_color: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub border_color: Vec<String>,
}

impl DataSet {
    pub fn new() -> Self {
        Self {
            border_width: BORDER_WIDTH,
            ..Default::default()
        }
    }
}

/// Chart payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chart {
    pub labels: Vec<String>,

    /// Per-entry `"userId|level|geo"` tokens
    #[serde(rename = "custom1", default, skip_serializing_if = "Vec::is_empty")]
    pub metadata: Vec<String>,

    /// Per-entry comma-joined `"year|level|total"` badges
    #[serde(rename = "custom2", default, skip_serializing_if = "Vec::is_empty")]
    pub history_badges: Vec<String>,

    pub datasets: Vec<DataSet>,
}

impl Chart {
    /// An empty chart with a single dataset
    pub fn new() -> Self {
        Self {
            datasets: vec![DataSet::new()],
            ..Default::default()
        }
    }

    /// Add a label unless it is already present
    pub fn push_label(&mut self, label: impl Into<String>) {
        let label = label.into();
        if !self.labels.contains(&label) {
            self.labels.push(label);
        }
    }

    /// Append a value to the first dataset
    pub fn push_value(&mut self, value: i64) {
        self.dataset_mut().data.push(value);
    }

    /// Append a value with its colors to the first dataset
    pub fn push_colored(&mut self, value: i64, color: ColorPair) {
        let dataset = self.dataset_mut();
        dataset.data.push(value);
        dataset.background_color.push(color.fill.to_string());
        dataset.border_color.push(color.border.to_string());
    }

    /// Values of the first dataset
    pub fn values(&self) -> &[i64] {
        self.datasets.first().map(|d| d.data.as_slice()).unwrap_or(&[])
    }

    fn dataset_mut(&mut self) -> &mut DataSet {
        if self.datasets.is_empty() {
            self.datasets.push(DataSet::new());
        }
        &mut self.datasets[0]
    }
}
