#![forbid(unsafe_code)]

use crate::share_order::ShareOrder;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Report {
    /// Width of the chart area in columns (clamped to 10..=120).
    pub chart_width: u16,

    /// Decimal places of the percentage tables (clamped to 0..=6).
    pub precision: u8,

    pub order: ShareOrder,

    /// One-off corrections of projected group totals.
    pub adjustments: Vec<Adjustment>,
}

impl Default for Report {
    fn default() -> Self {
        Self {
            chart_width: 40,
            precision: 1,
            order: ShareOrder::default(),
            adjustments: Vec::new(),
        }
    }
}

impl Report {
    pub fn clamp(self) -> Self {
        Self {
            chart_width: self.chart_width.clamp(10, 120),
            precision: self.precision.min(6),
            ..self
        }
    }
}

/// Known emission that disappears in `year` but is not captured by the trend,
/// e.g. a facility closure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Adjustment {
    pub year: i32,
    pub group: String,
    /// Amount subtracted from the group total, in the inventory's unit.
    pub amount: f64,
    #[serde(default)]
    pub reason: Option<String>,
}

impl Adjustment {
    pub fn is_valid(&self) -> bool {
        self.amount.is_finite() && self.amount >= 0.0
    }
}
