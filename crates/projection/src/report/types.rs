#![forbid(unsafe_code)]

use crate::vintage::Vintage;
use inventory::{Category, Extrapolation, Inventory, Pollutant, Totals, Year};
use serde::Serialize;
use std::collections::BTreeSet;

/// Category and group totals of one year.
#[derive(Debug, Clone, Serialize)]
pub struct YearSummary {
    pub year: Year,
    /// Whether the year was extrapolated rather than loaded.
    pub projected: bool,
    pub categories: Totals,
    pub groups: Totals,
}

impl YearSummary {
    pub fn from_vintage(vintage: &Vintage, projected: bool) -> Self {
        Self {
            year: vintage.year(),
            projected,
            categories: vintage.totals.clone(),
            groups: vintage.grouped.clone(),
        }
    }

    pub fn label(&self) -> String {
        if self.projected {
            format!("{}*", self.year)
        } else {
            self.year.to_string()
        }
    }
}

/// An adjustment as it was applied to a group total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppliedAdjustment {
    pub year: Year,
    pub group: Category,
    pub requested: f64,
    /// Amount actually removed, after clipping at zero.
    pub removed: f64,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectionReport {
    pub pollutant: Pollutant,
    /// Loaded vintages in year order, followed by the projected year.
    pub summaries: Vec<YearSummary>,
    pub extrapolation: Extrapolation,
    pub adjustments: Vec<AppliedAdjustment>,
    #[serde(skip)]
    pub projected: Inventory,
}

impl ProjectionReport {
    pub fn summary(&self, year: Year) -> Option<&YearSummary> {
        self.summaries.iter().find(|s| s.year == year)
    }

    /// Groups appearing in any year.
    pub fn group_names(&self) -> BTreeSet<&Category> {
        self.summaries
            .iter()
            .flat_map(|s| s.groups.entries().keys())
            .collect()
    }

    /// Categories appearing in any year.
    pub fn category_names(&self) -> BTreeSet<&Category> {
        self.summaries
            .iter()
            .flat_map(|s| s.categories.entries().keys())
            .collect()
    }
}
