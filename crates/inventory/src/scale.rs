use crate::{Category, EmissionInventory, EmissionRecord, Inventory, Pollutant, Year};
use std::collections::BTreeMap;
use tracing::debug;

/// Per-pollutant, per-category multipliers. Anything not listed scales by 1.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScalingFactors {
    factors: BTreeMap<Pollutant, BTreeMap<Category, f64>>,
}

impl ScalingFactors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pollutant(mut self, pollutant: Pollutant, ratios: BTreeMap<Category, f64>) -> Self {
        self.factors.insert(pollutant, ratios);
        self
    }

    pub fn factor(&self, pollutant: &Pollutant, category: &Category) -> f64 {
        self.factors
            .get(pollutant)
            .and_then(|ratios| ratios.get(category))
            .copied()
            .unwrap_or(1.0)
    }
}

/// Multiply every record by its factor and stamp the result with `year`.
pub fn scale_inventory(
    inv: &impl EmissionInventory,
    factors: &ScalingFactors,
    year: Year,
) -> Inventory {
    let records: Vec<EmissionRecord> = inv
        .records()
        .iter()
        .map(|record| EmissionRecord {
            value: record.value * factors.factor(&record.pollutant, &record.category),
            ..record.clone()
        })
        .collect();
    debug!(from = inv.year(), to = year, records = records.len(), "scaled inventory");
    Inventory::from_parts(year, records)
}
