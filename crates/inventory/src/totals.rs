use crate::{Category, EmissionInventory, Pollutant, Year};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Key of the synthetic entry holding the sum of all other entries.
pub const TOTAL_KEY: &str = "__total__";

/// Total emission of one pollutant per category (or group) for one year.
///
/// The `__total__` entry is kept separately and always equals the sum of the
/// per-category entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Totals {
    pub year: Year,
    pub pollutant: Pollutant,
    entries: BTreeMap<Category, f64>,
    total: f64,
}

impl Totals {
    pub fn new(year: Year, pollutant: Pollutant, entries: BTreeMap<Category, f64>) -> Self {
        let total = entries.values().sum();
        Self {
            year,
            pollutant,
            entries,
            total,
        }
    }

    /// Look up an entry. `__total__` resolves to the overall total.
    pub fn get(&self, key: &str) -> Option<f64> {
        if key == TOTAL_KEY {
            Some(self.total)
        } else {
            self.entries.get(key).copied()
        }
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    /// Per-category entries, without `__total__`.
    pub fn entries(&self) -> &BTreeMap<Category, f64> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Share of `key` in the overall total, in percent.
    pub fn share(&self, key: &str) -> Option<f64> {
        let value = self.get(key)?;
        (self.total != 0.0).then(|| value / self.total * 100.0)
    }

    /// Subtract `amount` from one entry, clipping at zero, and return the
    /// amount actually removed.
    pub fn subtract(&mut self, key: &str, amount: f64) -> Option<f64> {
        let value = self.entries.get_mut(key)?;
        let removed = amount.min(*value).max(0.0);
        if removed < amount {
            warn!(key, amount, available = *value, "subtraction clipped at zero");
        }
        *value -= removed;
        self.total = self.entries.values().sum();
        Some(removed)
    }
}

/// Sum the emissions of `pollutant` per category.
///
/// Categories without any record of the pollutant are absent from the result.
pub fn aggregate(inv: &impl EmissionInventory, pollutant: &Pollutant) -> Totals {
    let mut entries: BTreeMap<Category, f64> = BTreeMap::new();
    for record in inv.records().iter().filter(|r| &r.pollutant == pollutant) {
        *entries.entry(record.category.clone()).or_insert(0.0) += record.value;
    }
    let totals = Totals::new(inv.year(), pollutant.clone(), entries);
    debug!(
        year = totals.year,
        %pollutant,
        categories = totals.len(),
        total = totals.total(),
        "aggregated inventory"
    );
    totals
}
