use crate::{Category, Error, Pollutant, Year};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A single emission value, in tonnes per year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionRecord {
    pub category: Category,
    pub pollutant: Pollutant,
    pub value: f64,

    /// Grid cell of area sources. `None` for totals that are not geo-located.
    #[serde(default)]
    pub cell: Option<u64>,

    /// Emitting facility of point sources.
    #[serde(default)]
    pub facility: Option<String>,
}

impl EmissionRecord {
    pub fn new(category: impl Into<Category>, pollutant: impl Into<Pollutant>, value: f64) -> Self {
        Self {
            category: category.into(),
            pollutant: pollutant.into(),
            value,
            cell: None,
            facility: None,
        }
    }

    pub fn with_cell(mut self, cell: u64) -> Self {
        self.cell = Some(cell);
        self
    }

    pub fn with_facility(mut self, facility: impl Into<String>) -> Self {
        self.facility = Some(facility.into());
        self
    }
}

/// Read access to one year of an emission inventory.
///
/// Grouping, scaling and aggregation are built on top of this trait, so any
/// inventory backend only has to expose its records.
pub trait EmissionInventory {
    fn year(&self) -> Year;

    fn records(&self) -> &[EmissionRecord];

    fn categories(&self) -> BTreeSet<&Category> {
        self.records().iter().map(|r| &r.category).collect()
    }

    fn pollutants(&self) -> BTreeSet<&Pollutant> {
        self.records().iter().map(|r| &r.pollutant).collect()
    }
}

/// In-memory inventory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inventory {
    year: Year,
    records: Vec<EmissionRecord>,
}

impl Inventory {
    /// Build an inventory, rejecting non-finite values.
    pub fn new(year: Year, records: Vec<EmissionRecord>) -> Result<Self, Error> {
        if let Some(bad) = records.iter().find(|r| !r.value.is_finite()) {
            return Err(Error::InvalidValue {
                category: bad.category.clone(),
                pollutant: bad.pollutant.to_string(),
            });
        }
        Ok(Self::from_parts(year, records))
    }

    pub(crate) fn from_parts(year: Year, records: Vec<EmissionRecord>) -> Self {
        Self { year, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl EmissionInventory for Inventory {
    fn year(&self) -> Year {
        self.year
    }

    fn records(&self) -> &[EmissionRecord] {
        &self.records
    }
}
