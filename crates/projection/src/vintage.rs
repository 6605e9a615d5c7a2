#![forbid(unsafe_code)]

use inventory::{
    EmissionInventory, GroupMapping, Inventory, Pollutant, Totals, Year, aggregate,
    group_categories,
};

/// One year of the pipeline: the inventory, its reconciled group mapping and
/// the totals derived from both.
#[derive(Debug, Clone)]
pub struct Vintage {
    pub inventory: Inventory,
    pub mapping: GroupMapping,
    /// Totals per category.
    pub totals: Totals,
    /// Totals per group.
    pub grouped: Totals,
}

impl Vintage {
    pub fn summarize(
        inventory: Inventory,
        mapping: GroupMapping,
        pollutant: &Pollutant,
    ) -> Result<Self, inventory::Error> {
        let totals = aggregate(&inventory, pollutant);
        let grouped = aggregate(&group_categories(&inventory, &mapping)?, pollutant);
        Ok(Self {
            inventory,
            mapping,
            totals,
            grouped,
        })
    }

    pub fn year(&self) -> Year {
        self.inventory.year()
    }
}
