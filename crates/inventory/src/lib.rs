//! Emission inventories and the arithmetic performed on them: category
//! regrouping, per-pollutant totals, linear trend extrapolation and scaling.

mod category;
mod error;
pub mod groups;
pub mod io;
mod inventory;
pub mod scale;
pub mod totals;
pub mod trend;

pub use category::{Category, Pollutant, Year};
pub use error::Error;
pub use groups::{GroupMapping, VintageChanges, group_categories};
pub use inventory::{EmissionInventory, EmissionRecord, Inventory};
pub use io::{CsvInventoryLoader, InventoryLoader, write_csv};
pub use scale::{ScalingFactors, scale_inventory};
pub use totals::{TOTAL_KEY, Totals, aggregate};
pub use trend::{Correction, Extrapolation, LinearTrend, TONNES_PER_KILOTONNE, TrendTable};
