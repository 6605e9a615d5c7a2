#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, path::PathBuf};

/// One yearly release of the inventory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Vintage {
    /// Path to the inventory export of this year.
    pub path: PathBuf,

    /// Drop records of the configured facility while loading.
    pub exclude_facility: bool,

    pub changes: CategoryChanges,
}

/// Category churn of a vintage relative to the base group mapping.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct CategoryChanges {
    /// Categories appended to a group, keyed by group.
    pub add: BTreeMap<String, Vec<String>>,

    /// Categories removed from a group, keyed by group.
    pub remove: BTreeMap<String, Vec<String>>,

    /// Groups removed entirely.
    pub drop_groups: Vec<String>,
}

impl CategoryChanges {
    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty() && self.drop_groups.is_empty()
    }
}
