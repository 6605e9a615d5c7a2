#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

/// Row order of the percentage tables.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ShareOrder {
    /// Alphabetical by group name.
    Name,
    /// Largest share first.
    #[default]
    Share,
}
