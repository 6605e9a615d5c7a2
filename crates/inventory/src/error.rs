use crate::{Category, Year};
use std::path::PathBuf;

/// Represents all possible errors that can occur in this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Error occurred while reading or writing an inventory file.
    #[error("Failed to access inventory file: {0}")]
    FileAccessFailed(#[from] std::io::Error),

    /// Error occurred while parsing or writing CSV records.
    #[error("Malformed inventory CSV: {0}")]
    CsvFailed(#[from] csv::Error),

    /// The path is invalid.
    #[error("Path is invalid: {0}")]
    InvalidPath(PathBuf),

    /// A record carries a value that is not a finite number.
    #[error("Record {category}/{pollutant} has non-finite value")]
    InvalidValue { category: Category, pollutant: String },

    /// A group referenced by a change or adjustment does not exist.
    #[error("Group does not exist: {0}")]
    UnknownGroup(Category),

    /// A category slated for removal is not a member of its group.
    #[error("Category {category} is not a member of group {group}")]
    CategoryNotInGroup { group: Category, category: Category },

    /// A category would end up in a group twice, or in two groups.
    #[error("Category {0} is already grouped")]
    DuplicateCategory(Category),

    /// An inventory category is not covered by the group mapping.
    ///
    /// # See Also
    ///
    /// [`GroupMapping::validate`](crate::GroupMapping::validate)
    #[error("Category {0} is not assigned to any group")]
    UngroupedCategory(Category),

    /// The group mapping references a category the inventory lacks.
    #[error("Category {category} of group {group} is not in the inventory")]
    UnmappedCategory { group: Category, category: Category },

    /// A correction references a category without base-year emissions.
    #[error("Correction {correction} references unknown category {category}")]
    UnknownCategory {
        correction: String,
        category: Category,
    },

    /// The trend table lacks a row for the year.
    #[error("No totals for year {0}")]
    MissingYear(Year),

    /// Extrapolation needs a prior year strictly before the base year.
    #[error("Prior year {prior} must lie before base year {base}")]
    InvalidYears { prior: Year, base: Year },

    /// A scaling ratio came out as NaN or infinite.
    #[error("Scaling ratio for {0} is not finite")]
    NonFiniteRatio(Category),
}
