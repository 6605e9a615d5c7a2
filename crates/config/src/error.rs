#![forbid(unsafe_code)]

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    TomlDe(#[from] toml_edit::de::Error),

    #[error("failed to serialize TOML: {0}")]
    TomlSer(#[from] toml_edit::ser::Error),

    #[error("failed to extract config: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("invalid path: {0}")]
    InvalidPath(PathBuf),

    #[error("at least two vintages are required, got {0}")]
    NotEnoughVintages(usize),

    #[error("target year {target} must lie after base year {base}")]
    InvalidTargetYear { base: i32, target: i32 },

    #[error("correction `{name}` has invalid factor {factor}")]
    InvalidFactor { name: String, factor: f64 },

    #[error("adjustment of group `{group}` has invalid amount {amount}")]
    InvalidAdjustment { group: String, amount: f64 },

    #[error("vintage {0} excludes a facility but no facility is configured")]
    MissingFacility(i32),
}
