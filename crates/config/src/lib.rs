#![forbid(unsafe_code)]

mod error;
mod projection;
mod report;
mod share_order;
mod vintage;

pub use error::Error;
pub use projection::{Correction, Projection};
pub use report::{Adjustment, Report};
pub use share_order::ShareOrder;
pub use vintage::{CategoryChanges, Vintage};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};
use std::{collections::BTreeMap, path::Path};

/// Prefix of environment variables overriding file values, e.g.
/// `EMITREND_PROJECTION__TARGET_YEAR=2025`.
pub const ENV_PREFIX: &str = "EMITREND_";

#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub projection: Projection,

    /// Facility dropped from vintages with `exclude_facility = true`.
    pub facility: Option<String>,

    /// Base mapping from group name to its member categories.
    pub groups: BTreeMap<String, Vec<String>>,

    #[serde_as(as = "BTreeMap<DisplayFromStr, _>")]
    pub vintages: BTreeMap<i32, Vintage>,

    pub report: Report,
}

impl Config {
    /// A loadable starting point: the defaults plus one group and the two
    /// vintages a projection needs.
    pub fn template() -> Self {
        let vintage = |year: i32| Vintage {
            path: format!("inventory_{year}.csv").into(),
            ..Vintage::default()
        };
        let target = Projection::default().target_year;
        Self {
            groups: BTreeMap::from([(
                "GNFR_A".to_owned(),
                vec!["public_power".to_owned()],
            )]),
            vintages: [target - 7, target - 2]
                .into_iter()
                .map(|year| (year, vintage(year)))
                .collect(),
            ..Self::default()
        }
    }

    /// Load the config file at `path`, layered over the defaults and under
    /// `EMITREND_` environment variables.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::InvalidPath(path.to_owned()));
        }

        let config: Self = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(Box::new)?;

        config.validate()
    }

    /// Parse a config from TOML text without consulting the environment.
    pub fn from_toml_str(text: &str) -> Result<Self, Error> {
        let config: Self = toml_edit::de::from_str(text)?;
        config.validate()
    }

    pub fn to_toml_string(&self) -> Result<String, Error> {
        Ok(toml_edit::ser::to_string_pretty(self)?)
    }

    /// Latest configured vintage.
    pub fn base_year(&self) -> Option<i32> {
        self.vintages.keys().next_back().copied()
    }

    /// Latest vintage before the base year.
    pub fn prior_year(&self) -> Option<i32> {
        self.vintages.keys().rev().nth(1).copied()
    }

    fn validate(mut self) -> Result<Self, Error> {
        let (Some(base), Some(_)) = (self.base_year(), self.prior_year()) else {
            return Err(Error::NotEnoughVintages(self.vintages.len()));
        };

        let target = self.projection.target_year;
        if target <= base {
            return Err(Error::InvalidTargetYear { base, target });
        }

        if let Some(bad) = self.projection.corrections.iter().find(|c| !c.is_valid()) {
            return Err(Error::InvalidFactor {
                name: bad.name.clone(),
                factor: bad.factor,
            });
        }

        if let Some(bad) = self.report.adjustments.iter().find(|a| !a.is_valid()) {
            return Err(Error::InvalidAdjustment {
                group: bad.group.clone(),
                amount: bad.amount,
            });
        }

        if self.facility.is_none()
            && let Some((year, _)) = self.vintages.iter().find(|(_, v)| v.exclude_facility)
        {
            return Err(Error::MissingFacility(*year));
        }

        self.report = self.report.clamp();
        Ok(self)
    }
}
