#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

/// How the future inventory is derived from the vintages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Projection {
    /// Pollutant the trend is fitted on.
    pub pollutant: String,

    /// Year to extrapolate to. Must lie after the latest vintage.
    pub target_year: i32,

    /// Multipliers undoing known anomalies of the base year.
    pub corrections: Vec<Correction>,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            pollutant: "CO2".into(),
            target_year: 2022,
            corrections: Vec::new(),
        }
    }
}

/// A scalar multiplier applied to a set of categories.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Correction {
    pub name: String,
    pub factor: f64,
    pub categories: Vec<String>,
}

impl Correction {
    pub fn is_valid(&self) -> bool {
        self.factor.is_finite() && self.factor > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_factors() {
        let mut correction = Correction {
            name: "civil".into(),
            factor: 1.1,
            categories: vec!["c1301".into()],
        };
        assert!(correction.is_valid());

        correction.factor = 0.0;
        assert!(!correction.is_valid());
        correction.factor = f64::NAN;
        assert!(!correction.is_valid());
        correction.factor = -2.0;
        assert!(!correction.is_valid());
    }
}
