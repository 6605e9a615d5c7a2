use crate::{Category, Error, Totals, Year};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Raw totals are divided by this to get kilotonnes.
pub const TONNES_PER_KILOTONNE: f64 = 1000.0;

/// A multiplier undoing a known anomaly of the base year, e.g. reduced
/// traffic during the pandemic.
#[derive(Debug, Clone, PartialEq)]
pub struct Correction {
    pub name: String,
    pub factor: f64,
    pub categories: Vec<Category>,
}

impl From<&config::Correction> for Correction {
    fn from(correction: &config::Correction) -> Self {
        Self {
            name: correction.name.clone(),
            factor: correction.factor,
            categories: correction
                .categories
                .iter()
                .map(|c| Category::new(c.as_str()))
                .collect(),
        }
    }
}

/// Category totals in kilotonnes, indexed by year.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrendTable {
    rows: BTreeMap<Year, BTreeMap<Category, f64>>,
}

impl TrendTable {
    /// Build the table from per-year totals. `__total__` is not a column.
    pub fn from_totals<'a>(totals: impl IntoIterator<Item = &'a Totals>) -> Self {
        let rows = totals
            .into_iter()
            .map(|t| {
                let row = t
                    .entries()
                    .iter()
                    .map(|(c, v)| (c.clone(), v / TONNES_PER_KILOTONNE))
                    .collect();
                (t.year, row)
            })
            .collect();
        Self { rows }
    }

    pub fn get(&self, year: Year, category: &str) -> Option<f64> {
        self.rows.get(&year)?.get(category).copied()
    }

    pub fn row(&self, year: Year) -> Option<&BTreeMap<Category, f64>> {
        self.rows.get(&year)
    }
}

/// Result of a trend extrapolation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Extrapolation {
    pub prior_year: Year,
    pub base_year: Year,
    pub target_year: Year,

    /// Input rows (base year corrected) plus the projected target row.
    pub table: TrendTable,

    /// Per-category factor turning base-year emissions into target-year ones.
    pub ratios: BTreeMap<Category, f64>,
}

/// Two-point linear trend from a prior year through a base year.
#[derive(Debug, Clone)]
pub struct LinearTrend {
    prior_year: Year,
    base_year: Year,
    target_year: Year,
    corrections: Vec<Correction>,
}

impl LinearTrend {
    pub fn new(
        prior_year: Year,
        base_year: Year,
        target_year: Year,
        corrections: Vec<Correction>,
    ) -> Result<Self, Error> {
        if prior_year >= base_year {
            return Err(Error::InvalidYears {
                prior: prior_year,
                base: base_year,
            });
        }
        Ok(Self {
            prior_year,
            base_year,
            target_year,
            corrections,
        })
    }

    /// Project `target_year` and derive the scaling ratios.
    pub fn extrapolate(&self, mut table: TrendTable) -> Result<Extrapolation, Error> {
        let (prior, base, target) = (self.prior_year, self.base_year, self.target_year);

        // Remove the anomaly from the base year before fitting.
        {
            let base_row = table.rows.get_mut(&base).ok_or(Error::MissingYear(base))?;
            for correction in &self.corrections {
                for category in &correction.categories {
                    let value =
                        base_row
                            .get_mut(category)
                            .ok_or_else(|| Error::UnknownCategory {
                                correction: correction.name.clone(),
                                category: category.clone(),
                            })?;
                    *value *= correction.factor;
                }
            }
        }

        let base_row = table.row(base).ok_or(Error::MissingYear(base))?;
        let prior_row = table.row(prior).ok_or(Error::MissingYear(prior))?;

        let mut projected = BTreeMap::new();
        for (category, &base_value) in base_row {
            let value = match prior_row.get(category) {
                Some(&prior_value) => {
                    base_value
                        + (base_value - prior_value) / (f64::from(base) - f64::from(prior))
                            * (f64::from(target) - f64::from(base))
                }
                None => {
                    debug!(%category, prior, "no history, keeping base value");
                    base_value
                }
            };
            let value = if value < 0.0 {
                warn!(%category, value, "negative projection clipped to zero");
                0.0
            } else {
                value
            };
            projected.insert(category.clone(), value);
        }

        for category in prior_row.keys().filter(|c| !base_row.contains_key(*c)) {
            debug!(%category, base, "category absent in base year, not projected");
        }

        let mut ratios = BTreeMap::new();
        for (category, &future) in &projected {
            let base_value = base_row[category];
            let ratio = if base_value == 0.0 && future == 0.0 {
                1.0
            } else {
                future / base_value
            };
            if !ratio.is_finite() {
                return Err(Error::NonFiniteRatio(category.clone()));
            }
            ratios.insert(category.clone(), ratio);
        }

        // The target year is not an anomaly year, so the correction removed
        // from the base year is restored in the ratios.
        for correction in &self.corrections {
            for category in &correction.categories {
                if let Some(ratio) = ratios.get_mut(category) {
                    *ratio *= correction.factor;
                }
            }
        }

        debug!(
            prior,
            base,
            target,
            categories = projected.len(),
            "extrapolated trend"
        );
        table.rows.insert(target, projected);

        Ok(Extrapolation {
            prior_year: prior,
            base_year: base,
            target_year: target,
            table,
            ratios,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Pollutant;
    use proptest::prelude::*;

    fn totals(year: Year, entries: &[(&str, f64)]) -> Totals {
        Totals::new(
            year,
            Pollutant::from("CO2"),
            entries.iter().map(|(c, v)| (Category::from(*c), *v)).collect(),
        )
    }

    fn table(prior: &[(&str, f64)], base: &[(&str, f64)]) -> TrendTable {
        TrendTable::from_totals(&[totals(2015, prior), totals(2020, base)])
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn extrapolates_linearly() {
        let trend = LinearTrend::new(2015, 2020, 2022, Vec::new()).unwrap();
        let result = trend
            .extrapolate(table(&[("cars", 100_000.0)], &[("cars", 120_000.0)]))
            .unwrap();

        assert!(close(result.table.get(2022, "cars").unwrap(), 128.0));
        assert!(close(result.ratios["cars"], 128.0 / 120.0));
    }

    #[test]
    fn year_span_wider_than_i32() {
        let trend = LinearTrend::new(i32::MIN, 0, i32::MAX, Vec::new()).unwrap();
        let table = TrendTable::from_totals(&[
            totals(i32::MIN, &[("cars", 100_000.0)]),
            totals(0, &[("cars", 120_000.0)]),
        ]);
        let result = trend.extrapolate(table).unwrap();

        let projected = result.table.get(i32::MAX, "cars").unwrap();
        assert!((projected - 140.0).abs() < 1e-6);
    }

    #[test]
    fn clips_negative_projection_to_zero() {
        let trend = LinearTrend::new(2015, 2020, 2030, Vec::new()).unwrap();
        let result = trend
            .extrapolate(table(&[("oil", 50_000.0)], &[("oil", 10_000.0)]))
            .unwrap();

        assert_eq!(result.table.get(2030, "oil"), Some(0.0));
        assert_eq!(result.ratios["oil"], 0.0);
    }

    #[test]
    fn falls_back_to_base_without_history() {
        let trend = LinearTrend::new(2015, 2020, 2022, Vec::new()).unwrap();
        let result = trend
            .extrapolate(table(&[("cars", 1.0)], &[("cars", 1.0), ("e_bikes", 4_000.0)]))
            .unwrap();

        assert_eq!(result.table.get(2022, "e_bikes"), Some(4.0));
        assert_eq!(result.ratios["e_bikes"], 1.0);
    }

    #[test]
    fn skips_categories_dropped_in_base_year() {
        let trend = LinearTrend::new(2015, 2020, 2022, Vec::new()).unwrap();
        let result = trend
            .extrapolate(table(&[("coal", 5_000.0), ("gas", 1.0)], &[("gas", 1.0)]))
            .unwrap();

        assert_eq!(result.table.get(2022, "coal"), None);
        assert!(!result.ratios.contains_key("coal"));
    }

    #[test]
    fn zero_baseline_keeps_unit_ratio() {
        let trend = LinearTrend::new(2015, 2020, 2022, Vec::new()).unwrap();
        let result = trend
            .extrapolate(table(&[("x", 3_000.0)], &[("x", 0.0)]))
            .unwrap();
        assert_eq!(result.ratios["x"], 1.0);
    }

    #[test]
    fn correction_is_undone_then_restored() {
        let civil = Correction {
            name: "civil".into(),
            factor: 1.1,
            categories: vec!["cars".into()],
        };
        let trend = LinearTrend::new(2015, 2020, 2022, vec![civil]).unwrap();
        let result = trend
            .extrapolate(table(
                &[("cars", 100_000.0), ("ships", 10_000.0)],
                &[("cars", 90_000.0), ("ships", 10_000.0)],
            ))
            .unwrap();

        // 90 kt corrected to 99 kt, then 99 + (99 - 100) / 5 * 2
        assert!(close(result.table.get(2020, "cars").unwrap(), 99.0));
        assert!(close(result.table.get(2022, "cars").unwrap(), 98.6));
        // scaling the uncorrected 90 kt lands on the projection
        assert!(close(90.0 * result.ratios["cars"], 98.6));
        assert_eq!(result.ratios["ships"], 1.0);
    }

    #[test]
    fn correction_of_unknown_category_fails() {
        let bogus = Correction {
            name: "heavy".into(),
            factor: 1.05,
            categories: vec!["zeppelins".into()],
        };
        let trend = LinearTrend::new(2015, 2020, 2022, vec![bogus]).unwrap();
        let err = trend
            .extrapolate(table(&[("cars", 1.0)], &[("cars", 1.0)]))
            .unwrap_err();
        assert!(matches!(err, Error::UnknownCategory { category, .. } if category.as_str() == "zeppelins"));
    }

    #[test]
    fn missing_year_and_bad_order_fail() {
        assert!(matches!(
            LinearTrend::new(2020, 2015, 2022, Vec::new()),
            Err(Error::InvalidYears { .. })
        ));

        let trend = LinearTrend::new(2010, 2020, 2022, Vec::new()).unwrap();
        assert!(matches!(
            trend.extrapolate(table(&[("a", 1.0)], &[("a", 1.0)])),
            Err(Error::MissingYear(2010))
        ));
    }

    proptest! {
        #[test]
        fn projections_are_never_negative(
            prior in 0.0f64..1e6,
            base in 1.0f64..1e6,
            target in 2021i32..2060,
        ) {
            let trend = LinearTrend::new(2015, 2020, target, Vec::new()).unwrap();
            let result = trend.extrapolate(table(&[("a", prior)], &[("a", base)])).unwrap();
            let projected = result.table.get(target, "a").unwrap();
            prop_assert!(projected >= 0.0);
            prop_assert!(result.ratios["a"].is_finite());
        }
    }
}
