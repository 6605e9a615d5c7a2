#![forbid(unsafe_code)]

use crate::adjust::apply_adjustments;
use crate::error::Error;
use crate::report::{ProjectionReport, Reporter, YearSummary};
use crate::vintage::Vintage;
use config::Config;
use inventory::{
    Correction, GroupMapping, InventoryLoader, LinearTrend, Pollutant, ScalingFactors, TrendTable,
    VintageChanges, Year, scale_inventory,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub struct Services {
    pub loader: Box<dyn InventoryLoader + Send + Sync>,
    pub reporter: Box<dyn Reporter + Send + Sync>,
}

/// Runs load → reconcile → aggregate → extrapolate → scale → adjust once.
pub struct ProjectionEngine {
    config: Config,
    services: Services,
    base_dir: Option<PathBuf>,
}

impl ProjectionEngine {
    pub fn new(config: Config, services: Services) -> Self {
        Self {
            config,
            services,
            base_dir: None,
        }
    }

    /// Resolve relative vintage paths against `dir` (usually the config
    /// file's directory).
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Execute the whole pipeline and collect the report.
    pub fn run(&self) -> Result<ProjectionReport, Error> {
        let pollutant = Pollutant::new(self.config.projection.pollutant.as_str());
        let base_mapping = GroupMapping::try_from(&self.config.groups)?;
        let target = self.config.projection.target_year;

        let vintages = self
            .config
            .vintages
            .iter()
            .map(|(&year, vintage)| self.load_vintage(year, vintage, &base_mapping, &pollutant))
            .collect::<Result<Vec<_>, _>>()?;

        let (Some(prior), Some(base)) = (self.config.prior_year(), self.config.base_year()) else {
            return Err(Error::NotEnoughVintages(vintages.len()));
        };
        let base_vintage = vintages
            .iter()
            .find(|v| v.year() == base)
            .ok_or(Error::NotEnoughVintages(vintages.len()))?;

        let corrections = self
            .config
            .projection
            .corrections
            .iter()
            .map(Correction::from)
            .collect();
        let trend = LinearTrend::new(prior, base, target, corrections)?;
        let extrapolation = trend.extrapolate(TrendTable::from_totals(
            vintages.iter().map(|v| &v.totals),
        ))?;

        let factors =
            ScalingFactors::new().with_pollutant(pollutant.clone(), extrapolation.ratios.clone());
        let projected = Vintage::summarize(
            scale_inventory(&base_vintage.inventory, &factors, target),
            base_vintage.mapping.clone(),
            &pollutant,
        )?;
        info!(
            base,
            target,
            total = projected.totals.total(),
            "projected inventory"
        );

        let mut summaries = vintages
            .iter()
            .map(|v| YearSummary::from_vintage(v, false))
            .collect::<Vec<_>>();
        summaries.push(YearSummary::from_vintage(&projected, true));

        let adjustments = apply_adjustments(&mut summaries, &self.config.report.adjustments)?;

        Ok(ProjectionReport {
            pollutant,
            summaries,
            extrapolation,
            adjustments,
            projected: projected.inventory,
        })
    }

    /// Render a report with the configured reporter.
    pub fn render(&self, report: &ProjectionReport, out: &mut dyn Write) -> Result<(), Error> {
        self.services.reporter.render(report, out)
    }

    fn load_vintage(
        &self,
        year: Year,
        vintage: &config::Vintage,
        base_mapping: &GroupMapping,
        pollutant: &Pollutant,
    ) -> Result<Vintage, Error> {
        let path = self.resolve(&vintage.path);
        let exclude = if vintage.exclude_facility {
            self.config.facility.as_deref()
        } else {
            None
        };

        let inventory = self.services.loader.load(year, &path, exclude)?;
        let mapping = base_mapping.reconcile(&VintageChanges::from(&vintage.changes))?;
        let vintage = Vintage::summarize(inventory, mapping, pollutant)?;

        debug!(
            year,
            categories = vintage.totals.len(),
            groups = vintage.grouped.len(),
            total = vintage.totals.total(),
            "loaded vintage"
        );
        Ok(vintage)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_owned(),
        }
    }
}
