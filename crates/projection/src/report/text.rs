#![forbid(unsafe_code)]

use super::chart::{bars, sparkline};
use super::{ProjectionReport, Reporter};
use crate::error::Error;
use config::ShareOrder;
use inventory::{Category, TONNES_PER_KILOTONNE as KT, TOTAL_KEY};
use itertools::Itertools;
use std::io::Write;

const TOTAL_LABEL: &str = "total [kt]";

/// Human-readable tables and unicode charts.
#[derive(Debug, Clone)]
pub struct TextReporter {
    chart_width: u16,
    precision: usize,
    order: ShareOrder,
}

impl TextReporter {
    pub fn new(config: &config::Report) -> Self {
        let config = config.clone().clamp();
        Self {
            chart_width: config.chart_width,
            precision: usize::from(config.precision),
            order: config.order,
        }
    }

    fn ordered_groups<'a>(&self, report: &'a ProjectionReport) -> Vec<&'a Category> {
        let groups = report.group_names().into_iter();
        match self.order {
            ShareOrder::Name => groups.collect(),
            ShareOrder::Share => {
                let latest = report.summaries.last();
                let share = |g: &Category| {
                    latest
                        .and_then(|s| s.groups.share(g.as_str()))
                        .unwrap_or(0.0)
                };
                groups
                    .sorted_by(|a, b| share(*b).total_cmp(&share(*a)))
                    .collect()
            }
        }
    }

    fn shares(&self, report: &ProjectionReport, out: &mut dyn Write) -> Result<(), Error> {
        let groups = self.ordered_groups(report);
        let width = name_width(groups.iter().copied()).max(TOTAL_LABEL.len());
        let prec = self.precision;

        writeln!(out, "{} share per group [%]", report.pollutant)?;
        write!(out, "{:<width$}", "group")?;
        for summary in &report.summaries {
            write!(out, " {:>10}", summary.label())?;
        }
        writeln!(out)?;

        for group in groups {
            write!(out, "{group:<width$}")?;
            for summary in &report.summaries {
                match summary.groups.share(group.as_str()) {
                    Some(share) => write!(out, " {share:>10.prec$}")?,
                    None => write!(out, " {:>10}", "-")?,
                }
            }
            writeln!(out)?;
        }

        write!(out, "{TOTAL_LABEL:<width$}")?;
        for summary in &report.summaries {
            let total = summary.groups.get(TOTAL_KEY).unwrap_or(0.0) / KT;
            write!(out, " {total:>10.prec$}")?;
        }
        writeln!(out)?;

        if report.summaries.iter().any(|s| s.projected) {
            writeln!(out, "* projected")?;
        }
        writeln!(out)?;
        Ok(())
    }

    fn adjustments(&self, report: &ProjectionReport, out: &mut dyn Write) -> Result<(), Error> {
        if report.adjustments.is_empty() {
            return Ok(());
        }
        writeln!(out, "Adjustments")?;
        for adj in &report.adjustments {
            let reason = adj
                .reason
                .as_deref()
                .map(|r| format!(" ({r})"))
                .unwrap_or_default();
            writeln!(
                out,
                "  {} {}: -{:.1} kt{reason}",
                adj.year,
                adj.group,
                adj.removed / KT
            )?;
        }
        writeln!(out)?;
        Ok(())
    }

    /// One line per category: a sparkline over the years, then the values.
    fn category_chart(&self, report: &ProjectionReport, out: &mut dyn Write) -> Result<(), Error> {
        let categories = report.category_names();
        let width = name_width(categories.iter().copied());
        let spark_width = report.summaries.len();

        writeln!(out, "Category totals [kt]")?;
        write!(out, "{:<width$} {:spark_width$}", "category", "")?;
        for summary in &report.summaries {
            write!(out, " {:>10}", summary.label())?;
        }
        writeln!(out)?;

        for category in categories {
            let values = report
                .summaries
                .iter()
                .map(|s| s.categories.get(category.as_str()))
                .collect::<Vec<_>>();
            let line = sparkline(&values);

            write!(out, "{category:<width$} {line}")?;
            for value in values {
                match value {
                    Some(v) => write!(out, " {:>10.1}", v / KT)?,
                    None => write!(out, " {:>10}", "-")?,
                }
            }
            writeln!(out)?;
        }
        writeln!(out)?;
        Ok(())
    }

    /// Bars per group and year, all on one scale.
    fn group_chart(&self, report: &ProjectionReport, out: &mut dyn Write) -> Result<(), Error> {
        let max = report
            .summaries
            .iter()
            .flat_map(|s| s.groups.entries().values())
            .copied()
            .fold(0.0_f64, f64::max);

        writeln!(out, "Group totals [kt]")?;
        for group in self.ordered_groups(report) {
            writeln!(out, "{group}")?;
            let rows = report
                .summaries
                .iter()
                .filter_map(|s| Some((s.label(), s.groups.get(group.as_str())?)))
                .collect::<Vec<_>>();
            let lines = bars(&rows, max, self.chart_width);
            for (line, (_, value)) in lines.iter().zip(&rows) {
                writeln!(out, "  {line} {:>10.1}", value / KT)?;
            }
        }
        Ok(())
    }
}

impl Reporter for TextReporter {
    fn render(&self, report: &ProjectionReport, out: &mut dyn Write) -> Result<(), Error> {
        self.shares(report, out)?;
        self.adjustments(report, out)?;
        self.category_chart(report, out)?;
        self.group_chart(report, out)?;
        out.flush()?;
        Ok(())
    }
}

fn name_width<'a>(names: impl Iterator<Item = &'a Category>) -> usize {
    names.map(|n| n.as_str().chars().count()).max().unwrap_or(0)
}
