#![forbid(unsafe_code)]

use crate::error::Error;
use crate::report::{AppliedAdjustment, YearSummary};
use inventory::Category;
use tracing::info;

/// Subtract one-off amounts (e.g. a closed facility) from group totals.
///
/// Each adjustment must name a year present in `summaries` and a group of that
/// year. Results are clipped at zero and the year's total is recomputed.
pub fn apply_adjustments(
    summaries: &mut [YearSummary],
    adjustments: &[config::Adjustment],
) -> Result<Vec<AppliedAdjustment>, Error> {
    let mut applied = Vec::with_capacity(adjustments.len());

    for adj in adjustments {
        let summary = summaries
            .iter_mut()
            .find(|s| s.year == adj.year)
            .ok_or(Error::AdjustmentYear(adj.year))?;
        let group = Category::new(adj.group.as_str());
        let removed = summary
            .groups
            .subtract(group.as_str(), adj.amount)
            .ok_or_else(|| inventory::Error::UnknownGroup(group.clone()))?;

        info!(
            year = adj.year,
            %group,
            removed,
            reason = adj.reason.as_deref().unwrap_or(""),
            "applied adjustment"
        );

        applied.push(AppliedAdjustment {
            year: adj.year,
            group,
            requested: adj.amount,
            removed,
            reason: adj.reason.clone(),
        });
    }

    Ok(applied)
}
