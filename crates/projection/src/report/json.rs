#![forbid(unsafe_code)]

use super::{ProjectionReport, Reporter};
use crate::error::Error;
use std::io::Write;

/// Machine-readable report: totals, trend table, ratios and adjustments.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReporter;

impl Reporter for JsonReporter {
    fn render(&self, report: &ProjectionReport, out: &mut dyn Write) -> Result<(), Error> {
        serde_json::to_writer_pretty(&mut *out, report)?;
        writeln!(out)?;
        out.flush()?;
        Ok(())
    }
}
