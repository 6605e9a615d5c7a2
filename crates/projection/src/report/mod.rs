#![forbid(unsafe_code)]

mod chart;
mod json;
mod text;
mod types;

pub use json::JsonReporter;
pub use text::TextReporter;
pub use types::{AppliedAdjustment, ProjectionReport, YearSummary};

use crate::error::Error;
use std::io::Write;

pub trait Reporter {
    /// Write the report to `out`.
    fn render(&self, report: &ProjectionReport, out: &mut dyn Write) -> Result<(), Error>;
}
