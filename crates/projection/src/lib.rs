#![forbid(unsafe_code)]

pub mod adjust;
pub mod engine;
pub mod error;
pub mod report;
pub mod vintage;

pub use engine::{ProjectionEngine, Services};
pub use error::Error;
pub use report::{JsonReporter, ProjectionReport, Reporter, TextReporter};
