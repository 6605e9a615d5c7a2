pub mod cli;
pub mod error;
pub mod export;

pub use error::Error;
