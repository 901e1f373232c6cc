pub mod chart;
pub mod error;
pub mod fetch;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod query;
pub mod record;
pub mod stats;

pub use error::{QuakeError, Result};
pub use pipeline::{Pipeline, Report, run};
