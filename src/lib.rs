//! Moon transit validation against USNO
//!
//! Runs the astrotimes executable for a set of reference sites, pulls the
//! moon transit out of its output and prints a report for checking the
//! values by hand on the USNO Moon Position calculator.

pub mod astrotimes;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod report;
pub mod time_of_day;
pub mod usno;

// Re-export core types for public API
pub use astrotimes::{AstrotimesRunner, TransitSource, extract_moon_transit};
pub use config::ValidatorConfig;
pub use error::{AstrotimesError, UsnoError, ValidatorError};
pub use models::{Location, TransitResult, validation_sites};
pub use time_of_day::minutes_since_midnight;
pub use usno::{OneDay, UsnoClient, get_usno_moon_data};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
