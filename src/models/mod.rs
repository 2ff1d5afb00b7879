//! Data models for the moon transit validator
//!
//! - Location: a validation site and the built-in site table
//! - Transit: the per-location result collected by the report

pub mod location;
pub mod transit;

pub use location::{Location, validation_sites};
pub use transit::TransitResult;
