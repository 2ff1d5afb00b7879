//! Per-location outcome of a report run

use serde::{Deserialize, Serialize};

use super::Location;

/// Transit lookup result for one location
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TransitResult {
    /// Location name
    pub location: String,
    /// Moon transit as reported by astrotimes (`HH:MM:SS`), if any
    pub astro_time: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl TransitResult {
    #[must_use]
    pub fn new(location: &Location, astro_time: Option<String>) -> Self {
        Self {
            location: location.name.clone(),
            astro_time,
            latitude: location.latitude,
            longitude: location.longitude,
        }
    }

    /// Transit time for the summary table; `None` when astrotimes gave nothing
    #[must_use]
    pub fn format_transit(&self) -> &str {
        self.astro_time.as_deref().unwrap_or("None")
    }
}
