//! Location model for the validation sites

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::ValidatorError;

/// A site the moon transit is checked for
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Location {
    /// Display name (city, state)
    pub name: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// IANA timezone identifier, passed verbatim to astrotimes
    pub timezone: String,
}

impl Location {
    /// Create a new location
    #[must_use]
    pub fn new(name: &str, latitude: f64, longitude: f64, timezone: &str) -> Self {
        Self {
            name: name.to_string(),
            latitude,
            longitude,
            timezone: timezone.to_string(),
        }
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }

    /// Parse the timezone identifier
    pub fn tz(&self) -> Result<Tz, ValidatorError> {
        self.timezone.parse::<Tz>().map_err(|_| {
            ValidatorError::validation(format!(
                "{}: unknown timezone '{}'",
                self.name, self.timezone
            ))
        })
    }

    /// Check coordinate ranges and the timezone identifier
    pub fn validate(&self) -> Result<(), ValidatorError> {
        if self.name.trim().is_empty() {
            return Err(ValidatorError::validation("Location name cannot be empty"));
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(ValidatorError::validation(format!(
                "{}: latitude {} outside [-90, 90]",
                self.name, self.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(ValidatorError::validation(format!(
                "{}: longitude {} outside [-180, 180]",
                self.name, self.longitude
            )));
        }
        self.tz()?;
        Ok(())
    }
}

/// The built-in validation sites, in report order.
#[must_use]
pub fn validation_sites() -> Vec<Location> {
    vec![
        Location::new("Sudbury, MA", 42.3834, -71.4162, "America/New_York"),
        Location::new("Miami, FL", 25.7617, -80.1918, "America/New_York"),
        Location::new("Anchorage, AK", 61.2181, -149.9003, "America/Anchorage"),
        Location::new("Seattle, WA", 47.6062, -122.3321, "America/Los_Angeles"),
        Location::new("Denver, CO", 39.7392, -104.9903, "America/Denver"),
        Location::new("Phoenix, AZ", 33.4484, -112.0740, "America/Phoenix"),
        Location::new("New York, NY", 40.7128, -74.0060, "America/New_York"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_validation_sites_order() {
        let names: Vec<String> = validation_sites().into_iter().map(|l| l.name).collect();
        assert_eq!(
            names,
            vec![
                "Sudbury, MA",
                "Miami, FL",
                "Anchorage, AK",
                "Seattle, WA",
                "Denver, CO",
                "Phoenix, AZ",
                "New York, NY",
            ]
        );
    }

    #[test]
    fn test_validation_sites_are_valid() {
        for location in validation_sites() {
            assert!(location.validate().is_ok(), "{} should be valid", location.name);
        }
    }

    #[test]
    fn test_format_coordinates_pads_to_four_places() {
        let location = Location::new("New York, NY", 40.7128, -74.006, "America/New_York");
        assert_eq!(location.format_coordinates(), "40.7128, -74.0060");
    }

    #[test]
    fn test_tz_parses_iana_identifier() {
        let location = Location::new("Phoenix, AZ", 33.4484, -112.074, "America/Phoenix");
        assert_eq!(location.tz().unwrap(), chrono_tz::America::Phoenix);
    }

    #[rstest]
    #[case(Location::new("North", 90.5, 0.0, "UTC"))]
    #[case(Location::new("West", 0.0, -180.1, "UTC"))]
    #[case(Location::new("Nowhere", 0.0, 0.0, "Mars/Olympus_Mons"))]
    #[case(Location::new(" ", 0.0, 0.0, "UTC"))]
    fn test_invalid_locations(#[case] location: Location) {
        let err = location.validate().unwrap_err();
        assert!(matches!(err, ValidatorError::Validation { .. }));
    }
}
