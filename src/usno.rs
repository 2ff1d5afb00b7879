//! U.S. Naval Observatory one-day rise/set/transit API.
//!
//! The report never calls this: verification against USNO stays a manual
//! step. The client is kept as a standalone utility for ad-hoc checks.
//!
//! `GET https://aa.usno.navy.mil/api/rstt/oneday?date=YYYY-MM-DD&coords=<lat>,<lon>&tz=0`
//! answers with a GeoJSON feature whose `properties.data` holds the sun and
//! moon phenomena for that UTC day, times as `HH:MM`.

use std::io::Write;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::config::UsnoConfig;
use crate::error::UsnoError;

/// Phenomenon name USNO uses for a meridian crossing
pub const UPPER_TRANSIT: &str = "Upper Transit";

/// Blocking client for the one-day endpoint
#[derive(Debug)]
pub struct UsnoClient {
    client: Client,
    base_url: String,
}

impl UsnoClient {
    /// Create a new client, rejecting an out-of-range `usno` section
    pub fn new(config: &UsnoConfig) -> Result<Self, UsnoError> {
        config.validate()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("moon-transit-validator/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the raw one-day document for an observer, times in UTC.
    #[instrument(skip(self))]
    pub fn fetch_oneday(
        &self,
        latitude: f64,
        longitude: f64,
        date: NaiveDate,
    ) -> Result<Value, UsnoError> {
        let date = date.format("%Y-%m-%d").to_string();
        let coords = format!("{latitude},{longitude}");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("date", date.as_str()), ("coords", coords.as_str()), ("tz", "0")])
            .send()?;

        let status = response.status();
        if status != StatusCode::OK {
            debug!(%status, "USNO request rejected");
            return Err(UsnoError::Status(status.as_u16()));
        }

        Ok(response.json()?)
    }
}

/// Fetch USNO data, degrading every failure to `None`.
///
/// Failures are written to `out` as `  USNO API error: ...`.
pub fn get_usno_moon_data<W: Write>(
    client: &UsnoClient,
    out: &mut W,
    latitude: f64,
    longitude: f64,
    date: NaiveDate,
) -> Option<Value> {
    match client.fetch_oneday(latitude, longitude, date) {
        Ok(value) => Some(value),
        Err(e) => {
            if let Err(write_err) = writeln!(out, "  USNO API error: {e}") {
                debug!("could not write USNO error: {write_err}");
            }
            None
        }
    }
}

/// Typed view of a one-day response
#[derive(Debug, Deserialize)]
pub struct OneDay {
    properties: Properties,
}

#[derive(Debug, Deserialize)]
struct Properties {
    data: OneDayData,
}

#[derive(Debug, Deserialize)]
pub struct OneDayData {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    /// Offset from UTC in hours the times are expressed in
    #[serde(default)]
    pub tz: f64,
    #[serde(default)]
    pub moondata: Vec<Phenomenon>,
    #[serde(default)]
    pub sundata: Vec<Phenomenon>,
    pub curphase: Option<String>,
    pub fracillum: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Phenomenon {
    pub phen: String,
    pub time: String,
}

impl OneDay {
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }

    pub fn data(&self) -> &OneDayData {
        &self.properties.data
    }

    /// The day the phenomena belong to
    pub fn date(&self) -> Option<NaiveDate> {
        let data = self.data();
        NaiveDate::from_ymd_opt(data.year, data.month, data.day)
    }

    /// Moon upper transit as listed, in the response's own offset
    pub fn moon_transit(&self) -> Option<NaiveTime> {
        self.data()
            .moondata
            .iter()
            .find(|p| p.phen == UPPER_TRANSIT)
            .and_then(|p| NaiveTime::parse_from_str(&p.time, "%H:%M").ok())
    }

    /// Moon upper transit converted to a local zone.
    ///
    /// Only meaningful for responses requested with `tz=0`.
    pub fn moon_transit_in(&self, zone: Tz) -> Option<DateTime<Tz>> {
        let naive = self.date()?.and_time(self.moon_transit()?);
        Some(Utc.from_utc_datetime(&naive).with_timezone(&zone))
    }
}
