//! The manual-verification report.
//!
//! For every location the astrotimes transit is printed next to the USNO
//! Moon Position page and the parameters to enter there, followed by a
//! summary table. A failed lookup never stops the run; it just shows up as
//! `None` in the summary.

use std::io::{self, Write};

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::astrotimes::TransitSource;
use crate::error::{AstrotimesError, ValidatorError};
use crate::models::{Location, TransitResult};

/// USNO calculator used for the manual check
pub const MOON_POSITION_URL: &str = "https://aa.usno.navy.mil/data/MoonPosition";

const BANNER_WIDTH: usize = 70;
const NAME_WIDTH: usize = 20;

/// Print the full report and return the per-location results in input order.
pub fn run<W, S>(
    out: &mut W,
    source: &S,
    locations: &[Location],
    today: NaiveDate,
) -> io::Result<Vec<TransitResult>>
where
    W: Write,
    S: TransitSource + ?Sized,
{
    let today = today.format("%Y-%m-%d").to_string();

    write_header(out, &today)?;

    let mut results = Vec::with_capacity(locations.len());
    for location in locations {
        results.push(check_location(out, source, location, &today)?);
    }

    write_summary(out, &results)?;
    Ok(results)
}

/// [`run`] followed by a flush, for writing straight to a terminal or pipe.
pub fn print<W, S>(
    out: &mut W,
    source: &S,
    locations: &[Location],
    today: NaiveDate,
) -> Result<Vec<TransitResult>, ValidatorError>
where
    W: Write,
    S: TransitSource + ?Sized,
{
    let results = run(out, source, locations, today)?;
    out.flush()?;
    Ok(results)
}

fn write_header<W: Write>(out: &mut W, today: &str) -> io::Result<()> {
    let banner = "=".repeat(BANNER_WIDTH);
    writeln!(out, "{banner}")?;
    writeln!(out, "Moon Transit Validation vs USNO")?;
    writeln!(out, "Date: {today}")?;
    writeln!(out, "{banner}")?;
    writeln!(out)
}

fn check_location<W, S>(
    out: &mut W,
    source: &S,
    location: &Location,
    today: &str,
) -> io::Result<TransitResult>
where
    W: Write,
    S: TransitSource + ?Sized,
{
    writeln!(out, "Testing: {}", location.name)?;
    writeln!(out, "  Coordinates: {}", location.format_coordinates())?;

    let astro_time = match source.moon_transit(location) {
        Ok(time) => {
            info!(location = %location.name, %time, "moon transit");
            writeln!(out, "  Astrotimes transit: {time}")?;
            Some(time)
        }
        Err(e) => {
            warn!(location = %location.name, "no moon transit: {e}");
            if !matches!(e, AstrotimesError::NoTransit) {
                writeln!(out, "  Astrotimes error: {e}")?;
            }
            writeln!(out, "  Astrotimes: No transit found")?;
            None
        }
    };

    writeln!(out, "  USNO: Please check manually at:")?;
    writeln!(out, "    {MOON_POSITION_URL}")?;
    writeln!(
        out,
        "    Lat: {:.4}, Lon: {:.4}, Date: {today}",
        location.latitude, location.longitude
    )?;
    writeln!(out)?;

    Ok(TransitResult::new(location, astro_time))
}

fn write_summary<W: Write>(out: &mut W, results: &[TransitResult]) -> io::Result<()> {
    let banner = "=".repeat(BANNER_WIDTH);
    writeln!(out)?;
    writeln!(out, "{banner}")?;
    writeln!(out, "Summary")?;
    writeln!(out, "{banner}")?;
    for result in results {
        writeln!(
            out,
            "{:<NAME_WIDTH$} Transit: {}",
            result.location,
            result.format_transit()
        )?;
    }
    writeln!(out)?;
    writeln!(out, "Next step: Manually verify against USNO Moon Position calculator")?;
    writeln!(out, "{MOON_POSITION_URL}")
}
