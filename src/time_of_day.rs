//! `HH:MM:SS` parsing for transit times.

/// Convert `HH:MM:SS` into minutes past midnight.
///
/// Ranges are not checked; a caller comparing against another source decides
/// what counts as sane. Returns `None` unless there are exactly three integer
/// components.
#[must_use]
pub fn minutes_since_midnight(time: &str) -> Option<f64> {
    let mut parts = time.split(':');
    let hours = parse_component(parts.next()?)?;
    let minutes = parse_component(parts.next()?)?;
    let seconds = parse_component(parts.next()?)?;
    if parts.next().is_some() {
        return None;
    }

    Some(hours as f64 * 60.0 + minutes as f64 + seconds as f64 / 60.0)
}

fn parse_component(part: &str) -> Option<i64> {
    part.trim().parse().ok()
}
