use chrono::{DateTime, Datelike, Utc};

/// Renders an instant the way HTTP dates are written (RFC 7231 IMF-fixdate),
/// e.g. `Fri, 01 Jan 2016 00:00:00 GMT`.
///
/// Years outside 0..=9999 keep at least four digits, with a leading `-`
/// before year 0. chrono's `%Y` would prefix a `+` past 9999, so the year is
/// written by hand.
pub fn to_utc_string(instant: &DateTime<Utc>) -> String {
    let year = instant.year();
    let year = if year < 0 {
        format!("-{:04}", year.unsigned_abs())
    } else {
        format!("{:04}", year)
    };

    format!(
        "{}, {} {} {}",
        instant.format("%a"),
        instant.format("%d %b"),
        year,
        instant.format("%H:%M:%S GMT"),
    )
}
