//! The free-form date grammar accepted by the API.
//!
//! Alternatives are tried in this order, the first one producing a valid
//! instant wins:
//!
//! 1. RFC 3339 date-times, e.g. `2015-12-25T10:30:00Z` or
//!    `2015-12-25T10:30:00.123+01:00`.
//! 2. ISO 8601 date-times with a numeric offset, including the forms RFC 3339
//!    rejects (`2015-12-25T10:30+01:00`, `2015-12-25T10:30:00+0100`).
//! 3. ISO 8601 date-times without an offset, read as UTC.
//! 4. ISO 8601 dates (`2015-12-25`) and year-months (`2015-12`), at UTC
//!    midnight.
//! 5. RFC 2822 dates, which includes the `Fri, 25 Dec 2015 00:00:00 GMT`
//!    form we render ourselves.
//! 6. Loose textual dates such as `05 October 2011, GMT` or `March 5, 2015`,
//!    see [`parse_loose`]. Two-digit years follow RFC 2822: `00`-`49` are
//!    2000-2049 and `50`-`99` are 1950-1999, so `Oct 5 99` is 1999.
//!
//! Inputs without zone information are always UTC, never server local time.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M%:z",
    "%Y-%m-%d %H:%M%z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

const WEEKDAYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// Parse a free-form date string into an instant, or `None` if it matches
/// none of the accepted forms or names an impossible calendar date.
pub fn parse_date(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    parse_iso(input)
        .or_else(|| {
            DateTime::parse_from_rfc2822(input)
                .ok()
                .map(|dt| dt.with_timezone(&Utc))
        })
        .or_else(|| parse_loose(input))
}

fn parse_iso(input: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }

    // chrono's %z doesn't take `Z`, so spell it out as an offset.
    let zoned = match input.strip_suffix(|c: char| c == 'Z' || c == 'z') {
        Some(rest) => format!("{rest}+00:00"),
        None => input.to_string(),
    };
    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(&zoned, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, format) {
            return Some(dt.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }

    if is_year_month(input) {
        let date = NaiveDate::parse_from_str(&format!("{input}-01"), "%Y-%m-%d").ok()?;
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }

    None
}

// YYYY-MM
fn is_year_month(input: &str) -> bool {
    let bytes = input.as_bytes();
    bytes.len() == 7
        && bytes[4] == b'-'
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[5..].iter().all(u8::is_ascii_digit)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Meridiem {
    Am,
    Pm,
}

/// Tokens are separated by whitespace or commas and may come in any order.
/// A date needs exactly one month name, one day and one year. A weekday name,
/// a `H:MM[:SS[.fff]]` time with optional `AM`/`PM`, and a zone (`GMT`,
/// `UTC`, `UT`, `Z`, `+hhmm`, `-hh:mm`, `GMT+hhmm`) are optional.
///
/// Numbers with three or more digits are years. Two-digit numbers above 31,
/// or any two-digit number once the day is known, are two-digit years.
/// A `-` followed by four or more digits is a year before year 0 (as in
/// `Fri, 01 Jan -0001 00:00:00 GMT`) unless another token already gave the
/// year, in which case it is a zone offset.
fn parse_loose(input: &str) -> Option<DateTime<Utc>> {
    let mut month: Option<u32> = None;
    let mut day: Option<u32> = None;
    let mut year: Option<i32> = None;
    let mut signed: Option<(i32, Option<i32>)> = None;
    let mut clock: Option<(u32, u32, u32, u32)> = None;
    let mut meridiem: Option<Meridiem> = None;
    let mut offset: Option<i32> = None;

    let tokens = input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty());

    for token in tokens {
        let lower = token.to_ascii_lowercase();

        if let Some(index) = match_name(&lower, &MONTHS) {
            set_once(&mut month, index as u32 + 1)?;
        } else if match_name(&lower, &WEEKDAYS).is_some() {
            continue;
        } else if lower == "am" {
            set_once(&mut meridiem, Meridiem::Am)?;
        } else if lower == "pm" {
            set_once(&mut meridiem, Meridiem::Pm)?;
        } else if let Some(value) = negative_year(token) {
            set_once(&mut signed, (value, zone_offset(&lower)))?;
        } else if let Some(seconds) = zone_offset(&lower) {
            set_once(&mut offset, seconds)?;
        } else if token.contains(':') {
            set_once(&mut clock, parse_clock(token)?)?;
        } else if token.bytes().all(|b| b.is_ascii_digit()) {
            let value: i32 = token.parse().ok()?;
            if token.len() >= 3 {
                set_once(&mut year, value)?;
            } else if token.len() == 2 && (value > 31 || day.is_some()) {
                set_once(&mut year, two_digit_year(value))?;
            } else {
                set_once(&mut day, value as u32)?;
            }
        } else {
            return None;
        }
    }

    match (signed, year) {
        (None, _) => {}
        (Some((value, _)), None) => year = Some(-value),
        (Some((_, Some(seconds))), Some(_)) => set_once(&mut offset, seconds)?,
        (Some((_, None)), Some(_)) => return None,
    }

    let date = NaiveDate::from_ymd_opt(year?, month?, day?)?;

    let (hour, minute, second, milli) = clock.unwrap_or((0, 0, 0, 0));
    let hour = match meridiem {
        None => hour,
        Some(_) if hour == 0 || hour > 12 => return None,
        Some(Meridiem::Am) => hour % 12,
        Some(Meridiem::Pm) => hour % 12 + 12,
    };
    let time = NaiveTime::from_hms_milli_opt(hour, minute, second, milli)?;

    let zone = FixedOffset::east_opt(offset.unwrap_or(0))?;
    zone.from_local_datetime(&date.and_time(time))
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

// -YYYY, at least four digits
fn negative_year(token: &str) -> Option<i32> {
    let digits = token.strip_prefix('-')?;
    if digits.len() < 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn two_digit_year(value: i32) -> i32 {
    if value < 50 {
        value + 2000
    } else {
        value + 1900
    }
}

fn set_once<T>(slot: &mut Option<T>, value: T) -> Option<()> {
    if slot.is_some() {
        return None;
    }
    *slot = Some(value);
    Some(())
}

// Full names, or any prefix of at least three letters ("sep", "sept").
fn match_name(token: &str, names: &[&str]) -> Option<usize> {
    let token = token.strip_suffix('.').unwrap_or(token);
    if token.len() < 3 {
        return None;
    }
    names.iter().position(|name| name.starts_with(token))
}

// H:MM, H:MM:SS or H:MM:SS.fff
fn parse_clock(token: &str) -> Option<(u32, u32, u32, u32)> {
    let mut parts = token.split(':');
    let hour = parse_digits(parts.next()?, 1, 2)?;
    let minute = parse_digits(parts.next()?, 2, 2)?;
    let (second, milli) = match parts.next() {
        None => (0, 0),
        Some(part) => match part.split_once('.') {
            None => (parse_digits(part, 2, 2)?, 0),
            Some((second, fraction)) => {
                (parse_digits(second, 2, 2)?, parse_millis(fraction)?)
            }
        },
    };
    if parts.next().is_some() {
        return None;
    }
    Some((hour, minute, second, milli))
}

fn parse_digits(part: &str, min_len: usize, max_len: usize) -> Option<u32> {
    let len = part.len();
    if len < min_len || len > max_len || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

// Fractional seconds, truncated to milliseconds.
fn parse_millis(fraction: &str) -> Option<u32> {
    if fraction.is_empty() || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let digits: String = fraction.chars().chain("00".chars()).take(3).collect();
    digits.parse().ok()
}

/// Seconds east of UTC for a zone token, e.g. `gmt`, `z`, `+0100`, `-05:00`
/// or `utc+01:00`. Expects the token lowercased.
fn zone_offset(token: &str) -> Option<i32> {
    if token == "z" {
        return Some(0);
    }

    let rest = ["gmt", "utc", "ut"]
        .iter()
        .find_map(|name| token.strip_prefix(name))
        .unwrap_or(token);
    if rest.is_empty() {
        return if rest.len() < token.len() { Some(0) } else { None };
    }

    let (sign, digits) = match rest.as_bytes()[0] {
        b'+' => (1, &rest[1..]),
        b'-' => (-1, &rest[1..]),
        _ => return None,
    };
    let (hours, minutes) = match digits.split_once(':') {
        Some((hours, minutes)) => (parse_digits(hours, 1, 2)?, parse_digits(minutes, 2, 2)?),
        None if digits.len() == 4 && digits.is_ascii() => {
            let (hours, minutes) = digits.split_at(2);
            (parse_digits(hours, 2, 2)?, parse_digits(minutes, 2, 2)?)
        }
        None => (parse_digits(digits, 1, 2)?, 0),
    };
    if hours > 23 || minutes > 59 {
        return None;
    }
    Some(sign * (hours * 3600 + minutes * 60) as i32)
}
