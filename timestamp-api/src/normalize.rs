use chrono::{DateTime, Utc};

use crate::api::{TimestampError, TimestampResult};
use crate::format::to_utc_string;
use crate::parse::parse_date;
use crate::time::{SystemTime, TimeSource};

/// How the input was read, for metrics and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Now,
    Unix,
    Date,
}

impl InputKind {
    pub fn classify(input: Option<&str>) -> Self {
        match input {
            None => InputKind::Now,
            Some(input) if is_digit_only(input) => InputKind::Unix,
            Some(_) => InputKind::Date,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InputKind::Now => "now",
            InputKind::Unix => "unix",
            InputKind::Date => "date",
        }
    }
}

/// Normalize an optional date-like input against the system clock.
pub fn normalize(input: Option<&str>) -> Result<TimestampResult, TimestampError> {
    normalize_with(&SystemTime {}, input)
}

/// Normalize an optional date-like input into epoch milliseconds and a UTC
/// string.
///
/// * `None` reads the current time from `clock`.
/// * A non-empty string of ASCII digits is epoch milliseconds. Values that
///   overflow an `i64`, or land outside the range chrono can represent, are
///   rejected instead of wrapped.
/// * Anything else goes through [`parse_date`].
///
/// The instant is floored to whole milliseconds, so `unix` and `utc` always
/// describe the same point in time.
pub fn normalize_with<T>(clock: &T, input: Option<&str>) -> Result<TimestampResult, TimestampError>
where
    T: TimeSource + ?Sized,
{
    let instant = match InputKind::classify(input) {
        InputKind::Now => Some(clock.current_time()),
        InputKind::Unix => input.and_then(from_millis_str),
        InputKind::Date => input.and_then(parse_date),
    };

    instant
        .map(|instant| {
            let unix = instant.timestamp_millis();
            let instant = DateTime::from_timestamp_millis(unix).unwrap_or(instant);
            TimestampResult {
                unix,
                utc: to_utc_string(&instant),
            }
        })
        .ok_or(TimestampError::InvalidDate)
}

fn is_digit_only(input: &str) -> bool {
    !input.is_empty() && input.bytes().all(|b| b.is_ascii_digit())
}

fn from_millis_str(input: &str) -> Option<DateTime<Utc>> {
    let millis: i64 = input.parse().ok()?;
    DateTime::from_timestamp_millis(millis)
}
