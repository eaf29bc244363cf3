//! Parsing of the user-facing reveal time option.
//!
//! Three forms are accepted:
//!
//! - an integer up to [`MAX_RELATIVE_MINUTES`]: minutes from now
//! - a larger integer: Unix timestamp in seconds
//! - a duration such as `1h20m15s` (units `h`, `m`, `s`, each at most once,
//!   in that order, case-insensitive): offset from now

use chrono::{DateTime, TimeDelta, Utc};
use derive_more::{Display, Error};
use tracing::{debug, instrument};

/// Largest integer read as minutes; anything above is a Unix timestamp.
pub const MAX_RELATIVE_MINUTES: i64 = 10_000;

/// Unparseable reveal time.
#[derive(Debug, Clone, Display, Error)]
#[display("Reveal time error: {} at {}:{}", message, file, line)]
pub struct RevealAtError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl RevealAtError {
    /// Creates a new reveal time error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Resolves `raw` into an absolute reveal time relative to `now`.
///
/// # Errors
///
/// Returns [`RevealAtError`] for negative numbers, out-of-range timestamps
/// and malformed durations.
#[instrument(skip(now))]
pub fn parse_reveal_at(raw: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, RevealAtError> {
    let raw = raw.trim();
    if let Ok(number) = raw.parse::<i64>() {
        if number < 0 {
            return Err(RevealAtError::new(format!("Negative reveal time: {}", number)));
        }
        if number <= MAX_RELATIVE_MINUTES {
            debug!(minutes = number, "Relative reveal time");
            return Ok(now + TimeDelta::minutes(number));
        }
        debug!(timestamp = number, "Absolute reveal time");
        return DateTime::from_timestamp(number, 0)
            .ok_or_else(|| RevealAtError::new(format!("Timestamp out of range: {}", number)));
    }

    let offset = parse_duration(raw)?;
    debug!(seconds = offset.num_seconds(), "Duration reveal time");
    now.checked_add_signed(offset)
        .ok_or_else(|| RevealAtError::new(format!("Duration out of range: {}", raw)))
}

/// Parses `[<n>h][<n>m][<n>s]` with at least one component.
fn parse_duration(raw: &str) -> Result<TimeDelta, RevealAtError> {
    let invalid = || RevealAtError::new(format!("Invalid duration: {}", raw));
    if raw.is_empty() {
        return Err(invalid());
    }

    let mut total = TimeDelta::zero();
    let mut digits = String::new();
    // Index of the last unit seen in "hms"; units must strictly advance.
    let mut last_unit: Option<usize> = None;

    for c in raw.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        let unit = match c.to_ascii_lowercase() {
            'h' => 0,
            'm' => 1,
            's' => 2,
            _ => return Err(invalid()),
        };
        if digits.is_empty() || last_unit.is_some_and(|last| unit <= last) {
            return Err(invalid());
        }
        let value: i64 = digits.parse().map_err(|_| invalid())?;
        let part = match unit {
            0 => TimeDelta::try_hours(value),
            1 => TimeDelta::try_minutes(value),
            _ => TimeDelta::try_seconds(value),
        }
        .ok_or_else(invalid)?;
        total = total.checked_add(&part).ok_or_else(invalid)?;
        digits.clear();
        last_unit = Some(unit);
    }

    if !digits.is_empty() || last_unit.is_none() {
        return Err(invalid());
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_components() {
        assert_eq!(
            parse_duration("1h20m15s").unwrap(),
            TimeDelta::seconds(3600 + 20 * 60 + 15)
        );
        assert_eq!(parse_duration("90S").unwrap(), TimeDelta::seconds(90));
        assert_eq!(parse_duration("2H5M").unwrap(), TimeDelta::minutes(125));
    }

    #[test]
    fn test_duration_rejects_bad_order_and_repeats() {
        assert!(parse_duration("10m1h").is_err());
        assert!(parse_duration("1h1h").is_err());
        assert!(parse_duration("h").is_err());
        assert!(parse_duration("15").is_err());
        assert!(parse_duration("1d").is_err());
        assert!(parse_duration("").is_err());
    }
}
