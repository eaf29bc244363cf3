//! Tests for reveal time parsing.

use chrono::{DateTime, TimeDelta, Utc};
use lineup_bot::parse_reveal_at;

fn now() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).expect("valid timestamp")
}

#[test]
fn test_small_integer_is_minutes() {
    assert_eq!(
        parse_reveal_at("90", now()).expect("Parse failed"),
        now() + TimeDelta::minutes(90)
    );
    assert_eq!(
        parse_reveal_at("10000", now()).expect("Parse failed"),
        now() + TimeDelta::minutes(10_000)
    );
}

#[test]
fn test_large_integer_is_timestamp() {
    let parsed = parse_reveal_at("1800000000", now()).expect("Parse failed");
    assert_eq!(parsed.timestamp(), 1_800_000_000);
    let parsed = parse_reveal_at("10001", now()).expect("Parse failed");
    assert_eq!(parsed.timestamp(), 10_001);
}

#[test]
fn test_duration() {
    assert_eq!(
        parse_reveal_at(" 1h20m15s ", now()).expect("Parse failed"),
        now() + TimeDelta::seconds(4815)
    );
    assert_eq!(
        parse_reveal_at("45m", now()).expect("Parse failed"),
        now() + TimeDelta::minutes(45)
    );
}

#[test]
fn test_invalid_input() {
    assert!(parse_reveal_at("tomorrow", now()).is_err());
    assert!(parse_reveal_at("-5", now()).is_err());
    assert!(parse_reveal_at("", now()).is_err());
    assert!(parse_reveal_at("20m1h", now()).is_err());
}
