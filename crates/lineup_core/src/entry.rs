//! Roster parsing.
//!
//! A roster is a comma-separated list of entries; the n-th entry fills slot n.
//! Each entry takes one of three shapes:
//!
//! - `"<id><race code>"`: shorthand reference, e.g. `"1233"` is id 123 as Zerg
//! - `"<id> <race>"`: reference with a race name prefix, e.g. `"123 z"`
//! - `"<label> <race>"`: freeform label, e.g. `"Alice protoss"`

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_new::new;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::Race;

/// One roster slot as submitted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters, new)]
pub struct ParsedEntry {
    /// 1-based slot number.
    slot: u32,
    race: Race,
    /// External character id or a free-text label.
    data: String,
}

impl ParsedEntry {
    /// External character id when the entry references one.
    pub fn reference_id(&self) -> Option<i64> {
        if self.data.is_empty() || !self.data.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        self.data.parse().ok()
    }

    /// Whether the entry is verified against the stats provider.
    pub fn is_reference(&self) -> bool {
        self.reference_id().is_some()
    }
}

/// Roster rejected at a slot.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, Getters)]
#[display("Slot {slot}. {message}")]
pub struct ParseError {
    slot: u32,
    message: String,
}

impl ParseError {
    /// Creates a parse error for a 1-based slot.
    pub fn new(slot: u32, message: impl Into<String>) -> Self {
        Self {
            slot,
            message: message.into(),
        }
    }
}

/// Parses a whole roster, stopping at the first invalid entry.
///
/// # Errors
///
/// Returns [`ParseError`] carrying the slot of the first entry that fails.
#[instrument(skip(raw), fields(len = raw.len()))]
pub fn parse_roster(raw: &str) -> Result<Vec<ParsedEntry>, ParseError> {
    let entries = raw
        .split(',')
        .zip(1u32..)
        .map(|(segment, slot)| parse_entry(slot, segment))
        .collect::<Result<Vec<_>, _>>()?;
    debug!(count = entries.len(), "Roster parsed");
    Ok(entries)
}

/// Parses one roster segment into the given slot.
///
/// # Errors
///
/// Returns [`ParseError`] for an unknown race, a malformed shorthand, a
/// numeric id that does not fit an `i64`, or a segment that is neither one
/// nor two whitespace-separated tokens.
pub fn parse_entry(slot: u32, segment: &str) -> Result<ParsedEntry, ParseError> {
    let segment = segment.trim();
    let tokens: Vec<&str> = segment.split_whitespace().collect();
    match tokens.as_slice() {
        [token] => parse_shorthand(slot, token),
        [data, race] => {
            let race = Race::from_prefix(race).ok_or_else(|| {
                warn!(slot, race = %race, "Unknown race");
                ParseError::new(slot, format!("Invalid race: {}", race))
            })?;
            if data.bytes().all(|b| b.is_ascii_digit()) && data.parse::<i64>().is_err() {
                warn!(slot, data = %data, "Character id out of range");
                return Err(ParseError::new(slot, format!("Invalid id: {}", data)));
            }
            Ok(ParsedEntry::new(slot, race, (*data).to_string()))
        }
        _ => {
            warn!(slot, segment = %segment, "Malformed entry");
            Err(ParseError::new(slot, format!("Invalid entry: {}", segment)))
        }
    }
}

/// `"<id><race code>"` where the race code is the last digit.
fn parse_shorthand(slot: u32, token: &str) -> Result<ParsedEntry, ParseError> {
    let invalid = || ParseError::new(slot, format!("Invalid entry: {}", token));
    if token.len() < 2 || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let (id, code) = token.split_at(token.len() - 1);
    id.parse::<i64>().map_err(|_| invalid())?;
    let race = code
        .parse::<i32>()
        .ok()
        .and_then(Race::from_id)
        .ok_or_else(invalid)?;
    Ok(ParsedEntry::new(slot, race, id.to_string()))
}
