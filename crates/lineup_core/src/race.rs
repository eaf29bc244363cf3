//! Ladder races and regions.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

/// Race a player queues as.
///
/// The stats provider spells races in upper case (`"ZERG"`); both that
/// and the capitalised name are accepted when deserializing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumIter,
)]
pub enum Race {
    /// Terran, race code 1.
    #[serde(rename = "TERRAN", alias = "Terran", alias = "terran")]
    Terran,
    /// Protoss, race code 2.
    #[serde(rename = "PROTOSS", alias = "Protoss", alias = "protoss")]
    Protoss,
    /// Zerg, race code 3.
    #[serde(rename = "ZERG", alias = "Zerg", alias = "zerg")]
    Zerg,
    /// Random, race code 4.
    #[serde(rename = "RANDOM", alias = "Random", alias = "random")]
    Random,
}

impl Race {
    /// Numeric race code used by roster shorthand and storage.
    pub fn id(self) -> i32 {
        match self {
            Self::Terran => 1,
            Self::Protoss => 2,
            Self::Zerg => 3,
            Self::Random => 4,
        }
    }

    /// Human-readable race name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Terran => "Terran",
            Self::Protoss => "Protoss",
            Self::Zerg => "Zerg",
            Self::Random => "Random",
        }
    }

    /// Looks a race up by its numeric code.
    pub fn from_id(id: i32) -> Option<Self> {
        Self::iter().find(|race| race.id() == id)
    }

    /// Matches a case-insensitive name prefix, e.g. `"z"` or `"terr"`.
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        if prefix.is_empty() {
            return None;
        }
        let prefix = prefix.to_lowercase();
        Self::iter().find(|race| race.name().to_lowercase().starts_with(&prefix))
    }
}

/// Ladder region of a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
#[serde(rename_all = "UPPERCASE")]
pub enum Region {
    /// Americas.
    Us,
    /// Europe.
    Eu,
    /// Korea.
    Kr,
    /// China.
    Cn,
}

impl Region {
    /// Numeric region code.
    pub fn id(self) -> i32 {
        match self {
            Self::Us => 1,
            Self::Eu => 2,
            Self::Kr => 3,
            Self::Cn => 5,
        }
    }

    /// Short display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Us => "NA",
            Self::Eu => "EU",
            Self::Kr => "KR",
            Self::Cn => "CN",
        }
    }

    /// Looks a region up by its numeric code.
    pub fn from_id(id: i32) -> Option<Self> {
        Self::iter().find(|region| region.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_race_from_prefix() {
        assert_eq!(Race::from_prefix("z"), Some(Race::Zerg));
        assert_eq!(Race::from_prefix("T"), Some(Race::Terran));
        assert_eq!(Race::from_prefix("prot"), Some(Race::Protoss));
        assert_eq!(Race::from_prefix("RANDOM"), Some(Race::Random));
        assert_eq!(Race::from_prefix("zergling"), None);
        assert_eq!(Race::from_prefix("x"), None);
        assert_eq!(Race::from_prefix(""), None);
    }

    #[test]
    fn test_race_from_id() {
        assert_eq!(Race::from_id(1), Some(Race::Terran));
        assert_eq!(Race::from_id(4), Some(Race::Random));
        assert_eq!(Race::from_id(0), None);
        assert_eq!(Race::from_id(5), None);
    }

    #[test]
    fn test_race_deserializes_provider_spelling() {
        let race: Race = serde_json::from_str("\"ZERG\"").unwrap();
        assert_eq!(race, Race::Zerg);
        let race: Race = serde_json::from_str("\"Protoss\"").unwrap();
        assert_eq!(race, Race::Protoss);
    }

    #[test]
    fn test_region_codes() {
        assert_eq!(Region::from_id(5), Some(Region::Cn));
        assert_eq!(Region::from_id(4), None);
        assert_eq!(Region::Us.name(), "NA");
    }
}
