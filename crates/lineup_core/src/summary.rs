//! Records returned by the ranked-ladder stats provider.

use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};

use crate::{Race, Region};

/// Ladder performance of one character playing one race over the lookup depth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSummary {
    /// External character id.
    #[serde(rename = "playerCharacterId")]
    character_id: i64,
    race: Race,
    games: i32,
    rating_avg: i32,
    rating_max: i32,
    rating_last: i32,
    global_rank_last: Option<i32>,
}

/// Identity of an external character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
#[serde(rename_all = "camelCase")]
pub struct CharacterIdentity {
    id: i64,
    region: Region,
    realm: i32,
    /// Full name including the `#1234` discriminator.
    name: String,
}

impl CharacterIdentity {
    /// Name without the discriminator.
    pub fn display_name(&self) -> &str {
        match self.name.find('#') {
            Some(idx) => &self.name[..idx],
            None => &self.name,
        }
    }
}
