//! Hero definitions.

use serde::{Deserialize, Serialize};

use super::common::LocalizedText;
use super::ids::{CardId, HeroId};

/// A playable hero: starting resources, deck and flags for a new game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroDef {
    pub id: HeroId,
    pub name: LocalizedText,
    #[serde(default)]
    pub description: LocalizedText,
    pub max_health: u32,
    pub max_faith: u32,
    #[serde(default)]
    pub starting_balance: i32,
    pub starting_deck: Vec<CardId>,
    /// Flags set to true when a playthrough with this hero starts.
    #[serde(default)]
    pub starting_flags: Vec<String>,
}
