//! Enemy definitions.

use serde::{Deserialize, Serialize};

use super::condition::Consequence;
use super::common::LocalizedText;
use super::ids::EnemyId;

/// An opponent the hero can engage in card combat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyDef {
    pub id: EnemyId,
    pub name: LocalizedText,
    #[serde(default)]
    pub description: LocalizedText,
    pub health: u32,
    /// Damage dealt to the hero each combat round.
    pub attack: u32,
    /// Flat reduction applied to incoming card damage.
    #[serde(default)]
    pub guard: u32,
    /// Applied once on victory.
    #[serde(default)]
    pub reward: Vec<Consequence>,
}
