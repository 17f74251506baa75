//! Card definitions.

use serde::{Deserialize, Serialize};

use super::common::LocalizedText;
use super::ids::CardId;

/// Broad card archetype, used by the presentation layer for grouping.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CardKind {
    Strike,
    Ward,
    Rite,
}

/// Atomic combat effect carried by a card. Applied in authored order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardEffect {
    /// Damage to the enemy, reduced by the enemy's guard.
    Damage(u32),
    /// Guard absorbing incoming damage this encounter.
    Guard(u32),
    Heal(u32),
    Balance(i32),
}

/// A playable card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDef {
    pub id: CardId,
    pub name: LocalizedText,
    #[serde(default)]
    pub description: LocalizedText,
    pub kind: CardKind,
    #[serde(default)]
    pub faith_cost: u32,
    pub effects: Vec<CardEffect>,
}
