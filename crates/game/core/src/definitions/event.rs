//! Narrative event definitions.

use serde::{Deserialize, Serialize};

use super::condition::{Condition, Consequence};
use super::ids::{EventId, RegionId};
use super::common::LocalizedText;

/// A narrative event presented to the player on arrival in a region.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDef {
    pub id: EventId,
    pub title: LocalizedText,
    #[serde(default)]
    pub body: LocalizedText,
    /// Regions whose arrival pool includes this event.
    #[serde(default)]
    pub region_ids: Vec<RegionId>,
    /// Gate checked before the event is eligible to fire.
    #[serde(default)]
    pub trigger: Option<Condition>,
    /// Fires at most once per playthrough.
    #[serde(default)]
    pub once: bool,
    /// Relative weight in the arrival pool draw. Zero-weight events never
    /// fire; the validator flags them.
    #[serde(default = "default_weight")]
    pub weight: u32,
    pub choices: Vec<EventChoice>,
}

fn default_weight() -> u32 {
    1
}

/// One selectable answer to an event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventChoice {
    pub id: String,
    pub label: LocalizedText,
    /// All requirements must hold for the choice to be selectable.
    #[serde(default)]
    pub requirements: Vec<Condition>,
    #[serde(default)]
    pub consequences: Vec<Consequence>,
}
