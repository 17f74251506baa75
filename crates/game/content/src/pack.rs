//! In-memory representation of a loaded content pack.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use lastlight_core::{
    AnchorDef, AnchorId, CardDef, CardId, EnemyDef, EnemyId, EventDef, EventId, HeroDef,
    HeroId, QuestDef, QuestId, RegionDef, RegionId,
};

use crate::manifest::PackManifest;

/// Content kinds, used in diagnostics and collision reports.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ContentKind {
    Region,
    Event,
    Quest,
    Enemy,
    Anchor,
    Card,
    Hero,
}

/// A fully decoded pack: manifest plus one keyed collection per kind.
///
/// Collections are keyed by the definition's own ID; the validator enforces
/// `key == definition.id`. Immutable after load, owned by the registry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoadedPack {
    pub manifest: PackManifest,
    pub regions: BTreeMap<RegionId, RegionDef>,
    pub events: BTreeMap<EventId, EventDef>,
    pub quests: BTreeMap<QuestId, QuestDef>,
    pub enemies: BTreeMap<EnemyId, EnemyDef>,
    pub anchors: BTreeMap<AnchorId, AnchorDef>,
    pub cards: BTreeMap<CardId, CardDef>,
    pub heroes: BTreeMap<HeroId, HeroDef>,
}

impl LoadedPack {
    /// An empty pack around a manifest.
    pub fn new(manifest: PackManifest) -> Self {
        Self {
            manifest,
            regions: BTreeMap::new(),
            events: BTreeMap::new(),
            quests: BTreeMap::new(),
            enemies: BTreeMap::new(),
            anchors: BTreeMap::new(),
            cards: BTreeMap::new(),
            heroes: BTreeMap::new(),
        }
    }

    /// Total definition count across all collections.
    pub fn definition_count(&self) -> usize {
        self.regions.len()
            + self.events.len()
            + self.quests.len()
            + self.enemies.len()
            + self.anchors.len()
            + self.cards.len()
            + self.heroes.len()
    }

    /// IDs of one kind, as strings, in key order.
    pub fn ids_of(&self, kind: ContentKind) -> Vec<String> {
        match kind {
            ContentKind::Region => self.regions.keys().map(ToString::to_string).collect(),
            ContentKind::Event => self.events.keys().map(ToString::to_string).collect(),
            ContentKind::Quest => self.quests.keys().map(ToString::to_string).collect(),
            ContentKind::Enemy => self.enemies.keys().map(ToString::to_string).collect(),
            ContentKind::Anchor => self.anchors.keys().map(ToString::to_string).collect(),
            ContentKind::Card => self.cards.keys().map(ToString::to_string).collect(),
            ContentKind::Hero => self.heroes.keys().map(ToString::to_string).collect(),
        }
    }
}
