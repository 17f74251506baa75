//! Content oracle: the engine's read-only view of loaded definitions.
//!
//! The engine never owns content. Every transition receives a [`GameEnv`]
//! wrapping a [`ContentOracle`], and resolves definition IDs through it. The
//! content registry is the production implementation; tests plug in small
//! in-memory fixtures.

use crate::definitions::{
    AnchorDef, AnchorId, CardDef, CardId, EnemyDef, EnemyId, EventDef, EventId, HeroDef,
    HeroId, QuestDef, QuestId, RegionDef, RegionId,
};

/// Read-only access to the composed definition catalog.
pub trait ContentOracle {
    fn region(&self, id: &RegionId) -> Option<&RegionDef>;
    fn event(&self, id: &EventId) -> Option<&EventDef>;
    fn quest(&self, id: &QuestId) -> Option<&QuestDef>;
    fn enemy(&self, id: &EnemyId) -> Option<&EnemyDef>;
    fn anchor(&self, id: &AnchorId) -> Option<&AnchorDef>;
    fn card(&self, id: &CardId) -> Option<&CardDef>;
    fn hero(&self, id: &HeroId) -> Option<&HeroDef>;

    /// All regions, ordered by ID.
    fn all_regions(&self) -> Vec<&RegionDef>;

    /// All events, ordered by ID.
    fn all_events(&self) -> Vec<&EventDef>;

    /// Entry region declared by the active campaign pack, if one is loaded.
    /// There is no implicit default region.
    fn entry_region(&self) -> Option<&RegionId>;

    /// Arrival event pool of a region: every event that declares the region
    /// in its `region_ids`, in ID order. Declaring the pool on the event
    /// side lets a character pack add events to campaign regions without
    /// touching the region definition.
    fn region_events(&self, region: &RegionId) -> Vec<&EventDef> {
        self.all_events()
            .into_iter()
            .filter(|event| event.region_ids.contains(region))
            .collect()
    }
}

/// Environment handed to every action transition.
#[derive(Clone, Copy)]
pub struct GameEnv<'a> {
    content: &'a dyn ContentOracle,
}

impl<'a> GameEnv<'a> {
    pub fn new(content: &'a dyn ContentOracle) -> Self {
        Self { content }
    }

    pub fn content(&self) -> &'a dyn ContentOracle {
        self.content
    }
}
