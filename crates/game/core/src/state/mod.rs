//! Authoritative runtime state of a playthrough.
//!
//! [`EngineState`] is created at new game, mutated exclusively by the action
//! engine, serialized wholesale by the save subsystem, and destroyed on new
//! game or load. Every identifier stored here is a stable definition ID that
//! must resolve in the active registry. Collections are ordered
//! (`BTreeMap`/`BTreeSet`) so iteration order and serialization are
//! deterministic.

mod reconcile;
mod types;

pub use reconcile::{PrunedRef, ReconcileError};
pub use types::{
    BALANCE_MAX, BALANCE_MIN, EncounterState, EnginePhase, GameOutcome, QuestLog,
    ResourceMeter, Resources, WorldState,
};
pub(crate) use types::clamp_balance;

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::definitions::{CardId, EventId, HeroDef, HeroId};
use crate::env::GameEnv;
use crate::rng::DeterministicRng;

/// Flags the engine itself writes. Conditions may reference these without
/// any pack defining them; the content validator shares this allowlist.
pub const SYSTEM_FLAGS: &[&str] = &[FLAG_FIRST_BLOOD, FLAG_ANCHOR_LIT, FLAG_BREACH_SURVIVOR];

/// Set when the hero wins their first encounter.
pub const FLAG_FIRST_BLOOD: &str = "first_blood";
/// Set when the hero first rests at an anchor.
pub const FLAG_ANCHOR_LIT: &str = "anchor_lit";
/// Set when the hero wins an encounter inside a breached region.
pub const FLAG_BREACH_SURVIVOR: &str = "breach_survivor";

/// Errors surfaced while initializing a fresh playthrough.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StateInitError {
    #[error("active pack set declares no entry region")]
    NoEntryRegion,
}

/// Canonical mutable state of one playthrough.
///
/// Fields are crate-private: outside this crate the state is read through
/// accessors and mutated only by submitting actions to the engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineState {
    pub(crate) hero_id: HeroId,
    pub(crate) resources: Resources,
    pub(crate) world: WorldState,
    pub(crate) quests: QuestLog,
    pub(crate) completed_events: BTreeSet<EventId>,
    pub(crate) flags: BTreeMap<String, bool>,
    pub(crate) deck: Vec<CardId>,
    pub(crate) hand: Vec<CardId>,
    pub(crate) discard: Vec<CardId>,
    pub(crate) encounter: Option<EncounterState>,
    pub(crate) pending_event: Option<EventId>,
    pub(crate) phase: EnginePhase,
    pub(crate) rng: DeterministicRng,
    /// Count of successfully executed actions.
    pub(crate) nonce: u64,
}

impl EngineState {
    /// Initializes a fresh playthrough for `hero` against the active pack
    /// set: full meters, the hero's starting deck and flags, the entry
    /// region discovered, and every region's status seeded from its
    /// definition.
    pub fn new(
        hero: &HeroDef,
        env: &GameEnv<'_>,
        seed: u64,
    ) -> Result<Self, StateInitError> {
        let entry = env
            .content()
            .entry_region()
            .ok_or(StateInitError::NoEntryRegion)?
            .clone();

        let mut discovered = BTreeSet::new();
        let mut region_status = BTreeMap::new();
        for region in env.content().all_regions() {
            region_status.insert(region.id.clone(), region.initial_status);
            if region.discover_on_start {
                discovered.insert(region.id.clone());
            }
        }
        discovered.insert(entry.clone());

        let flags = hero
            .starting_flags
            .iter()
            .map(|flag| (flag.clone(), true))
            .collect();

        Ok(Self {
            hero_id: hero.id.clone(),
            resources: Resources {
                health: ResourceMeter::full(hero.max_health),
                faith: ResourceMeter::full(hero.max_faith),
                balance: types::clamp_balance(i64::from(hero.starting_balance)),
            },
            world: WorldState {
                current_region: entry,
                discovered,
                region_status,
            },
            quests: QuestLog::default(),
            completed_events: BTreeSet::new(),
            flags,
            deck: hero.starting_deck.clone(),
            hand: Vec::new(),
            discard: Vec::new(),
            encounter: None,
            pending_event: None,
            phase: EnginePhase::Exploring,
            rng: DeterministicRng::seeded(seed),
            nonce: 0,
        })
    }

    pub fn hero_id(&self) -> &HeroId {
        &self.hero_id
    }

    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    pub fn quests(&self) -> &QuestLog {
        &self.quests
    }

    pub fn completed_events(&self) -> &BTreeSet<EventId> {
        &self.completed_events
    }

    /// Current value of a flag; unset flags read as `false`.
    pub fn flag(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    pub fn flags(&self) -> &BTreeMap<String, bool> {
        &self.flags
    }

    pub fn deck(&self) -> &[CardId] {
        &self.deck
    }

    pub fn hand(&self) -> &[CardId] {
        &self.hand
    }

    pub fn discard(&self) -> &[CardId] {
        &self.discard
    }

    pub fn encounter(&self) -> Option<&EncounterState> {
        self.encounter.as_ref()
    }

    pub fn pending_event(&self) -> Option<&EventId> {
        self.pending_event.as_ref()
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    /// Serialized RNG state, exposed for external combat sub-simulations
    /// that must continue the sequence and commit it back.
    pub fn rng_state(&self) -> u64 {
        self.rng.state()
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::fixture_content;

    #[test]
    fn new_game_seeds_state_from_hero_and_regions() {
        let content = fixture_content();
        let env = GameEnv::new(&content);
        let hero = content.hero.clone();

        let state = EngineState::new(&hero, &env, 7).unwrap();

        assert_eq!(state.hero_id().as_str(), hero.id.as_str());
        assert_eq!(state.resources().health.current, hero.max_health);
        assert_eq!(state.resources().faith.maximum, hero.max_faith);
        assert_eq!(state.world().current_region.as_str(), "vigil_keep");
        assert!(state.world().discovered.contains(&"vigil_keep".into()));
        assert_eq!(state.deck().len(), hero.starting_deck.len());
        assert_eq!(state.phase(), EnginePhase::Exploring);
        assert_eq!(state.nonce(), 0);
        for flag in &hero.starting_flags {
            assert!(state.flag(flag));
        }
    }

    #[test]
    fn state_round_trips_through_bincode() {
        let content = fixture_content();
        let env = GameEnv::new(&content);
        let state = EngineState::new(&content.hero, &env, 99).unwrap();

        let bytes = bincode::serialize(&state).unwrap();
        let back: EngineState = bincode::deserialize(&bytes).unwrap();
        assert_eq!(back, state);
    }
}
