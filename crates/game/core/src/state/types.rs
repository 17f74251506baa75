//! State sub-structures: resources, world, quest log, encounter, phase.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::definitions::{EnemyId, QuestId, RegionId, RegionStatus};

/// Lower clamp of the balance scale.
pub const BALANCE_MIN: i32 = -100;
/// Upper clamp of the balance scale.
pub const BALANCE_MAX: i32 = 100;

/// Integer resource meter (health, faith) tracked for the hero and for an
/// engaged enemy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceMeter {
    pub current: u32,
    pub maximum: u32,
}

impl ResourceMeter {
    pub fn new(current: u32, maximum: u32) -> Self {
        Self { current, maximum }
    }

    /// A meter starting at its maximum.
    pub fn full(maximum: u32) -> Self {
        Self {
            current: maximum,
            maximum,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.current == 0
    }
}

/// The hero's resource pools.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resources {
    pub health: ResourceMeter,
    pub faith: ResourceMeter,
    /// Position on the balance scale, clamped to
    /// `[BALANCE_MIN, BALANCE_MAX]`.
    pub balance: i32,
}

/// Mutable world bookkeeping layered over the immutable region catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldState {
    pub current_region: RegionId,
    pub discovered: BTreeSet<RegionId>,
    pub region_status: BTreeMap<RegionId, RegionStatus>,
}

impl WorldState {
    /// Live status of a region; regions absent from the map read as their
    /// default.
    pub fn status_of(&self, region: &RegionId) -> RegionStatus {
        self.region_status.get(region).copied().unwrap_or_default()
    }
}

/// Active and completed quests with per-quest stage progress.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestLog {
    /// Active quest -> current stage index.
    pub active: BTreeMap<QuestId, u32>,
    pub completed: BTreeSet<QuestId>,
}

impl QuestLog {
    pub fn is_active(&self, quest: &QuestId) -> bool {
        self.active.contains_key(quest)
    }

    pub fn is_completed(&self, quest: &QuestId) -> bool {
        self.completed.contains(quest)
    }

    pub fn stage_of(&self, quest: &QuestId) -> Option<u32> {
        self.active.get(quest).copied()
    }
}

/// Snapshot of an in-progress encounter.
///
/// While the phase is `InEncounter` this is the live fight; with the phase
/// back at `Exploring` it is a stored pending encounter awaiting an external
/// resolution commit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterState {
    pub enemy_id: EnemyId,
    pub enemy_health: ResourceMeter,
    pub hero_guard: u32,
    pub round: u32,
}

/// Terminal outcome of a playthrough.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GameOutcome {
    Victory,
    Defeat,
}

/// Engine phase; the action pipeline validates every action against it.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EnginePhase {
    Exploring,
    InEncounter,
    AwaitingChoice,
    GameOver(GameOutcome),
}

impl EnginePhase {
    pub fn is_game_over(&self) -> bool {
        matches!(self, EnginePhase::GameOver(_))
    }
}

pub(crate) fn clamp_balance(value: i64) -> i32 {
    value.clamp(i64::from(BALANCE_MIN), i64::from(BALANCE_MAX)) as i32
}
