//! Typed action results and encounter effect payloads.

use serde::{Deserialize, Serialize};

use crate::definitions::{CardId, EnemyId, EventId, QuestId, RegionId, RegionStatus};

/// One granular encounter mutation, applied through the clamped setters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncounterEffect {
    DamageEnemy(u32),
    DamageHero(u32),
    HealHero(u32),
    GuardHero(u32),
    ShiftBalance(i32),
}

/// A clamped mutation that actually happened, with the post-clamp value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppliedEffect {
    EnemyDamaged { amount: u32, remaining: u32 },
    HeroDamaged { amount: u32, remaining: u32 },
    HeroHealed { amount: u32, current: u32 },
    GuardGained { amount: u32, total: u32 },
    BalanceShifted { amount: i32, balance: i32 },
}

/// Result of an encounter resolved by an external sub-simulation.
///
/// The sub-simulation reads the stored encounter plus the engine's RNG state,
/// runs elsewhere, and commits back through exactly one action
/// (`CommitExternalCombat`). `rng_state_after` is the generator state after
/// the external draws, so the committed session continues the same sequence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalCombatOutcome {
    pub enemy_id: EnemyId,
    pub victory: bool,
    pub hero_health_after: u32,
    pub hero_faith_after: u32,
    pub rng_state_after: u64,
}

/// Typed success result carrying the state delta of the executed action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionResult {
    Rested {
        healed: u32,
        faith_spent: u32,
        region_status: RegionStatus,
    },
    Traveled {
        from: RegionId,
        to: RegionId,
        /// Event drawn from the destination's arrival pool, if any.
        event: Option<EventId>,
    },
    CombatStarted {
        enemy_id: EnemyId,
        hand: Vec<CardId>,
    },
    CardPlayed {
        card_id: CardId,
        applied: Vec<AppliedEffect>,
    },
    EffectApplied(AppliedEffect),
    /// Victory finalized; a hero defeat ends the game directly through the
    /// clamped health setter, so finishing is always a victory.
    CombatFinished {
        enemy_id: EnemyId,
        rewards_applied: usize,
    },
    ExternalCombatCommitted {
        enemy_id: EnemyId,
        victory: bool,
    },
    EncounterStored {
        enemy_id: EnemyId,
    },
    ChoiceApplied {
        event_id: EventId,
        choice_id: String,
    },
    QuestAdvanced {
        quest_id: QuestId,
        stage: u32,
        completed: bool,
    },
}
