//! Deterministic game logic and content-authored data types.
//!
//! `lastlight-core` defines the canonical rules of the engine: immutable
//! definitions, the expression language packs author conditions in, the
//! seedable state-serializable RNG, the mutable engine state, and the action
//! pipeline that is the only way to change it. Supporting crates (the pack
//! loader/registry and the runtime session) depend on the types re-exported
//! here.

pub mod action;
pub mod conditions;
pub mod definitions;
pub mod engine;
pub mod env;
pub mod expr;
pub mod rng;
pub mod state;

#[cfg(test)]
pub(crate) mod testutil;

pub use action::{
    Action, ActionResult, ActionTransition, AdvanceQuestAction, AppliedEffect,
    CombatApplyEffectAction, CombatFinishAction, CommitExternalCombatAction,
    EncounterEffect, ExternalCombatOutcome, InvalidActionReason, MakeEventChoiceAction,
    OPENING_HAND, PlayCardAction, RestAction, StartCombatAction, StoreEncounterAction,
    TravelAction,
};
pub use definitions::{
    AnchorDef, AnchorId, CardDef, CardEffect, CardId, CardKind, Condition, Consequence,
    EnemyDef, EnemyId, EventChoice, EventDef, EventId, HeroDef, HeroId, Language,
    LocalizedText, PackId, QuestDef, QuestId, QuestStage, RegionDef, RegionId,
    RegionStatus, ResourceDelta,
};
pub use engine::{
    ExecuteError, ExecutionOutcome, GameEngine, TransitionPhase, TransitionPhaseError,
};
pub use env::{ContentOracle, GameEnv};
pub use rng::DeterministicRng;
pub use state::{
    BALANCE_MAX, BALANCE_MIN, EncounterState, EngineState, EnginePhase, GameOutcome,
    PrunedRef, QuestLog, ReconcileError, ResourceMeter, Resources, StateInitError,
    SYSTEM_FLAGS, WorldState,
};

/// Version of the engine core, recorded into saves and checked against pack
/// manifests' `core_version_min`.
pub const CORE_VERSION: &str = env!("CARGO_PKG_VERSION");
