//! Action domain: the closed command vocabulary of the engine.
//!
//! Every gameplay mutation is expressed as one of the [`Action`] variants
//! and executed through [`crate::engine::GameEngine`]. Each variant wraps a
//! transition struct implementing [`ActionTransition`], the three-phase
//! contract the engine drives: `pre_validate` checks preconditions against
//! the unmutated state, `apply` mutates through the engine's internal
//! reducers, `post_validate` re-checks invariants afterwards.

mod combat;
mod error;
mod event;
mod explore;
mod quest;
mod types;

pub use combat::{
    CombatApplyEffectAction, CombatFinishAction, CommitExternalCombatAction, OPENING_HAND,
    PlayCardAction, StartCombatAction, StoreEncounterAction,
};
pub use error::InvalidActionReason;
pub use event::MakeEventChoiceAction;
pub use explore::{RestAction, TravelAction};
pub use quest::AdvanceQuestAction;
pub use types::{ActionResult, AppliedEffect, EncounterEffect, ExternalCombatOutcome};

use serde::{Deserialize, Serialize};

use crate::env::GameEnv;
use crate::state::EngineState;

/// Defines how a concrete action variant mutates engine state.
pub trait ActionTransition {
    type Outcome;

    /// Validates pre-conditions using the state **before** mutation.
    fn pre_validate(
        &self,
        _state: &EngineState,
        _env: &GameEnv<'_>,
    ) -> Result<(), InvalidActionReason> {
        Ok(())
    }

    /// Applies the action by mutating the engine state.
    fn apply(
        &self,
        state: &mut EngineState,
        env: &GameEnv<'_>,
    ) -> Result<Self::Outcome, InvalidActionReason>;

    /// Validates post-conditions using the state **after** mutation.
    fn post_validate(
        &self,
        _state: &EngineState,
        _env: &GameEnv<'_>,
    ) -> Result<(), InvalidActionReason> {
        Ok(())
    }
}

/// Top-level action vocabulary submitted by the collaborator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Rest(RestAction),
    Travel(TravelAction),
    StartCombat(StartCombatAction),
    PlayCard(PlayCardAction),
    CombatApplyEffect(CombatApplyEffectAction),
    CombatFinish(CombatFinishAction),
    CommitExternalCombat(CommitExternalCombatAction),
    StoreEncounterState(StoreEncounterAction),
    MakeEventChoice(MakeEventChoiceAction),
    AdvanceQuest(AdvanceQuestAction),
}

impl Action {
    /// Snake_case name of the action, used in logs and error reports.
    pub fn as_snake_case(&self) -> &'static str {
        match self {
            Action::Rest(_) => "rest",
            Action::Travel(_) => "travel",
            Action::StartCombat(_) => "start_combat",
            Action::PlayCard(_) => "play_card",
            Action::CombatApplyEffect(_) => "combat_apply_effect",
            Action::CombatFinish(_) => "combat_finish",
            Action::CommitExternalCombat(_) => "commit_external_combat",
            Action::StoreEncounterState(_) => "store_encounter_state",
            Action::MakeEventChoice(_) => "make_event_choice",
            Action::AdvanceQuest(_) => "advance_quest",
        }
    }
}
