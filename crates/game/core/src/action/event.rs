//! Event choice resolution.

use serde::{Deserialize, Serialize};

use crate::conditions;
use crate::definitions::EventId;
use crate::engine::consequences::apply_consequences;
use crate::engine::reducer::StateReducer;
use crate::env::GameEnv;
use crate::state::{EngineState, EnginePhase};

use super::ActionTransition;
use super::error::InvalidActionReason;
use super::explore::require_phase;
use super::types::ActionResult;

/// Answer the pending event with one of its choices.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MakeEventChoiceAction {
    pub event_id: EventId,
    pub choice_id: String,
}

impl ActionTransition for MakeEventChoiceAction {
    type Outcome = ActionResult;

    fn pre_validate(
        &self,
        state: &EngineState,
        env: &GameEnv<'_>,
    ) -> Result<(), InvalidActionReason> {
        require_phase(state, EnginePhase::AwaitingChoice)?;

        let pending = state
            .pending_event()
            .ok_or(InvalidActionReason::NoPendingEvent)?;
        if *pending != self.event_id {
            return Err(InvalidActionReason::EventNotPending {
                expected: self.event_id.clone(),
                pending: pending.clone(),
            });
        }

        let event = env
            .content()
            .event(&self.event_id)
            .ok_or_else(|| InvalidActionReason::UnknownEvent(self.event_id.clone()))?;

        let choice = event
            .choices
            .iter()
            .find(|choice| choice.id == self.choice_id)
            .ok_or_else(|| InvalidActionReason::UnknownChoice {
                event: self.event_id.clone(),
                choice: self.choice_id.clone(),
            })?;

        let satisfied = choice
            .requirements
            .iter()
            .all(|requirement| conditions::holds(requirement, state));
        if !satisfied {
            return Err(InvalidActionReason::RequirementsNotMet {
                event: self.event_id.clone(),
                choice: self.choice_id.clone(),
            });
        }

        Ok(())
    }

    fn apply(
        &self,
        state: &mut EngineState,
        env: &GameEnv<'_>,
    ) -> Result<Self::Outcome, InvalidActionReason> {
        let event = env
            .content()
            .event(&self.event_id)
            .ok_or_else(|| InvalidActionReason::UnknownEvent(self.event_id.clone()))?;
        let choice = event
            .choices
            .iter()
            .find(|choice| choice.id == self.choice_id)
            .ok_or_else(|| InvalidActionReason::UnknownChoice {
                event: self.event_id.clone(),
                choice: self.choice_id.clone(),
            })?;

        let mut reducer = StateReducer::new(state);
        reducer.set_pending_event(None);
        reducer.set_phase(EnginePhase::Exploring);
        if event.once {
            reducer.complete_event(self.event_id.clone());
        }

        // Consequences run last: they may end the game or queue new state,
        // and must not be overridden by the phase reset above.
        apply_consequences(state, env, &choice.consequences);

        Ok(ActionResult::ChoiceApplied {
            event_id: self.event_id.clone(),
            choice_id: self.choice_id.clone(),
        })
    }
}
