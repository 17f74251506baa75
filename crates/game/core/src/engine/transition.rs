//! Action transition dispatch and execution logic.

use crate::action::{Action, ActionResult, ActionTransition};
use crate::env::GameEnv;
use crate::state::EngineState;

use super::errors::{ExecuteError, TransitionPhase, TransitionPhaseError};

/// Executes a transition through the three-phase pipeline.
///
/// Phases:
/// 1. `pre_validate` - Check preconditions before mutation
/// 2. `apply` - Mutate the engine state and return the result
/// 3. `post_validate` - Verify postconditions after mutation
#[inline]
fn drive_transition<T>(
    transition: &T,
    state: &mut EngineState,
    env: &GameEnv<'_>,
) -> Result<T::Outcome, TransitionPhaseError>
where
    T: ActionTransition,
{
    transition
        .pre_validate(state, env)
        .map_err(|reason| TransitionPhaseError::new(TransitionPhase::PreValidate, reason))?;

    let outcome = transition
        .apply(state, env)
        .map_err(|reason| TransitionPhaseError::new(TransitionPhase::Apply, reason))?;

    transition
        .post_validate(state, env)
        .map_err(|reason| TransitionPhaseError::new(TransitionPhase::PostValidate, reason))?;

    Ok(outcome)
}

/// Routes an action to its transition and drives the pipeline.
pub(super) fn execute_transition(
    action: &Action,
    state: &mut EngineState,
    env: &GameEnv<'_>,
) -> Result<ActionResult, ExecuteError> {
    let name = action.as_snake_case();
    let wrap = |inner| ExecuteError::new(name, inner);

    match action {
        Action::Rest(transition) => drive_transition(transition, state, env).map_err(wrap),
        Action::Travel(transition) => drive_transition(transition, state, env).map_err(wrap),
        Action::StartCombat(transition) => {
            drive_transition(transition, state, env).map_err(wrap)
        }
        Action::PlayCard(transition) => drive_transition(transition, state, env).map_err(wrap),
        Action::CombatApplyEffect(transition) => {
            drive_transition(transition, state, env).map_err(wrap)
        }
        Action::CombatFinish(transition) => {
            drive_transition(transition, state, env).map_err(wrap)
        }
        Action::CommitExternalCombat(transition) => {
            drive_transition(transition, state, env).map_err(wrap)
        }
        Action::StoreEncounterState(transition) => {
            drive_transition(transition, state, env).map_err(wrap)
        }
        Action::MakeEventChoice(transition) => {
            drive_transition(transition, state, env).map_err(wrap)
        }
        Action::AdvanceQuest(transition) => {
            drive_transition(transition, state, env).map_err(wrap)
        }
    }
}
