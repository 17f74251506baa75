//! Player-driven quest advancement.

use serde::{Deserialize, Serialize};

use crate::conditions;
use crate::definitions::QuestId;
use crate::engine::consequences;
use crate::engine::reducer::StateReducer;
use crate::env::GameEnv;
use crate::state::{EngineState, EnginePhase};

use super::ActionTransition;
use super::error::InvalidActionReason;
use super::explore::require_phase;
use super::types::ActionResult;

/// Advance an active quest past its current stage. The stage's completion
/// condition, when present, must hold against the current state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvanceQuestAction {
    pub quest_id: QuestId,
}

impl ActionTransition for AdvanceQuestAction {
    type Outcome = ActionResult;

    fn pre_validate(
        &self,
        state: &EngineState,
        env: &GameEnv<'_>,
    ) -> Result<(), InvalidActionReason> {
        require_phase(state, EnginePhase::Exploring)?;

        let quest = env
            .content()
            .quest(&self.quest_id)
            .ok_or_else(|| InvalidActionReason::UnknownQuest(self.quest_id.clone()))?;

        if state.quests().is_completed(&self.quest_id) {
            return Err(InvalidActionReason::QuestAlreadyCompleted(
                self.quest_id.clone(),
            ));
        }
        let stage = state
            .quests()
            .stage_of(&self.quest_id)
            .ok_or_else(|| InvalidActionReason::QuestNotActive(self.quest_id.clone()))?;

        let completion = quest
            .stages
            .get(stage as usize)
            .and_then(|stage| stage.completion.as_ref());
        if let Some(condition) = completion
            && !conditions::holds(condition, state)
        {
            return Err(InvalidActionReason::StageNotComplete {
                quest: self.quest_id.clone(),
                stage,
            });
        }

        Ok(())
    }

    fn apply(
        &self,
        state: &mut EngineState,
        env: &GameEnv<'_>,
    ) -> Result<Self::Outcome, InvalidActionReason> {
        let quest = env
            .content()
            .quest(&self.quest_id)
            .ok_or_else(|| InvalidActionReason::UnknownQuest(self.quest_id.clone()))?;
        let stage = state
            .quests()
            .stage_of(&self.quest_id)
            .ok_or_else(|| InvalidActionReason::QuestNotActive(self.quest_id.clone()))?;

        let next = stage + 1;
        let completed = (next as usize) >= quest.stages.len();
        if completed {
            consequences::complete_quest(state, env, &self.quest_id);
        } else {
            StateReducer::new(state)
                .quests()
                .set_stage(&self.quest_id, next);
        }

        Ok(ActionResult::QuestAdvanced {
            quest_id: self.quest_id.clone(),
            stage: next,
            completed,
        })
    }
}
