//! Application of authored consequences to the engine state.
//!
//! Event choices, quest rewards and enemy rewards all funnel through
//! [`apply_consequences`]. Application order is authored order; resource
//! changes go through the clamped reducers, so a lethal consequence ends the
//! game exactly like lethal combat damage.

use crate::definitions::{Consequence, QuestId};
use crate::env::GameEnv;
use crate::state::{EngineState, EnginePhase, GameOutcome};

use super::reducer::StateReducer;

/// Applies consequences in order and returns how many were applied.
pub(crate) fn apply_consequences(
    state: &mut EngineState,
    env: &GameEnv<'_>,
    consequences: &[Consequence],
) -> usize {
    for consequence in consequences {
        apply_one(state, env, consequence);
    }
    consequences.len()
}

fn apply_one(state: &mut EngineState, env: &GameEnv<'_>, consequence: &Consequence) {
    let mut reducer = StateReducer::new(state);
    match consequence {
        Consequence::SetFlag(name) => reducer.set_flag(name),
        Consequence::ClearFlag(name) => reducer.clear_flag(name),
        Consequence::ApplyResources(delta) => {
            let mut resources = reducer.resources();
            if delta.health < 0 {
                resources.damage_hero(delta.health.unsigned_abs());
            } else {
                resources.heal_hero(delta.health as u32);
            }
            if delta.faith < 0 {
                resources.spend_faith(delta.faith.unsigned_abs());
            } else {
                resources.gain_faith(delta.faith as u32);
            }
            if delta.balance != 0 {
                resources.shift_balance(delta.balance);
            }
        }
        Consequence::StartQuest(quest) => {
            reducer.quests().start(quest.clone());
        }
        Consequence::AdvanceQuest(quest) => {
            advance_quest(state, env, quest);
        }
        Consequence::CompleteQuest(quest) => {
            complete_quest(state, env, quest);
        }
        Consequence::DiscoverRegion(region) => {
            reducer.world().discover(region.clone());
        }
        Consequence::SetRegionStatus(region, status) => {
            reducer.world().set_region_status(region.clone(), *status);
        }
        Consequence::GainCard(card) => reducer.gain_card(card.clone()),
        Consequence::LoseCard(card) => {
            reducer.lose_card(card);
        }
        Consequence::CompleteEvent(event) => reducer.complete_event(event.clone()),
        Consequence::TriggerVictory => {
            if !state.phase().is_game_over() {
                StateReducer::new(state).set_phase(EnginePhase::GameOver(GameOutcome::Victory));
            }
        }
    }
}

/// Unconditional stage advance used by authored consequences. The
/// `AdvanceQuest` action is the player-driven variant that also checks the
/// stage's completion condition.
pub(crate) fn advance_quest(state: &mut EngineState, env: &GameEnv<'_>, quest: &QuestId) {
    let Some(stage) = state.quests().stage_of(quest) else {
        return;
    };
    let Some(def) = env.content().quest(quest) else {
        return;
    };

    let next = stage + 1;
    if (next as usize) >= def.stages.len() {
        complete_quest(state, env, quest);
    } else {
        StateReducer::new(state).quests().set_stage(quest, next);
    }
}

/// Completes a quest and applies its rewards. The quest is marked completed
/// before rewards run, so mutually-completing quest chains terminate.
pub(crate) fn complete_quest(state: &mut EngineState, env: &GameEnv<'_>, quest: &QuestId) {
    if !StateReducer::new(state).quests().complete(quest) {
        return;
    }
    if let Some(def) = env.content().quest(quest) {
        apply_consequences(state, env, &def.rewards);
    }
}
