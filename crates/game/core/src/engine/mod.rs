//! Action execution pipeline.
//!
//! [`GameEngine`] is the authoritative reducer for [`EngineState`]: the
//! single mutation entry point the runtime exposes to collaborators. Every
//! action flows through the same three-phase pipeline
//! (pre_validate -> apply -> post_validate); validation happens entirely
//! before mutation, so a rejected action leaves the state untouched.

mod errors;
mod transition;

pub(crate) mod consequences;
pub(crate) mod reducer;

pub use errors::{ExecuteError, TransitionPhase, TransitionPhaseError};

use crate::action::{Action, ActionResult, InvalidActionReason};
use crate::env::GameEnv;
use crate::state::EngineState;

/// Complete outcome of a successfully executed action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutionOutcome {
    /// Typed result carrying the action's state delta.
    pub result: ActionResult,
    /// Action counter after execution.
    pub nonce: u64,
}

/// Engine driving action execution against one engine state.
pub struct GameEngine<'a> {
    state: &'a mut EngineState,
}

impl<'a> GameEngine<'a> {
    pub fn new(state: &'a mut EngineState) -> Self {
        Self { state }
    }

    /// Executes an action through the transition pipeline.
    ///
    /// A terminal state rejects everything: `GameOver` is a sink, and the
    /// collaborator starts a new game or restores a save to continue.
    pub fn execute(
        &mut self,
        env: GameEnv<'_>,
        action: &Action,
    ) -> Result<ExecutionOutcome, ExecuteError> {
        if self.state.phase().is_game_over() {
            return Err(ExecuteError::new(
                action.as_snake_case(),
                TransitionPhaseError::new(
                    TransitionPhase::PreValidate,
                    InvalidActionReason::GameOver,
                ),
            ));
        }

        let result = transition::execute_transition(action, self.state, &env)?;

        self.state.nonce += 1;

        Ok(ExecutionOutcome {
            result,
            nonce: self.state.nonce,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{
        AdvanceQuestAction, CombatApplyEffectAction, CombatFinishAction,
        CommitExternalCombatAction, EncounterEffect, ExternalCombatOutcome,
        MakeEventChoiceAction, PlayCardAction, RestAction, StartCombatAction,
        StoreEncounterAction, TravelAction,
    };
    use crate::definitions::CardId;
    use crate::state::{EnginePhase, FLAG_FIRST_BLOOD, GameOutcome};
    use crate::testutil::fixture_content;

    fn new_state(seed: u64) -> (crate::testutil::FixtureContent, EngineState) {
        let content = fixture_content();
        let state = {
            let env = GameEnv::new(&content);
            EngineState::new(&content.hero, &env, seed).unwrap()
        };
        (content, state)
    }

    fn execute(
        content: &crate::testutil::FixtureContent,
        state: &mut EngineState,
        action: Action,
    ) -> Result<ExecutionOutcome, ExecuteError> {
        let env = GameEnv::new(content);
        GameEngine::new(state).execute(env, &action)
    }

    fn travel(
        content: &crate::testutil::FixtureContent,
        state: &mut EngineState,
        to: &str,
    ) -> ExecutionOutcome {
        execute(
            content,
            state,
            Action::Travel(TravelAction { to: to.into() }),
        )
        .unwrap()
    }

    #[test]
    fn travel_to_neighbor_discovers_destination() {
        let (content, mut state) = new_state(1);

        let outcome = travel(&content, &mut state, "ash_gate");

        assert_eq!(state.world().current_region.as_str(), "ash_gate");
        assert!(state.world().discovered.contains(&"ash_gate".into()));
        assert_eq!(outcome.nonce, 1);
        match outcome.result {
            ActionResult::Traveled { from, to, .. } => {
                assert_eq!(from.as_str(), "vigil_keep");
                assert_eq!(to.as_str(), "ash_gate");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn travel_to_non_neighbor_is_rejected_without_mutation() {
        let (content, mut state) = new_state(1);
        let before = state.clone();

        let error = execute(
            &content,
            &mut state,
            Action::Travel(TravelAction {
                to: "breach_maw".into(),
            }),
        )
        .unwrap_err();

        assert!(matches!(
            error.reason(),
            InvalidActionReason::NotNeighbor { .. }
        ));
        assert_eq!(error.phase(), TransitionPhase::PreValidate);
        assert_eq!(state, before, "rejected action must not mutate state");
    }

    #[test]
    fn travel_to_unknown_region_names_it() {
        let (content, mut state) = new_state(1);

        let error = execute(
            &content,
            &mut state,
            Action::Travel(TravelAction {
                to: "atlantis".into(),
            }),
        )
        .unwrap_err();

        assert_eq!(
            *error.reason(),
            InvalidActionReason::UnknownRegion("atlantis".into())
        );
    }

    #[test]
    fn rest_heals_clamped_and_spends_faith() {
        let (content, mut state) = new_state(1);
        travel(&content, &mut state, "ash_gate");
        resolve_pending_event(&content, &mut state);
        travel(&content, &mut state, "vigil_keep");

        let faith_before = state.resources().faith.current;
        let outcome = execute(
            &content,
            &mut state,
            Action::Rest(RestAction {
                anchor_id: "keep_shrine".into(),
            }),
        )
        .unwrap();

        match outcome.result {
            ActionResult::Rested {
                healed,
                faith_spent,
                ..
            } => {
                assert_eq!(faith_spent, 2);
                // Full health: nothing to heal, clamped at zero restored.
                assert_eq!(healed, 0);
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(state.resources().faith.current, faith_before - 2);
        assert!(
            state.resources().health.current <= state.resources().health.maximum
        );
        assert!(state.flag(crate::state::FLAG_ANCHOR_LIT));
    }

    #[test]
    fn rest_at_foreign_anchor_is_rejected() {
        let (content, mut state) = new_state(1);
        travel(&content, &mut state, "ash_gate");
        resolve_pending_event(&content, &mut state);

        let error = execute(
            &content,
            &mut state,
            Action::Rest(RestAction {
                anchor_id: "keep_shrine".into(),
            }),
        )
        .unwrap_err();

        assert!(matches!(
            error.reason(),
            InvalidActionReason::AnchorNotHere { .. }
        ));
    }

    #[test]
    fn arrival_event_awaits_choice_and_resolves() {
        let (content, mut state) = new_state(1);

        let outcome = travel(&content, &mut state, "ash_gate");
        let event = match &outcome.result {
            ActionResult::Traveled { event, .. } => event.clone(),
            other => panic!("unexpected result: {other:?}"),
        };
        assert_eq!(event, Some("gate_omen".into()));
        assert_eq!(state.phase(), EnginePhase::AwaitingChoice);

        // Exploring actions are rejected while a choice is pending.
        let error = execute(
            &content,
            &mut state,
            Action::Travel(TravelAction {
                to: "vigil_keep".into(),
            }),
        )
        .unwrap_err();
        assert!(matches!(
            error.reason(),
            InvalidActionReason::WrongPhase { .. }
        ));

        execute(
            &content,
            &mut state,
            Action::MakeEventChoice(MakeEventChoiceAction {
                event_id: "gate_omen".into(),
                choice_id: "pray".into(),
            }),
        )
        .unwrap();

        assert_eq!(state.phase(), EnginePhase::Exploring);
        assert!(state.flag("omen_heeded"));
        assert!(state.quests().is_active(&"seal_the_breach".into()));
        // Once-only event never fires again.
        assert!(state.completed_events().contains(&"gate_omen".into()));
        travel(&content, &mut state, "vigil_keep");
        let back = travel(&content, &mut state, "ash_gate");
        match back.result {
            ActionResult::Traveled { event, .. } => assert_eq!(event, None),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn unknown_choice_is_rejected() {
        let (content, mut state) = new_state(1);
        travel(&content, &mut state, "ash_gate");

        let error = execute(
            &content,
            &mut state,
            Action::MakeEventChoice(MakeEventChoiceAction {
                event_id: "gate_omen".into(),
                choice_id: "flee".into(),
            }),
        )
        .unwrap_err();

        assert!(matches!(
            error.reason(),
            InvalidActionReason::UnknownChoice { .. }
        ));
        assert_eq!(state.phase(), EnginePhase::AwaitingChoice);
    }

    fn resolve_pending_event(
        content: &crate::testutil::FixtureContent,
        state: &mut EngineState,
    ) {
        if let Some(event) = state.pending_event().cloned() {
            execute(
                content,
                state,
                Action::MakeEventChoice(MakeEventChoiceAction {
                    event_id: event,
                    choice_id: "ignore".into(),
                }),
            )
            .unwrap();
        }
    }

    fn enter_combat(
        content: &crate::testutil::FixtureContent,
        state: &mut EngineState,
        enemy: &str,
    ) -> ExecutionOutcome {
        execute(
            content,
            state,
            Action::StartCombat(StartCombatAction {
                enemy_id: enemy.into(),
            }),
        )
        .unwrap()
    }

    #[test]
    fn start_combat_draws_opening_hand() {
        let (content, mut state) = new_state(1);
        travel(&content, &mut state, "ash_gate");
        resolve_pending_event(&content, &mut state);

        let outcome = enter_combat(&content, &mut state, "husk");

        assert_eq!(state.phase(), EnginePhase::InEncounter);
        assert_eq!(state.hand().len(), crate::action::OPENING_HAND);
        match outcome.result {
            ActionResult::CombatStarted { enemy_id, hand } => {
                assert_eq!(enemy_id.as_str(), "husk");
                assert_eq!(hand.len(), crate::action::OPENING_HAND);
            }
            other => panic!("unexpected result: {other:?}"),
        }
        let encounter = state.encounter().unwrap();
        assert_eq!(encounter.enemy_health.current, 10);
        assert_eq!(encounter.round, 1);
    }

    #[test]
    fn overkill_damage_clamps_enemy_health_to_zero() {
        let (content, mut state) = new_state(1);
        travel(&content, &mut state, "ash_gate");
        resolve_pending_event(&content, &mut state);
        enter_combat(&content, &mut state, "husk");

        let outcome = execute(
            &content,
            &mut state,
            Action::CombatApplyEffect(CombatApplyEffectAction {
                effect: EncounterEffect::DamageEnemy(9999),
            }),
        )
        .unwrap();

        assert_eq!(state.encounter().unwrap().enemy_health.current, 0);
        match outcome.result {
            ActionResult::EffectApplied(crate::action::AppliedEffect::EnemyDamaged {
                remaining,
                ..
            }) => assert_eq!(remaining, 0),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn combat_finish_requires_a_dead_enemy() {
        let (content, mut state) = new_state(1);
        travel(&content, &mut state, "ash_gate");
        resolve_pending_event(&content, &mut state);
        enter_combat(&content, &mut state, "husk");

        let error = execute(
            &content,
            &mut state,
            Action::CombatFinish(CombatFinishAction),
        )
        .unwrap_err();
        assert_eq!(*error.reason(), InvalidActionReason::EncounterNotFinished);
    }

    #[test]
    fn combat_victory_applies_rewards_and_returns_cards() {
        let (content, mut state) = new_state(1);
        let deck_size = state.deck().len();
        travel(&content, &mut state, "ash_gate");
        resolve_pending_event(&content, &mut state);
        enter_combat(&content, &mut state, "husk");
        let faith_before = state.resources().faith.current;

        execute(
            &content,
            &mut state,
            Action::CombatApplyEffect(CombatApplyEffectAction {
                effect: EncounterEffect::DamageEnemy(10),
            }),
        )
        .unwrap();
        execute(
            &content,
            &mut state,
            Action::CombatFinish(CombatFinishAction),
        )
        .unwrap();

        assert_eq!(state.phase(), EnginePhase::Exploring);
        assert!(state.encounter().is_none());
        assert!(state.flag(FLAG_FIRST_BLOOD));
        // Husk reward grants faith, clamped to the maximum.
        assert!(state.resources().faith.current >= faith_before);
        assert_eq!(state.deck().len(), deck_size);
        assert!(state.hand().is_empty());
        assert!(state.discard().is_empty());
    }

    #[test]
    fn play_card_damages_enemy_and_triggers_retaliation() {
        let (content, mut state) = new_state(1);
        travel(&content, &mut state, "ash_gate");
        resolve_pending_event(&content, &mut state);
        enter_combat(&content, &mut state, "husk");

        let strike = CardId::from("strike");
        assert!(
            state.hand().contains(&strike),
            "fixture deck is mostly strikes; seed 1 must draw one"
        );
        let health_before = state.resources().health.current;

        let outcome = execute(
            &content,
            &mut state,
            Action::PlayCard(PlayCardAction {
                card_id: strike.clone(),
            }),
        )
        .unwrap();

        let encounter = state.encounter().unwrap();
        assert_eq!(encounter.enemy_health.current, 10 - 6);
        assert_eq!(encounter.round, 2);
        // Husk hits back for 3.
        assert_eq!(state.resources().health.current, health_before - 3);
        assert!(state.discard().contains(&strike));
        match outcome.result {
            ActionResult::CardPlayed { applied, .. } => {
                assert!(applied.len() >= 2, "damage plus retaliation");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn hero_death_is_terminal() {
        let (content, mut state) = new_state(1);
        travel(&content, &mut state, "ash_gate");
        resolve_pending_event(&content, &mut state);
        enter_combat(&content, &mut state, "husk");

        execute(
            &content,
            &mut state,
            Action::CombatApplyEffect(CombatApplyEffectAction {
                effect: EncounterEffect::DamageHero(9999),
            }),
        )
        .unwrap();

        assert_eq!(state.resources().health.current, 0);
        assert_eq!(state.phase(), EnginePhase::GameOver(GameOutcome::Defeat));

        let error = execute(
            &content,
            &mut state,
            Action::CombatFinish(CombatFinishAction),
        )
        .unwrap_err();
        assert_eq!(*error.reason(), InvalidActionReason::GameOver);
    }

    #[test]
    fn stored_encounter_resolves_through_external_commit() {
        let (content, mut state) = new_state(1);
        travel(&content, &mut state, "ash_gate");
        resolve_pending_event(&content, &mut state);
        enter_combat(&content, &mut state, "husk");

        execute(
            &content,
            &mut state,
            Action::StoreEncounterState(StoreEncounterAction),
        )
        .unwrap();
        assert_eq!(state.phase(), EnginePhase::Exploring);
        assert!(state.encounter().is_some(), "encounter stays pending");

        // A second encounter cannot start while one is pending.
        let error = execute(
            &content,
            &mut state,
            Action::StartCombat(StartCombatAction {
                enemy_id: "husk".into(),
            }),
        )
        .unwrap_err();
        assert_eq!(*error.reason(), InvalidActionReason::EncounterPending);

        // External sub-simulation: continue the RNG sequence elsewhere.
        let mut external_rng = crate::rng::DeterministicRng::seeded(0);
        external_rng.restore(state.rng_state());
        external_rng.next_u64();

        execute(
            &content,
            &mut state,
            Action::CommitExternalCombat(CommitExternalCombatAction {
                outcome: ExternalCombatOutcome {
                    enemy_id: "husk".into(),
                    victory: true,
                    hero_health_after: 9999,
                    hero_faith_after: 4,
                    rng_state_after: external_rng.state(),
                },
            }),
        )
        .unwrap();

        assert!(state.encounter().is_none());
        assert_eq!(state.phase(), EnginePhase::Exploring);
        // Committed pools are clamped to the hero's maximums.
        assert_eq!(
            state.resources().health.current,
            state.resources().health.maximum
        );
        assert_eq!(state.resources().faith.current, 4);
        assert_eq!(state.rng_state(), external_rng.state());
        assert!(state.flag(FLAG_FIRST_BLOOD));
    }

    #[test]
    fn external_commit_against_wrong_enemy_is_rejected() {
        let (content, mut state) = new_state(1);
        travel(&content, &mut state, "ash_gate");
        resolve_pending_event(&content, &mut state);
        enter_combat(&content, &mut state, "husk");

        let error = execute(
            &content,
            &mut state,
            Action::CommitExternalCombat(CommitExternalCombatAction {
                outcome: ExternalCombatOutcome {
                    enemy_id: "maw_warden".into(),
                    victory: true,
                    hero_health_after: 10,
                    hero_faith_after: 10,
                    rng_state_after: 0,
                },
            }),
        )
        .unwrap_err();

        assert!(matches!(
            error.reason(),
            InvalidActionReason::EncounterMismatch { .. }
        ));
    }

    #[test]
    fn quest_advances_through_stages_to_victory() {
        let (content, mut state) = new_state(1);
        travel(&content, &mut state, "ash_gate");

        // "pray" starts the quest.
        execute(
            &content,
            &mut state,
            Action::MakeEventChoice(MakeEventChoiceAction {
                event_id: "gate_omen".into(),
                choice_id: "pray".into(),
            }),
        )
        .unwrap();
        let quest = crate::definitions::QuestId::from("seal_the_breach");
        assert_eq!(state.quests().stage_of(&quest), Some(0));

        // Stage 0 requires discovering the maw.
        let error = execute(
            &content,
            &mut state,
            Action::AdvanceQuest(AdvanceQuestAction {
                quest_id: quest.clone(),
            }),
        )
        .unwrap_err();
        assert!(matches!(
            error.reason(),
            InvalidActionReason::StageNotComplete { stage: 0, .. }
        ));

        travel(&content, &mut state, "breach_maw");
        resolve_pending_event(&content, &mut state);
        let outcome = execute(
            &content,
            &mut state,
            Action::AdvanceQuest(AdvanceQuestAction {
                quest_id: quest.clone(),
            }),
        )
        .unwrap();
        match outcome.result {
            ActionResult::QuestAdvanced {
                stage, completed, ..
            } => {
                assert_eq!(stage, 1);
                assert!(!completed);
            }
            other => panic!("unexpected result: {other:?}"),
        }

        // Stage 1 requires slaying the warden.
        enter_combat(&content, &mut state, "maw_warden");
        execute(
            &content,
            &mut state,
            Action::CombatApplyEffect(CombatApplyEffectAction {
                effect: EncounterEffect::DamageEnemy(9999),
            }),
        )
        .unwrap();
        execute(
            &content,
            &mut state,
            Action::CombatFinish(CombatFinishAction),
        )
        .unwrap();
        assert!(state.flag("warden_slain"));
        assert!(
            state.flag(crate::state::FLAG_BREACH_SURVIVOR),
            "the maw is breached"
        );

        let outcome = execute(
            &content,
            &mut state,
            Action::AdvanceQuest(AdvanceQuestAction {
                quest_id: quest.clone(),
            }),
        )
        .unwrap();
        match outcome.result {
            ActionResult::QuestAdvanced { completed, .. } => assert!(completed),
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(state.quests().is_completed(&quest));
        // Quest rewards end the campaign.
        assert_eq!(state.phase(), EnginePhase::GameOver(GameOutcome::Victory));
    }

    #[test]
    fn identical_seeds_replay_identically() {
        let (content, mut a) = new_state(777);
        let (_, mut b) = new_state(777);

        for state in [&mut a, &mut b] {
            travel(&content, state, "ash_gate");
            resolve_pending_event(&content, state);
            enter_combat(&content, state, "husk");
        }

        assert_eq!(a, b);
        assert_eq!(a.hand(), b.hand(), "shuffle and draw are seed-determined");
    }
}
