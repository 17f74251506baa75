//! Encounter actions: card combat, granular effects, and the external
//! resolution commit gate.

use serde::{Deserialize, Serialize};

use crate::definitions::{CardEffect, CardId, EnemyId, RegionStatus};
use crate::engine::consequences::apply_consequences;
use crate::engine::reducer::StateReducer;
use crate::env::GameEnv;
use crate::state::{
    EncounterState, EngineState, EnginePhase, FLAG_BREACH_SURVIVOR, FLAG_FIRST_BLOOD,
    ResourceMeter,
};

use super::ActionTransition;
use super::error::InvalidActionReason;
use super::explore::require_phase;
use super::types::{ActionResult, AppliedEffect, EncounterEffect, ExternalCombatOutcome};

/// Cards drawn when an encounter opens.
pub const OPENING_HAND: usize = 5;

/// Engage an enemy present in the current region.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartCombatAction {
    pub enemy_id: EnemyId,
}

impl ActionTransition for StartCombatAction {
    type Outcome = ActionResult;

    fn pre_validate(
        &self,
        state: &EngineState,
        env: &GameEnv<'_>,
    ) -> Result<(), InvalidActionReason> {
        require_phase(state, EnginePhase::Exploring)?;

        if state.encounter().is_some() {
            return Err(InvalidActionReason::EncounterPending);
        }

        if env.content().enemy(&self.enemy_id).is_none() {
            return Err(InvalidActionReason::UnknownEnemy(self.enemy_id.clone()));
        }

        let here = &state.world().current_region;
        let region = env
            .content()
            .region(here)
            .ok_or_else(|| InvalidActionReason::UnknownRegion(here.clone()))?;
        if !region.enemy_ids.contains(&self.enemy_id) {
            return Err(InvalidActionReason::EnemyNotHere {
                enemy: self.enemy_id.clone(),
                region: here.clone(),
            });
        }

        Ok(())
    }

    fn apply(
        &self,
        state: &mut EngineState,
        env: &GameEnv<'_>,
    ) -> Result<Self::Outcome, InvalidActionReason> {
        let enemy = env
            .content()
            .enemy(&self.enemy_id)
            .ok_or_else(|| InvalidActionReason::UnknownEnemy(self.enemy_id.clone()))?;

        let mut reducer = StateReducer::new(state);
        reducer.begin_encounter(EncounterState {
            enemy_id: self.enemy_id.clone(),
            enemy_health: ResourceMeter::full(enemy.health),
            hero_guard: 0,
            round: 1,
        });
        reducer.shuffle_deck();
        for _ in 0..OPENING_HAND {
            if reducer.draw_card().is_none() {
                break;
            }
        }
        reducer.set_phase(EnginePhase::InEncounter);

        Ok(ActionResult::CombatStarted {
            enemy_id: self.enemy_id.clone(),
            hand: state.hand().to_vec(),
        })
    }
}

/// Play a card from the hand. Effects apply in authored order, then the
/// enemy retaliates if still standing and the round advances.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayCardAction {
    pub card_id: CardId,
}

impl ActionTransition for PlayCardAction {
    type Outcome = ActionResult;

    fn pre_validate(
        &self,
        state: &EngineState,
        env: &GameEnv<'_>,
    ) -> Result<(), InvalidActionReason> {
        require_phase(state, EnginePhase::InEncounter)?;

        if state.encounter().is_none() {
            return Err(InvalidActionReason::NoEncounter);
        }

        let card = env
            .content()
            .card(&self.card_id)
            .ok_or_else(|| InvalidActionReason::UnknownCard(self.card_id.clone()))?;

        if !state.hand().contains(&self.card_id) {
            return Err(InvalidActionReason::CardNotInHand(self.card_id.clone()));
        }

        let available = state.resources().faith.current;
        if available < card.faith_cost {
            return Err(InvalidActionReason::InsufficientFaith {
                required: card.faith_cost,
                available,
            });
        }

        Ok(())
    }

    fn apply(
        &self,
        state: &mut EngineState,
        env: &GameEnv<'_>,
    ) -> Result<Self::Outcome, InvalidActionReason> {
        let card = env
            .content()
            .card(&self.card_id)
            .ok_or_else(|| InvalidActionReason::UnknownCard(self.card_id.clone()))?;
        let enemy = state
            .encounter()
            .map(|encounter| encounter.enemy_id.clone())
            .ok_or(InvalidActionReason::NoEncounter)?;
        let enemy_guard = env
            .content()
            .enemy(&enemy)
            .map(|def| def.guard)
            .unwrap_or(0);

        let mut applied = Vec::with_capacity(card.effects.len());
        let mut reducer = StateReducer::new(state);
        reducer.resources().spend_faith(card.faith_cost);
        for effect in &card.effects {
            match effect {
                CardEffect::Damage(amount) => {
                    let dealt = amount.saturating_sub(enemy_guard);
                    let remaining = reducer.damage_enemy(dealt);
                    applied.push(AppliedEffect::EnemyDamaged {
                        amount: dealt,
                        remaining,
                    });
                }
                CardEffect::Guard(amount) => {
                    let total = reducer.add_hero_guard(*amount);
                    applied.push(AppliedEffect::GuardGained {
                        amount: *amount,
                        total,
                    });
                }
                CardEffect::Heal(amount) => {
                    let mut resources = reducer.resources();
                    let healed = resources.heal_hero(*amount);
                    applied.push(AppliedEffect::HeroHealed {
                        amount: healed,
                        current: resources.health().current,
                    });
                }
                CardEffect::Balance(amount) => {
                    let balance = reducer.resources().shift_balance(*amount);
                    applied.push(AppliedEffect::BalanceShifted {
                        amount: *amount,
                        balance,
                    });
                }
            }
        }
        reducer.discard_from_hand(&self.card_id);
        reducer.draw_card();

        // Retaliation closes the round while the enemy still stands.
        let enemy_alive = state
            .encounter()
            .map(|encounter| !encounter.enemy_health.is_empty())
            .unwrap_or(false);
        if enemy_alive {
            let attack = env
                .content()
                .enemy(&enemy)
                .map(|def| def.attack)
                .unwrap_or(0);
            let mut reducer = StateReducer::new(state);
            let remaining = reducer.damage_hero_with_guard(attack);
            reducer.advance_round();
            applied.push(AppliedEffect::HeroDamaged {
                amount: attack,
                remaining,
            });
        }

        Ok(ActionResult::CardPlayed {
            card_id: self.card_id.clone(),
            applied,
        })
    }
}

/// Apply one granular encounter effect. This is the entry point external
/// combat drivers use to mutate an encounter step by step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatApplyEffectAction {
    pub effect: EncounterEffect,
}

impl ActionTransition for CombatApplyEffectAction {
    type Outcome = ActionResult;

    fn pre_validate(
        &self,
        state: &EngineState,
        _env: &GameEnv<'_>,
    ) -> Result<(), InvalidActionReason> {
        require_phase(state, EnginePhase::InEncounter)?;
        if state.encounter().is_none() {
            return Err(InvalidActionReason::NoEncounter);
        }
        Ok(())
    }

    fn apply(
        &self,
        state: &mut EngineState,
        _env: &GameEnv<'_>,
    ) -> Result<Self::Outcome, InvalidActionReason> {
        let mut reducer = StateReducer::new(state);
        let applied = match self.effect {
            EncounterEffect::DamageEnemy(amount) => {
                let remaining = reducer.damage_enemy(amount);
                AppliedEffect::EnemyDamaged { amount, remaining }
            }
            EncounterEffect::DamageHero(amount) => {
                let remaining = reducer.damage_hero_with_guard(amount);
                AppliedEffect::HeroDamaged { amount, remaining }
            }
            EncounterEffect::HealHero(amount) => {
                let mut resources = reducer.resources();
                let healed = resources.heal_hero(amount);
                AppliedEffect::HeroHealed {
                    amount: healed,
                    current: resources.health().current,
                }
            }
            EncounterEffect::GuardHero(amount) => {
                let total = reducer.add_hero_guard(amount);
                AppliedEffect::GuardGained { amount, total }
            }
            EncounterEffect::ShiftBalance(amount) => {
                let balance = reducer.resources().shift_balance(amount);
                AppliedEffect::BalanceShifted { amount, balance }
            }
        };

        Ok(ActionResult::EffectApplied(applied))
    }
}

/// Finalize a won encounter: rewards, system flags, cards back to the deck.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatFinishAction;

impl ActionTransition for CombatFinishAction {
    type Outcome = ActionResult;

    fn pre_validate(
        &self,
        state: &EngineState,
        _env: &GameEnv<'_>,
    ) -> Result<(), InvalidActionReason> {
        require_phase(state, EnginePhase::InEncounter)?;
        let encounter = state.encounter().ok_or(InvalidActionReason::NoEncounter)?;
        if !encounter.enemy_health.is_empty() {
            return Err(InvalidActionReason::EncounterNotFinished);
        }
        Ok(())
    }

    fn apply(
        &self,
        state: &mut EngineState,
        env: &GameEnv<'_>,
    ) -> Result<Self::Outcome, InvalidActionReason> {
        let encounter = StateReducer::new(state)
            .end_encounter()
            .ok_or(InvalidActionReason::NoEncounter)?;

        let mut reducer = StateReducer::new(state);
        reducer.return_all_to_deck();
        reducer.set_phase(EnginePhase::Exploring);
        let rewards_applied = finalize_victory(state, env, &encounter.enemy_id);

        Ok(ActionResult::CombatFinished {
            enemy_id: encounter.enemy_id,
            rewards_applied,
        })
    }
}

/// Stash the live encounter and return to exploration. The stored snapshot
/// is what an external sub-simulation later resolves through
/// [`CommitExternalCombatAction`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreEncounterAction;

impl ActionTransition for StoreEncounterAction {
    type Outcome = ActionResult;

    fn pre_validate(
        &self,
        state: &EngineState,
        _env: &GameEnv<'_>,
    ) -> Result<(), InvalidActionReason> {
        require_phase(state, EnginePhase::InEncounter)?;
        if state.encounter().is_none() {
            return Err(InvalidActionReason::NoEncounter);
        }
        Ok(())
    }

    fn apply(
        &self,
        state: &mut EngineState,
        _env: &GameEnv<'_>,
    ) -> Result<Self::Outcome, InvalidActionReason> {
        let enemy_id = state
            .encounter()
            .map(|encounter| encounter.enemy_id.clone())
            .ok_or(InvalidActionReason::NoEncounter)?;

        // The encounter snapshot stays in state; only the phase leaves
        // combat.
        StateReducer::new(state).set_phase(EnginePhase::Exploring);

        Ok(ActionResult::EncounterStored { enemy_id })
    }
}

/// Commit the result of an externally-resolved encounter.
///
/// This is the single write gate for external combat: no other call site
/// may touch the pending-encounter or world-mutation fields, otherwise the
/// save/seed-reproducibility contract breaks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitExternalCombatAction {
    pub outcome: ExternalCombatOutcome,
}

impl ActionTransition for CommitExternalCombatAction {
    type Outcome = ActionResult;

    fn pre_validate(
        &self,
        state: &EngineState,
        _env: &GameEnv<'_>,
    ) -> Result<(), InvalidActionReason> {
        let encounter = state.encounter().ok_or(InvalidActionReason::NoEncounter)?;
        if encounter.enemy_id != self.outcome.enemy_id {
            return Err(InvalidActionReason::EncounterMismatch {
                expected: self.outcome.enemy_id.clone(),
                actual: encounter.enemy_id.clone(),
            });
        }
        Ok(())
    }

    fn apply(
        &self,
        state: &mut EngineState,
        env: &GameEnv<'_>,
    ) -> Result<Self::Outcome, InvalidActionReason> {
        let mut reducer = StateReducer::new(state);
        reducer.end_encounter();
        reducer.return_all_to_deck();
        reducer.rng().restore(self.outcome.rng_state_after);
        reducer.set_phase(EnginePhase::Exploring);
        reducer.resources().set_hero_pools(
            self.outcome.hero_health_after,
            self.outcome.hero_faith_after,
        );

        if self.outcome.victory {
            finalize_victory(state, env, &self.outcome.enemy_id);
        }

        Ok(ActionResult::ExternalCombatCommitted {
            enemy_id: self.outcome.enemy_id.clone(),
            victory: self.outcome.victory,
        })
    }
}

/// Shared victory bookkeeping: enemy rewards plus the system flags the
/// engine owns.
fn finalize_victory(
    state: &mut EngineState,
    env: &GameEnv<'_>,
    enemy_id: &EnemyId,
) -> usize {
    let here = state.world().current_region.clone();
    let in_breach = state.world().status_of(&here) == RegionStatus::Breach;

    let mut reducer = StateReducer::new(state);
    reducer.set_flag(FLAG_FIRST_BLOOD);
    if in_breach {
        reducer.set_flag(FLAG_BREACH_SURVIVOR);
    }

    match env.content().enemy(enemy_id) {
        Some(enemy) => apply_consequences(state, env, &enemy.reward),
        None => 0,
    }
}
