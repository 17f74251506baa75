//! Crate-private mutation layer over [`EngineState`].
//!
//! Every action transition mutates state through these reducers; the module
//! is not exported, so callers outside the crate cannot write fields. The
//! clamping invariants live here: hero health and faith stay in `[0, max]`,
//! enemy health in `[0, max]`, balance in `[BALANCE_MIN, BALANCE_MAX]`.

use crate::definitions::{CardId, EventId, QuestId, RegionId, RegionStatus};
use crate::rng::DeterministicRng;
use crate::state::{
    EncounterState, EngineState, EnginePhase, GameOutcome, QuestLog, Resources, WorldState,
};

/// Wraps mutable access to [`EngineState`] with structured sub-reducers.
pub(crate) struct StateReducer<'a> {
    state: &'a mut EngineState,
}

impl<'a> StateReducer<'a> {
    pub(crate) fn new(state: &'a mut EngineState) -> Self {
        Self { state }
    }

    pub(crate) fn resources(&mut self) -> ResourcesReducer<'_> {
        ResourcesReducer {
            resources: &mut self.state.resources,
            phase: &mut self.state.phase,
        }
    }

    pub(crate) fn world(&mut self) -> WorldReducer<'_> {
        WorldReducer {
            world: &mut self.state.world,
        }
    }

    pub(crate) fn quests(&mut self) -> QuestReducer<'_> {
        QuestReducer {
            quests: &mut self.state.quests,
        }
    }

    pub(crate) fn set_phase(&mut self, phase: EnginePhase) {
        self.state.phase = phase;
    }

    pub(crate) fn set_flag(&mut self, name: &str) {
        self.state.flags.insert(name.to_owned(), true);
    }

    pub(crate) fn clear_flag(&mut self, name: &str) {
        self.state.flags.insert(name.to_owned(), false);
    }

    pub(crate) fn complete_event(&mut self, event: EventId) {
        self.state.completed_events.insert(event);
    }

    pub(crate) fn set_pending_event(&mut self, event: Option<EventId>) {
        self.state.pending_event = event;
    }

    pub(crate) fn rng(&mut self) -> &mut DeterministicRng {
        &mut self.state.rng
    }

    // ------------------------------------------------------------------
    // Deck operations. These live on the root reducer because drawing and
    // shuffling borrow the RNG alongside the piles.
    // ------------------------------------------------------------------

    /// Shuffles the draw pile in place.
    pub(crate) fn shuffle_deck(&mut self) {
        let EngineState { deck, rng, .. } = &mut *self.state;
        rng.shuffle(deck);
    }

    /// Draws from the top of the deck into the hand. When the deck runs
    /// out, the discard pile is shuffled back in.
    pub(crate) fn draw_card(&mut self) -> Option<CardId> {
        if self.state.deck.is_empty() && !self.state.discard.is_empty() {
            self.state.deck.append(&mut self.state.discard);
            self.shuffle_deck();
        }
        let card = self.state.deck.pop()?;
        self.state.hand.push(card.clone());
        Some(card)
    }

    /// Moves a card from the hand to the discard pile.
    pub(crate) fn discard_from_hand(&mut self, card: &CardId) -> bool {
        let Some(index) = self.state.hand.iter().position(|held| held == card) else {
            return false;
        };
        let card = self.state.hand.remove(index);
        self.state.discard.push(card);
        true
    }

    pub(crate) fn gain_card(&mut self, card: CardId) {
        self.state.deck.push(card);
    }

    /// Removes one copy of a card, searching deck, then hand, then discard.
    pub(crate) fn lose_card(&mut self, card: &CardId) -> bool {
        for pile in [
            &mut self.state.deck,
            &mut self.state.hand,
            &mut self.state.discard,
        ] {
            if let Some(index) = pile.iter().position(|held| held == card) {
                pile.remove(index);
                return true;
            }
        }
        false
    }

    /// Returns hand and discard to the deck after an encounter ends.
    pub(crate) fn return_all_to_deck(&mut self) {
        let EngineState { deck, hand, discard, .. } = &mut *self.state;
        deck.append(hand);
        deck.append(discard);
    }

    // ------------------------------------------------------------------
    // Encounter operations.
    // ------------------------------------------------------------------

    pub(crate) fn begin_encounter(&mut self, encounter: EncounterState) {
        self.state.encounter = Some(encounter);
    }

    pub(crate) fn end_encounter(&mut self) -> Option<EncounterState> {
        self.state.encounter.take()
    }

    /// Damages the engaged enemy, clamped at zero. Returns remaining health.
    pub(crate) fn damage_enemy(&mut self, amount: u32) -> u32 {
        let encounter = self
            .state
            .encounter
            .as_mut()
            .expect("damage_enemy requires a live encounter");
        let meter = &mut encounter.enemy_health;
        meter.current = meter.current.saturating_sub(amount);
        meter.current
    }

    /// Adds hero guard for the current encounter. Returns the new total.
    pub(crate) fn add_hero_guard(&mut self, amount: u32) -> u32 {
        let encounter = self
            .state
            .encounter
            .as_mut()
            .expect("add_hero_guard requires a live encounter");
        encounter.hero_guard = encounter.hero_guard.saturating_add(amount);
        encounter.hero_guard
    }

    /// Applies incoming damage to the hero, letting encounter guard absorb
    /// first. Returns the hero's remaining health.
    pub(crate) fn damage_hero_with_guard(&mut self, amount: u32) -> u32 {
        let absorbed = match self.state.encounter.as_mut() {
            Some(encounter) => {
                let absorbed = encounter.hero_guard.min(amount);
                encounter.hero_guard -= absorbed;
                absorbed
            }
            None => 0,
        };
        self.resources().damage_hero(amount - absorbed)
    }

    pub(crate) fn advance_round(&mut self) {
        if let Some(encounter) = self.state.encounter.as_mut() {
            encounter.round += 1;
        }
    }
}

pub(crate) struct ResourcesReducer<'a> {
    resources: &'a mut Resources,
    phase: &'a mut EnginePhase,
}

impl<'a> ResourcesReducer<'a> {
    /// Damages the hero, clamped at zero. Reaching zero ends the game in
    /// defeat immediately, whatever the source of the damage.
    pub(crate) fn damage_hero(&mut self, amount: u32) -> u32 {
        let meter = &mut self.resources.health;
        meter.current = meter.current.saturating_sub(amount);
        if meter.current == 0 && !self.phase.is_game_over() {
            *self.phase = EnginePhase::GameOver(GameOutcome::Defeat);
        }
        meter.current
    }

    /// Heals the hero, clamped to the maximum. Returns the amount actually
    /// restored.
    pub(crate) fn heal_hero(&mut self, amount: u32) -> u32 {
        let meter = &mut self.resources.health;
        let healed = amount.min(meter.maximum.saturating_sub(meter.current));
        meter.current += healed;
        healed
    }

    pub(crate) fn health(&self) -> crate::state::ResourceMeter {
        self.resources.health
    }

    pub(crate) fn spend_faith(&mut self, amount: u32) {
        let meter = &mut self.resources.faith;
        meter.current = meter.current.saturating_sub(amount);
    }

    pub(crate) fn gain_faith(&mut self, amount: u32) -> u32 {
        let meter = &mut self.resources.faith;
        let gained = amount.min(meter.maximum.saturating_sub(meter.current));
        meter.current += gained;
        gained
    }

    /// Overwrites hero pools from an external combat commit, clamped to the
    /// hero's maximums. Defeat triggers when health lands on zero.
    pub(crate) fn set_hero_pools(&mut self, health: u32, faith: u32) {
        self.resources.health.current = health.min(self.resources.health.maximum);
        self.resources.faith.current = faith.min(self.resources.faith.maximum);
        if self.resources.health.current == 0 && !self.phase.is_game_over() {
            *self.phase = EnginePhase::GameOver(GameOutcome::Defeat);
        }
    }

    /// Shifts balance, clamped to its domain. Returns the new value.
    pub(crate) fn shift_balance(&mut self, amount: i32) -> i32 {
        let shifted = i64::from(self.resources.balance) + i64::from(amount);
        self.resources.balance = crate::state::clamp_balance(shifted);
        self.resources.balance
    }
}

pub(crate) struct WorldReducer<'a> {
    world: &'a mut WorldState,
}

impl<'a> WorldReducer<'a> {
    pub(crate) fn set_current_region(&mut self, region: RegionId) -> RegionId {
        core::mem::replace(&mut self.world.current_region, region)
    }

    pub(crate) fn discover(&mut self, region: RegionId) -> bool {
        self.world.discovered.insert(region)
    }

    pub(crate) fn set_region_status(&mut self, region: RegionId, status: RegionStatus) {
        self.world.region_status.insert(region, status);
    }

    /// Steps the given region's status one step toward `Stable` and returns
    /// the new status.
    pub(crate) fn stabilize(&mut self, region: &RegionId) -> RegionStatus {
        let status = self.world.status_of(region).stabilized();
        self.world.region_status.insert(region.clone(), status);
        status
    }
}

pub(crate) struct QuestReducer<'a> {
    quests: &'a mut QuestLog,
}

impl<'a> QuestReducer<'a> {
    /// Activates a quest at stage zero unless already active or completed.
    pub(crate) fn start(&mut self, quest: QuestId) -> bool {
        if self.quests.completed.contains(&quest) || self.quests.active.contains_key(&quest)
        {
            return false;
        }
        self.quests.active.insert(quest, 0);
        true
    }

    pub(crate) fn set_stage(&mut self, quest: &QuestId, stage: u32) {
        if let Some(current) = self.quests.active.get_mut(quest) {
            *current = stage;
        }
    }

    /// Moves a quest from active to completed. Returns false when the quest
    /// was already completed.
    pub(crate) fn complete(&mut self, quest: &QuestId) -> bool {
        self.quests.active.remove(quest);
        self.quests.completed.insert(quest.clone())
    }
}
