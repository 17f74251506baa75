//! Exploration actions: resting at anchors and traveling between regions.

use serde::{Deserialize, Serialize};

use crate::conditions;
use crate::definitions::{AnchorId, EventDef, RegionId};
use crate::engine::reducer::StateReducer;
use crate::env::GameEnv;
use crate::state::{EngineState, EnginePhase, FLAG_ANCHOR_LIT};

use super::ActionTransition;
use super::error::InvalidActionReason;
use super::types::ActionResult;

/// Rest at an anchor in the current region: trade faith for health and, at
/// stabilizing anchors, pull the region one step back toward `Stable`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestAction {
    pub anchor_id: AnchorId,
}

impl ActionTransition for RestAction {
    type Outcome = ActionResult;

    fn pre_validate(
        &self,
        state: &EngineState,
        env: &GameEnv<'_>,
    ) -> Result<(), InvalidActionReason> {
        require_phase(state, EnginePhase::Exploring)?;

        let anchor = env
            .content()
            .anchor(&self.anchor_id)
            .ok_or_else(|| InvalidActionReason::UnknownAnchor(self.anchor_id.clone()))?;

        let here = &state.world().current_region;
        if anchor.region_id != *here {
            return Err(InvalidActionReason::AnchorNotHere {
                anchor: self.anchor_id.clone(),
                region: here.clone(),
            });
        }

        let available = state.resources().faith.current;
        if available < anchor.faith_cost {
            return Err(InvalidActionReason::InsufficientFaith {
                required: anchor.faith_cost,
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
        let anchor = env
            .content()
            .anchor(&self.anchor_id)
            .ok_or_else(|| InvalidActionReason::UnknownAnchor(self.anchor_id.clone()))?;

        let region = state.world().current_region.clone();
        let mut reducer = StateReducer::new(state);
        reducer.resources().spend_faith(anchor.faith_cost);
        let healed = reducer.resources().heal_hero(anchor.heal);
        let region_status = if anchor.stabilizes {
            reducer.world().stabilize(&region)
        } else {
            state.world().status_of(&region)
        };
        StateReducer::new(state).set_flag(FLAG_ANCHOR_LIT);

        Ok(ActionResult::Rested {
            healed,
            faith_spent: anchor.faith_cost,
            region_status,
        })
    }
}

/// Travel along a neighbor edge. Arrival may draw an event from the
/// destination's pool; the draw is deterministic in the state-owned RNG.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelAction {
    pub to: RegionId,
}

impl ActionTransition for TravelAction {
    type Outcome = ActionResult;

    fn pre_validate(
        &self,
        state: &EngineState,
        env: &GameEnv<'_>,
    ) -> Result<(), InvalidActionReason> {
        require_phase(state, EnginePhase::Exploring)?;

        if env.content().region(&self.to).is_none() {
            return Err(InvalidActionReason::UnknownRegion(self.to.clone()));
        }

        let from = &state.world().current_region;
        let origin = env
            .content()
            .region(from)
            .ok_or_else(|| InvalidActionReason::UnknownRegion(from.clone()))?;
        if !origin.neighbors.contains(&self.to) {
            return Err(InvalidActionReason::NotNeighbor {
                from: from.clone(),
                to: self.to.clone(),
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
        let from = reducer.world().set_current_region(self.to.clone());
        reducer.world().discover(self.to.clone());

        let event = draw_arrival_event(state, env, &self.to);
        if let Some(event_id) = &event {
            let mut reducer = StateReducer::new(state);
            reducer.set_pending_event(Some(event_id.clone()));
            reducer.set_phase(EnginePhase::AwaitingChoice);
        }

        Ok(ActionResult::Traveled {
            from,
            to: self.to.clone(),
            event,
        })
    }
}

/// Weighted draw over the destination's eligible events.
///
/// Eligible: trigger satisfied, positive weight, and not already completed
/// for once-only events. Returns `None` for an empty pool; otherwise exactly
/// one event fires.
fn draw_arrival_event(
    state: &mut EngineState,
    env: &GameEnv<'_>,
    region: &RegionId,
) -> Option<crate::definitions::EventId> {
    let eligible: Vec<&EventDef> = env
        .content()
        .region_events(region)
        .into_iter()
        .filter(|event| event.weight > 0)
        .filter(|event| !(event.once && state.completed_events().contains(&event.id)))
        .filter(|event| {
            event
                .trigger
                .as_ref()
                .is_none_or(|trigger| conditions::holds(trigger, state))
        })
        .collect();

    if eligible.is_empty() {
        return None;
    }

    let total: u32 = eligible.iter().map(|event| event.weight).sum();
    let mut roll = StateReducer::new(state).rng().next_range(0..total);
    for event in &eligible {
        if roll < event.weight {
            return Some(event.id.clone());
        }
        roll -= event.weight;
    }
    None
}

pub(super) fn require_phase(
    state: &EngineState,
    expected: EnginePhase,
) -> Result<(), InvalidActionReason> {
    let actual = state.phase();
    if actual == expected {
        Ok(())
    } else {
        Err(InvalidActionReason::WrongPhase { expected, actual })
    }
}
