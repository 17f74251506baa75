//! Restore-time reconciliation against the active pack set.
//!
//! A save may reference content from a pack that is no longer registered
//! (the compatibility check reports this as a warning, not an error). The
//! save subsystem calls [`EngineState::reconcile`] after decoding: optional
//! references to missing content are pruned and reported, while references
//! the playthrough cannot continue without are hard errors.

use crate::definitions::{HeroId, RegionId};
use crate::env::GameEnv;

use super::{EngineState, EnginePhase};

/// A state reference dropped because its definition is no longer loaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrunedRef {
    /// What kind of reference was dropped (`"card"`, `"quest"`, ...).
    pub kind: &'static str,
    pub id: String,
}

impl PrunedRef {
    fn new(kind: &'static str, id: impl ToString) -> Self {
        Self {
            kind,
            id: id.to_string(),
        }
    }
}

/// References the playthrough cannot continue without.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ReconcileError {
    #[error("hero `{0}` is not defined by the active pack set")]
    UnknownHero(HeroId),

    #[error("current region `{0}` is not defined by the active pack set")]
    UnknownCurrentRegion(RegionId),
}

impl EngineState {
    /// Reconciles this state against the active pack set, pruning
    /// references to missing optional content. Returns the pruned
    /// references for reporting.
    pub fn reconcile(
        &mut self,
        env: &GameEnv<'_>,
    ) -> Result<Vec<PrunedRef>, ReconcileError> {
        let content = env.content();

        if content.hero(&self.hero_id).is_none() {
            return Err(ReconcileError::UnknownHero(self.hero_id.clone()));
        }
        if content.region(&self.world.current_region).is_none() {
            return Err(ReconcileError::UnknownCurrentRegion(
                self.world.current_region.clone(),
            ));
        }

        let mut pruned = Vec::new();

        for pile in [&mut self.deck, &mut self.hand, &mut self.discard] {
            pile.retain(|card| {
                let known = content.card(card).is_some();
                if !known {
                    pruned.push(PrunedRef::new("card", card));
                }
                known
            });
        }

        let unknown_quests: Vec<_> = self
            .quests
            .active
            .keys()
            .filter(|quest| content.quest(quest).is_none())
            .cloned()
            .collect();
        for quest in unknown_quests {
            self.quests.active.remove(&quest);
            pruned.push(PrunedRef::new("quest", quest));
        }

        self.world.discovered.retain(|region| {
            let known = content.region(region).is_some();
            if !known {
                pruned.push(PrunedRef::new("region", region));
            }
            known
        });
        self.world.region_status.retain(|region, _| {
            let known = content.region(region).is_some();
            if !known {
                pruned.push(PrunedRef::new("region", region));
            }
            known
        });

        if let Some(event) = &self.pending_event
            && content.event(event).is_none()
        {
            pruned.push(PrunedRef::new("event", event));
            self.pending_event = None;
            if self.phase == EnginePhase::AwaitingChoice {
                self.phase = EnginePhase::Exploring;
            }
        }

        if let Some(encounter) = &self.encounter
            && content.enemy(&encounter.enemy_id).is_none()
        {
            pruned.push(PrunedRef::new("enemy", &encounter.enemy_id));
            self.encounter = None;
            if self.phase == EnginePhase::InEncounter {
                self.phase = EnginePhase::Exploring;
            }
        }

        // Completed quest/event sets are kept even when the definition is
        // gone: they are historical facts only ever read via `contains`.

        Ok(pruned)
    }
}
