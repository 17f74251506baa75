//! Published read-only snapshots for the presentation layer.
//!
//! Views are owned values resolved at call time: the UI can hold, clone and
//! render them freely without any path back into the engine state.

use lastlight_core::{
    AnchorId, CardId, CardKind, ContentOracle, EnemyId, EnginePhase, EventId, Language,
    QuestId, RegionId, RegionStatus,
};

use crate::session::GameSession;

/// Hero resource snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerStats {
    pub health: u32,
    pub max_health: u32,
    pub faith: u32,
    pub max_faith: u32,
    pub balance: i32,
}

/// One region as the map screen shows it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegionOverview {
    pub id: RegionId,
    pub name: String,
    pub status: RegionStatus,
    pub discovered: bool,
    pub current: bool,
    pub neighbors: Vec<RegionId>,
    pub anchors: Vec<AnchorId>,
}

/// One quest-log line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestOverview {
    pub id: QuestId,
    pub name: String,
    pub stage: Option<u32>,
    pub total_stages: usize,
    pub stage_description: Option<String>,
    pub completed: bool,
}

/// One card in hand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardView {
    pub id: CardId,
    pub name: String,
    pub kind: CardKind,
    pub faith_cost: u32,
    pub playable: bool,
}

/// The live or stored encounter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncounterView {
    pub enemy_id: EnemyId,
    pub enemy_name: String,
    pub enemy_health: u32,
    pub enemy_max_health: u32,
    pub hero_guard: u32,
    pub round: u32,
}

/// The event currently awaiting a choice.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingEventView {
    pub id: EventId,
    pub title: String,
    pub body: String,
    /// Choice IDs with labels and whether their requirements currently
    /// hold.
    pub choices: Vec<(String, String, bool)>,
}

impl GameSession {
    pub fn player_stats(&self) -> PlayerStats {
        let resources = self.state().resources();
        PlayerStats {
            health: resources.health.current,
            max_health: resources.health.maximum,
            faith: resources.faith.current,
            max_faith: resources.faith.maximum,
            balance: resources.balance,
        }
    }

    pub fn phase(&self) -> EnginePhase {
        self.state().phase()
    }

    /// Every region of the active pack set, discovered or not, in ID order.
    pub fn region_overview(&self, language: Language) -> Vec<RegionOverview> {
        let world = self.state().world();
        self.registry()
            .all_regions()
            .into_iter()
            .map(|region| RegionOverview {
                id: region.id.clone(),
                name: region.name.resolve(language).to_owned(),
                status: world.status_of(&region.id),
                discovered: world.discovered.contains(&region.id),
                current: world.current_region == region.id,
                neighbors: region.neighbors.clone(),
                anchors: region.anchor_ids.clone(),
            })
            .collect()
    }

    /// Active quests first, then completed, both in ID order.
    pub fn quest_overview(&self, language: Language) -> Vec<QuestOverview> {
        let quests = self.state().quests();
        let mut overview = Vec::new();

        for (quest_id, stage) in &quests.active {
            let Some(quest) = self.registry().quest(quest_id) else {
                continue;
            };
            overview.push(QuestOverview {
                id: quest_id.clone(),
                name: quest.name.resolve(language).to_owned(),
                stage: Some(*stage),
                total_stages: quest.stages.len(),
                stage_description: quest
                    .stages
                    .get(*stage as usize)
                    .map(|s| s.description.resolve(language).to_owned()),
                completed: false,
            });
        }
        for quest_id in &quests.completed {
            let Some(quest) = self.registry().quest(quest_id) else {
                continue;
            };
            overview.push(QuestOverview {
                id: quest_id.clone(),
                name: quest.name.resolve(language).to_owned(),
                stage: None,
                total_stages: quest.stages.len(),
                stage_description: None,
                completed: true,
            });
        }
        overview
    }

    /// The hand in draw order, with current playability.
    pub fn hand_view(&self, language: Language) -> Vec<CardView> {
        let faith = self.state().resources().faith.current;
        self.state()
            .hand()
            .iter()
            .filter_map(|card_id| self.registry().card(card_id))
            .map(|card| CardView {
                id: card.id.clone(),
                name: card.name.resolve(language).to_owned(),
                kind: card.kind,
                faith_cost: card.faith_cost,
                playable: faith >= card.faith_cost,
            })
            .collect()
    }

    pub fn encounter_view(&self, language: Language) -> Option<EncounterView> {
        let encounter = self.state().encounter()?;
        let name = self
            .registry()
            .enemy(&encounter.enemy_id)
            .map(|enemy| enemy.name.resolve(language).to_owned())
            .unwrap_or_default();
        Some(EncounterView {
            enemy_id: encounter.enemy_id.clone(),
            enemy_name: name,
            enemy_health: encounter.enemy_health.current,
            enemy_max_health: encounter.enemy_health.maximum,
            hero_guard: encounter.hero_guard,
            round: encounter.round,
        })
    }

    pub fn pending_event_view(&self, language: Language) -> Option<PendingEventView> {
        let event_id = self.state().pending_event()?;
        let event = self.registry().event(event_id)?;
        Some(PendingEventView {
            id: event.id.clone(),
            title: event.title.resolve(language).to_owned(),
            body: event.body.resolve(language).to_owned(),
            choices: event
                .choices
                .iter()
                .map(|choice| {
                    let satisfied = choice
                        .requirements
                        .iter()
                        .all(|req| lastlight_core::conditions::holds(req, self.state()));
                    (
                        choice.id.clone(),
                        choice.label.resolve(language).to_owned(),
                        satisfied,
                    )
                })
                .collect(),
        })
    }
}
