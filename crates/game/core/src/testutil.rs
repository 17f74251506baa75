//! In-memory content fixtures shared by the crate's unit tests.

use std::collections::BTreeMap;

use crate::definitions::{
    AnchorDef, AnchorId, CardDef, CardEffect, CardId, CardKind, Condition, Consequence,
    EnemyDef, EnemyId, EventChoice, EventDef, EventId, HeroDef, LocalizedText, QuestDef,
    QuestId, QuestStage, RegionDef, RegionId, RegionStatus, ResourceDelta,
};
use crate::env::ContentOracle;

/// A tiny three-region campaign: a safe keep, a contested gate, and a
/// breached maw, with one quest line running through them.
pub(crate) struct FixtureContent {
    pub regions: BTreeMap<RegionId, RegionDef>,
    pub events: BTreeMap<EventId, EventDef>,
    pub quests: BTreeMap<QuestId, QuestDef>,
    pub enemies: BTreeMap<EnemyId, EnemyDef>,
    pub anchors: BTreeMap<AnchorId, AnchorDef>,
    pub cards: BTreeMap<CardId, CardDef>,
    pub hero: HeroDef,
    pub entry: RegionId,
}

impl ContentOracle for FixtureContent {
    fn region(&self, id: &RegionId) -> Option<&RegionDef> {
        self.regions.get(id)
    }

    fn event(&self, id: &EventId) -> Option<&EventDef> {
        self.events.get(id)
    }

    fn quest(&self, id: &QuestId) -> Option<&QuestDef> {
        self.quests.get(id)
    }

    fn enemy(&self, id: &EnemyId) -> Option<&EnemyDef> {
        self.enemies.get(id)
    }

    fn anchor(&self, id: &AnchorId) -> Option<&AnchorDef> {
        self.anchors.get(id)
    }

    fn card(&self, id: &CardId) -> Option<&CardDef> {
        self.cards.get(id)
    }

    fn hero(&self, id: &crate::definitions::HeroId) -> Option<&HeroDef> {
        (self.hero.id == *id).then_some(&self.hero)
    }

    fn all_regions(&self) -> Vec<&RegionDef> {
        self.regions.values().collect()
    }

    fn all_events(&self) -> Vec<&EventDef> {
        self.events.values().collect()
    }

    fn entry_region(&self) -> Option<&RegionId> {
        Some(&self.entry)
    }
}

fn text(value: &str) -> LocalizedText {
    LocalizedText::untranslated(value)
}

pub(crate) fn fixture_content() -> FixtureContent {
    let regions = [
        RegionDef {
            id: "vigil_keep".into(),
            name: text("Vigil Keep"),
            description: text("The last lit hall."),
            initial_status: RegionStatus::Stable,
            neighbors: vec!["ash_gate".into()],
            anchor_ids: vec!["keep_shrine".into()],
            enemy_ids: vec![],
            discover_on_start: true,
        },
        RegionDef {
            id: "ash_gate".into(),
            name: text("Ash Gate"),
            description: text("A gate half-buried in grey drifts."),
            initial_status: RegionStatus::Borderland,
            neighbors: vec!["vigil_keep".into(), "breach_maw".into()],
            anchor_ids: vec![],
            enemy_ids: vec!["husk".into()],
            discover_on_start: false,
        },
        RegionDef {
            id: "breach_maw".into(),
            name: text("The Maw"),
            description: text("Where the world gives way."),
            initial_status: RegionStatus::Breach,
            neighbors: vec!["ash_gate".into()],
            anchor_ids: vec![],
            enemy_ids: vec!["maw_warden".into()],
            discover_on_start: false,
        },
    ];

    let events = [EventDef {
        id: "gate_omen".into(),
        title: text("An Omen at the Gate"),
        body: text("Ash falls upward. Something watches."),
        region_ids: vec!["ash_gate".into()],
        trigger: None,
        once: true,
        weight: 1,
        choices: vec![
            EventChoice {
                id: "pray".into(),
                label: text("Kneel and pray"),
                requirements: vec![Condition::MinFaith(1)],
                consequences: vec![
                    Consequence::SetFlag("omen_heeded".into()),
                    Consequence::ApplyResources(ResourceDelta {
                        health: 0,
                        faith: 0,
                        balance: 5,
                    }),
                    Consequence::StartQuest("seal_the_breach".into()),
                ],
            },
            EventChoice {
                id: "ignore".into(),
                label: text("Walk on"),
                requirements: vec![],
                consequences: vec![],
            },
        ],
    }];

    let quests = [QuestDef {
        id: "seal_the_breach".into(),
        name: text("Seal the Breach"),
        description: text("Find the maw and silence its warden."),
        stages: vec![
            QuestStage {
                description: text("Reach the maw."),
                completion: Some(Condition::RegionDiscovered("breach_maw".into())),
            },
            QuestStage {
                description: text("Slay the warden."),
                completion: Some(Condition::FlagSet("warden_slain".into())),
            },
        ],
        rewards: vec![
            Consequence::SetFlag("breach_sealed".into()),
            Consequence::TriggerVictory,
        ],
    }];

    let enemies = [
        EnemyDef {
            id: "husk".into(),
            name: text("Hollow Husk"),
            description: text("What remains when faith leaves."),
            health: 10,
            attack: 3,
            guard: 0,
            reward: vec![Consequence::ApplyResources(ResourceDelta {
                health: 0,
                faith: 2,
                balance: 0,
            })],
        },
        EnemyDef {
            id: "maw_warden".into(),
            name: text("Warden of the Maw"),
            description: text("It holds the breach open."),
            health: 30,
            attack: 6,
            guard: 2,
            reward: vec![Consequence::SetFlag("warden_slain".into())],
        },
    ];

    let anchors = [AnchorDef {
        id: "keep_shrine".into(),
        name: text("Keep Shrine"),
        description: text("A candle that does not gutter."),
        region_id: "vigil_keep".into(),
        faith_cost: 2,
        heal: 10,
        stabilizes: true,
    }];

    let cards = [
        CardDef {
            id: "strike".into(),
            name: text("Strike"),
            description: text("Steel, plainly."),
            kind: CardKind::Strike,
            faith_cost: 0,
            effects: vec![CardEffect::Damage(6)],
        },
        CardDef {
            id: "ward".into(),
            name: text("Ward"),
            description: text("A circle drawn in salt."),
            kind: CardKind::Ward,
            faith_cost: 1,
            effects: vec![CardEffect::Guard(5)],
        },
        CardDef {
            id: "rite_mend".into(),
            name: text("Mending Rite"),
            description: text("Needle and prayer."),
            kind: CardKind::Rite,
            faith_cost: 2,
            effects: vec![CardEffect::Heal(8)],
        },
    ];

    let hero = HeroDef {
        id: "warden_initiate".into(),
        name: text("Initiate of the Vigil"),
        description: text("Sworn, not yet tested."),
        max_health: 30,
        max_faith: 10,
        starting_balance: 0,
        starting_deck: vec![
            "strike".into(),
            "strike".into(),
            "ward".into(),
            "rite_mend".into(),
            "strike".into(),
            "ward".into(),
        ],
        starting_flags: vec!["oath_sworn".into()],
    };

    FixtureContent {
        regions: regions
            .into_iter()
            .map(|region| (region.id.clone(), region))
            .collect(),
        events: events
            .into_iter()
            .map(|event| (event.id.clone(), event))
            .collect(),
        quests: quests
            .into_iter()
            .map(|quest| (quest.id.clone(), quest))
            .collect(),
        enemies: enemies
            .into_iter()
            .map(|enemy| (enemy.id.clone(), enemy))
            .collect(),
        anchors: anchors
            .into_iter()
            .map(|anchor| (anchor.id.clone(), anchor))
            .collect(),
        cards: cards
            .into_iter()
            .map(|card| (card.id.clone(), card))
            .collect(),
        hero,
        entry: "vigil_keep".into(),
    }
}
