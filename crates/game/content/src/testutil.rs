//! Pack fixtures shared by the crate's unit tests.

use lastlight_core::{
    AnchorDef, CardDef, CardEffect, CardKind, Condition, Consequence, EnemyDef,
    EventChoice, EventDef, HeroDef, LocalizedText, QuestDef, QuestStage, RegionDef,
    RegionStatus, ResourceDelta,
};

use crate::manifest::{PackDependency, PackManifest, PackSources, PackType, PackVersion};
use crate::pack::LoadedPack;

fn text(value: &str) -> LocalizedText {
    LocalizedText::untranslated(value)
}

/// A small but fully cross-referenced campaign: three regions, one event,
/// one quest line, two enemies, one anchor, three cards, one hero.
pub(crate) fn campaign_pack() -> LoadedPack {
    let manifest = PackManifest {
        pack_id: "vigil_campaign".into(),
        name: text("The Last Vigil"),
        description: text("Base campaign."),
        version: PackVersion::new(1, 2, 0),
        pack_type: PackType::Campaign,
        core_version_min: PackVersion::new(0, 1, 0),
        author: "fixture".into(),
        entry_region_id: Some("vigil_keep".into()),
        dependencies: vec![],
        checksums: Default::default(),
        sources: PackSources::default(),
    };

    let mut pack = LoadedPack::new(manifest);

    for region in [
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
    ] {
        pack.regions.insert(region.id.clone(), region);
    }

    let event = EventDef {
        id: "gate_omen".into(),
        title: text("An Omen at the Gate"),
        body: text("Ash falls upward."),
        region_ids: vec!["ash_gate".into()],
        trigger: Some(Condition::Expression("faith >= 1".into())),
        once: true,
        weight: 1,
        choices: vec![
            EventChoice {
                id: "pray".into(),
                label: text("Kneel and pray"),
                requirements: vec![Condition::MinFaith(1)],
                consequences: vec![
                    Consequence::SetFlag("omen_heeded".into()),
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
    };
    pack.events.insert(event.id.clone(), event);

    let quest = QuestDef {
        id: "seal_the_breach".into(),
        name: text("Seal the Breach"),
        description: text("Silence the warden."),
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
        rewards: vec![Consequence::TriggerVictory],
    };
    pack.quests.insert(quest.id.clone(), quest);

    for enemy in [
        EnemyDef {
            id: "husk".into(),
            name: text("Hollow Husk"),
            description: text(""),
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
            description: text(""),
            health: 30,
            attack: 6,
            guard: 2,
            reward: vec![Consequence::SetFlag("warden_slain".into())],
        },
    ] {
        pack.enemies.insert(enemy.id.clone(), enemy);
    }

    let anchor = AnchorDef {
        id: "keep_shrine".into(),
        name: text("Keep Shrine"),
        description: text(""),
        region_id: "vigil_keep".into(),
        faith_cost: 2,
        heal: 10,
        stabilizes: true,
    };
    pack.anchors.insert(anchor.id.clone(), anchor);

    for card in [
        CardDef {
            id: "strike".into(),
            name: text("Strike"),
            description: text(""),
            kind: CardKind::Strike,
            faith_cost: 0,
            effects: vec![CardEffect::Damage(6)],
        },
        CardDef {
            id: "ward".into(),
            name: text("Ward"),
            description: text(""),
            kind: CardKind::Ward,
            faith_cost: 1,
            effects: vec![CardEffect::Guard(5)],
        },
        CardDef {
            id: "rite_mend".into(),
            name: text("Mending Rite"),
            description: text(""),
            kind: CardKind::Rite,
            faith_cost: 2,
            effects: vec![CardEffect::Heal(8)],
        },
    ] {
        pack.cards.insert(card.id.clone(), card);
    }

    let hero = HeroDef {
        id: "warden_initiate".into(),
        name: text("Initiate of the Vigil"),
        description: text(""),
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
    pack.heroes.insert(hero.id.clone(), hero);

    pack
}

/// A character pack layered over the campaign: one new hero and two new
/// cards, IDs disjoint from the campaign's.
pub(crate) fn character_pack() -> LoadedPack {
    let manifest = PackManifest {
        pack_id: "ember_choir".into(),
        name: text("The Ember Choir"),
        description: text("An alternate hero."),
        version: PackVersion::new(0, 3, 1),
        pack_type: PackType::Character,
        core_version_min: PackVersion::new(0, 1, 0),
        author: "fixture".into(),
        entry_region_id: None,
        dependencies: vec![PackDependency {
            pack_id: "vigil_campaign".into(),
            min_version: PackVersion::new(1, 0, 0),
        }],
        checksums: Default::default(),
        sources: PackSources::default(),
    };

    let mut pack = LoadedPack::new(manifest);

    for card in [
        CardDef {
            id: "ember_hymn".into(),
            name: text("Ember Hymn"),
            description: text(""),
            kind: CardKind::Rite,
            faith_cost: 1,
            effects: vec![CardEffect::Damage(3), CardEffect::Balance(2)],
        },
        CardDef {
            id: "choir_shield".into(),
            name: text("Choir Shield"),
            description: text(""),
            kind: CardKind::Ward,
            faith_cost: 1,
            effects: vec![CardEffect::Guard(4), CardEffect::Heal(2)],
        },
    ] {
        pack.cards.insert(card.id.clone(), card);
    }

    let hero = HeroDef {
        id: "choir_cantor".into(),
        name: text("Cantor of the Ember Choir"),
        description: text(""),
        max_health: 24,
        max_faith: 14,
        starting_balance: 10,
        starting_deck: vec![
            "ember_hymn".into(),
            "ember_hymn".into(),
            "choir_shield".into(),
            // Campaign cards resolve across the composed registry.
            "strike".into(),
            "ward".into(),
        ],
        starting_flags: vec![],
    };
    pack.heroes.insert(hero.id.clone(), hero);

    pack
}
