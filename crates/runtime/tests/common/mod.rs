//! Shared fixtures for the runtime integration tests: a small campaign
//! pack, a character pack layered on it, and session helpers.

// Each integration test binary compiles this module; not every binary uses
// every helper.
#![allow(dead_code)]

use lastlight_content::{
    ContentRegistry, LoadedPack, PackDependency, PackManifest, PackSources, PackType,
    PackVersion,
};
use lastlight_core::{
    AnchorDef, CardDef, CardEffect, CardKind, Condition, Consequence, EnemyDef,
    EventChoice, EventDef, HeroDef, LocalizedText, QuestDef, QuestStage, RegionDef,
    RegionStatus, ResourceDelta,
};
use lastlight_runtime::GameSession;

pub fn text(value: &str) -> LocalizedText {
    LocalizedText::untranslated(value)
}

pub fn campaign_pack() -> LoadedPack {
    let manifest = PackManifest {
        pack_id: "vigil_campaign".into(),
        name: text("The Last Vigil"),
        description: text("Base campaign."),
        version: PackVersion::new(1, 2, 0),
        pack_type: PackType::Campaign,
        core_version_min: PackVersion::new(0, 1, 0),
        author: "tests".into(),
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
            description: text(""),
            initial_status: RegionStatus::Stable,
            neighbors: vec!["ash_gate".into()],
            anchor_ids: vec!["keep_shrine".into()],
            enemy_ids: vec![],
            discover_on_start: true,
        },
        RegionDef {
            id: "ash_gate".into(),
            name: text("Ash Gate"),
            description: text(""),
            initial_status: RegionStatus::Borderland,
            neighbors: vec!["vigil_keep".into(), "breach_maw".into()],
            anchor_ids: vec![],
            enemy_ids: vec!["husk".into()],
            discover_on_start: false,
        },
        RegionDef {
            id: "breach_maw".into(),
            name: text("The Maw"),
            description: text(""),
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
        description: text(""),
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

pub fn character_pack() -> LoadedPack {
    let manifest = PackManifest {
        pack_id: "ember_choir".into(),
        name: text("The Ember Choir"),
        description: text(""),
        version: PackVersion::new(0, 3, 1),
        pack_type: PackType::Character,
        core_version_min: PackVersion::new(0, 1, 0),
        author: "tests".into(),
        entry_region_id: None,
        dependencies: vec![PackDependency {
            pack_id: "vigil_campaign".into(),
            min_version: PackVersion::new(1, 0, 0),
        }],
        checksums: Default::default(),
        sources: PackSources::default(),
    };

    let mut pack = LoadedPack::new(manifest);

    // Character packs may extend campaign regions with their own events;
    // the pool is declared event-side, so no campaign IDs are touched.
    let event = EventDef {
        id: "choir_blessing".into(),
        title: text("A Voice in the Ash"),
        body: text("Someone is singing beyond the gate."),
        region_ids: vec!["ash_gate".into()],
        trigger: Some(Condition::FlagSet("omen_heeded".into())),
        once: true,
        weight: 1,
        choices: vec![
            EventChoice {
                id: "sing".into(),
                label: text("Join the hymn"),
                requirements: vec![],
                consequences: vec![Consequence::GainCard("ember_hymn".into())],
            },
            EventChoice {
                id: "decline".into(),
                label: text("Keep silent"),
                requirements: vec![],
                consequences: vec![],
            },
        ],
    };
    pack.events.insert(event.id.clone(), event);

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
            "strike".into(),
            "ward".into(),
        ],
        starting_flags: vec![],
    };
    pack.heroes.insert(hero.id.clone(), hero);

    pack
}

/// Route engine logs through `RUST_LOG` when debugging a failing test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

pub fn registry() -> ContentRegistry {
    let mut registry = ContentRegistry::new();
    registry.register(campaign_pack()).unwrap();
    registry.register(character_pack()).unwrap();
    registry
}

pub fn session(seed: u64) -> GameSession {
    init_tracing();
    GameSession::new_game(registry(), &"warden_initiate".into(), Some(seed)).unwrap()
}
