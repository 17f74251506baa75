//! Load-time content validation over the composed pack set.
//!
//! Two families of checks coexist. Structured conditions, triggers and
//! effects are closed sum types, so an unrecognized kind already fails at
//! decode time by construction. What decoding cannot catch is a reference
//! that parses fine and resolves to nothing: a misspelled flag, a quest ID
//! with a typo, an expression naming a variable that does not exist. This
//! pass catches exactly those, exhaustively: validation collects every
//! error across the whole registry instead of aborting on the first, so
//! authors fix all issues in one round. Pure, no side effects.

use std::collections::BTreeSet;

use lastlight_core::expr::{self, ExprError, Function};
use lastlight_core::{Condition, Consequence, SYSTEM_FLAGS};

use crate::pack::ContentKind;
use crate::registry::ContentRegistry;
use lastlight_core::ContentOracle;

/// One content defect, with enough context to locate it.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{kind} keyed as `{key}` declares id `{id}` (pack `{pack}`)")]
    KeyMismatch {
        pack: String,
        kind: ContentKind,
        key: String,
        id: String,
    },

    #[error("{referenced_from} references unknown {kind} `{id}`")]
    UnresolvedReference {
        kind: ContentKind,
        id: String,
        referenced_from: String,
    },

    #[error(
        "{referenced_from} references flag `{name}`, which nothing sets and is not a system flag"
    )]
    UnknownFlag {
        name: String,
        referenced_from: String,
    },

    #[error("{referenced_from}: expression `{expression}` is invalid: {error}")]
    Expression {
        expression: String,
        referenced_from: String,
        error: ExprError,
    },

    #[error("event `{0}` has no choices")]
    EmptyChoices(String),

    #[error("event `{0}` has weight 0 and can never fire")]
    ZeroWeight(String),

    #[error("quest `{0}` has no stages")]
    EmptyStages(String),

    #[error("card `{0}` has no effects")]
    EmptyEffects(String),
}

/// Result of validating the composed pack set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_valid() {
            return write!(f, "content is valid");
        }
        writeln!(f, "{} content error(s):", self.errors.len())?;
        for error in &self.errors {
            writeln!(f, "  - {error}")?;
        }
        Ok(())
    }
}

struct Validator<'a> {
    registry: &'a ContentRegistry,
    defined_flags: BTreeSet<String>,
    errors: Vec<ValidationError>,
}

/// Validates every pack currently registered, as one composed set.
pub fn validate(registry: &ContentRegistry) -> ValidationReport {
    let mut validator = Validator {
        registry,
        defined_flags: collect_defined_flags(registry),
        errors: Vec::new(),
    };

    validator.check_keys();
    validator.check_regions();
    validator.check_events();
    validator.check_quests();
    validator.check_enemies();
    validator.check_anchors();
    validator.check_cards();
    validator.check_heroes();

    ValidationReport {
        errors: validator.errors,
    }
}

/// Flags are producible by a `SetFlag` consequence anywhere in the pack
/// set, by a hero's starting flags, or by the engine itself (the system
/// allowlist). Anything else a condition reads is a typo.
fn collect_defined_flags(registry: &ContentRegistry) -> BTreeSet<String> {
    let mut flags: BTreeSet<String> =
        SYSTEM_FLAGS.iter().map(|flag| (*flag).to_owned()).collect();

    let mut from_consequences = |consequences: &[Consequence]| {
        for consequence in consequences {
            if let Consequence::SetFlag(name) = consequence {
                flags.insert(name.clone());
            }
        }
    };

    for pack in registry.packs() {
        for event in pack.events.values() {
            for choice in &event.choices {
                from_consequences(&choice.consequences);
            }
        }
        for quest in pack.quests.values() {
            from_consequences(&quest.rewards);
        }
        for enemy in pack.enemies.values() {
            from_consequences(&enemy.reward);
        }
    }
    for pack in registry.packs() {
        for hero in pack.heroes.values() {
            flags.extend(hero.starting_flags.iter().cloned());
        }
    }

    flags
}

impl Validator<'_> {
    fn unresolved(&mut self, kind: ContentKind, id: &str, from: &str) {
        self.errors.push(ValidationError::UnresolvedReference {
            kind,
            id: id.to_owned(),
            referenced_from: from.to_owned(),
        });
    }

    fn check_ref(&mut self, kind: ContentKind, id: &str, from: &str) {
        let resolves = match kind {
            ContentKind::Region => self.registry.region(&id.into()).is_some(),
            ContentKind::Event => self.registry.event(&id.into()).is_some(),
            ContentKind::Quest => self.registry.quest(&id.into()).is_some(),
            ContentKind::Enemy => self.registry.enemy(&id.into()).is_some(),
            ContentKind::Anchor => self.registry.anchor(&id.into()).is_some(),
            ContentKind::Card => self.registry.card(&id.into()).is_some(),
            ContentKind::Hero => self.registry.hero(&id.into()).is_some(),
        };
        if !resolves {
            self.unresolved(kind, id, from);
        }
    }

    fn check_flag(&mut self, name: &str, from: &str) {
        if !self.defined_flags.contains(name) {
            self.errors.push(ValidationError::UnknownFlag {
                name: name.to_owned(),
                referenced_from: from.to_owned(),
            });
        }
    }

    fn check_condition(&mut self, condition: &Condition, from: &str) {
        match condition {
            Condition::FlagSet(name) | Condition::FlagClear(name) => {
                self.check_flag(name, from);
            }
            Condition::QuestActive(quest)
            | Condition::QuestAtStage(quest, _)
            | Condition::QuestCompleted(quest) => {
                self.check_ref(ContentKind::Quest, quest.as_str(), from);
            }
            Condition::EventCompleted(event) => {
                self.check_ref(ContentKind::Event, event.as_str(), from);
            }
            Condition::RegionDiscovered(region)
            | Condition::RegionStatusIs(region, _) => {
                self.check_ref(ContentKind::Region, region.as_str(), from);
            }
            Condition::MinHealth(_)
            | Condition::MinFaith(_)
            | Condition::BalanceAtLeast(_)
            | Condition::BalanceAtMost(_) => {}
            Condition::Expression(source) => self.check_expression(source, from),
            Condition::All(inner) | Condition::Any(inner) => {
                for condition in inner {
                    self.check_condition(condition, from);
                }
            }
            Condition::Not(inner) => self.check_condition(inner, from),
        }
    }

    /// Expressions are checked twice over: the parse enforces the closed
    /// variable/function vocabularies, then every call argument is resolved
    /// like any other cross-reference.
    fn check_expression(&mut self, source: &str, from: &str) {
        let parsed = match expr::parse(source) {
            Ok(parsed) => parsed,
            Err(error) => {
                self.errors.push(ValidationError::Expression {
                    expression: source.to_owned(),
                    referenced_from: from.to_owned(),
                    error,
                });
                return;
            }
        };

        let mut calls = Vec::new();
        parsed.visit_calls(&mut |function, argument| {
            calls.push((function, argument.to_owned()));
        });
        for (function, argument) in calls {
            match function {
                Function::Flag => self.check_flag(&argument, from),
                Function::QuestActive | Function::QuestCompleted => {
                    self.check_ref(ContentKind::Quest, &argument, from);
                }
                Function::EventCompleted => {
                    self.check_ref(ContentKind::Event, &argument, from);
                }
                Function::RegionDiscovered | Function::RegionStatus => {
                    self.check_ref(ContentKind::Region, &argument, from);
                }
            }
        }
    }

    fn check_consequence(&mut self, consequence: &Consequence, from: &str) {
        match consequence {
            Consequence::SetFlag(_) => {}
            Consequence::ClearFlag(name) => self.check_flag(name, from),
            Consequence::ApplyResources(_) | Consequence::TriggerVictory => {}
            Consequence::StartQuest(quest)
            | Consequence::AdvanceQuest(quest)
            | Consequence::CompleteQuest(quest) => {
                self.check_ref(ContentKind::Quest, quest.as_str(), from);
            }
            Consequence::DiscoverRegion(region)
            | Consequence::SetRegionStatus(region, _) => {
                self.check_ref(ContentKind::Region, region.as_str(), from);
            }
            Consequence::GainCard(card) | Consequence::LoseCard(card) => {
                self.check_ref(ContentKind::Card, card.as_str(), from);
            }
            Consequence::CompleteEvent(event) => {
                self.check_ref(ContentKind::Event, event.as_str(), from);
            }
        }
    }

    /// `dictionary key == definition.id` for every collection of every
    /// pack. A mismatch is a programmer/tooling invariant violation and is
    /// reported like any other load-time error, never tolerated at runtime.
    fn check_keys(&mut self) {
        for pack in self.registry.packs() {
            let pack_id = pack.manifest.pack_id.to_string();
            let mut mismatch = |kind: ContentKind, key: &str, id: &str| {
                if key != id {
                    self.errors.push(ValidationError::KeyMismatch {
                        pack: pack_id.clone(),
                        kind,
                        key: key.to_owned(),
                        id: id.to_owned(),
                    });
                }
            };
            for (key, def) in &pack.regions {
                mismatch(ContentKind::Region, key.as_str(), def.id.as_str());
            }
            for (key, def) in &pack.events {
                mismatch(ContentKind::Event, key.as_str(), def.id.as_str());
            }
            for (key, def) in &pack.quests {
                mismatch(ContentKind::Quest, key.as_str(), def.id.as_str());
            }
            for (key, def) in &pack.enemies {
                mismatch(ContentKind::Enemy, key.as_str(), def.id.as_str());
            }
            for (key, def) in &pack.anchors {
                mismatch(ContentKind::Anchor, key.as_str(), def.id.as_str());
            }
            for (key, def) in &pack.cards {
                mismatch(ContentKind::Card, key.as_str(), def.id.as_str());
            }
            for (key, def) in &pack.heroes {
                mismatch(ContentKind::Hero, key.as_str(), def.id.as_str());
            }
        }
    }

    fn check_regions(&mut self) {
        let regions: Vec<_> = self
            .registry
            .packs()
            .flat_map(|pack| pack.regions.values())
            .collect();
        for region in regions {
            let from = format!("region `{}`", region.id);
            for neighbor in &region.neighbors {
                self.check_ref(ContentKind::Region, neighbor.as_str(), &from);
            }
            for anchor in &region.anchor_ids {
                self.check_ref(ContentKind::Anchor, anchor.as_str(), &from);
            }
            for enemy in &region.enemy_ids {
                self.check_ref(ContentKind::Enemy, enemy.as_str(), &from);
            }
        }
    }

    fn check_events(&mut self) {
        let events: Vec<_> = self
            .registry
            .packs()
            .flat_map(|pack| pack.events.values())
            .collect();
        for event in events {
            let from = format!("event `{}`", event.id);
            if event.choices.is_empty() {
                self.errors
                    .push(ValidationError::EmptyChoices(event.id.to_string()));
            }
            if event.weight == 0 {
                self.errors
                    .push(ValidationError::ZeroWeight(event.id.to_string()));
            }
            for region in &event.region_ids {
                self.check_ref(ContentKind::Region, region.as_str(), &from);
            }
            if let Some(trigger) = &event.trigger {
                self.check_condition(trigger, &from);
            }
            for choice in &event.choices {
                let from = format!("event `{}` choice `{}`", event.id, choice.id);
                for requirement in &choice.requirements {
                    self.check_condition(requirement, &from);
                }
                for consequence in &choice.consequences {
                    self.check_consequence(consequence, &from);
                }
            }
        }
    }

    fn check_quests(&mut self) {
        let quests: Vec<_> = self
            .registry
            .packs()
            .flat_map(|pack| pack.quests.values())
            .collect();
        for quest in quests {
            if quest.stages.is_empty() {
                self.errors
                    .push(ValidationError::EmptyStages(quest.id.to_string()));
            }
            for (index, stage) in quest.stages.iter().enumerate() {
                if let Some(completion) = &stage.completion {
                    let from = format!("quest `{}` stage {index}", quest.id);
                    self.check_condition(completion, &from);
                }
            }
            let from = format!("quest `{}` rewards", quest.id);
            for reward in &quest.rewards {
                self.check_consequence(reward, &from);
            }
        }
    }

    fn check_enemies(&mut self) {
        let enemies: Vec<_> = self
            .registry
            .packs()
            .flat_map(|pack| pack.enemies.values())
            .collect();
        for enemy in enemies {
            let from = format!("enemy `{}` reward", enemy.id);
            for reward in &enemy.reward {
                self.check_consequence(reward, &from);
            }
        }
    }

    fn check_anchors(&mut self) {
        let anchors: Vec<_> = self
            .registry
            .packs()
            .flat_map(|pack| pack.anchors.values())
            .collect();
        for anchor in anchors {
            let from = format!("anchor `{}`", anchor.id);
            self.check_ref(ContentKind::Region, anchor.region_id.as_str(), &from);
        }
    }

    fn check_cards(&mut self) {
        let cards: Vec<_> = self
            .registry
            .packs()
            .flat_map(|pack| pack.cards.values())
            .collect();
        for card in cards {
            if card.effects.is_empty() {
                self.errors
                    .push(ValidationError::EmptyEffects(card.id.to_string()));
            }
        }
    }

    fn check_heroes(&mut self) {
        let heroes: Vec<_> = self
            .registry
            .packs()
            .flat_map(|pack| pack.heroes.values())
            .collect();
        for hero in heroes {
            let from = format!("hero `{}` starting deck", hero.id);
            for card in &hero.starting_deck {
                self.check_ref(ContentKind::Card, card.as_str(), &from);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{campaign_pack, character_pack};
    use lastlight_core::{Condition, Consequence};

    fn registry_with(packs: Vec<crate::pack::LoadedPack>) -> ContentRegistry {
        let mut registry = ContentRegistry::new();
        for pack in packs {
            registry.register(pack).unwrap();
        }
        registry
    }

    #[test]
    fn fixture_packs_validate_cleanly() {
        let registry = registry_with(vec![campaign_pack(), character_pack()]);
        let report = validate(&registry);
        assert!(report.is_valid(), "unexpected errors: {report}");
    }

    #[test]
    fn unresolved_region_reference_names_the_id() {
        let mut pack = campaign_pack();
        pack.regions
            .get_mut(&"ash_gate".into())
            .unwrap()
            .neighbors
            .push("sunken_choir".into());

        let registry = registry_with(vec![pack]);
        let report = validate(&registry);
        assert!(report.errors.iter().any(|error| matches!(
            error,
            ValidationError::UnresolvedReference { kind: ContentKind::Region, id, .. }
                if id == "sunken_choir"
        )));
    }

    #[test]
    fn unknown_flag_in_condition_is_reported() {
        let mut pack = campaign_pack();
        pack.quests.get_mut(&"seal_the_breach".into()).unwrap().stages[1]
            .completion = Some(Condition::FlagSet("wardn_slain".into()));

        let registry = registry_with(vec![pack]);
        let report = validate(&registry);
        assert!(report.errors.iter().any(|error| matches!(
            error,
            ValidationError::UnknownFlag { name, .. } if name == "wardn_slain"
        )));
    }

    #[test]
    fn system_flags_are_always_known() {
        let mut pack = campaign_pack();
        pack.events
            .get_mut(&"gate_omen".into())
            .unwrap()
            .trigger = Some(Condition::FlagSet("first_blood".into()));

        let registry = registry_with(vec![pack]);
        assert!(validate(&registry).is_valid());
    }

    #[test]
    fn misspelled_expression_variable_is_reported() {
        let mut pack = campaign_pack();
        pack.events.get_mut(&"gate_omen".into()).unwrap().trigger =
            Some(Condition::Expression("fiath >= 1".into()));

        let registry = registry_with(vec![pack]);
        let report = validate(&registry);
        assert!(report.errors.iter().any(|error| matches!(
            error,
            ValidationError::Expression {
                error: ExprError::UnknownVariable(name),
                ..
            } if name == "fiath"
        )));
    }

    #[test]
    fn expression_call_arguments_are_cross_checked() {
        let mut pack = campaign_pack();
        pack.events.get_mut(&"gate_omen".into()).unwrap().trigger = Some(
            Condition::Expression("quest_completed('seal_the_brech')".into()),
        );

        let registry = registry_with(vec![pack]);
        let report = validate(&registry);
        assert!(report.errors.iter().any(|error| matches!(
            error,
            ValidationError::UnresolvedReference { kind: ContentKind::Quest, id, .. }
                if id == "seal_the_brech"
        )));
    }

    #[test]
    fn key_id_mismatch_is_reported() {
        let mut pack = campaign_pack();
        let mut husk = pack.enemies.get(&"husk".into()).unwrap().clone();
        husk.id = "husk_renamed".into();
        pack.enemies.insert("husk".into(), husk);

        let registry = registry_with(vec![pack]);
        let report = validate(&registry);
        assert!(report.errors.iter().any(|error| matches!(
            error,
            ValidationError::KeyMismatch { kind: ContentKind::Enemy, .. }
        )));
    }

    #[test]
    fn all_errors_are_collected_in_one_pass() {
        let mut pack = campaign_pack();
        pack.events.get_mut(&"gate_omen".into()).unwrap().trigger =
            Some(Condition::Expression("".into()));
        pack.quests.get_mut(&"seal_the_breach".into()).unwrap().rewards =
            vec![Consequence::GainCard("missing_card".into())];
        pack.heroes
            .get_mut(&"warden_initiate".into())
            .unwrap()
            .starting_deck
            .push("missing_card".into());

        let registry = registry_with(vec![pack]);
        let report = validate(&registry);
        assert!(report.errors.len() >= 3, "got: {report}");
    }

    #[test]
    fn empty_collections_are_flagged() {
        let mut pack = campaign_pack();
        pack.events.get_mut(&"gate_omen".into()).unwrap().choices.clear();
        pack.quests
            .get_mut(&"seal_the_breach".into())
            .unwrap()
            .stages
            .clear();
        pack.cards.get_mut(&"strike".into()).unwrap().effects.clear();

        let registry = registry_with(vec![pack]);
        let report = validate(&registry);
        assert!(report
            .errors
            .iter()
            .any(|e| matches!(e, ValidationError::EmptyChoices(_))));
        assert!(report
            .errors
            .iter()
            .any(|e| matches!(e, ValidationError::EmptyStages(_))));
        assert!(report
            .errors
            .iter()
            .any(|e| matches!(e, ValidationError::EmptyEffects(_))));
    }
}
