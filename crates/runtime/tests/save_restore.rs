//! Save/restore round-trips, RNG continuity, and compatibility evaluation.

mod common;

use lastlight_core::{
    Action, EnginePhase, MakeEventChoiceAction, StartCombatAction, TravelAction,
};
use lastlight_runtime::{
    Compatibility, CompatWarning, GameSession, RestoreError, create_save, decode, encode,
    restore, validate_compatibility,
};

use common::{campaign_pack, character_pack, registry, session};

fn advance_to_gate(session: &mut GameSession) {
    session
        .perform_action(Action::Travel(TravelAction {
            to: "ash_gate".into(),
        }))
        .unwrap();
    let pending = session.state().pending_event().cloned().unwrap();
    session
        .perform_action(Action::MakeEventChoice(MakeEventChoiceAction {
            event_id: pending,
            choice_id: "pray".into(),
        }))
        .unwrap();
}

#[test]
fn encode_decode_round_trip_is_exact() {
    let mut session = session(99);
    advance_to_gate(&mut session);

    let save = create_save(&session);
    let bytes = encode(&save).unwrap();
    let back = decode(&bytes).unwrap();

    assert_eq!(back, save, "every field round-trips bit-for-bit");
    assert_eq!(back.state.rng_state(), session.state().rng_state());
    assert_eq!(back.active_pack_set.len(), 2);
}

#[test]
fn empty_collections_and_zero_values_round_trip() {
    // A freshly started game: empty hand/discard, zero nonce.
    let session = session(0);
    let save = create_save(&session);
    let back = decode(&encode(&save).unwrap()).unwrap();
    assert_eq!(back, save);
    assert_eq!(back.state.nonce(), 0);
    assert!(back.state.hand().is_empty());
}

#[test]
fn corrupt_and_foreign_bytes_are_rejected() {
    let save = create_save(&session(1));
    let mut bytes = encode(&save).unwrap();

    assert!(matches!(
        decode(b"not a save"),
        Err(lastlight_runtime::SaveDecodeError::BadMagic)
    ));

    // Future format version.
    bytes[4] = 0xFF;
    assert!(matches!(
        decode(&bytes),
        Err(lastlight_runtime::SaveDecodeError::UnsupportedVersion { .. })
    ));

    // Truncated body.
    let bytes = encode(&save).unwrap();
    assert!(matches!(
        decode(&bytes[..bytes.len() - 4]),
        Err(lastlight_runtime::SaveDecodeError::Corrupt(_))
    ));
}

#[test]
fn restored_rng_continues_the_original_sequence() {
    let mut original = session(12345);
    advance_to_gate(&mut original);

    let save = create_save(&original);
    let bytes = encode(&save).unwrap();

    // Drive the original forward: the next random decision is the husk
    // combat shuffle and draw.
    original
        .perform_action(Action::StartCombat(StartCombatAction {
            enemy_id: "husk".into(),
        }))
        .unwrap();

    // Restore and drive the same action: identical draws follow.
    let restored = restore(decode(&bytes).unwrap(), registry()).unwrap();
    let mut resumed = restored.session;
    assert!(restored.warnings.is_empty());
    assert!(restored.pruned.is_empty());

    resumed
        .perform_action(Action::StartCombat(StartCombatAction {
            enemy_id: "husk".into(),
        }))
        .unwrap();

    assert_eq!(resumed.state(), original.state());
    assert_eq!(resumed.state().hand(), original.state().hand());
    assert_eq!(resumed.state().rng_state(), original.state().rng_state());
}

#[test]
fn missing_pack_warns_but_remains_loadable() {
    let session = session(3);
    let save = create_save(&session);

    // Registry without the character pack.
    let mut campaign_only = lastlight_content::ContentRegistry::new();
    campaign_only.register(campaign_pack()).unwrap();

    let compatibility = validate_compatibility(&save, &campaign_only);
    assert!(compatibility.is_loadable());
    match &compatibility {
        Compatibility::Compatible(warnings) => {
            assert!(warnings.iter().any(|warning| matches!(
                warning,
                CompatWarning::MissingPack { pack, .. }
                    if pack.as_str() == "ember_choir"
            )));
        }
        other => panic!("expected warnings, got {other:?}"),
    }

    // The warden hero references no character-pack content, so the restore
    // prunes nothing and proceeds.
    let restored = restore(save, campaign_only).unwrap();
    assert_eq!(restored.warnings.len(), 1);
    assert_eq!(restored.session.state().phase(), EnginePhase::Exploring);
}

#[test]
fn hero_from_a_missing_pack_is_fatal() {
    // The cantor definition lives in the character pack.
    let session =
        GameSession::new_game(registry(), &"choir_cantor".into(), Some(8)).unwrap();
    let save = create_save(&session);

    let mut campaign_only = lastlight_content::ContentRegistry::new();
    campaign_only.register(campaign_pack()).unwrap();

    let error = restore(save, campaign_only).unwrap_err();
    assert!(matches!(error, RestoreError::Reconcile(_)));
}

#[test]
fn missing_pack_content_is_pruned_from_the_restored_state() {
    // The warden gains a character-pack card mid-run through the choir
    // event, then the character pack is removed before the restore.
    let mut warden =
        GameSession::new_game(registry(), &"warden_initiate".into(), Some(8)).unwrap();
    advance_to_gate(&mut warden);
    warden
        .perform_action(Action::Travel(TravelAction {
            to: "vigil_keep".into(),
        }))
        .unwrap();
    warden
        .perform_action(Action::Travel(TravelAction {
            to: "ash_gate".into(),
        }))
        .unwrap();
    let pending = warden.state().pending_event().cloned().unwrap();
    assert_eq!(pending.as_str(), "choir_blessing");
    warden
        .perform_action(Action::MakeEventChoice(MakeEventChoiceAction {
            event_id: pending,
            choice_id: "sing".into(),
        }))
        .unwrap();
    assert!(warden.state().deck().contains(&"ember_hymn".into()));

    let save = create_save(&warden);
    let mut campaign_only = lastlight_content::ContentRegistry::new();
    campaign_only.register(campaign_pack()).unwrap();

    let restored = restore(save, campaign_only).unwrap();
    assert!(restored
        .pruned
        .iter()
        .any(|pruned| pruned.kind == "card" && pruned.id == "ember_hymn"));
    assert!(!restored
        .session
        .state()
        .deck()
        .contains(&"ember_hymn".into()));
    // The completed-event record stays: it is a historical fact.
    assert!(restored
        .session
        .state()
        .completed_events()
        .contains(&"choir_blessing".into()));
}

#[test]
fn older_registered_pack_blocks_the_load() {
    let session = session(4);
    let save = create_save(&session);

    // Re-register the campaign at an older version than the save recorded.
    let mut downgraded = lastlight_content::ContentRegistry::new();
    let mut old_campaign = campaign_pack();
    old_campaign.manifest.version = lastlight_content::PackVersion::new(1, 0, 0);
    downgraded.register(old_campaign).unwrap();
    downgraded.register(character_pack()).unwrap();

    let compatibility = validate_compatibility(&save, &downgraded);
    assert!(!compatibility.is_loadable());

    let error = restore(save, downgraded).unwrap_err();
    assert!(matches!(error, RestoreError::Incompatible(_)));
}

#[test]
fn newer_and_extra_packs_warn_only() {
    let session = session(5);
    let save = create_save(&session);

    let mut upgraded = lastlight_content::ContentRegistry::new();
    let mut new_campaign = campaign_pack();
    new_campaign.manifest.version = lastlight_content::PackVersion::new(1, 3, 0);
    upgraded.register(new_campaign).unwrap();
    upgraded.register(character_pack()).unwrap();
    let mut extra = character_pack();
    extra.manifest.pack_id = "winter_hymnal".into();
    extra.manifest.dependencies.clear();
    extra.events.clear();
    extra.cards.clear();
    extra.heroes.clear();
    upgraded.register(extra).unwrap();

    let compatibility = validate_compatibility(&save, &upgraded);
    assert!(compatibility.is_loadable());
    let warnings = compatibility.warnings();
    assert!(warnings
        .iter()
        .any(|w| matches!(w, CompatWarning::NewerPack { .. })));
    assert!(warnings
        .iter()
        .any(|w| matches!(w, CompatWarning::ExtraPack { pack } if pack.as_str() == "winter_hymnal")));
}

#[test]
fn fully_matching_pack_set_is_fully_compatible() {
    let session = session(6);
    let save = create_save(&session);
    assert_eq!(
        validate_compatibility(&save, session.registry()),
        Compatibility::FullyCompatible
    );
}
