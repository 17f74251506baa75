//! Save snapshots, encoding, compatibility evaluation and restore.
//!
//! A save is a fully-valued snapshot of [`EngineState`] (the RNG state
//! rides inside it, never omitted) plus the format version, the engine-core
//! version, and the active pack set at save time. Compatibility against the
//! currently loaded packs is evaluated before restore: missing packs
//! degrade gracefully with warnings, version regressions block the load.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use lastlight_content::{ContentRegistry, PackVersion};
use lastlight_core::{EngineState, GameEnv, PackId, PrunedRef, ReconcileError};

use crate::session::GameSession;

/// Current save format version.
pub const SAVE_FORMAT_VERSION: u32 = 1;

/// File signature of an encoded save.
pub const SAVE_MAGIC: &[u8; 4] = b"LLSV";

/// Versioned, fully-valued snapshot of a playthrough.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineSave {
    pub format_version: u32,
    /// Engine-core version that produced the save.
    pub core_version: String,
    /// Pack IDs and versions active at save time.
    pub active_pack_set: BTreeMap<PackId, PackVersion>,
    pub state: EngineState,
}

/// Captures the session into a save snapshot.
pub fn create_save(session: &GameSession) -> EngineSave {
    EngineSave {
        format_version: SAVE_FORMAT_VERSION,
        core_version: lastlight_core::CORE_VERSION.to_owned(),
        active_pack_set: session.registry().active_pack_set(),
        state: session.state().clone(),
    }
}

/// Errors produced while encoding a save.
#[derive(Debug, thiserror::Error)]
pub enum SaveEncodeError {
    #[error("failed to serialize save: {0}")]
    Serialize(String),
}

/// Errors produced while decoding a save. All of these are fatal for the
/// load attempt.
#[derive(Debug, thiserror::Error)]
pub enum SaveDecodeError {
    #[error("not a save file: bad magic")]
    BadMagic,

    #[error("unsupported save format version {found} (this build reads {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("save is corrupt: {0}")]
    Corrupt(String),
}

/// Encodes a save: magic, format version, bincode body.
pub fn encode(save: &EngineSave) -> Result<Vec<u8>, SaveEncodeError> {
    let body = bincode::serialize(save)
        .map_err(|error| SaveEncodeError::Serialize(error.to_string()))?;
    let mut bytes = Vec::with_capacity(body.len() + 8);
    bytes.extend_from_slice(SAVE_MAGIC);
    bytes.extend_from_slice(&save.format_version.to_le_bytes());
    bytes.extend_from_slice(&body);
    Ok(bytes)
}

/// Decodes a save. The round trip `decode(encode(s)) == s` reproduces every
/// field exactly.
pub fn decode(bytes: &[u8]) -> Result<EngineSave, SaveDecodeError> {
    if bytes.len() < 8 || &bytes[..4] != SAVE_MAGIC {
        return Err(SaveDecodeError::BadMagic);
    }
    let version = u32::from_le_bytes(bytes[4..8].try_into().expect("4-byte slice"));
    if version != SAVE_FORMAT_VERSION {
        return Err(SaveDecodeError::UnsupportedVersion {
            found: version,
            supported: SAVE_FORMAT_VERSION,
        });
    }
    bincode::deserialize(&bytes[8..])
        .map_err(|error| SaveDecodeError::Corrupt(error.to_string()))
}

/// Non-fatal compatibility findings; the save remains loadable.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CompatWarning {
    #[error("pack `{pack}` {version} from the save is not registered; its content degrades")]
    MissingPack { pack: PackId, version: PackVersion },

    #[error("pack `{pack}` was not active when the save was made")]
    ExtraPack { pack: PackId },

    #[error("pack `{pack}` is newer than the save ({saved} -> {registered})")]
    NewerPack {
        pack: PackId,
        saved: PackVersion,
        registered: PackVersion,
    },

    #[error("engine core changed since the save ({saved} -> {current})")]
    CoreVersionChanged { saved: String, current: String },
}

/// Fatal compatibility findings; loading is blocked.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CompatError {
    #[error("save format {found} is not readable by this build (reads {supported})")]
    UnsupportedFormat { found: u32, supported: u32 },

    #[error(
        "pack `{pack}` is older than the save requires ({registered} registered, save has {saved})"
    )]
    PackTooOld {
        pack: PackId,
        saved: PackVersion,
        registered: PackVersion,
    },

    #[error("engine core major version mismatch (save: {saved}, this build: {current})")]
    CoreMismatch { saved: String, current: String },
}

/// Outcome of compatibility evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Compatibility {
    FullyCompatible,
    Compatible(Vec<CompatWarning>),
    Incompatible(Vec<CompatError>),
}

impl Compatibility {
    pub fn is_loadable(&self) -> bool {
        !matches!(self, Compatibility::Incompatible(_))
    }

    pub fn warnings(&self) -> &[CompatWarning] {
        match self {
            Compatibility::Compatible(warnings) => warnings,
            _ => &[],
        }
    }
}

/// Compares a save's recorded pack set and versions against the registry.
///
/// This is the one inspection point external code should use before
/// committing to a load.
pub fn validate_compatibility(
    save: &EngineSave,
    registry: &ContentRegistry,
) -> Compatibility {
    let mut warnings = Vec::new();
    let mut errors = Vec::new();

    if save.format_version != SAVE_FORMAT_VERSION {
        errors.push(CompatError::UnsupportedFormat {
            found: save.format_version,
            supported: SAVE_FORMAT_VERSION,
        });
    }

    let saved_core = PackVersion::from_str(&save.core_version).unwrap_or_default();
    let current_core =
        PackVersion::from_str(lastlight_core::CORE_VERSION).unwrap_or_default();
    if saved_core.major != current_core.major {
        errors.push(CompatError::CoreMismatch {
            saved: save.core_version.clone(),
            current: lastlight_core::CORE_VERSION.to_owned(),
        });
    } else if saved_core != current_core {
        warnings.push(CompatWarning::CoreVersionChanged {
            saved: save.core_version.clone(),
            current: lastlight_core::CORE_VERSION.to_owned(),
        });
    }

    let registered = registry.active_pack_set();

    for (pack, saved_version) in &save.active_pack_set {
        match registered.get(pack) {
            None => warnings.push(CompatWarning::MissingPack {
                pack: pack.clone(),
                version: *saved_version,
            }),
            Some(current) if current < saved_version => {
                errors.push(CompatError::PackTooOld {
                    pack: pack.clone(),
                    saved: *saved_version,
                    registered: *current,
                });
            }
            Some(current) if current > saved_version => {
                warnings.push(CompatWarning::NewerPack {
                    pack: pack.clone(),
                    saved: *saved_version,
                    registered: *current,
                });
            }
            Some(_) => {}
        }
    }

    for pack in registered.keys() {
        if !save.active_pack_set.contains_key(pack) {
            warnings.push(CompatWarning::ExtraPack { pack: pack.clone() });
        }
    }

    if !errors.is_empty() {
        Compatibility::Incompatible(errors)
    } else if !warnings.is_empty() {
        Compatibility::Compatible(warnings)
    } else {
        Compatibility::FullyCompatible
    }
}

/// Errors surfaced while restoring a save into a session.
#[derive(Debug, thiserror::Error)]
pub enum RestoreError {
    #[error("save is incompatible with the active pack set: {}", format_errors(.0))]
    Incompatible(Vec<CompatError>),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
}

fn format_errors(errors: &[CompatError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A restored session plus what the restore had to report.
#[derive(Debug)]
pub struct RestoredGame {
    pub session: GameSession,
    /// State references pruned because their pack is no longer loaded.
    pub pruned: Vec<PrunedRef>,
    pub warnings: Vec<CompatWarning>,
}

/// Restores a save against the given registry.
///
/// Compatibility is evaluated first; errors block the restore. Warnings are
/// carried through, and state references into missing packs are reconciled
/// (pruned or rejected, see [`EngineState::reconcile`]).
pub fn restore(
    save: EngineSave,
    registry: ContentRegistry,
) -> Result<RestoredGame, RestoreError> {
    let compatibility = validate_compatibility(&save, &registry);
    let warnings = match compatibility {
        Compatibility::Incompatible(errors) => {
            return Err(RestoreError::Incompatible(errors));
        }
        Compatibility::Compatible(warnings) => warnings,
        Compatibility::FullyCompatible => Vec::new(),
    };

    let mut state = save.state;
    let pruned = {
        let env = GameEnv::new(&registry);
        state.reconcile(&env)?
    };

    for reference in &pruned {
        tracing::warn!(kind = reference.kind, id = %reference.id, "pruned dangling save reference");
    }
    tracing::info!(
        nonce = state.nonce(),
        warnings = warnings.len(),
        pruned = pruned.len(),
        "save restored"
    );

    Ok(RestoredGame {
        session: GameSession::from_parts(registry, state),
        pruned,
        warnings,
    })
}
