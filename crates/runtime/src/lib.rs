//! Runtime session layer over the deterministic core.
//!
//! Owns the composed registry and one engine state, exposes the single
//! action entry point plus read-only snapshot views, and persists/restores
//! playthroughs with pack-set compatibility checks.

pub mod save;
pub mod session;
pub mod store;
pub mod views;

pub use save::{
    Compatibility, CompatError, CompatWarning, EngineSave, RestoreError, RestoredGame,
    SAVE_FORMAT_VERSION, SaveDecodeError, SaveEncodeError, create_save, decode, encode,
    restore, validate_compatibility,
};
pub use session::{GameSession, NewGameError};
pub use store::{FileSaveStore, SAVE_EXTENSION, StoreError};
pub use views::{
    CardView, EncounterView, PendingEventView, PlayerStats, QuestOverview, RegionOverview,
};
