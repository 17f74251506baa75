//! Immutable, content-authored definitions.
//!
//! Definitions are loaded once from a content pack, read many times through
//! the registry, and replaced only by reloading the pack. They never hold
//! runtime-mutable fields; per-playthrough state lives in
//! [`crate::state::EngineState`] and references definitions by stable ID
//! only.

mod anchor;
mod card;
mod common;
mod condition;
mod enemy;
mod event;
mod hero;
mod ids;
mod quest;
mod region;

pub use anchor::AnchorDef;
pub use card::{CardDef, CardEffect, CardKind};
pub use common::{Language, LocalizedText, RegionStatus, ResourceDelta};
pub use condition::{Condition, Consequence};
pub use enemy::EnemyDef;
pub use event::{EventChoice, EventDef};
pub use hero::HeroDef;
pub use ids::{AnchorId, CardId, EnemyId, EventId, HeroId, PackId, QuestId, RegionId};
pub use quest::{QuestDef, QuestStage};
pub use region::RegionDef;
