//! Typed rejection reasons for the action pipeline.
//!
//! The reason vocabulary is closed: UI-facing error handling matches on
//! variants, never on strings.

use serde::{Deserialize, Serialize};

use crate::definitions::{AnchorId, CardId, EnemyId, EventId, QuestId, RegionId};
use crate::state::EnginePhase;

/// Why an action was rejected. Returned before any state mutation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum InvalidActionReason {
    #[error("wrong phase: expected {expected}, currently {actual}")]
    WrongPhase {
        expected: EnginePhase,
        actual: EnginePhase,
    },

    #[error("the game is over")]
    GameOver,

    #[error("unknown region `{0}`")]
    UnknownRegion(RegionId),

    #[error("`{to}` is not a neighbor of `{from}`")]
    NotNeighbor { from: RegionId, to: RegionId },

    #[error("unknown anchor `{0}`")]
    UnknownAnchor(AnchorId),

    #[error("anchor `{anchor}` is not in region `{region}`")]
    AnchorNotHere { anchor: AnchorId, region: RegionId },

    #[error("insufficient faith: {required} required, {available} available")]
    InsufficientFaith { required: u32, available: u32 },

    #[error("unknown enemy `{0}`")]
    UnknownEnemy(EnemyId),

    #[error("enemy `{enemy}` is not present in region `{region}`")]
    EnemyNotHere { enemy: EnemyId, region: RegionId },

    #[error("an encounter is already pending resolution")]
    EncounterPending,

    #[error("unknown card `{0}`")]
    UnknownCard(CardId),

    #[error("card `{0}` is not in hand")]
    CardNotInHand(CardId),

    #[error("unknown event `{0}`")]
    UnknownEvent(EventId),

    #[error("no event is awaiting a choice")]
    NoPendingEvent,

    #[error("event `{expected}` is not the pending event (`{pending}` is)")]
    EventNotPending { expected: EventId, pending: EventId },

    #[error("event `{event}` has no choice `{choice}`")]
    UnknownChoice { event: EventId, choice: String },

    #[error("requirements for choice `{choice}` of event `{event}` are not met")]
    RequirementsNotMet { event: EventId, choice: String },

    #[error("unknown quest `{0}`")]
    UnknownQuest(QuestId),

    #[error("quest `{0}` is not active")]
    QuestNotActive(QuestId),

    #[error("quest `{0}` is already completed")]
    QuestAlreadyCompleted(QuestId),

    #[error("stage {stage} of quest `{quest}` is not complete")]
    StageNotComplete { quest: QuestId, stage: u32 },

    #[error("no encounter is in progress")]
    NoEncounter,

    #[error("the encounter is not finished")]
    EncounterNotFinished,

    #[error("encounter is against `{actual}`, not `{expected}`")]
    EncounterMismatch { expected: EnemyId, actual: EnemyId },
}
