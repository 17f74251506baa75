//! Typed conditions and consequences authored in content packs.
//!
//! Both vocabularies are closed sum types decoded strictly: an unrecognized
//! tag fails deserialization instead of parsing as a no-op. The string
//! expression variant is validated separately against the closed expression
//! vocabulary at pack load time.

use serde::{Deserialize, Serialize};

use super::common::{RegionStatus, ResourceDelta};
use super::ids::{CardId, EventId, QuestId, RegionId};

/// Gate evaluated against the current engine state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    FlagSet(String),
    FlagClear(String),
    QuestActive(QuestId),
    QuestAtStage(QuestId, u32),
    QuestCompleted(QuestId),
    EventCompleted(EventId),
    RegionDiscovered(RegionId),
    RegionStatusIs(RegionId, RegionStatus),
    MinHealth(u32),
    MinFaith(u32),
    BalanceAtLeast(i32),
    BalanceAtMost(i32),
    /// Authored boolean expression, e.g. `flag('gate_open') && faith >= 10`.
    Expression(String),
    All(Vec<Condition>),
    Any(Vec<Condition>),
    Not(Box<Condition>),
}

/// State change applied when an event choice, quest reward or enemy reward
/// fires. Applied in authored order through the engine's internal setters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Consequence {
    SetFlag(String),
    ClearFlag(String),
    ApplyResources(ResourceDelta),
    StartQuest(QuestId),
    AdvanceQuest(QuestId),
    CompleteQuest(QuestId),
    DiscoverRegion(RegionId),
    SetRegionStatus(RegionId, RegionStatus),
    GainCard(CardId),
    LoseCard(CardId),
    CompleteEvent(EventId),
    /// Ends the campaign in victory.
    TriggerVictory,
}
