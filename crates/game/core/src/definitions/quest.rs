//! Quest definitions.

use serde::{Deserialize, Serialize};

use super::condition::{Condition, Consequence};
use super::common::LocalizedText;
use super::ids::QuestId;

/// A multi-stage objective tracked in the quest log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestDef {
    pub id: QuestId,
    pub name: LocalizedText,
    #[serde(default)]
    pub description: LocalizedText,
    /// Ordered stages; progress is a stage index into this list.
    pub stages: Vec<QuestStage>,
    /// Applied when the final stage completes.
    #[serde(default)]
    pub rewards: Vec<Consequence>,
}

/// A single quest stage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestStage {
    pub description: LocalizedText,
    /// Gate for advancing past this stage. `None` means the stage completes
    /// on request.
    #[serde(default)]
    pub completion: Option<Condition>,
}
