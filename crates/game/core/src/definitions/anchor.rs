//! Anchor definitions.

use serde::{Deserialize, Serialize};

use super::common::LocalizedText;
use super::ids::{AnchorId, RegionId};

/// A sanctified resting point bound to one region.
///
/// Resting at an anchor trades faith for health and, for stabilizing
/// anchors, pulls the region's status one step back toward `Stable`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorDef {
    pub id: AnchorId,
    pub name: LocalizedText,
    #[serde(default)]
    pub description: LocalizedText,
    pub region_id: RegionId,
    #[serde(default)]
    pub faith_cost: u32,
    pub heal: u32,
    #[serde(default)]
    pub stabilizes: bool,
}
