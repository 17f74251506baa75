//! Region definitions.

use serde::{Deserialize, Serialize};

use super::common::{LocalizedText, RegionStatus};
use super::ids::{AnchorId, EnemyId, RegionId};

/// A traversable area of the world map.
///
/// Travel is only permitted along declared `neighbors` edges. The ambient
/// enemy list holds definition IDs resolved through the registry; the
/// validator guarantees they resolve before gameplay starts. The arrival
/// event pool is declared on the event side (`EventDef::region_ids`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionDef {
    pub id: RegionId,
    pub name: LocalizedText,
    #[serde(default)]
    pub description: LocalizedText,
    #[serde(default)]
    pub initial_status: RegionStatus,
    #[serde(default)]
    pub neighbors: Vec<RegionId>,
    #[serde(default)]
    pub anchor_ids: Vec<AnchorId>,
    /// Enemies that can be engaged while in this region.
    #[serde(default)]
    pub enemy_ids: Vec<EnemyId>,
    /// Discovered from the start of a new game (map hubs, the entry region's
    /// surroundings).
    #[serde(default)]
    pub discover_on_start: bool,
}
