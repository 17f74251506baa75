//! Pack manifests and semantic versions.

use std::fmt;
use std::str::FromStr;

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use lastlight_core::{LocalizedText, PackId, RegionId};

/// Errors produced while parsing a semantic version string.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum VersionError {
    #[error("version string is empty")]
    Empty,

    #[error("version `{0}` must have exactly three dot-separated segments")]
    WrongArity(String),

    #[error("version segment `{segment}` of `{version}` is not a number")]
    BadSegment { version: String, segment: String },
}

/// Semantic pack version (`major.minor.patch`).
///
/// Ordering is numeric per segment, not lexicographic: `0.10.0 > 0.9.1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PackVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl PackVersion {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for PackVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for PackVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(VersionError::Empty);
        }
        let segments: Vec<&str> = s.split('.').collect();
        let [major, minor, patch] = segments.as_slice() else {
            return Err(VersionError::WrongArity(s.to_owned()));
        };
        let parse = |segment: &str| {
            segment
                .parse::<u32>()
                .map_err(|_| VersionError::BadSegment {
                    version: s.to_owned(),
                    segment: segment.to_owned(),
                })
        };
        Ok(Self {
            major: parse(major)?,
            minor: parse(minor)?,
            patch: parse(patch)?,
        })
    }
}

// Versions serialize as their display string so manifests stay
// human-editable and the binary form is representation-stable.
impl Serialize for PackVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PackVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Kind of content pack.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum PackType {
    /// A world: regions, events, quests, and a declared entry region.
    Campaign,
    /// Additional heroes/cards layered over a campaign.
    Character,
}

/// Declared dependency on another pack.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackDependency {
    pub pack_id: PackId,
    pub min_version: PackVersion,
}

/// Authoring-side source file paths, one per collection.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackSources {
    #[serde(default)]
    pub regions: Option<String>,
    #[serde(default)]
    pub events: Option<String>,
    #[serde(default)]
    pub quests: Option<String>,
    #[serde(default)]
    pub enemies: Option<String>,
    #[serde(default)]
    pub anchors: Option<String>,
    #[serde(default)]
    pub cards: Option<String>,
    #[serde(default)]
    pub heroes: Option<String>,
}

impl PackSources {
    /// Declared source files in collection order.
    pub fn declared(&self) -> Vec<&str> {
        [
            &self.regions,
            &self.events,
            &self.quests,
            &self.enemies,
            &self.anchors,
            &self.cards,
            &self.heroes,
        ]
        .into_iter()
        .filter_map(|source| source.as_deref())
        .collect()
    }
}

/// Human-editable pack manifest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackManifest {
    pub pack_id: PackId,
    pub name: LocalizedText,
    #[serde(default)]
    pub description: LocalizedText,
    pub version: PackVersion,
    pub pack_type: PackType,
    /// Minimum engine-core version this pack's content requires.
    pub core_version_min: PackVersion,
    #[serde(default)]
    pub author: String,
    /// Campaign packs must declare their entry region; there is no implicit
    /// default.
    #[serde(default)]
    pub entry_region_id: Option<RegionId>,
    #[serde(default)]
    pub dependencies: Vec<PackDependency>,
    /// SHA-256 of each authoring source file, keyed by relative path.
    /// Computed at compile time and carried through the binary container so
    /// integrity can be re-verified without the sources.
    #[serde(default)]
    pub checksums: BTreeMap<String, String>,
    #[serde(default)]
    pub sources: PackSources,
}
