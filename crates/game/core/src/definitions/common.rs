//! Shared primitives used across definition kinds.

use serde::{Deserialize, Serialize};

/// Display language selected by the presentation layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    #[default]
    En,
    Ru,
}

/// Authored text carried in both supported language variants.
///
/// Resolution happens at read time; definitions are never mutated to bake in
/// a language. An empty variant falls back to the other one.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    #[serde(default)]
    pub en: String,
    #[serde(default)]
    pub ru: String,
}

impl LocalizedText {
    pub fn new(en: impl Into<String>, ru: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            ru: ru.into(),
        }
    }

    /// Text in one language only; the other variant falls back to it.
    pub fn untranslated(text: impl Into<String>) -> Self {
        Self {
            en: text.into(),
            ru: String::new(),
        }
    }

    pub fn resolve(&self, language: Language) -> &str {
        let (wanted, fallback) = match language {
            Language::En => (&self.en, &self.ru),
            Language::Ru => (&self.ru, &self.en),
        };
        if wanted.is_empty() { fallback } else { wanted }
    }
}

/// Signed transaction against the hero's resource pools.
///
/// Applied only through the engine's clamped setters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDelta {
    #[serde(default)]
    pub health: i32,
    #[serde(default)]
    pub faith: i32,
    #[serde(default)]
    pub balance: i32,
}

impl ResourceDelta {
    pub const ZERO: Self = Self {
        health: 0,
        faith: 0,
        balance: 0,
    };

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

/// Runtime condition of a region.
///
/// A region definition declares its initial status; the live status is
/// runtime state and moves between these three steps.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum RegionStatus {
    #[default]
    Stable,
    Borderland,
    Breach,
}

impl RegionStatus {
    /// One step toward `Stable` (resting at a stabilizing anchor).
    pub fn stabilized(self) -> Self {
        match self {
            RegionStatus::Breach => RegionStatus::Borderland,
            RegionStatus::Borderland | RegionStatus::Stable => RegionStatus::Stable,
        }
    }

    /// One step toward `Breach` (world degradation consequences).
    pub fn degraded(self) -> Self {
        match self {
            RegionStatus::Stable => RegionStatus::Borderland,
            RegionStatus::Borderland | RegionStatus::Breach => RegionStatus::Breach,
        }
    }
}
