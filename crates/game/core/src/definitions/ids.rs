//! Stable content identifiers.
//!
//! Every definition is addressed by a human-assigned string ID unique within
//! its kind. IDs stored in runtime state are always these stable IDs, never
//! surrogate keys, so saves stay meaningful across sessions and pack reloads.

use core::fmt;

use serde::{Deserialize, Serialize};

macro_rules! content_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

content_id!(
    /// Identifier of a region definition.
    RegionId
);
content_id!(
    /// Identifier of an event definition.
    EventId
);
content_id!(
    /// Identifier of a quest definition.
    QuestId
);
content_id!(
    /// Identifier of an enemy definition.
    EnemyId
);
content_id!(
    /// Identifier of an anchor definition.
    AnchorId
);
content_id!(
    /// Identifier of a card definition.
    CardId
);
content_id!(
    /// Identifier of a hero definition.
    HeroId
);
content_id!(
    /// Identifier of a content pack.
    PackId
);
