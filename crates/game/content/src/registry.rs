//! Composed, queryable store of all active packs' definitions.
//!
//! The registry is the only read path for content and the only permitted
//! origin of content IDs consumed by the action engine. Registration is
//! atomic: every check passes or the registry is left untouched.

use std::collections::BTreeMap;
use std::str::FromStr;

use lastlight_core::{
    AnchorDef, AnchorId, CardDef, CardId, ContentOracle, EnemyDef, EnemyId, EventDef,
    EventId, HeroDef, HeroId, PackId, QuestDef, QuestId, RegionDef, RegionId,
};

use crate::manifest::{PackType, PackVersion};
use crate::pack::{ContentKind, LoadedPack};

/// One cross-pack ID collision.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdCollision {
    pub kind: ContentKind,
    pub id: String,
    pub existing_pack: PackId,
}

/// Typed registration failures.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("pack `{0}` is already registered")]
    DuplicatePack(PackId),

    #[error("pack `{0}` is not registered")]
    UnknownPack(PackId),

    #[error(
        "pack `{pack}` requires engine core {required}, this build is {current}"
    )]
    CoreTooOld {
        pack: PackId,
        required: PackVersion,
        current: PackVersion,
    },

    #[error("pack `{pack}` depends on `{dependency}`, which is not registered")]
    MissingDependency { pack: PackId, dependency: PackId },

    #[error(
        "pack `{pack}` needs `{dependency}` >= {required}, but {registered} is registered"
    )]
    DependencyTooOld {
        pack: PackId,
        dependency: PackId,
        required: PackVersion,
        registered: PackVersion,
    },

    #[error("cross-pack id collision(s): {}", format_collisions(.0))]
    IdCollisions(Vec<IdCollision>),

    #[error("campaign pack `{0}` declares no entry region")]
    MissingEntryRegion(PackId),

    #[error("entry region `{region}` of pack `{pack}` is not defined by the pack")]
    UnresolvedEntryRegion { pack: PackId, region: RegionId },

    #[error("campaign pack `{existing}` is already active; unregister it before `{pack}`")]
    CampaignConflict { pack: PackId, existing: PackId },

    #[error("pack `{pack}` is depended on by `{dependent}`")]
    DependedUpon { pack: PackId, dependent: PackId },
}

fn format_collisions(collisions: &[IdCollision]) -> String {
    collisions
        .iter()
        .map(|c| format!("{} `{}` (already in `{}`)", c.kind, c.id, c.existing_pack))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Composes zero or more loaded packs into one addressable catalog.
#[derive(Debug, Default)]
pub struct ContentRegistry {
    packs: BTreeMap<PackId, LoadedPack>,
    entry_region: Option<RegionId>,
}

impl ContentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a pack after checking the core version gate, dependencies,
    /// the campaign-uniqueness rule, entry-region declaration, and
    /// cross-pack ID disjointness. A failed registration leaves previously
    /// registered packs untouched.
    ///
    /// Collision policy: a cross-pack ID collision is always an error, for
    /// every content kind. Packs compose as disjoint unions; nothing is
    /// silently overridden.
    pub fn register(&mut self, pack: LoadedPack) -> Result<(), RegistryError> {
        let pack_id = pack.manifest.pack_id.clone();

        if self.packs.contains_key(&pack_id) {
            return Err(RegistryError::DuplicatePack(pack_id));
        }

        let current_core = PackVersion::from_str(lastlight_core::CORE_VERSION)
            .unwrap_or_default();
        if pack.manifest.core_version_min > current_core {
            return Err(RegistryError::CoreTooOld {
                pack: pack_id,
                required: pack.manifest.core_version_min,
                current: current_core,
            });
        }

        for dependency in &pack.manifest.dependencies {
            match self.packs.get(&dependency.pack_id) {
                None => {
                    return Err(RegistryError::MissingDependency {
                        pack: pack_id,
                        dependency: dependency.pack_id.clone(),
                    });
                }
                Some(registered) if registered.manifest.version < dependency.min_version => {
                    return Err(RegistryError::DependencyTooOld {
                        pack: pack_id,
                        dependency: dependency.pack_id.clone(),
                        required: dependency.min_version,
                        registered: registered.manifest.version,
                    });
                }
                Some(_) => {}
            }
        }

        if pack.manifest.pack_type == PackType::Campaign {
            if let Some(existing) = self
                .packs
                .values()
                .find(|p| p.manifest.pack_type == PackType::Campaign)
            {
                return Err(RegistryError::CampaignConflict {
                    pack: pack_id,
                    existing: existing.manifest.pack_id.clone(),
                });
            }
            let Some(entry) = &pack.manifest.entry_region_id else {
                return Err(RegistryError::MissingEntryRegion(pack_id));
            };
            if !pack.regions.contains_key(entry) {
                return Err(RegistryError::UnresolvedEntryRegion {
                    pack: pack_id,
                    region: entry.clone(),
                });
            }
        }

        let collisions = self.collisions_with(&pack);
        if !collisions.is_empty() {
            return Err(RegistryError::IdCollisions(collisions));
        }

        if pack.manifest.pack_type == PackType::Campaign {
            self.entry_region = pack.manifest.entry_region_id.clone();
        }
        tracing::info!(
            pack_id = %pack.manifest.pack_id,
            version = %pack.manifest.version,
            pack_type = %pack.manifest.pack_type,
            definitions = pack.definition_count(),
            "registered pack"
        );
        self.packs.insert(pack_id, pack);
        Ok(())
    }

    /// Removes a pack. Fails when another registered pack declares it as a
    /// dependency. Unregistering the campaign clears the entry region.
    pub fn unregister(&mut self, pack_id: &PackId) -> Result<LoadedPack, RegistryError> {
        if !self.packs.contains_key(pack_id) {
            return Err(RegistryError::UnknownPack(pack_id.clone()));
        }
        if let Some(dependent) = self.packs.values().find(|pack| {
            pack.manifest
                .dependencies
                .iter()
                .any(|dependency| dependency.pack_id == *pack_id)
        }) {
            return Err(RegistryError::DependedUpon {
                pack: pack_id.clone(),
                dependent: dependent.manifest.pack_id.clone(),
            });
        }

        let removed = self.packs.remove(pack_id).expect("checked above");
        if removed.manifest.pack_type == PackType::Campaign {
            self.entry_region = None;
        }
        tracing::info!(pack_id = %pack_id, "unregistered pack");
        Ok(removed)
    }

    fn collisions_with(&self, pack: &LoadedPack) -> Vec<IdCollision> {
        let mut collisions = Vec::new();
        for existing in self.packs.values() {
            let existing_id = &existing.manifest.pack_id;
            for kind in [
                ContentKind::Region,
                ContentKind::Event,
                ContentKind::Quest,
                ContentKind::Enemy,
                ContentKind::Anchor,
                ContentKind::Card,
                ContentKind::Hero,
            ] {
                let existing_ids = existing.ids_of(kind);
                for id in pack.ids_of(kind) {
                    if existing_ids.contains(&id) {
                        collisions.push(IdCollision {
                            kind,
                            id,
                            existing_pack: existing_id.clone(),
                        });
                    }
                }
            }
        }
        collisions
    }

    pub fn packs(&self) -> impl Iterator<Item = &LoadedPack> {
        self.packs.values()
    }

    pub fn pack(&self, pack_id: &PackId) -> Option<&LoadedPack> {
        self.packs.get(pack_id)
    }

    pub fn is_empty(&self) -> bool {
        self.packs.is_empty()
    }

    /// Active pack IDs and versions, recorded into saves for compatibility
    /// evaluation.
    pub fn active_pack_set(&self) -> BTreeMap<PackId, PackVersion> {
        self.packs
            .iter()
            .map(|(pack_id, pack)| (pack_id.clone(), pack.manifest.version))
            .collect()
    }
}

// The registry is the production ContentOracle. IDs are disjoint across
// packs, so scanning packs in order finds at most one match.
impl ContentOracle for ContentRegistry {
    fn region(&self, id: &RegionId) -> Option<&RegionDef> {
        self.packs.values().find_map(|pack| pack.regions.get(id))
    }

    fn event(&self, id: &EventId) -> Option<&EventDef> {
        self.packs.values().find_map(|pack| pack.events.get(id))
    }

    fn quest(&self, id: &QuestId) -> Option<&QuestDef> {
        self.packs.values().find_map(|pack| pack.quests.get(id))
    }

    fn enemy(&self, id: &EnemyId) -> Option<&EnemyDef> {
        self.packs.values().find_map(|pack| pack.enemies.get(id))
    }

    fn anchor(&self, id: &AnchorId) -> Option<&AnchorDef> {
        self.packs.values().find_map(|pack| pack.anchors.get(id))
    }

    fn card(&self, id: &CardId) -> Option<&CardDef> {
        self.packs.values().find_map(|pack| pack.cards.get(id))
    }

    fn hero(&self, id: &HeroId) -> Option<&HeroDef> {
        self.packs.values().find_map(|pack| pack.heroes.get(id))
    }

    fn all_regions(&self) -> Vec<&RegionDef> {
        let mut regions: Vec<&RegionDef> = self
            .packs
            .values()
            .flat_map(|pack| pack.regions.values())
            .collect();
        regions.sort_by(|a, b| a.id.cmp(&b.id));
        regions
    }

    fn all_events(&self) -> Vec<&EventDef> {
        let mut events: Vec<&EventDef> = self
            .packs
            .values()
            .flat_map(|pack| pack.events.values())
            .collect();
        events.sort_by(|a, b| a.id.cmp(&b.id));
        events
    }

    fn entry_region(&self) -> Option<&RegionId> {
        self.entry_region.as_ref()
    }
}

impl ContentRegistry {
    /// All heroes across packs, ordered by ID. The collaborator's hero
    /// selection reads this.
    pub fn all_heroes(&self) -> Vec<&HeroDef> {
        let mut heroes: Vec<&HeroDef> = self
            .packs
            .values()
            .flat_map(|pack| pack.heroes.values())
            .collect();
        heroes.sort_by(|a, b| a.id.cmp(&b.id));
        heroes
    }

    /// All cards across packs, ordered by ID.
    pub fn all_cards(&self) -> Vec<&CardDef> {
        let mut cards: Vec<&CardDef> = self
            .packs
            .values()
            .flat_map(|pack| pack.cards.values())
            .collect();
        cards.sort_by(|a, b| a.id.cmp(&b.id));
        cards
    }
}
