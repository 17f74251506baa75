//! Binary pack container codec.
//!
//! The compiled on-disk form of a pack (`.lpack`). Layout:
//!
//! ```text
//! magic      b"LLPK"                          4 bytes
//! version    u16 little-endian                2 bytes
//! section*   tag u8
//!            payload length u64 little-endian
//!            payload (bincode)
//!            payload SHA-256 digest           32 bytes
//! end        tag 0xFF
//! ```
//!
//! Sections are length-prefixed and individually digested, so truncation
//! and corruption are detected structurally, and every digest is verified
//! **before** its payload is parsed. The manifest section carries the
//! authoring source checksums through unchanged, so a reader can re-verify
//! provenance without the original source files.

use std::collections::BTreeMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};

use lastlight_core::{
    AnchorDef, CardDef, EnemyDef, EventDef, HeroDef, QuestDef, RegionDef,
};

use crate::pack::LoadedPack;

#[cfg(test)]
use crate::pack::ContentKind;

/// File signature of a compiled pack.
pub const PACK_MAGIC: &[u8; 4] = b"LLPK";

/// Current container format version.
pub const FORMAT_VERSION: u16 = 1;

const TAG_MANIFEST: u8 = 0x01;
const TAG_REGIONS: u8 = 0x10;
const TAG_EVENTS: u8 = 0x11;
const TAG_QUESTS: u8 = 0x12;
const TAG_ENEMIES: u8 = 0x13;
const TAG_ANCHORS: u8 = 0x14;
const TAG_CARDS: u8 = 0x15;
const TAG_HEROES: u8 = 0x16;
const TAG_END: u8 = 0xFF;

const DIGEST_LEN: usize = 32;

/// Errors produced while encoding a pack.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("failed to serialize section `{section}`: {reason}")]
    Serialize { section: &'static str, reason: String },
}

/// Errors produced while decoding a container. Malformed input never yields
/// a partial pack.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("not a compiled pack: bad magic")]
    BadMagic,

    #[error("unsupported container format version {0}")]
    UnsupportedVersion(u16),

    #[error("container truncated inside section `{section}`")]
    Truncated { section: String },

    #[error(
        "section `{section}` digest mismatch: expected {expected}, computed {actual}"
    )]
    SectionDigestMismatch {
        section: String,
        expected: String,
        actual: String,
    },

    #[error("section `{section}` appears more than once")]
    DuplicateSection { section: String },

    #[error("unknown section tag {0:#04x}")]
    UnknownSection(u8),

    #[error("section `{section}` is malformed: {detail}")]
    Malformed { section: String, detail: String },

    #[error("manifest section is missing")]
    MissingManifest,

    #[error("container has trailing bytes after the end tag")]
    TrailingBytes,
}

fn section_name(tag: u8) -> &'static str {
    match tag {
        TAG_MANIFEST => "manifest",
        TAG_REGIONS => "regions",
        TAG_EVENTS => "events",
        TAG_QUESTS => "quests",
        TAG_ENEMIES => "enemies",
        TAG_ANCHORS => "anchors",
        TAG_CARDS => "cards",
        TAG_HEROES => "heroes",
        _ => "unknown",
    }
}

fn write_section<T: Serialize>(
    out: &mut Vec<u8>,
    tag: u8,
    value: &T,
) -> Result<(), EncodeError> {
    let payload = bincode::serialize(value).map_err(|e| EncodeError::Serialize {
        section: section_name(tag),
        reason: e.to_string(),
    })?;
    out.push(tag);
    out.extend_from_slice(&(payload.len() as u64).to_le_bytes());
    out.extend_from_slice(&payload);
    let digest = Sha256::digest(&payload);
    out.extend_from_slice(&digest);
    Ok(())
}

/// Compiles a pack into container bytes.
pub fn write(pack: &LoadedPack) -> Result<Vec<u8>, EncodeError> {
    let mut out = Vec::new();
    out.extend_from_slice(PACK_MAGIC);
    out.extend_from_slice(&FORMAT_VERSION.to_le_bytes());

    write_section(&mut out, TAG_MANIFEST, &pack.manifest)?;
    // Collections are serialized as ID-ordered vectors; the reader rebuilds
    // the keyed maps.
    write_section(&mut out, TAG_REGIONS, &collect(&pack.regions))?;
    write_section(&mut out, TAG_EVENTS, &collect(&pack.events))?;
    write_section(&mut out, TAG_QUESTS, &collect(&pack.quests))?;
    write_section(&mut out, TAG_ENEMIES, &collect(&pack.enemies))?;
    write_section(&mut out, TAG_ANCHORS, &collect(&pack.anchors))?;
    write_section(&mut out, TAG_CARDS, &collect(&pack.cards))?;
    write_section(&mut out, TAG_HEROES, &collect(&pack.heroes))?;

    out.push(TAG_END);
    Ok(out)
}

fn collect<K, V: Clone>(map: &BTreeMap<K, V>) -> Vec<V> {
    map.values().cloned().collect()
}

struct Reader<'a> {
    bytes: &'a [u8],
    cursor: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, len: usize, section: &str) -> Result<&'a [u8], DecodeError> {
        let end = self
            .cursor
            .checked_add(len)
            .filter(|end| *end <= self.bytes.len())
            .ok_or_else(|| DecodeError::Truncated {
                section: section.to_owned(),
            })?;
        let slice = &self.bytes[self.cursor..end];
        self.cursor = end;
        Ok(slice)
    }

    fn take_u8(&mut self, section: &str) -> Result<u8, DecodeError> {
        Ok(self.take(1, section)?[0])
    }

    /// Reads one section's digest-verified payload. Digest verification
    /// happens here, before any payload parse.
    fn take_section(&mut self, section: &str) -> Result<&'a [u8], DecodeError> {
        let len_bytes = self.take(8, section)?;
        let len = u64::from_le_bytes(len_bytes.try_into().expect("8-byte slice"));
        let len = usize::try_from(len).map_err(|_| DecodeError::Truncated {
            section: section.to_owned(),
        })?;
        let payload = self.take(len, section)?;
        let digest = self.take(DIGEST_LEN, section)?;

        let actual = Sha256::digest(payload);
        if actual.as_slice() != digest {
            return Err(DecodeError::SectionDigestMismatch {
                section: section.to_owned(),
                expected: hex_string(digest),
                actual: hex_string(&actual),
            });
        }
        Ok(payload)
    }
}

fn hex_string(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

fn parse_payload<T: DeserializeOwned>(
    payload: &[u8],
    section: &str,
) -> Result<T, DecodeError> {
    bincode::deserialize(payload).map_err(|e| DecodeError::Malformed {
        section: section.to_owned(),
        detail: e.to_string(),
    })
}

fn into_keyed<K, V>(
    items: Vec<V>,
    key_of: impl Fn(&V) -> K,
    section: &str,
) -> Result<BTreeMap<K, V>, DecodeError>
where
    K: Ord + std::fmt::Display,
{
    let mut map = BTreeMap::new();
    for item in items {
        let key = key_of(&item);
        if map.contains_key(&key) {
            return Err(DecodeError::Malformed {
                section: section.to_owned(),
                detail: format!("duplicate id `{key}`"),
            });
        }
        map.insert(key, item);
    }
    Ok(map)
}

/// Decodes container bytes back into a pack.
pub fn read(bytes: &[u8]) -> Result<LoadedPack, DecodeError> {
    let mut reader = Reader { bytes, cursor: 0 };

    if reader.take(4, "header").map_err(|_| DecodeError::BadMagic)? != PACK_MAGIC {
        return Err(DecodeError::BadMagic);
    }
    let version_bytes = reader.take(2, "header")?;
    let version = u16::from_le_bytes(version_bytes.try_into().expect("2-byte slice"));
    if version != FORMAT_VERSION {
        return Err(DecodeError::UnsupportedVersion(version));
    }

    let mut manifest = None;
    let mut pack_sections: BTreeMap<u8, &[u8]> = BTreeMap::new();

    loop {
        let tag = reader.take_u8("section header")?;
        if tag == TAG_END {
            break;
        }
        let name = section_name(tag);
        if name == "unknown" {
            return Err(DecodeError::UnknownSection(tag));
        }
        let payload = reader.take_section(name)?;
        if tag == TAG_MANIFEST {
            if manifest.is_some() {
                return Err(DecodeError::DuplicateSection {
                    section: name.to_owned(),
                });
            }
            manifest = Some(parse_payload(payload, name)?);
        } else if pack_sections.insert(tag, payload).is_some() {
            return Err(DecodeError::DuplicateSection {
                section: name.to_owned(),
            });
        }
    }

    if reader.cursor != bytes.len() {
        return Err(DecodeError::TrailingBytes);
    }

    let manifest = manifest.ok_or(DecodeError::MissingManifest)?;
    let mut pack = LoadedPack::new(manifest);

    for (tag, payload) in pack_sections {
        let name = section_name(tag);
        match tag {
            TAG_REGIONS => {
                let items: Vec<RegionDef> = parse_payload(payload, name)?;
                pack.regions = into_keyed(items, |d| d.id.clone(), name)?;
            }
            TAG_EVENTS => {
                let items: Vec<EventDef> = parse_payload(payload, name)?;
                pack.events = into_keyed(items, |d| d.id.clone(), name)?;
            }
            TAG_QUESTS => {
                let items: Vec<QuestDef> = parse_payload(payload, name)?;
                pack.quests = into_keyed(items, |d| d.id.clone(), name)?;
            }
            TAG_ENEMIES => {
                let items: Vec<EnemyDef> = parse_payload(payload, name)?;
                pack.enemies = into_keyed(items, |d| d.id.clone(), name)?;
            }
            TAG_ANCHORS => {
                let items: Vec<AnchorDef> = parse_payload(payload, name)?;
                pack.anchors = into_keyed(items, |d| d.id.clone(), name)?;
            }
            TAG_CARDS => {
                let items: Vec<CardDef> = parse_payload(payload, name)?;
                pack.cards = into_keyed(items, |d| d.id.clone(), name)?;
            }
            TAG_HEROES => {
                let items: Vec<HeroDef> = parse_payload(payload, name)?;
                pack.heroes = into_keyed(items, |d| d.id.clone(), name)?;
            }
            _ => unreachable!("validated above"),
        }
    }

    Ok(pack)
}
