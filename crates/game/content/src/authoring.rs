//! Authoring-side pack compilation (feature `authoring`).
//!
//! This is the only place authoring formats are parsed: the manifest is
//! TOML (`pack.toml`), collections are RON files named by the manifest's
//! `sources` table. Compilation computes the SHA-256 of every source file
//! into the manifest checksum map and emits the binary container the
//! runtime loader accepts.
//!
//! When a checksum map is already present in the manifest (a re-compile of
//! a shipped pack), sources are verified against it before parsing, so a
//! tampered source fails on the hash, not on a parse error.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, bail};
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};

use crate::codec;
use crate::manifest::PackManifest;
use crate::pack::LoadedPack;

/// Manifest file name inside a pack source directory.
pub const MANIFEST_FILE: &str = "pack.toml";

fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

fn read_source(dir: &Path, file: &str) -> anyhow::Result<String> {
    let path = dir.join(file);
    std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read source file {}", path.display()))
}

fn parse_collection<D, K>(
    dir: &Path,
    file: &str,
    checksums: &mut BTreeMap<String, String>,
    expected: Option<&String>,
    key_of: impl Fn(&D) -> K,
) -> anyhow::Result<BTreeMap<K, D>>
where
    D: DeserializeOwned,
    K: Ord + std::fmt::Display,
{
    let content = read_source(dir, file)?;

    let actual = sha256_hex(content.as_bytes());
    if let Some(expected) = expected
        && *expected != actual
    {
        bail!(
            "checksum mismatch for `{file}`: manifest says {expected}, file hashes to {actual}"
        );
    }
    checksums.insert(file.to_owned(), actual);

    let items: Vec<D> =
        ron::from_str(&content).with_context(|| format!("failed to parse `{file}`"))?;

    let mut map = BTreeMap::new();
    for item in items {
        let key = key_of(&item);
        if map.contains_key(&key) {
            bail!("duplicate id `{key}` in `{file}`");
        }
        map.insert(key, item);
    }
    Ok(map)
}

/// Compiles a pack source directory into a [`LoadedPack`].
pub fn compile_pack(dir: &Path) -> anyhow::Result<LoadedPack> {
    let manifest_text = read_source(dir, MANIFEST_FILE)?;
    let manifest: PackManifest = toml::from_str(&manifest_text)
        .with_context(|| format!("invalid manifest in {}", dir.display()))?;

    let declared = manifest.checksums.clone();
    let expected = |file: &str| declared.get(file);
    let sources = manifest.sources.clone();

    let mut pack = LoadedPack::new(manifest);
    let mut checksums = BTreeMap::new();

    if let Some(file) = &sources.regions {
        pack.regions =
            parse_collection(dir, file, &mut checksums, expected(file), |d: &lastlight_core::RegionDef| {
                d.id.clone()
            })?;
    }
    if let Some(file) = &sources.events {
        pack.events =
            parse_collection(dir, file, &mut checksums, expected(file), |d: &lastlight_core::EventDef| {
                d.id.clone()
            })?;
    }
    if let Some(file) = &sources.quests {
        pack.quests =
            parse_collection(dir, file, &mut checksums, expected(file), |d: &lastlight_core::QuestDef| {
                d.id.clone()
            })?;
    }
    if let Some(file) = &sources.enemies {
        pack.enemies =
            parse_collection(dir, file, &mut checksums, expected(file), |d: &lastlight_core::EnemyDef| {
                d.id.clone()
            })?;
    }
    if let Some(file) = &sources.anchors {
        pack.anchors =
            parse_collection(dir, file, &mut checksums, expected(file), |d: &lastlight_core::AnchorDef| {
                d.id.clone()
            })?;
    }
    if let Some(file) = &sources.cards {
        pack.cards =
            parse_collection(dir, file, &mut checksums, expected(file), |d: &lastlight_core::CardDef| {
                d.id.clone()
            })?;
    }
    if let Some(file) = &sources.heroes {
        pack.heroes =
            parse_collection(dir, file, &mut checksums, expected(file), |d: &lastlight_core::HeroDef| {
                d.id.clone()
            })?;
    }

    pack.manifest.checksums = checksums;
    Ok(pack)
}

/// Compiles a source directory and writes the container next to it.
pub fn compile_to_file(dir: &Path, out: &Path) -> anyhow::Result<()> {
    let pack = compile_pack(dir)?;
    let bytes = codec::write(&pack).context("failed to encode container")?;
    std::fs::write(out, bytes)
        .with_context(|| format!("failed to write {}", out.display()))?;
    tracing::info!(
        pack_id = %pack.manifest.pack_id,
        out = %out.display(),
        "compiled pack"
    );
    Ok(())
}
