//! Runtime pack loading.
//!
//! The runtime accepts only compiled containers. Raw authoring sources
//! (RON/TOML) are rejected outright here; parsing them is a compile-time
//! capability gated behind the `authoring` feature.

use std::path::{Path, PathBuf};

use crate::codec::{self, DecodeError};
use crate::pack::LoadedPack;

/// File extension of compiled packs.
pub const PACK_EXTENSION: &str = "lpack";

/// Typed pack load failures.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("pack file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("`{}` is an authoring source; only compiled .{ext} packs load at runtime", .0.display(), ext = PACK_EXTENSION)]
    AuthoringSourceRejected(PathBuf),

    #[error("`{}` does not have the .{ext} extension", .0.display(), ext = PACK_EXTENSION)]
    NotAPack(PathBuf),

    #[error("checksum mismatch in `{file}`: expected {expected}, computed {actual}")]
    ChecksumMismatch {
        file: String,
        expected: String,
        actual: String,
    },

    #[error("manifest of `{file}` is invalid: {reason}")]
    InvalidManifest { file: String, reason: String },

    #[error("failed to decode `{file}`: {source}")]
    ContentLoadFailed {
        file: String,
        source: DecodeError,
    },

    #[error("failed to read `{}`: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Loads compiled pack containers from disk.
pub struct PackLoader;

impl PackLoader {
    /// Loads a compiled pack. Integrity (per-section digests) is verified
    /// before any content is parsed; a corrupted file fails with
    /// [`LoadError::ChecksumMismatch`], never with a parse error masking
    /// the real cause. Beyond the read, loading has no side effects.
    pub fn load(path: &Path) -> Result<LoadedPack, LoadError> {
        if !path.exists() {
            return Err(LoadError::FileNotFound(path.to_path_buf()));
        }

        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case(PACK_EXTENSION) => {}
            Some("ron") | Some("toml") | Some("json") => {
                return Err(LoadError::AuthoringSourceRejected(path.to_path_buf()));
            }
            _ => return Err(LoadError::NotAPack(path.to_path_buf())),
        }

        let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let file = path.display().to_string();
        let pack = codec::read(&bytes).map_err(|error| match error {
            DecodeError::SectionDigestMismatch {
                section,
                expected,
                actual,
            } => LoadError::ChecksumMismatch {
                file: format!("{file}#{section}"),
                expected,
                actual,
            },
            DecodeError::Malformed { section, detail } if section == "manifest" => {
                LoadError::InvalidManifest { file: file.clone(), reason: detail }
            }
            other => LoadError::ContentLoadFailed {
                file: file.clone(),
                source: other,
            },
        })?;

        tracing::info!(
            pack_id = %pack.manifest.pack_id,
            version = %pack.manifest.version,
            definitions = pack.definition_count(),
            "loaded pack"
        );

        Ok(pack)
    }
}
