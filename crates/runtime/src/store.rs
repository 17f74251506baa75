//! File-backed save store.
//!
//! Writes go to a temp file first and land with an atomic rename, so a
//! crash mid-write never leaves a truncated save in place.

use std::fs;
use std::path::{Path, PathBuf};

use crate::save::{self, EngineSave, SaveDecodeError, SaveEncodeError};

/// File extension of stored saves.
pub const SAVE_EXTENSION: &str = "llsave";

/// Typed store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no save named `{0}`")]
    NotFound(String),

    #[error(transparent)]
    Encode(#[from] SaveEncodeError),

    #[error(transparent)]
    Decode(#[from] SaveDecodeError),

    #[error("save store I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Save storage rooted at one directory.
pub struct FileSaveStore {
    base_dir: PathBuf,
}

impl FileSaveStore {
    /// Opens (and creates if needed) a store directory.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn save_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(format!("{name}.{SAVE_EXTENSION}"))
    }

    /// Persists a save under `name`, replacing any previous one.
    pub fn save(&self, name: &str, save: &EngineSave) -> Result<(), StoreError> {
        let bytes = save::encode(save)?;
        let path = self.save_path(name);
        let temp_path = path.with_extension(format!("{SAVE_EXTENSION}.tmp"));

        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, &path)?;

        tracing::debug!(name, path = %path.display(), "saved game");
        Ok(())
    }

    /// Loads and decodes a save by name.
    pub fn load(&self, name: &str) -> Result<EngineSave, StoreError> {
        let path = self.save_path(name);
        if !path.exists() {
            return Err(StoreError::NotFound(name.to_owned()));
        }
        let bytes = fs::read(&path)?;
        let save = save::decode(&bytes)?;
        tracing::info!(name, nonce = save.state.nonce(), "loaded save");
        Ok(save)
    }

    /// Deletes a save if it exists.
    pub fn delete(&self, name: &str) -> Result<(), StoreError> {
        let path = self.save_path(name);
        if path.exists() {
            fs::remove_file(&path)?;
            tracing::info!(name, "deleted save");
        }
        Ok(())
    }

    /// Names of all stored saves, sorted.
    pub fn list(&self) -> Result<Vec<String>, StoreError> {
        let suffix = format!(".{SAVE_EXTENSION}");
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let entry = entry?;
            if let Some(file_name) = entry.file_name().to_str()
                && let Some(name) = file_name.strip_suffix(&suffix)
            {
                names.push(name.to_owned());
            }
        }
        names.sort();
        Ok(names)
    }
}
