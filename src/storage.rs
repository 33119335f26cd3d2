//! Local key-value storage areas.
//!
//! [`StorageArea`] models the browser localStorage contract the original
//! deployment persisted into: string values under fixed string keys.
//! [`DirStorage`] keeps one `<key>.json` file per key under a dot-directory
//! in the user's home; [`MemoryStorage`] backs tests and ephemeral contexts.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StoreError;

/// Directory under `$HOME` holding the file-backed storage area.
const STORAGE_DIR_NAME: &str = ".stagefolio";

/// A local key-value storage area.
///
/// Absent keys read as `None`; writes overwrite. Implementations are plain
/// synchronous stores — there is exactly one writer context.
pub trait StorageArea {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove_item(&mut self, key: &str) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// File-backed storage
// ---------------------------------------------------------------------------

/// File-backed storage area: one `<key>.json` file per key.
#[derive(Debug, Clone)]
pub struct DirStorage {
    dir: PathBuf,
}

impl DirStorage {
    /// Open (creating if needed) a storage area rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|_| StoreError::CreateDir(dir.clone()))?;
        }
        Ok(Self { dir })
    }

    /// Open the default storage area at `~/.stagefolio/`.
    pub fn open_default() -> Result<Self, StoreError> {
        let home = dirs::home_dir().ok_or(StoreError::HomeDirNotFound)?;
        Self::open(home.join(STORAGE_DIR_NAME))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StorageArea for DirStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.key_path(key)).ok()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        atomic_write_str(&self.key_path(key), value)
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StoreError> {
        let path = self.key_path(key);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }
}

/// Write `content` to `path` atomically: write a sibling temp file, then
/// rename over the target so readers never observe a partial document.
fn atomic_write_str(path: &Path, content: &str) -> Result<(), StoreError> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, content)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// In-memory storage
// ---------------------------------------------------------------------------

/// HashMap-backed storage area for tests and ephemeral contexts.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw view of a stored value, for assertions.
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.items.get(key).map(String::as_str)
    }
}

impl StorageArea for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StoreError> {
        self.items.remove(key);
        Ok(())
    }
}
