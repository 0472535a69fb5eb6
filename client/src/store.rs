//! Persistent key-value session storage.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session store is the single source of truth for "is someone signed
//! in" across reloads and across every open tab. It holds flat string
//! entries under the `user*` namespace; typed access lives in
//! `crate::context`.
//!
//! DESIGN
//! ======
//! Writes go through `StoreBatch`, which each backend applies atomically:
//! a sign-in replaces the whole namespace in one step, so a failure can never
//! leave half of a profile behind. There is no locking or versioning across
//! tabs; the last batch written wins.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("session file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("session file is not a JSON string map: {0}")]
    Format(#[from] serde_json::Error),
    #[error("session store lock poisoned")]
    Poisoned,
}

// =============================================================================
// BATCH
// =============================================================================

/// A set of writes applied as one unit: optional namespace clear, then sets.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoreBatch {
    pub clear_prefix: Option<String>,
    pub set: Vec<(String, String)>,
}

impl StoreBatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove every key starting with `prefix` before the sets are applied.
    #[must_use]
    pub fn clear_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.clear_prefix = Some(prefix.into());
        self
    }

    #[must_use]
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clear_prefix.is_none() && self.set.is_empty()
    }

    fn apply_to(&self, entries: &mut BTreeMap<String, String>) {
        if let Some(prefix) = &self.clear_prefix {
            entries.retain(|key, _| !key.starts_with(prefix.as_str()));
        }
        for (key, value) in &self.set {
            entries.insert(key.clone(), value.clone());
        }
    }
}

// =============================================================================
// TRAIT
// =============================================================================

/// Backend for the session store.
pub trait SessionStore: Send + Sync {
    /// Read one entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Every entry, read in one go.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn snapshot(&self) -> Result<BTreeMap<String, String>, StoreError>;

    /// Apply `batch` atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written; nothing is applied.
    fn apply(&self, batch: &StoreBatch) -> Result<(), StoreError>;
}

// =============================================================================
// MEMORY STORE
// =============================================================================

/// In-process store. Clones share the same entries, like tabs of one browser
/// profile sharing its storage.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<BTreeMap<String, String>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.read().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn snapshot(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let entries = self.entries.read().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.clone())
    }

    fn apply(&self, batch: &StoreBatch) -> Result<(), StoreError> {
        let mut entries = self.entries.write().map_err(|_| StoreError::Poisoned)?;
        batch.apply_to(&mut entries);
        Ok(())
    }
}

// =============================================================================
// FILE STORE
// =============================================================================

/// Store persisted as one JSON object file, rewritten whole on every batch
/// through a sibling temp file and rename.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: std::sync::Mutex<()>,
}

impl FileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), write_lock: std::sync::Mutex::new(()) }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match std::fs::read(&self.path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(BTreeMap::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let raw = serde_json::to_vec_pretty(entries)?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, raw)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_all()?.remove(key))
    }

    fn snapshot(&self) -> Result<BTreeMap<String, String>, StoreError> {
        self.read_all()
    }

    fn apply(&self, batch: &StoreBatch) -> Result<(), StoreError> {
        if batch.is_empty() {
            return Ok(());
        }
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;
        let mut entries = self.read_all()?;
        batch.apply_to(&mut entries);
        self.write_all(&entries)
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
