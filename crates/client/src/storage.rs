//! Persistent key-value storage.
//!
//! The multiplexer only persists navigation breadcrumbs, and it only needs a
//! string key-value store for that. [`FileStore`] keeps one plain-text file per
//! key in the platform-appropriate config directory:
//!   - Linux: `~/.config/chatgames/`
//!   - macOS: `~/Library/Application Support/chatgames/`
//!   - Windows: `%APPDATA%\chatgames\`
//!
//! [`MemoryStore`] backs tests and hosts that do not want anything on disk.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub trait KeyValueStore: Send + Sync {
    fn load_raw(&self, key: &str) -> io::Result<Option<String>>;
    fn save_raw(&self, key: &str, value: &str) -> io::Result<()>;
    fn remove_raw(&self, key: &str) -> io::Result<()>;
}

/// Save a string value to persistent storage.
///
/// Returns `true` if the operation succeeded.
pub fn save(store: &dyn KeyValueStore, key: &str, value: &str) -> bool {
    match store.save_raw(key, value) {
        Ok(()) => true,
        Err(e) => {
            crate::log_warn!("storage: failed to save {key}: {e}");
            false
        }
    }
}

/// Load a string value from persistent storage.
///
/// Returns `None` if the key doesn't exist or can't be read.
pub fn load(store: &dyn KeyValueStore, key: &str) -> Option<String> {
    match store.load_raw(key) {
        Ok(value) => value,
        Err(e) => {
            crate::log_warn!("storage: failed to load {key}: {e}");
            None
        }
    }
}

/// Remove a value from persistent storage.
pub fn remove(store: &dyn KeyValueStore, key: &str) {
    if let Err(e) = store.remove_raw(key) {
        crate::log_warn!("storage: failed to remove {key}: {e}");
    }
}

// =========================================
// File-backed store
// =========================================

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store rooted at `dir`, created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store in the platform config directory, if one exists.
    pub fn in_config_dir() -> Option<Self> {
        Some(Self::new(dirs::config_dir()?.join("chatgames")))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_path(&self, key: &str) -> PathBuf {
        // Sanitize key to be a valid filename
        let safe_key = key.replace(['/', '\\', ':', '*', '?', '"', '<', '>', '|'], "_");
        self.dir.join(safe_key)
    }
}

impl KeyValueStore for FileStore {
    fn load_raw(&self, key: &str) -> io::Result<Option<String>> {
        match std::fs::read_to_string(self.file_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn save_raw(&self, key: &str, value: &str) -> io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.file_path(key), value)
    }

    fn remove_raw(&self, key: &str) -> io::Result<()> {
        match std::fs::remove_file(self.file_path(key)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

// =========================================
// In-memory store
// =========================================

/// Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map is still a valid map.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn load_raw(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.lock().get(key).cloned())
    }

    fn save_raw(&self, key: &str, value: &str) -> io::Result<()> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_raw(&self, key: &str) -> io::Result<()> {
        self.lock().remove(key);
        Ok(())
    }
}
