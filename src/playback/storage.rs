//! Key/value persistence for playback state.
//!
//! Values are JSON documents. [`JsonFileStore`] keeps one `<key>.json` file
//! per key under a data directory; [`MemoryStore`] is used for one-shot runs
//! and tests.

use std::collections::HashMap;
use std::path::PathBuf;

use parking_lot::Mutex;
use serde_json::Value;

use crate::error::{Error, Result, ResultExt};

/// Song that was current when the state was last saved.
pub const CURRENT_SONG_KEY: &str = "currentPlayingSong";
/// Play history, newest first.
pub const HISTORY_KEY: &str = "playHistory";
/// Marked songs.
pub const FAVORITES_KEY: &str = "favorites";

/// Persistent key/value store.
pub trait Storage: Send + Sync {
    /// Read a key; `Ok(None)` when it was never written.
    fn get(&self, key: &str) -> Result<Option<Value>>;

    fn set(&self, key: &str, value: &Value) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;
}

/// One JSON file per key.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl Storage for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(format!("Failed to read {}", path.display()))?;
        let value = serde_json::from_str(&contents)
            .map_err(|e| Error::storage(&path, e.to_string()))?;
        Ok(Some(value))
    }

    fn set(&self, key: &str, value: &Value) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(format!("Failed to create {}", self.dir.display()))?;

        let path = self.path_for(key);
        let contents = serde_json::to_string_pretty(value)?;

        // Write atomically (write to temp, then rename)
        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, contents)
            .with_context(format!("Failed to write {}", temp_path.display()))?;
        std::fs::rename(&temp_path, &path)
            .with_context(format!("Failed to replace {}", path.display()))?;

        tracing::debug!("Saved {} to {:?}", key, path);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Io(e).context(format!("Failed to remove {}", path.display()))),
        }
    }
}

/// In-process store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.values.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &Value) -> Result<()> {
        self.values.lock().insert(key.to_string(), value.clone());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.values.lock().remove(key);
        Ok(())
    }
}
