/// Key-value persistence for per-video completion records
///
/// The tracker talks to storage only through the `CompletionStore` trait so
/// tests can substitute an in-memory fake for the file-backed store.
use anyhow::{anyhow, Result};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{debug, info};

/// Prefix for every per-video completion record key
pub const COMPLETION_KEY_PREFIX: &str = "segment_completions_";

/// Storage key for a video's completion record
pub fn completion_key(video_id: &str) -> String {
    format!("{}{}", COMPLETION_KEY_PREFIX, video_id)
}

/// Scoped string key-value store for completion records
///
/// Values are JSON documents. The store is assumed single-writer at a time;
/// concurrent writers for the same key are last-write-wins.
pub trait CompletionStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
    fn keys(&self) -> Result<Vec<String>>;
}

/// In-memory store for tests and embedding
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CompletionStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| anyhow!("completion store mutex poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow!("completion store mutex poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow!("completion store mutex poisoned"))?;
        entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| anyhow!("completion store mutex poisoned"))?;
        Ok(entries.keys().cloned().collect())
    }
}

/// File-backed store keeping one `<key>.json` file per key
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    data_dir: PathBuf,
}

impl JsonFileStore {
    /// Create a store rooted at `data_dir`, creating the directory if needed
    pub fn new(data_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&data_dir)?;
        debug!("📁 Completion store directory: {}", data_dir.display());
        Ok(Self { data_dir })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", key))
    }
}

impl CompletionStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match std::fs::read_to_string(self.key_path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        std::fs::write(self.key_path(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        match std::fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();

        for entry in std::fs::read_dir(&self.data_dir)? {
            let path = entry?.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    keys.push(stem.to_string());
                }
            }
        }

        Ok(keys)
    }
}

/// Remove completion records for videos absent from the keep list
///
/// Stale records otherwise accumulate forever; the owning application calls
/// this with the ids of videos still on the user's learning list.
pub fn prune_completions(
    store: &dyn CompletionStore,
    keep_video_ids: &HashSet<String>,
) -> Result<usize> {
    let mut removed = 0;

    for key in store.keys()? {
        if let Some(video_id) = key.strip_prefix(COMPLETION_KEY_PREFIX) {
            if !keep_video_ids.contains(video_id) {
                store.remove(&key)?;
                removed += 1;
                debug!("🗑️ Pruned stale completion record: {}", key);
            }
        }
    }

    if removed > 0 {
        info!("🧹 Pruned {} stale completion records", removed);
    }

    Ok(removed)
}
