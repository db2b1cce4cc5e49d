//! Durable storage backends for the destination registry

use crate::error::RegistryError;
use crate::models::ChatId;
use fs2::FileExt;
use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Storage capability behind [`super::DestinationRegistry`].
pub trait RegistryStore: Send + Sync {
    /// Read the persisted set. Missing or unreadable storage yields an empty set.
    fn load(&self) -> HashSet<ChatId>;

    /// Overwrite storage with the full set.
    fn save(&self, destinations: &HashSet<ChatId>) -> Result<(), RegistryError>;
}

/// JSON array of chat ids in a single file, e.g. `[-1001, -1002]`.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_ids(&self) -> Result<Vec<ChatId>, RegistryError> {
        let lock = self.open_lock()?;
        lock.lock_shared()?;

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(File::open(&self.path)?);
        reader.read_to_string(&mut contents)?;
        drop(reader);
        lock.unlock()?;

        Ok(serde_json::from_str(&contents)?)
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(suffix);
        self.path.with_file_name(name)
    }

    fn temp_path(&self) -> PathBuf {
        self.sibling(".tmp")
    }

    /// Stable file guarding the registry; the registry file itself is replaced on save.
    fn lock_path(&self) -> PathBuf {
        self.sibling(".lock")
    }

    fn open_lock(&self) -> Result<File, RegistryError> {
        Ok(OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(self.lock_path())?)
    }
}

impl RegistryStore for JsonFileStore {
    fn load(&self) -> HashSet<ChatId> {
        if !self.path.exists() {
            return HashSet::new();
        }
        match self.read_ids() {
            Ok(ids) => ids.into_iter().collect(),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "registry file unreadable, starting with an empty set"
                );
                HashSet::new()
            }
        }
    }

    fn save(&self, destinations: &HashSet<ChatId>) -> Result<(), RegistryError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut ids: Vec<ChatId> = destinations.iter().copied().collect();
        ids.sort();
        let json = serde_json::to_string(&ids)?;

        let lock = self.open_lock()?;
        lock.lock_exclusive()?;

        // Write a sibling file and rename over the target so readers never see a partial list.
        let temp_path = self.temp_path();
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)?;

        let mut writer = std::io::BufWriter::new(file);
        writer.write_all(json.as_bytes())?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
        drop(writer);

        std::fs::rename(&temp_path, &self.path)?;
        lock.unlock()?;
        Ok(())
    }
}

/// In-memory store; counts saves so callers can observe persistence.
#[derive(Default)]
pub struct MemoryStore {
    saved: Mutex<HashSet<ChatId>>,
    save_count: Mutex<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_destinations<I: IntoIterator<Item = ChatId>>(destinations: I) -> Self {
        Self {
            saved: Mutex::new(destinations.into_iter().collect()),
            save_count: Mutex::new(0),
        }
    }

    /// Last persisted set.
    pub fn persisted(&self) -> HashSet<ChatId> {
        self.saved
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn save_count(&self) -> usize {
        *self
            .save_count
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl RegistryStore for MemoryStore {
    fn load(&self) -> HashSet<ChatId> {
        self.persisted()
    }

    fn save(&self, destinations: &HashSet<ChatId>) -> Result<(), RegistryError> {
        *self
            .saved
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = destinations.clone();
        *self
            .save_count
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("groups.json"));
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("groups.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(JsonFileStore::new(&path).load().is_empty());
    }

    #[test]
    fn test_reads_plain_integer_array() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("groups.json");
        std::fs::write(&path, "[-1001, -1002, -1001]").unwrap();
        let loaded = JsonFileStore::new(&path).load();
        assert_eq!(loaded.len(), 2);
        assert!(loaded.contains(&ChatId(-1002)));
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("state").join("groups.json"));
        let set: HashSet<ChatId> = [ChatId(-3), ChatId(-1), ChatId(-2)].into_iter().collect();

        store.save(&set).unwrap();
        assert_eq!(store.load(), set);
        assert!(!store.temp_path().exists());

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(raw, "[-3,-2,-1]");
    }

    #[test]
    fn test_save_waits_for_reader_lock() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("groups.json"));
        store.save(&HashSet::from([ChatId(-1)])).unwrap();
        assert!(store.lock_path().exists());

        // A shared holder of the lock file blocks writers, not the registry file name.
        let reader = store.open_lock().unwrap();
        reader.lock_shared().unwrap();
        assert!(store.open_lock().unwrap().try_lock_exclusive().is_err());

        reader.unlock().unwrap();
        let writer = store.open_lock().unwrap();
        writer.try_lock_exclusive().unwrap();
        writer.unlock().unwrap();

        store.save(&HashSet::from([ChatId(-2)])).unwrap();
        assert_eq!(store.load(), HashSet::from([ChatId(-2)]));
    }

    #[test]
    fn test_memory_store_counts_saves() {
        let store = MemoryStore::with_destinations([ChatId(1)]);
        assert_eq!(store.load().len(), 1);
        store.save(&HashSet::new()).unwrap();
        assert_eq!(store.save_count(), 1);
        assert!(store.persisted().is_empty());
    }
}
