//! Destination registry: the durable set of groups the bot broadcasts to
//!
//! The live set is loaded once from a [`RegistryStore`] and every mutation is written
//! back immediately. Writers are the discovery handler and the broadcaster, which run
//! on the same logical timeline; the mutex only guards the in-memory set.

mod store;

pub use store::{JsonFileStore, MemoryStore, RegistryStore};

use crate::error::RegistryError;
use crate::models::ChatId;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

pub struct DestinationRegistry {
    store: Arc<dyn RegistryStore>,
    live: Mutex<HashSet<ChatId>>,
}

impl DestinationRegistry {
    /// Load the persisted set from `store`.
    pub fn open(store: Arc<dyn RegistryStore>) -> Self {
        let live = store.load();
        tracing::info!(destinations = live.len(), "destination registry loaded");
        Self {
            store,
            live: Mutex::new(live),
        }
    }

    fn live(&self) -> MutexGuard<'_, HashSet<ChatId>> {
        self.live
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Insert and persist. Returns `true` if the destination was not tracked before.
    /// A failed save leaves the live set unchanged.
    pub fn add(&self, destination: ChatId) -> Result<bool, RegistryError> {
        let mut live = self.live();
        if !live.insert(destination) {
            return Ok(false);
        }
        if let Err(e) = self.store.save(&live) {
            live.remove(&destination);
            return Err(e);
        }
        Ok(true)
    }

    /// Remove and persist. Absent destinations are a no-op; returns whether one was removed.
    /// A failed save leaves the live set unchanged.
    pub fn remove(&self, destination: ChatId) -> Result<bool, RegistryError> {
        let mut live = self.live();
        if !live.remove(&destination) {
            return Ok(false);
        }
        if let Err(e) = self.store.save(&live) {
            live.insert(destination);
            return Err(e);
        }
        Ok(true)
    }

    /// Current destinations in ascending id order.
    pub fn snapshot(&self) -> Vec<ChatId> {
        let mut ids: Vec<ChatId> = self.live().iter().copied().collect();
        ids.sort();
        ids
    }

    pub fn contains(&self, destination: ChatId) -> bool {
        self.live().contains(&destination)
    }

    pub fn len(&self) -> usize {
        self.live().len()
    }

    pub fn is_empty(&self) -> bool {
        self.live().is_empty()
    }
}
