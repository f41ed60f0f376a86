use crate::cache::cache::{Entry, KeyType, Value};
use crate::cache::timer::{self, SystemTimer};
use crate::memory_store::shared_store_state::SharedStoreState;

use dashmap::mapref::entry::Entry as DashEntry;
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;

type Storage = DashMap<KeyType, Entry>;

/// Key to entry mapping owning CAS generation and lazy eviction.
pub struct EntryStore {
    memory: Storage,
    store_state: SharedStoreState,
}

/// View of a single key while its shard is locked.
///
/// Expiration has already been applied: an expired entry looks absent.
/// Changes made through the slot are written back when the closure given
/// to [`EntryStore::with_slot`] returns, under the same lock.
pub struct Slot<'a> {
    entry: Option<Entry>,
    dirty: bool,
    now_millis: u64,
    store_state: &'a SharedStoreState,
}

impl<'a> Slot<'a> {
    fn new(entry: Option<Entry>, now_millis: u64, store_state: &'a SharedStoreState) -> Slot<'a> {
        Slot {
            entry,
            dirty: false,
            now_millis,
            store_state,
        }
    }

    pub fn get(&self) -> Option<&Entry> {
        self.entry.as_ref()
    }

    pub fn is_present(&self) -> bool {
        self.entry.is_some()
    }

    /// Time the slot was opened at, used for the expiration check
    pub fn now_millis(&self) -> u64 {
        self.now_millis
    }

    /// Creates or overwrites the entry with a fresh CAS token
    pub fn put(&mut self, value: Value, expires_at: u64) -> &Entry {
        let cas = self.store_state.get_cas_id();
        self.dirty = true;
        self.entry.insert(Entry::new(value, expires_at, cas))
    }

    /// Changes expiry only, value and token stay as they are
    pub fn set_expiry(&mut self, expires_at: u64) -> bool {
        match self.entry.as_mut() {
            Some(entry) => {
                entry.expires_at = expires_at;
                self.dirty = true;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self) -> Option<Entry> {
        let removed = self.entry.take();
        if removed.is_some() {
            self.dirty = true;
        }
        removed
    }
}

impl EntryStore {
    pub fn new(timer: Arc<dyn timer::Timer + Send + Sync>) -> EntryStore {
        EntryStore {
            memory: DashMap::new(),
            store_state: SharedStoreState::new(timer),
        }
    }

    /// Runs `f` against the key with check-evict-mutate done atomically.
    ///
    /// `f` must not call back into this store, the key's shard is locked
    /// while it runs.
    pub fn with_slot<R, F>(&self, key: &str, f: F) -> R
    where
        F: FnOnce(&mut Slot<'_>) -> R,
    {
        let now_millis = self.store_state.timestamp_millis();
        match self.memory.entry(key.to_owned()) {
            DashEntry::Occupied(mut occupied) => {
                let expired = self
                    .store_state
                    .check_if_expired(occupied.get(), now_millis);
                let current = if expired {
                    debug!("Evicting expired key: {}", key);
                    None
                } else {
                    Some(occupied.get().clone())
                };
                let mut slot = Slot::new(current, now_millis, &self.store_state);
                let result = f(&mut slot);
                if slot.dirty || expired {
                    match slot.entry {
                        Some(entry) => {
                            occupied.insert(entry);
                        }
                        None => {
                            occupied.remove();
                        }
                    }
                }
                result
            }
            DashEntry::Vacant(vacant) => {
                let mut slot = Slot::new(None, now_millis, &self.store_state);
                let result = f(&mut slot);
                if let Some(entry) = slot.entry {
                    vacant.insert(entry);
                }
                result
            }
        }
    }

    /// Returns the live entry, removing it first if it has expired
    pub fn check_and_evict(&self, key: &str) -> Option<Entry> {
        self.with_slot(key, |slot| slot.get().cloned())
    }

    pub fn put(&self, key: &str, value: Value, expires_at: u64) -> Entry {
        self.with_slot(key, |slot| slot.put(value, expires_at).clone())
    }

    pub fn remove(&self, key: &str) -> Option<Entry> {
        self.memory.remove(key).map(|(_key, entry)| entry)
    }

    pub fn clear(&self) {
        self.memory.clear();
    }

    /// Raw lookup, expired entries are returned as stored
    pub fn get(&self, key: &str) -> Option<Entry> {
        self.memory.get(key).map(|entry| entry.value().clone())
    }

    pub fn keys(&self) -> Vec<KeyType> {
        self.memory.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Key and entry pairs in store iteration order
    pub fn entries(&self) -> Vec<(KeyType, Entry)> {
        self.memory
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.memory.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memory.is_empty()
    }

    pub fn timestamp_millis(&self) -> u64 {
        self.store_state.timestamp_millis()
    }

    /// Copy of the underlying mapping, bypassing command semantics
    pub fn snapshot(&self) -> HashMap<KeyType, Entry> {
        self.entries().into_iter().collect()
    }

    /// Replaces the whole mapping, bypassing command semantics
    pub fn replace_all(&self, entries: HashMap<KeyType, Entry>) {
        self.memory.clear();
        for (key, entry) in entries {
            self.memory.insert(key, entry);
        }
    }

    /// Stores an entry exactly as given, token included
    pub fn insert_raw(&self, key: &str, entry: Entry) -> Option<Entry> {
        self.memory.insert(key.to_owned(), entry)
    }
}

impl Default for EntryStore {
    fn default() -> Self {
        EntryStore::new(Arc::new(SystemTimer::new()))
    }
}
