use crate::cache::cache::{CasToken, CasValue, DeltaResult, Entry, SetStatus, Value};
use crate::cache::error::{CacheError, Result};
use crate::cache::expiration;
use crate::memory_store::dash_map_store::EntryStore;
use bytes::BytesMut;
use std::collections::HashMap;
use std::sync::Arc;

/**
 * Implements Memcache commands based
 * on Key Value Store
 */
pub struct MemcStore {
    store: Arc<EntryStore>,
    max_expiration: u64,
}

impl MemcStore {
    pub fn new(store: Arc<EntryStore>, max_expiration: u64) -> MemcStore {
        MemcStore {
            store,
            max_expiration,
        }
    }

    pub fn entry_store(&self) -> &Arc<EntryStore> {
        &self.store
    }

    /// Swaps the backing store, returning the previous one
    pub fn bind(&mut self, store: Arc<EntryStore>) -> Arc<EntryStore> {
        std::mem::replace(&mut self.store, store)
    }

    fn expires(&self, ttl: i64, now_millis: u64) -> u64 {
        expiration::normalize(ttl, self.max_expiration, now_millis)
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.store
            .check_and_evict(key)
            .map(|entry| entry.value().clone())
    }

    pub fn gets(&self, key: &str) -> Option<CasValue> {
        self.store.check_and_evict(key).map(|entry| CasValue {
            cas: entry.cas(),
            value: entry.value().clone(),
        })
    }

    /// Values of the live keys, missing and expired keys are left out
    pub fn get_multi<K: AsRef<str>>(&self, keys: &[K]) -> HashMap<String, Value> {
        keys.iter()
            .filter_map(|key| {
                let key = key.as_ref();
                self.get(key).map(|value| (key.to_owned(), value))
            })
            .collect()
    }

    pub fn set(&self, key: &str, value: Value, ttl: i64) -> SetStatus {
        self.store.with_slot(key, |slot| {
            let now_millis = slot.now_millis();
            let entry = slot.put(value, self.expires(ttl, now_millis));
            trace!(
                "Stored {}, ttl left: {}s",
                key,
                expiration::remaining_ttl(entry, now_millis)
            );
            SetStatus { cas: entry.cas() }
        })
    }

    /// Stores only when the key is absent
    pub fn add(&self, key: &str, value: Value, ttl: i64) -> Result<SetStatus> {
        self.store.with_slot(key, |slot| {
            if slot.is_present() {
                return Err(CacheError::ItemNotStored);
            }
            let expires_at = self.expires(ttl, slot.now_millis());
            Ok(SetStatus {
                cas: slot.put(value, expires_at).cas(),
            })
        })
    }

    /// Stores only when the key is present
    pub fn replace(&self, key: &str, value: Value, ttl: i64) -> Result<SetStatus> {
        self.store.with_slot(key, |slot| {
            if !slot.is_present() {
                return Err(CacheError::ItemNotStored);
            }
            let expires_at = self.expires(ttl, slot.now_millis());
            Ok(SetStatus {
                cas: slot.put(value, expires_at).cas(),
            })
        })
    }

    /// Stores only when the key is present and its token equals `cas`
    pub fn cas(&self, key: &str, value: Value, cas: CasToken, ttl: i64) -> Option<SetStatus> {
        self.store.with_slot(key, |slot| {
            if slot.get().map(Entry::cas) != Some(cas) {
                return None;
            }
            let expires_at = self.expires(ttl, slot.now_millis());
            Some(SetStatus {
                cas: slot.put(value, expires_at).cas(),
            })
        })
    }

    pub fn append(&self, key: &str, value: Value) -> Result<SetStatus> {
        self.append_prepend_common(key, value, true)
    }

    pub fn prepend(&self, key: &str, value: Value) -> Result<SetStatus> {
        self.append_prepend_common(key, value, false)
    }

    fn append_prepend_common(&self, key: &str, value: Value, is_append: bool) -> Result<SetStatus> {
        self.store.with_slot(key, |slot| {
            let (current, expires_at) = match slot.get() {
                Some(entry) => (entry.value().to_text(), entry.expires_at()),
                None => return Err(CacheError::ItemNotStored),
            };
            let data = value.to_text();
            let mut new_value = BytesMut::with_capacity(current.len() + data.len());
            if is_append {
                new_value.extend_from_slice(&current);
                new_value.extend_from_slice(&data);
            } else {
                new_value.extend_from_slice(&data);
                new_value.extend_from_slice(&current);
            }
            // expiry carries over, only value and token change
            let entry = slot.put(Value::Text(new_value.freeze()), expires_at);
            Ok(SetStatus { cas: entry.cas() })
        })
    }

    pub fn increment(&self, key: &str, delta: f64) -> Option<DeltaResult> {
        self.add_delta(key, delta, true)
    }

    /// Decrements without a floor, results may go negative
    pub fn decrement(&self, key: &str, delta: f64) -> Option<DeltaResult> {
        self.add_delta(key, delta, false)
    }

    fn add_delta(&self, key: &str, delta: f64, increment: bool) -> Option<DeltaResult> {
        self.store.with_slot(key, |slot| {
            let (current, expires_at) = slot
                .get()
                .map(|entry| (entry.value().to_number(), entry.expires_at()))?;
            let value = if increment {
                current + delta
            } else {
                current - delta
            };
            let cas = slot.put(Value::Number(value), expires_at).cas();
            Some(DeltaResult { cas, value })
        })
    }

    /// Moves the expiry of a live key, value and token are kept
    pub fn touch(&self, key: &str, ttl: i64) -> bool {
        self.store.with_slot(key, |slot| {
            let expires_at = self.expires(ttl, slot.now_millis());
            slot.set_expiry(expires_at)
        })
    }

    pub fn delete(&self, key: &str) -> Option<Entry> {
        self.store.with_slot(key, |slot| slot.remove())
    }

    pub fn flush(&self) {
        self.store.clear()
    }
}

#[cfg(test)]
mod cas_tests;
#[cfg(test)]
mod flush_tests;
#[cfg(test)]
mod replace_tests;
#[cfg(test)]
mod touch_tests;
