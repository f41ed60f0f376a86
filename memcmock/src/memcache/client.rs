//! Client facade with the fixed command interface.
//!
//! Every command runs against the store right away and hands its
//! `(error, result)` to the dispatcher; callbacks fire on a later turn
//! (`run_pending_tasks`, `run_until_idle` or a [`PendingTasksRunner`]).
//!
//! [`PendingTasksRunner`]: crate::memcache::pending_tasks_runner::PendingTasksRunner

use crate::cache::cache::{CasToken, CasValue, Value};
use crate::cache::error::CacheError;
use crate::cache::timer::{SystemTimer, Timer};
use crate::memcache::config::ClientConfig;
use crate::memcache::dispatcher::{Argument, CallbackDispatcher, Command, InvocationContext};
use crate::memcache::reports::{
    self, CacheDump, ServerItems, ServerSettings, ServerSlabs, ServerStats, VersionInfo,
};
use crate::memcache::store::MemcStore;
use crate::memory_store::dash_map_store::EntryStore;
use std::collections::HashMap;
use std::sync::Arc;

/// Server labels of a client, built from a single label or a list of them
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Servers(Vec<String>);

impl From<&str> for Servers {
    fn from(server: &str) -> Self {
        Servers(vec![server.to_owned()])
    }
}

impl From<String> for Servers {
    fn from(server: String) -> Self {
        Servers(vec![server])
    }
}

impl<S: Into<String>> From<Vec<S>> for Servers {
    fn from(servers: Vec<S>) -> Self {
        Servers(servers.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for Servers {
    fn from(servers: [S; N]) -> Self {
        Servers(servers.into_iter().map(Into::into).collect())
    }
}

pub struct Memcached {
    servers: Vec<String>,
    config: ClientConfig,
    storage: MemcStore,
    dispatcher: Arc<CallbackDispatcher>,
}

impl Memcached {
    pub fn new<S: Into<Servers>>(servers: S, config: ClientConfig) -> Memcached {
        Memcached::with_timer(servers, config, Arc::new(SystemTimer::new()))
    }

    /// Client whose store reads time from `timer`
    pub fn with_timer<S: Into<Servers>>(
        servers: S,
        config: ClientConfig,
        timer: Arc<dyn Timer + Send + Sync>,
    ) -> Memcached {
        let Servers(servers) = servers.into();
        debug!(
            "Creating client for {:?}, max expiration: {}s",
            servers, config.max_expiration
        );
        let store = Arc::new(EntryStore::new(timer));
        Memcached {
            servers,
            storage: MemcStore::new(store, config.max_expiration),
            config,
            dispatcher: Arc::new(CallbackDispatcher::new()),
        }
    }

    pub fn servers(&self) -> &[String] {
        &self.servers
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn dispatcher(&self) -> Arc<CallbackDispatcher> {
        self.dispatcher.clone()
    }

    /// Delivers the callbacks queued so far, see
    /// [`CallbackDispatcher::run_pending_tasks`]
    pub fn run_pending_tasks(&self) -> usize {
        self.dispatcher.run_pending_tasks()
    }

    pub fn run_until_idle(&self) -> usize {
        self.dispatcher.run_until_idle()
    }

    /// Store backing this client
    pub fn store(&self) -> Arc<EntryStore> {
        self.storage.entry_store().clone()
    }

    /// Points this client at `store`, returning the one it used before.
    /// Binding the same store to two clients makes them share entries.
    pub fn bind_store(&mut self, store: Arc<EntryStore>) -> Arc<EntryStore> {
        debug!("Binding external store");
        self.storage.bind(store)
    }

    fn invoke<T, F>(
        &self,
        command: Command,
        arguments: Vec<Argument>,
        error: Option<CacheError>,
        result: T,
        callback: F,
    ) where
        T: Send + 'static,
        F: FnOnce(&InvocationContext, Option<CacheError>, T) + Send + 'static,
    {
        let context = InvocationContext::new(command, arguments);
        self.dispatcher.schedule(context, error, result, callback);
    }

    fn stored<T, F>(
        &self,
        command: Command,
        arguments: Vec<Argument>,
        result: crate::cache::error::Result<T>,
        callback: F,
    ) where
        F: FnOnce(&InvocationContext, Option<CacheError>, bool) + Send + 'static,
    {
        match result {
            Ok(_) => self.invoke(command, arguments, None, true, callback),
            Err(err) => self.invoke(command, arguments, Some(err), false, callback),
        }
    }

    /// Sets a new expiry on a live key
    pub fn touch<K, F>(&self, key: K, lifetime: i64, callback: F)
    where
        K: Into<String>,
        F: FnOnce(&InvocationContext, Option<CacheError>, bool) + Send + 'static,
    {
        let key = key.into();
        let touched = self.storage.touch(&key, lifetime);
        debug!("touch {}: {}", key, touched);
        self.invoke(
            Command::Touch,
            vec![key.into(), lifetime.into()],
            None,
            touched,
            callback,
        );
    }

    /// Value of a single key; several keys are fetched with [`Memcached::get_multi`]
    pub fn get<K, F>(&self, key: K, callback: F)
    where
        K: Into<String>,
        F: FnOnce(&InvocationContext, Option<CacheError>, Option<Value>) + Send + 'static,
    {
        let key = key.into();
        let value = self.storage.get(&key);
        debug!("get {}: hit={}", key, value.is_some());
        self.invoke(Command::Get, vec![key.into()], None, value, callback);
    }

    pub fn set<K, V, F>(&self, key: K, value: V, lifetime: i64, callback: F)
    where
        K: Into<String>,
        V: Into<Value>,
        F: FnOnce(&InvocationContext, Option<CacheError>, bool) + Send + 'static,
    {
        let key = key.into();
        let value = value.into();
        let status = self.storage.set(&key, value.clone(), lifetime);
        debug!("set {}: cas={}", key, status.cas);
        self.invoke(
            Command::Set,
            vec![key.into(), value.into(), lifetime.into()],
            None,
            true,
            callback,
        );
    }

    /// Value of a key together with its CAS token
    pub fn gets<K, F>(&self, key: K, callback: F)
    where
        K: Into<String>,
        F: FnOnce(&InvocationContext, Option<CacheError>, Option<CasValue>) + Send + 'static,
    {
        let key = key.into();
        let value = self.storage.gets(&key);
        debug!("gets {}: hit={}", key, value.is_some());
        self.invoke(Command::Gets, vec![key.into()], None, value, callback);
    }

    /// Values of all live keys among `keys`; missing ones are omitted
    pub fn get_multi<I, K, F>(&self, keys: I, callback: F)
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
        F: FnOnce(&InvocationContext, Option<CacheError>, HashMap<String, Value>)
            + Send
            + 'static,
    {
        let keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        let values = self.storage.get_multi(&keys);
        debug!("getMulti {:?}: {} hits", keys, values.len());
        self.invoke(Command::GetMulti, vec![keys.into()], None, values, callback);
    }

    /// Stores only when the key exists, NotStored otherwise
    pub fn replace<K, V, F>(&self, key: K, value: V, lifetime: i64, callback: F)
    where
        K: Into<String>,
        V: Into<Value>,
        F: FnOnce(&InvocationContext, Option<CacheError>, bool) + Send + 'static,
    {
        let key = key.into();
        let value = value.into();
        let result = self.storage.replace(&key, value.clone(), lifetime);
        debug!("replace {}: stored={}", key, result.is_ok());
        self.stored(
            Command::Replace,
            vec![key.into(), value.into(), lifetime.into()],
            result,
            callback,
        );
    }

    /// Stores only when the key does not exist, NotStored otherwise
    pub fn add<K, V, F>(&self, key: K, value: V, lifetime: i64, callback: F)
    where
        K: Into<String>,
        V: Into<Value>,
        F: FnOnce(&InvocationContext, Option<CacheError>, bool) + Send + 'static,
    {
        let key = key.into();
        let value = value.into();
        let result = self.storage.add(&key, value.clone(), lifetime);
        debug!("add {}: stored={}", key, result.is_ok());
        self.stored(
            Command::Add,
            vec![key.into(), value.into(), lifetime.into()],
            result,
            callback,
        );
    }

    /// Stores only when `cas` equals the key's current token. A mismatch
    /// is reported as `false`, never as an error.
    pub fn cas<K, V, F>(&self, key: K, value: V, cas: CasToken, lifetime: i64, callback: F)
    where
        K: Into<String>,
        V: Into<Value>,
        F: FnOnce(&InvocationContext, Option<CacheError>, bool) + Send + 'static,
    {
        let key = key.into();
        let value = value.into();
        let stored = self.storage.cas(&key, value.clone(), cas, lifetime).is_some();
        debug!("cas {} with {}: stored={}", key, cas, stored);
        self.invoke(
            Command::Cas,
            vec![key.into(), value.into(), cas.into(), lifetime.into()],
            None,
            stored,
            callback,
        );
    }

    pub fn append<K, V, F>(&self, key: K, value: V, callback: F)
    where
        K: Into<String>,
        V: Into<Value>,
        F: FnOnce(&InvocationContext, Option<CacheError>, bool) + Send + 'static,
    {
        let key = key.into();
        let value = value.into();
        let result = self.storage.append(&key, value.clone());
        debug!("append {}: stored={}", key, result.is_ok());
        self.stored(
            Command::Append,
            vec![key.into(), value.into()],
            result,
            callback,
        );
    }

    pub fn prepend<K, V, F>(&self, key: K, value: V, callback: F)
    where
        K: Into<String>,
        V: Into<Value>,
        F: FnOnce(&InvocationContext, Option<CacheError>, bool) + Send + 'static,
    {
        let key = key.into();
        let value = value.into();
        let result = self.storage.prepend(&key, value.clone());
        debug!("prepend {}: stored={}", key, result.is_ok());
        self.stored(
            Command::Prepend,
            vec![key.into(), value.into()],
            result,
            callback,
        );
    }

    /// New value after adding `amount`, `None` when the key is missing
    pub fn incr<K, F>(&self, key: K, amount: f64, callback: F)
    where
        K: Into<String>,
        F: FnOnce(&InvocationContext, Option<CacheError>, Option<f64>) + Send + 'static,
    {
        let key = key.into();
        let value = self.storage.increment(&key, amount).map(|delta| delta.value);
        debug!("incr {} by {}: {:?}", key, amount, value);
        self.invoke(
            Command::Incr,
            vec![key.into(), amount.into()],
            None,
            value,
            callback,
        );
    }

    /// New value after subtracting `amount`, `None` when the key is missing
    pub fn decr<K, F>(&self, key: K, amount: f64, callback: F)
    where
        K: Into<String>,
        F: FnOnce(&InvocationContext, Option<CacheError>, Option<f64>) + Send + 'static,
    {
        let key = key.into();
        let value = self.storage.decrement(&key, amount).map(|delta| delta.value);
        debug!("decr {} by {}: {:?}", key, amount, value);
        self.invoke(
            Command::Decr,
            vec![key.into(), amount.into()],
            None,
            value,
            callback,
        );
    }

    pub fn delete<K, F>(&self, key: K, callback: F)
    where
        K: Into<String>,
        F: FnOnce(&InvocationContext, Option<CacheError>, bool) + Send + 'static,
    {
        let key = key.into();
        let deleted = self.storage.delete(&key).is_some();
        debug!("delete {}: {}", key, deleted);
        self.invoke(Command::Delete, vec![key.into()], None, deleted, callback);
    }

    pub fn version<F>(&self, callback: F)
    where
        F: FnOnce(&InvocationContext, Option<CacheError>, Vec<VersionInfo>) + Send + 'static,
    {
        let report = reports::version(&self.servers);
        self.invoke(Command::Version, vec![], None, report, callback);
    }

    /// Empties the store; the result holds a single `true`
    pub fn flush<F>(&self, callback: F)
    where
        F: FnOnce(&InvocationContext, Option<CacheError>, Vec<bool>) + Send + 'static,
    {
        self.storage.flush();
        debug!("flush");
        self.invoke(Command::Flush, vec![], None, vec![true], callback);
    }

    pub fn stats<F>(&self, callback: F)
    where
        F: FnOnce(&InvocationContext, Option<CacheError>, Vec<ServerStats>) + Send + 'static,
    {
        let now_millis = self.storage.entry_store().timestamp_millis();
        let report = reports::stats(&self.servers, now_millis);
        self.invoke(Command::Stats, vec![], None, report, callback);
    }

    pub fn settings<F>(&self, callback: F)
    where
        F: FnOnce(&InvocationContext, Option<CacheError>, Vec<ServerSettings>) + Send + 'static,
    {
        let report = reports::settings(&self.servers, self.config.max_value);
        self.invoke(Command::Settings, vec![], None, report, callback);
    }

    pub fn slabs<F>(&self, callback: F)
    where
        F: FnOnce(&InvocationContext, Option<CacheError>, Vec<ServerSlabs>) + Send + 'static,
    {
        let report = reports::slabs(&self.servers);
        self.invoke(Command::Slabs, vec![], None, report, callback);
    }

    pub fn items<F>(&self, callback: F)
    where
        F: FnOnce(&InvocationContext, Option<CacheError>, Vec<ServerItems>) + Send + 'static,
    {
        let report = reports::items(&self.servers, self.storage.entry_store().len());
        self.invoke(Command::Items, vec![], None, report, callback);
    }

    /// Key, size and expiry of every stored entry. `server`, `slab_id`
    /// and `limit` are only recorded in the context.
    pub fn cachedump<S, F>(&self, server: S, slab_id: u32, limit: u32, callback: F)
    where
        S: Into<String>,
        F: FnOnce(&InvocationContext, Option<CacheError>, CacheDump) + Send + 'static,
    {
        let server: String = server.into();
        let dump = reports::cachedump(self.storage.entry_store().entries());
        self.invoke(
            Command::Cachedump,
            vec![server.into(), slab_id.into(), limit.into()],
            None,
            dump,
            callback,
        );
    }

    /// Closes the connection pool; nothing to close here
    pub fn end(&self) {
        debug!("end");
    }
}
