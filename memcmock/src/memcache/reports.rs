//! Aggregate reports, one record per configured server label.
//!
//! Payloads are the static figures of an idle memcached 1.4.20; only
//! `stats.time`, `items` and `cachedump` depend on the store.

use crate::cache::cache::{Entry, KeyType};
use crate::version::{
    EMULATED_SERVER_BUGFIX, EMULATED_SERVER_MAJOR, EMULATED_SERVER_MINOR,
    EMULATED_SERVER_VERSION,
};
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VersionInfo {
    pub server: String,
    pub version: &'static str,
    pub major: &'static str,
    pub minor: &'static str,
    pub bugfix: &'static str,
}

pub fn version(servers: &[String]) -> Vec<VersionInfo> {
    servers
        .iter()
        .map(|server| VersionInfo {
            server: server.clone(),
            version: EMULATED_SERVER_VERSION,
            major: EMULATED_SERVER_MAJOR,
            minor: EMULATED_SERVER_MINOR,
            bugfix: EMULATED_SERVER_BUGFIX,
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StatsInfo {
    pub pid: u32,
    pub uptime: u64,
    /// current unix time in seconds
    pub time: u64,
    pub version: &'static str,
    pub libevent: &'static str,
    pub pointer_size: u32,
    pub rusage_user: &'static str,
    pub rusage_system: &'static str,
    pub curr_connections: u32,
    pub total_connections: u32,
    pub connection_structures: u32,
    pub reserved_fds: u32,
    pub cmd_get: u64,
    pub cmd_set: u64,
    pub cmd_flush: u64,
    pub cmd_touch: u64,
    pub get_hits: u64,
    pub get_misses: u64,
    pub delete_misses: u64,
    pub delete_hits: u64,
    pub incr_misses: u64,
    pub incr_hits: u64,
    pub decr_misses: u64,
    pub decr_hits: u64,
    pub cas_misses: u64,
    pub cas_hits: u64,
    pub cas_badval: u64,
    pub touch_hits: u64,
    pub touch_misses: u64,
    pub auth_cmds: u64,
    pub auth_errors: u64,
    pub bytes_read: u64,
    pub bytes_written: u64,
    pub limit_maxbytes: u64,
    pub accepting_conns: u32,
    pub listen_disabled_num: u32,
    pub threads: u32,
    pub conn_yields: u32,
    pub hash_power_level: u32,
    pub hash_bytes: u64,
    pub hash_is_expanding: u32,
    pub malloc_fails: u32,
    pub bytes: u64,
    pub curr_items: u64,
    pub total_items: u64,
    pub expired_unfetched: u64,
    pub evicted_unfetched: u64,
    pub evictions: u64,
    pub reclaimed: u64,
    pub crawler_reclaimed: u64,
}

impl StatsInfo {
    fn at(time: u64) -> StatsInfo {
        StatsInfo {
            pid: 1,
            uptime: 1,
            time,
            version: EMULATED_SERVER_VERSION,
            libevent: "2.0.22-stable",
            pointer_size: 64,
            rusage_user: "0.0",
            rusage_system: "0.0",
            curr_connections: 1,
            total_connections: 1,
            connection_structures: 1,
            reserved_fds: 0,
            cmd_get: 0,
            cmd_set: 0,
            cmd_flush: 0,
            cmd_touch: 0,
            get_hits: 0,
            get_misses: 0,
            delete_misses: 0,
            delete_hits: 0,
            incr_misses: 0,
            incr_hits: 0,
            decr_misses: 0,
            decr_hits: 0,
            cas_misses: 0,
            cas_hits: 0,
            cas_badval: 0,
            touch_hits: 0,
            touch_misses: 0,
            auth_cmds: 0,
            auth_errors: 0,
            bytes_read: 1,
            bytes_written: 1,
            limit_maxbytes: 67_108_864,
            accepting_conns: 1,
            listen_disabled_num: 0,
            threads: 4,
            conn_yields: 0,
            hash_power_level: 16,
            hash_bytes: 524_288,
            hash_is_expanding: 0,
            malloc_fails: 0,
            bytes: 0,
            curr_items: 0,
            total_items: 0,
            expired_unfetched: 0,
            evicted_unfetched: 0,
            evictions: 0,
            reclaimed: 0,
            crawler_reclaimed: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ServerStats {
    pub server: String,
    #[serde(flatten)]
    pub info: StatsInfo,
}

pub fn stats(servers: &[String], now_millis: u64) -> Vec<ServerStats> {
    let time = (now_millis as f64 / 1000.0).round() as u64;
    servers
        .iter()
        .map(|server| ServerStats {
            server: server.clone(),
            info: StatsInfo::at(time),
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SettingsInfo {
    pub maxbytes: u64,
    pub maxconns: u32,
    pub tcpport: u16,
    pub udpport: u16,
    pub inter: &'static str,
    pub verbosity: u32,
    pub oldest: u64,
    pub evictions: &'static str,
    pub domain_socket: &'static str,
    pub umask: u32,
    pub growth_factor: &'static str,
    pub chunk_size: u32,
    pub num_threads: u32,
    pub num_threads_per_udp: u32,
    pub stat_key_prefix: &'static str,
    pub detail_enabled: &'static str,
    pub reqs_per_event: u32,
    pub cas_enabled: &'static str,
    pub tcp_backlog: u32,
    pub binding_protocol: &'static str,
    pub auth_enabled_sasl: &'static str,
    pub item_size_max: u64,
    pub maxconns_fast: &'static str,
    pub hashpower_init: u32,
    pub slab_reassign: &'static str,
    pub slab_automove: u32,
    pub lru_crawler: &'static str,
    pub lru_crawler_sleep: u32,
    pub lru_crawler_tocrawl: u32,
    pub tail_repair_time: u32,
    pub flush_enabled: &'static str,
    pub hash_algorithm: &'static str,
}

impl Default for SettingsInfo {
    fn default() -> Self {
        SettingsInfo {
            maxbytes: 67_108_864,
            maxconns: 1024,
            tcpport: 11211,
            udpport: 11211,
            inter: "NULL",
            verbosity: 0,
            oldest: 13_516,
            evictions: "on",
            domain_socket: "NULL",
            umask: 700,
            growth_factor: "1.25",
            chunk_size: 48,
            num_threads: 4,
            num_threads_per_udp: 4,
            stat_key_prefix: ":",
            detail_enabled: "no",
            reqs_per_event: 20,
            cas_enabled: "yes",
            tcp_backlog: 1024,
            binding_protocol: "auto-negotiate",
            auth_enabled_sasl: "no",
            item_size_max: 1_048_576,
            maxconns_fast: "no",
            hashpower_init: 0,
            slab_reassign: "no",
            slab_automove: 0,
            lru_crawler: "no",
            lru_crawler_sleep: 100,
            lru_crawler_tocrawl: 0,
            tail_repair_time: 0,
            flush_enabled: "yes",
            hash_algorithm: "jenkins",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ServerSettings {
    pub server: String,
    #[serde(flatten)]
    pub info: SettingsInfo,
}

/// Settings of every server, `item_size_max` comes from the client's
/// configured max value size
pub fn settings(servers: &[String], item_size_max: u64) -> Vec<ServerSettings> {
    servers
        .iter()
        .map(|server| ServerSettings {
            server: server.clone(),
            info: SettingsInfo {
                item_size_max,
                ..SettingsInfo::default()
            },
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SlabInfo {
    pub chunk_size: u32,
    pub chunks_per_page: u32,
    pub total_pages: u32,
    pub total_chunks: u32,
    pub used_chunks: u32,
    pub free_chunks: u32,
    pub free_chunks_end: u32,
    pub mem_requested: u64,
    pub get_hits: u64,
    pub cmd_set: u64,
    pub delete_hits: u64,
    pub incr_hits: u64,
    pub decr_hits: u64,
    pub cas_hits: u64,
    pub cas_badval: u64,
    pub touch_hits: u64,
}

impl Default for SlabInfo {
    fn default() -> Self {
        SlabInfo {
            chunk_size: 96,
            chunks_per_page: 10_922,
            total_pages: 1,
            total_chunks: 10_922,
            used_chunks: 0,
            free_chunks: 10_922,
            free_chunks_end: 0,
            mem_requested: 0,
            get_hits: 0,
            cmd_set: 0,
            delete_hits: 0,
            incr_hits: 0,
            decr_hits: 0,
            cas_hits: 0,
            cas_badval: 0,
            touch_hits: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ServerSlabs {
    pub server: String,
    /// slab class id to slab figures
    #[serde(flatten)]
    pub slabs: BTreeMap<String, SlabInfo>,
    pub active_slabs: u32,
    pub total_malloced: u64,
}

pub fn slabs(servers: &[String]) -> Vec<ServerSlabs> {
    servers
        .iter()
        .map(|server| ServerSlabs {
            server: server.clone(),
            slabs: BTreeMap::from([(String::from("1"), SlabInfo::default())]),
            active_slabs: 1,
            total_malloced: 1_048_512,
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ItemsInfo {
    pub number: usize,
    pub age: u64,
    pub evicted: u64,
    pub evicted_nonzero: u64,
    pub evicted_time: u64,
    pub outofmemory: u64,
    pub tailrepairs: u64,
    pub reclaimed: u64,
    pub expired_unfetched: u64,
    pub evicted_unfetched: u64,
    pub crawler_reclaimed: u64,
}

impl ItemsInfo {
    fn with_number(number: usize) -> ItemsInfo {
        ItemsInfo {
            number,
            age: 1,
            evicted: 0,
            evicted_nonzero: 0,
            evicted_time: 0,
            outofmemory: 0,
            tailrepairs: 0,
            reclaimed: 0,
            expired_unfetched: 0,
            evicted_unfetched: 0,
            crawler_reclaimed: 0,
        }
    }
}

/// Items of one server; empty, without the server label, when the store
/// holds nothing
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ServerItems {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
    #[serde(flatten)]
    pub slabs: BTreeMap<String, ItemsInfo>,
}

impl ServerItems {
    pub fn is_empty(&self) -> bool {
        self.server.is_none() && self.slabs.is_empty()
    }
}

pub fn items(servers: &[String], number: usize) -> Vec<ServerItems> {
    servers
        .iter()
        .map(|server| {
            if number == 0 {
                ServerItems {
                    server: None,
                    slabs: BTreeMap::new(),
                }
            } else {
                ServerItems {
                    server: Some(server.clone()),
                    slabs: BTreeMap::from([(String::from("1"), ItemsInfo::with_number(number))]),
                }
            }
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DumpItem {
    pub key: KeyType,
    /// byte length of the textual value
    #[serde(rename = "b")]
    pub size: usize,
    /// expiry in unix seconds, 0 for entries that never expire
    #[serde(rename = "s")]
    pub expires: u64,
}

impl DumpItem {
    fn from_entry(key: KeyType, entry: &Entry) -> DumpItem {
        DumpItem {
            key,
            size: entry.value().len(),
            expires: (entry.expires_at() as f64 / 1000.0).round() as u64,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CacheDump {
    Empty,
    Single(DumpItem),
    Multiple(Vec<DumpItem>),
}

pub fn cachedump(entries: Vec<(KeyType, Entry)>) -> CacheDump {
    let mut items: Vec<DumpItem> = entries
        .into_iter()
        .map(|(key, entry)| DumpItem::from_entry(key, &entry))
        .collect();
    match items.len() {
        0 => CacheDump::Empty,
        1 => CacheDump::Single(items.remove(0)),
        _ => CacheDump::Multiple(items),
    }
}
