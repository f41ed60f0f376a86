use crate::cache::timer::ManualTimer;
use crate::memcache::client::Memcached;
use crate::memcache::config::ClientConfig;
use crate::memcache::store::MemcStore;
use crate::memory_store::dash_map_store::EntryStore;
use std::sync::Arc;

/// Fixed starting time of every mock timer
pub const NOW: u64 = 1_700_000_000_000;

pub struct MockServer {
    pub timer: Arc<ManualTimer>,
    pub storage: MemcStore,
}

impl MockServer {
    pub fn new(store: Arc<EntryStore>, timer: Arc<ManualTimer>, max_expiration: u64) -> Self {
        MockServer {
            timer,
            storage: MemcStore::new(store, max_expiration),
        }
    }
}

pub fn create_mock_server() -> MockServer {
    let timer = Arc::new(ManualTimer::new(NOW));
    let config = ClientConfig::default();
    MockServer::new(
        Arc::new(EntryStore::new(timer.clone())),
        timer,
        config.max_expiration,
    )
}

pub struct ClientWithTimer {
    pub timer: Arc<ManualTimer>,
    pub client: Memcached,
}

pub fn create_mock_client() -> ClientWithTimer {
    let timer = Arc::new(ManualTimer::new(NOW));
    let client = Memcached::with_timer(
        ["127.0.0.1:11211"],
        ClientConfig::default(),
        timer.clone(),
    );
    ClientWithTimer { timer, client }
}
