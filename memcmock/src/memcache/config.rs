//! Client configuration.
//!
//! Options are merged over the defaults once, at construction. Only
//! `max_expiration` changes command behavior; the remaining fields are kept
//! so code written against a real client can pass its usual options.

const MAX_KEY_SIZE: usize = 250;
const MAX_EXPIRATION: u64 = 2_592_000;
const MAX_VALUE: u64 = 1_048_576;
const POOL_SIZE: u32 = 10;
const ALGORITHM: &str = "md5";
const RECONNECT: u64 = 18_000_000;
const TIMEOUT: u64 = 5_000;
const RETRIES: u32 = 5;
const FAILURES: u32 = 5;
const RETRY: u64 = 30_000;
const IDLE: u64 = 5_000;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientConfig {
    pub max_key_size: usize,
    /// TTLs above this many seconds are absolute unix times
    pub max_expiration: u64,
    pub max_value: u64,
    pub pool_size: u32,
    pub algorithm: String,
    pub reconnect: u64,
    pub timeout: u64,
    pub retries: u32,
    pub failures: u32,
    pub retry: u64,
    pub remove: bool,
    pub key_compression: bool,
    pub idle: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            max_key_size: MAX_KEY_SIZE,
            max_expiration: MAX_EXPIRATION,
            max_value: MAX_VALUE,
            pool_size: POOL_SIZE,
            algorithm: String::from(ALGORITHM),
            reconnect: RECONNECT,
            timeout: TIMEOUT,
            retries: RETRIES,
            failures: FAILURES,
            retry: RETRY,
            remove: false,
            key_compression: true,
            idle: IDLE,
        }
    }
}

impl ClientConfig {
    pub fn with_max_expiration(mut self, max_expiration: u64) -> Self {
        self.max_expiration = max_expiration;
        self
    }

    pub fn with_max_key_size(mut self, max_key_size: usize) -> Self {
        self.max_key_size = max_key_size;
        self
    }

    pub fn with_max_value(mut self, max_value: u64) -> Self {
        self.max_value = max_value;
        self
    }

    pub fn with_pool_size(mut self, pool_size: u32) -> Self {
        self.pool_size = pool_size;
        self
    }

    pub fn with_timeout(mut self, timeout: u64) -> Self {
        self.timeout = timeout;
        self
    }
}
