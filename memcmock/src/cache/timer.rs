use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Wall clock used for expiration, in unix milliseconds
pub trait Timer {
    fn timestamp_millis(&self) -> u64;

    fn timestamp(&self) -> u64 {
        self.timestamp_millis() / 1000
    }
}

pub trait SetableTimer: Timer {
    fn set(&self, millis: u64);
    fn add_millis(&self, millis: u64);

    fn add_seconds(&self, seconds: u64) {
        self.add_millis(seconds * 1000)
    }
}

#[derive(Default)]
pub struct SystemTimer {}

impl SystemTimer {
    pub fn new() -> Self {
        debug!("Creating system timer");
        SystemTimer {}
    }
}

impl Timer for SystemTimer {
    fn timestamp_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|duration| duration.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Clock that only moves when told to, for driving expiration in tests
pub struct ManualTimer {
    current_time: AtomicU64,
}

impl ManualTimer {
    pub fn new(millis: u64) -> Self {
        ManualTimer {
            current_time: AtomicU64::new(millis),
        }
    }
}

impl Default for ManualTimer {
    /// Starts at the current wall clock time
    fn default() -> Self {
        Self::new(SystemTimer::new().timestamp_millis())
    }
}

impl Timer for ManualTimer {
    fn timestamp_millis(&self) -> u64 {
        self.current_time.load(Ordering::Acquire)
    }
}

impl SetableTimer for ManualTimer {
    fn set(&self, millis: u64) {
        self.current_time.store(millis, Ordering::Release)
    }

    fn add_millis(&self, millis: u64) {
        self.current_time.fetch_add(millis, Ordering::AcqRel);
    }
}
