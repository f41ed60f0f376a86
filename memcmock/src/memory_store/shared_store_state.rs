use crate::cache::cache::{CasToken, Entry};
use crate::cache::expiration;
use crate::cache::timer::Timer;
use std::sync::atomic::Ordering;
use std::sync::{atomic::AtomicU64, Arc};

pub struct SharedStoreState {
    timer: Arc<dyn Timer + Send + Sync>,
    cas_id: AtomicU64,
}

impl SharedStoreState {
    pub fn new(timer: Arc<dyn Timer + Send + Sync>) -> SharedStoreState {
        SharedStoreState {
            timer,
            cas_id: AtomicU64::new(1),
        }
    }

    /// Issues a token strictly greater than every token issued before
    pub fn get_cas_id(&self) -> CasToken {
        CasToken::new(self.cas_id.fetch_add(1, Ordering::AcqRel) + 1)
    }

    pub fn timestamp_millis(&self) -> u64 {
        self.timer.timestamp_millis()
    }

    pub fn check_if_expired(&self, entry: &Entry, now_millis: u64) -> bool {
        expiration::is_expired(entry, now_millis)
    }
}
