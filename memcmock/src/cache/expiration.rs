//! Expiration policy.
//!
//! TTLs follow the memcached convention: `0` never expires, values up to
//! the configured threshold are relative seconds, anything larger is an
//! absolute unix time in seconds. Eviction is lazy, an expired entry is
//! only removed when a command touches its key.

use super::cache::Entry;

/// Converts a TTL in seconds into an absolute expiry instant in
/// milliseconds, `0` meaning "never".
pub fn normalize(ttl_seconds: i64, threshold_seconds: u64, now_millis: u64) -> u64 {
    if ttl_seconds == 0 {
        return 0;
    }
    if ttl_seconds > 0 && ttl_seconds as u64 > threshold_seconds {
        return (ttl_seconds as u64).saturating_mul(1000);
    }
    let delta = ttl_seconds.unsigned_abs().saturating_mul(1000);
    let expires_at = if ttl_seconds > 0 {
        now_millis.saturating_add(delta)
    } else {
        now_millis.saturating_sub(delta)
    };
    // 0 is reserved for "never"
    expires_at.max(1)
}

pub fn is_expired(entry: &Entry, now_millis: u64) -> bool {
    !entry.never_expires() && entry.expires_at() <= now_millis
}

/// Seconds left before the entry expires, 0 for entries that never do
pub fn remaining_ttl(entry: &Entry, now_millis: u64) -> f64 {
    if entry.never_expires() {
        return 0.0;
    }
    (entry.expires_at() as f64 - now_millis as f64) / 1000.0
}
