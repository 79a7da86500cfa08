// src/core/clock.rs

//! Wall-clock time in milliseconds since the Unix epoch.
//!
//! The connection handler stamps every inbound frame exactly once, at read
//! time, and threads that timestamp through dispatch. Expiry comparisons in
//! the store must use the request timestamp, never a fresh reading, so that
//! `SET k v PX t` followed by `GET k` observes a consistent clock.

use std::time::{SystemTime, UNIX_EPOCH};

/// Returns the current Unix time in milliseconds.
pub fn now_unix_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
