// src/core/stream_blocking.rs

//! Manages clients that are blocked waiting for data on one or more streams,
//! for the `XREAD` command with the `BLOCK` option.
//!
//! Wakers must be registered *before* the store lock is released and removed
//! once the wait resolves, whichever way it resolves. Each waker is
//! take-once and reports which stream fired, so a woken reader re-runs its
//! tail read only against the signalled streams.

use bytes::Bytes;
use dashmap::DashMap;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;
use tracing::debug;

/// A waker carries the name of the stream that satisfied it.
type Waker = oneshot::Sender<Bytes>;

/// A shareable waker. The `Option` allows it to be `take()`-n, ensuring it
/// fires at most once even when registered under several keys.
pub type SharedWaker = Arc<Mutex<Option<Waker>>>;

/// Holds information about a waiting client, including its session ID so the
/// connection teardown path can clean up after an abandoned wait.
#[derive(Debug)]
struct WaiterInfo {
    session_id: u64,
    waker: SharedWaker,
}

/// A registration ticket for one blocking call: the wakers to deregister and
/// the receivers to await.
pub struct Registration {
    pub wakers: Vec<(Bytes, SharedWaker)>,
    pub receivers: Vec<oneshot::Receiver<Bytes>>,
}

/// All clients currently blocked on stream tails, keyed by stream name.
#[derive(Debug, Default)]
pub struct StreamWaiterRegistry {
    waiters: DashMap<Bytes, VecDeque<WaiterInfo>>,
}

impl StreamWaiterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one waker per key for a single blocking call. The caller
    /// must still hold the store lock so no append can slip between its
    /// empty tail read and this registration.
    pub fn register(&self, keys: &[Bytes], session_id: u64) -> Registration {
        let mut wakers = Vec::with_capacity(keys.len());
        let mut receivers = Vec::with_capacity(keys.len());
        for key in keys {
            let (tx, rx) = oneshot::channel();
            let shared: SharedWaker = Arc::new(Mutex::new(Some(tx)));
            self.waiters
                .entry(key.clone())
                .or_default()
                .push_back(WaiterInfo {
                    session_id,
                    waker: shared.clone(),
                });
            wakers.push((key.clone(), shared));
            receivers.push(rx);
        }
        debug!("Session {}: blocked on {} stream(s)", session_id, keys.len());
        Registration { wakers, receivers }
    }

    /// Wakes every client waiting on `key`. Called on each successful append.
    pub fn notify(&self, key: &Bytes) {
        if let Some(mut queue) = self.waiters.get_mut(key) {
            while let Some(info) = queue.pop_front() {
                if let Ok(mut guard) = info.waker.lock()
                    && let Some(waker) = guard.take()
                {
                    let _ = waker.send(key.clone());
                }
            }
        }
    }

    /// Deregisters the wakers of one blocking call, used or not. Mandatory
    /// on timeout and on satisfaction by a subset of the watched streams.
    pub fn remove(&self, registration: &Registration) {
        for (key, waker) in &registration.wakers {
            if let Some(mut queue) = self.waiters.get_mut(key) {
                queue.retain(|info| !Arc::ptr_eq(&info.waker, waker));
                if queue.is_empty() {
                    drop(queue);
                    self.waiters.remove(key);
                }
            }
        }
    }

    /// Removes every waker belonging to a session. Called when a client
    /// connection closes to prevent dangling wakers.
    pub fn remove_session(&self, session_id: u64) {
        self.waiters.iter_mut().for_each(|mut queue| {
            queue.retain(|info| info.session_id != session_id);
        });
        self.waiters.retain(|_, queue| !queue.is_empty());
    }

    #[cfg(test)]
    pub fn waiter_count(&self, key: &Bytes) -> usize {
        self.waiters.get(key).map(|q| q.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn notify_fires_each_waker_once_with_the_stream_name() {
        let registry = StreamWaiterRegistry::new();
        let key = Bytes::from_static(b"events");
        let mut registration = registry.register(std::slice::from_ref(&key), 7);

        registry.notify(&key);
        let fired = registration.receivers.pop().unwrap().await.unwrap();
        assert_eq!(fired, key);
        // The queue is drained; a second notify has nobody to wake.
        assert_eq!(registry.waiter_count(&key), 0);
    }

    #[tokio::test]
    async fn remove_cancels_outstanding_waits() {
        let registry = StreamWaiterRegistry::new();
        let keys = [Bytes::from_static(b"a"), Bytes::from_static(b"b")];
        let registration = registry.register(&keys, 1);
        registry.remove(&registration);
        assert_eq!(registry.waiter_count(&keys[0]), 0);
        assert_eq!(registry.waiter_count(&keys[1]), 0);
    }

    #[tokio::test]
    async fn session_teardown_clears_only_that_session() {
        let registry = StreamWaiterRegistry::new();
        let key = Bytes::from_static(b"s");
        let _keep = registry.register(std::slice::from_ref(&key), 1);
        let _gone = registry.register(std::slice::from_ref(&key), 2);
        registry.remove_session(2);
        assert_eq!(registry.waiter_count(&key), 1);
    }
}
