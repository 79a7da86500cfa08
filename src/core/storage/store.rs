// src/core/storage/store.rs

//! The key → value-record mapping with TTL-driven lazy eviction.
//!
//! There is no eager expiry sweep: an expired record is removed the first
//! time any accessor touches it, so every operation takes the request
//! timestamp and never observes a stale value.

use super::data_types::{DataValue, StoredValue, ValueKind};
use super::stream::Stream;
use crate::core::CitrineError;
use bytes::Bytes;
use std::collections::HashMap;

/// The in-memory store. Owned by a single logical actor; all mutation
/// happens inside non-yielding critical sections of the dispatcher task.
#[derive(Debug, Default)]
pub struct Store {
    entries: HashMap<Bytes, StoredValue>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops the entry if it is expired at `now_ms`.
    fn evict_if_expired(&mut self, key: &[u8], now_ms: u64) {
        if self
            .entries
            .get(key)
            .is_some_and(|entry| entry.is_expired(now_ms))
        {
            self.entries.remove(key);
        }
    }

    /// Looks up a record. An expired record is deleted and reported as absent.
    pub fn get(&mut self, key: &[u8], now_ms: u64) -> Option<&StoredValue> {
        self.evict_if_expired(key, now_ms);
        self.entries.get(key)
    }

    /// Writes a string record. With `ttl_ms`, the deadline is `now + ttl`.
    pub fn set(&mut self, key: Bytes, value: Bytes, now_ms: u64, ttl_ms: Option<u64>) {
        let expires_at_ms = ttl_ms.map(|ttl| now_ms.saturating_add(ttl));
        self.entries
            .insert(key, StoredValue::new(DataValue::String(value), expires_at_ms));
    }

    /// Increments the integer stored at `key`, creating it as `"1"` when
    /// absent. The stored payload is always the ascii re-encoding of the new
    /// value.
    pub fn incr(&mut self, key: &Bytes, now_ms: u64) -> Result<i64, CitrineError> {
        self.evict_if_expired(key, now_ms);
        match self.entries.get_mut(key) {
            None => {
                self.entries.insert(
                    key.clone(),
                    StoredValue::no_expiry(DataValue::String(Bytes::from_static(b"1"))),
                );
                Ok(1)
            }
            Some(entry) => match &mut entry.data {
                DataValue::String(s) => {
                    let current: i64 = std::str::from_utf8(s)
                        .map_err(|_| CitrineError::NotAnInteger)?
                        .parse()
                        .map_err(|_| CitrineError::NotAnInteger)?;
                    let next = current.checked_add(1).ok_or(CitrineError::NotAnInteger)?;
                    *s = Bytes::from(next.to_string());
                    Ok(next)
                }
                DataValue::Stream(_) => Err(CitrineError::WrongType),
            },
        }
    }

    /// Returns the kind tag for `key`, evicting it first if expired.
    pub fn kind_of(&mut self, key: &[u8], now_ms: u64) -> ValueKind {
        self.evict_if_expired(key, now_ms);
        self.entries
            .get(key)
            .map(StoredValue::kind)
            .unwrap_or(ValueKind::None)
    }

    /// Returns the stream stored at `key`, or `None` when the key is absent.
    /// A key holding a string is a wrong-kind error.
    pub fn get_stream(&mut self, key: &[u8], now_ms: u64) -> Result<Option<&Stream>, CitrineError> {
        match self.get(key, now_ms) {
            None => Ok(None),
            Some(entry) => match &entry.data {
                DataValue::Stream(stream) => Ok(Some(stream)),
                DataValue::String(_) => Err(CitrineError::WrongType),
            },
        }
    }

    /// Returns the stream stored at `key`, creating an empty one when absent.
    /// Streams carry no expiry; their lifetime is the lifetime of the key.
    pub fn get_or_create_stream(
        &mut self,
        key: &Bytes,
        now_ms: u64,
    ) -> Result<&mut Stream, CitrineError> {
        self.evict_if_expired(key, now_ms);
        let entry = self
            .entries
            .entry(key.clone())
            .or_insert_with(|| StoredValue::no_expiry(DataValue::Stream(Stream::new())));
        match &mut entry.data {
            DataValue::Stream(stream) => Ok(stream),
            DataValue::String(_) => Err(CitrineError::WrongType),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a key is present, without touching expiry state.
    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.entries.contains_key(key)
    }
}
