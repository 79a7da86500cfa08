// src/core/storage/data_types.rs

//! The tagged union stored under each key, plus its expiry metadata.

use super::stream::Stream;
use bytes::Bytes;

/// The payload half of a value record.
#[derive(Debug, Clone)]
pub enum DataValue {
    String(Bytes),
    Stream(Stream),
}

/// The kind tag surfaced by `TYPE`. `None` is the sentinel for an absent
/// (or expired) key; it is never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    String,
    Stream,
    None,
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::String => "string",
            ValueKind::Stream => "stream",
            ValueKind::None => "none",
        }
    }
}

/// One record in the store: a payload and an optional wall-clock deadline.
#[derive(Debug, Clone)]
pub struct StoredValue {
    pub data: DataValue,
    /// Expiry deadline in ms since the epoch; `None` means no expiry.
    pub expires_at_ms: Option<u64>,
}

impl StoredValue {
    pub fn new(data: DataValue, expires_at_ms: Option<u64>) -> Self {
        Self {
            data,
            expires_at_ms,
        }
    }

    pub fn no_expiry(data: DataValue) -> Self {
        Self::new(data, None)
    }

    /// Whether the record's deadline has passed at the given request time.
    pub fn is_expired(&self, now_ms: u64) -> bool {
        self.expires_at_ms.is_some_and(|deadline| now_ms > deadline)
    }

    pub fn kind(&self) -> ValueKind {
        match &self.data {
            DataValue::String(_) => ValueKind::String,
            DataValue::Stream(_) => ValueKind::Stream,
        }
    }
}
