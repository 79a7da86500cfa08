// src/core/storage/stream.rs

//! The append-only stream index.
//!
//! Entries are keyed by `(ms, seq)` in a sorted map, which gives ordered
//! range scans and O(log n) bound lookups; the map's ordered iteration is
//! the sibling chain over entries in append order. IDs are compared as the
//! numeric pair, never as text.

use crate::core::CitrineError;
use bytes::Bytes;
use indexmap::IndexMap;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Bound;
use std::str::FromStr;

// --- Stream ID ---

/// A stream entry ID: millisecond timestamp plus per-millisecond sequence.
/// Total ordering is lexicographic on the pair, which the derived `Ord`
/// provides through field order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct StreamId {
    pub ms: u64,
    pub seq: u32,
}

impl StreamId {
    pub const ZERO: StreamId = StreamId { ms: 0, seq: 0 };
    pub const MAX: StreamId = StreamId {
        ms: u64::MAX,
        seq: u32::MAX,
    };

    pub fn new(ms: u64, seq: u32) -> Self {
        Self { ms, seq }
    }

    /// Parses `<ms>` or `<ms>-<seq>`, filling a missing sequence with
    /// `default_seq`. This is the half-ID rule for range bounds.
    pub fn parse_with_default_seq(s: &str, default_seq: u32) -> Result<Self, CitrineError> {
        match s.split_once('-') {
            Some((ms, seq)) => {
                let ms = ms.parse().map_err(|_| CitrineError::InvalidStreamId)?;
                let seq = seq.parse().map_err(|_| CitrineError::InvalidStreamId)?;
                Ok(StreamId::new(ms, seq))
            }
            None => {
                let ms = s.parse().map_err(|_| CitrineError::InvalidStreamId)?;
                Ok(StreamId::new(ms, default_seq))
            }
        }
    }
}

impl FromStr for StreamId {
    type Err = CitrineError;

    /// Parses the exact `<ms>-<seq>` wire form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (ms, seq) = s.split_once('-').ok_or(CitrineError::InvalidStreamId)?;
        let ms = ms.parse().map_err(|_| CitrineError::InvalidStreamId)?;
        let seq = seq.parse().map_err(|_| CitrineError::InvalidStreamId)?;
        Ok(StreamId::new(ms, seq))
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.ms, self.seq)
    }
}

/// An `XADD` ID argument: fully explicit, sequence-wildcarded, or fully
/// server-assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdSpec {
    /// `*` — assign both halves server-side from the request clock.
    Auto,
    /// `<ms>-*` — assign the sequence within the given millisecond.
    AutoSeq(u64),
    /// `<ms>-<seq>` — use exactly this ID.
    Exact(StreamId),
}

impl FromStr for IdSpec {
    type Err = CitrineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "*" {
            return Ok(IdSpec::Auto);
        }
        match s.split_once('-') {
            Some((ms, "*")) => {
                let ms = ms.parse().map_err(|_| CitrineError::InvalidStreamId)?;
                Ok(IdSpec::AutoSeq(ms))
            }
            _ => Ok(IdSpec::Exact(s.parse()?)),
        }
    }
}

// --- Stream Entry ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamEntry {
    pub id: StreamId,
    /// Insertion-ordered field/value pairs.
    pub fields: IndexMap<Bytes, Bytes>,
}

// --- Main Stream Struct ---

/// An append-only, strictly ID-ordered sequence of entries.
#[derive(Debug, Clone, Default)]
pub struct Stream {
    entries: BTreeMap<StreamId, StreamEntry>,
    last_id: StreamId,
}

impl Stream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry, resolving wildcard ID components against the
    /// request clock and the stream's current state.
    ///
    /// The resolved ID must be strictly greater than both `0-0` and the
    /// current maximum; `0-0` itself is never admitted.
    pub fn append(
        &mut self,
        id_spec: IdSpec,
        fields: IndexMap<Bytes, Bytes>,
        now_ms: u64,
    ) -> Result<StreamId, CitrineError> {
        let id = match id_spec {
            IdSpec::Auto => StreamId::new(now_ms, self.next_seq_for(now_ms)),
            IdSpec::AutoSeq(ms) => StreamId::new(ms, self.next_seq_for(ms)),
            IdSpec::Exact(id) => id,
        };

        if id == StreamId::ZERO {
            return Err(CitrineError::StreamIdTooSmall);
        }
        if id <= self.last_id {
            return Err(CitrineError::StreamIdNotMonotonic);
        }

        self.entries.insert(id, StreamEntry { id, fields });
        self.last_id = id;
        Ok(id)
    }

    /// The next sequence for `ms`: one past the last sequence used at that
    /// millisecond, or the floor for a fresh millisecond (`1` at ms 0, since
    /// `0-0` is unrepresentable; `0` otherwise).
    fn next_seq_for(&self, ms: u64) -> u32 {
        match self.last_seq_at(ms) {
            Some(seq) => seq.saturating_add(1),
            None if ms == 0 => 1,
            None => 0,
        }
    }

    fn last_seq_at(&self, ms: u64) -> Option<u32> {
        self.entries
            .range(StreamId::new(ms, 0)..=StreamId::new(ms, u32::MAX))
            .next_back()
            .map(|(id, _)| id.seq)
    }

    /// Inclusive range scan in ascending ID order.
    pub fn range(&self, start: StreamId, end: StreamId) -> Vec<&StreamEntry> {
        self.entries
            .range(start..=end)
            .map(|(_, entry)| entry)
            .collect()
    }

    /// Everything strictly after `after`, in ascending ID order. This is the
    /// tail read backing `XREAD`.
    pub fn entries_after(&self, after: StreamId) -> Vec<&StreamEntry> {
        self.entries
            .range((Bound::Excluded(after), Bound::Unbounded))
            .map(|(_, entry)| entry)
            .collect()
    }

    /// The maximum ID currently in the stream (`0-0` when empty).
    pub fn last_id(&self) -> StreamId {
        self.last_id
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> IndexMap<Bytes, Bytes> {
        let mut map = IndexMap::new();
        map.insert(Bytes::from_static(b"k"), Bytes::from_static(b"v"));
        map
    }

    #[test]
    fn wildcard_seq_floors() {
        let mut stream = Stream::new();
        // 0-* on an empty stream skips the unrepresentable 0-0.
        assert_eq!(stream.append(IdSpec::AutoSeq(0), fields(), 5).unwrap(), StreamId::new(0, 1));
        assert_eq!(stream.append(IdSpec::AutoSeq(1), fields(), 5).unwrap(), StreamId::new(1, 0));
        assert_eq!(stream.append(IdSpec::AutoSeq(1), fields(), 5).unwrap(), StreamId::new(1, 1));
    }

    #[test]
    fn ids_are_strictly_monotonic() {
        let mut stream = Stream::new();
        stream.append(IdSpec::Exact(StreamId::new(5, 5)), fields(), 0).unwrap();
        let err = stream
            .append(IdSpec::Exact(StreamId::new(5, 5)), fields(), 0)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "ERR The ID specified in XADD is equal or smaller than the target stream top item"
        );
        let err = stream
            .append(IdSpec::Exact(StreamId::ZERO), fields(), 0)
            .unwrap_err();
        assert_eq!(err.to_string(), "ERR The ID specified in XADD must be greater than 0-0");
    }

    #[test]
    fn range_is_inclusive_and_ordered() {
        let mut stream = Stream::new();
        for seq in 1..=4 {
            stream.append(IdSpec::Exact(StreamId::new(1, seq)), fields(), 0).unwrap();
        }
        let got: Vec<StreamId> = stream
            .range(StreamId::new(1, 2), StreamId::new(1, 3))
            .iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(got, vec![StreamId::new(1, 2), StreamId::new(1, 3)]);
    }

    #[test]
    fn entries_after_is_exclusive() {
        let mut stream = Stream::new();
        stream.append(IdSpec::Exact(StreamId::new(1, 1)), fields(), 0).unwrap();
        stream.append(IdSpec::Exact(StreamId::new(2, 0)), fields(), 0).unwrap();
        let got: Vec<StreamId> = stream
            .entries_after(StreamId::new(1, 1))
            .iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(got, vec![StreamId::new(2, 0)]);
    }
}
