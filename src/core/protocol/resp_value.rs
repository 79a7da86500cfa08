// src/core/protocol/resp_value.rs

//! Defines the reply-side value type produced by command execution, and its
//! serializer.

use super::RespFrame;
use bytes::{BufMut, Bytes, BytesMut};

/// `RespValue` is the value a command handler produces.
///
/// It is a simplified sibling of `RespFrame`: the command layer only ever
/// *emits* values, so it carries two encode-only forms the parser never
/// yields — `Map`, the bulk-string-encoded mapping used by `INFO`, and
/// `Verbatim`, an already-encoded frame spliced into the output as-is (an
/// array of `Verbatim`s is how `EXEC` returns its pre-encoded replies under
/// a single array header).
#[derive(Debug, Clone, PartialEq)]
pub enum RespValue {
    SimpleString(String),
    BulkString(Bytes),
    Integer(i64),
    Array(Vec<RespValue>),
    Null,
    NullArray,
    Error(String),
    /// An ordered mapping, encoded as one bulk string whose payload is
    /// `k1:v1\r\nk2:v2` with no trailing CRLF inside the payload.
    Map(Vec<(String, String)>),
    /// A pre-encoded frame, emitted byte-for-byte.
    Verbatim(Bytes),
}

impl RespValue {
    /// Serializes the value into `dst`.
    pub fn encode(&self, dst: &mut BytesMut) {
        let mut itoa_buf = itoa::Buffer::new();
        match self {
            RespValue::SimpleString(s) => {
                dst.put_u8(b'+');
                dst.extend_from_slice(s.as_bytes());
                dst.extend_from_slice(b"\r\n");
            }
            RespValue::Error(s) => {
                dst.put_u8(b'-');
                dst.extend_from_slice(s.as_bytes());
                dst.extend_from_slice(b"\r\n");
            }
            RespValue::Integer(i) => {
                dst.put_u8(b':');
                dst.extend_from_slice(itoa_buf.format(*i).as_bytes());
                dst.extend_from_slice(b"\r\n");
            }
            RespValue::BulkString(b) => encode_bulk(dst, b),
            RespValue::Null => dst.extend_from_slice(b"$-1\r\n"),
            RespValue::NullArray => dst.extend_from_slice(b"*-1\r\n"),
            RespValue::Array(items) => {
                dst.put_u8(b'*');
                dst.extend_from_slice(itoa_buf.format(items.len()).as_bytes());
                dst.extend_from_slice(b"\r\n");
                for item in items {
                    item.encode(dst);
                }
            }
            RespValue::Map(pairs) => {
                // The outer bulk framing supplies the final CRLF; lines inside
                // the payload are only *separated* by CRLF.
                let mut payload = BytesMut::new();
                for (i, (k, v)) in pairs.iter().enumerate() {
                    if i > 0 {
                        payload.extend_from_slice(b"\r\n");
                    }
                    payload.extend_from_slice(k.as_bytes());
                    payload.put_u8(b':');
                    payload.extend_from_slice(v.as_bytes());
                }
                encode_bulk(dst, &payload);
            }
            RespValue::Verbatim(raw) => dst.extend_from_slice(raw),
        }
    }

    /// Serializes the value into a fresh byte vector.
    pub fn encode_to_vec(&self) -> Vec<u8> {
        let mut buf = BytesMut::new();
        self.encode(&mut buf);
        buf.to_vec()
    }

    /// Serializes the value into a frozen `Bytes`.
    pub fn encode_to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::new();
        self.encode(&mut buf);
        buf.freeze()
    }
}

fn encode_bulk(dst: &mut BytesMut, payload: &[u8]) {
    let mut itoa_buf = itoa::Buffer::new();
    dst.put_u8(b'$');
    dst.extend_from_slice(itoa_buf.format(payload.len()).as_bytes());
    dst.extend_from_slice(b"\r\n");
    dst.extend_from_slice(payload);
    dst.extend_from_slice(b"\r\n");
}

/// Conversion from a parsed frame, used when echoing parsed data back through
/// the reply path and by round-trip tests.
impl From<RespFrame> for RespValue {
    fn from(frame: RespFrame) -> Self {
        match frame {
            RespFrame::SimpleString(s) => RespValue::SimpleString(s),
            RespFrame::Error(s) => RespValue::Error(s),
            RespFrame::Integer(i) => RespValue::Integer(i),
            RespFrame::BulkString(b) => RespValue::BulkString(b),
            RespFrame::Null => RespValue::Null,
            RespFrame::NullArray => RespValue::NullArray,
            RespFrame::Array(items) => {
                RespValue::Array(items.into_iter().map(Into::into).collect())
            }
        }
    }
}
