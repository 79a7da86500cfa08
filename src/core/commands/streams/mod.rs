// src/core/commands/streams/mod.rs

pub mod xadd;
pub mod xrange;
pub mod xread;

pub use xadd::XAdd;
pub use xrange::XRange;
pub use xread::XRead;

use crate::core::RespValue;
use crate::core::storage::StreamEntry;

/// Encodes one stream entry as `[id, [field, value, ...]]`, the shape shared
/// by `XRANGE` and `XREAD` replies.
pub(crate) fn encode_entry(entry: &StreamEntry) -> RespValue {
    let mut flat = Vec::with_capacity(entry.fields.len() * 2);
    for (field, value) in &entry.fields {
        flat.push(RespValue::BulkString(field.clone()));
        flat.push(RespValue::BulkString(value.clone()));
    }
    RespValue::Array(vec![
        RespValue::BulkString(entry.id.to_string().into()),
        RespValue::Array(flat),
    ])
}
