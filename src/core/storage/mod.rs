// src/core/storage/mod.rs

pub mod data_types;
pub mod store;
pub mod stream;

pub use data_types::{DataValue, StoredValue, ValueKind};
pub use store::Store;
pub use stream::{IdSpec, Stream, StreamEntry, StreamId};
