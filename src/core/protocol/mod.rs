// src/core/protocol/mod.rs

pub mod resp_frame;
pub mod resp_value;
pub use resp_frame::{DecodedFrame, RespFrame, RespFrameCodec, parse_frame, parse_frames};
pub use resp_value::RespValue;
