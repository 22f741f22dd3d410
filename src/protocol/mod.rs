//! Protocol module - wire constants, framing, and frame types.
//!
//! This module implements the text protocol spoken with the robot:
//! - `\x07\x08`-terminated ASCII messages in both directions
//! - Frame buffer for splitting partial reads into messages
//! - Frame struct with text accessors

mod frame;
mod frame_buffer;
mod wire_format;

pub use frame::{build_frame, Frame};
pub use frame_buffer::FrameBuffer;
pub use wire_format::{
    client, commands, limits, parse_integer, CLIENT_KEY, HASH_MOD, SERVER_KEY, TERMINATOR,
};
