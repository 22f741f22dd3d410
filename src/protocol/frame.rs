//! Frame struct with text accessors.
//!
//! Represents one complete protocol message with the terminator stripped.
//! Uses `bytes::Bytes` so frames split off the read buffer without copying.
//!
//! # Example
//!
//! ```
//! use robowire_server::protocol::{build_frame, Frame};
//! use bytes::Bytes;
//!
//! let raw = build_frame("OK 1 2");
//! assert_eq!(&raw[..], b"OK 1 2\x07\x08");
//!
//! let frame = Frame::from_raw(Bytes::from(raw));
//! assert_eq!(frame.text(), "OK 1 2");
//! assert_eq!(frame.raw_len(), 8);
//! ```

use std::borrow::Cow;

use bytes::Bytes;

use super::wire_format::TERMINATOR;

/// A complete protocol message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Message bytes without the terminator.
    payload: Bytes,
}

impl Frame {
    /// Create a frame from raw bytes that end with the terminator.
    ///
    /// The terminator is stripped; input without it is kept whole.
    pub fn from_raw(raw: Bytes) -> Self {
        let payload = if raw.ends_with(TERMINATOR) {
            raw.slice(..raw.len() - TERMINATOR.len())
        } else {
            raw
        };
        Self { payload }
    }

    /// Message bytes without the terminator.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Length on the wire, terminator included.
    #[inline]
    pub fn raw_len(&self) -> usize {
        self.payload.len() + TERMINATOR.len()
    }

    /// Message text. Non-ASCII bytes are replaced.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.payload)
    }

    /// Check whether the message is exactly `literal`.
    #[inline]
    pub fn is(&self, literal: &str) -> bool {
        self.payload == literal.as_bytes()
    }

    /// Check whether the message is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

/// Build the wire form of a message (text + terminator).
pub fn build_frame(text: &str) -> Vec<u8> {
    let mut buf = Vec::with_capacity(text.len() + TERMINATOR.len());
    buf.extend_from_slice(text.as_bytes());
    buf.extend_from_slice(TERMINATOR);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_strips_terminator() {
        let frame = Frame::from_raw(Bytes::from_static(b"Mnau\x07\x08"));
        assert_eq!(frame.payload(), b"Mnau");
        assert_eq!(frame.raw_len(), 6);
        assert!(frame.is("Mnau"));
        assert!(!frame.is("Mnau\x07\x08"));
    }

    #[test]
    fn test_empty_frame() {
        let frame = Frame::from_raw(Bytes::from_static(b"\x07\x08"));
        assert!(frame.is_empty());
        assert_eq!(frame.raw_len(), 2);
        assert_eq!(frame.text(), "");
    }

    #[test]
    fn test_build_frame() {
        assert_eq!(build_frame("102 MOVE"), b"102 MOVE\x07\x08");
        assert_eq!(build_frame(""), b"\x07\x08");
    }
}
