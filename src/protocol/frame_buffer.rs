//! Frame buffer for accumulating partial reads.
//!
//! Uses `bytes::BytesMut` for the pending bytes and a queue for messages
//! that are complete but not yet consumed:
//! - every push scans the new bytes for the terminator
//! - complete messages move into the queue immediately, in arrival order
//! - the remainder stays pending until more bytes arrive
//!
//! # Example
//!
//! ```
//! use robowire_server::protocol::FrameBuffer;
//!
//! let mut buffer = FrameBuffer::new();
//!
//! buffer.push(b"OK 0 ");
//! assert!(buffer.pop().is_none());
//!
//! buffer.push(b"1\x07\x08GET");
//! assert_eq!(buffer.pop().unwrap().text(), "OK 0 1");
//! assert_eq!(buffer.pending_len(), 3);
//! ```

use std::collections::VecDeque;

use bytes::BytesMut;

use super::wire_format::{client, TERMINATOR};
use super::Frame;
use crate::error::{RobotError, Result};

/// Buffer for accumulating incoming bytes and extracting complete messages.
pub struct FrameBuffer {
    /// Bytes not yet part of a complete message.
    buffer: BytesMut,
    /// Prefix of `buffer` already known to contain no terminator.
    scanned: usize,
    /// Complete messages in arrival order.
    frames: VecDeque<Frame>,
}

impl FrameBuffer {
    /// Create a new, empty frame buffer.
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Create a new frame buffer with the given pending capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(capacity),
            scanned: 0,
            frames: VecDeque::new(),
        }
    }

    /// Push data into the buffer and queue every message it completes.
    ///
    /// Returns the number of messages queued by this push.
    pub fn push(&mut self, data: &[u8]) -> usize {
        self.buffer.extend_from_slice(data);

        let mut queued = 0;
        while let Some(end) = self.find_terminator() {
            let raw = self.buffer.split_to(end).freeze();
            self.frames.push_back(Frame::from_raw(raw));
            self.scanned = 0;
            queued += 1;
        }
        queued
    }

    /// Find the end (exclusive, terminator included) of the first complete message.
    fn find_terminator(&mut self) -> Option<usize> {
        // The first terminator byte may be the last byte of the previous scan.
        let start = self.scanned.saturating_sub(TERMINATOR.len() - 1);
        let found = self.buffer[start..]
            .windows(TERMINATOR.len())
            .position(|w| w == TERMINATOR)
            .map(|pos| start + pos + TERMINATOR.len());

        if found.is_none() {
            self.scanned = self.buffer.len();
        }
        found
    }

    /// Pop the oldest complete message.
    pub fn pop(&mut self) -> Option<Frame> {
        self.frames.pop_front()
    }

    /// Check that the pending partial still fits a message of `max_len` bytes.
    ///
    /// A partial of `max_len - 1` bytes or more can only complete into an
    /// oversized message, unless it is still a prefix of the recharge notice,
    /// which may arrive in any phase.
    pub fn check_pending(&self, max_len: usize) -> Result<()> {
        let pending = &self.buffer[..];
        if pending.len() <= max_len.saturating_sub(1) {
            return Ok(());
        }
        if is_recharging_prefix(pending) {
            return Ok(());
        }
        Err(RobotError::FramingViolation(format!(
            "{} pending bytes without terminator exceed limit {}",
            pending.len(),
            max_len
        )))
    }

    /// Number of pending bytes not yet forming a message.
    pub fn pending_len(&self) -> usize {
        self.buffer.len()
    }

    /// Check whether there is nothing buffered at all.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty() && self.frames.is_empty()
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

fn is_recharging_prefix(pending: &[u8]) -> bool {
    let notice = client::RECHARGING.as_bytes();
    let len = pending.len().min(notice.len());
    pending.len() < notice.len() + TERMINATOR.len()
        && pending[..len] == notice[..len]
        && (pending.len() <= notice.len() || pending[notice.len()] == TERMINATOR[0])
}
