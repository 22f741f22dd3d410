//! Frame channel - delimited, timeout-bounded messages over a byte stream.
//!
//! [`FrameChannel`] owns one duplex stream for the lifetime of a session:
//! - `send` appends the terminator and writes the whole message
//! - `receive` returns the next message, applying the phase length limit
//!   and absorbing a recharge notice (see [`recharge`](self::recharge))
//!
//! Every read is bounded by a timeout. A timed-out read is never retried.
//!
//! # Example
//!
//! ```ignore
//! use robowire_server::channel::FrameChannel;
//! use robowire_server::protocol::{commands, limits};
//!
//! let mut channel = FrameChannel::new(stream, &config);
//! channel.send(commands::MOVE).await?;
//! let reply = channel.receive(limits::OK).await?;
//! ```

mod recharge;

use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::config::SessionConfig;
use crate::error::{RobotError, Result};
use crate::protocol::{build_frame, Frame, FrameBuffer};

/// Message channel over a single duplex stream.
pub struct FrameChannel<S> {
    stream: S,
    buffer: FrameBuffer,
    read_buf: Vec<u8>,
    timeout: Duration,
    recharge_timeout: Duration,
}

impl<S> FrameChannel<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wrap a stream using the timeouts from `config`.
    pub fn new(stream: S, config: &SessionConfig) -> Self {
        Self {
            stream,
            buffer: FrameBuffer::new(),
            read_buf: vec![0u8; config.read_chunk.max(1)],
            timeout: config.timeout,
            recharge_timeout: config.recharge_timeout,
        }
    }

    /// Send one message; the terminator is appended here.
    pub async fn send(&mut self, text: &str) -> Result<()> {
        tracing::debug!(text, "send");
        self.stream.write_all(&build_frame(text)).await?;
        self.stream.flush().await?;
        Ok(())
    }

    /// Wait for the next complete message.
    ///
    /// Already queued messages are returned without reading. Otherwise reads
    /// until one completes, each read bounded by `wait`. The pending partial
    /// is checked against `max_len` before every read.
    pub(crate) async fn next_frame(&mut self, max_len: usize, wait: Duration) -> Result<Frame> {
        loop {
            if let Some(frame) = self.buffer.pop() {
                tracing::debug!(text = %frame.text(), "recv");
                return Ok(frame);
            }
            self.buffer.check_pending(max_len)?;
            self.fill(wait).await?;
        }
    }

    /// One bounded read into the frame buffer.
    async fn fill(&mut self, wait: Duration) -> Result<()> {
        let n = match tokio::time::timeout(wait, self.stream.read(&mut self.read_buf)).await {
            Err(_) => return Err(RobotError::Timeout(wait)),
            Ok(Ok(0)) => return Err(RobotError::ConnectionClosed),
            Ok(Ok(n)) => n,
            Ok(Err(e)) => return Err(RobotError::Io(e)),
        };
        self.buffer.push(&self.read_buf[..n]);
        Ok(())
    }

    /// Send the protocol reply for `err`, if it has one.
    ///
    /// Best effort: the session is ending either way.
    pub async fn reject(&mut self, err: &RobotError) {
        if let Some(reply) = err.reply() {
            if let Err(e) = self.send(reply).await {
                tracing::debug!("Failed to send {:?}: {}", reply, e);
            }
        }
    }

    /// Shut down the write side of the stream.
    pub async fn close(&mut self) {
        if let Err(e) = self.stream.shutdown().await {
            tracing::debug!("Shutdown error: {}", e);
        }
    }

}
