//! Recharge interception on the receive path.
//!
//! At any point the robot may answer with `RECHARGING` instead of a reply.
//! It must then send `FULL POWER` within the recharge timeout, after which
//! the real reply follows. Callers never see either notice.

use tokio::io::{AsyncRead, AsyncWrite};

use super::FrameChannel;
use crate::error::{RobotError, Result};
use crate::protocol::{client, limits, Frame};

impl<S> FrameChannel<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Receive the next reply of at most `max_len` bytes (terminator included).
    ///
    /// A single recharge cycle before the reply is absorbed. A second
    /// `RECHARGING` right after `FULL POWER` is returned as an ordinary message.
    pub async fn receive(&mut self, max_len: usize) -> Result<Frame> {
        let mut frame = self.next_frame(max_len, self.timeout).await?;

        if frame.is(client::RECHARGING) {
            tracing::debug!("Robot recharging");
            self.await_full_power(max_len).await?;
            frame = self.next_frame(max_len, self.timeout).await?;
        }

        if frame.raw_len() > max_len {
            return Err(RobotError::FramingViolation(format!(
                "message of {} bytes exceeds limit {}",
                frame.raw_len(),
                max_len
            )));
        }
        Ok(frame)
    }

    /// Anything but `FULL POWER` is a logic error, including a follow-up too
    /// long for the phase, however its bytes are split.
    async fn await_full_power(&mut self, max_len: usize) -> Result<()> {
        let limit = max_len.max(limits::FULL_POWER);
        let frame = match self.next_frame(limit, self.recharge_timeout).await {
            Ok(frame) => frame,
            Err(RobotError::FramingViolation(reason)) => {
                return Err(RobotError::LogicError(reason));
            }
            Err(e) => return Err(e),
        };

        if !frame.is(client::FULL_POWER) {
            return Err(RobotError::LogicError(frame.text().into_owned()));
        }
        tracing::debug!("Robot back at full power");
        Ok(())
    }
}
