//! Navigation - position/facing tracking and movement primitives.
//!
//! The robot only reports its coordinates, never its facing. The facing is
//! derived from the first observed displacement and then tracked locally
//! through the turns we issue. All turns are right turns.

mod direction;

pub use direction::{Direction, Position};

use tokio::io::{AsyncRead, AsyncWrite};

use crate::channel::FrameChannel;
use crate::config::SessionConfig;
use crate::error::{RobotError, Result};
use crate::protocol::{commands, limits, parse_integer};

/// Length of the status prefix in a move reply (`"OK "`).
const STATUS_PREFIX_LEN: usize = 3;

/// Parse a move reply of the form `OK <x> <y>`.
pub fn parse_position(reply: &str) -> Result<Position> {
    let coords = reply
        .get(STATUS_PREFIX_LEN..)
        .ok_or_else(|| RobotError::SyntaxError(format!("move reply too short: {:?}", reply)))?;
    let (x, y) = coords
        .split_once(' ')
        .ok_or_else(|| RobotError::SyntaxError(format!("malformed move reply: {:?}", reply)))?;

    Ok(Position::new(parse_integer(x)?, parse_integer(y)?))
}

/// Robot state as tracked by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RobotState {
    pub position: Position,
    /// `None` until [`Navigator::initialize`] observes a displacement.
    pub facing: Option<Direction>,
}

/// Drives the robot and tracks its state.
#[derive(Debug, Clone)]
pub struct Navigator {
    state: RobotState,
    max_stuck_retries: u32,
}

impl Navigator {
    /// Create a navigator with unknown facing.
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            state: RobotState::default(),
            max_stuck_retries: config.max_stuck_retries,
        }
    }

    #[inline]
    pub fn state(&self) -> &RobotState {
        &self.state
    }

    #[inline]
    pub fn position(&self) -> Position {
        self.state.position
    }

    #[inline]
    pub fn facing(&self) -> Option<Direction> {
        self.state.facing
    }

    /// Send one `MOVE` and record the reported position.
    pub async fn move_forward<S>(&mut self, channel: &mut FrameChannel<S>) -> Result<Position>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        channel.send(commands::MOVE).await?;
        let reply = channel.receive(limits::OK).await?;
        self.state.position = parse_position(&reply.text())?;
        Ok(self.state.position)
    }

    /// Turn right until facing `target`. Returns the number of turns issued.
    pub async fn turn_toward<S>(
        &mut self,
        channel: &mut FrameChannel<S>,
        target: Direction,
    ) -> Result<u8>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let mut facing = self.state.facing.ok_or(RobotError::FacingUnresolved)?;
        let turns = facing.right_turns_to(target);

        for _ in 0..turns {
            channel.send(commands::TURN_RIGHT).await?;
            channel.receive(limits::OK).await?;
            facing = facing.turned_right();
            self.state.facing = Some(facing);
        }
        Ok(turns)
    }

    /// Face `direction` and move one cell, retrying while an obstacle blocks.
    pub async fn move_toward<S>(
        &mut self,
        channel: &mut FrameChannel<S>,
        direction: Direction,
    ) -> Result<()>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        self.turn_toward(channel, direction).await?;
        let from = self.state.position;
        self.advance_from(channel, from).await
    }

    /// Move forward until the position differs from `from`.
    async fn advance_from<S>(&mut self, channel: &mut FrameChannel<S>, from: Position) -> Result<()>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let mut attempts = 1;
        self.move_forward(channel).await?;

        while self.state.position == from {
            if attempts > self.max_stuck_retries {
                return Err(RobotError::Stuck {
                    x: from.x,
                    y: from.y,
                    attempts,
                });
            }
            tracing::debug!(position = %from, attempts, "Blocked, retrying move");
            self.move_forward(channel).await?;
            attempts += 1;
        }
        Ok(())
    }

    /// Learn position and facing by moving forward until a displacement is seen.
    pub async fn initialize<S>(&mut self, channel: &mut FrameChannel<S>) -> Result<Direction>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let first = self.move_forward(channel).await?;
        self.advance_from(channel, first).await?;

        if let Some(facing) = Direction::from_displacement(first, self.state.position) {
            self.state.facing = Some(facing);
        }
        let facing = self.state.facing.ok_or(RobotError::FacingUnresolved)?;
        tracing::debug!(position = %self.state.position, ?facing, "Robot located");
        Ok(facing)
    }

    /// Initialize, then walk the robot back to the origin.
    pub async fn recenter<S>(&mut self, channel: &mut FrameChannel<S>) -> Result<()>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        self.initialize(channel).await?;

        while self.state.position.x > 0 {
            self.move_toward(channel, Direction::Left).await?;
        }
        while self.state.position.x < 0 {
            self.move_toward(channel, Direction::Right).await?;
        }
        while self.state.position.y > 0 {
            self.move_toward(channel, Direction::Down).await?;
        }
        while self.state.position.y < 0 {
            self.move_toward(channel, Direction::Up).await?;
        }

        tracing::info!("Robot at origin");
        Ok(())
    }
}
