//! Expanding-square search around the origin.
//!
//! Leg lengths grow 1, 1, 2, 2, 3, 3, ... while the direction cycles
//! up, right, down, left. Every cell visited is queried with `GET MESSAGE`
//! before stepping off it.

use tokio::io::{AsyncRead, AsyncWrite};

use crate::channel::FrameChannel;
use crate::error::Result;
use crate::navigation::{Direction, Navigator};
use crate::protocol::{commands, limits};

/// One straight segment of the spiral.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Leg {
    pub direction: Direction,
    pub length: u32,
}

/// Infinite iterator over the spiral's legs.
#[derive(Debug, Clone)]
pub struct SpiralLegs {
    index: usize,
    length: u32,
}

impl SpiralLegs {
    pub fn new() -> Self {
        Self {
            index: 0,
            length: 1,
        }
    }

    /// Next leg; the spiral never ends.
    pub fn next_leg(&mut self) -> Leg {
        let leg = Leg {
            direction: Direction::from_ordinal(self.index),
            length: self.length,
        };
        self.index += 1;
        if self.index % 2 == 0 {
            self.length += 1;
        }
        leg
    }
}

impl Default for SpiralLegs {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for SpiralLegs {
    type Item = Leg;

    fn next(&mut self) -> Option<Leg> {
        Some(self.next_leg())
    }
}

/// How a search ended without error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Payload retrieved; `LOGOUT` has been sent.
    Found(String),
    /// Left the search area without finding anything. Nothing is sent.
    Exhausted,
}

/// Walk the spiral until the payload turns up or the robot leaves the area.
pub async fn spiral_search<S>(
    channel: &mut FrameChannel<S>,
    navigator: &mut Navigator,
    radius: i32,
) -> Result<SearchOutcome>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    tracing::info!("Starting search");

    let mut legs = SpiralLegs::new();
    loop {
        let leg = legs.next_leg();
        for _ in 0..leg.length {
            channel.send(commands::GET_MESSAGE).await?;
            let reply = channel.receive(limits::MESSAGE).await?;

            if !reply.is_empty() {
                let payload = reply.text().into_owned();
                channel.send(commands::LOGOUT).await?;
                tracing::info!(%payload, position = %navigator.position(), "Message found");
                return Ok(SearchOutcome::Found(payload));
            }
            navigator.move_toward(channel, leg.direction).await?;
        }

        if navigator.position().outside(radius) {
            tracing::warn!(position = %navigator.position(), "Search area exhausted");
            return Ok(SearchOutcome::Exhausted);
        }
    }
}
