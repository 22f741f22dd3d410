//! Transport module - the connection source.
//!
//! Provides a TCP listener handing out one stream per robot.

mod listener;

pub use listener::{RobotListener, RobotStream};
