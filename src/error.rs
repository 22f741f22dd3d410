//! Error types for robowire-server.

use thiserror::Error;

use crate::protocol::commands;

/// Every way a session can end early.
///
/// All variants are terminal: the session driver sends [`RobotError::reply`]
/// (when there is one) and closes the stream.
#[derive(Debug, Error)]
pub enum RobotError {
    /// I/O error on the underlying stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No data arrived within the allotted window.
    #[error("Timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// A message or the pending partial exceeds the phase limit.
    #[error("Framing violation: {0}")]
    FramingViolation(String),

    /// A field expected to be a signed integer literal is not one.
    #[error("Syntax error: {0}")]
    SyntaxError(String),

    /// Recharge notice not followed by `FULL POWER`.
    #[error("Logic error: expected FULL POWER, got {0:?}")]
    LogicError(String),

    /// Confirmation hash mismatch.
    #[error("Authentication failed: expected {expected}, got {received}")]
    AuthFailure { expected: u32, received: i32 },

    /// Robot did not move after the configured number of attempts.
    #[error("Robot stuck at ({x}, {y}) after {attempts} attempts")]
    Stuck { x: i32, y: i32, attempts: u32 },

    /// A turn was requested before the facing was derived.
    #[error("Facing not resolved yet")]
    FacingUnresolved,

    /// Peer closed the connection.
    #[error("Connection closed")]
    ConnectionClosed,
}

impl RobotError {
    /// Protocol message to send before closing, if the protocol defines one.
    pub fn reply(&self) -> Option<&'static str> {
        match self {
            RobotError::FramingViolation(_) | RobotError::SyntaxError(_) => {
                Some(commands::SYNTAX_ERROR)
            }
            RobotError::LogicError(_) => Some(commands::LOGIC_ERROR),
            RobotError::AuthFailure { .. } => Some(commands::LOGIN_FAILED),
            _ => None,
        }
    }
}

/// Result type alias using RobotError.
pub type Result<T> = std::result::Result<T, RobotError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_replies() {
        assert_eq!(
            RobotError::FramingViolation("x".into()).reply(),
            Some("301 SYNTAX ERROR")
        );
        assert_eq!(
            RobotError::SyntaxError("x".into()).reply(),
            Some("301 SYNTAX ERROR")
        );
        assert_eq!(
            RobotError::LogicError("x".into()).reply(),
            Some("302 LOGIC ERROR")
        );
        assert_eq!(
            RobotError::AuthFailure {
                expected: 1,
                received: 2
            }
            .reply(),
            Some("300 LOGIN FAILED")
        );
    }

    #[test]
    fn test_silent_errors() {
        assert!(RobotError::Timeout(Duration::from_secs(1)).reply().is_none());
        assert!(RobotError::ConnectionClosed.reply().is_none());
        assert!(RobotError::FacingUnresolved.reply().is_none());
        assert!(RobotError::Stuck {
            x: 0,
            y: 0,
            attempts: 3
        }
        .reply()
        .is_none());
    }
}
