//! Wire format constants and field parsing.
//!
//! Every message, in either direction, is ASCII text followed by the
//! two-byte terminator:
//! ```text
//! ┌────────────────────┬──────┬──────┐
//! │ text               │ 0x07 │ 0x08 │
//! └────────────────────┴──────┴──────┘
//! ```
//!
//! Length limits are per phase and always include the terminator.

use crate::error::{RobotError, Result};

/// Message terminator (`\a\b`).
pub const TERMINATOR: &[u8; 2] = b"\x07\x08";

/// Key mixed into the hash the server sends.
pub const SERVER_KEY: u32 = 54621;

/// Key mixed into the hash the client must confirm with.
pub const CLIENT_KEY: u32 = 45328;

/// Modulus for both hashes.
pub const HASH_MOD: u32 = 65536;

/// Commands issued by the server.
pub mod commands {
    pub const MOVE: &str = "102 MOVE";
    /// Defined by the protocol, never issued: every turn is a right turn.
    pub const TURN_LEFT: &str = "103 TURN LEFT";
    pub const TURN_RIGHT: &str = "104 TURN RIGHT";
    pub const GET_MESSAGE: &str = "105 GET MESSAGE";
    pub const LOGOUT: &str = "106 LOGOUT";
    pub const OK: &str = "200 OK";
    pub const LOGIN_FAILED: &str = "300 LOGIN FAILED";
    pub const SYNTAX_ERROR: &str = "301 SYNTAX ERROR";
    pub const LOGIC_ERROR: &str = "302 LOGIC ERROR";
}

/// Client literals that get special treatment.
pub mod client {
    pub const RECHARGING: &str = "RECHARGING";
    pub const FULL_POWER: &str = "FULL POWER";
}

/// Per-phase maximum message lengths, terminator included.
pub mod limits {
    pub const USERNAME: usize = 12;
    pub const CONFIRMATION: usize = 7;
    pub const OK: usize = 12;
    pub const RECHARGING: usize = 12;
    pub const FULL_POWER: usize = 12;
    pub const MESSAGE: usize = 100;
}

/// Parse a signed integer literal: optional `+`/`-`, then one or more ASCII digits.
///
/// Anything else, including values outside `i32`, is a [`RobotError::SyntaxError`].
pub fn parse_integer(token: &str) -> Result<i32> {
    let digits = token
        .strip_prefix('+')
        .or_else(|| token.strip_prefix('-'))
        .unwrap_or(token);

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RobotError::SyntaxError(format!(
            "not an integer literal: {:?}",
            token
        )));
    }

    token
        .parse::<i32>()
        .map_err(|e| RobotError::SyntaxError(format!("{:?}: {}", token, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_and_signed() {
        assert_eq!(parse_integer("0").unwrap(), 0);
        assert_eq!(parse_integer("42").unwrap(), 42);
        assert_eq!(parse_integer("+7").unwrap(), 7);
        assert_eq!(parse_integer("-13").unwrap(), -13);
        assert_eq!(parse_integer("007").unwrap(), 7);
    }

    #[test]
    fn test_parse_rejects_non_literals() {
        for bad in ["", "+", "-", "1a", " 1", "1 ", "--1", "+-1", "1.5", "0x10"] {
            let err = parse_integer(bad).unwrap_err();
            assert!(
                matches!(err, RobotError::SyntaxError(_)),
                "{:?} should be a syntax error",
                bad
            );
        }
    }

    #[test]
    fn test_parse_rejects_overflow() {
        assert!(parse_integer("2147483647").is_ok());
        assert!(matches!(
            parse_integer("2147483648"),
            Err(RobotError::SyntaxError(_))
        ));
    }

    #[test]
    fn test_special_literals_fit_their_limits() {
        assert_eq!(client::RECHARGING.len() + TERMINATOR.len(), limits::RECHARGING);
        assert_eq!(client::FULL_POWER.len() + TERMINATOR.len(), limits::FULL_POWER);
    }
}
