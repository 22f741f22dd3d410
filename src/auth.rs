//! Challenge/response login.
//!
//! ```text
//! robot  ──► username
//! server ──► hash(username, server key)
//! robot  ──► hash(username, client key)
//! server ──► 200 OK | 300 LOGIN FAILED | 301 SYNTAX ERROR
//! ```

use tokio::io::{AsyncRead, AsyncWrite};

use crate::channel::FrameChannel;
use crate::config::SessionConfig;
use crate::error::{RobotError, Result};
use crate::protocol::{commands, limits, parse_integer, HASH_MOD};

/// Sum of the username's byte values.
pub fn name_sum(username: &[u8]) -> u32 {
    username.iter().map(|&b| u32::from(b)).sum()
}

/// `((sum * 1000) mod 65536 + key) mod 65536`.
pub fn hash(sum: u32, key: u32) -> u32 {
    ((sum.wrapping_mul(1000) % HASH_MOD) + key % HASH_MOD) % HASH_MOD
}

/// Run the handshake; returns the username on success.
pub async fn authenticate<S>(channel: &mut FrameChannel<S>, config: &SessionConfig) -> Result<String>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let username = channel.receive(limits::USERNAME).await?;
    let sum = name_sum(username.payload());

    let server_hash = hash(sum, config.server_key);
    channel.send(&server_hash.to_string()).await?;

    let confirmation = channel.receive(limits::CONFIRMATION).await?;
    let received = parse_integer(&confirmation.text())?;

    let expected = hash(sum, config.client_key);
    if i64::from(received) != i64::from(expected) {
        return Err(RobotError::AuthFailure { expected, received });
    }

    channel.send(commands::OK).await?;
    let username = username.text().into_owned();
    tracing::info!(%username, "Authentication successful");
    Ok(username)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{CLIENT_KEY, SERVER_KEY};
    use tokio::io::{duplex, AsyncReadExt, AsyncWriteExt};

    async fn run(input: &[u8]) -> (Result<String>, Vec<u8>) {
        run_with(SessionConfig::default(), input).await
    }

    async fn run_with(config: SessionConfig, input: &[u8]) -> (Result<String>, Vec<u8>) {
        let (server, mut robot) = duplex(1024);
        let mut channel = FrameChannel::new(server, &config);

        robot.write_all(input).await.unwrap();
        let result = authenticate(&mut channel, &config).await;
        if let Err(e) = &result {
            channel.reject(e).await;
        }
        channel.close().await;
        drop(channel);

        let mut out = Vec::new();
        robot.read_to_end(&mut out).await.unwrap();
        (result, out)
    }

    #[test]
    fn test_mnau_hashes() {
        let sum = name_sum(b"Mnau");
        assert_eq!(sum, 77 + 110 + 97 + 117);
        assert_eq!(sum, 401);

        // 401000 mod 65536 = 7784
        assert_eq!(hash(sum, SERVER_KEY), (7784 + 54621) % 65536);
        assert_eq!(hash(sum, SERVER_KEY), 62405);
        assert_eq!(hash(sum, CLIENT_KEY), (7784 + 45328) % 65536);
        assert_eq!(hash(sum, CLIENT_KEY), 53112);
    }

    #[test]
    fn test_hash_wraps() {
        // 10 bytes of 0xFF is the largest sum a username can have.
        let sum = name_sum(&[0xFF; 10]);
        assert!(hash(sum, SERVER_KEY) < HASH_MOD);
        assert!(hash(sum, CLIENT_KEY) < HASH_MOD);
        assert_eq!(hash(0, 65535), 65535);
        assert_eq!(hash(0, 65536), 0);
    }

    #[tokio::test]
    async fn test_successful_login() {
        let (result, out) = run(b"Mnau\x07\x0853112\x07\x08").await;

        assert_eq!(result.unwrap(), "Mnau");
        assert_eq!(out, b"62405\x07\x08200 OK\x07\x08");
    }

    #[tokio::test]
    async fn test_signed_confirmation() {
        // (7784 + 58986) mod 65536 = 1234, short enough to carry a sign.
        let config = SessionConfig {
            client_key: 58986,
            ..SessionConfig::default()
        };
        let (result, out) = run_with(config, b"Mnau\x07\x08+1234\x07\x08").await;

        assert_eq!(result.unwrap(), "Mnau");
        assert_eq!(out, b"62405\x07\x08200 OK\x07\x08");
    }

    #[tokio::test]
    async fn test_signed_five_digit_confirmation_too_long() {
        let (result, out) = run(b"Mnau\x07\x08+53112\x07\x08").await;

        assert!(matches!(result, Err(RobotError::FramingViolation(_))));
        assert_eq!(out, b"62405\x07\x08301 SYNTAX ERROR\x07\x08");
    }

    #[tokio::test]
    async fn test_wrong_hash() {
        let (result, out) = run(b"Mnau\x07\x0853113\x07\x08").await;

        assert!(matches!(
            result,
            Err(RobotError::AuthFailure {
                expected: 53112,
                received: 53113
            })
        ));
        assert_eq!(out, b"62405\x07\x08300 LOGIN FAILED\x07\x08");
    }

    #[tokio::test]
    async fn test_non_numeric_confirmation() {
        let (result, out) = run(b"Mnau\x07\x0853a12\x07\x08").await;

        assert!(matches!(result, Err(RobotError::SyntaxError(_))));
        assert_eq!(out, b"62405\x07\x08301 SYNTAX ERROR\x07\x08");
    }

    #[tokio::test]
    async fn test_username_too_long() {
        let (result, out) = run(b"Oompa Loompa\x07\x08").await;

        assert!(matches!(result, Err(RobotError::FramingViolation(_))));
        assert_eq!(out, b"301 SYNTAX ERROR\x07\x08");
    }

    #[tokio::test]
    async fn test_confirmation_too_long() {
        let (result, out) = run(b"Mnau\x07\x08123456\x07\x08").await;

        assert!(matches!(result, Err(RobotError::FramingViolation(_))));
        assert_eq!(out, b"62405\x07\x08301 SYNTAX ERROR\x07\x08");
    }
}
