//! Session driver - one connection from login to termination.
//!
//! Runs authentication, recentering and the search in order. The first
//! error ends the session: its protocol reply (if any) is sent and the
//! stream is shut down. Nothing is retried.

use tokio::io::{AsyncRead, AsyncWrite};

use crate::auth::authenticate;
use crate::channel::FrameChannel;
use crate::config::SessionConfig;
use crate::error::Result;
use crate::navigation::Navigator;
use crate::search::{spiral_search, SearchOutcome};

/// How a session ended without error.
pub type SessionOutcome = SearchOutcome;

/// State of a single connection.
pub struct Session<S> {
    channel: FrameChannel<S>,
    navigator: Navigator,
    config: SessionConfig,
    username: Option<String>,
}

impl<S> Session<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, config: SessionConfig) -> Self {
        Self {
            channel: FrameChannel::new(stream, &config),
            navigator: Navigator::new(&config),
            config,
            username: None,
        }
    }

    /// Username, once authenticated.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.username.is_some()
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Auth, recenter, search. Stops at the first error without replying.
    pub async fn run(&mut self) -> Result<SessionOutcome> {
        let username = authenticate(&mut self.channel, &self.config).await?;
        self.username = Some(username);

        self.navigator.recenter(&mut self.channel).await?;

        spiral_search(
            &mut self.channel,
            &mut self.navigator,
            self.config.search_radius,
        )
        .await
    }

    /// Run to completion, reply to any error, and close the stream.
    pub async fn serve(mut self) -> Result<SessionOutcome> {
        let result = self.run().await;

        match &result {
            Ok(SearchOutcome::Found(_)) => tracing::info!("Session complete"),
            Ok(SearchOutcome::Exhausted) => tracing::warn!("Session ended without a message"),
            Err(e) => {
                tracing::warn!(error = %e, "Session failed");
                self.channel.reject(e).await;
            }
        }
        self.channel.close().await;
        result
    }
}

/// Serve one connection with `config`.
pub async fn serve_connection<S>(stream: S, config: SessionConfig) -> Result<SessionOutcome>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    Session::new(stream, config).serve().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RobotError;
    use crate::protocol::{build_frame, FrameBuffer};
    use tokio::io::{duplex, AsyncReadExt, AsyncWriteExt};

    async fn serve_script(replies: &[&str]) -> (Result<SessionOutcome>, Vec<String>) {
        let (server, mut robot) = duplex(8192);
        for reply in replies {
            robot.write_all(&build_frame(reply)).await.unwrap();
        }

        let result = serve_connection(server, SessionConfig::default()).await;

        let mut out = Vec::new();
        robot.read_to_end(&mut out).await.unwrap();
        let mut buffer = FrameBuffer::new();
        buffer.push(&out);
        let sent = std::iter::from_fn(|| buffer.pop())
            .map(|f| f.text().into_owned())
            .collect();
        (result, sent)
    }

    #[tokio::test]
    async fn test_found_at_origin() {
        let (result, sent) = serve_script(&[
            "Mnau",
            "53112",
            "OK 0 -1",
            "OK 0 0",
            "Secret!",
        ])
        .await;

        assert_eq!(result.unwrap(), SearchOutcome::Found("Secret!".to_string()));
        assert_eq!(
            sent,
            [
                "62405",
                "200 OK",
                "102 MOVE",
                "102 MOVE",
                "105 GET MESSAGE",
                "106 LOGOUT"
            ]
        );
    }

    #[tokio::test]
    async fn test_login_failure_replies_and_stops() {
        let (result, sent) = serve_script(&["Mnau", "12345", "OK 0 0"]).await;

        assert!(matches!(result, Err(RobotError::AuthFailure { .. })));
        assert_eq!(sent, ["62405", "300 LOGIN FAILED"]);
    }

    #[tokio::test]
    async fn test_bad_move_reply_is_syntax_error() {
        let (result, sent) = serve_script(&["Mnau", "53112", "OK 1 x"]).await;

        assert!(matches!(result, Err(RobotError::SyntaxError(_))));
        assert_eq!(sent, ["62405", "200 OK", "102 MOVE", "301 SYNTAX ERROR"]);
    }

    #[tokio::test]
    async fn test_recharge_during_search_is_logic_error_without_full_power() {
        let (result, sent) =
            serve_script(&["Mnau", "53112", "OK 0 -1", "OK 0 0", "RECHARGING", "OK 0 0"]).await;

        assert!(matches!(result, Err(RobotError::LogicError(_))));
        assert_eq!(sent.last().map(String::as_str), Some("302 LOGIC ERROR"));
    }

    #[tokio::test]
    async fn test_disconnect_sends_nothing() {
        let (server, mut robot) = duplex(1024);
        robot.write_all(&build_frame("Mnau")).await.unwrap();
        robot.shutdown().await.unwrap();

        let result = serve_connection(server, SessionConfig::default()).await;
        assert!(matches!(result, Err(RobotError::ConnectionClosed)));

        let mut out = Vec::new();
        robot.read_to_end(&mut out).await.unwrap();
        assert_eq!(out, build_frame("62405"));
    }

    #[tokio::test]
    async fn test_session_tracks_authentication() {
        let (server, mut robot) = duplex(1024);
        robot
            .write_all(b"Mnau\x07\x0853112\x07\x08")
            .await
            .unwrap();
        robot.shutdown().await.unwrap();

        let mut session = Session::new(server, SessionConfig::default());
        assert!(!session.is_authenticated());

        let err = session.run().await.unwrap_err();
        assert!(matches!(err, RobotError::ConnectionClosed));
        assert_eq!(session.username(), Some("Mnau"));
        assert_eq!(session.navigator().facing(), None);
    }
}
