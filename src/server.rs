//! Server builder and accept loop.
//!
//! The [`ServerBuilder`] provides a fluent API for the session parameters
//! and listen address. The [`RobotServer`] then:
//! 1. Binds the TCP listener
//! 2. Accepts connections until shutdown
//! 3. Runs each session on its own task, sharing nothing with the others
//!
//! # Example
//!
//! ```ignore
//! use robowire_server::RobotServer;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let server = RobotServer::builder()
//!         .listen_addr("0.0.0.0:3999".parse()?)
//!         .timeout(std::time::Duration::from_secs(1))
//!         .start()
//!         .await?;
//!
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::Instrument;

use crate::config::{ServerConfig, SessionConfig};
use crate::error::{Result, RobotError};
use crate::search::SearchOutcome;
use crate::session::serve_connection;
use crate::transport::RobotListener;

/// Pause after a failed accept, so a persistent error such as fd
/// exhaustion does not spin the loop.
pub const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// Builder for configuring and starting a server.
#[derive(Debug, Clone, Default)]
pub struct ServerBuilder {
    config: ServerConfig,
}

impl ServerBuilder {
    /// Create a builder with protocol defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the listen address.
    ///
    /// Default: 0.0.0.0:3999
    pub fn listen_addr(mut self, addr: SocketAddr) -> Self {
        self.config.listen_addr = addr;
        self
    }

    /// Set the per-read timeout.
    ///
    /// Default: 1 second
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.session.timeout = timeout;
        self
    }

    /// Set the per-read timeout while the robot recharges.
    ///
    /// Default: 5 seconds
    pub fn recharge_timeout(mut self, timeout: Duration) -> Self {
        self.config.session.recharge_timeout = timeout;
        self
    }

    /// Set the hash keys.
    pub fn keys(mut self, server_key: u32, client_key: u32) -> Self {
        self.config.session.server_key = server_key;
        self.config.session.client_key = client_key;
        self
    }

    /// Set the extra `MOVE` attempts allowed against an obstacle.
    ///
    /// Default: 16
    pub fn max_stuck_retries(mut self, retries: u32) -> Self {
        self.config.session.max_stuck_retries = retries;
        self
    }

    /// Set the half-width of the search square.
    ///
    /// Default: 2
    pub fn search_radius(mut self, radius: i32) -> Self {
        self.config.session.search_radius = radius;
        self
    }

    /// Replace all session parameters at once.
    pub fn session(mut self, session: SessionConfig) -> Self {
        self.config.session = session;
        self
    }

    /// Get the configuration built so far.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Bind the listener.
    pub async fn start(self) -> Result<RobotServer> {
        RobotServer::start(self.config).await
    }
}

/// A bound server, ready to accept robots.
pub struct RobotServer {
    listener: RobotListener,
    config: ServerConfig,
    active_sessions: Arc<AtomicUsize>,
}

impl RobotServer {
    /// Create a new server builder.
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    async fn start(config: ServerConfig) -> Result<Self> {
        let listener = RobotListener::bind(config.listen_addr).await?;
        tracing::info!(addr = %listener.local_addr(), "Listening");

        Ok(Self {
            listener,
            config,
            active_sessions: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Get the bound address.
    pub fn local_addr(&self) -> SocketAddr {
        self.listener.local_addr()
    }

    /// Number of sessions currently running.
    pub fn active_sessions(&self) -> usize {
        self.active_sessions.load(Ordering::Relaxed)
    }

    /// Accept connections until Ctrl-C.
    pub async fn run(&self) -> Result<()> {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
            tracing::info!("Ctrl-C received, shutting down");
        })
        .await
    }

    /// Accept connections until `shutdown` completes.
    ///
    /// Running sessions are not cancelled; they end on their own.
    pub async fn run_until<F>(&self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                result = self.listener.accept() => {
                    match result {
                        Ok((stream, peer)) => self.spawn_session(stream, peer),
                        Err(e) => accept_failed(&e).await,
                    }
                }
                _ = &mut shutdown => break,
            }
        }
        Ok(())
    }

    fn spawn_session(&self, stream: crate::transport::RobotStream, peer: SocketAddr) {
        let config = self.config.session.clone();
        let active = self.active_sessions.clone();
        let span = tracing::info_span!("session", %peer);

        tokio::spawn(
            async move {
                active.fetch_add(1, Ordering::Relaxed);
                tracing::info!("Robot connected");

                match serve_connection(stream, config).await {
                    Ok(SearchOutcome::Found(_)) => tracing::info!("Robot logged out"),
                    Ok(SearchOutcome::Exhausted) => tracing::info!("Robot released"),
                    Err(e) => tracing::debug!(error = %e, "Connection dropped"),
                }

                active.fetch_sub(1, Ordering::Relaxed);
            }
            .instrument(span),
        );
    }
}

async fn accept_failed(err: &RobotError) {
    tracing::error!("Accept error: {}", err);
    tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
}
