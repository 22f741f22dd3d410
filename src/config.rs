//! Session and server configuration.
//!
//! Defaults follow the wire protocol: one second per read, five seconds
//! while the robot recharges, the well-known hash keys and a 5x5 search area.

use std::net::SocketAddr;
use std::time::Duration;

use crate::protocol::{CLIENT_KEY, SERVER_KEY};

/// Default per-read timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// Default timeout while waiting for `FULL POWER`.
pub const DEFAULT_RECHARGE_TIMEOUT: Duration = Duration::from_secs(5);

/// Default extra `MOVE` attempts before a robot counts as stuck.
pub const DEFAULT_MAX_STUCK_RETRIES: u32 = 16;

/// Default half-width of the search square.
pub const DEFAULT_SEARCH_RADIUS: i32 = 2;

/// Default size of a single socket read.
pub const DEFAULT_READ_CHUNK: usize = 100;

/// Default listen address.
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3999";

/// Parameters of a single session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Timeout for each read.
    pub timeout: Duration,
    /// Timeout for each read while the robot recharges.
    pub recharge_timeout: Duration,
    /// Key for the hash sent to the client.
    pub server_key: u32,
    /// Key for the hash the client confirms with.
    pub client_key: u32,
    /// Extra `MOVE` attempts allowed while the position does not change.
    pub max_stuck_retries: u32,
    /// Search stops once `|x|` or `|y|` exceeds this.
    pub search_radius: i32,
    /// Bytes requested per socket read.
    pub read_chunk: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            recharge_timeout: DEFAULT_RECHARGE_TIMEOUT,
            server_key: SERVER_KEY,
            client_key: CLIENT_KEY,
            max_stuck_retries: DEFAULT_MAX_STUCK_RETRIES,
            search_radius: DEFAULT_SEARCH_RADIUS,
            read_chunk: DEFAULT_READ_CHUNK,
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on.
    pub listen_addr: SocketAddr,
    /// Settings handed to every session.
    pub session: SessionConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 3999)),
            session: SessionConfig::default(),
        }
    }
}
