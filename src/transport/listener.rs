//! TCP listener for robot connections.
//!
//! # Example
//!
//! ```ignore
//! use robowire_server::transport::RobotListener;
//!
//! let listener = RobotListener::bind("0.0.0.0:3999".parse()?).await?;
//! let (stream, peer) = listener.accept().await?;
//! ```

use std::net::SocketAddr;

use tokio::net::{TcpListener, TcpStream};

use crate::error::Result;

/// Stream type handed to each session.
pub type RobotStream = TcpStream;

/// Accepts robot connections.
pub struct RobotListener {
    listener: TcpListener,
    local_addr: SocketAddr,
}

impl RobotListener {
    /// Bind to `addr`. Port 0 picks a free port; see [`local_addr`](Self::local_addr).
    pub async fn bind(addr: SocketAddr) -> Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        Ok(Self {
            listener,
            local_addr,
        })
    }

    /// Accept a single connection.
    ///
    /// Nagle is disabled: every exchange is one short message each way.
    pub async fn accept(&self) -> Result<(RobotStream, SocketAddr)> {
        let (stream, peer) = self.listener.accept().await?;
        stream.set_nodelay(true)?;
        Ok((stream, peer))
    }

    /// Get the bound address.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}
