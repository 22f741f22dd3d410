//! # robowire-server
//!
//! Server for the delimiter-framed robot remote-control protocol.
//!
//! Each connected robot gets its own session that:
//! 1. Authenticates the robot with a hash challenge/response
//! 2. Locates the robot and walks it back to the origin
//! 3. Searches the surrounding 5x5 area in an expanding square,
//!    logging the robot out once it picks up the hidden message
//!
//! ## Architecture
//!
//! - **Frame channel**: `\a\b`-terminated messages with per-phase length
//!   limits and read timeouts, absorbing recharge notices
//! - **Session**: auth, navigation and search over one channel, one task
//!   per connection
//!
//! ## Example
//!
//! ```ignore
//! use robowire_server::RobotServer;
//!
//! #[tokio::main]
//! async fn main() {
//!     let server = RobotServer::builder()
//!         .start()
//!         .await
//!         .unwrap();
//!
//!     server.run().await.unwrap();
//! }
//! ```

pub mod auth;
pub mod channel;
pub mod config;
pub mod error;
pub mod navigation;
pub mod protocol;
pub mod search;
pub mod session;
pub mod transport;

mod server;

pub use config::{ServerConfig, SessionConfig};
pub use error::RobotError;
pub use server::{RobotServer, ServerBuilder};
pub use session::{serve_connection, Session, SessionOutcome};
