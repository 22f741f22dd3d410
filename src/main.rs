//! robowire-server binary
//!
//! Usage:
//!   robowire-server [OPTIONS]
//!
//! Logging is controlled with `RUST_LOG` (default: info).

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use robowire_server::config::{
    DEFAULT_MAX_STUCK_RETRIES, DEFAULT_SEARCH_RADIUS, DEFAULT_LISTEN_ADDR,
};
use robowire_server::protocol::{CLIENT_KEY, SERVER_KEY};
use robowire_server::RobotServer;

/// Robot remote-control server
#[derive(Parser, Debug)]
#[command(name = "robowire-server")]
#[command(about = "Authenticates robots, recenters them and searches for the hidden message")]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = DEFAULT_LISTEN_ADDR)]
    addr: SocketAddr,

    /// Per-read timeout in milliseconds
    #[arg(long, default_value_t = 1000)]
    timeout_ms: u64,

    /// Per-read timeout while recharging, in milliseconds
    #[arg(long, default_value_t = 5000)]
    recharge_timeout_ms: u64,

    /// Key for the hash sent to the robot
    #[arg(long, default_value_t = SERVER_KEY)]
    server_key: u32,

    /// Key for the hash the robot confirms with
    #[arg(long, default_value_t = CLIENT_KEY)]
    client_key: u32,

    /// Extra MOVE attempts before a blocked robot is given up on
    #[arg(long, default_value_t = DEFAULT_MAX_STUCK_RETRIES)]
    max_stuck_retries: u32,

    /// Half-width of the search square
    #[arg(long, default_value_t = DEFAULT_SEARCH_RADIUS)]
    search_radius: i32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let args = Args::parse();

    let server = RobotServer::builder()
        .listen_addr(args.addr)
        .timeout(Duration::from_millis(args.timeout_ms))
        .recharge_timeout(Duration::from_millis(args.recharge_timeout_ms))
        .keys(args.server_key, args.client_key)
        .max_stuck_retries(args.max_stuck_retries)
        .search_radius(args.search_radius)
        .start()
        .await?;

    server.run().await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}
