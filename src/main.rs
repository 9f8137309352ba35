//! Duel server (default binary).
//!
//! Reads `TETRIS_DUEL_*` from the environment, logs through `RUST_LOG`
//! (default `info`) and serves until Ctrl-C.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tetris_duel::server::{run_server, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from_env();
    info!(?config, "starting tetris duel server");

    tokio::select! {
        result = run_server(config, None) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown requested");
            Ok(())
        }
    }
}
