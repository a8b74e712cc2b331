//! Contributor chart server
//!
//! Serves weekly commit, line total and commit share charts for one repository.

use anyhow::Context;
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

use contribgraph::app::{router, AppState};
use contribgraph::Config;

#[cfg(feature = "dev")]
const DEFAULT_LOG_FILTER: &str = "debug";
#[cfg(not(feature = "dev"))]
const DEFAULT_LOG_FILTER: &str = "info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    if config.github.token.is_none() {
        tracing::warn!("GITHUB_TOKEN is not set; only requests that pass a token will succeed");
    }

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address {:?}", config.listen_addr))?;
    let state = AppState::from_config(config).context("Failed to build HTTP client")?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, router(state)).await?;

    Ok(())
}
