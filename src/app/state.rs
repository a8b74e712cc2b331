use std::sync::Arc;

use crate::analysis::{HistoryFetcher, HttpTransport};
use crate::config::Config;
use crate::error::Result;
use crate::plotting::ChartRenderer;

/// Shared, read-only state handed to every request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub fetcher: HistoryFetcher,
    pub renderer: Arc<ChartRenderer>,
}

impl AppState {
    pub fn new(config: Config, fetcher: HistoryFetcher) -> Self {
        Self {
            config: Arc::new(config),
            fetcher,
            renderer: Arc::new(ChartRenderer::default()),
        }
    }

    /// State that talks to the configured GraphQL endpoint over HTTP.
    pub fn from_config(config: Config) -> Result<Self> {
        let transport = HttpTransport::new(&config.github.graphql_url, config.fetch.page_timeout)?;
        let fetcher = HistoryFetcher::new(Arc::new(transport), config.fetch.clone());
        Ok(Self::new(config, fetcher))
    }
}
