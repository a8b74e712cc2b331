use thiserror::Error;

/// Errors raised while fetching, aggregating or rendering commit statistics.
#[derive(Error, Debug)]
pub enum ChartError {
    /// A required credential or repository coordinate is missing.
    #[error("{0}")]
    Configuration(String),
    /// The upstream response did not have the expected shape.
    #[error("{0}")]
    UpstreamProtocol(String),
    /// The repository or its contributions could not be found.
    #[error("{0}")]
    NotFound(String),
    /// Not enough data points to build the requested chart.
    #[error("{0}")]
    DataInsufficient(String),
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The upstream service answered with a server error status.
    #[error("upstream service unavailable (HTTP {0})")]
    UpstreamUnavailable(u16),
    #[error("rendering failed: {0}")]
    Render(String),
    #[error("{0}")]
    Unexpected(String),
}

impl ChartError {
    /// Whether a failed page request may succeed when sent again.
    pub fn is_transient(&self) -> bool {
        match self {
            ChartError::Transport(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            ChartError::UpstreamUnavailable(_) => true,
            _ => false,
        }
    }
}

impl From<tokio::task::JoinError> for ChartError {
    fn from(e: tokio::task::JoinError) -> Self {
        ChartError::Unexpected(e.to_string())
    }
}

impl From<image::ImageError> for ChartError {
    fn from(e: image::ImageError) -> Self {
        ChartError::Render(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ChartError>;
