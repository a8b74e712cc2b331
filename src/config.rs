//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and shared read-only afterwards.
//! A `.env` file in the working directory is read first when present.
//!
//! ## Repository variables
//!
//! - `GITHUB_TOKEN` - API credential
//! - `GITHUB_OWNER` - repository owner
//! - `GITHUB_REPO` - repository name
//!
//! These may be absent at startup. Endpoints that rely on them fail with a
//! configuration error until they are provided.
//!
//! ## Optional Variables
//!
//! - `GITHUB_GRAPHQL_URL` - API endpoint (default: `https://api.github.com/graphql`)
//! - `LISTEN` - Bind address (default: `127.0.0.1:5000`)
//! - `PAGE_SIZE` - Commits requested per page, 1 to 100 (default: 100)
//! - `MAX_PAGES` - Pages walked before a fetch is abandoned (default: 1000)
//! - `PAGE_TIMEOUT_SECS` - Timeout for one page request (default: 30)
//! - `MAX_RETRIES` - Retries of a page after a transient failure (default: 2)
//! - `RUST_LOG` - Log filter (default: `info`)

use anyhow::{bail, Context, Result};
use std::time::Duration;

use crate::error::ChartError;
use crate::types::{Credential, RepoCoordinates};

pub const DEFAULT_GRAPHQL_URL: &str = "https://api.github.com/graphql";

/// Largest page the history API serves.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub github: GithubSettings,
    pub fetch: FetchOptions,
}

/// Static repository and credential settings.
#[derive(Debug, Clone, Default)]
pub struct GithubSettings {
    pub token: Option<String>,
    pub owner: Option<String>,
    pub repo: Option<String>,
    pub graphql_url: String,
}

/// Limits applied to one walk over the commit history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    pub page_size: u32,
    pub max_pages: usize,
    pub page_timeout: Duration,
    pub max_retries: usize,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            page_size: MAX_PAGE_SIZE,
            max_pages: 1000,
            page_timeout: Duration::from_secs(30),
            max_retries: 2,
        }
    }
}

impl Config {
    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric setting cannot be parsed or is out of range.
    pub fn from_env() -> Result<Self> {
        // A missing .env file is fine
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let github = GithubSettings {
            token: non_empty("GITHUB_TOKEN"),
            owner: non_empty("GITHUB_OWNER"),
            repo: non_empty("GITHUB_REPO"),
            graphql_url: non_empty("GITHUB_GRAPHQL_URL")
                .unwrap_or_else(|| DEFAULT_GRAPHQL_URL.to_string()),
        };

        let defaults = FetchOptions::default();
        let page_size = parse_or(&lookup, "PAGE_SIZE", defaults.page_size)?;
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            bail!("PAGE_SIZE must be between 1 and {MAX_PAGE_SIZE}, got {page_size}");
        }
        let max_pages = parse_or(&lookup, "MAX_PAGES", defaults.max_pages)?;
        if max_pages == 0 {
            bail!("MAX_PAGES must be at least 1");
        }
        let timeout_secs = parse_or(&lookup, "PAGE_TIMEOUT_SECS", defaults.page_timeout.as_secs())?;
        let max_retries = parse_or(&lookup, "MAX_RETRIES", defaults.max_retries)?;

        Ok(Self {
            listen_addr: non_empty("LISTEN").unwrap_or_else(|| "127.0.0.1:5000".to_string()),
            github,
            fetch: FetchOptions {
                page_size,
                max_pages,
                page_timeout: Duration::from_secs(timeout_secs),
                max_retries,
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        _ => Ok(default),
    }
}

impl GithubSettings {
    /// Repository coordinates and credential, with per-request overrides taking precedence.
    ///
    /// Fails with [`ChartError::Configuration`] if any of the three is missing.
    pub fn resolve(
        &self,
        owner: Option<&str>,
        repo: Option<&str>,
        token: Option<&str>,
    ) -> Result<(RepoCoordinates, Credential), ChartError> {
        let pick = |over: Option<&str>, fallback: &Option<String>| {
            over.filter(|v| !v.trim().is_empty())
                .map(str::to_string)
                .or_else(|| fallback.clone())
        };

        match (
            pick(owner, &self.owner),
            pick(repo, &self.repo),
            pick(token, &self.token),
        ) {
            (Some(owner), Some(name), Some(token)) => {
                Ok((RepoCoordinates { owner, name }, Credential::new(token)))
            }
            _ => Err(ChartError::Configuration(
                "owner, repo and token are required".to_string(),
            )),
        }
    }

    /// Coordinates and credential from static configuration only.
    pub fn static_target(&self) -> Result<(RepoCoordinates, Credential), ChartError> {
        self.resolve(None, None, None)
    }
}
