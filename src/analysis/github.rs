use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_retry::strategy::ExponentialBackoff;
use tokio_retry::RetryIf;
use tracing::{debug, info, warn};

use crate::config::FetchOptions;
use crate::error::{ChartError, Result};
use crate::types::{CommitRecord, Credential, RepoCoordinates};

const HISTORY_QUERY: &str = r#"
query($owner: String!, $name: String!, $first: Int!, $after: String) {
  repository(owner: $owner, name: $name) {
    defaultBranchRef {
      target {
        ... on Commit {
          history(first: $first, after: $after) {
            edges {
              node {
                author { user { login } }
                committedDate
              }
            }
            pageInfo { hasNextPage endCursor }
          }
        }
      }
    }
  }
}
"#;

const HISTORY_WITH_LINES_QUERY: &str = r#"
query($owner: String!, $name: String!, $first: Int!, $after: String) {
  repository(owner: $owner, name: $name) {
    defaultBranchRef {
      target {
        ... on Commit {
          history(first: $first, after: $after) {
            edges {
              node {
                author { user { login } }
                committedDate
                additions
                deletions
              }
            }
            pageInfo { hasNextPage endCursor }
          }
        }
      }
    }
  }
}
"#;

/// Which commit fields a history walk requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryFields {
    /// Author login and commit date
    Commits,
    /// Author login, commit date, and added/deleted line counts
    CommitsWithLines,
}

impl HistoryFields {
    fn query(self) -> &'static str {
        match self {
            HistoryFields::Commits => HISTORY_QUERY,
            HistoryFields::CommitsWithLines => HISTORY_WITH_LINES_QUERY,
        }
    }
}

/// Sends one GraphQL request and returns the decoded JSON body.
#[async_trait]
pub trait GraphqlTransport: Send + Sync {
    async fn execute(&self, credential: &Credential, body: &Value) -> Result<Value>;
}

/// [`GraphqlTransport`] backed by a `reqwest` client.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>, page_timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(page_timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl GraphqlTransport for HttpTransport {
    async fn execute(&self, credential: &Credential, body: &Value) -> Result<Value> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(credential.expose())
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if status.is_server_error() {
            return Err(ChartError::UpstreamUnavailable(status.as_u16()));
        }
        if !status.is_success() {
            return Err(ChartError::UpstreamProtocol(format!(
                "malformed API response: upstream returned {status}"
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ChartError::UpstreamProtocol(format!("malformed API response: {e}")))
    }
}

// Every level is optional so that a missing piece can be reported precisely.
#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    data: Option<ResponseData>,
    #[serde(default)]
    errors: Vec<GraphqlErrorMessage>,
}

#[derive(Debug, Deserialize)]
struct GraphqlErrorMessage {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ResponseData {
    repository: Option<RepositoryNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepositoryNode {
    default_branch_ref: Option<BranchRef>,
}

#[derive(Debug, Deserialize)]
struct BranchRef {
    target: Option<CommitTarget>,
}

#[derive(Debug, Deserialize)]
struct CommitTarget {
    history: Option<History>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct History {
    edges: Option<Vec<Edge>>,
    page_info: Option<PageInfo>,
}

#[derive(Debug, Deserialize)]
struct Edge {
    node: Option<CommitNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommitNode {
    author: Option<GitActor>,
    committed_date: Option<DateTime<FixedOffset>>,
    additions: Option<u64>,
    deletions: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct GitActor {
    user: Option<UserNode>,
}

#[derive(Debug, Deserialize)]
struct UserNode {
    login: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    #[serde(default)]
    has_next_page: bool,
    end_cursor: Option<String>,
}

/// Cursor state of one history walk.
#[derive(Debug, Default)]
struct PaginationCursor {
    token: Option<String>,
    has_more: bool,
}

/// One decoded page of history.
#[derive(Debug)]
enum Page {
    /// The repository has no default branch, so there is no history to walk
    Empty,
    Commits {
        records: Vec<CommitRecord>,
        page_info: PageInfo,
    },
}

fn parse_page(body: Value) -> Result<Page> {
    let response: GraphqlResponse = serde_json::from_value(body)
        .map_err(|e| ChartError::UpstreamProtocol(format!("malformed API response: {e}")))?;

    let upstream_message = response.errors.first().map(|e| e.message.clone());
    let data = match (response.data, upstream_message) {
        (_, Some(message)) => {
            return Err(ChartError::UpstreamProtocol(format!(
                "malformed API response: {message}"
            )))
        }
        (None, None) => {
            return Err(ChartError::UpstreamProtocol(
                "malformed API response".to_string(),
            ))
        }
        (Some(data), None) => data,
    };

    let repository = data
        .repository
        .ok_or_else(|| ChartError::NotFound("repository not found".to_string()))?;

    let Some(branch) = repository.default_branch_ref else {
        return Ok(Page::Empty);
    };

    let edges = branch
        .target
        .and_then(|target| target.history)
        .and_then(|history| history.edges.map(|edges| (edges, history.page_info)));

    let Some((edges, page_info)) = edges else {
        return Err(ChartError::NotFound("no contributions found".to_string()));
    };

    let records = edges
        .into_iter()
        .filter_map(|edge| edge.node)
        .filter_map(|node| {
            let login = node.author?.user?.login?;
            let committed_at = node.committed_date?;
            Some(
                CommitRecord::new(login, committed_at)
                    .with_lines(node.additions.unwrap_or(0), node.deletions.unwrap_or(0)),
            )
        })
        .collect();

    Ok(Page::Commits {
        records,
        page_info: page_info.unwrap_or_default(),
    })
}

/// Walks the default branch history of a repository page by page.
#[derive(Clone)]
pub struct HistoryFetcher {
    transport: Arc<dyn GraphqlTransport>,
    options: FetchOptions,
}

impl HistoryFetcher {
    pub fn new(transport: Arc<dyn GraphqlTransport>, options: FetchOptions) -> Self {
        Self { transport, options }
    }

    pub fn options(&self) -> &FetchOptions {
        &self.options
    }

    /// Fetch every commit reachable from the default branch, in arrival order.
    ///
    /// Edges without an author login or commit date are dropped.
    pub async fn fetch(
        &self,
        repo: &RepoCoordinates,
        credential: &Credential,
        fields: HistoryFields,
    ) -> Result<Vec<CommitRecord>> {
        if repo.owner.trim().is_empty() || repo.name.trim().is_empty() {
            return Err(ChartError::Configuration(
                "repository owner and name are required".to_string(),
            ));
        }
        if credential.expose().trim().is_empty() {
            return Err(ChartError::Configuration("API token is required".to_string()));
        }

        let start_time = Instant::now();
        let mut records = Vec::new();
        let mut cursor = PaginationCursor {
            token: None,
            has_more: true,
        };
        let mut pages = 0usize;

        while cursor.has_more {
            if pages == self.options.max_pages {
                return Err(ChartError::Unexpected(format!(
                    "commit history of {repo} exceeds {} pages",
                    self.options.max_pages
                )));
            }

            let body = json!({
                "query": fields.query(),
                "variables": {
                    "owner": repo.owner,
                    "name": repo.name,
                    "first": self.options.page_size,
                    "after": cursor.token,
                },
            });

            let page = parse_page(self.request_page(credential, &body).await?)?;
            pages += 1;

            match page {
                Page::Empty if pages == 1 => {
                    debug!(%repo, "repository has no default branch");
                    cursor.has_more = false;
                }
                Page::Empty => {
                    return Err(ChartError::UpstreamProtocol(
                        "malformed API response: default branch vanished mid-walk".to_string(),
                    ));
                }
                Page::Commits { records: batch, page_info } => {
                    debug!(%repo, page = pages, commits = batch.len(), "fetched history page");
                    if page_info.has_next_page && page_info.end_cursor.is_none() {
                        return Err(ChartError::UpstreamProtocol(
                            "malformed API response: next page without cursor".to_string(),
                        ));
                    }
                    records.extend(batch);
                    cursor = PaginationCursor {
                        has_more: page_info.has_next_page,
                        token: page_info.end_cursor,
                    };
                }
            }
        }

        info!(
            %repo,
            pages,
            commits = records.len(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "fetched commit history"
        );

        Ok(records)
    }

    async fn request_page(&self, credential: &Credential, body: &Value) -> Result<Value> {
        let strategy = ExponentialBackoff::from_millis(2)
            .factor(100)
            .max_delay(Duration::from_secs(5))
            .take(self.options.max_retries);

        RetryIf::spawn(
            strategy,
            || self.transport.execute(credential, body),
            |e: &ChartError| {
                let retry = e.is_transient();
                if retry {
                    warn!(error = %e, "page request failed, retrying");
                }
                retry
            },
        )
        .await
    }
}
