#![allow(dead_code)]

use async_trait::async_trait;
use contribgraph::analysis::{GraphqlTransport, HistoryFetcher};
use contribgraph::app::{router, AppState};
use contribgraph::config::{Config, FetchOptions};
use contribgraph::{ChartError, Credential};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// A commit served by [`FakeGithub`]: login, committed date, additions, deletions.
pub type FakeCommit = (&'static str, &'static str, u64, u64);

/// In-memory stand-in for the GraphQL history endpoint.
pub enum FakeGithub {
    History(Vec<FakeCommit>),
    /// Always answers with this body
    Fixed(Value),
}

#[async_trait]
impl GraphqlTransport for FakeGithub {
    async fn execute(&self, credential: &Credential, body: &Value) -> Result<Value, ChartError> {
        assert!(!credential.expose().is_empty());
        let commits = match self {
            FakeGithub::Fixed(value) => return Ok(value.clone()),
            FakeGithub::History(commits) => commits,
        };

        let vars = &body["variables"];
        let first = vars["first"].as_u64().unwrap() as usize;
        let start = vars["after"]
            .as_str()
            .map(|c| c.parse::<usize>().unwrap())
            .unwrap_or(0);
        let end = (start + first).min(commits.len());

        let edges: Vec<Value> = commits[start..end]
            .iter()
            .map(|(login, date, additions, deletions)| {
                json!({ "node": {
                    "author": { "user": { "login": login } },
                    "committedDate": format!("{date}T12:00:00Z"),
                    "additions": additions,
                    "deletions": deletions,
                } })
            })
            .collect();

        Ok(json!({
            "data": { "repository": { "defaultBranchRef": { "target": { "history": {
                "edges": edges,
                "pageInfo": { "hasNextPage": end < commits.len(), "endCursor": end.to_string() }
            } } } } }
        }))
    }
}

/// Four weeks of activity from two contributors.
pub fn sample_history() -> Vec<FakeCommit> {
    vec![
        ("alice", "2024-01-02", 120, 10),
        ("bob", "2024-01-03", 5, 5),
        ("alice", "2024-01-09", 30, 0),
        ("alice", "2024-01-10", 12, 4),
        ("bob", "2024-01-17", 0, 40),
        ("alice", "2024-01-24", 8, 2),
        ("bob", "2024-01-25", 3, 1),
    ]
}

pub fn configured(vars: &[(&str, &str)]) -> Config {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_lookup(|key| map.get(key).cloned()).unwrap()
}

pub fn static_config() -> Config {
    configured(&[
        ("GITHUB_TOKEN", "test-token"),
        ("GITHUB_OWNER", "octo"),
        ("GITHUB_REPO", "hello"),
    ])
}

pub fn app(config: Config, github: FakeGithub) -> axum::Router {
    let options = FetchOptions {
        page_size: 3,
        ..config.fetch.clone()
    };
    let fetcher = HistoryFetcher::new(Arc::new(github), options);
    router(AppState::new(config, fetcher))
}
