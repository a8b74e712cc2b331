use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use serde::Deserialize;

use super::charts::{self, EncodedChart};
use super::AppState;
use crate::error::ChartError;

/// Page embedding one or more rendered charts.
#[derive(Template, WebTemplate)]
#[template(path = "charts.html")]
pub struct ChartsPage {
    pub heading: String,
    pub repo: String,
    pub charts: Vec<EncodedChart>,
}

/// Landing page linking the chart pages.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexPage {
    pub repo: Option<String>,
}

/// Optional per-request repository target for the time-series page.
#[derive(Debug, Default, Deserialize)]
pub struct GraphParams {
    pub owner: Option<String>,
    pub repo: Option<String>,
    pub token: Option<String>,
}

/// `GET /`
pub async fn index(State(state): State<AppState>) -> IndexPage {
    let github = &state.config.github;
    let repo = match (&github.owner, &github.repo) {
        (Some(owner), Some(name)) => Some(format!("{owner}/{name}")),
        _ => None,
    };
    IndexPage { repo }
}

/// `GET /contributors_graph?owner=..&repo=..&token=..`
///
/// Query parameters override the static configuration one by one.
pub async fn contributors_graph(
    State(state): State<AppState>,
    Query(params): Query<GraphParams>,
) -> Result<ChartsPage, ChartError> {
    let (repo, credential) = state.config.github.resolve(
        params.owner.as_deref(),
        params.repo.as_deref(),
        params.token.as_deref(),
    )?;

    let charts = charts::contributor_timeseries(&state, &repo, &credential).await?;
    Ok(ChartsPage {
        heading: "Weekly contributions".to_string(),
        repo: repo.to_string(),
        charts,
    })
}

/// `GET /lines_graph`
pub async fn lines_graph(State(state): State<AppState>) -> Result<ChartsPage, ChartError> {
    let (repo, credential) = state.config.github.static_target()?;

    let chart = charts::line_totals(&state, &repo, &credential).await?;
    Ok(ChartsPage {
        heading: "Lines added and deleted".to_string(),
        repo: repo.to_string(),
        charts: vec![chart],
    })
}

/// `GET /commits_graph`
pub async fn commits_graph(State(state): State<AppState>) -> Result<ChartsPage, ChartError> {
    let (repo, credential) = state.config.github.static_target()?;

    let charts = charts::commit_distribution(&state, &repo, &credential).await?;
    Ok(ChartsPage {
        heading: "Commits per contributor".to_string(),
        repo: repo.to_string(),
        charts,
    })
}
