//! Fetch, aggregate and render pipelines behind each page.
//!
//! Each pipeline produces either every chart it is responsible for or an
//! error; partial chart sets are never returned.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::info;

use super::AppState;
use crate::analysis::{aggregate_line_totals, aggregate_weekly, rank_by_lines_changed, HistoryFields};
use crate::error::{ChartError, Result};
use crate::plotting::ChartRenderer;
use crate::types::{Credential, RepoCoordinates, WeeklyContributionTable};
use crate::utils::{commit_totals, contributors, smooth_curve, week_axis, weekly_series};

/// A rendered chart ready to embed as a data URI.
#[derive(Debug, Clone)]
pub struct EncodedChart {
    pub title: String,
    /// Base64-encoded PNG
    pub img_data: String,
}

impl EncodedChart {
    fn png(title: impl Into<String>, png: &[u8]) -> Self {
        Self {
            title: title.into(),
            img_data: STANDARD.encode(png),
        }
    }
}

fn no_contributors() -> ChartError {
    ChartError::NotFound("no contributors found".to_string())
}

/// One weekly commit chart per contributor.
pub async fn contributor_timeseries(
    state: &AppState,
    repo: &RepoCoordinates,
    credential: &Credential,
) -> Result<Vec<EncodedChart>> {
    let records = state
        .fetcher
        .fetch(repo, credential, HistoryFields::Commits)
        .await?;
    let table = aggregate_weekly(&records);
    if table.is_empty() {
        return Err(no_contributors());
    }

    let renderer = state.renderer.clone();
    let charts = tokio::task::spawn_blocking(move || render_timeseries(&renderer, &table)).await??;
    info!(%repo, charts = charts.len(), "rendered contributor charts");
    Ok(charts)
}

/// Smooth and render each contributor's weekly series.
pub fn render_timeseries(
    renderer: &ChartRenderer,
    table: &WeeklyContributionTable,
) -> Result<Vec<EncodedChart>> {
    let weeks = week_axis(table);

    contributors(table)
        .into_iter()
        .map(|login| {
            let points = weekly_series(table, &weeks, &login);
            let curve = smooth_curve(&points)?;
            let png = renderer.contributor_timeseries(&login, &weeks, &points, &curve)?;
            Ok(EncodedChart::png(login, &png))
        })
        .collect()
}

/// Stacked added/deleted lines per contributor.
pub async fn line_totals(
    state: &AppState,
    repo: &RepoCoordinates,
    credential: &Credential,
) -> Result<EncodedChart> {
    let records = state
        .fetcher
        .fetch(repo, credential, HistoryFields::CommitsWithLines)
        .await?;
    let totals = aggregate_line_totals(&records);
    if totals.is_empty() {
        return Err(no_contributors());
    }

    let ranked = rank_by_lines_changed(&totals);
    let renderer = state.renderer.clone();
    let png = tokio::task::spawn_blocking(move || renderer.line_totals(&ranked)).await??;
    info!(%repo, contributors = totals.len(), "rendered line totals");
    Ok(EncodedChart::png("Lines added and deleted", &png))
}

/// Bar and pie charts of total commits per contributor.
pub async fn commit_distribution(
    state: &AppState,
    repo: &RepoCoordinates,
    credential: &Credential,
) -> Result<Vec<EncodedChart>> {
    let records = state
        .fetcher
        .fetch(repo, credential, HistoryFields::Commits)
        .await?;
    let table = aggregate_weekly(&records);
    let totals = commit_totals(&table);
    if totals.is_empty() {
        return Err(no_contributors());
    }

    let renderer = state.renderer.clone();
    let (bars, pie) = tokio::task::spawn_blocking(move || renderer.commit_totals(&totals)).await??;
    info!(%repo, "rendered commit distribution");
    Ok(vec![
        EncodedChart::png("Total commits", &bars),
        EncodedChart::png("Commit share", &pie),
    ])
}
