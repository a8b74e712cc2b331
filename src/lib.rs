//! # Contributor Activity Charts
//!
//! `contribgraph` fetches the commit history of one GitHub repository through
//! the GraphQL API and renders contributor statistics as PNG charts embedded in
//! web pages.
//!
//! ## Features
//!
//! - Cursor-paginated walk over the default branch history
//! - Weekly commit counts per contributor, bucketed by the Monday of each week
//! - Added and deleted line totals per contributor
//! - Cubic spline smoothing of each contributor's weekly curve
//! - Time-series, stacked-bar, bar and pie charts
//!
//! ## Example
//!
//! ```no_run
//! use contribgraph::analysis::aggregate_weekly;
//! use contribgraph::utils::{contributors, smooth_curve, week_axis, weekly_series};
//! use contribgraph::CommitRecord;
//! use chrono::DateTime;
//!
//! let records: Vec<CommitRecord> = ["2024-01-02", "2024-01-09", "2024-01-16", "2024-01-23"]
//!     .iter()
//!     .map(|d| {
//!         let ts = DateTime::parse_from_rfc3339(&format!("{d}T12:00:00Z")).unwrap();
//!         CommitRecord::new("octocat", ts)
//!     })
//!     .collect();
//!
//! let table = aggregate_weekly(&records);
//! let weeks = week_axis(&table);
//! for login in contributors(&table) {
//!     let points = weekly_series(&table, &weeks, &login);
//!     let curve = smooth_curve(&points).unwrap();
//!     println!("{login}: {} points", curve.len());
//! }
//! ```

pub mod analysis;
pub mod app;
pub mod config;
pub mod error;
pub mod plotting;
pub mod types;
pub mod utils;

// Re-export main types for convenience
pub use config::Config;
pub use error::{ChartError, Result};
pub use types::{
    CommitRecord, ContributorTotals, Credential, LineTotals, RepoCoordinates, WeekKey,
    WeeklyContributionTable,
};
