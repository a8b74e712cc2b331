//! # Common Types
//!
//! This module contains the common types used throughout the application for
//! representing fetched commit history and the statistics aggregated from it.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, Weekday};
use std::collections::BTreeMap;
use std::fmt;

/// A single commit as reported by the history API.
///
/// Line counts default to zero when the query did not request them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    /// Account login of the commit author, if the author maps to an account
    pub author_login: Option<String>,
    /// Commit timestamp in the offset reported upstream
    pub committed_at: Option<DateTime<FixedOffset>>,
    /// Lines added by the commit
    pub additions: u64,
    /// Lines deleted by the commit
    pub deletions: u64,
}

impl CommitRecord {
    /// A record without line counts.
    pub fn new(author_login: impl Into<String>, committed_at: DateTime<FixedOffset>) -> Self {
        Self {
            author_login: Some(author_login.into()),
            committed_at: Some(committed_at),
            additions: 0,
            deletions: 0,
        }
    }

    /// Attach line counts to the record.
    pub fn with_lines(mut self, additions: u64, deletions: u64) -> Self {
        self.additions = additions;
        self.deletions = deletions;
        self
    }
}

/// The Monday that starts the week containing a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeekKey(NaiveDate);

impl WeekKey {
    /// Week containing the given calendar date.
    pub fn from_date(date: NaiveDate) -> Self {
        let offset = i64::from(date.weekday().num_days_from_monday());
        Self(date - Duration::days(offset))
    }

    /// Week containing the given timestamp, using the timestamp's own offset.
    pub fn containing(timestamp: &DateTime<FixedOffset>) -> Self {
        Self::from_date(timestamp.date_naive())
    }

    /// The Monday this key stands for.
    pub fn start(&self) -> NaiveDate {
        self.0
    }

    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Commit counts per week, then per contributor login.
///
/// Only (week, contributor) pairs with at least one commit are present.
pub type WeeklyContributionTable = BTreeMap<WeekKey, BTreeMap<String, usize>>;

/// Lines added and deleted by one contributor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineTotals {
    pub additions: u64,
    pub deletions: u64,
}

impl LineTotals {
    pub fn new(additions: u64, deletions: u64) -> Self {
        Self {
            additions,
            deletions,
        }
    }

    /// Sum of additions and deletions, used to rank contributors.
    pub fn changed(&self) -> u64 {
        self.additions + self.deletions
    }
}

/// Line totals per contributor login across the whole history.
pub type ContributorTotals = BTreeMap<String, LineTotals>;

/// Owner and name of the repository being charted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoCoordinates {
    pub owner: String,
    pub name: String,
}

impl fmt::Display for RepoCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// A static API token passed through to the upstream service.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}
