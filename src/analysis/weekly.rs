use crate::types::{CommitRecord, WeekKey, WeeklyContributionTable};

/// Bucket commits by the Monday of their week and count them per contributor.
///
/// Records without an author login or a commit date are skipped.
pub fn aggregate_weekly<'a, I>(records: I) -> WeeklyContributionTable
where
    I: IntoIterator<Item = &'a CommitRecord>,
{
    let mut table = WeeklyContributionTable::new();

    for record in records {
        let (Some(login), Some(committed_at)) = (&record.author_login, &record.committed_at) else {
            continue;
        };

        let week = WeekKey::containing(committed_at);
        let counts = table.entry(week).or_default();
        let count = counts.entry(login.clone()).or_insert(0);
        *count += 1;
    }

    table
}
