use crate::types::{CommitRecord, ContributorTotals, LineTotals};

/// Sum added and deleted lines per contributor over the whole history.
///
/// Records without an author login are skipped.
pub fn aggregate_line_totals<'a, I>(records: I) -> ContributorTotals
where
    I: IntoIterator<Item = &'a CommitRecord>,
{
    let mut totals = ContributorTotals::new();

    for record in records {
        let Some(login) = &record.author_login else {
            continue;
        };

        let entry = totals.entry(login.clone()).or_default();
        entry.additions += record.additions;
        entry.deletions += record.deletions;
    }

    totals
}

/// Contributors ordered by lines changed, largest first.
///
/// Ties are broken by login so the order is stable.
pub fn rank_by_lines_changed(totals: &ContributorTotals) -> Vec<(String, LineTotals)> {
    let mut ranked: Vec<_> = totals
        .iter()
        .map(|(login, lines)| (login.clone(), *lines))
        .collect();
    ranked.sort_by(|a, b| b.1.changed().cmp(&a.1.changed()).then_with(|| a.0.cmp(&b.0)));
    ranked
}
