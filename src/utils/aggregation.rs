use crate::types::{WeekKey, WeeklyContributionTable};
use std::collections::{BTreeMap, BTreeSet};

/// All weeks that appear in the table, oldest first.
pub fn week_axis(table: &WeeklyContributionTable) -> Vec<WeekKey> {
    table.keys().copied().collect()
}

/// Every contributor that appears in the table, sorted by login.
pub fn contributors(table: &WeeklyContributionTable) -> Vec<String> {
    table
        .values()
        .flat_map(|week| week.keys())
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// One contributor's commit counts as `(week index, count)` points over `weeks`.
///
/// Weeks in which the contributor made no commit become explicit zero points.
pub fn weekly_series(
    table: &WeeklyContributionTable,
    weeks: &[WeekKey],
    login: &str,
) -> Vec<(f64, f64)> {
    weeks
        .iter()
        .enumerate()
        .map(|(i, week)| {
            let count = table
                .get(week)
                .and_then(|counts| counts.get(login))
                .copied()
                .unwrap_or(0);
            (i as f64, count as f64)
        })
        .collect()
}

/// Total commits per contributor, collapsed over the week dimension.
///
/// Sorted by count descending, then by login.
pub fn commit_totals(table: &WeeklyContributionTable) -> Vec<(String, usize)> {
    let mut totals: BTreeMap<&str, usize> = BTreeMap::new();
    for counts in table.values() {
        for (login, count) in counts {
            *totals.entry(login.as_str()).or_insert(0) += count;
        }
    }

    let mut totals: Vec<(String, usize)> = totals
        .into_iter()
        .map(|(login, count)| (login.to_string(), count))
        .collect();
    totals.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn week(date: &str) -> WeekKey {
        WeekKey::from_date(date.parse().unwrap())
    }

    fn sample_table() -> WeeklyContributionTable {
        let mut table = WeeklyContributionTable::new();
        table.insert(
            week("2024-01-01"),
            BTreeMap::from([("a".to_string(), 1), ("b".to_string(), 1)]),
        );
        table.insert(week("2024-01-15"), BTreeMap::from([("a".to_string(), 3)]));
        table.insert(week("2024-01-08"), BTreeMap::from([("c".to_string(), 2)]));
        table
    }

    #[test]
    fn test_week_axis_is_sorted() {
        let weeks = week_axis(&sample_table());
        let labels: Vec<_> = weeks.iter().map(|w| w.to_string()).collect();
        assert_eq!(labels, vec!["2024-01-01", "2024-01-08", "2024-01-15"]);
    }

    #[test]
    fn test_contributors() {
        assert_eq!(contributors(&sample_table()), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_series_fills_gaps_with_zero() {
        let table = sample_table();
        let weeks = week_axis(&table);
        assert_eq!(
            weekly_series(&table, &weeks, "a"),
            vec![(0.0, 1.0), (1.0, 0.0), (2.0, 3.0)]
        );
        assert_eq!(
            weekly_series(&table, &weeks, "c"),
            vec![(0.0, 0.0), (1.0, 2.0), (2.0, 0.0)]
        );
    }

    #[test]
    fn test_commit_totals() {
        assert_eq!(
            commit_totals(&sample_table()),
            vec![
                ("a".to_string(), 4),
                ("c".to_string(), 2),
                ("b".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_empty_table() {
        let table = WeeklyContributionTable::new();
        assert!(week_axis(&table).is_empty());
        assert!(contributors(&table).is_empty());
        assert!(commit_totals(&table).is_empty());
    }
}
