//! Builds the grouped listing behind an index page. An index is either the
//! main index (every entry) or a tag index (entries carrying one tag); in
//! both cases entries are sorted newest-first and grouped by calendar month.

use crate::entry::Entry;
use crate::tag::Tag;

/// The entries of one `(year, month)` in date-descending order.
#[derive(Debug, PartialEq)]
pub struct Group<'a> {
    pub year: i32,
    pub month: u32,
    pub entries: Vec<&'a Entry>,
}

/// Filters `entries` by `tag_filter` (if any), sorts them by date descending,
/// and groups them by `(year, month)`. Groups come out newest-first. Entries
/// with equal dates keep their relative order from `entries`.
pub fn build_index<'a>(
    entries: &'a [Entry],
    tag_filter: Option<&Tag>,
) -> Vec<Group<'a>> {
    let mut selected: Vec<&Entry> = match tag_filter {
        None => entries.iter().collect(),
        Some(tag) => entries.iter().filter(|e| e.has_tag(tag)).collect(),
    };
    selected.sort_by(|a, b| b.date.cmp(&a.date));

    let mut groups: Vec<Group> = Vec::new();
    for entry in selected {
        let (year, month) = entry.month_key();
        match groups.last_mut() {
            Some(group) if group.year == year && group.month == month => {
                group.entries.push(entry)
            }
            _ => groups.push(Group {
                year,
                month,
                entries: vec![entry],
            }),
        }
    }
    groups
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::BTreeSet;

    fn entry(title: &str, y: i32, m: u32, d: u32, tags: &[&str]) -> Entry {
        Entry {
            title: title.to_owned(),
            url: format!("/{}/", title),
            date: NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            tags: tags.iter().map(|t| t.to_string()).collect::<BTreeSet<_>>(),
        }
    }

    fn keys<'a>(groups: &'a [Group<'a>]) -> Vec<(i32, u32, Vec<&'a str>)> {
        groups
            .iter()
            .map(|g| {
                (
                    g.year,
                    g.month,
                    g.entries.iter().map(|e| e.title.as_str()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn test_groups_by_month_descending() {
        let entries = vec![
            entry("early-may", 2024, 5, 2, &[]),
            entry("december", 2023, 12, 1, &[]),
            entry("late-may", 2024, 5, 10, &[]),
        ];
        assert_eq!(
            vec![
                (2024, 5, vec!["late-may", "early-may"]),
                (2023, 12, vec!["december"]),
            ],
            keys(&build_index(&entries, None)),
        );
    }

    #[test]
    fn test_same_month_different_years_are_separate_groups() {
        let entries = vec![
            entry("a", 2023, 5, 1, &[]),
            entry("b", 2024, 5, 1, &[]),
        ];
        assert_eq!(
            vec![(2024, 5, vec!["b"]), (2023, 5, vec!["a"])],
            keys(&build_index(&entries, None)),
        );
    }

    #[test]
    fn test_equal_dates_keep_input_order() {
        let entries = vec![
            entry("first", 2024, 1, 1, &[]),
            entry("second", 2024, 1, 1, &[]),
            entry("third", 2024, 1, 1, &[]),
        ];
        assert_eq!(
            vec![(2024, 1, vec!["first", "second", "third"])],
            keys(&build_index(&entries, None)),
        );
    }

    #[test]
    fn test_tag_filter() {
        let entries = vec![
            entry("rusty", 2024, 3, 1, &["rust"]),
            entry("gopher", 2024, 2, 1, &["go"]),
            entry("both", 2023, 1, 1, &["go", "rust"]),
            entry("untagged", 2022, 1, 1, &[]),
        ];
        assert_eq!(
            vec![(2024, 2, vec!["gopher"]), (2023, 1, vec!["both"])],
            keys(&build_index(&entries, Some(&Tag::new("go")))),
        );
        assert!(build_index(&entries, Some(&Tag::new("zig"))).is_empty());
        assert_eq!(4, build_index(&entries, None).len());
    }

    #[test]
    fn test_tag_filter_matches_case_variants() {
        let entries = vec![
            entry("upper", 2024, 3, 1, &["Rust"]),
            entry("lower", 2024, 2, 1, &["rust"]),
            entry("other", 2024, 1, 1, &["go"]),
        ];
        assert_eq!(
            vec![(2024, 3, vec!["upper"]), (2024, 2, vec!["lower"])],
            keys(&build_index(&entries, Some(&Tag::new("rust")))),
        );
    }

    #[test]
    fn test_order_is_descending_within_and_across_groups() {
        let entries: Vec<Entry> = (0..60)
            .map(|i| {
                // Scatter dates over a few years in a non-sorted order.
                let n = (i * 37) % 60;
                entry(&i.to_string(), 2020 + n / 20, 1 + (n % 12) as u32, 1 + (n % 28) as u32, &[])
            })
            .collect();
        let flattened: Vec<&Entry> = build_index(&entries, None)
            .into_iter()
            .flat_map(|g| g.entries)
            .collect();
        assert_eq!(entries.len(), flattened.len());
        for pair in flattened.windows(2) {
            assert!(pair[0].date >= pair[1].date);
        }
    }
}
