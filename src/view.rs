//! Sorting and filtering transactions for display.

use crate::model::Transaction;
use crate::search::{compile_pattern, HighlightedRecord};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// The field transactions are sorted by.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Date,
    Description,
    Amount,
    Category,
}

serde_plain::derive_display_from_serialize!(SortBy);
serde_plain::derive_fromstr_from_deserialize!(SortBy);

impl SortBy {
    /// Text fields compare case-insensitively, amounts numerically.
    fn compare(self, a: &Transaction, b: &Transaction) -> Ordering {
        match self {
            SortBy::Date => compare_text(a.date(), b.date()),
            SortBy::Description => compare_text(a.description(), b.description()),
            SortBy::Amount => a.amount().cmp(&b.amount()),
            SortBy::Category => compare_text(a.category(), b.category()),
        }
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

serde_plain::derive_display_from_serialize!(SortOrder);
serde_plain::derive_fromstr_from_deserialize!(SortOrder);

impl SortOrder {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

/// Returns a sorted copy of `records`. Records that compare equal keep their relative order.
pub fn view(records: &[Transaction], sort_by: SortBy, order: SortOrder) -> Vec<Transaction> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| order.apply(sort_by.compare(a, b)));
    sorted
}

/// The current sort and search settings of a list.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct FilterState {
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
    /// An empty or absent pattern shows every record.
    pub pattern: Option<String>,
    pub case_sensitive: bool,
}

/// What a list should display.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", content = "records", rename_all = "camelCase")]
pub enum FilteredView {
    /// No search is active.
    All(Vec<Transaction>),
    /// The records matching the search, sorted, with matches highlighted.
    Matches(Vec<HighlightedRecord>),
    /// The search pattern could not be compiled.
    InvalidPattern,
}

impl FilterState {
    pub fn apply(&self, records: &[Transaction]) -> FilteredView {
        let Some(pattern) = self.pattern.as_deref().filter(|p| !p.is_empty()) else {
            return FilteredView::All(view(records, self.sort_by, self.sort_order));
        };
        let Some(matcher) = compile_pattern(pattern, self.case_sensitive) else {
            return FilteredView::InvalidPattern;
        };
        let found = matcher.search(records);
        let highlighted = view(&found, self.sort_by, self.sort_order)
            .iter()
            .map(|r| matcher.highlight_record(r))
            .collect();
        FilteredView::Matches(highlighted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::transaction;
    use std::str::FromStr;

    fn records() -> Vec<Transaction> {
        vec![
            transaction("rec_1", "banana", "12.5", "Food", "2024-05-03"),
            transaction("rec_2", "Apple", "3", "food", "2024-05-01"),
            transaction("rec_3", "cherry", "100", "Transport", "2024-05-02"),
        ]
    }

    fn ids(records: &[Transaction]) -> Vec<&str> {
        records.iter().map(|r| r.id()).collect()
    }

    #[test]
    fn test_parse_sort_keys() {
        assert_eq!(SortBy::from_str("amount").unwrap(), SortBy::Amount);
        assert_eq!(SortOrder::from_str("asc").unwrap(), SortOrder::Asc);
        assert!(SortBy::from_str("colour").is_err());
        assert!(SortOrder::from_str("up").is_err());
        assert_eq!(SortBy::Description.to_string(), "description");
        assert_eq!(SortOrder::Desc.to_string(), "desc");
    }

    #[test]
    fn test_sort_by_amount_is_numeric() {
        let sorted = view(&records(), SortBy::Amount, SortOrder::Asc);
        assert_eq!(ids(&sorted), vec!["rec_2", "rec_1", "rec_3"]);
    }

    #[test]
    fn test_sort_descending_reverses_distinct_keys() {
        let records = records();
        let asc = view(&records, SortBy::Amount, SortOrder::Asc);
        let mut desc = view(&records, SortBy::Amount, SortOrder::Desc);
        desc.reverse();
        assert_eq!(asc, desc);
    }

    #[test]
    fn test_sort_text_ignores_case() {
        let sorted = view(&records(), SortBy::Description, SortOrder::Asc);
        assert_eq!(ids(&sorted), vec!["rec_2", "rec_1", "rec_3"]);
        let sorted = view(&records(), SortBy::Date, SortOrder::Desc);
        assert_eq!(ids(&sorted), vec!["rec_1", "rec_3", "rec_2"]);
    }

    #[test]
    fn test_sort_is_stable_in_both_orders() {
        // "Food" and "food" compare equal.
        let asc = view(&records(), SortBy::Category, SortOrder::Asc);
        assert_eq!(ids(&asc), vec!["rec_1", "rec_2", "rec_3"]);
        let desc = view(&records(), SortBy::Category, SortOrder::Desc);
        assert_eq!(ids(&desc), vec!["rec_3", "rec_1", "rec_2"]);
    }

    #[test]
    fn test_view_does_not_modify_input() {
        let records = records();
        let before = records.clone();
        let _ = view(&records, SortBy::Amount, SortOrder::Desc);
        assert_eq!(records, before);
    }

    #[test]
    fn test_filter_without_pattern_shows_all() {
        let state = FilterState::default();
        let FilteredView::All(all) = state.apply(&records()) else {
            panic!("expected all records");
        };
        assert_eq!(ids(&all), vec!["rec_1", "rec_3", "rec_2"]);

        let state = FilterState {
            pattern: Some(String::new()),
            ..FilterState::default()
        };
        assert!(matches!(state.apply(&records()), FilteredView::All(_)));
    }

    #[test]
    fn test_filter_invalid_pattern() {
        let state = FilterState {
            pattern: Some("(".to_string()),
            ..FilterState::default()
        };
        assert_eq!(state.apply(&records()), FilteredView::InvalidPattern);
    }

    #[test]
    fn test_filter_matches_are_sorted_and_highlighted() {
        let state = FilterState {
            sort_by: SortBy::Amount,
            sort_order: SortOrder::Asc,
            pattern: Some("ban|pp".to_string()),
            case_sensitive: false,
        };
        let FilteredView::Matches(matches) = state.apply(&records()) else {
            panic!("expected matches");
        };
        let ids: Vec<&str> = matches.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["rec_2", "rec_1"]);
        assert_eq!(matches[0].description, "A<mark>pp</mark>le");
        assert_eq!(matches[1].description, "<mark>ban</mark>ana");
    }

    #[test]
    fn test_filter_case_sensitive() {
        let state = FilterState {
            pattern: Some("food".to_string()),
            case_sensitive: true,
            ..FilterState::default()
        };
        let FilteredView::Matches(matches) = state.apply(&records()) else {
            panic!("expected matches");
        };
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].category, "<mark>food</mark>");
    }
}
