//! Read-only filters over the review table.

use crate::data::{Review, ReviewTable};
use std::collections::HashSet;

/// Case-insensitive substring test; `needle` must already be lowercase.
pub(crate) fn contains_lowercase(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Reviews whose text contains a keyword.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordMatches<'a> {
    pub keyword: String,
    pub rows: Vec<&'a Review>,
}

impl KeywordMatches<'_> {
    pub fn count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Parameterized views over a borrowed [`ReviewTable`]. Every call is
/// evaluated from scratch and returns borrowed rows.
#[derive(Debug, Clone, Copy)]
pub struct ReviewQuery<'a> {
    pub(crate) table: &'a ReviewTable,
}

impl<'a> ReviewQuery<'a> {
    pub fn new(table: &'a ReviewTable) -> Self {
        Self { table }
    }

    /// Rows whose town equals `town` exactly.
    pub fn by_town(&self, town: &str) -> Vec<&'a Review> {
        self.table.iter().filter(|r| r.store_town == town).collect()
    }

    /// Rows whose review contains `keyword`, ignoring case. Rows without a
    /// review never match, and neither does an empty keyword.
    pub fn by_keyword(&self, keyword: &str) -> KeywordMatches<'a> {
        let needle = keyword.to_lowercase();
        let rows = if needle.is_empty() {
            Vec::new()
        } else {
            self.table
                .iter()
                .filter(|r| {
                    r.review
                        .as_deref()
                        .is_some_and(|text| contains_lowercase(text, &needle))
                })
                .collect()
        };

        tracing::debug!(keyword, matches = rows.len(), "keyword filter");
        KeywordMatches {
            keyword: keyword.to_string(),
            rows,
        }
    }

    /// Rows from `year`. A year absent from the data gives an empty result.
    pub fn by_year(&self, year: i32) -> Vec<&'a Review> {
        let year = year.to_string();
        self.table
            .iter()
            .filter(|r| r.review_year.as_deref() == Some(year.as_str()))
            .collect()
    }

    /// Distinct towns in order of first appearance, the empty town included.
    pub fn towns(&self) -> Vec<&'a str> {
        let mut seen = HashSet::new();
        self.table
            .iter()
            .map(|r| r.store_town.as_str())
            .filter(|town| seen.insert(*town))
            .collect()
    }

    /// Distinct review years, newest first.
    pub fn years_descending(&self) -> Vec<&'a str> {
        let mut years: Vec<&str> = self
            .table
            .iter()
            .filter_map(|r| r.review_year.as_deref())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        years.sort_unstable_by(|a, b| b.cmp(a));
        years
    }
}
