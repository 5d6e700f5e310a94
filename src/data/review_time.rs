//! Relative review times ("3 months ago") pinned to calendar years.
//!
//! The dataset only records how long before the scrape a review was written.
//! [`YearResolver`] turns those phrases into years relative to an anchor year.
//! [`DEFAULT_ANCHOR_YEAR`] is the collection year of the published dataset and
//! goes stale once the data is re-scraped; pass the new year explicitly then.

/// Collection year of the published review dataset.
pub const DEFAULT_ANCHOR_YEAR: i32 = 2025;

/// Exact phrase → number of years before the anchor year.
///
/// Anything up to four months old counts as the anchor year, five to eleven
/// months and "a year ago" as the year before.
const PHRASE_OFFSETS: &[(&str, i32)] = &[
    ("2 days ago", 0),
    ("3 days ago", 0),
    ("4 days ago", 0),
    ("5 days ago", 0),
    ("6 days ago", 0),
    ("a week ago", 0),
    ("2 weeks ago", 0),
    ("3 weeks ago", 0),
    ("4 weeks ago", 0),
    ("a month ago", 0),
    ("2 months ago", 0),
    ("3 months ago", 0),
    ("4 months ago", 0),
    ("5 months ago", 1),
    ("6 months ago", 1),
    ("7 months ago", 1),
    ("8 months ago", 1),
    ("9 months ago", 1),
    ("10 months ago", 1),
    ("11 months ago", 1),
    ("a year ago", 1),
    ("2 years ago", 2),
    ("3 years ago", 3),
    ("4 years ago", 4),
    ("5 years ago", 5),
    ("6 years ago", 6),
    ("7 years ago", 7),
    ("8 years ago", 8),
    ("9 years ago", 9),
    ("10 years ago", 10),
    ("11 years ago", 11),
    ("12 years ago", 12),
    ("13 years ago", 13),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearResolver {
    anchor_year: i32,
}

impl Default for YearResolver {
    fn default() -> Self {
        Self::new(DEFAULT_ANCHOR_YEAR)
    }
}

impl YearResolver {
    pub fn new(anchor_year: i32) -> Self {
        Self { anchor_year }
    }

    pub fn anchor_year(&self) -> i32 {
        self.anchor_year
    }

    /// Years between the anchor and `phrase`, if the phrase is known.
    pub fn offset(phrase: &str) -> Option<i32> {
        PHRASE_OFFSETS
            .iter()
            .find(|(known, _)| *known == phrase)
            .map(|&(_, offset)| offset)
    }

    /// Resolve a phrase to a 4-digit year string. Unknown phrases are `None`.
    pub fn resolve(&self, phrase: &str) -> Option<String> {
        Self::offset(phrase).map(|offset| (self.anchor_year - offset).to_string())
    }

    /// Every phrase the table knows, newest first.
    pub fn phrases() -> impl Iterator<Item = &'static str> {
        PHRASE_OFFSETS.iter().map(|&(phrase, _)| phrase)
    }
}
