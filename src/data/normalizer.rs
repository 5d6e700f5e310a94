//! Data Normalizer Module
//! Turns the raw text frame into a [`ReviewTable`].
//!
//! Every field transform is a pure function and degrades to an absent value
//! instead of failing. Only a missing required column aborts normalization.

use super::review_time::YearResolver;
use super::table::{Review, ReviewTable};
use polars::prelude::*;
use rayon::prelude::*;
use thiserror::Error;

/// Columns the normalizer reads, after [`clean_column_name`].
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "store_address",
    "rating",
    "review",
    "review_time",
    "latitude",
    "longitude",
];

#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Missing required column '{0}'")]
    MissingColumn(String),
}

/// Trim, lowercase and replace spaces with underscores. Idempotent.
pub fn clean_column_name(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

/// Apply [`clean_column_name`] to every column of `df`.
pub fn clean_column_names(df: &mut DataFrame) -> Result<(), NormalizeError> {
    let cleaned: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| clean_column_name(name.as_str()))
        .collect();
    df.set_column_names(cleaned)?;
    Ok(())
}

/// First ASCII digit of the raw rating ("4 stars" → 4.0).
///
/// Digits outside the 1..=5 star scale are treated as missing.
pub fn coerce_rating(raw: Option<&str>) -> Option<f64> {
    let digit = raw?.chars().find(|c| c.is_ascii_digit())?.to_digit(10)?;
    (1..=5).contains(&digit).then_some(f64::from(digit))
}

/// Keep ASCII letters, digits and spaces only.
pub fn sanitize_review(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .collect()
}

/// Town part of a comma-separated store address.
///
/// Three or more parts: the second one. Exactly two: the first one.
/// Otherwise, or for a missing address, the empty string.
pub fn extract_town(address: Option<&str>) -> String {
    let Some(address) = address else {
        return String::new();
    };

    let parts: Vec<&str> = address.split(',').collect();
    let town = match parts.as_slice() {
        [_, second, _, ..] => *second,
        [first, _] => *first,
        _ => "",
    };

    town.chars()
        .filter(|c| c.is_alphabetic() || c.is_whitespace())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Parse a latitude or longitude; non-finite values count as missing.
pub fn coerce_coordinate(raw: Option<&str>) -> Option<f64> {
    raw?.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Borrowed view of one raw row.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawRow<'a> {
    pub store_address: Option<&'a str>,
    pub rating: Option<&'a str>,
    pub review: Option<&'a str>,
    pub review_time: Option<&'a str>,
    pub latitude: Option<&'a str>,
    pub longitude: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    years: YearResolver,
}

impl Normalizer {
    pub fn new(years: YearResolver) -> Self {
        Self { years }
    }

    pub fn normalize_row(&self, raw: RawRow<'_>) -> Review {
        Review {
            store_address: raw.store_address.map(str::to_owned),
            store_town: extract_town(raw.store_address),
            latitude: coerce_coordinate(raw.latitude),
            longitude: coerce_coordinate(raw.longitude),
            review_time: raw.review_time.map(str::to_owned),
            review_year: raw.review_time.and_then(|phrase| self.years.resolve(phrase)),
            rating: coerce_rating(raw.rating),
            review: raw.review.map(sanitize_review),
        }
    }

    /// Single entry point: clean column names, then normalize every row.
    /// The input frame is left untouched.
    pub fn normalize(&self, raw: &DataFrame) -> Result<ReviewTable, NormalizeError> {
        let mut df = raw.clone();
        clean_column_names(&mut df)?;

        let [address, rating, review, time, latitude, longitude] = [
            text_column(&df, REQUIRED_COLUMNS[0])?,
            text_column(&df, REQUIRED_COLUMNS[1])?,
            text_column(&df, REQUIRED_COLUMNS[2])?,
            text_column(&df, REQUIRED_COLUMNS[3])?,
            text_column(&df, REQUIRED_COLUMNS[4])?,
            text_column(&df, REQUIRED_COLUMNS[5])?,
        ];

        let rows: Vec<Review> = (0..df.height())
            .into_par_iter()
            .map(|i| {
                self.normalize_row(RawRow {
                    store_address: address[i].as_deref(),
                    rating: rating[i].as_deref(),
                    review: review[i].as_deref(),
                    review_time: time[i].as_deref(),
                    latitude: latitude[i].as_deref(),
                    longitude: longitude[i].as_deref(),
                })
            })
            .collect();

        let unmapped_times = rows
            .iter()
            .filter(|r| r.review_time.is_some() && r.review_year.is_none())
            .count();
        let missing_towns = rows.iter().filter(|r| !r.has_town()).count();
        let missing_ratings = rows.iter().filter(|r| r.rating.is_none()).count();
        tracing::debug!(
            rows = rows.len(),
            unmapped_times,
            missing_towns,
            missing_ratings,
            anchor_year = self.years.anchor_year(),
            "normalized review table"
        );

        Ok(ReviewTable::new(rows))
    }
}

fn text_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>, NormalizeError> {
    let column = df
        .column(name)
        .map_err(|_| NormalizeError::MissingColumn(name.to_string()))?;
    let text = column.cast(&DataType::String)?;
    let values = text
        .as_materialized_series()
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_owned))
        .collect();
    Ok(values)
}
