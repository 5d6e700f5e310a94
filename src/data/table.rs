//! The normalized review table.

use polars::prelude::*;
use serde::Serialize;

/// Column order of [`ReviewTable::to_dataframe`].
pub const COLUMNS: [&str; 8] = [
    "store_address",
    "store_town",
    "latitude",
    "longitude",
    "review_time",
    "review_year",
    "rating",
    "review",
];

/// One cleaned review row.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Review {
    pub store_address: Option<String>,
    /// Derived from `store_address`; empty when the address has no town.
    pub store_town: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub review_time: Option<String>,
    /// Derived from `review_time`.
    pub review_year: Option<String>,
    pub rating: Option<f64>,
    pub review: Option<String>,
}

impl Review {
    pub fn has_town(&self) -> bool {
        !self.store_town.is_empty()
    }

    /// `(latitude, longitude)` when both are present.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}

/// Immutable result of normalization. Aggregates and queries only borrow it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewTable {
    rows: Vec<Review>,
}

impl ReviewTable {
    pub fn new(rows: Vec<Review>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Review] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Review> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        rows_to_dataframe(self.rows.iter())
    }
}

impl<'a> IntoIterator for &'a ReviewTable {
    type Item = &'a Review;
    type IntoIter = std::slice::Iter<'a, Review>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Build a DataFrame with [`COLUMNS`] from any subset of rows.
pub fn rows_to_dataframe<'a>(
    rows: impl IntoIterator<Item = &'a Review>,
) -> PolarsResult<DataFrame> {
    let mut addresses: Vec<Option<String>> = Vec::new();
    let mut towns: Vec<String> = Vec::new();
    let mut latitudes: Vec<Option<f64>> = Vec::new();
    let mut longitudes: Vec<Option<f64>> = Vec::new();
    let mut times: Vec<Option<String>> = Vec::new();
    let mut years: Vec<Option<String>> = Vec::new();
    let mut ratings: Vec<Option<f64>> = Vec::new();
    let mut reviews: Vec<Option<String>> = Vec::new();

    for row in rows {
        addresses.push(row.store_address.clone());
        towns.push(row.store_town.clone());
        latitudes.push(row.latitude);
        longitudes.push(row.longitude);
        times.push(row.review_time.clone());
        years.push(row.review_year.clone());
        ratings.push(row.rating);
        reviews.push(row.review.clone());
    }

    DataFrame::new(vec![
        Column::new(COLUMNS[0].into(), addresses),
        Column::new(COLUMNS[1].into(), towns),
        Column::new(COLUMNS[2].into(), latitudes),
        Column::new(COLUMNS[3].into(), longitudes),
        Column::new(COLUMNS[4].into(), times),
        Column::new(COLUMNS[5].into(), years),
        Column::new(COLUMNS[6].into(), ratings),
        Column::new(COLUMNS[7].into(), reviews),
    ])
}
