//! Tabular rendering of query results.

use crate::data::{rows_to_dataframe, Review};
use polars::prelude::*;

/// Columns shown for a single town's reviews.
pub const TOWN_VIEW_COLUMNS: [&str; 3] = ["review", "rating", "review_year"];

/// Columns shown for keyword and year results.
pub const REVIEW_VIEW_COLUMNS: [&str; 3] = ["store_town", "review", "rating"];

/// Render `rows` as a DataFrame restricted to `columns`, in that order.
pub fn select_columns<'a>(
    rows: impl IntoIterator<Item = &'a Review>,
    columns: &[&str],
) -> PolarsResult<DataFrame> {
    let exprs: Vec<Expr> = columns.iter().map(|name| col(*name)).collect();
    rows_to_dataframe(rows)?.lazy().select(exprs).collect()
}
