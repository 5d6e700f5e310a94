//! Data module - CSV loading, normalization and the review table

mod loader;
mod normalizer;
mod review_time;
mod table;

pub use loader::{DataLoader, Encoding, LoaderError};
pub use normalizer::{
    clean_column_name, clean_column_names, coerce_coordinate, coerce_rating, extract_town,
    sanitize_review, NormalizeError, Normalizer, RawRow, REQUIRED_COLUMNS,
};
pub use review_time::{YearResolver, DEFAULT_ANCHOR_YEAR};
pub use table::{rows_to_dataframe, Review, ReviewTable, COLUMNS};
