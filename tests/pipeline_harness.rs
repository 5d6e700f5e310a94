//! Pipeline integration harness.
//!
//! # What this covers
//!
//! - **Loading**: the fixture CSV is read from disk with Latin-1 decoding,
//!   including a byte that is invalid UTF-8.
//! - **Normalization**: column names with stray spaces and capitals, town
//!   extraction, year mapping, rating and coordinate coercion.
//! - **Aggregates**: map points, volume ranking, best/worst town, summary.
//! - **Failures**: missing files and missing required columns.
//!
//! # What this does NOT cover
//!
//! - PNG chart output (needs system fonts)
//!
//! # Running
//!
//! ```sh
//! cargo test --test pipeline_harness
//! ```

mod common;

use common::*;
use pretty_assertions::assert_eq;
use review_atlas::data::{
    DataLoader, Encoding, LoaderError, NormalizeError, Normalizer, ReviewTable, YearResolver,
};
use review_atlas::stats::{Aggregator, RatingBucket, TownRating};
use std::io::Write;

fn load(encoding: Encoding) -> ReviewTable {
    let file = fixture_csv();
    let mut loader = DataLoader::new();
    let raw = loader.load_csv(file.path(), encoding).unwrap();
    Normalizer::default().normalize(raw).unwrap()
}

// ---------------------------------------------------------------------------
// Loading & normalization
// ---------------------------------------------------------------------------

#[test]
fn raw_frame_is_left_untouched() {
    let file = fixture_csv();
    let mut loader = DataLoader::new();
    let raw = loader.load_csv(file.path(), Encoding::Latin1).unwrap().clone();
    let _ = Normalizer::default().normalize(&raw).unwrap();

    assert_eq!(loader.get_row_count(), ROWS.len());
    assert!(loader.get_columns().contains(&"Store Address".to_string()));
    assert!(raw.get_column_names().iter().any(|c| c.as_str() == "latitude "));
}

#[test]
fn every_row_is_kept_and_derived() {
    let table = load(Encoding::Latin1);
    assert_eq!(table.len(), ROWS.len());

    let towns: Vec<&str> = table.iter().map(|r| r.store_town.as_str()).collect();
    assert_eq!(
        towns,
        vec!["Austin", "Austin", "Austin", "Dallas", "Dallas", "Brooklyn", "", "Montr\u{e9}al"]
    );

    let years: Vec<Option<&str>> = table.iter().map(|r| r.review_year.as_deref()).collect();
    assert_eq!(
        years,
        vec![
            Some("2025"),
            Some("2025"),
            Some("2023"),
            Some("2024"),
            Some("2014"),
            Some("2025"),
            None,
            Some("2025"),
        ]
    );

    let ratings: Vec<Option<f64>> = table.iter().map(|r| r.rating).collect();
    assert_eq!(
        ratings,
        vec![
            Some(1.0),
            Some(5.0),
            Some(3.0),
            Some(2.0),
            Some(2.0),
            Some(4.0),
            None,
            Some(4.0),
        ]
    );

    let unknown = &table.rows()[6];
    assert_eq!(unknown.coordinates(), None);
    assert_eq!(
        table.rows()[1].review.as_deref(),
        Some("Great fries Friendly staff clean restaurant")
    );
    assert_eq!(table.rows()[7].review.as_deref(), Some("Caf was okay"));
}

#[test]
fn lossy_utf8_drops_the_undecodable_letter() {
    let table = load(Encoding::Utf8Lossy);
    assert_eq!(table.rows()[7].store_town, "Montral");
}

#[test]
fn anchor_year_moves_every_year() {
    let file = fixture_csv();
    let mut loader = DataLoader::new();
    let raw = loader.load_csv(file.path(), Encoding::Latin1).unwrap();
    let table = Normalizer::new(YearResolver::new(2026)).normalize(raw).unwrap();
    assert_eq!(table.rows()[0].review_year.as_deref(), Some("2026"));
    assert_eq!(table.rows()[4].review_year.as_deref(), Some("2015"));
}

#[test]
fn normalization_is_deterministic() {
    assert_eq!(load(Encoding::Latin1), load(Encoding::Latin1));
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

#[test]
fn map_points_cover_complete_towns() {
    let table = load(Encoding::Latin1);
    let towns = Aggregator::town_aggregates(&table);

    let summary: Vec<(&str, f64, RatingBucket)> = towns
        .iter()
        .map(|t| (t.town.as_str(), t.avg_rating, t.bucket))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Austin", 3.0, RatingBucket::Average),
            ("Brooklyn", 4.0, RatingBucket::Excellent),
            ("Dallas", 2.0, RatingBucket::Poor),
            ("Montr\u{e9}al", 4.0, RatingBucket::Excellent),
        ]
    );
    assert!((towns[0].lat - 30.4607176).abs() < 1e-9);
}

#[test]
fn ranking_and_best_worst() {
    let table = load(Encoding::Latin1);

    let top: Vec<(String, usize)> = Aggregator::top_towns(&table, 5)
        .into_iter()
        .map(|t| (t.town, t.count))
        .collect();
    assert_eq!(
        top,
        vec![
            ("Austin".to_string(), 3),
            ("Dallas".to_string(), 2),
            ("Brooklyn".to_string(), 1),
            ("".to_string(), 1),
            ("Montr\u{e9}al".to_string(), 1),
        ]
    );

    let pair = Aggregator::best_and_worst_town(&table).unwrap();
    assert_eq!(
        pair.best,
        TownRating {
            town: "Brooklyn".into(),
            rating: 4.0
        }
    );
    assert_eq!(
        pair.worst,
        TownRating {
            town: "Dallas".into(),
            rating: 2.0
        }
    );
}

#[test]
fn summary_statistics() {
    let table = load(Encoding::Latin1);
    let summary = Aggregator::summary(&table);

    assert_eq!(summary.total_reviews, 8);
    let ratings = summary.ratings.unwrap();
    assert_eq!((ratings.max, ratings.min, ratings.count), (5.0, 1.0, 7));
    assert!((ratings.mean - 3.0).abs() < 1e-9);

    let year = summary.busiest_year.unwrap();
    assert_eq!((year.value.as_str(), year.count), ("2025", 4));
    let word = summary.common_word.unwrap();
    assert_eq!((word.value.as_str(), word.count), ("fries", 2));

    let per_year: Vec<(String, usize)> = Aggregator::reviews_per_year(&table).into_iter().collect();
    assert_eq!(
        per_year,
        vec![
            ("2014".to_string(), 1),
            ("2023".to_string(), 1),
            ("2024".to_string(), 1),
            ("2025".to_string(), 4),
        ]
    );
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[test]
fn missing_file_fails_the_load() {
    let mut loader = DataLoader::new();
    let err = loader
        .load_csv("/no/such/reviews.csv", Encoding::Latin1)
        .unwrap_err();
    assert!(matches!(err, LoaderError::Io { .. }));
}

#[test]
fn missing_required_column_fails_normalization() {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "store_address,review,review_time,latitude,longitude").unwrap();
    writeln!(file, "\"a, Austin, TX\",ok,a week ago,1,2").unwrap();

    let mut loader = DataLoader::new();
    let raw = loader.load_csv(file.path(), Encoding::Latin1).unwrap();
    let err = Normalizer::default().normalize(raw).unwrap_err();
    assert!(matches!(err, NormalizeError::MissingColumn(ref c) if c == "rating"));
}
