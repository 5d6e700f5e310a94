//! Stats module - Grouped aggregates over the review table

mod aggregator;

pub use aggregator::{
    histogram, round2, Aggregator, BestWorst, DatasetSummary, FrequentValue, HistogramBin,
    MapView, RatingBucket, RatingSummary, TownAggregate, TownCount, TownRating,
};
