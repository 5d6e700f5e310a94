//! Review Atlas - customer review cleaning, aggregation & charts
//!
//! Pipeline: [`data::DataLoader`] reads the CSV, [`data::Normalizer`] turns it
//! into an immutable [`data::ReviewTable`], which [`stats::Aggregator`] and
//! [`query::ReviewQuery`] borrow. [`charts`] and [`report`] only consume their
//! outputs.

pub mod charts;
pub mod config;
pub mod data;
pub mod query;
pub mod report;
pub mod stats;
