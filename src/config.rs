//! Configuration types for review-atlas.
//!
//! [`Config::load`] layers an optional user TOML file on top of the embedded
//! defaults. [`Config::defaults`] returns the defaults without touching the
//! filesystem (useful in tests).

use crate::data::Encoding;
use serde::Deserialize;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[dataset]
path     = "McDonald_s_Reviews.csv"
encoding = "latin1"

[calendar]
# Year the dataset was scraped; relative review times resolve against it.
anchor_year = 2025

[views]
top_towns      = 5
year_min       = 2013
year_max       = 2025
histogram_bins = 5
preview_rows   = 10

[charts]
output_dir = "charts"
width      = 1024
height     = 768
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub dataset: DatasetConfig,
    pub calendar: CalendarConfig,
    pub views: ViewsConfig,
    pub charts: ChartsConfig,
}

/// `[dataset]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetConfig {
    pub path: PathBuf,
    pub encoding: Encoding,
}

/// `[calendar]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct CalendarConfig {
    pub anchor_year: i32,
}

/// `[views]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ViewsConfig {
    pub top_towns: usize,
    /// Inclusive bounds of the year picker.
    pub year_min: i32,
    pub year_max: i32,
    pub histogram_bins: usize,
    pub preview_rows: usize,
}

impl ViewsConfig {
    pub fn year_in_range(&self, year: i32) -> bool {
        (self.year_min..=self.year_max).contains(&year)
    }
}

/// `[charts]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartsConfig {
    pub output_dir: PathBuf,
    pub width: u32,
    pub height: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Embedded defaults, overridden by `path` when given. A given path that
    /// does not exist is an error.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml));
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        builder.build()?.try_deserialize().map_err(Into::into)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
