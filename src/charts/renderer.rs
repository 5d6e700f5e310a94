//! Static Chart Renderer
//! Draws the dashboard charts to PNG files with plotters.
//!
//! Charts:
//! 1. Town map: one point per town at its mean coordinates, colored by bucket
//! 2. Bar chart: average rating of the busiest towns
//! 3. Line chart: number of reviews per year
//! 4. Histogram: distribution of ratings

use crate::stats::{HistogramBin, RatingBucket, TownAggregate, TownRating};
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters_backend::DrawingErrorKind;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

const FONT: &str = "sans-serif";
const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);
const BAR_BLUE: RGBColor = RGBColor(91, 155, 213);
const LINE_BLUE: RGBColor = RGBColor(31, 119, 180);

pub const MAP_FILE: &str = "town_map.png";
pub const TOP_TOWNS_FILE: &str = "top_towns.png";
pub const YEARS_FILE: &str = "reviews_per_year.png";
pub const HISTOGRAM_FILE: &str = "rating_histogram.png";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to create chart directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Chart drawing failed: {0}")]
    Draw(String),
    #[error("No usable font for chart text: {0}")]
    Font(String),
    #[error("Nothing to draw for {0}")]
    NoData(&'static str),
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for RenderError {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        match err {
            DrawingAreaErrorKind::BackendError(DrawingErrorKind::FontError(font)) => {
                RenderError::Font(font.to_string())
            }
            other => RenderError::Draw(other.to_string()),
        }
    }
}

fn bucket_color(bucket: RatingBucket) -> RGBColor {
    let [r, g, b] = bucket.rgb();
    RGBColor(r, g, b)
}

/// Pad a value range so points do not sit on the frame.
fn padded(min: f64, max: f64) -> std::ops::Range<f64> {
    let pad = ((max - min) * 0.1).max(0.5);
    (min - pad)..(max + pad)
}

/// Renders every dashboard chart into one directory.
pub struct StaticChartRenderer {
    width: u32,
    height: u32,
}

impl StaticChartRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    fn canvas<'a>(&self, path: &'a Path) -> DrawingArea<BitMapBackend<'a>, Shift> {
        BitMapBackend::new(path, (self.width, self.height)).into_drawing_area()
    }

    /// Scatter of towns at (lon, lat), colored by rating bucket.
    pub fn render_town_map(&self, towns: &[TownAggregate], path: &Path) -> Result<(), RenderError> {
        if towns.is_empty() {
            return Err(RenderError::NoData("town map"));
        }

        let lons = towns.iter().map(|t| t.lon);
        let lats = towns.iter().map(|t| t.lat);
        let x_range = padded(
            lons.clone().fold(f64::INFINITY, f64::min),
            lons.fold(f64::NEG_INFINITY, f64::max),
        );
        let y_range = padded(
            lats.clone().fold(f64::INFINITY, f64::min),
            lats.fold(f64::NEG_INFINITY, f64::max),
        );

        let root = self.canvas(path);
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Store Locations (Colored by Rating)", (FONT, 28.0))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(x_range, y_range)?;

        chart
            .configure_mesh()
            .x_desc("Longitude")
            .y_desc("Latitude")
            .draw()?;

        for bucket in [RatingBucket::Excellent, RatingBucket::Average, RatingBucket::Poor] {
            let color = bucket_color(bucket);
            chart
                .draw_series(
                    towns
                        .iter()
                        .filter(|t| t.bucket == bucket)
                        .map(|t| Circle::new((t.lon, t.lat), 6, color.filled())),
                )?
                .label(bucket.label())
                .legend(move |(x, y)| Circle::new((x, y), 5, color.filled()));
        }

        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;

        root.present()?;
        Ok(())
    }

    /// Bars of average rating for the busiest towns.
    pub fn render_top_towns(&self, ratings: &[TownRating], path: &Path) -> Result<(), RenderError> {
        if ratings.is_empty() {
            return Err(RenderError::NoData("top towns"));
        }

        let labels: Vec<&str> = ratings.iter().map(|r| r.town.as_str()).collect();
        let root = self.canvas(path);
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Average Rating of Top Most Reviewed Towns", (FONT, 28.0))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d((0u32..ratings.len() as u32).into_segmented(), 0f64..5f64)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .y_desc("Average rating")
            .x_label_formatter(&|v: &SegmentValue<u32>| match v {
                SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => {
                    labels.get(*i as usize).map(|s| s.to_string()).unwrap_or_default()
                }
                SegmentValue::Last => String::new(),
            })
            .draw()?;

        chart.draw_series(
            Histogram::vertical(&chart)
                .style(BAR_BLUE.filled())
                .margin(12)
                .data(ratings.iter().enumerate().map(|(i, r)| (i as u32, r.rating))),
        )?;

        root.present()?;
        Ok(())
    }

    /// Line of review counts, one point per year.
    pub fn render_reviews_per_year(
        &self,
        per_year: &BTreeMap<String, usize>,
        path: &Path,
    ) -> Result<(), RenderError> {
        let points: Vec<(i32, usize)> = per_year
            .iter()
            .filter_map(|(year, &count)| Some((year.parse::<i32>().ok()?, count)))
            .collect();
        let (Some(first), Some(last)) = (points.first(), points.last()) else {
            return Err(RenderError::NoData("reviews per year"));
        };
        let max_count = points.iter().map(|&(_, c)| c).max().unwrap_or(0);

        let root = self.canvas(path);
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Number of Reviews per Year", (FONT, 28.0))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(first.0 - 1..last.0 + 1, 0usize..max_count + max_count / 10 + 1)?;

        chart
            .configure_mesh()
            .x_desc("Year")
            .y_desc("Reviews")
            .x_label_formatter(&|year: &i32| year.to_string())
            .draw()?;

        chart.draw_series(LineSeries::new(points.iter().copied(), LINE_BLUE.stroke_width(2)))?;
        chart.draw_series(
            points
                .iter()
                .map(|&(year, count)| Circle::new((year, count), 4, LINE_BLUE.filled())),
        )?;

        root.present()?;
        Ok(())
    }

    /// Rating histogram with black-edged sky blue bars.
    pub fn render_rating_histogram(
        &self,
        bins: &[HistogramBin],
        path: &Path,
    ) -> Result<(), RenderError> {
        let (Some(first), Some(last)) = (bins.first(), bins.last()) else {
            return Err(RenderError::NoData("rating histogram"));
        };
        let max_count = bins.iter().map(|b| b.count).max().unwrap_or(0) as f64;

        let root = self.canvas(path);
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Distribution of Ratings", (FONT, 28.0))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(first.lower..last.upper, 0f64..max_count * 1.1 + 1.0)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc("Rating")
            .y_desc("Count")
            .draw()?;

        chart.draw_series(bins.iter().map(|b| {
            Rectangle::new([(b.lower, 0.0), (b.upper, b.count as f64)], SKY_BLUE.filled())
        }))?;
        chart.draw_series(bins.iter().map(|b| {
            Rectangle::new([(b.lower, 0.0), (b.upper, b.count as f64)], BLACK.stroke_width(1))
        }))?;

        root.present()?;
        Ok(())
    }
}

/// Everything the chart set is drawn from.
pub struct ChartInputs<'a> {
    pub towns: &'a [TownAggregate],
    pub top_towns: &'a [TownRating],
    pub per_year: &'a BTreeMap<String, usize>,
    pub histogram: &'a [HistogramBin],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chart {
    TownMap,
    TopTowns,
    ReviewsPerYear,
    RatingHistogram,
}

impl Chart {
    pub const ALL: [Chart; 4] = [
        Chart::TownMap,
        Chart::TopTowns,
        Chart::ReviewsPerYear,
        Chart::RatingHistogram,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            Chart::TownMap => MAP_FILE,
            Chart::TopTowns => TOP_TOWNS_FILE,
            Chart::ReviewsPerYear => YEARS_FILE,
            Chart::RatingHistogram => HISTOGRAM_FILE,
        }
    }
}

impl StaticChartRenderer {
    pub fn render(
        &self,
        chart: Chart,
        inputs: &ChartInputs<'_>,
        path: &Path,
    ) -> Result<(), RenderError> {
        match chart {
            Chart::TownMap => self.render_town_map(inputs.towns, path),
            Chart::TopTowns => self.render_top_towns(inputs.top_towns, path),
            Chart::ReviewsPerYear => self.render_reviews_per_year(inputs.per_year, path),
            Chart::RatingHistogram => self.render_rating_histogram(inputs.histogram, path),
        }
    }

    /// Draw every chart into `out_dir`, creating it if needed. Charts without
    /// data are skipped with a warning; returns the files written.
    pub fn render_all(
        &self,
        inputs: &ChartInputs<'_>,
        out_dir: &Path,
    ) -> Result<Vec<PathBuf>, RenderError> {
        std::fs::create_dir_all(out_dir).map_err(|source| RenderError::Io {
            path: out_dir.to_path_buf(),
            source,
        })?;

        let mut written = Vec::new();
        for chart in Chart::ALL {
            let path = out_dir.join(chart.file_name());
            match self.render(chart, inputs, &path) {
                Ok(()) => {
                    tracing::info!(path = %path.display(), "chart written");
                    written.push(path);
                }
                Err(RenderError::NoData(what)) => {
                    tracing::warn!(chart = what, "no data, chart skipped");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(written)
    }
}
