//! Review Aggregator Module
//! Grouped statistics over a normalized [`ReviewTable`].
//!
//! Every function recomputes from the table; nothing is cached because the
//! table never changes after normalization.

use crate::data::{Review, ReviewTable};
use serde::Serialize;
use statrs::statistics::Statistics;
use std::collections::{BTreeMap, HashMap};

/// Round to two decimals, the precision ratings are reported with.
/// Exact halves go to the even neighbour: 2.625 becomes 2.62.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Discrete color class of a town's average rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RatingBucket {
    Excellent,
    Average,
    Poor,
}

impl RatingBucket {
    pub const EXCELLENT_FROM: f64 = 4.0;
    pub const AVERAGE_FROM: f64 = 3.0;

    /// Lower edges are inclusive: 4.0 is excellent, 3.0 is average.
    pub fn from_average(average: f64) -> Self {
        if average >= Self::EXCELLENT_FROM {
            RatingBucket::Excellent
        } else if average >= Self::AVERAGE_FROM {
            RatingBucket::Average
        } else {
            RatingBucket::Poor
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RatingBucket::Excellent => "excellent",
            RatingBucket::Average => "average",
            RatingBucket::Poor => "poor",
        }
    }

    pub fn rgb(self) -> [u8; 3] {
        match self {
            RatingBucket::Excellent => [0, 200, 0],
            RatingBucket::Average => [255, 255, 0],
            RatingBucket::Poor => [255, 0, 0],
        }
    }
}

/// Per-town rollup used by the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TownAggregate {
    pub town: String,
    /// Rounded to two decimals.
    pub avg_rating: f64,
    pub lat: f64,
    pub lon: f64,
    pub bucket: RatingBucket,
    pub reviews: usize,
}

impl TownAggregate {
    pub fn tooltip(&self) -> String {
        format!("Town: {} | Avg Rating: {}", self.town, self.avg_rating)
    }
}

/// Map payload: one point per town plus the view center.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    /// `(lat, lon)` mean of the town points; `None` without points.
    pub center: Option<(f64, f64)>,
    pub towns: Vec<TownAggregate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TownCount {
    pub town: String,
    pub count: usize,
}

/// A town paired with its average rating.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TownRating {
    pub town: String,
    pub rating: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BestWorst {
    pub best: TownRating,
    pub worst: TownRating,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequentValue {
    pub value: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingSummary {
    pub max: f64,
    pub min: f64,
    pub mean: f64,
    /// Rows with a valid rating.
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub total_reviews: usize,
    pub ratings: Option<RatingSummary>,
    pub busiest_year: Option<FrequentValue>,
    pub common_word: Option<FrequentValue>,
    pub best_worst: Option<BestWorst>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Default)]
struct TownAccumulator {
    ratings: Vec<f64>,
    lats: Vec<f64>,
    lons: Vec<f64>,
}

/// Stateless aggregate queries.
pub struct Aggregator;

impl Aggregator {
    /// Average rating and location per town, over rows with valid
    /// coordinates, rating and town. Sorted by town name.
    pub fn town_aggregates(table: &ReviewTable) -> Vec<TownAggregate> {
        let mut groups: BTreeMap<&str, TownAccumulator> = BTreeMap::new();

        for row in table.iter().filter(|r| r.has_town()) {
            let (Some((lat, lon)), Some(rating)) = (row.coordinates(), row.rating) else {
                continue;
            };
            let acc = groups.entry(row.store_town.as_str()).or_default();
            acc.ratings.push(rating);
            acc.lats.push(lat);
            acc.lons.push(lon);
        }

        groups
            .into_iter()
            .map(|(town, acc)| {
                let avg_rating = round2(acc.ratings.iter().mean());
                TownAggregate {
                    town: town.to_string(),
                    avg_rating,
                    lat: acc.lats.iter().mean(),
                    lon: acc.lons.iter().mean(),
                    bucket: RatingBucket::from_average(avg_rating),
                    reviews: acc.ratings.len(),
                }
            })
            .collect()
    }

    pub fn map_view(table: &ReviewTable) -> MapView {
        let towns = Self::town_aggregates(table);
        let center = (!towns.is_empty()).then(|| {
            (
                towns.iter().map(|t| t.lat).mean(),
                towns.iter().map(|t| t.lon).mean(),
            )
        });
        MapView { center, towns }
    }

    /// Towns by row count, highest first. Ties keep first-appearance order.
    /// The empty town is ranked like any other value.
    pub fn top_towns(table: &ReviewTable, n: usize) -> Vec<TownCount> {
        ranked_counts(table.iter().map(|r| r.store_town.as_str()))
            .into_iter()
            .take(n)
            .map(|(town, count)| TownCount {
                town: town.to_string(),
                count,
            })
            .collect()
    }

    /// Mean rating of each of the `n` busiest towns, best first.
    /// Towns without a single valid rating are left out.
    pub fn top_town_ratings(table: &ReviewTable, n: usize) -> Vec<TownRating> {
        let mut ratings: Vec<TownRating> = Self::top_towns(table, n)
            .into_iter()
            .filter_map(|top| {
                let values = valid_ratings(table.iter().filter(|r| r.store_town == top.town));
                (!values.is_empty()).then(|| TownRating {
                    town: top.town,
                    rating: values.iter().mean(),
                })
            })
            .collect();
        ratings.sort_by(|a, b| b.rating.total_cmp(&a.rating));
        ratings
    }

    /// Max, min and mean over valid ratings. Missing ratings are skipped.
    pub fn rating_summary(table: &ReviewTable) -> Option<RatingSummary> {
        let values = valid_ratings(table.iter());
        if values.is_empty() {
            return None;
        }
        Some(RatingSummary {
            max: Statistics::max(values.iter()),
            min: Statistics::min(values.iter()),
            mean: values.iter().mean(),
            count: values.len(),
        })
    }

    /// Review count per year, oldest year first.
    pub fn reviews_per_year(table: &ReviewTable) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for year in table.iter().filter_map(|r| r.review_year.as_deref()) {
            *counts.entry(year.to_string()).or_insert(0) += 1;
        }
        counts
    }

    pub fn busiest_year(table: &ReviewTable) -> Option<FrequentValue> {
        most_frequent(table.iter().filter_map(|r| r.review_year.as_deref()))
    }

    /// Most frequent lowercase whitespace-separated token across reviews.
    pub fn common_word(table: &ReviewTable) -> Option<FrequentValue> {
        let lowered: Vec<String> = table
            .iter()
            .filter_map(|r| r.review.as_deref())
            .map(str::to_lowercase)
            .collect();
        most_frequent(lowered.iter().flat_map(|review| review.split_whitespace()))
    }

    /// Best and worst town by mean rating over every town with at least one
    /// valid rating. No minimum sample size: one review is enough.
    /// Ties go to the alphabetically first town.
    pub fn best_and_worst_town(table: &ReviewTable) -> Option<BestWorst> {
        let mut by_town: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
        for row in table.iter() {
            if let Some(rating) = row.rating {
                by_town.entry(row.store_town.as_str()).or_default().push(rating);
            }
        }

        let means: Vec<(&str, f64)> = by_town
            .into_iter()
            .map(|(town, ratings)| (town, ratings.iter().mean()))
            .collect();

        let (mut best, mut worst) = (*means.first()?, *means.first()?);
        for &(town, mean) in &means[1..] {
            if mean > best.1 {
                best = (town, mean);
            }
            if mean < worst.1 {
                worst = (town, mean);
            }
        }

        Some(BestWorst {
            best: TownRating {
                town: best.0.to_string(),
                rating: round2(best.1),
            },
            worst: TownRating {
                town: worst.0.to_string(),
                rating: round2(worst.1),
            },
        })
    }

    /// Equal-width histogram of valid ratings between their min and max.
    pub fn rating_histogram(table: &ReviewTable, bins: usize) -> Vec<HistogramBin> {
        histogram(&valid_ratings(table.iter()), bins)
    }

    pub fn summary(table: &ReviewTable) -> DatasetSummary {
        DatasetSummary {
            total_reviews: table.len(),
            ratings: Self::rating_summary(table),
            busiest_year: Self::busiest_year(table),
            common_word: Self::common_word(table),
            best_worst: Self::best_and_worst_town(table),
        }
    }
}

fn valid_ratings<'a>(rows: impl Iterator<Item = &'a Review>) -> Vec<f64> {
    rows.filter_map(|r| r.rating).collect()
}

/// Distinct values by count, highest first; ties in first-appearance order.
fn ranked_counts<'a>(items: impl IntoIterator<Item = &'a str>) -> Vec<(&'a str, usize)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, usize)> = Vec::new();

    for item in items {
        match index.get(item) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(item, counts.len());
                counts.push((item, 1));
            }
        }
    }

    // stable: equal counts keep insertion order
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

fn most_frequent<'a>(items: impl IntoIterator<Item = &'a str>) -> Option<FrequentValue> {
    ranked_counts(items)
        .into_iter()
        .next()
        .map(|(value, count)| FrequentValue {
            value: value.to_string(),
            count,
        })
}

/// Equal-width bins; the last bin is closed on the right. A single distinct
/// value gets a unit-wide range centered on it.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let min = Statistics::min(values.iter());
    let max = Statistics::max(values.iter());
    let (lower, upper) = if min == max {
        (min - 0.5, max + 0.5)
    } else {
        (min, max)
    };
    let width = (upper - lower) / bins as f64;

    let mut counts = vec![0usize; bins];
    for &value in values {
        let idx = (((value - lower) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: lower + width * i as f64,
            upper: if i + 1 == bins {
                upper
            } else {
                lower + width * (i + 1) as f64
            },
            count,
        })
        .collect()
}
