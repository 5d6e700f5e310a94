//! Terminal and JSON renderings of aggregates and query results.

use crate::query::BattleOutcome;
use crate::stats::{round2, DatasetSummary, MapView, RatingBucket, TownCount, TownRating};
use serde::Serialize;

/// One map point with its hover text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapFeature<'a> {
    pub town: &'a str,
    pub lat: f64,
    pub lon: f64,
    pub avg_rating: f64,
    pub bucket: RatingBucket,
    pub color: [u8; 3],
    pub tooltip: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPayload<'a> {
    pub center: Option<(f64, f64)>,
    pub features: Vec<MapFeature<'a>>,
}

impl<'a> From<&'a MapView> for MapPayload<'a> {
    fn from(view: &'a MapView) -> Self {
        Self {
            center: view.center,
            features: view
                .towns
                .iter()
                .map(|t| MapFeature {
                    town: &t.town,
                    lat: t.lat,
                    lon: t.lon,
                    avg_rating: t.avg_rating,
                    bucket: t.bucket,
                    color: t.bucket.rgb(),
                    tooltip: t.tooltip(),
                })
                .collect(),
        }
    }
}

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}

/// Joins lines with a trailing newline, the way the CLI prints them.
fn lines(rows: Vec<String>) -> String {
    let mut out = rows.join("\n");
    out.push('\n');
    out
}

pub fn map_text(view: &MapView) -> String {
    let header = match view.center {
        Some((lat, lon)) => format!("View center: {lat:.4}, {lon:.4}"),
        None => "No towns with complete location and rating data.".to_string(),
    };
    let points = view.towns.iter().map(|town| {
        format!(
            "{:<28} {:>9.4} {:>10.4}  {:<9}  {}",
            town.town,
            town.lat,
            town.lon,
            town.bucket.label(),
            town.avg_rating
        )
    });
    lines(std::iter::once(header).chain(points).collect())
}

pub fn top_towns_text(counts: &[TownCount], ratings: &[TownRating]) -> String {
    let mut out = vec!["Most reviewed towns:".to_string()];
    out.extend(
        counts
            .iter()
            .enumerate()
            .map(|(rank, town)| format!("{:>2}. {:<28} {} reviews", rank + 1, town.town, town.count)),
    );
    out.push(String::new());
    out.push("Average rating of those towns:".to_string());
    out.extend(
        ratings
            .iter()
            .map(|town| format!("    {:<28} {}", town.town, round2(town.rating))),
    );
    lines(out)
}

pub fn summary_text(summary: &DatasetSummary) -> String {
    let mut out = match &summary.ratings {
        Some(ratings) => vec![
            format!("Maximum Rating: {}", ratings.max),
            format!("Minimum Rating: {}", ratings.min),
            format!("Average Rating: {}", round2(ratings.mean)),
        ],
        None => vec!["No valid ratings.".to_string()],
    };
    out.push(format!("Total Number of Reviews: {}", summary.total_reviews));

    if let Some(year) = &summary.busiest_year {
        out.push(format!(
            "Most Active Review Year: {} ({} reviews)",
            year.value, year.count
        ));
    }
    if let Some(word) = &summary.common_word {
        out.push(format!(
            "Most Common Word in Reviews: '{}' ({} times)",
            word.value, word.count
        ));
    }
    match &summary.best_worst {
        Some(pair) => {
            out.push(format!("Best Town: {} ({})", pair.best.town, pair.best.rating));
            out.push(format!("Worst Town: {} ({})", pair.worst.town, pair.worst.rating));
        }
        None => out.push("No rated towns.".to_string()),
    }
    lines(out)
}

pub fn battle_text(outcome: &BattleOutcome) -> String {
    let mut out = vec![format!(
        "In {}, out of {} reviews:",
        outcome.scope, outcome.first.population
    )];
    for tally in [&outcome.first, &outcome.second] {
        out.push(format!(" '{}' appeared {} times", tally.word, tally.count));
    }
    out.push(match outcome.winning_word() {
        Some(word) => format!(" '{word}' wins!"),
        None => "It's a tie!".to_string(),
    });
    lines(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Review, ReviewTable};
    use crate::query::{ReviewQuery, YearScope};
    use crate::stats::Aggregator;
    use pretty_assertions::assert_eq;

    fn table() -> ReviewTable {
        let row = |town: &str, rating: f64, text: &str| Review {
            store_town: town.to_string(),
            rating: Some(rating),
            review: Some(text.to_string()),
            review_year: Some("2024".into()),
            latitude: Some(30.0),
            longitude: Some(-97.0),
            ..Default::default()
        };
        ReviewTable::new(vec![
            row("Austin", 5.0, "good fries"),
            row("Austin", 4.0, "good"),
            row("Dallas", 1.0, "bad"),
        ])
    }

    #[test]
    fn summary_lists_every_statistic() {
        let text = summary_text(&Aggregator::summary(&table()));
        assert_eq!(
            text,
            "Maximum Rating: 5\n\
             Minimum Rating: 1\n\
             Average Rating: 3.33\n\
             Total Number of Reviews: 3\n\
             Most Active Review Year: 2024 (3 reviews)\n\
             Most Common Word in Reviews: 'good' (2 times)\n\
             Best Town: Austin (4.5)\n\
             Worst Town: Dallas (1)\n"
        );
    }

    #[test]
    fn empty_summary_is_plain() {
        let text = summary_text(&Aggregator::summary(&ReviewTable::default()));
        assert!(text.contains("No valid ratings."));
        assert!(text.contains("Total Number of Reviews: 0"));
        assert!(text.contains("No rated towns."));
    }

    #[test]
    fn battle_text_names_winner_or_tie() {
        let table = table();
        let query = ReviewQuery::new(&table);
        let text = battle_text(&query.battle("good", "bad", &YearScope::All));
        assert!(text.starts_with("In all years, out of 3 reviews:"));
        assert!(text.contains(" 'good' wins!"));

        let tie = battle_text(&query.battle("fries", "bad", &"2024".parse().unwrap()));
        assert!(tie.starts_with("In 2024, out of 3 reviews:"));
        assert!(tie.ends_with("It's a tie!\n"));
    }

    #[test]
    fn map_payload_carries_tooltips() {
        let view = Aggregator::map_view(&table());
        let payload = MapPayload::from(&view);
        assert_eq!(payload.features.len(), 2);
        assert_eq!(payload.features[0].tooltip, "Town: Austin | Avg Rating: 4.5");
        assert_eq!(payload.features[1].color, [255, 0, 0]);

        let json: serde_json::Value = serde_json::from_str(&to_json(&payload).unwrap()).unwrap();
        assert_eq!(json["features"][0]["bucket"], "excellent");
        assert_eq!(json["center"][0], 30.0);
    }
}
