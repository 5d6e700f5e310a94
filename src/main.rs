//! Review Atlas - explore a CSV of customer reviews from the terminal.

use anyhow::Context;
use clap::{Parser, Subcommand};
use review_atlas::charts::{ChartInputs, StaticChartRenderer};
use review_atlas::config::Config;
use review_atlas::data::{DataLoader, Encoding, Normalizer, ReviewTable, YearResolver};
use review_atlas::query::{
    select_columns, ReviewQuery, YearScope, REVIEW_VIEW_COLUMNS, TOWN_VIEW_COLUMNS,
};
use review_atlas::report::{self, MapPayload};
use review_atlas::stats::Aggregator;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "review-atlas", about = "Customer review cleaning, filters & charts")]
struct Cli {
    /// TOML file layered over the built-in defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Review CSV to load (overrides `[dataset] path`).
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[arg(long, value_enum, global = true)]
    encoding: Option<Encoding>,

    /// Year the dataset was collected; relative review times resolve against it.
    #[arg(long, global = true)]
    anchor_year: Option<i32>,

    /// Log pipeline details to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the first rows of the cleaned (or raw) dataset.
    Preview {
        #[arg(long)]
        rows: Option<usize>,
        /// Show the file as loaded, before cleaning.
        #[arg(long)]
        raw: bool,
    },
    /// Towns as map points colored by average rating.
    Map {
        #[arg(long)]
        json: bool,
    },
    /// Most reviewed towns and their average rating.
    Towns {
        #[arg(long)]
        top: Option<usize>,
    },
    /// Reviews of one town.
    Town { name: String },
    /// Reviews containing a keyword, ignoring case.
    Search { keyword: String },
    /// Reviews from one year.
    Year { year: i32 },
    /// Which of two words appears in more reviews.
    Battle {
        first: String,
        second: String,
        /// "all" or a year.
        #[arg(long, default_value = "all")]
        year: YearScope,
    },
    /// Dataset summary with best and worst town.
    Summary {
        #[arg(long)]
        json: bool,
    },
    /// Render PNG charts.
    Charts {
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("review_atlas=debug")
    } else {
        EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(path) = &cli.data {
        config.dataset.path = path.clone();
    }
    if let Some(encoding) = cli.encoding {
        config.dataset.encoding = encoding;
    }
    if let Some(year) = cli.anchor_year {
        config.calendar.anchor_year = year;
    }
    Ok(config)
}

fn load_table(config: &Config) -> anyhow::Result<(DataLoader, ReviewTable)> {
    let mut loader = DataLoader::new();
    let raw = loader
        .load_csv(&config.dataset.path, config.dataset.encoding)
        .with_context(|| format!("loading {}", config.dataset.path.display()))?;
    let table = Normalizer::new(YearResolver::new(config.calendar.anchor_year))
        .normalize(raw)
        .context("normalizing reviews")?;
    Ok((loader, table))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(&cli)?;
    let (loader, table) = load_table(&config)?;
    let query = ReviewQuery::new(&table);

    match cli.command {
        Command::Preview { rows, raw } => {
            let rows = rows.unwrap_or(config.views.preview_rows);
            let df = if raw {
                println!("Columns: {}", loader.get_columns().join(", "));
                loader
                    .get_dataframe()
                    .context("no dataset loaded")?
                    .head(Some(rows))
            } else {
                table.to_dataframe()?.head(Some(rows))
            };
            println!("{} rows in total", loader.get_row_count());
            println!("{df}");
        }
        Command::Map { json } => {
            let view = Aggregator::map_view(&table);
            if json {
                println!("{}", report::to_json(&MapPayload::from(&view))?);
            } else {
                print!("{}", report::map_text(&view));
            }
        }
        Command::Towns { top } => {
            let n = top.unwrap_or(config.views.top_towns);
            let counts = Aggregator::top_towns(&table, n);
            let ratings = Aggregator::top_town_ratings(&table, n);
            print!("{}", report::top_towns_text(&counts, &ratings));
        }
        Command::Town { name } => {
            let rows = query.by_town(&name);
            if rows.is_empty() {
                println!("No reviews for town '{name}'.");
            } else {
                println!("{}", select_columns(rows, &TOWN_VIEW_COLUMNS)?);
            }
        }
        Command::Search { keyword } => {
            let matches = query.by_keyword(&keyword);
            println!("Found {} reviews containing '{}'", matches.count(), keyword);
            if !matches.is_empty() {
                println!("{}", select_columns(matches.rows, &REVIEW_VIEW_COLUMNS)?);
            }
        }
        Command::Year { year } => {
            if !config.views.year_in_range(year) {
                tracing::warn!(
                    year,
                    min = config.views.year_min,
                    max = config.views.year_max,
                    "year outside the picker range"
                );
            }
            let rows = query.by_year(year);
            println!("Reviews from {year}");
            if rows.is_empty() {
                println!("No reviews from {year}.");
            } else {
                println!("{}", select_columns(rows, &REVIEW_VIEW_COLUMNS)?);
            }
        }
        Command::Battle {
            first,
            second,
            year,
        } => {
            let outcome = query.battle(&first, &second, &year);
            print!("{}", report::battle_text(&outcome));
        }
        Command::Summary { json } => {
            let summary = Aggregator::summary(&table);
            if json {
                println!("{}", report::to_json(&summary)?);
            } else {
                print!("{}", report::summary_text(&summary));
            }
        }
        Command::Charts { out } => {
            let out_dir = out.unwrap_or_else(|| config.charts.output_dir.clone());
            let towns = Aggregator::town_aggregates(&table);
            let top_towns = Aggregator::top_town_ratings(&table, config.views.top_towns);
            let per_year = Aggregator::reviews_per_year(&table);
            let histogram = Aggregator::rating_histogram(&table, config.views.histogram_bins);

            let renderer = StaticChartRenderer::new(config.charts.width, config.charts.height);
            let written = renderer
                .render_all(
                    &ChartInputs {
                        towns: &towns,
                        top_towns: &top_towns,
                        per_year: &per_year,
                        histogram: &histogram,
                    },
                    &out_dir,
                )
                .context("rendering charts")?;
            for path in written {
                println!("{}", path.display());
            }
        }
    }

    Ok(())
}
