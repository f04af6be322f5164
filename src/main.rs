//! CLI entry point for the collision heatmap.
//!
//! Loads the crash dataset once, then answers a filter query, prints the
//! filter vocabularies, or summarizes the loaded data.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use collision_heatmap::config::Config;
use collision_heatmap::dataset::Dataset;
use collision_heatmap::engine::filter::{
    FilterSelection, Selection, parse_day_of_week, parse_factor, parse_first_harmful_event,
    parse_hour_of_day, parse_light_condition, parse_month, parse_severity,
    parse_surface_condition, parse_weather_condition,
};
use collision_heatmap::engine::metric::Metric;
use collision_heatmap::engine::options::FilterOptions;
use collision_heatmap::engine::run_query;
use collision_heatmap::output::{log_summary, to_pretty_json, write_cells_csv, write_json_file};
use collision_heatmap::record::Severity;
use collision_heatmap::storage::{
    SourceLocation, load_dataset, s3_client, source_for, write_json_to_s3,
};
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "collision_heatmap")]
#[command(about = "Filter and aggregate traffic collisions into a geographic heatmap", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter the dataset and aggregate matching crashes per location
    Query {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        filters: FilterArgs,

        /// Value that drives marker color
        #[arg(short, long, default_value = "avg_impact")]
        metric: Metric,

        /// Write the result as JSON to this file instead of stdout
        #[arg(short, long)]
        output: Option<String>,

        /// Also write one CSV row per cell to this file
        #[arg(long)]
        csv: Option<String>,

        /// Optional: S3 bucket to upload the result JSON to
        #[arg(long, requires = "s3_key")]
        s3_bucket: Option<String>,

        /// Object key for the uploaded result JSON
        #[arg(long, requires = "s3_bucket")]
        s3_key: Option<String>,
    },
    /// Print the accepted value for every filter as JSON
    Options,
    /// Load the dataset and log record counts
    Summary {
        #[command(flatten)]
        source: SourceArgs,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// Dataset location: s3://bucket/key, an http(s) URL or a file path.
    /// Defaults to s3://$DATA_BUCKET/$DATA_KEY
    #[arg(short, long, value_name = "LOCATION")]
    source: Option<String>,
}

#[derive(Args)]
struct FilterArgs {
    /// Contributing factor the crash must list
    #[arg(long, default_value = "All", value_parser = parse_factor)]
    factor: Selection<String>,

    /// Crash month, 1-12
    #[arg(long, default_value = "All", value_parser = parse_month)]
    month: Selection<u32>,

    /// Day of week, e.g. MONDAY
    #[arg(long, default_value = "All", value_parser = parse_day_of_week)]
    day_of_week: Selection<String>,

    /// Hour of day, 0-23
    #[arg(long, default_value = "All", value_parser = parse_hour_of_day)]
    hour_of_day: Selection<u32>,

    /// Crash severity label, e.g. "K - FATAL INJURY"
    #[arg(long, default_value = "All", value_parser = parse_severity)]
    severity: Selection<Severity>,

    #[arg(long, default_value = "All", value_parser = parse_first_harmful_event)]
    first_harmful_event: Selection<String>,

    #[arg(long, default_value = "All", value_parser = parse_light_condition)]
    light_condition: Selection<String>,

    #[arg(long, default_value = "All", value_parser = parse_weather_condition)]
    weather_condition: Selection<String>,

    #[arg(long, default_value = "All", value_parser = parse_surface_condition)]
    surface_condition: Selection<String>,
}

impl From<FilterArgs> for FilterSelection {
    fn from(args: FilterArgs) -> Self {
        FilterSelection {
            factor: args.factor,
            month: args.month,
            day_of_week: args.day_of_week,
            hour_of_day: args.hour_of_day,
            severity: args.severity,
            first_harmful_event: args.first_harmful_event,
            light_condition: args.light_condition,
            weather_condition: args.weather_condition,
            surface_condition: args.surface_condition,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file
    let config = Config::from_env();

    // Logging setup: colored stderr + JSON rolling log file
    let log_dir = Path::new(&config.log_file_path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&config.log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("collision_heatmap.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(env_filter("RUST_LOG", "info")?);

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(env_filter("RUST_LOG_JSON", "debug")?);

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Query {
            source,
            filters,
            metric,
            output,
            csv,
            s3_bucket,
            s3_key,
        } => {
            let dataset = load(&config, &source).await?;
            let selection = FilterSelection::from(filters);

            let result = run_query(&dataset, &selection, metric).stamped(Utc::now());
            log_summary(&result);

            match output {
                Some(path) => {
                    write_json_file(&path, &result)?;
                    info!(path = %path, "Result written");
                }
                None => println!("{}", to_pretty_json(&result)?),
            }

            if let Some(path) = csv {
                write_cells_csv(&path, &result)?;
                info!(path = %path, "Cell CSV written");
            }

            if let (Some(bucket), Some(key)) = (s3_bucket, s3_key) {
                let s3 = s3_client(config.region.as_deref()).await;
                write_json_to_s3(&s3, &bucket, &key, &result).await?;
                info!(bucket = %bucket, key = %key, "Result uploaded to S3");
            }
        }
        Commands::Options => {
            println!("{}", to_pretty_json(&FilterOptions::get())?);
        }
        Commands::Summary { source } => {
            let dataset = load(&config, &source).await?;
            let (center_lat, center_lon) = dataset.center();
            let (min_bottleneck, max_bottleneck) = match dataset.bottleneck_range() {
                Some((lo, hi)) => (Some(lo), Some(hi)),
                None => (None, None),
            };
            let cells = run_query(&dataset, &FilterSelection::default(), Metric::AvgImpact)
                .cells
                .len();

            info!(
                records = dataset.len(),
                dropped = dataset.dropped_rows(),
                locations = cells,
                center_lat,
                center_lon,
                min_bottleneck,
                max_bottleneck,
                "Dataset summary"
            );
        }
    }

    Ok(())
}

fn env_filter(var: &str, default_directive: &str) -> Result<EnvFilter> {
    let directive = default_directive
        .parse()
        .with_context(|| format!("Invalid log directive '{default_directive}'"))?;
    Ok(EnvFilter::from_env(var).add_directive(directive))
}

/// Resolves the dataset location and loads it. Failures here end the process.
async fn load(config: &Config, args: &SourceArgs) -> Result<Dataset> {
    let location = match &args.source {
        Some(location) => SourceLocation::parse(location)?,
        None => config.default_location(),
    };
    info!(location = %location, "Loading dataset");

    let source = source_for(&location, config.region.as_deref()).await?;
    load_dataset(source.as_ref()).await
}
