//! CLI entry point for the bikeshare statistics tool.
//!
//! Provides subcommands for one-shot statistics, paging through raw trip
//! rows, and an interactive exploration loop.

use anyhow::Result;
use bikeshare_stats::{
    catalog::{City, CityCatalog},
    filter::TripFilter,
    loader::Loader,
    output::{append_record, print_pretty, render_raw_page, render_report, to_json},
    raw::{DEFAULT_PAGE_SIZE, RawData},
    shell::Shell,
    stats::{Report, ReportSummary},
};
use clap::{Parser, Subcommand, ValueEnum};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bikeshare_stats")]
#[command(about = "Explore US bikeshare trip data", long_about = None)]
struct Cli {
    /// Directory containing chicago.csv, new_york_city.csv and washington.csv
    /// (defaults to $BIKESHARE_DATA_DIR, then the current directory)
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute all statistics for one city, month and day
    Stats {
        /// chicago, "new york city" or washington
        #[arg(short, long)]
        city: String,

        /// all, or a month from january to june
        #[arg(short, long, default_value = "all")]
        month: String,

        /// all, or a day of the week
        #[arg(short, long, default_value = "all")]
        day: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Optional: CSV file to append a one-row summary to
        #[arg(long)]
        append: Option<String>,
    },
    /// Print unfiltered rows of a city's trip log
    Raw {
        #[arg(short, long)]
        city: String,

        /// Index of the first row to print
        #[arg(short, long, default_value_t = 0)]
        offset: usize,

        /// Number of rows to print
        #[arg(short, long, default_value_t = DEFAULT_PAGE_SIZE)]
        rows: usize,
    },
    /// Answer prompts for city, month and day, repeatedly
    Explore,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/bikeshare_stats.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bikeshare_stats.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    // stdout carries the results, so stderr stays quiet unless asked
    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| EnvFilter::new("warn")));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(non_blocking_file)
        .with_filter(
            EnvFilter::try_from_env("RUST_LOG_JSON").unwrap_or_else(|_| EnvFilter::new("debug")),
        );

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let catalog = match cli.data_dir {
        Some(dir) => CityCatalog::new(dir),
        None => CityCatalog::from_env(),
    };
    info!(data_dir = %catalog.data_dir().display(), "Using data directory");
    let loader = Loader::new(catalog);

    match cli.command {
        Commands::Stats {
            city,
            month,
            day,
            format,
            append,
        } => {
            let city: City = city.parse()?;
            let filter = TripFilter::parse(&month, &day)?;
            let records = loader.load_filtered(city, &filter)?;

            let report = match Report::compute(&records, &filter) {
                Ok(report) => report,
                Err(e) if e.is_empty_data() => {
                    warn!(city = %city, "No trips match the selected filters");
                    println!("No trips match the selected filters.");
                    return Ok(());
                }
                Err(e) => return Err(e.into()),
            };
            print_pretty(&report);

            match format {
                Format::Text => print!("{}", render_report(&report)),
                Format::Json => println!("{}", to_json(&report)?),
            }

            if let Some(path) = append {
                append_record(&path, &ReportSummary::from(&report))?;
                info!(path = %path, "Summary appended");
            }
        }
        Commands::Raw { city, offset, rows } => {
            let city: City = city.parse()?;
            let data = RawData::read(&loader.catalog().path_for(city))?;

            match data.page(offset, rows) {
                Some(page) => print!("{}", render_raw_page(&page)),
                None => println!("No rows at offset {offset} ({} rows total).", data.len()),
            }
        }
        Commands::Explore => {
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            Shell::new(loader, stdin.lock(), stdout.lock()).run()?;
        }
    }

    Ok(())
}
