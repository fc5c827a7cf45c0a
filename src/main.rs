//! uhdegrees - degree-award statistics for UH datasets
//!
//! A CLI that loads a JSON dataset of degree-award records and
//! renders a Markdown or JSON report of the aggregate statistics.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (bad data, config, I/O, etc.)

use anyhow::{Context, Result};
use chrono::Utc;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use uhdegrees::cli::{Args, OutputFormat};
use uhdegrees::config::{Config, CONFIG_FILE};
use uhdegrees::dataset::{DatasetLoader, LoadConfig};
use uhdegrees::models::{DegreeSummary, Report, ReportMetadata};
use uhdegrees::report;

fn main() -> Result<()> {
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    info!("uhdegrees v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(args) {
        error!("Report failed: {:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .uhdegrees.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!("{} already exists. Remove it first or edit it manually.", CONFIG_FILE);
        std::process::exit(1);
    }

    std::fs::write(path, Config::default_toml())
        .with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("Created {} with default settings.", CONFIG_FILE);
    Ok(())
}

/// Initialize logging based on verbosity settings and `RUST_LOG`.
///
/// Logs go to stderr so a report printed to stdout stays clean.
fn init_logging(args: &Args) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let directives = args.log_filter(rust_log.as_deref());
    let filter = EnvFilter::try_new(&directives).unwrap_or_else(|e| {
        eprintln!("Ignoring invalid log filter {:?}: {}", directives, e);
        EnvFilter::new(args.log_level().as_str().to_lowercase())
    });

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Load the dataset, aggregate it and emit the report.
fn run(args: Args) -> Result<()> {
    let start_time = Instant::now();

    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let data_path = args
        .data
        .as_deref()
        .context("No dataset given (use --data)")?;

    let loader = DatasetLoader::new(LoadConfig::from(&config.dataset));
    let dataset = loader.load(data_path)?;

    let years = args.fiscal_years();
    let summary = DegreeSummary::from_records(&dataset.records, &years)
        .with_context(|| format!("Failed to aggregate {}", data_path.display()))?;

    info!(
        "Total degrees: {} ({} campuses)",
        summary.total_degrees,
        summary.campuses.len()
    );

    let report = Report {
        metadata: ReportMetadata {
            source: data_path.display().to_string(),
            generated_at: Utc::now(),
            files_loaded: dataset.files.len(),
            record_count: dataset.records.len(),
            duration_seconds: start_time.elapsed().as_secs_f64(),
        },
        summary,
    };

    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&report, &config.report),
    };

    match config.general.output {
        Some(ref path) => {
            report::write_report(&output, std::path::Path::new(path))?;
            info!("Report saved to: {}", path);
        }
        None => println!("{}", output),
    }

    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
