//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use serde_json::Value;
use std::path::PathBuf;

/// uhdegrees - degree-award statistics for UH datasets
///
/// Loads a JSON dataset of degree-award records and reports totals,
/// the Hawaiian-legacy share, per-campus and per-year counts, and
/// doctoral programs.
///
/// Examples:
///   uhdegrees --data uhdata.json
///   uhdegrees --data uhdata.json --year 2012,2013 --format json
///   uhdegrees --data ./datasets --output degrees.md
///   uhdegrees --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Dataset to analyze: a JSON file or a directory of JSON files
    #[arg(
        short,
        long,
        value_name = "PATH",
        env = "UHDEGREES_DATA",
        required_unless_present = "init_config"
    )]
    pub data: Option<PathBuf>,

    /// Fiscal years to report totals for (comma-separated or repeated)
    ///
    /// Matched exactly: `2012` is a number, `"2012"` (quoted) a string.
    #[arg(short, long, value_name = "YEAR", value_delimiter = ',')]
    pub year: Vec<String>,

    /// Output file path for the report (stdout if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Path to configuration file
    ///
    /// If not specified, looks for .uhdegrees.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// File extensions to load from a dataset directory (comma-separated)
    #[arg(long, value_name = "EXTS", value_delimiter = ',')]
    pub extensions: Option<Vec<String>>,

    /// Names to skip in a dataset directory (comma-separated)
    #[arg(long, value_name = "NAMES", value_delimiter = ',')]
    pub exclude: Option<Vec<String>>,

    /// Maximum doctoral programs listed in the Markdown report
    #[arg(long, value_name = "COUNT")]
    pub max_programs: Option<usize>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .uhdegrees.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref data) = self.data {
            if !data.exists() {
                return Err(format!("Dataset path does not exist: {}", data.display()));
            }
        }

        if self.max_programs == Some(0) {
            return Err("Max programs must be at least 1".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Log filter directives for the subscriber.
    ///
    /// `--verbose` and `--quiet` always win. Otherwise a non-empty `RUST_LOG`
    /// value is used as given, falling back to [`Args::log_level`].
    pub fn log_filter(&self, rust_log: Option<&str>) -> String {
        match rust_log.map(str::trim) {
            Some(directives) if !directives.is_empty() && !self.verbose && !self.quiet => {
                directives.to_string()
            }
            _ => self.log_level().as_str().to_lowercase(),
        }
    }

    /// Fiscal years as JSON scalars.
    ///
    /// Each value is read as JSON when possible (`2012`, `"2012"`, `true`)
    /// and kept as a plain string otherwise (`FY2012`).
    pub fn fiscal_years(&self) -> Vec<Value> {
        self.year
            .iter()
            .map(|raw| {
                let raw = raw.trim();
                match serde_json::from_str::<Value>(raw) {
                    Ok(value) if !value.is_array() && !value.is_object() => value,
                    _ => Value::String(raw.to_string()),
                }
            })
            .collect()
    }
}
