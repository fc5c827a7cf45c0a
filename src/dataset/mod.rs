//! Dataset loading.
//!
//! Reads degree-award records from a JSON file, or from every matching
//! file under a directory. The aggregator itself never touches the
//! filesystem; this module is what hands it a `Vec<Record>`.

use crate::models::Record;
use anyhow::{anyhow, Context, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Configuration for dataset discovery.
#[derive(Debug, Clone)]
pub struct LoadConfig {
    /// File extensions to load from a directory (e.g., ["json"])
    pub extensions: Vec<String>,
    /// File or directory names to skip
    pub excludes: Vec<String>,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["json".to_string()],
            excludes: vec!["node_modules".to_string(), "target".to_string()],
        }
    }
}

impl From<&crate::config::DatasetConfig> for LoadConfig {
    fn from(config: &crate::config::DatasetConfig) -> Self {
        Self {
            extensions: config.extensions.clone(),
            excludes: config.excludes.clone(),
        }
    }
}

/// Records loaded from one or more files.
#[derive(Debug, Clone, Default)]
pub struct LoadedDataset {
    /// All records, in file order then array order.
    pub records: Vec<Record>,
    /// Files the records came from.
    pub files: Vec<PathBuf>,
}

/// Loader for degree-award datasets.
pub struct DatasetLoader {
    config: LoadConfig,
}

impl DatasetLoader {
    /// Create a new loader.
    pub fn new(config: LoadConfig) -> Self {
        Self { config }
    }

    /// Load a dataset from a file or directory.
    pub fn load(&self, path: &Path) -> Result<LoadedDataset> {
        let files = if path.is_dir() {
            self.discover(path)?
        } else if path.is_file() {
            vec![path.to_path_buf()]
        } else {
            return Err(anyhow!("Dataset not found: {}", path.display()));
        };

        let mut dataset = LoadedDataset::default();
        for file in files {
            let records = load_file(&file)?;
            debug!("Loaded {} records from {}", records.len(), file.display());
            dataset.records.extend(records);
            dataset.files.push(file);
        }

        info!(
            "Loaded {} records from {} file(s)",
            dataset.records.len(),
            dataset.files.len()
        );
        Ok(dataset)
    }

    /// List dataset files under a directory, sorted by path.
    pub fn discover(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        let walker = WalkDir::new(dir)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                e.depth() == 0 || !self.is_excluded(&e.file_name().to_string_lossy())
            });

        for entry in walker {
            let entry = entry.context("Failed to read directory entry")?;
            if entry.file_type().is_file() && self.matches(entry.path()) {
                files.push(entry.into_path());
            }
        }

        if files.is_empty() {
            return Err(anyhow!("No dataset files found in {}", dir.display()));
        }

        Ok(files)
    }

    /// Check if a file has one of the configured extensions.
    fn matches(&self, path: &Path) -> bool {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        self.config.extensions.iter().any(|e| e == ext)
    }

    /// Check if a name matches exclusion patterns.
    fn is_excluded(&self, name: &str) -> bool {
        // Hidden files
        if name.starts_with('.') {
            return true;
        }

        self.config.excludes.iter().any(|pattern| name == pattern)
    }
}

fn load_file(path: &Path) -> Result<Vec<Record>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read dataset file: {}", path.display()))?;

    parse_records(&content)
        .with_context(|| format!("Failed to parse dataset file: {}", path.display()))
}

/// Parse a JSON array of record objects.
pub fn parse_records(content: &str) -> Result<Vec<Record>> {
    let value: Value = serde_json::from_str(content).context("Invalid JSON")?;

    let Value::Array(items) = value else {
        return Err(anyhow!("Expected a JSON array of records"));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            Record::from_value(item).ok_or_else(|| anyhow!("Entry {} is not an object", index))
        })
        .collect()
}
