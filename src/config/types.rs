use std::path::PathBuf;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::view::Visibility;

/// One rejected settings field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field_path}: {message}")]
pub struct ValidationError {
    /// Settings path of the field, e.g. `excludePatterns[0]`.
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid editor settings:\n{}", numbered(.0))]
    Invalid(Vec<ValidationError>),

    #[error("Failed to read settings file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Malformed settings file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One indented, numbered line per error.
fn numbered(errors: &[ValidationError]) -> String {
    let lines: Vec<String> =
        errors.iter().zip(1..).map(|(err, n)| format!("  {n}. {err}")).collect();
    lines.join("\n")
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorSettings {
    /// Glob selecting catalogs, relative to the workspace root.
    pub document_pattern: String,
    pub exclude_patterns: Vec<String>,

    /// Directory for overlay files.
    /// If unset, the platform data directory is used.
    pub overlay_dir: Option<PathBuf>,

    /// Items hidden from listings regardless of filters.
    pub visibility: Visibility,

    pub batch: BatchConfig,
    pub scan: ScanConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BatchConfig {
    /// Translation requests in flight at once.
    pub concurrency: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { concurrency: 1 }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScanConfig {
    /// Parallel thread count for directory scans.
    /// Default: 80% of CPU cores (minimum 1).
    pub num_threads: Option<usize>,
}

impl ScanConfig {
    #[must_use]
    pub fn effective_threads(&self) -> usize {
        self.num_threads.unwrap_or_else(|| num_cpus::get() * 4 / 5).max(1)
    }
}

impl EditorSettings {
    /// # Errors
    /// - Required field is empty
    /// - Invalid glob pattern
    /// - Zero concurrency or thread count
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.document_pattern.is_empty() {
            errors.push(ValidationError::new(
                "documentPattern",
                "The pattern cannot be empty. Example: \"**/*.xcstrings\"",
            ));
        } else if let Err(e) = globset::Glob::new(&self.document_pattern) {
            errors.push(ValidationError::new(
                "documentPattern",
                format!("Invalid glob pattern '{}': {e}", self.document_pattern),
            ));
        }

        for (index, pattern) in self.exclude_patterns.iter().enumerate() {
            if let Err(e) = globset::Glob::new(pattern) {
                errors.push(ValidationError::new(
                    format!("excludePatterns[{index}]"),
                    format!("Invalid glob pattern '{pattern}': {e}"),
                ));
            }
        }

        if self.batch.concurrency == 0 {
            errors.push(ValidationError::new(
                "batch.concurrency",
                "Must be at least 1. Use 1 to translate one item at a time",
            ));
        }

        if self.scan.num_threads == Some(0) {
            errors.push(ValidationError::new(
                "scan.numThreads",
                "Must be at least 1, or remove this field to use the default",
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            document_pattern: "**/*.xcstrings".to_string(),
            exclude_patterns: vec!["**/DerivedData/**".to_string(), "**/.build/**".to_string()],
            overlay_dir: None,
            visibility: Visibility::default(),
            batch: BatchConfig::default(),
            scan: ScanConfig::default(),
        }
    }
}
