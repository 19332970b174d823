//! Error types for the extraction pipeline.

use thiserror::Error;

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, SiftError>;

/// Errors that can occur during extraction and search operations.
#[derive(Error, Debug)]
pub enum SiftError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Fetch attempt exceeded its time budget.
    #[error("Fetch timed out after {0}s")]
    Timeout(u64),

    /// Headless browser error.
    #[error("Browser error: {0}")]
    Browser(String),

    /// Failed to parse fetched content.
    #[error("Failed to parse content: {0}")]
    Parse(String),

    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Category name not present in the source registry.
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// Extraction mode string not recognized.
    #[error("Unknown extraction mode: {0}")]
    UnknownMode(String),

    /// Invalid delay specification.
    #[error("Invalid delay spec '{0}': expected \"N\" or \"MIN-MAX\" seconds")]
    InvalidDelay(String),

    /// URL parsing error.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV serialization error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Generic error.
    #[error("{0}")]
    Other(String),
}
