//! Shopscrape: a single-page product scraper
//!
//! This crate fetches one product listing page, extracts title, price and
//! description for every product card, and stores the results as CSV. An
//! interactive session drives the pipeline with bounded, linear retries.

pub mod config;
pub mod model;
pub mod output;
pub mod scrape;
pub mod session;
pub mod url;

use thiserror::Error;

/// Coarse failure classes used for diagnostics and retry decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Timeout, connection failure, non-success status, other request errors
    Transport,
    /// Unparsable markup or no matching product containers
    Structural,
    /// Records extracted but no valid titles or no valid prices
    Validation,
    /// Writing or reading the output file failed
    Persistence,
    /// The user supplied something that is not a usable URL
    Input,
    /// The configuration could not be loaded
    Configuration,
}

impl ErrorCategory {
    /// Returns true if a fresh pipeline attempt may succeed where this one failed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport | Self::Structural | Self::Validation)
    }
}

/// Main error type for Shopscrape operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("HTTP status {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}")]
    Connect { url: String },

    #[error("Request error for {url}: {message}")]
    Request { url: String, message: String },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("HTML parse error: {0}")]
    HtmlParse(String),

    #[error("No product records found in page")]
    NoRecords,

    #[error("Validation failed: {valid_titles} valid titles, {valid_prices} valid prices")]
    Validation {
        valid_titles: usize,
        valid_prices: usize,
    },

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScrapeError {
    /// Maps this error onto its coarse category
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Config(_) => ErrorCategory::Configuration,
            Self::Url(_) => ErrorCategory::Input,
            Self::HttpStatus { .. }
            | Self::Timeout { .. }
            | Self::Connect { .. }
            | Self::Request { .. }
            | Self::Client(_) => ErrorCategory::Transport,
            Self::HtmlParse(_) | Self::NoRecords => ErrorCategory::Structural,
            Self::Validation { .. } => ErrorCategory::Validation,
            Self::Output(_) | Self::Io(_) => ErrorCategory::Persistence,
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid header value for {name}: {value}")]
    InvalidHeader { name: String, value: String },
}

/// URL-specific errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlError {
    #[error("No URL was entered")]
    Empty,

    #[error("URL must start with https:// or http://: {0}")]
    InvalidScheme(String),

    #[error("URL does not contain a valid domain: {0}")]
    MissingDomain(String),

    #[error("Malformed URL: {0}")]
    Malformed(String),
}

/// Result type alias for Shopscrape operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use model::{ProductRecord, RecordStats, RunStatistics};
pub use scrape::{RetryOutcome, RetryRunner, ScrapePipeline};
pub use session::{InteractiveSession, SessionSummary};
pub use crate::url::validate_url;
