use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Browser identity sent with every request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub const DEFAULT_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";

pub const DEFAULT_ACCEPT_LANGUAGE: &str = "ja,en-US;q=0.7,en;q=0.3";

/// Main configuration structure for Shopscrape
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub http: HttpConfig,
    pub retry: RetryConfig,
    pub output: OutputConfig,
}

/// HTTP request configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct HttpConfig {
    /// Whole-request timeout (seconds)
    pub timeout_secs: u64,

    /// User-Agent header value
    pub user_agent: String,

    /// Accept header value
    pub accept: String,

    /// Accept-Language header value
    pub accept_language: String,
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept: DEFAULT_ACCEPT.to_string(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
        }
    }
}

/// Retry behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RetryConfig {
    /// Total pipeline attempts per URL, including the first
    pub max_attempts: u32,

    /// Linear backoff step (seconds); the wait after attempt `n` is `n * step`
    pub backoff_step_secs: u64,
}

impl RetryConfig {
    pub fn backoff_step(&self) -> Duration {
        Duration::from_secs(self.backoff_step_secs)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_step_secs: 2,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Directory that receives the CSV files
    pub directory: PathBuf,

    /// Maximum number of records shown after a successful run
    pub preview_limit: usize,

    /// Descriptions longer than this are cut in the preview (not in the file)
    pub description_preview_chars: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("collected_data"),
            preview_limit: 5,
            description_preview_chars: 100,
        }
    }
}
