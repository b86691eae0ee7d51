//! HTTP fetcher implementation
//!
//! This module handles the single GET request of a pipeline attempt:
//! - Building the HTTP client with the browser-like header set
//! - Sending exactly one request with a fixed timeout
//! - Classifying the outcome into a `FetchResult`
//!
//! There is no retry here; the retry runner owns that concern.

use crate::config::HttpConfig;
use crate::url::validate_url;
use crate::{ConfigError, ScrapeError};
use async_trait::async_trait;
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONNECTION,
    UPGRADE_INSECURE_REQUESTS, USER_AGENT,
};
use reqwest::Client;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// Server answered with a non-success status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// The request did not complete within the timeout
    Timeout,

    /// The connection could not be established
    ConnectError {
        /// Error description
        error: String,
    },

    /// Any other transport failure (including an empty body)
    RequestError {
        /// Error description
        error: String,
    },
}

impl FetchResult {
    /// Returns true if markup was retrieved
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns the markup, discarding failure details
    pub fn into_markup(self) -> Option<String> {
        match self {
            Self::Success { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Converts the outcome into the markup or a transport error for `url`
    pub fn into_result(self, url: &str) -> Result<String, ScrapeError> {
        let url = url.to_string();
        match self {
            Self::Success { body, .. } => Ok(body),
            Self::HttpError { status_code } => Err(ScrapeError::HttpStatus {
                url,
                status: status_code,
            }),
            Self::Timeout => Err(ScrapeError::Timeout { url }),
            Self::ConnectError { .. } => Err(ScrapeError::Connect { url }),
            Self::RequestError { error } => Err(ScrapeError::Request {
                url,
                message: error,
            }),
        }
    }
}

/// Source of page markup for the pipeline
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Issues one request for `url` and classifies the outcome
    async fn fetch(&self, url: &str) -> FetchResult;
}

/// Builds the default header set sent with every request
///
/// The set identifies as a common desktop browser, accepts HTML, and asks
/// for a persistent connection. Compression headers are added by the client
/// itself for the encodings it can decode.
pub fn build_default_headers(config: &HttpConfig) -> Result<HeaderMap, ConfigError> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, header_value("user-agent", &config.user_agent)?);
    headers.insert(ACCEPT, header_value("accept", &config.accept)?);
    headers.insert(
        ACCEPT_LANGUAGE,
        header_value("accept-language", &config.accept_language)?,
    );
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
    Ok(headers)
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, ConfigError> {
    HeaderValue::from_str(value).map_err(|_| ConfigError::InvalidHeader {
        name: name.to_string(),
        value: value.to_string(),
    })
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The HTTP configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(ScrapeError)` - Invalid header values or client construction failure
///
/// # Example
///
/// ```no_run
/// use shopscrape::config::HttpConfig;
/// use shopscrape::scrape::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, ScrapeError> {
    let headers = build_default_headers(config)?;

    let client = Client::builder()
        .default_headers(headers)
        .timeout(config.timeout())
        .gzip(true)
        .brotli(true)
        .deflate(true)
        .build()?;

    Ok(client)
}

/// Fetcher backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher with a client built from `config`
    pub fn new(config: &HttpConfig) -> Result<Self, ScrapeError> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

    /// Creates a fetcher around an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchResult {
        fetch_url(&self.client, url).await
    }
}

/// Fetches a URL with a single GET and classifies the result
///
/// # Classification
///
/// | Condition | Result |
/// |-----------|--------|
/// | HTTP 2xx with a body | Success |
/// | HTTP 2xx with an empty body | RequestError |
/// | Any other HTTP status | HttpError |
/// | Timeout | Timeout |
/// | Connection refused / DNS failure | ConnectError |
/// | Anything else | RequestError |
///
/// Every outcome is logged as one status line.
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    tracing::info!("Fetching page: {}", url);

    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => return classify_error(url, e),
    };

    let status = response.status();
    if !status.is_success() {
        tracing::warn!("Fetch failed - status code: {}", status.as_u16());
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    let final_url = response.url().to_string();

    match response.text().await {
        Ok(body) if body.is_empty() => {
            tracing::warn!("Fetch failed - empty body from {}", url);
            FetchResult::RequestError {
                error: "Empty response body".to_string(),
            }
        }
        Ok(body) => {
            tracing::info!("Fetch succeeded - status code: {}", status.as_u16());
            FetchResult::Success {
                final_url,
                status_code: status.as_u16(),
                body,
            }
        }
        Err(e) => classify_error(url, e),
    }
}

fn classify_error(url: &str, e: reqwest::Error) -> FetchResult {
    if e.is_timeout() {
        tracing::warn!("Timeout error: {}", url);
        FetchResult::Timeout
    } else if e.is_connect() {
        tracing::warn!("Connection error: {}", url);
        FetchResult::ConnectError {
            error: e.to_string(),
        }
    } else {
        tracing::warn!("Request error: {}", e);
        FetchResult::RequestError {
            error: e.to_string(),
        }
    }
}

/// Result of a connection check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionReport {
    /// Length of the retrieved markup in characters
    pub content_length: usize,

    /// First characters of the markup with line breaks flattened
    pub preview: String,
}

/// Number of markup characters included in a connection report preview
pub const CONNECTION_PREVIEW_CHARS: usize = 100;

/// Validates `url`, fetches it once, and summarizes the markup
///
/// This is a diagnostic probe: it does not parse or extract anything.
pub async fn check_connection(
    fetcher: &dyn PageFetcher,
    url: &str,
) -> Result<ConnectionReport, ScrapeError> {
    validate_url(url)?;

    let markup = fetcher.fetch(url).await.into_result(url)?;
    let preview = markup
        .chars()
        .take(CONNECTION_PREVIEW_CHARS)
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();

    Ok(ConnectionReport {
        content_length: markup.chars().count(),
        preview,
    })
}
