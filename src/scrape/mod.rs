//! Scrape module for single-page product extraction
//!
//! This module contains the core scraping logic, including:
//! - HTTP fetching with a fixed header set and timeout
//! - HTML parsing and product card extraction
//! - A coarse sanity check over the extracted batch
//! - The all-or-nothing pipeline and its bounded retry runner

mod extractor;
mod fetcher;
mod pipeline;
mod retry;
mod validator;

pub use extractor::{
    parse_document, ClassAttributeMatcher, ContainerMatcher, HtmlExtractor,
    DEFAULT_CONTAINER_CLASS, DEFAULT_CONTAINER_TAG,
};
pub use fetcher::{
    build_default_headers, build_http_client, check_connection, fetch_url, ConnectionReport,
    FetchResult, HttpFetcher, PageFetcher, CONNECTION_PREVIEW_CHARS,
};
pub use pipeline::{Scrape, ScrapePipeline};
pub use retry::{RetryOutcome, RetryPolicy, RetryRunner};
pub use validator::{check_records, validate_records};
