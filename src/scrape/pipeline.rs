//! Fetch → parse → extract → validate for one URL
//!
//! A pipeline run is all-or-nothing: either every stage succeeds and the
//! records are returned, or the first failing stage's error is returned and
//! nothing else is.

use crate::config::HttpConfig;
use crate::model::ProductRecord;
use crate::scrape::extractor::{parse_document, HtmlExtractor};
use crate::scrape::fetcher::{HttpFetcher, PageFetcher};
use crate::scrape::validator::check_records;
use crate::ScrapeError;
use async_trait::async_trait;

/// One complete scrape attempt for a URL
///
/// The retry runner is generic over this trait so it can drive any
/// attempt-shaped operation.
#[async_trait]
pub trait Scrape: Send + Sync {
    async fn scrape(&self, url: &str) -> Result<Vec<ProductRecord>, ScrapeError>;
}

/// The scrape pipeline for a single page
#[derive(Debug)]
pub struct ScrapePipeline<F = HttpFetcher> {
    fetcher: F,
    extractor: HtmlExtractor,
}

impl ScrapePipeline<HttpFetcher> {
    /// Creates a pipeline with an HTTP fetcher and the default layout
    pub fn from_config(config: &HttpConfig) -> Result<Self, ScrapeError> {
        Ok(Self::new(HttpFetcher::new(config)?, HtmlExtractor::new()?))
    }
}

impl<F: PageFetcher> ScrapePipeline<F> {
    pub fn new(fetcher: F, extractor: HtmlExtractor) -> Self {
        Self { fetcher, extractor }
    }

    /// Runs every stage for `url`, stopping at the first failure
    ///
    /// # Stages
    ///
    /// 1. Fetch the markup (transport failures end the run)
    /// 2. Parse it into a node tree
    /// 3. Extract product records
    /// 4. Validate the batch
    pub async fn run(&self, url: &str) -> Result<Vec<ProductRecord>, ScrapeError> {
        tracing::info!("Scraping started - target URL: {}", url);

        let markup = match self.fetcher.fetch(url).await.into_result(url) {
            Ok(markup) => markup,
            Err(e) => {
                tracing::warn!("Failed to fetch web page: {}", e);
                return Err(e);
            }
        };

        let records = self.process(&markup)?;
        tracing::info!("All stages completed successfully");
        Ok(records)
    }

    /// Parse, extract and validate stages on already-fetched markup
    fn process(&self, markup: &str) -> Result<Vec<ProductRecord>, ScrapeError> {
        let document = parse_document(markup).map_err(|e| {
            tracing::warn!("Failed to parse HTML: {}", e);
            e
        })?;

        let records = self.extractor.extract_from(&document);
        if records.is_empty() {
            tracing::warn!("Failed to extract data");
            return Err(ScrapeError::NoRecords);
        }

        check_records(&records)?;
        Ok(records)
    }
}

#[async_trait]
impl<F: PageFetcher> Scrape for ScrapePipeline<F> {
    async fn scrape(&self, url: &str) -> Result<Vec<ProductRecord>, ScrapeError> {
        self.run(url).await
    }
}
