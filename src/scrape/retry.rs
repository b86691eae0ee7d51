//! Bounded retry with linear, cancellable backoff
//!
//! The runner re-invokes a `Scrape` up to `max_attempts` times. After a
//! failed attempt it waits `(attempt_index + 1) * step` before the next one
//! (2s, 4s, 6s, ... with the default step); there is no wait after the last
//! attempt. A cancellation token cuts both the wait and an in-flight attempt
//! short.

use crate::config::RetryConfig;
use crate::model::{ProductRecord, RecordStats, RunStatistics};
use crate::scrape::pipeline::Scrape;
use crate::ScrapeError;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Attempt count and backoff step of a retry sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_step: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff_step: Duration) -> Self {
        Self {
            max_attempts,
            backoff_step,
        }
    }

    /// Wait that follows the failed attempt with zero-based `attempt_index`
    pub fn delay_after(&self, attempt_index: u32) -> Duration {
        self.backoff_step * (attempt_index + 1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(2))
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self::new(config.max_attempts, config.backoff_step())
    }
}

/// Outcome of a retry sequence
#[derive(Debug)]
pub enum RetryOutcome {
    /// An attempt succeeded
    Success {
        records: Vec<ProductRecord>,
        stats: RunStatistics,
    },

    /// Every attempt failed
    Exhausted {
        attempts: u32,
        last_error: Option<ScrapeError>,
    },

    /// The cancellation token fired before an attempt succeeded
    ///
    /// `attempts` counts the attempts that ran to completion.
    Cancelled { attempts: u32 },
}

/// Drives a `Scrape` through a bounded retry sequence
pub struct RetryRunner<S> {
    scraper: S,
    policy: RetryPolicy,
    cancel: CancellationToken,
}

impl<S: Scrape> RetryRunner<S> {
    pub fn new(scraper: S, policy: RetryPolicy, cancel: CancellationToken) -> Self {
        Self {
            scraper,
            policy,
            cancel,
        }
    }

    pub fn scraper(&self) -> &S {
        &self.scraper
    }

    /// Runs the scrape for `url` until it succeeds, attempts run out, or the
    /// token is cancelled
    ///
    /// Attempt failures are logged and absorbed; they never propagate.
    pub async fn run_with_retry(&self, url: &str) -> RetryOutcome {
        let mut last_error = None;

        for attempt_index in 0..self.policy.max_attempts {
            let attempt = attempt_index + 1;

            let result = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    tracing::info!("Scrape cancelled during attempt {}", attempt);
                    return RetryOutcome::Cancelled { attempts: attempt_index };
                }
                result = self.scraper.scrape(url) => result,
            };

            match result {
                Ok(records) => {
                    let stats = RunStatistics {
                        attempts: attempt,
                        records: RecordStats::from_records(&records),
                    };
                    return RetryOutcome::Success { records, stats };
                }
                Err(e) => {
                    tracing::warn!(
                        attempt,
                        max_attempts = self.policy.max_attempts,
                        category = ?e.category(),
                        "Attempt failed: {}",
                        e
                    );
                    last_error = Some(e);
                }
            }

            if attempt < self.policy.max_attempts {
                let delay = self.policy.delay_after(attempt_index);
                tracing::info!("Waiting {}s before retrying...", delay.as_secs());

                tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => {
                        tracing::info!("Scrape cancelled during backoff");
                        return RetryOutcome::Cancelled { attempts: attempt };
                    }
                    _ = tokio::time::sleep(delay) => {}
                }
            }
        }

        tracing::warn!("All {} attempts failed", self.policy.max_attempts);
        RetryOutcome::Exhausted {
            attempts: self.policy.max_attempts,
            last_error,
        }
    }
}
