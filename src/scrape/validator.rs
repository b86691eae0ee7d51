//! Coarse sanity check over extracted records
//!
//! The check only asks whether the batch looks like it came from the
//! expected layout: at least one real title and at least one real price.
//! It does not validate individual records.

use crate::model::{ProductRecord, RecordStats};
use crate::ScrapeError;

/// Returns true if the batch passes the sanity check
pub fn validate_records(records: &[ProductRecord]) -> bool {
    check_records(records).is_ok()
}

/// Checks a batch and returns its counts, or the reason it was rejected
///
/// # Returns
///
/// * `Ok(RecordStats)` - Non-empty batch with valid titles and prices
/// * `Err(ScrapeError::NoRecords)` - The batch is empty
/// * `Err(ScrapeError::Validation)` - No valid titles or no valid prices
pub fn check_records(records: &[ProductRecord]) -> Result<RecordStats, ScrapeError> {
    if records.is_empty() {
        tracing::warn!("No extracted data to validate");
        return Err(ScrapeError::NoRecords);
    }

    let stats = RecordStats::from_records(records);
    tracing::info!(
        total = stats.total,
        valid_titles = stats.valid_titles,
        valid_prices = stats.valid_prices,
        "Data validation counts"
    );

    if stats.is_acceptable() {
        tracing::info!("Data validation succeeded");
        Ok(stats)
    } else {
        tracing::warn!("Data validation failed: {}", stats);
        Err(ScrapeError::Validation {
            valid_titles: stats.valid_titles,
            valid_prices: stats.valid_prices,
        })
    }
}
