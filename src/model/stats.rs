//! Derived counts over extracted records

use crate::model::ProductRecord;
use std::fmt;

/// Validity counts over one batch of records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordStats {
    /// Number of records in the batch
    pub total: usize,

    /// Records whose title is not the placeholder
    pub valid_titles: usize,

    /// Records whose price is not the placeholder
    pub valid_prices: usize,
}

impl RecordStats {
    /// Counts valid titles and prices in a batch
    pub fn from_records(records: &[ProductRecord]) -> Self {
        Self {
            total: records.len(),
            valid_titles: records.iter().filter(|r| r.has_title()).count(),
            valid_prices: records.iter().filter(|r| r.has_price()).count(),
        }
    }

    /// Returns true if the batch passes the coarse sanity check
    ///
    /// A batch is acceptable when it is non-empty and has at least one
    /// valid title and at least one valid price.
    pub fn is_acceptable(&self) -> bool {
        self.total > 0 && self.valid_titles > 0 && self.valid_prices > 0
    }
}

impl fmt::Display for RecordStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} records, {} valid titles, {} valid prices",
            self.total, self.valid_titles, self.valid_prices
        )
    }
}

/// Statistics for one successful retry sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStatistics {
    /// Attempts used, including the successful one
    pub attempts: u32,

    /// Counts for the accepted batch
    pub records: RecordStats,
}
