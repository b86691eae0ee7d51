//! Data model for extracted products
//!
//! - `ProductRecord`: one product's title/price/description triple
//! - `RecordStats`: validity counts over a batch of records
//! - `RunStatistics`: attempts used plus the stats of the accepted batch

mod record;
mod stats;

// Re-export main types
pub use record::{
    ProductRecord, CSV_HEADERS, PLACEHOLDER_DESCRIPTION, PLACEHOLDER_PRICE, PLACEHOLDER_TITLE,
};
pub use stats::{RecordStats, RunStatistics};
