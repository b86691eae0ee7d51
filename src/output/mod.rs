//! Output module for persisting and presenting scrape results
//!
//! This module handles:
//! - Writing record batches to CSV files (atomically)
//! - Reading files back and verifying what was written
//! - Formatting record previews for the console

mod csv_output;
mod display;
mod traits;

pub use csv_output::{
    ensure_output_dir, read_records, records_to_csv, timestamped_filename, verify_file,
    CsvRecordWriter, FILE_EXTENSION, FILE_PREFIX,
};
pub use display::{format_banner, format_records_preview};
pub use traits::{FileReport, OutputError, OutputResult, RecordSink};
