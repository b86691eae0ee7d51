//! CSV persistence for product records
//!
//! Files are serialized fully in memory and then moved into place through a
//! temporary file in the same directory, so a reader never observes a
//! half-written file.

use crate::model::{ProductRecord, CSV_HEADERS};
use crate::output::traits::{FileReport, OutputError, OutputResult, RecordSink};
use chrono::NaiveDateTime;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Prefix of generated file names
pub const FILE_PREFIX: &str = "scraped_data";

/// Extension of generated file names
pub const FILE_EXTENSION: &str = "csv";

/// Ensures the output directory exists, creating it if missing
///
/// Calling this on an existing directory is a no-op.
pub fn ensure_output_dir(dir: &Path) -> OutputResult<()> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| OutputError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(OutputError::OutputDir(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
        return Ok(());
    }

    fs::create_dir_all(dir).map_err(|e| OutputError::OutputDir(e.to_string()))
}

/// Builds `scraped_data_<YYYYMMDD_HHMMSS>.csv` for the given local time
pub fn timestamped_filename(at: &NaiveDateTime) -> String {
    format!(
        "{}_{}.{}",
        FILE_PREFIX,
        at.format("%Y%m%d_%H%M%S"),
        FILE_EXTENSION
    )
}

/// Serializes records into CSV bytes with the fixed header row
pub fn records_to_csv(records: &[ProductRecord]) -> OutputResult<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());

    // Header is written by hand so an empty batch still gets one
    writer.write_record(CSV_HEADERS)?;
    for record in records {
        writer.serialize(record)?;
    }

    writer
        .into_inner()
        .map_err(|e| OutputError::Format(e.to_string()))
}

/// Reads records back from a CSV file written by [`CsvRecordWriter`]
pub fn read_records(path: &Path) -> OutputResult<Vec<ProductRecord>> {
    if !path.exists() {
        return Err(OutputError::NotFound(path.to_path_buf()));
    }

    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_path(path)?;
    let records = reader
        .deserialize::<ProductRecord>()
        .collect::<Result<Vec<_>, _>>()?;
    Ok(records)
}

/// Re-opens a written file and reports size, data rows and header
///
/// This is a diagnostic readback; nothing downstream depends on it.
pub fn verify_file(path: &Path) -> OutputResult<FileReport> {
    if !path.exists() {
        return Err(OutputError::NotFound(path.to_path_buf()));
    }

    let size_bytes = fs::metadata(path)?.len();

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut rows = reader.records();
    let header = match rows.next() {
        Some(row) => row?.iter().map(str::to_string).collect(),
        None => Vec::new(),
    };

    let mut data_rows = 0;
    for row in rows {
        row?;
        data_rows += 1;
    }

    Ok(FileReport {
        path: path.to_path_buf(),
        size_bytes,
        data_rows,
        header,
    })
}

/// Writes record batches as CSV files into one directory
#[derive(Debug, Clone)]
pub struct CsvRecordWriter {
    dir: PathBuf,
}

impl CsvRecordWriter {
    /// Creates a writer for `dir`, creating the directory if needed
    pub fn new(dir: impl Into<PathBuf>) -> OutputResult<Self> {
        let dir = dir.into();
        ensure_output_dir(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Picks a timestamped name that does not exist yet
    ///
    /// Two runs within the same second get `_1`, `_2`, ... suffixes.
    fn fresh_path(&self) -> PathBuf {
        let base = timestamped_filename(&chrono::Local::now().naive_local());
        let candidate = self.dir.join(&base);
        if !candidate.exists() {
            return candidate;
        }

        let stem = base.trim_end_matches(&format!(".{}", FILE_EXTENSION)).to_string();
        (1..)
            .map(|n| self.dir.join(format!("{}_{}.{}", stem, n, FILE_EXTENSION)))
            .find(|path| !path.exists())
            .unwrap_or(candidate)
    }
}

impl RecordSink for CsvRecordWriter {
    fn write_records(
        &self,
        records: &[ProductRecord],
        filename: Option<&str>,
    ) -> OutputResult<PathBuf> {
        ensure_output_dir(&self.dir)?;

        let target = match filename {
            Some(name) => self.dir.join(name),
            None => self.fresh_path(),
        };

        let bytes = records_to_csv(records)?;

        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(&bytes)?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;
        tmp.persist(&target).map_err(|e| OutputError::Io(e.error))?;

        tracing::info!("Data saved: {}", target.display());
        tracing::info!("  Records saved: {}", records.len());
        Ok(target)
    }

    fn verify(&self, path: &Path) -> OutputResult<FileReport> {
        verify_file(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn sample_records() -> Vec<ProductRecord> {
        vec![
            ProductRecord::new("Lamp", "$20.00", "Desk lamp, warm light"),
            ProductRecord::new("Quote \"Mug\"", "$5", "Holds 300ml\nDishwasher safe"),
            ProductRecord::new("Chair", "unknown price", "no description"),
        ]
    }

    #[test]
    fn test_timestamped_filename() {
        let at = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(7, 5, 1)
            .unwrap();
        assert_eq!(timestamped_filename(&at), "scraped_data_20240309_070501.csv");
    }

    #[test]
    fn test_ensure_output_dir_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("collected_data");

        ensure_output_dir(&dir).unwrap();
        ensure_output_dir(&dir).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn test_ensure_output_dir_rejects_file() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("not_a_dir");
        fs::write(&file, b"x").unwrap();

        assert!(matches!(
            ensure_output_dir(&file),
            Err(OutputError::OutputDir(_))
        ));
    }

    #[test]
    fn test_csv_quotes_delimiters_and_newlines() {
        let bytes = records_to_csv(&sample_records()).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.starts_with("Title,Price,Description\r\n"));
        assert!(text.contains("\"Desk lamp, warm light\""));
        assert!(text.contains("\"Quote \"\"Mug\"\"\""));
        assert!(text.contains("\"Holds 300ml\nDishwasher safe\""));
    }

    #[test]
    fn test_write_then_read_back() {
        let tmp = TempDir::new().unwrap();
        let writer = CsvRecordWriter::new(tmp.path()).unwrap();
        let records = sample_records();

        let path = writer.write_records(&records, Some("out.csv")).unwrap();
        assert_eq!(path, tmp.path().join("out.csv"));
        assert_eq!(read_records(&path).unwrap(), records);
    }

    #[test]
    fn test_verify_counts_rows_and_header() {
        let tmp = TempDir::new().unwrap();
        let writer = CsvRecordWriter::new(tmp.path()).unwrap();

        let path = writer.write_records(&sample_records(), None).unwrap();
        let report = writer.verify(&path).unwrap();

        assert_eq!(report.data_rows, 3);
        assert_eq!(report.header, CSV_HEADERS.to_vec());
        assert_eq!(report.size_bytes, fs::metadata(&path).unwrap().len());
    }

    #[test]
    fn test_generated_names_do_not_collide() {
        let tmp = TempDir::new().unwrap();
        let writer = CsvRecordWriter::new(tmp.path()).unwrap();

        let first = writer.write_records(&sample_records(), None).unwrap();
        let second = writer.write_records(&sample_records(), None).unwrap();

        assert_ne!(first, second);
        let name = first.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("scraped_data_"));
        assert!(name.ends_with(".csv"));
    }

    #[test]
    fn test_empty_batch_writes_header_only() {
        let tmp = TempDir::new().unwrap();
        let writer = CsvRecordWriter::new(tmp.path()).unwrap();

        let path = writer.write_records(&[], Some("empty.csv")).unwrap();
        let report = verify_file(&path).unwrap();
        assert_eq!(report.data_rows, 0);
        assert_eq!(report.header, CSV_HEADERS.to_vec());
    }

    #[test]
    fn test_verify_missing_file() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("missing.csv");
        assert!(matches!(verify_file(&missing), Err(OutputError::NotFound(_))));
        assert!(matches!(read_records(&missing), Err(OutputError::NotFound(_))));
    }
}
