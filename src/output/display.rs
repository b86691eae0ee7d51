//! Console formatting of extracted records
//!
//! The preview shows at most a handful of records and cuts long
//! descriptions. The persisted file is never affected by these limits.

use crate::model::ProductRecord;

const SEPARATOR_WIDTH: usize = 50;

/// Formats the record preview shown after a successful run
///
/// # Arguments
///
/// * `records` - The extracted records
/// * `max_display` - Maximum number of records to show
/// * `description_chars` - Descriptions are cut to this many characters
///
/// # Returns
///
/// The preview as a list of lines, ready to print
pub fn format_records_preview(
    records: &[ProductRecord],
    max_display: usize,
    description_chars: usize,
) -> Vec<String> {
    if records.is_empty() {
        return vec!["No data to display".to_string()];
    }

    let mut lines = Vec::new();
    lines.push(String::new());
    lines.push(format!(
        "=== Extracted data (showing up to {}) ===",
        max_display
    ));

    for (index, record) in records.iter().take(max_display).enumerate() {
        lines.push(String::new());
        lines.push(format!("[Product {}]", index + 1));
        lines.push(format!("Title: {}", record.title()));
        lines.push(format!("Price: {}", record.price()));
        lines.push(format!(
            "Description: {}",
            record.description_preview(description_chars)
        ));
        lines.push("-".repeat(SEPARATOR_WIDTH));
    }

    if records.len() > max_display {
        lines.push(String::new());
        lines.push(format!(
            "* {} more records not shown",
            records.len() - max_display
        ));
    }

    lines
}

/// Formats the banner printed when an interactive session starts
pub fn format_banner(example_url: &str) -> Vec<String> {
    let rule = "=".repeat(60);
    vec![
        String::new(),
        rule.clone(),
        "Web scraping - interactive mode".to_string(),
        rule,
        "Usage:".to_string(),
        "1. Enter the URL of the page to scrape".to_string(),
        "2. Enter 'exit' to quit".to_string(),
        format!("3. Practice URL: {}", example_url),
        "-".repeat(60),
    ]
}
