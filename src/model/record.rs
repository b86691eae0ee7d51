/// Product record definitions
///
/// A record always carries all three fields. Fields that could not be found
/// in the markup hold a fixed placeholder instead of being left out.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Substituted when a product card has no title link
pub const PLACEHOLDER_TITLE: &str = "unknown title";

/// Substituted when a product card has no price heading
pub const PLACEHOLDER_PRICE: &str = "unknown price";

/// Substituted when a product card has no description paragraph
pub const PLACEHOLDER_DESCRIPTION: &str = "no description";

/// Column labels of the persisted file, in field order
pub const CSV_HEADERS: [&str; 3] = ["Title", "Price", "Description"];

/// One extracted product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(rename = "Title")]
    title: String,

    #[serde(rename = "Price")]
    price: String,

    #[serde(rename = "Description")]
    description: String,
}

impl ProductRecord {
    /// Creates a record from already-resolved field values
    pub fn new(
        title: impl Into<String>,
        price: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            price: price.into(),
            description: description.into(),
        }
    }

    /// Creates a record from optional field values, substituting placeholders
    ///
    /// Values are trimmed; a value that is empty after trimming counts as
    /// missing.
    pub fn from_parts(
        title: Option<&str>,
        price: Option<&str>,
        description: Option<&str>,
    ) -> Self {
        Self::new(
            resolve(title, PLACEHOLDER_TITLE),
            resolve(price, PLACEHOLDER_PRICE),
            resolve(description, PLACEHOLDER_DESCRIPTION),
        )
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn price(&self) -> &str {
        &self.price
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns true if the title was found in the markup
    pub fn has_title(&self) -> bool {
        self.title != PLACEHOLDER_TITLE
    }

    /// Returns true if the price was found in the markup
    pub fn has_price(&self) -> bool {
        self.price != PLACEHOLDER_PRICE
    }

    /// Returns the description cut to at most `max_chars` characters
    ///
    /// An ellipsis is appended only when something was cut.
    pub fn description_preview(&self, max_chars: usize) -> String {
        let mut chars = self.description.chars();
        let preview: String = chars.by_ref().take(max_chars).collect();
        if chars.next().is_some() {
            format!("{}...", preview)
        } else {
            preview
        }
    }
}

impl fmt::Display for ProductRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.price)
    }
}

fn resolve(value: Option<&str>, placeholder: &str) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(placeholder)
        .to_string()
}
