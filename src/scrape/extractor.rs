//! HTML extraction of product cards
//!
//! This module turns page markup into `ProductRecord`s:
//! - Parsing markup into a node tree
//! - Finding product containers through a pluggable `ContainerMatcher`
//! - Reading title, price and description from fixed nested nodes
//!
//! Price and description nodes must carry exactly the storefront's class
//! attribute, like containers do; the title link only needs the `title`
//! class. The nested field lookups are tied to one storefront layout. There is no
//! fallback strategy when the layout differs; only the container rule can
//! be swapped.

use crate::model::ProductRecord;
use crate::ScrapeError;
use scraper::{ElementRef, Html, Selector};

/// Tag of the default product container
pub const DEFAULT_CONTAINER_TAG: &str = "div";

/// Class attribute of the default product container
pub const DEFAULT_CONTAINER_CLASS: &str = "col-md-4 col-xl-4 col-lg-4";

/// Class attribute of the price heading inside a container
pub const PRICE_CLASS: &str = "price float-end card-title pull-right";

/// Class attribute of the description paragraph inside a container
pub const DESCRIPTION_CLASS: &str = "description card-text";

const TITLE_SELECTOR: &str = "a.title";

/// Decides whether an element is a product container
///
/// Closures of the form `Fn(&ElementRef) -> bool` implement this trait, so
/// an alternative page shape only needs a new predicate.
pub trait ContainerMatcher: Send + Sync {
    fn matches(&self, element: &ElementRef<'_>) -> bool;
}

impl<F> ContainerMatcher for F
where
    F: Fn(&ElementRef<'_>) -> bool + Send + Sync,
{
    fn matches(&self, element: &ElementRef<'_>) -> bool {
        self(element)
    }
}

/// Matches elements by tag name and exact class attribute value
///
/// The class attribute is compared after collapsing whitespace, so
/// `"a  b"` matches `"a b"`, but the class order must be the same and no
/// extra classes are allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassAttributeMatcher {
    tag: String,
    class: String,
}

impl ClassAttributeMatcher {
    pub fn new(tag: impl Into<String>, class: &str) -> Self {
        Self {
            tag: tag.into(),
            class: normalize_class(class),
        }
    }

    /// Returns the first element below `root` that matches, in document order
    fn find_within<'a>(&self, root: ElementRef<'a>) -> Option<ElementRef<'a>> {
        root.descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .find(|element| self.matches(element))
    }
}

impl Default for ClassAttributeMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_CONTAINER_TAG, DEFAULT_CONTAINER_CLASS)
    }
}

impl ContainerMatcher for ClassAttributeMatcher {
    fn matches(&self, element: &ElementRef<'_>) -> bool {
        let value = element.value();
        value.name().eq_ignore_ascii_case(&self.tag)
            && value
                .attr("class")
                .map(|class| normalize_class(class) == self.class)
                .unwrap_or(false)
    }
}

fn normalize_class(class: &str) -> String {
    class.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parses markup into a node tree
///
/// The HTML parser recovers from malformed input, so the only hard failure
/// is a document with no content at all.
pub fn parse_document(markup: &str) -> Result<Html, ScrapeError> {
    if markup.trim().is_empty() {
        return Err(ScrapeError::HtmlParse("document is empty".to_string()));
    }

    let document = Html::parse_document(markup);
    if !document.errors.is_empty() {
        tracing::debug!(
            "HTML parsed with {} recoverable errors",
            document.errors.len()
        );
    }
    tracing::info!("HTML parsing complete");

    Ok(document)
}

/// Extracts product records from page markup
pub struct HtmlExtractor {
    matcher: Box<dyn ContainerMatcher>,
    title: Selector,
    price: ClassAttributeMatcher,
    description: ClassAttributeMatcher,
}

impl HtmlExtractor {
    /// Creates an extractor for the default storefront layout
    pub fn new() -> Result<Self, ScrapeError> {
        Self::with_matcher(ClassAttributeMatcher::default())
    }

    /// Creates an extractor with a custom container rule
    pub fn with_matcher(matcher: impl ContainerMatcher + 'static) -> Result<Self, ScrapeError> {
        Ok(Self {
            matcher: Box::new(matcher),
            title: compile_selector(TITLE_SELECTOR)?,
            price: ClassAttributeMatcher::new("h4", PRICE_CLASS),
            description: ClassAttributeMatcher::new("p", DESCRIPTION_CLASS),
        })
    }

    /// Parses `markup` and extracts every product record
    ///
    /// Returns an empty list when the markup cannot be parsed.
    pub fn extract(&self, markup: &str) -> Vec<ProductRecord> {
        match parse_document(markup) {
            Ok(document) => self.extract_from(&document),
            Err(e) => {
                tracing::warn!("Data extraction error: {}", e);
                Vec::new()
            }
        }
    }

    /// Extracts product records from an already parsed document
    ///
    /// Records come back in document order of their containers.
    pub fn extract_from(&self, document: &Html) -> Vec<ProductRecord> {
        tracing::info!("Starting product extraction...");

        let records: Vec<ProductRecord> = document
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|element| self.matcher.matches(element))
            .map(|container| self.extract_record(container))
            .collect();

        tracing::info!("Extraction complete - {} products found", records.len());
        records
    }

    fn extract_record(&self, container: ElementRef<'_>) -> ProductRecord {
        let title = container.select(&self.title).next().map(|link| {
            link.value()
                .attr("title")
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| element_text(&link))
        });

        let price = self
            .price
            .find_within(container)
            .map(|node| element_text(&node));

        let description = self
            .description
            .find_within(container)
            .map(|node| element_text(&node));

        let record =
            ProductRecord::from_parts(title.as_deref(), price.as_deref(), description.as_deref());
        tracing::debug!("Extracted product: {}", record);
        record
    }
}

impl std::fmt::Debug for HtmlExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HtmlExtractor").finish_non_exhaustive()
    }
}

fn compile_selector(css: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(css).map_err(|e| ScrapeError::HtmlParse(format!("bad selector {}: {:?}", css, e)))
}

fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
