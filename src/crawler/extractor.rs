//! HTML content extraction
//!
//! This module turns a parsed document into a [`ContentRecord`]:
//! - Headings (`h1` through `h6`)
//! - Paragraphs (`p`)
//! - List items that sit inside an unordered list (`ul li`)
//! - Raw link targets (`a[href]`)
//! - Raw image sources (`img[src]`)
//!
//! Extraction is lossless for attribute values: hrefs and srcs are recorded
//! exactly as written, and resolution happens in the crawl controller.

use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

/// Content extracted from a single page
///
/// Field order and serialized names match the persisted aggregate layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentRecord {
    /// Trimmed text of every heading, in document order
    #[serde(rename = "Headings")]
    pub headings: Vec<String>,

    /// Trimmed text of every paragraph, in document order
    #[serde(rename = "Paragraphs")]
    pub paragraphs: Vec<String>,

    /// Trimmed text of every list item inside a `<ul>`
    #[serde(rename = "Lists")]
    pub lists: Vec<String>,

    /// Raw, unresolved `href` values
    #[serde(rename = "Links")]
    pub links: Vec<String>,

    /// Raw, unresolved `src` values
    #[serde(rename = "Images")]
    pub images: Vec<String>,
}

impl ContentRecord {
    /// Returns true if nothing at all was extracted
    pub fn is_empty(&self) -> bool {
        self.headings.is_empty()
            && self.paragraphs.is_empty()
            && self.lists.is_empty()
            && self.links.is_empty()
            && self.images.is_empty()
    }
}

/// Extracts a content record from a parsed document
///
/// # Extraction Rules
///
/// - Headings: every `h1`-`h6`, text trimmed
/// - Paragraphs: every `<p>`, text trimmed
/// - Lists: every `<li>` with a `<ul>` ancestor; items that only sit in an
///   `<ol>` are not recorded
/// - Links: the `href` of every `<a>`, skipped when missing or empty
/// - Images: the `src` of every `<img>`, skipped when missing or empty
///
/// Text inside nested `<script>` or `<style>` elements is not filtered out.
///
/// # Example
///
/// ```
/// use scraper::Html;
/// use sitescrape::crawler::extract;
///
/// let document = Html::parse_document(r#"<h1>Title</h1><a href="/x">x</a>"#);
/// let record = extract(&document);
/// assert_eq!(record.headings, vec!["Title"]);
/// assert_eq!(record.links, vec!["/x"]);
/// ```
pub fn extract(document: &Html) -> ContentRecord {
    ContentRecord {
        headings: extract_text(document, "h1, h2, h3, h4, h5, h6"),
        paragraphs: extract_text(document, "p"),
        lists: extract_text(document, "ul li"),
        links: extract_attr(document, "a[href]", "href"),
        images: extract_attr(document, "img[src]", "src"),
    }
}

/// Parses an HTML string and extracts its content record
pub fn extract_html(html: &str) -> ContentRecord {
    let document = Html::parse_document(html);
    extract(&document)
}

/// Collects the trimmed text of every element matching `selector`
fn extract_text(document: &Html, selector: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse(selector) else {
        return Vec::new();
    };

    document
        .select(&selector)
        .map(|element| element.text().collect::<String>().trim().to_string())
        .collect()
}

/// Collects the raw value of `attr` for every element matching `selector`
fn extract_attr(document: &Html, selector: &str, attr: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse(selector) else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr(attr))
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}
