//! HTML parser for extracting page text and links
//!
//! This module handles parsing HTML content to extract:
//! - The text of the `<title>` and `<body>` elements
//! - Links to follow (from `<a>` tags and canonical links)

use scraper::{Html, Selector};
use url::Url;

/// Returns the concatenated text of every element matching `selector`
///
/// A missing element yields an empty string.
fn element_text(document: &Html, selector: &str) -> String {
    let Ok(selector) = Selector::parse(selector) else {
        return String::new();
    };

    document
        .select(&selector)
        .flat_map(|element| element.text())
        .collect()
}

/// Extracts the text of the `<title>` element(s)
pub fn extract_title(document: &Html) -> String {
    element_text(document, "title")
}

/// Extracts the text of the `<body>` element, including script and style text
pub fn extract_body(document: &Html) -> String {
    element_text(document, "body")
}

/// Extracts all followable links from the HTML document
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` tags
/// - `<link rel="canonical" href="...">`
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` and `data:` links
/// - Fragment-only links
/// - Anything that does not resolve to an HTTP(S) URL
pub fn extract_links(document: &Html, base_url: &Url) -> Vec<Url> {
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if element.value().attr("download").is_some() {
                continue;
            }

            if let Some(href) = element.value().attr("href") {
                if let Some(absolute_url) = resolve_link(href, base_url) {
                    links.push(absolute_url);
                }
            }
        }
    }

    if let Ok(canonical_selector) = Selector::parse("link[rel='canonical'][href]") {
        for element in document.select(&canonical_selector) {
            if let Some(href) = element.value().attr("href") {
                if let Some(absolute_url) = resolve_link(href, base_url) {
                    links.push(absolute_url);
                }
            }
        }
    }

    links
}

/// Resolves a link href to an absolute URL
///
/// Returns None if the link should be excluded.
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    match absolute_url.scheme() {
        "http" | "https" => Some(absolute_url),
        _ => None,
    }
}
