//! HTML-to-Markdown conversion for websift.
//!
//! Converts raw HTML pages to Markdown using the `htmd` crate, then applies
//! a short cleanup pipeline that normalizes blank lines and whitespace.
//!
//! Navigation, header, and footer markup is intentionally kept: repeated
//! boilerplate paragraphs are suppressed downstream by the paragraph-level
//! dedup store, the first occurrence surviving. Stripping them here would
//! change what the store ever sees.

mod cleanup;

use tracing::{debug, instrument};

use websift_shared::{Result, WebsiftError};

/// Convert an HTML page to cleaned Markdown.
///
/// The conversion is a pure function of the input text. Callers that want
/// graceful degradation (conversion failure treated as an empty page) handle
/// the `Err` themselves.
#[instrument(skip(html), fields(html_len = html.len()))]
pub fn convert(html: &str) -> Result<String> {
    let converter = htmd::HtmlToMarkdown::builder()
        .skip_tags(vec!["script", "style", "iframe", "noscript", "svg"])
        .build();

    let raw = converter
        .convert(html)
        .map_err(|e| WebsiftError::Conversion(format!("htmd conversion failed: {e}")))?;

    debug!(raw_len = raw.len(), "htmd conversion complete");

    Ok(cleanup::run_pipeline(&raw))
}
