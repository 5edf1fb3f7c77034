//! Document assembly: conversion, paragraph splitting, crawl-wide dedup.
//!
//! The assembler turns a fetched body into a [`Document`], dropping every
//! paragraph the crawl has already emitted. Dedup operates at paragraph
//! granularity so a page repeating common boilerplate (navigation, footer)
//! still contributes its unique paragraphs; the boilerplate survives only
//! at its first occurrence anywhere in the crawl.

use std::sync::Arc;

use tracing::{debug, warn};
use url::Url;

use websift_shared::Document;

use crate::dedup::{Fingerprint, FingerprintStore};

/// Assembles deduplicated documents from fetched responses.
///
/// Cheap to share; all mutable state lives in the fingerprint store.
pub struct DocumentAssembler {
    store: Arc<FingerprintStore>,
}

impl DocumentAssembler {
    /// Create an assembler backed by the given store.
    pub fn new(store: Arc<FingerprintStore>) -> Self {
        Self { store }
    }

    /// Assemble a fetched body into a document.
    ///
    /// HTML bodies are converted to Markdown first; conversion failure
    /// degrades to an empty page rather than aborting the crawl. Returns
    /// `None` when every paragraph was already seen — whole-page
    /// suppression falls out naturally.
    pub fn assemble(&self, source_url: &Url, body: &str, content_type: &str) -> Option<Document> {
        let text = if is_html(source_url.path(), content_type) {
            match websift_markdown::convert(body) {
                Ok(markdown) => markdown,
                Err(e) => {
                    warn!(url = %source_url, error = %e, "conversion failed, treating page as empty");
                    String::new()
                }
            }
        } else {
            body.to_string()
        };

        let mut kept: Vec<&str> = Vec::new();
        for paragraph in text.split("\n\n") {
            let paragraph = paragraph.trim();
            if paragraph.is_empty() {
                continue;
            }
            if self.store.insert_if_absent(Fingerprint::of(paragraph)) {
                kept.push(paragraph);
            }
        }

        let joined = kept.join("\n\n");
        let joined = joined.trim();

        if joined.is_empty() {
            debug!(url = %source_url, "every paragraph was a duplicate, page suppressed");
            return None;
        }

        Some(Document {
            name: source_url.to_string(),
            body: joined.to_string(),
        })
    }
}

/// Whether a response should go through Markdown conversion.
fn is_html(path: &str, content_type: &str) -> bool {
    path.ends_with(".html")
        || path.ends_with(".htm")
        || content_type.to_ascii_lowercase().contains("html")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assembler() -> DocumentAssembler {
        DocumentAssembler::new(Arc::new(FingerprintStore::new()))
    }

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn preserves_paragraph_order_within_a_page() {
        let a = assembler();
        let doc = a
            .assemble(&url("https://example.com/p"), "A\n\nB\n\nC", "text/plain")
            .unwrap();

        assert_eq!(doc.name, "https://example.com/p");
        assert_eq!(doc.body, "A\n\nB\n\nC");
    }

    #[test]
    fn suppresses_paragraphs_across_pages() {
        let a = assembler();

        let first = a
            .assemble(&url("https://example.com/1"), "A\n\nB", "text/plain")
            .unwrap();
        assert_eq!(first.body, "A\n\nB");

        // B was already emitted by page 1; only C survives.
        let second = a
            .assemble(&url("https://example.com/2"), "B\n\nC", "text/plain")
            .unwrap();
        assert_eq!(second.body, "C");
    }

    #[test]
    fn suppresses_a_wholly_duplicate_page() {
        let a = assembler();

        a.assemble(&url("https://example.com/1"), "A\n\nB", "text/plain")
            .unwrap();

        let repeat = a.assemble(&url("https://example.com/2"), "B\n\nA", "text/plain");
        assert!(repeat.is_none());
    }

    #[test]
    fn trims_paragraph_whitespace_before_fingerprinting() {
        let a = assembler();

        a.assemble(&url("https://example.com/1"), "  A  \n\nB", "text/plain")
            .unwrap();

        // "A" with different surrounding whitespace is the same paragraph.
        let second = a.assemble(&url("https://example.com/2"), "A\n\n   B\t", "text/plain");
        assert!(second.is_none());
    }

    #[test]
    fn converts_html_bodies_to_markdown() {
        let a = assembler();
        let html = "<html><body><h1>Title</h1><p>Some text.</p></body></html>";

        let doc = a
            .assemble(&url("https://example.com/page.html"), html, "text/html")
            .unwrap();
        assert!(doc.body.contains("# Title"));
        assert!(doc.body.contains("Some text."));
        assert!(!doc.body.contains("<p>"));
    }

    #[test]
    fn html_detection_by_path_or_content_type() {
        assert!(is_html("/guide/intro.html", "text/plain"));
        assert!(is_html("/guide/intro", "text/html; charset=utf-8"));
        assert!(is_html("/guide/intro", "Text/HTML"));
        assert!(!is_html("/notes.txt", "text/plain"));
    }

    #[test]
    fn plain_text_passes_verbatim() {
        let a = assembler();
        let doc = a
            .assemble(
                &url("https://example.com/notes.txt"),
                "First note.\n\nSecond note.",
                "text/plain",
            )
            .unwrap();
        assert_eq!(doc.body, "First note.\n\nSecond note.");
    }

    #[test]
    fn empty_body_yields_no_document() {
        let a = assembler();
        assert!(a
            .assemble(&url("https://example.com/empty"), "", "text/plain")
            .is_none());
        assert!(a
            .assemble(&url("https://example.com/blank"), "  \n\n  ", "text/plain")
            .is_none());
    }

    #[test]
    fn boilerplate_survives_only_once() {
        let a = assembler();
        let nav = "[Home](/) | [Docs](/docs)";

        let page1 = format!("{nav}\n\nUnique to page one.");
        let page2 = format!("{nav}\n\nUnique to page two.");

        let first = a
            .assemble(&url("https://example.com/1"), &page1, "text/plain")
            .unwrap();
        assert!(first.body.contains(nav));

        let second = a
            .assemble(&url("https://example.com/2"), &page2, "text/plain")
            .unwrap();
        assert!(!second.body.contains(nav));
        assert_eq!(second.body, "Unique to page two.");
    }
}
