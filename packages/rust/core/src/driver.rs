//! The crawl driver: decisions supplied to the engine's hook boundary.
//!
//! The driver owns no scheduling. It reacts to engine callbacks — possibly
//! from many worker tasks at once — by consulting the admission policy,
//! running the document assembler, and streaming finalized documents to the
//! sink immediately.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::{debug, warn};
use url::Url;

use websift_crawler::{CrawlHooks, FetchedResponse};
use websift_shared::{AdmissionPolicy, LinkDecision, ResponseDecision};

use crate::assembler::DocumentAssembler;
use crate::sink::DocumentSink;

/// Implements [`CrawlHooks`] over the policy, assembler, and sink.
pub struct CrawlDriver {
    policy: AdmissionPolicy,
    assembler: DocumentAssembler,
    sink: Arc<dyn DocumentSink>,
    documents_emitted: AtomicUsize,
    pages_suppressed: AtomicUsize,
}

impl CrawlDriver {
    /// Build a driver from its collaborators.
    pub fn new(
        policy: AdmissionPolicy,
        assembler: DocumentAssembler,
        sink: Arc<dyn DocumentSink>,
    ) -> Self {
        Self {
            policy,
            assembler,
            sink,
            documents_emitted: AtomicUsize::new(0),
            pages_suppressed: AtomicUsize::new(0),
        }
    }

    /// Number of documents streamed so far.
    pub fn documents_emitted(&self) -> usize {
        self.documents_emitted.load(Ordering::Relaxed)
    }

    /// Number of responses suppressed (filtered out or wholly duplicate).
    pub fn pages_suppressed(&self) -> usize {
        self.pages_suppressed.load(Ordering::Relaxed)
    }
}

impl CrawlHooks for CrawlDriver {
    fn admit_link(&self, url: &Url, depth: u32) -> bool {
        matches!(self.policy.decide_link(url, depth), LinkDecision::Visit)
    }

    fn on_response(&self, response: &FetchedResponse) {
        match self
            .policy
            .decide_response(response.path(), &response.content_type)
        {
            ResponseDecision::Suppress => {
                debug!(url = %response.url, content_type = %response.content_type, "response suppressed");
                self.pages_suppressed.fetch_add(1, Ordering::Relaxed);
            }
            ResponseDecision::Emit => {
                match self
                    .assembler
                    .assemble(&response.url, &response.body, &response.content_type)
                {
                    Some(document) => {
                        if let Err(e) = self.sink.emit(&document) {
                            // A lost document is not worth aborting the crawl.
                            warn!(url = %response.url, error = %e, "failed to emit document");
                        } else {
                            self.documents_emitted.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                    None => {
                        self.pages_suppressed.fetch_add(1, Ordering::Relaxed);
                    }
                }
            }
        }
    }
}
