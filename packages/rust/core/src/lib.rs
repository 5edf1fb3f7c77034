//! Core harvesting logic for websift.
//!
//! This crate ties the admission policy, the crawler engine, and Markdown
//! conversion into the deduplicating document stream:
//! - [`dedup`] — fingerprints and the crawl-wide paragraph store
//! - [`assembler`] — fetched body → deduplicated [`Document`](websift_shared::Document)
//! - [`sink`] — append-only document output
//! - [`driver`] — the engine's hook implementation
//! - [`pipeline`] — the `harvest` entry point

pub mod assembler;
pub mod dedup;
pub mod driver;
pub mod pipeline;
pub mod sink;

pub use assembler::DocumentAssembler;
pub use dedup::{Fingerprint, FingerprintStore};
pub use driver::CrawlDriver;
pub use pipeline::{HarvestSummary, harvest};
pub use sink::{DocumentSink, MemorySink, WriterSink};
