//! Hook-driven web crawler engine for websift.
//!
//! This crate provides:
//! - [`CrawlHooks`] — the decision boundary the core implements
//! - [`Crawler`] — BFS traversal with concurrent or synchronous execution
//! - [`FetchedResponse`] / [`CrawlSummary`] — the data crossing the boundary

pub mod engine;

pub use engine::{CrawlHooks, CrawlSummary, Crawler, FetchedResponse};
