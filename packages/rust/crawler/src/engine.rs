//! Concurrent, hook-driven web crawler engine.
//!
//! The engine owns the mechanics of traversal: the BFS frontier, URL-level
//! visited dedup, concurrent or strictly sequential fetch execution, bounded
//! body reads, and link extraction. Every *decision* — whether a discovered
//! link enters the frontier, what happens to a fetched response — is
//! delegated to a [`CrawlHooks`] implementation supplied by the caller.
//!
//! In concurrent mode, [`CrawlHooks::on_response`] is invoked from worker
//! tasks and may run in parallel; implementations must be `Send + Sync`.
//! In synchronous mode exactly one fetch-and-handle cycle runs at a time,
//! which makes the whole traversal (and thus the caller's output order)
//! deterministic.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use scraper::{Html, Selector};
use tokio::sync::Semaphore;
use tracing::{debug, info, instrument, warn};
use url::Url;

use websift_shared::{HarvestConfig, Result, WebsiftError};

/// User-Agent string for crawl requests.
const USER_AGENT: &str = concat!("websift/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Hook boundary
// ---------------------------------------------------------------------------

/// A fetched response handed to [`CrawlHooks::on_response`].
#[derive(Debug, Clone)]
pub struct FetchedResponse {
    /// Absolute URL of the originating request.
    pub url: Url,
    /// Response body text.
    pub body: String,
    /// Value of the Content-Type header (empty if absent).
    pub content_type: String,
    /// Traversal depth of the page (start page = 0).
    pub depth: u32,
}

impl FetchedResponse {
    /// Path component of the request URL.
    pub fn path(&self) -> &str {
        self.url.path()
    }
}

/// Decision callbacks the engine invokes during traversal.
///
/// The engine never interprets page content beyond extracting links; it
/// asks the hooks whether each discovered link should be enqueued, and
/// hands every successfully fetched response over for processing.
pub trait CrawlHooks: Send + Sync {
    /// Whether `url`, discovered at `depth` (parent depth + 1), should be
    /// enqueued. The engine's own visited set still applies afterwards.
    fn admit_link(&self, url: &Url, depth: u32) -> bool;

    /// Handle a fetched response. May be called from concurrent workers.
    fn on_response(&self, response: &FetchedResponse);
}

// ---------------------------------------------------------------------------
// CrawlSummary
// ---------------------------------------------------------------------------

/// Summary of a completed crawl.
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    /// Number of pages successfully fetched and handed to the hooks.
    pub pages_fetched: usize,
    /// Number of pages skipped (already visited or fetch error).
    pub pages_skipped: usize,
    /// Errors encountered (URL, error message). None of these abort the crawl.
    pub errors: Vec<(String, String)>,
    /// Total duration of the crawl.
    pub duration: Duration,
}

// ---------------------------------------------------------------------------
// Crawler
// ---------------------------------------------------------------------------

/// Hook-driven web crawler. Runs to frontier exhaustion.
pub struct Crawler {
    config: HarvestConfig,
    client: Client,
}

impl Crawler {
    /// Create a new crawler with the given configuration.
    pub fn new(config: HarvestConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| WebsiftError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Crawl from the configured start URL until the frontier is exhausted.
    #[instrument(skip_all, fields(start_url = %self.config.start_url))]
    pub async fn run(&self, hooks: Arc<dyn CrawlHooks>) -> Result<CrawlSummary> {
        let start_time = std::time::Instant::now();

        let mut queue: Vec<(Url, u32)> = vec![(self.config.start_url.clone(), 0)];
        let mut visited: HashSet<String> = HashSet::new();
        let semaphore = Arc::new(Semaphore::new(self.config.concurrency as usize));

        let mut pages_fetched: usize = 0;
        let mut pages_skipped: usize = 0;
        let mut errors: Vec<(String, String)> = Vec::new();

        info!(
            concurrency = self.config.concurrency,
            synchronous = self.config.synchronous,
            max_body_size = self.config.max_body_size,
            "starting crawl"
        );

        while !queue.is_empty() {
            // Take a batch from the frontier. One page at a time in
            // synchronous mode, up to the concurrency limit otherwise.
            let batch_size = if self.config.synchronous {
                1
            } else {
                self.config.concurrency as usize
            };
            let drain_count = queue.len().min(batch_size);
            let batch: Vec<(Url, u32)> = queue.drain(..drain_count).collect();

            let mut outcomes: Vec<(Url, u32, Result<Vec<Url>>)> = Vec::new();

            if self.config.synchronous {
                for (url, depth) in batch {
                    if !visited.insert(normalize_url(&url)) {
                        pages_skipped += 1;
                        continue;
                    }
                    let outcome =
                        fetch_and_handle(&self.client, &url, depth, self.config.max_body_size, hooks.as_ref())
                            .await;
                    outcomes.push((url, depth, outcome));
                }
            } else {
                let mut handles = Vec::new();

                for (url, depth) in batch {
                    if !visited.insert(normalize_url(&url)) {
                        pages_skipped += 1;
                        continue;
                    }

                    let client = self.client.clone();
                    let sem = semaphore.clone();
                    let hooks = hooks.clone();
                    let max_body_size = self.config.max_body_size;

                    handles.push((
                        url.clone(),
                        depth,
                        tokio::spawn(async move {
                            let _permit = sem.acquire().await.expect("semaphore closed");
                            fetch_and_handle(&client, &url, depth, max_body_size, hooks.as_ref())
                                .await
                        }),
                    ));
                }

                for (url, depth, handle) in handles {
                    match handle.await {
                        Ok(links) => outcomes.push((url, depth, links)),
                        Err(e) => outcomes.push((url, depth, Err(WebsiftError::Network(format!("task failed: {e}"))))),
                    }
                }
            }

            // Feed discovered links back into the frontier, gated by the hooks.
            for (url, depth, outcome) in outcomes {
                match outcome {
                    Ok(links) => {
                        pages_fetched += 1;
                        for link in links {
                            if hooks.admit_link(&link, depth + 1) {
                                queue.push((link, depth + 1));
                            } else {
                                debug!(url = %link, depth = depth + 1, "link rejected");
                            }
                        }
                    }
                    Err(e) => {
                        warn!(%url, error = %e, "page skipped");
                        errors.push((url.to_string(), e.to_string()));
                        pages_skipped += 1;
                    }
                }
            }
        }

        let summary = CrawlSummary {
            pages_fetched,
            pages_skipped,
            errors,
            duration: start_time.elapsed(),
        };

        info!(
            pages_fetched = summary.pages_fetched,
            pages_skipped = summary.pages_skipped,
            errors = summary.errors.len(),
            duration_ms = summary.duration.as_millis(),
            "crawl completed"
        );

        Ok(summary)
    }
}

// ---------------------------------------------------------------------------
// Page fetching
// ---------------------------------------------------------------------------

/// Fetch a single page, hand it to the hooks, and return the links it
/// contains (already resolved to absolute URLs).
async fn fetch_and_handle(
    client: &Client,
    url: &Url,
    depth: u32,
    max_body_size: usize,
    hooks: &dyn CrawlHooks,
) -> Result<Vec<Url>> {
    debug!(%url, depth, "fetching page");

    let mut response = client
        .get(url.as_str())
        .send()
        .await
        .map_err(|e| WebsiftError::Network(format!("{url}: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(WebsiftError::Network(format!("{url}: HTTP {status}")));
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    // Read the body in chunks so oversized responses are abandoned early
    // instead of buffered whole.
    let mut bytes: Vec<u8> = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| WebsiftError::Network(format!("{url}: body read failed: {e}")))?
    {
        if bytes.len() + chunk.len() > max_body_size {
            return Err(WebsiftError::Network(format!(
                "{url}: body exceeds {max_body_size} bytes"
            )));
        }
        bytes.extend_from_slice(&chunk);
    }

    let body = String::from_utf8_lossy(&bytes).into_owned();

    let fetched = FetchedResponse {
        url: url.clone(),
        body,
        content_type,
        depth,
    };

    hooks.on_response(&fetched);

    // Only HTML responses contribute links to the frontier.
    let links = if fetched.content_type.to_ascii_lowercase().contains("html") {
        let doc = Html::parse_document(&fetched.body);
        extract_links(&doc, url)
    } else {
        Vec::new()
    };

    Ok(links)
}

/// Extract all links from a document, resolved against the base URL.
///
/// Malformed or unresolvable hrefs are dropped, never propagated.
fn extract_links(doc: &Html, base_url: &Url) -> Vec<Url> {
    let link_sel = Selector::parse("a[href]").expect("valid selector");
    let mut links = Vec::new();

    for el in doc.select(&link_sel) {
        if let Some(href) = el.value().attr("href") {
            // Skip anchors, javascript:, mailto:
            if href.starts_with('#')
                || href.starts_with("javascript:")
                || href.starts_with("mailto:")
            {
                continue;
            }

            if let Ok(mut resolved) = base_url.join(href) {
                resolved.set_fragment(None);
                links.push(resolved);
            }
        }
    }

    links
}

/// Normalize a URL for visited-set dedup (strip fragment, trailing slash).
fn normalize_url(url: &Url) -> String {
    let mut normalized = url.clone();
    normalized.set_fragment(None);
    let mut s = normalized.to_string();
    // Remove trailing slash for consistency (except root path)
    if s.ends_with('/') && s.matches('/').count() > 3 {
        s.pop();
    }
    s
}
