//! URL admission policy: which links get fetched, which responses get emitted.
//!
//! The policy is a pure decision function compiled once at startup from the
//! harvest config. It holds no locks and is safe to consult from any number
//! of concurrent workers. Evaluation order matters: a deny match overrides
//! an allow match even when both apply.

use regex::Regex;
use url::Url;

use crate::config::HarvestConfig;
use crate::error::{Result, WebsiftError};

/// Decision for a discovered link, made before it enters the frontier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkDecision {
    /// Enqueue the link for fetching.
    Visit,
    /// Drop the link silently.
    Reject,
}

/// Decision for a fetched response, made before any conversion work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseDecision {
    /// Convert, deduplicate, and stream the body.
    Emit,
    /// Discard the body without further work.
    Suppress,
}

/// Compiled admission rules. Immutable after construction.
#[derive(Debug)]
pub struct AdmissionPolicy {
    /// Deny patterns, matched against the absolute URL string. First priority.
    deny: Vec<Regex>,
    /// Allow patterns; a URL must match at least one.
    allow: Vec<Regex>,
    /// Permitted response extensions ("" = no dot-suffix).
    extensions: Vec<String>,
    /// Links discovered deeper than this are rejected.
    max_depth: Option<u32>,
}

impl AdmissionPolicy {
    /// Compile the policy from a harvest config.
    ///
    /// Pattern compilation errors are fatal: the crawl must not start with a
    /// policy that silently admits or drops the wrong URLs. An empty allow
    /// list becomes a single pattern pinning the crawl to the start URL's
    /// own subtree.
    pub fn new(config: &HarvestConfig) -> Result<Self> {
        let deny = compile_patterns(&config.deny_patterns, "deny")?;

        let allow = if config.allow_patterns.is_empty() {
            vec![default_allow_pattern(&config.start_url)?]
        } else {
            compile_patterns(&config.allow_patterns, "allow")?
        };

        Ok(Self {
            deny,
            allow,
            extensions: config.extensions.clone(),
            max_depth: config.max_depth,
        })
    }

    /// Decide whether a discovered link should be fetched.
    ///
    /// `depth` is the link's own depth: parent page depth + 1.
    pub fn decide_link(&self, url: &Url, depth: u32) -> LinkDecision {
        let target = url.as_str();

        if self.deny.iter().any(|p| p.is_match(target)) {
            return LinkDecision::Reject;
        }

        if !self.allow.iter().any(|p| p.is_match(target)) {
            return LinkDecision::Reject;
        }

        if let Some(max) = self.max_depth {
            if depth > max {
                return LinkDecision::Reject;
            }
        }

        LinkDecision::Visit
    }

    /// Decide whether a fetched response should be converted and emitted.
    ///
    /// Applied once the body has been fetched; a `Suppress` here means the
    /// body is dropped before any conversion or dedup work is spent on it.
    pub fn decide_response(&self, path: &str, content_type: &str) -> ResponseDecision {
        if !self.extension_permitted(path) {
            return ResponseDecision::Suppress;
        }

        if !content_type.to_ascii_lowercase().starts_with("text/") {
            return ResponseDecision::Suppress;
        }

        ResponseDecision::Emit
    }

    fn extension_permitted(&self, path: &str) -> bool {
        self.extensions.iter().any(|ext| {
            if ext.is_empty() {
                // Empty extension matches only paths with no dot-suffix.
                !path.rsplit('/').next().unwrap_or(path).contains('.')
            } else {
                path.ends_with(ext.as_str())
            }
        })
    }
}

/// Compile a list of user-supplied regex patterns, failing fast on the first bad one.
fn compile_patterns(patterns: &[String], kind: &str) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| {
            Regex::new(p)
                .map_err(|e| WebsiftError::config(format!("invalid {kind} pattern '{p}': {e}")))
        })
        .collect()
}

/// The implicit allow pattern: "starts with the start URL", query and
/// fragment stripped, so the crawl stays in the same subtree by default.
fn default_allow_pattern(start_url: &Url) -> Result<Regex> {
    let mut subtree = start_url.clone();
    subtree.set_query(None);
    subtree.set_fragment(None);

    Regex::new(&format!("^{}", regex::escape(subtree.as_str())))
        .map_err(|e| WebsiftError::config(format!("default allow pattern: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn harvest(start: &str) -> HarvestConfig {
        HarvestConfig::new(start, &AppConfig::default()).unwrap()
    }

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn deny_overrides_allow() {
        let mut config = harvest("https://docs.example.com/guide/");
        config.allow_patterns = vec!["^https://docs\\.example\\.com/".into()];
        config.deny_patterns = vec!["/guide/internal/".into()];
        let policy = AdmissionPolicy::new(&config).unwrap();

        // Matches both lists; deny wins.
        let both = url("https://docs.example.com/guide/internal/secrets");
        assert_eq!(policy.decide_link(&both, 1), LinkDecision::Reject);

        let allowed = url("https://docs.example.com/guide/intro");
        assert_eq!(policy.decide_link(&allowed, 1), LinkDecision::Visit);
    }

    #[test]
    fn default_allow_is_start_subtree() {
        let policy = AdmissionPolicy::new(&harvest("https://docs.example.com/guide/")).unwrap();

        let under = url("https://docs.example.com/guide/intro");
        assert_eq!(policy.decide_link(&under, 1), LinkDecision::Visit);

        let sibling = url("https://docs.example.com/blog/post");
        assert_eq!(policy.decide_link(&sibling, 1), LinkDecision::Reject);

        let other_host = url("https://other.example.com/guide/intro");
        assert_eq!(policy.decide_link(&other_host, 1), LinkDecision::Reject);
    }

    #[test]
    fn default_allow_ignores_start_query() {
        let policy =
            AdmissionPolicy::new(&harvest("https://docs.example.com/guide/?lang=en")).unwrap();

        let under = url("https://docs.example.com/guide/intro");
        assert_eq!(policy.decide_link(&under, 1), LinkDecision::Visit);
    }

    #[test]
    fn depth_bound_rejects_deeper_links() {
        let mut config = harvest("https://docs.example.com/");
        config.max_depth = Some(1);
        let policy = AdmissionPolicy::new(&config).unwrap();

        let page = url("https://docs.example.com/a");
        assert_eq!(policy.decide_link(&page, 1), LinkDecision::Visit);
        assert_eq!(policy.decide_link(&page, 2), LinkDecision::Reject);
    }

    #[test]
    fn unbounded_depth_admits_everything_in_scope() {
        let policy = AdmissionPolicy::new(&harvest("https://docs.example.com/")).unwrap();
        let page = url("https://docs.example.com/deep/deeper/deepest");
        assert_eq!(policy.decide_link(&page, 40), LinkDecision::Visit);
    }

    #[test]
    fn bad_pattern_is_fatal() {
        let mut config = harvest("https://docs.example.com/");
        config.deny_patterns = vec!["[".into()];
        let result = AdmissionPolicy::new(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("deny pattern"));
    }

    #[test]
    fn extension_gate_suppresses_binaries() {
        let policy = AdmissionPolicy::new(&harvest("https://docs.example.com/")).unwrap();

        // Wrong extension suppresses even with a text content type.
        assert_eq!(
            policy.decide_response("/images/logo.png", "text/plain"),
            ResponseDecision::Suppress
        );

        assert_eq!(
            policy.decide_response("/guide/intro.html", "text/html; charset=utf-8"),
            ResponseDecision::Emit
        );
    }

    #[test]
    fn empty_extension_means_no_dot_suffix() {
        let policy = AdmissionPolicy::new(&harvest("https://docs.example.com/")).unwrap();

        assert_eq!(
            policy.decide_response("/guide/intro", "text/html"),
            ResponseDecision::Emit
        );
        // Dotted final segment does not match the empty extension.
        assert_eq!(
            policy.decide_response("/archive.tar.gz", "text/plain"),
            ResponseDecision::Suppress
        );
        // A dot earlier in the path is fine.
        assert_eq!(
            policy.decide_response("/v1.2/guide", "text/html"),
            ResponseDecision::Emit
        );
    }

    #[test]
    fn content_type_gate_requires_text_prefix() {
        let policy = AdmissionPolicy::new(&harvest("https://docs.example.com/")).unwrap();

        // Extension passes (no dot-suffix) but content type is not text/*.
        assert_eq!(
            policy.decide_response("/api/data", "application/json"),
            ResponseDecision::Suppress
        );
        // Case-insensitive prefix match.
        assert_eq!(
            policy.decide_response("/guide/intro", "Text/HTML; charset=utf-8"),
            ResponseDecision::Emit
        );
    }
}
