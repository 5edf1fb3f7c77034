//! Application configuration for websift.
//!
//! User config lives at `~/.websift/websift.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, WebsiftError};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "websift.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".websift";

/// Permitted response extensions when none are configured.
///
/// The empty string means "no dot-suffix in the final path segment".
pub const DEFAULT_EXTENSIONS: [&str; 5] = ["", ".html", ".md", ".txt", ".rst"];

// ---------------------------------------------------------------------------
// Config structs (matching websift.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Admission policies.
    #[serde(default)]
    pub policies: PoliciesConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Default concurrent requests.
    #[serde(default = "default_concurrency")]
    pub concurrency: u32,

    /// Default maximum response body size in bytes.
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,

    /// Default maximum crawl depth (`0` = unbounded).
    #[serde(default)]
    pub max_depth: u32,

    /// Crawl synchronously for deterministic output.
    #[serde(default)]
    pub synchronous: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            max_body_size: default_max_body_size(),
            max_depth: 0,
            synchronous: false,
        }
    }
}

fn default_concurrency() -> u32 {
    4
}

// According to the HTTP Archive, 99% of text documents fit under this limit.
fn default_max_body_size() -> usize {
    1 << 19
}

/// `[policies]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PoliciesConfig {
    /// URL allow patterns (regex). Empty means "same subtree as the start URL".
    #[serde(default)]
    pub allow_patterns: Vec<String>,

    /// URL deny patterns (regex). A deny match overrides any allow match.
    #[serde(default)]
    pub deny_patterns: Vec<String>,

    /// Permitted response extensions. Empty means the built-in default set.
    #[serde(default)]
    pub extensions: Vec<String>,
}

// ---------------------------------------------------------------------------
// Harvest config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime harvest configuration — merged from config file + CLI flags.
///
/// Immutable once built; read concurrently by every admission check.
#[derive(Debug, Clone)]
pub struct HarvestConfig {
    /// The URL the crawl starts from.
    pub start_url: Url,
    /// URL allow patterns (regex over the absolute URL string).
    pub allow_patterns: Vec<String>,
    /// URL deny patterns (regex over the absolute URL string).
    pub deny_patterns: Vec<String>,
    /// Permitted response extensions.
    pub extensions: Vec<String>,
    /// Maximum crawl depth; `None` = unbounded.
    pub max_depth: Option<u32>,
    /// One fetch-and-handle cycle at a time, for reproducible output.
    pub synchronous: bool,
    /// Maximum concurrent HTTP requests (ignored in synchronous mode).
    pub concurrency: u32,
    /// Maximum response body size in bytes; larger bodies are skipped.
    pub max_body_size: usize,
}

impl HarvestConfig {
    /// Build a harvest config for `start_url` from app config defaults.
    pub fn new(start_url: &str, config: &AppConfig) -> Result<Self> {
        let start_url = Url::parse(start_url)
            .map_err(|e| WebsiftError::config(format!("invalid start URL '{start_url}': {e}")))?;

        let extensions = if config.policies.extensions.is_empty() {
            DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect()
        } else {
            config.policies.extensions.clone()
        };

        Ok(Self {
            start_url,
            allow_patterns: config.policies.allow_patterns.clone(),
            deny_patterns: config.policies.deny_patterns.clone(),
            extensions,
            max_depth: match config.defaults.max_depth {
                0 => None,
                n => Some(n),
            },
            synchronous: config.defaults.synchronous,
            concurrency: config.defaults.concurrency.max(1),
            max_body_size: config.defaults.max_body_size,
        })
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.websift/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| WebsiftError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.websift/websift.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| WebsiftError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| WebsiftError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| WebsiftError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| WebsiftError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| WebsiftError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
