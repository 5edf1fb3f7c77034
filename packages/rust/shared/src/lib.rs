//! Shared types, error model, configuration, and admission policy for websift.
//!
//! This crate is the foundation depended on by all other websift crates.
//! It provides:
//! - [`WebsiftError`] — the unified error type
//! - Configuration ([`AppConfig`], [`HarvestConfig`], config loading)
//! - [`AdmissionPolicy`] — the link/response decision rules
//! - [`Document`] — the unit of output

pub mod config;
pub mod error;
pub mod policy;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DEFAULT_EXTENSIONS, DefaultsConfig, HarvestConfig, PoliciesConfig, config_dir,
    config_file_path, init_config, load_config, load_config_from,
};
pub use error::{Result, WebsiftError};
pub use policy::{AdmissionPolicy, LinkDecision, ResponseDecision};
pub use types::Document;
