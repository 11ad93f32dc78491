//! Shared types, error model, and configuration for Sales Insights.
//!
//! This crate is the foundation depended on by all other Sales Insights crates.
//! It provides:
//! - [`SalesInsightsError`] — the unified error type
//! - Domain types ([`SearchResult`], [`SearchPayload`], [`Alert`], [`Report`], [`ReportRequest`])
//! - Configuration ([`AppConfig`], [`SearchConfig`], [`LlmConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, ExportConfig, LlmConfig, SearchConfig, config_dir, config_file_path, init_config,
    load_config, load_config_from, validate_api_keys,
};
pub use error::{Result, SalesInsightsError};
pub use types::{
    Alert, Report, ReportId, ReportRequest, SNIPPET_MAX_CHARS, SearchPayload, SearchResult,
};
