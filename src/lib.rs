//! Weir: a focused crawler with trap-aware link admission
//!
//! This crate decides which discovered links of a domain-restricted crawl are
//! worth fetching, extracts normalized outlinks from fetched pages, and keeps
//! running analytics (subdomain coverage, word statistics, identified traps).

pub mod analytics;
pub mod config;
pub mod crawler;
pub mod filter;
pub mod output;
pub mod storage;
pub mod text;
pub mod url;

use thiserror::Error;

/// Main error type for Weir operations
#[derive(Debug, Error)]
pub enum WeirError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid domain: {0}")]
    InvalidDomain(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),
}

/// Result type alias for Weir operations
pub type Result<T> = std::result::Result<T, WeirError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use analytics::{AnalyticsReport, AnalyticsState};
pub use config::Config;
pub use crawler::{extract_next_links, Controller, FetchResult};
pub use filter::{Admission, RejectReason, TrapFilter};
pub use text::tokenize;
