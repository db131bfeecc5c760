//! Blub Crawler: a documentation-site harvester
//!
//! This crate crawls a fixed set of documentation domains, one worker process
//! per shard of domains, and stores every fetched page as a Blub1 binary record
//! for a downstream indexer.

pub mod blub1;
pub mod config;
pub mod crawler;
pub mod orchestrator;
pub mod url;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Blub Crawler operations
#[derive(Debug, Error)]
pub enum BlubError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Record error: {0}")]
    Record(#[from] blub1::Blub1Error),

    #[error("Crawl engine error: {0}")]
    Engine(#[from] crawler::EngineError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to create output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write record {}: {source}", path.display())]
    RecordWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
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

    #[error("Invalid domain: {0}")]
    InvalidDomain(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for Blub Crawler operations
pub type Result<T> = std::result::Result<T, BlubError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use blub1::{decode, encode, Blub1Error, Blub1Record};
pub use config::Config;
pub use crate::url::{extract_domain, normalize_url, seed_url, ExtensionFilter};
