//! Configuration module for Blub Crawler
//!
//! The crawler runs from compiled-in defaults (domain list, extension
//! blacklist, crawl limits). An optional TOML file overrides any subset of
//! them.
//!
//! # Example
//!
//! ```no_run
//! use blub_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("blub.toml")).unwrap();
//! println!("Crawling {} domains", config.domains.len());
//! ```

mod defaults;
mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};

pub use defaults::{BLACKLISTED_EXTENSIONS, SOURCE_DOMAINS};
pub use parser::{load_config, load_or_default, parse_config};
pub use validation::{validate, validate_domains};
