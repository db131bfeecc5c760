//! URL handling module for Blub Crawler
//!
//! This module provides URL normalization, host extraction, seed URL
//! construction and the path-extension blacklist.

mod domain;
mod extension;
mod normalize;

// Re-export main functions
pub use domain::{extract_domain, seed_url};
pub use extension::{path_extension, ExtensionFilter};
pub use normalize::normalize_url;
