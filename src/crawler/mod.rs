//! Crawler module for web page fetching and processing
//!
//! This module contains the worker side of the system:
//! - HTTP fetching and HTML parsing
//! - The crawl engine loop with its same-host, politeness and visit-cap rules
//! - The gatekeeper (pre-fetch) and extractor (post-fetch) policies
//! - The worker session that crawls a shard of domains

mod engine;
mod extractor;
mod fetcher;
mod gatekeeper;
mod parser;
mod session;

pub use engine::{CrawlEngine, CrawlReport, EngineError, EngineOptions, Extender};
pub use extractor::{ExtractOutcome, PageExtractor, RecordIdCounter};
pub use fetcher::{build_http_client, fetch_page, FetchResult};
pub use gatekeeper::PageGatekeeper;
pub use parser::{extract_body, extract_links, extract_title};
pub use session::{DomainOutcome, PageHandler, SessionReport, WorkerSession};

use crate::config::Config;
use crate::BlubError;

/// Runs a worker session over `domains`
///
/// This is the entry point of worker mode. It will:
/// 1. Build the extension blacklist, gatekeeper and extractor
/// 2. Configure one crawl engine for the whole session
/// 3. Crawl every domain in order, creating its output directory first
///
/// # Example
///
/// ```no_run
/// use blub_crawler::config::Config;
/// use blub_crawler::crawler::crawl;
///
/// # async fn example() -> Result<(), blub_crawler::BlubError> {
/// let report = crawl(&Config::default(), &["docs.rs".to_string()]).await?;
/// println!("{} record IDs claimed", report.ids_claimed);
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: &Config, domains: &[String]) -> Result<SessionReport, BlubError> {
    WorkerSession::new(config)?.run(domains).await
}
