use crate::config::defaults;
use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Blub Crawler
///
/// Every field has a compiled-in default, so a TOML file only needs to list
/// the values it overrides.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,

    /// Source domains, optionally with a path suffix
    pub domains: Vec<String>,

    /// Path extensions (with leading dot) that are never fetched
    pub blacklisted_extensions: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crawler: CrawlerConfig::default(),
            user_agent: UserAgentConfig::default(),
            output: OutputConfig::default(),
            domains: defaults::SOURCE_DOMAINS.iter().map(|d| d.to_string()).collect(),
            blacklisted_extensions: defaults::BLACKLISTED_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Maximum number of domains handed to one worker process
    pub domains_per_process: usize,

    /// Politeness delay between fetch starts (milliseconds)
    pub crawl_delay_ms: u64,

    /// Maximum number of fetches per domain crawl
    pub max_visits: u32,

    /// Maximum number of fetches in flight at once within a worker
    pub max_concurrent_fetches: usize,

    /// Per-request timeout (seconds)
    pub request_timeout_secs: u64,

    /// Only follow links on the seed's host
    pub same_host_only: bool,

    /// Scheme used to build seed URLs from domain names
    pub seed_scheme: String,
}

impl CrawlerConfig {
    pub fn crawl_delay(&self) -> Duration {
        Duration::from_millis(self.crawl_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            domains_per_process: 5,
            crawl_delay_ms: 1,
            max_visits: 10_000,
            max_concurrent_fetches: 1,
            request_timeout_secs: 30,
            same_host_only: true,
            seed_scheme: "https".to_string(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct UserAgentConfig {
    /// Sent verbatim as the `User-Agent` header
    pub name: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            name: "BLUB_CRAWLER".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Root of the `<host>/<id>.blub1` tree
    pub data_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            data_dir: "blub1-data".to_string(),
        }
    }
}
