//! Worker crawl session - crawls one shard of domains in order
//!
//! A session owns a single crawl engine configured with the gatekeeper and
//! extractor, and one record ID counter for its whole lifetime. Per-domain
//! crawl failures are logged and skipped; failing to create an output
//! directory or to write a created record ends the session.

use crate::config::Config;
use crate::crawler::engine::{CrawlEngine, CrawlReport, EngineError, EngineOptions, Extender};
use crate::crawler::extractor::{ExtractOutcome, PageExtractor};
use crate::crawler::gatekeeper::PageGatekeeper;
use crate::url::{extract_domain, seed_url, ExtensionFilter};
use crate::BlubError;
use scraper::Html;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use url::Url;

/// Connects the engine's callbacks to the gatekeeper and the extractor
#[derive(Debug)]
pub struct PageHandler {
    gatekeeper: PageGatekeeper,
    extractor: PageExtractor,
}

impl PageHandler {
    pub fn new(gatekeeper: PageGatekeeper, extractor: PageExtractor) -> Self {
        Self {
            gatekeeper,
            extractor,
        }
    }

    pub fn extractor(&self) -> &PageExtractor {
        &self.extractor
    }
}

impl Extender for PageHandler {
    fn filter(&self, url: &Url, already_visited: bool) -> bool {
        self.gatekeeper.should_fetch(url, already_visited)
    }

    fn visit(&self, url: &Url, document: &Html) -> Result<(), BlubError> {
        // Dropped and oversize pages are already logged; the crawl goes on.
        let _: ExtractOutcome = self.extractor.extract(url, document)?;
        Ok(())
    }
}

/// How one domain of a shard ended
#[derive(Debug)]
pub enum DomainOutcome {
    Crawled(CrawlReport),
    Failed(String),
}

/// Per-domain results of a finished session
#[derive(Debug, Default)]
pub struct SessionReport {
    pub domains: Vec<(String, DomainOutcome)>,

    /// Record IDs handed out, including those of dropped pages
    pub ids_claimed: u64,
}

impl SessionReport {
    pub fn failed_domains(&self) -> impl Iterator<Item = &str> {
        self.domains.iter().filter_map(|(domain, outcome)| match outcome {
            DomainOutcome::Failed(_) => Some(domain.as_str()),
            DomainOutcome::Crawled(_) => None,
        })
    }
}

/// One worker's crawl over its assigned domains
pub struct WorkerSession {
    engine: CrawlEngine,
    handler: Arc<PageHandler>,
    seed_scheme: String,
}

impl WorkerSession {
    /// Builds a session from the configuration
    ///
    /// The extension blacklist and engine options are fixed here for the
    /// session's lifetime.
    pub fn new(config: &Config) -> Result<Self, BlubError> {
        let filter = ExtensionFilter::new(config.blacklisted_extensions.iter().cloned());
        let handler = Arc::new(PageHandler::new(
            PageGatekeeper::new(filter),
            PageExtractor::new(&config.output.data_dir),
        ));

        let options = EngineOptions::from_config(&config.crawler, &config.user_agent);
        let engine = CrawlEngine::new(options, handler.clone())?;

        Ok(Self {
            engine,
            handler,
            seed_scheme: config.crawler.seed_scheme.clone(),
        })
    }

    pub fn output_root(&self) -> &Path {
        self.handler.extractor().output_root()
    }

    /// Crawls each domain in order
    pub async fn run(&self, domains: &[String]) -> Result<SessionReport, BlubError> {
        let mut report = SessionReport::default();
        tracing::info!("Worker starting with {} domain(s)", domains.len());

        for domain in domains {
            let outcome = self.crawl_domain(domain).await?;
            report.domains.push((domain.clone(), outcome));
        }

        report.ids_claimed = self.handler.extractor().ids().peek();
        tracing::info!(
            "Worker finished: {} domain(s), {} record ID(s) claimed",
            report.domains.len(),
            report.ids_claimed
        );
        Ok(report)
    }

    async fn crawl_domain(&self, domain: &str) -> Result<DomainOutcome, BlubError> {
        tracing::info!("Crawling {}", domain);

        let seed = match seed_url(&self.seed_scheme, domain) {
            Ok(seed) => seed,
            Err(e) => {
                tracing::error!("Skipping {}: {}", domain, e);
                return Ok(DomainOutcome::Failed(e.to_string()));
            }
        };

        let host = extract_domain(&seed).unwrap_or_default();
        let host_dir = self.handler.extractor().host_dir(&host);
        fs::create_dir_all(&host_dir).map_err(|source| BlubError::OutputDir {
            path: host_dir.clone(),
            source,
        })?;

        let started = Instant::now();
        match self.engine.run(seed.as_str()).await {
            Ok(crawl) => {
                tracing::info!(
                    "Finished {}: {} pages visited, {} fetched, {} discarded in {:?}",
                    domain,
                    crawl.pages_visited,
                    crawl.pages_fetched,
                    crawl.urls_discarded,
                    started.elapsed()
                );
                Ok(DomainOutcome::Crawled(crawl))
            }
            Err(EngineError::Aborted { url, source }) => {
                tracing::error!("Aborting worker at {}: {}", url, source);
                Err(*source)
            }
            Err(e) => {
                tracing::error!("{}", e);
                Ok(DomainOutcome::Failed(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_config(data_dir: &Path) -> Config {
        let mut config = Config::default();
        config.output.data_dir = data_dir.to_string_lossy().into_owned();
        config.crawler.seed_scheme = "http".to_string();
        config.crawler.request_timeout_secs = 5;
        config.domains = vec!["127.0.0.1:9".to_string()];
        config
    }

    #[test]
    fn test_handler_filter_uses_gatekeeper() {
        let handler = PageHandler::new(
            PageGatekeeper::new(ExtensionFilter::new([".png"])),
            PageExtractor::new("unused"),
        );
        let png = Url::parse("https://a.com/logo.png").unwrap();
        let page = Url::parse("https://a.com/guide").unwrap();

        assert!(!handler.filter(&png, false));
        assert!(handler.filter(&page, false));
        assert!(!handler.filter(&page, true));
    }

    #[tokio::test]
    async fn test_unreachable_domain_does_not_abort() {
        let dir = TempDir::new().unwrap();
        let config = test_config(dir.path());
        let session = WorkerSession::new(&config).unwrap();

        let report = session
            .run(&["127.0.0.1:9".to_string(), "127.0.0.1:9/docs/".to_string()])
            .await
            .unwrap();

        assert_eq!(report.domains.len(), 2);
        assert_eq!(report.failed_domains().count(), 2);
        assert_eq!(report.ids_claimed, 0);
        assert!(dir.path().join("127.0.0.1").is_dir());
    }

    #[tokio::test]
    async fn test_malformed_domain_skipped_alone() {
        let dir = TempDir::new().unwrap();
        let config = test_config(dir.path());
        let session = WorkerSession::new(&config).unwrap();

        let report = session
            .run(&[
                "https://docs.rs".to_string(),
                String::new(),
                "127.0.0.1:9".to_string(),
            ])
            .await
            .unwrap();

        assert_eq!(report.domains.len(), 3);
        assert_eq!(report.domains[2].0, "127.0.0.1:9");
        assert!(matches!(report.domains[0].1, DomainOutcome::Failed(_)));
        assert!(matches!(report.domains[1].1, DomainOutcome::Failed(_)));
        assert!(dir.path().join("127.0.0.1").is_dir());
        assert!(!dir.path().join("docs.rs").exists());
    }

    #[tokio::test]
    async fn test_output_dir_failure_is_fatal() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, b"file").unwrap();

        let config = test_config(&blocker);
        let session = WorkerSession::new(&config).unwrap();
        let result = session.run(&["127.0.0.1:9".to_string()]).await;

        assert!(matches!(result, Err(BlubError::OutputDir { .. })));
    }
}
