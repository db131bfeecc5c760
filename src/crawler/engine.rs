//! Crawl engine - fetch loop for a single seed
//!
//! The engine owns everything about a crawl run that is not policy:
//! - The FIFO frontier and the set of URLs already queued or fetched
//! - Same-host restriction, politeness delay and the visit cap
//! - Bounded concurrent fetching
//!
//! Policy lives behind the [`Extender`] trait: `filter` decides whether a
//! candidate URL is fetched, `visit` consumes each fetched HTML page. Parsing
//! and `visit` run on tokio's blocking pool, so `visit` may be called from
//! several threads at once.

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::crawler::fetcher::{build_http_client, fetch_page, FetchResult};
use crate::crawler::parser::extract_links;
use crate::url::normalize_url;
use crate::{BlubError, UrlError};
use reqwest::Client;
use scraper::Html;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::task::JoinSet;
use url::Url;

/// Callbacks the engine invokes for each candidate URL
pub trait Extender: Send + Sync {
    /// Decides whether `url` should be fetched
    ///
    /// `already_visited` is true when the engine has already queued or fetched
    /// the URL during this run.
    fn filter(&self, url: &Url, already_visited: bool) -> bool;

    /// Consumes a fetched, parsed HTML page
    ///
    /// Returning an error aborts the whole run with [`EngineError::Aborted`].
    fn visit(&self, url: &Url, document: &Html) -> Result<(), BlubError>;
}

/// Errors that end a crawl run
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid seed URL {url}: {source}")]
    InvalidSeed { url: String, source: UrlError },

    #[error("Seed {url} is unreachable: {error}")]
    SeedUnreachable { url: String, error: String },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Crawl aborted at {url}: {source}")]
    Aborted { url: String, source: Box<BlubError> },

    #[error("Crawl task failed: {0}")]
    Task(String),
}

/// Engine settings, fixed for the lifetime of a worker
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub same_host_only: bool,
    pub crawl_delay: Duration,
    pub max_visits: u32,
    pub max_concurrent_fetches: usize,
    pub user_agent: String,
    pub request_timeout: Duration,
}

impl EngineOptions {
    pub fn from_config(crawler: &CrawlerConfig, user_agent: &UserAgentConfig) -> Self {
        Self {
            same_host_only: crawler.same_host_only,
            crawl_delay: crawler.crawl_delay(),
            max_visits: crawler.max_visits,
            max_concurrent_fetches: crawler.max_concurrent_fetches.max(1),
            user_agent: user_agent.name.clone(),
            request_timeout: crawler.request_timeout(),
        }
    }
}

/// Counters for one crawl run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlReport {
    /// The normalized seed URL
    pub seed: String,

    /// Fetches started
    pub pages_fetched: u32,

    /// HTML pages handed to `visit`
    pub pages_visited: u32,

    /// Candidate URLs the filter rejected (excluding already-visited ones)
    pub urls_discarded: u32,

    /// Fetches that ended in an HTTP or network error
    pub fetch_errors: u32,

    /// True if the visit cap left URLs unfetched
    pub hit_visit_limit: bool,
}

/// Host and effective port that a same-host crawl stays on
#[derive(Debug, Clone, PartialEq, Eq)]
struct Site {
    host: String,
    port: Option<u16>,
}

impl Site {
    fn of(url: &Url) -> Self {
        Self {
            host: url.host_str().unwrap_or_default().to_string(),
            port: url.port_or_known_default(),
        }
    }
}

/// Outcome of fetching and processing one page
enum PageOutcome {
    Visited { links: Vec<Url> },
    Skipped { url: Url, reason: String },
    Failed { url: Url, error: String, unreachable: bool },
    Aborted { url: Url, error: BlubError },
    Panicked { url: Url, error: String },
}

/// Drives fetches for one seed at a time
pub struct CrawlEngine {
    client: Client,
    options: EngineOptions,
    extender: Arc<dyn Extender>,
}

impl CrawlEngine {
    /// Creates an engine with its own HTTP client
    pub fn new(options: EngineOptions, extender: Arc<dyn Extender>) -> Result<Self, EngineError> {
        let client = build_http_client(&options.user_agent, options.request_timeout)?;
        Ok(Self {
            client,
            options,
            extender,
        })
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Crawls outward from `seed` until the frontier empties or the visit cap is hit
    ///
    /// Per-page failures are logged and counted. Only an unusable or
    /// unreachable seed, a failing `visit` callback, or a panicking task end
    /// the run with an error.
    pub async fn run(&self, seed: &str) -> Result<CrawlReport, EngineError> {
        let seed_url = normalize_url(seed).map_err(|source| EngineError::InvalidSeed {
            url: seed.to_string(),
            source,
        })?;
        let seed_site = Site::of(&seed_url);

        let mut report = CrawlReport {
            seed: seed_url.to_string(),
            ..CrawlReport::default()
        };
        let mut seen: HashSet<String> = HashSet::new();
        let mut frontier: VecDeque<Url> = VecDeque::new();
        let mut in_flight: JoinSet<PageOutcome> = JoinSet::new();
        let mut last_fetch: Option<Instant> = None;

        self.offer(seed_url.clone(), &seed_site, &mut seen, &mut frontier, &mut report);

        loop {
            while in_flight.len() < self.options.max_concurrent_fetches
                && report.pages_fetched < self.options.max_visits
            {
                let Some(url) = frontier.pop_front() else {
                    break;
                };

                self.wait_for_politeness(last_fetch).await;
                last_fetch = Some(Instant::now());
                report.pages_fetched += 1;

                tracing::trace!("Fetching {}", url);
                in_flight.spawn(process_page(
                    self.client.clone(),
                    Arc::clone(&self.extender),
                    url,
                    self.options.same_host_only.then(|| seed_site.clone()),
                ));
            }

            let Some(joined) = in_flight.join_next().await else {
                break;
            };
            let outcome = joined.map_err(|e| EngineError::Task(e.to_string()))?;

            match outcome {
                PageOutcome::Visited { links } => {
                    report.pages_visited += 1;
                    for link in links {
                        if report.pages_fetched >= self.options.max_visits {
                            report.hit_visit_limit = true;
                            break;
                        }
                        let Ok(link) = normalize_url(link.as_str()) else {
                            continue;
                        };
                        self.offer(link, &seed_site, &mut seen, &mut frontier, &mut report);
                    }
                }
                PageOutcome::Skipped { url, reason } => {
                    tracing::debug!("Skipping {}: {}", url, reason);
                }
                PageOutcome::Failed {
                    url,
                    error,
                    unreachable,
                } => {
                    if unreachable && url == seed_url {
                        return Err(EngineError::SeedUnreachable {
                            url: url.to_string(),
                            error,
                        });
                    }
                    tracing::debug!("Failed to fetch {}: {}", url, error);
                    report.fetch_errors += 1;
                }
                PageOutcome::Aborted { url, error } => {
                    return Err(EngineError::Aborted {
                        url: url.to_string(),
                        source: Box::new(error),
                    });
                }
                PageOutcome::Panicked { url, error } => {
                    return Err(EngineError::Task(format!("{}: {}", url, error)));
                }
            }
        }

        if !frontier.is_empty() {
            report.hit_visit_limit = true;
        }
        if report.hit_visit_limit {
            tracing::info!(
                "Visit limit of {} reached for {}",
                self.options.max_visits,
                report.seed
            );
        }

        Ok(report)
    }

    /// Offers a candidate URL to the extender's filter and queues it if accepted
    fn offer(
        &self,
        url: Url,
        seed_site: &Site,
        seen: &mut HashSet<String>,
        frontier: &mut VecDeque<Url>,
        report: &mut CrawlReport,
    ) {
        if self.options.same_host_only && Site::of(&url) != *seed_site {
            return;
        }

        let already_visited = seen.contains(url.as_str());
        if !self.extender.filter(&url, already_visited) {
            if !already_visited {
                report.urls_discarded += 1;
            }
            return;
        }

        seen.insert(url.to_string());
        frontier.push_back(url);
    }

    async fn wait_for_politeness(&self, last_fetch: Option<Instant>) {
        if let Some(last) = last_fetch {
            let elapsed = last.elapsed();
            if elapsed < self.options.crawl_delay {
                tokio::time::sleep(self.options.crawl_delay - elapsed).await;
            }
        }
    }
}

/// Fetches one page, then parses it and runs `visit` on the blocking pool
async fn process_page(
    client: Client,
    extender: Arc<dyn Extender>,
    url: Url,
    required_site: Option<Site>,
) -> PageOutcome {
    let (final_url, body) = match fetch_page(&client, &url).await {
        FetchResult::Success {
            final_url, body, ..
        } => (final_url, body),
        FetchResult::ContentMismatch { content_type } => {
            return PageOutcome::Skipped {
                url,
                reason: format!("Expected HTML, got {}", content_type),
            };
        }
        FetchResult::HttpError { status_code } => {
            return PageOutcome::Failed {
                url,
                error: format!("HTTP {}", status_code),
                unreachable: false,
            };
        }
        FetchResult::NetworkError { error, unreachable } => {
            return PageOutcome::Failed {
                url,
                error,
                unreachable,
            };
        }
    };

    let final_url = normalize_url(final_url.as_str()).unwrap_or(final_url);
    if let Some(site) = required_site {
        if Site::of(&final_url) != site {
            return PageOutcome::Skipped {
                url,
                reason: format!("Redirected off-host to {}", final_url),
            };
        }
    }

    let page_url = final_url.clone();
    let parsed = tokio::task::spawn_blocking(move || {
        let document = Html::parse_document(&body);
        extender.visit(&page_url, &document)?;
        Ok::<_, BlubError>(extract_links(&document, &page_url))
    })
    .await;

    match parsed {
        Ok(Ok(links)) => PageOutcome::Visited { links },
        Ok(Err(error)) => PageOutcome::Aborted {
            url: final_url,
            error,
        },
        Err(e) => PageOutcome::Panicked {
            url: final_url,
            error: e.to_string(),
        },
    }
}
