//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawl engine, including:
//! - Building HTTP clients with the configured user agent
//! - GET requests to fetch page content
//! - Error classification
//!
//! Failed fetches are never retried.

use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Maximum number of redirects followed for a single fetch
const MAX_REDIRECTS: usize = 10;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched an HTML page
    Success {
        /// Final URL after redirects
        final_url: Url,
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// Page is not HTML (Content-Type mismatch)
    ContentMismatch {
        /// The actual Content-Type received
        content_type: String,
    },

    /// Non-success HTTP status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, etc.)
    NetworkError {
        /// Error description
        error: String,
        /// True when the host could not be reached at all
        unreachable: bool,
    },
}

/// Builds an HTTP client with the crawler's identity and limits
///
/// # Example
///
/// ```no_run
/// use blub_crawler::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client("BLUB_CRAWLER", Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(user_agent: &str, timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and classifies the outcome
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx with `text/html` or no Content-Type | `Success` |
/// | 2xx with another Content-Type | `ContentMismatch` |
/// | Non-2xx status | `HttpError` |
/// | Timeout, connection or TLS failure | `NetworkError { unreachable: true }` |
/// | Other transport failure | `NetworkError { unreachable: false }` |
pub async fn fetch_page(client: &Client, url: &Url) -> FetchResult {
    let response = match client.get(url.clone()).send().await {
        Ok(response) => response,
        Err(e) => return classify_error(e),
    };

    let status = response.status();
    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    let final_url = response.url().clone();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !content_type.is_empty() && !content_type.contains("text/html") {
        return FetchResult::ContentMismatch { content_type };
    }

    match response.text().await {
        Ok(body) => FetchResult::Success {
            final_url,
            status_code: status.as_u16(),
            body,
        },
        Err(e) => classify_error(e),
    }
}

fn classify_error(e: reqwest::Error) -> FetchResult {
    if e.is_timeout() {
        FetchResult::NetworkError {
            error: "Request timeout".to_string(),
            unreachable: true,
        }
    } else if e.is_connect() {
        FetchResult::NetworkError {
            error: format!("Connection failed: {}", e),
            unreachable: true,
        }
    } else {
        FetchResult::NetworkError {
            error: e.to_string(),
            unreachable: false,
        }
    }
}
