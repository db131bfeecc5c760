use crate::UrlError;
use url::Url;

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
/// The port is never part of the result, so a page on `127.0.0.1:8080` lands in the
/// `127.0.0.1` output directory.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use blub_crawler::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Builds the seed URL a worker starts crawling a domain from
///
/// The domain entry is taken verbatim after `<scheme>://`, so entries that carry
/// a path (such as `www.php.net/manual/en/`) seed the crawl at that path.
///
/// # Examples
///
/// ```
/// use blub_crawler::url::seed_url;
///
/// let seed = seed_url("https", "docs.rs").unwrap();
/// assert_eq!(seed.as_str(), "https://docs.rs/");
/// ```
pub fn seed_url(scheme: &str, domain: &str) -> Result<Url, UrlError> {
    if scheme != "http" && scheme != "https" {
        return Err(UrlError::InvalidScheme(scheme.to_string()));
    }

    let domain = domain.trim();
    if domain.is_empty() || domain.contains("://") {
        return Err(UrlError::Parse(format!("Invalid domain entry '{}'", domain)));
    }

    let url = Url::parse(&format!("{}://{}", scheme, domain))
        .map_err(|e| UrlError::Parse(format!("{}: {}", domain, e)))?;

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(UrlError::MissingDomain),
    }
}
