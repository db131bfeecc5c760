use crate::config::types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use crate::url::{extract_domain, seed_url};
use crate::ConfigError;
use std::collections::HashSet;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    validate_extensions(&config.blacklisted_extensions)?;
    validate_domains(&config.domains, &config.crawler.seed_scheme)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.domains_per_process < 1 {
        return Err(ConfigError::Validation(format!(
            "domains_per_process must be >= 1, got {}",
            config.domains_per_process
        )));
    }

    if config.max_visits < 1 {
        return Err(ConfigError::Validation(format!(
            "max_visits must be >= 1, got {}",
            config.max_visits
        )));
    }

    if config.max_concurrent_fetches < 1 || config.max_concurrent_fetches > 100 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_fetches must be between 1 and 100, got {}",
            config.max_concurrent_fetches
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "request_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.seed_scheme != "http" && config.seed_scheme != "https" {
        return Err(ConfigError::Validation(format!(
            "seed_scheme must be 'http' or 'https', got '{}'",
            config.seed_scheme
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user agent name cannot be empty".to_string(),
        ));
    }

    if config.name.chars().any(char::is_control) {
        return Err(ConfigError::Validation(format!(
            "user agent name contains control characters: {:?}",
            config.name
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.data_dir.is_empty() {
        return Err(ConfigError::Validation(
            "data_dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the extension blacklist
fn validate_extensions(extensions: &[String]) -> Result<(), ConfigError> {
    for ext in extensions {
        if !ext.starts_with('.') || ext.len() < 2 || ext[1..].contains(['.', '/']) {
            return Err(ConfigError::Validation(format!(
                "blacklisted extension '{}' must look like '.ext'",
                ext
            )));
        }
    }
    Ok(())
}

/// Validates the domain list
///
/// Every domain must form a seed URL with a host, and no two entries may share
/// a hostname. Records are written under `<data-dir>/<hostname>/` with IDs from
/// a per-worker counter, so one hostname must belong to exactly one worker.
pub fn validate_domains(domains: &[String], scheme: &str) -> Result<(), ConfigError> {
    if domains.is_empty() {
        return Err(ConfigError::Validation(
            "domain list cannot be empty".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for domain in domains {
        let seed = seed_url(scheme, domain)
            .map_err(|e| ConfigError::InvalidDomain(format!("'{}': {}", domain, e)))?;

        let Some(host) = extract_domain(&seed) else {
            return Err(ConfigError::InvalidDomain(format!(
                "'{}' has no host",
                domain
            )));
        };

        if !seen.insert(host.clone()) {
            return Err(ConfigError::InvalidDomain(format!(
                "'{}' repeats host '{}'",
                domain, host
            )));
        }
    }

    Ok(())
}
