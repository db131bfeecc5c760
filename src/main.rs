//! Blub Crawler main entry point
//!
//! Without positional arguments the binary runs as the orchestrator and
//! re-invokes itself once per shard of domains. With positional arguments it
//! runs as a worker that crawls exactly those domains.

use anyhow::{bail, Context};
use blub_crawler::blub1::scan_corpus;
use blub_crawler::config::{load_or_default, validate_domains, Config};
use blub_crawler::crawler::WorkerSession;
use blub_crawler::orchestrator::{plan_shards, Orchestrator};
use clap::Parser;
use std::ffi::OsString;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Blub Crawler: harvests documentation sites into Blub1 records
///
/// Run without DOMAINS to crawl the configured domain list across worker
/// processes. Run with DOMAINS to crawl just those domains in this process.
#[derive(Parser, Debug, PartialEq, Eq)]
#[command(name = "blub-crawler")]
#[command(version = "1.0.0")]
#[command(about = "A documentation-site harvester", long_about = None)]
struct Cli {
    /// Domains to crawl in worker mode
    #[arg(value_name = "DOMAINS")]
    domains: Vec<String>,

    /// Path to a TOML file overriding the built-in configuration
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory records are written under
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show the shard plan without crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics for the records already on disk and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

/// What a single invocation does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    DryRun,
    Stats,
    Orchestrate,
    Worker,
}

impl Cli {
    /// Positional domains select worker mode; without them we orchestrate
    fn mode(&self) -> Mode {
        if self.dry_run {
            Mode::DryRun
        } else if self.stats {
            Mode::Stats
        } else if self.domains.is_empty() {
            Mode::Orchestrate
        } else {
            Mode::Worker
        }
    }

    /// Flags every worker inherits from the orchestrator
    fn passthrough_args(&self) -> Vec<OsString> {
        let mut args = Vec::new();
        if let Some(config) = &self.config {
            args.push(OsString::from("--config"));
            args.push(config.clone().into_os_string());
        }
        if let Some(output_dir) = &self.output_dir {
            args.push(OsString::from("--output-dir"));
            args.push(output_dir.clone().into_os_string());
        }
        if self.quiet {
            args.push(OsString::from("-q"));
        }
        for _ in 0..self.verbose {
            args.push(OsString::from("-v"));
        }
        args
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = load_or_default(cli.config.as_deref()).with_context(|| match &cli.config {
        Some(path) => format!("Failed to load configuration from {}", path.display()),
        None => "Built-in configuration is invalid".to_string(),
    })?;
    if let Some(output_dir) = &cli.output_dir {
        config.output.data_dir = output_dir.to_string_lossy().into_owned();
    }

    match cli.mode() {
        Mode::DryRun => handle_dry_run(&config, &cli.domains),
        Mode::Stats => handle_stats(&config),
        Mode::Orchestrate => handle_orchestrate(&config, &cli).await,
        Mode::Worker => handle_worker(&config, &cli.domains).await,
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr, which the orchestrator relays for every worker.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("blub_crawler=info,warn"),
            1 => EnvFilter::new("blub_crawler=debug,info"),
            2 => EnvFilter::new("blub_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows the shard plan
fn handle_dry_run(config: &Config, domains: &[String]) -> anyhow::Result<()> {
    let domains = if domains.is_empty() {
        config.domains.as_slice()
    } else {
        validate_domains(domains, &config.crawler.seed_scheme)?;
        domains
    };

    println!("=== Blub Crawler Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Domains per process: {}", config.crawler.domains_per_process);
    println!("  Crawl delay: {}ms", config.crawler.crawl_delay_ms);
    println!("  Max visits per domain: {}", config.crawler.max_visits);
    println!(
        "  Max concurrent fetches: {}",
        config.crawler.max_concurrent_fetches
    );
    println!(
        "  Request timeout: {}s",
        config.crawler.request_timeout_secs
    );
    println!("  Same host only: {}", config.crawler.same_host_only);
    println!("  Seed scheme: {}", config.crawler.seed_scheme);

    println!("\nUser Agent: {}", config.user_agent.name);
    println!("Output: {}", config.output.data_dir);

    println!(
        "\nBlacklisted Extensions ({}): {}",
        config.blacklisted_extensions.len(),
        config.blacklisted_extensions.join(" ")
    );

    let shards = plan_shards(domains, config.crawler.domains_per_process);
    println!("\nShards ({}):", shards.len());
    for shard in &shards {
        println!("  [{}] {}", shard.index, shard.domains.join(", "));
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would start {} worker(s) for {} domain(s)",
        shards.len(),
        domains.len()
    );

    Ok(())
}

/// Handles the --stats mode: summarizes the records already written
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    let root = Path::new(&config.output.data_dir);
    println!("Data directory: {}\n", root.display());

    let summary = scan_corpus(root)
        .with_context(|| format!("Failed to scan {}", root.display()))?;
    summary.print();

    Ok(())
}

/// Handles root mode: one worker process per shard of the domain list
async fn handle_orchestrate(config: &Config, cli: &Cli) -> anyhow::Result<()> {
    let program = std::env::current_exe().context("Failed to locate the crawler executable")?;
    let orchestrator = Orchestrator::new(
        program,
        cli.passthrough_args(),
        config.crawler.domains_per_process,
    );

    let report = orchestrator.run(&config.domains).await;
    println!(
        "Completed crawling {} domains. Completed in {:?}",
        report.domain_count, report.elapsed
    );

    let failed: Vec<_> = report.failed().collect();
    if !failed.is_empty() {
        for outcome in &failed {
            tracing::error!(
                "Shard {} ({}) failed",
                outcome.shard.index,
                outcome.shard.domains.join(", ")
            );
        }
        bail!(
            "{} of {} worker(s) failed",
            failed.len(),
            report.outcomes.len()
        );
    }

    tracing::info!("All {} worker(s) succeeded", report.succeeded());
    Ok(())
}

/// Handles worker mode: crawls the given domains in this process
///
/// Malformed entries are skipped by the session, one domain at a time.
async fn handle_worker(config: &Config, domains: &[String]) -> anyhow::Result<()> {
    let session = WorkerSession::new(config)?;
    tracing::info!("Writing records under {}", session.output_root().display());

    let report = session.run(domains).await.context("Worker session aborted")?;
    for domain in report.failed_domains() {
        tracing::warn!("No pages collected from {}", domain);
    }

    Ok(())
}
