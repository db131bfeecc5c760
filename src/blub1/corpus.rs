//! Reading the Blub1 output tree
//!
//! The crawler writes `<root>/<hostname>/<id>.blub1`. This module walks that
//! tree to report per-host record counts, skipping files that fail to decode
//! the same way the downstream indexer does.

use crate::blub1::{decode, Blub1Record};
use crate::BlubError;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// File extension used for every record, without the leading dot
pub const RECORD_EXTENSION: &str = "blub1";

/// Per-host totals collected while scanning the corpus
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostSummary {
    /// Files that decoded into a valid record
    pub records: u64,

    /// Files whose header and size disagree or whose text is not UTF-8
    pub invalid: u64,

    /// Bytes on disk across all record files of this host
    pub bytes: u64,
}

/// Summary of a whole output tree, keyed by hostname
#[derive(Debug, Clone, Default)]
pub struct CorpusSummary {
    pub hosts: BTreeMap<String, HostSummary>,
}

impl CorpusSummary {
    /// Total number of valid records across all hosts
    pub fn total_records(&self) -> u64 {
        self.hosts.values().map(|h| h.records).sum()
    }

    /// Total number of invalid record files across all hosts
    pub fn total_invalid(&self) -> u64 {
        self.hosts.values().map(|h| h.invalid).sum()
    }

    /// Prints the summary to stdout
    pub fn print(&self) {
        println!("=== Corpus Statistics ===\n");
        println!("Overview:");
        println!("  Hosts: {}", self.hosts.len());
        println!("  Records: {}", self.total_records());
        println!("  Invalid files: {}", self.total_invalid());
        println!();

        println!("Records by Host:");
        let mut hosts: Vec<_> = self.hosts.iter().collect();
        hosts.sort_by(|a, b| b.1.records.cmp(&a.1.records).then(a.0.cmp(b.0)));
        for (host, summary) in hosts {
            println!(
                "  {}: {} records, {} invalid, {} bytes",
                host, summary.records, summary.invalid, summary.bytes
            );
        }
    }
}

/// Reads and decodes a single record file
pub fn read_record(path: &Path) -> Result<Blub1Record, BlubError> {
    let bytes = fs::read(path)?;
    Ok(decode(&bytes)?)
}

/// Scans every `<root>/<host>/*.blub1` file
///
/// Entries directly under `root` that are not directories, and files without
/// the `.blub1` extension, are ignored.
pub fn scan_corpus(root: &Path) -> Result<CorpusSummary, BlubError> {
    let mut summary = CorpusSummary::default();

    for host_entry in fs::read_dir(root)? {
        let host_entry = host_entry?;
        let host_path = host_entry.path();
        if !host_path.is_dir() {
            tracing::debug!("Skipping non-directory {}", host_path.display());
            continue;
        }

        let host = host_entry.file_name().to_string_lossy().into_owned();
        let host_summary = summary.hosts.entry(host).or_default();

        for record_entry in fs::read_dir(&host_path)? {
            let record_path = record_entry?.path();
            if record_path.extension().and_then(|e| e.to_str()) != Some(RECORD_EXTENSION) {
                continue;
            }

            host_summary.bytes += fs::metadata(&record_path)?.len();
            match read_record(&record_path) {
                Ok(_) => host_summary.records += 1,
                Err(e) => {
                    tracing::warn!("Ignoring {}: {}", record_path.display(), e);
                    host_summary.invalid += 1;
                }
            }
        }
    }

    Ok(summary)
}
