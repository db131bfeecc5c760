//! Post-fetch persistence of pages as Blub1 records
//!
//! Each visited page becomes `<root>/<hostname>/<id>.blub1`, where `id` comes
//! from a per-session [`RecordIdCounter`]. The counter is shared by every
//! concurrent `visit` call of a worker, so it hands out IDs with an atomic
//! fetch-add.

use crate::blub1::{Blub1Record, RECORD_EXTENSION};
use crate::crawler::parser::{extract_body, extract_title};
use crate::url::extract_domain;
use crate::BlubError;
use scraper::Html;
use std::fs::OpenOptions;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use url::Url;

/// Monotonic source of record IDs for one worker session
#[derive(Debug, Default)]
pub struct RecordIdCounter {
    next: AtomicU64,
}

impl RecordIdCounter {
    /// Creates a counter whose first ID is 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a counter whose first ID is `start`
    pub fn starting_at(start: u64) -> Self {
        Self {
            next: AtomicU64::new(start),
        }
    }

    /// Claims the next ID
    pub fn next_id(&self) -> u64 {
        self.next.fetch_add(1, Ordering::SeqCst)
    }

    /// The ID the next call to [`next_id`](Self::next_id) will return
    pub fn peek(&self) -> u64 {
        self.next.load(Ordering::SeqCst)
    }
}

/// What happened to one extracted page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractOutcome {
    /// The record was written to `path`
    Written { id: u64, path: PathBuf },

    /// The target file could not be created; `id` is consumed
    Dropped { id: u64 },

    /// The page does not fit the Blub1 length limits; no ID was claimed
    Oversize,
}

/// Writes fetched pages into the Blub1 output tree
#[derive(Debug)]
pub struct PageExtractor {
    output_root: PathBuf,
    ids: RecordIdCounter,
}

impl PageExtractor {
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self::with_counter(output_root, RecordIdCounter::new())
    }

    pub fn with_counter(output_root: impl Into<PathBuf>, ids: RecordIdCounter) -> Self {
        Self {
            output_root: output_root.into(),
            ids,
        }
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    pub fn ids(&self) -> &RecordIdCounter {
        &self.ids
    }

    /// Directory holding the records of `host`
    pub fn host_dir(&self, host: &str) -> PathBuf {
        self.output_root.join(host)
    }

    /// Path of record `id` for `host`
    pub fn record_path(&self, host: &str, id: u64) -> PathBuf {
        self.host_dir(host)
            .join(format!("{}.{}", id, RECORD_EXTENSION))
    }

    /// Extracts the title and body of `document` and persists them
    ///
    /// Failing to create the record file drops the page and logs the error.
    /// Failing to write an already-created file is returned as an error: it
    /// means the environment is broken and the session should stop.
    pub fn extract(&self, url: &Url, document: &Html) -> Result<ExtractOutcome, BlubError> {
        tracing::info!("{}", url);

        let record = match Blub1Record::new(
            url.as_str(),
            extract_title(document),
            extract_body(document),
        ) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("Dropping {}: {}", url, e);
                return Ok(ExtractOutcome::Oversize);
            }
        };

        let id = self.ids.next_id();
        let host = extract_domain(url).unwrap_or_default();
        let path = self.record_path(&host, id);

        let file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) => {
                tracing::error!("Failed to create {}: {}", path.display(), e);
                return Ok(ExtractOutcome::Dropped { id });
            }
        };

        record
            .write_to(BufWriter::new(file))
            .map_err(|source| BlubError::RecordWrite {
                path: path.clone(),
                source,
            })?;

        Ok(ExtractOutcome::Written { id, path })
    }
}
