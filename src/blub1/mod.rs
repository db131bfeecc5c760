//! Blub1 record format
//!
//! A Blub1 file holds exactly one crawled page:
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0 | 2 | `url_len` (u16, little-endian) |
//! | 2 | 2 | `title_len` (u16, little-endian) |
//! | 4 | 4 | `body_len` (u32, little-endian) |
//! | 8 | `url_len` | url bytes |
//! | .. | `title_len` | title bytes |
//! | .. | `body_len` | body bytes |
//!
//! There is no magic number, checksum or version field. The layout is read
//! positionally by the external indexer and must not change.

mod corpus;
mod record;

pub use corpus::{read_record, scan_corpus, CorpusSummary, HostSummary, RECORD_EXTENSION};
pub use record::{decode, encode, Blub1Error, Blub1Record, Field, HEADER_LEN};
