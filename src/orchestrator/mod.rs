//! Crawl orchestration across worker processes
//!
//! The root process splits the domain list into fixed-size shards and
//! re-invokes its own executable once per shard in worker mode. Process
//! isolation keeps a worker that hangs or crashes on one site from taking
//! the others down with it.

mod runner;
mod shard;

pub use runner::{Orchestrator, OrchestratorError, OrchestratorReport, ShardOutcome};
pub use shard::{plan_shards, Shard};
