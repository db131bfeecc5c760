use crate::orchestrator::shard::{plan_shards, Shard};
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

/// Errors isolated to a single child process
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("Failed to start worker for shard {shard}: {source}")]
    Spawn {
        shard: usize,
        source: std::io::Error,
    },

    #[error("Failed to relay output of shard {shard}: {source}")]
    Relay {
        shard: usize,
        source: std::io::Error,
    },

    #[error("Failed to wait for worker of shard {shard}: {source}")]
    Wait {
        shard: usize,
        source: std::io::Error,
    },

    #[error("Worker for shard {shard} exited with {status}")]
    Exit { shard: usize, status: ExitStatus },

    #[error("Supervisor task for shard {shard} failed: {message}")]
    Join { shard: usize, message: String },
}

/// The result of running one shard's worker process
#[derive(Debug)]
pub struct ShardOutcome {
    pub shard: Shard,

    /// Lines of worker diagnostics relayed to our stdout
    pub lines_relayed: usize,

    pub result: Result<(), OrchestratorError>,
}

/// Results of a whole orchestrated crawl
#[derive(Debug)]
pub struct OrchestratorReport {
    /// One outcome per shard, in shard order
    pub outcomes: Vec<ShardOutcome>,
    pub domain_count: usize,
    pub elapsed: Duration,
}

impl OrchestratorReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> impl Iterator<Item = &ShardOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }
}

/// Launches one worker process per shard and waits for all of them
///
/// Every worker is started as `<program> <base args> -- <domain>...`. Its
/// stderr is relayed line by line to our stdout as it arrives.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    program: PathBuf,
    base_args: Vec<OsString>,
    shard_size: usize,
}

impl Orchestrator {
    pub fn new(program: impl Into<PathBuf>, base_args: Vec<OsString>, shard_size: usize) -> Self {
        Self {
            program: program.into(),
            base_args,
            shard_size: shard_size.max(1),
        }
    }

    pub fn shard_size(&self) -> usize {
        self.shard_size
    }

    /// Splits `domains` into this orchestrator's shards
    pub fn plan(&self, domains: &[String]) -> Vec<Shard> {
        plan_shards(domains, self.shard_size)
    }

    /// Runs every shard concurrently
    ///
    /// A failing child is recorded in its [`ShardOutcome`]; it never stops
    /// the other children.
    pub async fn run(&self, domains: &[String]) -> OrchestratorReport {
        let started = Instant::now();
        let shards = self.plan(domains);
        tracing::info!(
            "Launching {} worker(s) for {} domain(s)",
            shards.len(),
            domains.len()
        );

        let handles: Vec<_> = shards
            .into_iter()
            .map(|shard| {
                let program = self.program.clone();
                let base_args = self.base_args.clone();
                let task_shard = shard.clone();
                let handle =
                    tokio::spawn(async move { run_shard(program, base_args, task_shard).await });
                (shard, handle)
            })
            .collect();

        let mut outcomes = Vec::with_capacity(handles.len());
        for (shard, handle) in handles {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => ShardOutcome {
                    result: Err(OrchestratorError::Join {
                        shard: shard.index,
                        message: e.to_string(),
                    }),
                    shard,
                    lines_relayed: 0,
                },
            };

            match &outcome.result {
                Ok(()) => tracing::info!(
                    "Shard {} finished ({})",
                    outcome.shard.index,
                    outcome.shard.domains.join(", ")
                ),
                Err(e) => tracing::error!("{}", e),
            }
            outcomes.push(outcome);
        }

        OrchestratorReport {
            outcomes,
            domain_count: domains.len(),
            elapsed: started.elapsed(),
        }
    }
}

async fn run_shard(program: PathBuf, base_args: Vec<OsString>, shard: Shard) -> ShardOutcome {
    let mut lines_relayed = 0;
    let result = supervise(&program, &base_args, &shard, &mut lines_relayed).await;
    ShardOutcome {
        shard,
        lines_relayed,
        result,
    }
}

async fn supervise(
    program: &PathBuf,
    base_args: &[OsString],
    shard: &Shard,
    lines_relayed: &mut usize,
) -> Result<(), OrchestratorError> {
    let index = shard.index;
    let mut child = Command::new(program)
        .args(base_args)
        .arg("--")
        .args(&shard.domains)
        .stdin(Stdio::null())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| OrchestratorError::Spawn {
            shard: index,
            source,
        })?;

    tracing::debug!("Started worker for shard {}: {:?}", index, shard.domains);

    let mut relay_error = None;
    if let Some(stderr) = child.stderr.take() {
        let mut reader = BufReader::new(stderr);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {
                    let line = String::from_utf8_lossy(&buf);
                    println!("{}", line.trim_end_matches(['\n', '\r']));
                    *lines_relayed += 1;
                }
                Err(source) => {
                    relay_error = Some(source);
                    break;
                }
            }
        }
    }

    let status = child.wait().await.map_err(|source| OrchestratorError::Wait {
        shard: index,
        source,
    })?;

    if let Some(source) = relay_error {
        return Err(OrchestratorError::Relay {
            shard: index,
            source,
        });
    }

    if !status.success() {
        return Err(OrchestratorError::Exit {
            shard: index,
            status,
        });
    }

    Ok(())
}
