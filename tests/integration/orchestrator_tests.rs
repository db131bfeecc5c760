//! Integration tests for the process orchestrator
//!
//! `/bin/sh -c <script>` stands in for the worker executable. The
//! orchestrator appends `-- <domain>...`, so inside the script `$0` is `--`
//! and the shard's domains are `"$@"`.

#![cfg(unix)]

use blub_crawler::orchestrator::{Orchestrator, OrchestratorError};
use std::ffi::OsString;

fn domains(list: &[&str]) -> Vec<String> {
    list.iter().map(|d| d.to_string()).collect()
}

fn shell(script: &str, shard_size: usize) -> Orchestrator {
    Orchestrator::new(
        "/bin/sh",
        vec![OsString::from("-c"), OsString::from(script)],
        shard_size,
    )
}

#[tokio::test]
async fn test_three_domains_two_workers() {
    let orchestrator = shell(r#"for d in "$@"; do echo "crawling $d" >&2; done"#, 2);
    let list = domains(&["a.com", "b.com", "c.com"]);

    let report = orchestrator.run(&list).await;

    assert_eq!(report.domain_count, 3);
    assert_eq!(report.outcomes.len(), 2);
    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.failed().count(), 0);

    assert_eq!(report.outcomes[0].shard.domains, domains(&["a.com", "b.com"]));
    assert_eq!(report.outcomes[0].lines_relayed, 2);
    assert_eq!(report.outcomes[1].shard.domains, domains(&["c.com"]));
    assert_eq!(report.outcomes[1].lines_relayed, 1);
}

#[tokio::test]
async fn test_failed_worker_does_not_stop_others() {
    let orchestrator = shell(
        r#"echo "worker for $1" >&2; if [ "$1" = "b.com" ]; then exit 3; fi"#,
        1,
    );
    let list = domains(&["a.com", "b.com", "c.com"]);

    let report = orchestrator.run(&list).await;

    assert_eq!(report.outcomes.len(), 3);
    assert_eq!(report.succeeded(), 2);
    assert!(report.outcomes.iter().all(|o| o.lines_relayed == 1));

    let failed: Vec<_> = report.failed().collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].shard.index, 1);
    match &failed[0].result {
        Err(OrchestratorError::Exit { shard, status }) => {
            assert_eq!(*shard, 1);
            assert_eq!(status.code(), Some(3));
        }
        other => panic!("Expected exit failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_workers_run_concurrently() {
    // Each worker waits for the other's marker file, so sequential launches would deadlock
    let dir = tempfile::TempDir::new().unwrap();
    let script = format!(
        r#"touch "{dir}/$1"; i=0; while [ ! -e "{dir}/a.com" ] || [ ! -e "{dir}/b.com" ]; do i=$((i+1)); if [ $i -gt 100 ]; then exit 1; fi; sleep 0.05; done"#,
        dir = dir.path().display()
    );
    let orchestrator = shell(&script, 1);

    let report = orchestrator.run(&domains(&["a.com", "b.com"])).await;

    assert_eq!(report.succeeded(), 2);
}

#[tokio::test]
async fn test_missing_program_fails_every_shard() {
    let orchestrator = Orchestrator::new("/nonexistent/blub-crawler", Vec::new(), 2);
    let list = domains(&["a.com", "b.com", "c.com"]);

    let report = orchestrator.run(&list).await;

    assert_eq!(report.outcomes.len(), 2);
    assert_eq!(report.succeeded(), 0);
    assert!(report
        .outcomes
        .iter()
        .all(|o| matches!(o.result, Err(OrchestratorError::Spawn { .. }))));
}

#[tokio::test]
async fn test_empty_domain_list_spawns_nothing() {
    let orchestrator = shell("exit 1", 5);

    let report = orchestrator.run(&[]).await;

    assert!(report.outcomes.is_empty());
    assert_eq!(report.domain_count, 0);
}
