//! Approval flows from discovery scan to closed workspace.

use std::sync::Arc;

use super::helpers::{SelfOwnedPrHosting, Store, store};
use atelier::backlog::{BacklogStore, Discovery, DiscoveryId, DiscoveryStatus};
use atelier::config::OutputMode;
use atelier::exit_code;
use atelier::scan::{SelectionMode, TargetError, TaskScanner, select_target};
use atelier::task::{
    domain::{TaskMetadata, TaskStatus, metadata_keys},
    ports::TaskStore,
};
use atelier::workflow::NullReporter;
use atelier::workflow::approval::{ApprovalPlan, ApprovalRunner, ApprovalService};
use atelier::workspace::{domain::WorkspaceStatus, ports::WorkspaceStore};
use eyre::{WrapErr, ensure};
use mockable::DefaultClock;
use rstest::rstest;
use serde_json::json;
use tokio_util::sync::CancellationToken;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn approve_merge_close_runs_every_step(store: Store) -> Result<(), eyre::Report> {
    let discovery_id = DiscoveryId::new("flaky-login").wrap_err("discovery id")?;
    store
        .backlog
        .save(&Discovery::new(discovery_id.clone(), "Login test is flaky", &DefaultClock)?)
        .await?;
    let mut metadata = TaskMetadata::new();
    metadata.insert(metadata_keys::PR_NUMBER, json!("42"));
    metadata.insert(metadata_keys::FROM_BACKLOG_ID, json!("flaky-login"));
    store
        .seed("alpha", TaskStatus::AwaitingApproval, metadata)
        .await?;
    store
        .seed("beta", TaskStatus::Running, TaskMetadata::new())
        .await?;

    let cancel = CancellationToken::new();
    let scanner = TaskScanner::new(Arc::clone(&store.workspaces), Arc::clone(&store.tasks));
    let hits = scanner.awaiting_approval(&cancel).await?;
    let target = select_target(hits, None, SelectionMode::NonInteractive).await?;
    ensure!(target.workspace.name().as_str() == "alpha", "unexpected target");

    let hosting = Arc::new(SelfOwnedPrHosting::default());
    let runner = ApprovalRunner::new(
        store.lifecycle(),
        store.manager(),
        Arc::clone(&hosting),
        Arc::clone(&store.backlog),
        Arc::clone(&store.clock),
    );
    let service = ApprovalService::new(runner, Arc::new(NullReporter), OutputMode::Json);
    let report = service
        .approve(ApprovalPlan::ApproveMergeClose, target, &cancel)
        .await?;

    ensure!(report.messages.len() == 4, "expected four step outcomes");
    let review = report
        .messages
        .first()
        .and_then(|outcome| outcome.message.clone())
        .unwrap_or_default();
    ensure!(review.contains("commented on PR #42 instead"), "review: {review}");
    ensure!(
        hosting.calls()
            == vec![
                "review #42".to_owned(),
                "comment #42 Approved via atelier".to_owned(),
                "merge #42 --squash admin=false".to_owned(),
            ],
        "hosting calls: {:?}",
        hosting.calls()
    );

    let stored = store
        .tasks
        .get(report.task.workspace(), report.task.id())
        .await?;
    ensure!(stored.status() == TaskStatus::Completed, "task not completed");
    let log = String::from_utf8(store.tasks.read_log(stored.workspace(), stored.id()).await?)?;
    ensure!(log.contains("approval: task approved"), "log: {log}");

    let workspace = store.workspaces.get(stored.workspace()).await?;
    ensure!(workspace.status() == WorkspaceStatus::Closed, "workspace still open");
    ensure!(workspace.worktree_path().is_none(), "worktree path kept");

    let discovery = store.backlog.get(&discovery_id).await?;
    ensure!(discovery.status() == DiscoveryStatus::Completed, "discovery pending");
    ensure!(discovery.completed_by() == Some(stored.id()), "wrong completing task");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn several_candidates_need_a_workspace_argument(store: Store) -> Result<(), eyre::Report> {
    for name in ["alpha", "beta"] {
        store
            .seed(name, TaskStatus::AwaitingApproval, TaskMetadata::new())
            .await?;
    }
    let cancel = CancellationToken::new();
    let scanner = TaskScanner::new(Arc::clone(&store.workspaces), Arc::clone(&store.tasks));

    let hits = scanner.awaiting_approval(&cancel).await?;
    let err = select_target(hits, None, SelectionMode::NonInteractive)
        .await
        .err()
        .ok_or_else(|| eyre::eyre!("expected ambiguity"))?;
    ensure!(err == TargetError::AmbiguousTarget { count: 2 }, "got {err:?}");
    ensure!(exit_code::for_error(&err) == 2, "ambiguity is a usage error");

    let hits = scanner.awaiting_approval(&cancel).await?;
    let target = select_target(hits, Some("beta"), SelectionMode::NonInteractive).await?;
    ensure!(target.workspace.name().as_str() == "beta", "wrong target");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn approving_a_failed_task_is_rejected(store: Store) -> Result<(), eyre::Report> {
    let (workspace, task) = store
        .seed("alpha", TaskStatus::CiFailed, TaskMetadata::new())
        .await?;
    let runner = ApprovalRunner::new(
        store.lifecycle(),
        store.manager(),
        Arc::new(SelfOwnedPrHosting::default()),
        Arc::clone(&store.backlog),
        Arc::clone(&store.clock),
    );
    let service = ApprovalService::new(runner, Arc::new(NullReporter), OutputMode::Text);

    let err = service
        .approve(
            ApprovalPlan::Approve,
            atelier::scan::ScanHit { workspace, task },
            &CancellationToken::new(),
        )
        .await
        .err()
        .ok_or_else(|| eyre::eyre!("expected rejection"))?;

    ensure!(exit_code::for_error(&err) == 2, "rejection is a usage error: {err}");
    Ok(())
}
