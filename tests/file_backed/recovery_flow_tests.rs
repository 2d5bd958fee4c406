//! Recovery flows persisted through the file-backed stores.

use std::sync::Arc;

use super::helpers::{FixedMenu, NoBrowser, Store, store};
use atelier::exit_code;
use atelier::recovery::{RecoveryAction, RecoveryService};
use atelier::scan::{ScanHit, SelectionMode, TaskScanner, select_target};
use atelier::task::{
    adapters::file::FileTaskStore,
    domain::{TaskMetadata, TaskStatus, metadata_keys},
    ports::TaskStore,
};
use atelier::validation::{PipelineResult, VALIDATION_ARTIFACT, ValidationStepResult};
use atelier::workspace::ports::WorkspaceStore;
use eyre::ensure;
use mockable::DefaultClock;
use rstest::rstest;
use serde_json::json;
use tokio_util::sync::CancellationToken;

type FileRecovery = RecoveryService<FileTaskStore, NoBrowser, DefaultClock>;

fn recovery(store: &Store) -> FileRecovery {
    RecoveryService::new(store.lifecycle(), Arc::new(NoBrowser), Arc::clone(&store.clock))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn view_then_retry_persists_running_task(store: Store) -> Result<(), eyre::Report> {
    let (_, task) = store
        .seed("alpha", TaskStatus::ValidationFailed, TaskMetadata::new())
        .await?;
    let result = PipelineResult::from_steps(vec![ValidationStepResult {
        name: "clippy".to_owned(),
        success: false,
        output: "unused variable `token`".to_owned(),
        duration_ms: 1200,
    }]);
    let bytes = serde_json::to_vec(&result)?;
    store
        .tasks
        .save_versioned_artifact(task.workspace(), task.id(), VALIDATION_ARTIFACT, &bytes)
        .await?;
    store
        .tasks
        .save_artifact(task.workspace(), task.id(), VALIDATION_ARTIFACT, &bytes)
        .await?;

    let cancel = CancellationToken::new();
    let scanner = TaskScanner::new(Arc::clone(&store.workspaces), Arc::clone(&store.tasks));
    let hits = scanner.in_error_state(&cancel).await?;
    let target = select_target(hits, None, SelectionMode::NonInteractive).await?;

    let mut views = Vec::new();
    let outcome = recovery(&store)
        .run_loop(
            target,
            &FixedMenu::new(&["view_errors", "retry_ai"]),
            &cancel,
            |view| views.push(view.message.clone()),
        )
        .await?;

    ensure!(views.len() == 1, "expected one view, got {views:?}");
    let view = views.first().cloned().unwrap_or_default();
    ensure!(view.contains("validation failed: clippy"), "view: {view}");
    ensure!(view.contains("unused variable"), "view: {view}");
    ensure!(outcome.done, "retry ends the loop");

    let stored = store.tasks.get(task.workspace(), task.id()).await?;
    ensure!(stored.status() == TaskStatus::Running, "task not running");
    let log = String::from_utf8(store.tasks.read_log(task.workspace(), task.id()).await?)?;
    ensure!(log.contains("recovery: view_errors"), "log: {log}");
    ensure!(log.contains("recovery: retry_ai"), "log: {log}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn continue_waiting_only_applies_to_ci_timeout(store: Store) -> Result<(), eyre::Report> {
    let (ci_failed_ws, ci_failed) = store
        .seed("alpha", TaskStatus::CiFailed, TaskMetadata::new())
        .await?;
    let (timeout_ws, timed_out) = store
        .seed("beta", TaskStatus::CiTimeout, TaskMetadata::new())
        .await?;
    let service = recovery(&store);
    let cancel = CancellationToken::new();

    let err = service
        .execute(
            RecoveryAction::ContinueWaiting,
            &ScanHit {
                workspace: ci_failed_ws,
                task: ci_failed.clone(),
            },
            &cancel,
        )
        .await
        .err()
        .ok_or_else(|| eyre::eyre!("continue on ci_failed must fail"))?;
    ensure!(exit_code::for_error(&err) == 2, "usage error expected: {err}");
    let unchanged = store.tasks.get(ci_failed.workspace(), ci_failed.id()).await?;
    ensure!(unchanged.status() == TaskStatus::CiFailed, "status changed");

    let outcome = service
        .execute(
            RecoveryAction::ContinueWaiting,
            &ScanHit {
                workspace: timeout_ws,
                task: timed_out.clone(),
            },
            &cancel,
        )
        .await?;
    ensure!(outcome.done, "continue ends the loop");
    let resumed = store.tasks.get(timed_out.workspace(), timed_out.id()).await?;
    ensure!(resumed.status() == TaskStatus::Running, "not resumed");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn view_logs_falls_back_to_printing_url(store: Store) -> Result<(), eyre::Report> {
    let mut metadata = TaskMetadata::new();
    metadata.insert(
        metadata_keys::GITHUB_ACTIONS_URL,
        json!("https://github.example/acme/app/actions/runs/7"),
    );
    let (workspace, task) = store.seed("alpha", TaskStatus::CiFailed, metadata).await?;

    let outcome = recovery(&store)
        .execute(
            RecoveryAction::ViewLogs,
            &ScanHit { workspace, task },
            &CancellationToken::new(),
        )
        .await?;

    ensure!(!outcome.done, "view returns to the menu");
    ensure!(
        outcome
            .message
            .contains("https://github.example/acme/app/actions/runs/7"),
        "message: {}",
        outcome.message
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn fix_manually_after_worktree_removal_uses_placeholder(
    store: Store,
) -> Result<(), eyre::Report> {
    let (workspace, task) = store
        .seed("gamma", TaskStatus::GhFailed, TaskMetadata::new())
        .await?;
    store.manager().close(workspace.name()).await?;
    let closed = store.workspaces.get(workspace.name()).await?;

    let outcome = recovery(&store)
        .execute(
            RecoveryAction::FixManually,
            &ScanHit {
                workspace: closed,
                task,
            },
            &CancellationToken::new(),
        )
        .await?;

    ensure!(
        outcome.message.contains("cd <worktree for gamma>"),
        "message: {}",
        outcome.message
    );
    ensure!(outcome.task.status() == TaskStatus::GhFailed, "status changed");
    Ok(())
}
