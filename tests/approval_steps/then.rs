//! Then steps for approval BDD scenarios.

use super::world::{ApprovalWorld, run_async};
use atelier::task::domain::TaskStatus;
use atelier::workflow::approval::ApprovalError;
use atelier::workspace::{domain::WorkspaceStatus, ports::WorkspaceStore};
use rstest_bdd_macros::then;

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &ApprovalWorld, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let task = run_async(world.stored_task())?;
    if task.status() != expected {
        return Err(eyre::eyre!(
            "expected status {}, found {}",
            expected.as_str(),
            task.status().as_str()
        ));
    }
    Ok(())
}

#[then("the workspace is closed")]
fn workspace_is_closed(world: &ApprovalWorld) -> Result<(), eyre::Report> {
    let target = world
        .target
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing target"))?;
    let workspace = run_async(world.workspaces.get(target.workspace.name()))?;
    if workspace.status() != WorkspaceStatus::Closed {
        return Err(eyre::eyre!("workspace is {}", workspace.status().as_str()));
    }
    Ok(())
}

#[then("the review step reports a comment fallback")]
fn review_reports_comment_fallback(world: &ApprovalWorld) -> Result<(), eyre::Report> {
    let report = match world.result.as_ref() {
        Some(Ok(report)) => report,
        Some(Err(err)) => return Err(eyre::eyre!("approval failed: {err}")),
        None => return Err(eyre::eyre!("missing approval result")),
    };
    let review = report
        .messages
        .iter()
        .find(|outcome| outcome.step == "Add PR Review")
        .and_then(|outcome| outcome.message.as_deref())
        .ok_or_else(|| eyre::eyre!("missing review outcome"))?;
    if !review.contains("commented on PR #7 instead") {
        return Err(eyre::eyre!("unexpected review message: {review}"));
    }
    Ok(())
}

#[then("the approval fails because the task is not awaiting approval")]
fn approval_fails_not_awaiting(world: &ApprovalWorld) -> Result<(), eyre::Report> {
    let result = world
        .result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing approval result"))?;
    if !matches!(result, Err(ApprovalError::NotAwaitingApproval { .. })) {
        return Err(eyre::eyre!(
            "expected NotAwaitingApproval error, got {result:?}"
        ));
    }
    Ok(())
}
