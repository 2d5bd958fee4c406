//! Given steps for approval BDD scenarios.

use std::sync::atomic::Ordering;

use super::world::{ApprovalWorld, run_async};
use atelier::task::domain::{TaskMetadata, TaskStatus, metadata_keys};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use serde_json::json;

#[given(r#"a workspace "{name}" with a task in status "{status}""#)]
fn workspace_with_task_in_status(
    world: &mut ApprovalWorld,
    name: String,
    status: String,
) -> Result<(), eyre::Report> {
    let parsed = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid status in scenario: {err}"))?;
    run_async(world.seed(&name, parsed, TaskMetadata::new())).wrap_err("seed scenario task")
}

#[given(r#"a workspace "{name}" with a task awaiting approval on PR {number:u64}"#)]
fn workspace_with_pull_request(
    world: &mut ApprovalWorld,
    name: String,
    number: u64,
) -> Result<(), eyre::Report> {
    let mut metadata = TaskMetadata::new();
    metadata.insert(metadata_keys::PR_NUMBER, json!(number));
    run_async(world.seed(&name, TaskStatus::AwaitingApproval, metadata))
        .wrap_err("seed scenario task with pull request")
}

#[given("the user owns the pull request")]
fn user_owns_pull_request(world: &mut ApprovalWorld) {
    world.hosting.owns_pr.store(true, Ordering::SeqCst);
}
