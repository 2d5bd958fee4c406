//! Given steps for recovery BDD scenarios.

use super::world::{RecoveryWorld, run_async};
use atelier::task::domain::{ApprovalOption, StepResult, StepResultStatus, TaskStatus};
use chrono::Utc;
use eyre::WrapErr;
use mockable::DefaultClock;
use rstest_bdd_macros::given;

fn parse_status(status: &str) -> Result<TaskStatus, eyre::Report> {
    TaskStatus::try_from(status).map_err(|err| eyre::eyre!("invalid status in scenario: {err}"))
}

#[given(r#"a task in status "{status}""#)]
fn task_in_status(world: &mut RecoveryWorld, status: String) -> Result<(), eyre::Report> {
    let parsed = parse_status(&status)?;
    run_async(world.seed(parsed, "/tmp/worktrees/alpha", |_| Ok(()))).wrap_err("seed scenario task")
}

#[given(r#"a "{status}" task whose worktree was removed"#)]
fn task_without_worktree(world: &mut RecoveryWorld, status: String) -> Result<(), eyre::Report> {
    let parsed = parse_status(&status)?;
    run_async(world.seed(parsed, "", |_| Ok(()))).wrap_err("seed task without worktree")
}

#[given(r#"a "{status}" task whose current step asks for a decision"#)]
fn task_with_paused_step(world: &mut RecoveryWorld, status: String) -> Result<(), eyre::Report> {
    let parsed = parse_status(&status)?;
    run_async(world.seed(parsed, "/tmp/worktrees/alpha", |task| {
        let result = StepResult {
            step_index: task.current_step(),
            step_name: "implement".to_owned(),
            status: StepResultStatus::AwaitingApproval,
            output: "unexpected file src/generated.rs".to_owned(),
            approval_options: vec![
                ApprovalOption::new("keep", "Keep the file").recommended(),
                ApprovalOption::new("delete", "Delete the file"),
            ],
            recorded_at: Utc::now(),
        };
        task.record_step_result(result, &DefaultClock)?;
        Ok(())
    }))
    .wrap_err("seed task with paused step")
}
