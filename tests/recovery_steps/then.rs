//! Then steps for recovery BDD scenarios.

use super::world::{RecoveryWorld, run_async};
use atelier::recovery::RecoveryError;
use atelier::task::domain::TaskStatus;
use rstest_bdd_macros::then;

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &RecoveryWorld, status: String) -> Result<(), eyre::Report> {
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

#[then("the recovery is done")]
fn recovery_is_done(world: &RecoveryWorld) -> Result<(), eyre::Report> {
    if !world.outcome()?.done {
        return Err(eyre::eyre!("recovery should have ended the menu loop"));
    }
    Ok(())
}

#[then("the recovery fails with a continue-waiting error")]
fn recovery_fails_continue_waiting(world: &RecoveryWorld) -> Result<(), eyre::Report> {
    let result = world
        .result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing recovery result"))?;
    if !matches!(result, Err(RecoveryError::ContinueRequiresCiTimeout { .. })) {
        return Err(eyre::eyre!(
            "expected ContinueRequiresCiTimeout error, got {result:?}"
        ));
    }
    Ok(())
}

#[then(r#"the message contains "{text}""#)]
fn message_contains(world: &RecoveryWorld, text: String) -> Result<(), eyre::Report> {
    let message = &world.outcome()?.message;
    if !message.contains(&text) {
        return Err(eyre::eyre!("message {message:?} lacks {text:?}"));
    }
    Ok(())
}

#[then(r#"the step approval choice is "{choice}""#)]
fn step_approval_choice_is(world: &RecoveryWorld, choice: String) -> Result<(), eyre::Report> {
    let task = run_async(world.stored_task())?;
    let recorded = task.metadata().step_approval_choice();
    if recorded.as_deref() != Some(choice.as_str()) {
        return Err(eyre::eyre!("expected choice {choice}, found {recorded:?}"));
    }
    Ok(())
}
