//! When steps for recovery BDD scenarios.

use super::world::{Answer, RecoveryWorld, run_async};
use atelier::recovery::RecoveryAction;
use rstest_bdd_macros::when;
use tokio_util::sync::CancellationToken;

#[when(r#"the user chooses "{action}""#)]
fn user_chooses(world: &mut RecoveryWorld, action: String) -> Result<(), eyre::Report> {
    let parsed: RecoveryAction = action.parse()?;
    let target = world.target()?.clone();
    let result = run_async(world.service.execute(parsed, &target, &CancellationToken::new()));
    world.result = Some(result);
    Ok(())
}

#[when(r#"the user picks "{choice}" for the paused step"#)]
fn user_picks(world: &mut RecoveryWorld, choice: String) -> Result<(), eyre::Report> {
    let target = world.target()?.clone();
    let result = run_async(world.service.resolve_step_approval(&target, &Answer(choice)));
    world.result = Some(result);
    Ok(())
}
