//! When steps for approval BDD scenarios.

use super::world::{ApprovalWorld, run_async};
use atelier::workflow::approval::ApprovalPlan;
use rstest_bdd_macros::when;

#[when("the user approves the task")]
fn approve(world: &mut ApprovalWorld) -> Result<(), eyre::Report> {
    run_async(world.approve(ApprovalPlan::Approve))
}

#[when("the user approves and closes the task")]
fn approve_and_close(world: &mut ApprovalWorld) -> Result<(), eyre::Report> {
    run_async(world.approve(ApprovalPlan::ApproveAndClose))
}

#[when("the user approves, merges and closes the task")]
fn approve_merge_close(world: &mut ApprovalWorld) -> Result<(), eyre::Report> {
    run_async(world.approve(ApprovalPlan::ApproveMergeClose))
}
