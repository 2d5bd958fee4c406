//! User-facing instructions rendered from `minijinja` templates.

use crate::workspace::domain::Workspace;
use minijinja::{Environment, context};

const FIX_MANUALLY: &str = "\
Task {{ task_id }} is {{ status }}. Fix it by hand in its worktree:

  cd {{ worktree }}

When you are done, resume the task:

  atelier resume {{ workspace }}";

const STEP_APPROVAL_RESUME: &str = "\
Recorded choice '{{ choice }}' for step '{{ step }}'. Resume the task to continue:

  atelier resume {{ workspace }}";

/// Returns the worktree path, or a placeholder when the worktree is gone.
pub(super) fn worktree_display(workspace: &Workspace) -> String {
    workspace.worktree_path().map_or_else(
        || format!("<worktree for {}>", workspace.name()),
        ToString::to_string,
    )
}

pub(super) fn fix_manually(
    workspace: &Workspace,
    task_id: &str,
    status: &str,
) -> Result<String, minijinja::Error> {
    Environment::new().render_str(
        FIX_MANUALLY,
        context! {
            task_id => task_id,
            status => status,
            worktree => worktree_display(workspace),
            workspace => workspace.name().as_str(),
        },
    )
}

pub(super) fn step_approval_resume(
    workspace: &Workspace,
    step: &str,
    choice: &str,
) -> Result<String, minijinja::Error> {
    Environment::new().render_str(
        STEP_APPROVAL_RESUME,
        context! {
            choice => choice,
            step => step,
            workspace => workspace.name().as_str(),
        },
    )
}
