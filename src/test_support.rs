//! Builders shared by unit tests across bounded contexts.

use crate::task::domain::{NewTask, Task, TaskMetadata, TaskStatus, TaskStep};
use crate::workspace::domain::{NewWorkspace, Workspace, WorkspaceName};
use camino::Utf8PathBuf;
use mockable::DefaultClock;

pub fn workspace_name(name: &str) -> WorkspaceName {
    WorkspaceName::new(name).expect("valid workspace name")
}

pub fn workspace(name: &str) -> Workspace {
    workspace_at(name, &format!("/tmp/worktrees/{name}"))
}

/// Builds a workspace record; an empty `path` means the worktree is gone.
pub fn workspace_at(name: &str, path: &str) -> Workspace {
    Workspace::new(
        NewWorkspace {
            name: workspace_name(name),
            branch: format!("atelier/{name}"),
            worktree_path: Utf8PathBuf::from(path),
            repository: None,
        },
        &DefaultClock,
    )
    .expect("valid workspace")
}

pub fn plan(names: &[&str]) -> Vec<TaskStep> {
    names
        .iter()
        .map(|name| TaskStep::new(*name).expect("valid step name"))
        .collect()
}

pub fn new_task(workspace: &str) -> Task {
    new_task_with_metadata(workspace, TaskMetadata::new())
}

pub fn new_task_with_metadata(workspace: &str, metadata: TaskMetadata) -> Task {
    Task::new(
        NewTask {
            workspace: workspace_name(workspace),
            template_id: "feature".to_owned(),
            description: "add login flow".to_owned(),
            steps: plan(&["implement", "validate", "git"]),
            metadata,
        },
        &DefaultClock,
    )
    .expect("valid task")
}

/// Drives a freshly started task to `status` along valid transitions.
pub fn drive_to(task: &mut Task, status: TaskStatus) {
    let clock = DefaultClock;
    match status {
        TaskStatus::Running => {}
        TaskStatus::Completed => {
            task.transition_to(TaskStatus::AwaitingApproval, "validated", &clock)
                .expect("running to awaiting_approval");
            task.transition_to(TaskStatus::Completed, "approved", &clock)
                .expect("awaiting_approval to completed");
        }
        other => task
            .transition_to(other, "test setup", &clock)
            .expect("running to target"),
    }
}

pub fn task_in(workspace: &str, status: TaskStatus) -> Task {
    let mut task = new_task(workspace);
    drive_to(&mut task, status);
    task
}
