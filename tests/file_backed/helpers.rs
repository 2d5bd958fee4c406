//! Shared fixtures for file-backed integration tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use atelier::backlog::FileBacklogStore;
use atelier::hosting::{HostingClient, HostingError, HostingResult, MergeOptions, PullRequestTarget};
use atelier::interaction::{MenuOption, OpenError, SelectError, Selector, UrlOpener};
use atelier::task::{
    adapters::file::FileTaskStore,
    domain::{NewTask, Task, TaskMetadata, TaskStatus, TaskStep},
    services::TaskLifecycleService,
};
use atelier::workspace::{
    adapters::file::FileWorkspaceStore,
    domain::Workspace,
    ports::{WorktreeOps, WorktreeResult},
    services::{CreateWorkspaceRequest, WorkspaceManager},
};
use camino::{Utf8Path, Utf8PathBuf};
use eyre::WrapErr;
use mockable::DefaultClock;
use rstest::fixture;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

/// Worktree operations that only record what was asked of them.
#[derive(Default)]
pub struct RecordingWorktrees {
    pub calls: Mutex<Vec<String>>,
}

impl RecordingWorktrees {
    fn record(&self, call: String) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

#[async_trait]
impl WorktreeOps for RecordingWorktrees {
    async fn add_worktree(&self, path: &Utf8Path, branch: &str) -> WorktreeResult<()> {
        self.record(format!("add {path} {branch}"));
        Ok(())
    }

    async fn remove_worktree(&self, path: &Utf8Path, _force: bool) -> WorktreeResult<()> {
        self.record(format!("remove {path}"));
        Ok(())
    }

    async fn delete_branch(&self, branch: &str) -> WorktreeResult<()> {
        self.record(format!("delete {branch}"));
        Ok(())
    }
}

/// Hosting client that owns every PR it is asked to approve.
#[derive(Default)]
pub struct SelfOwnedPrHosting {
    pub calls: Mutex<Vec<String>>,
}

impl SelfOwnedPrHosting {
    fn record(&self, call: String) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl HostingClient for SelfOwnedPrHosting {
    async fn approve_pull_request(&self, target: &PullRequestTarget, _body: &str) -> HostingResult<()> {
        self.record(format!("review #{}", target.number));
        Err(HostingError::SelfApproval)
    }

    async fn comment_pull_request(&self, target: &PullRequestTarget, body: &str) -> HostingResult<()> {
        self.record(format!("comment #{} {body}", target.number));
        Ok(())
    }

    async fn merge_pull_request(
        &self,
        target: &PullRequestTarget,
        options: MergeOptions,
    ) -> HostingResult<()> {
        self.record(format!(
            "merge #{} {} admin={}",
            target.number,
            options.method.flag(),
            options.admin
        ));
        Ok(())
    }
}

/// Selector answering with fixed values in order.
pub struct FixedMenu(pub Mutex<Vec<String>>);

impl FixedMenu {
    pub fn new(answers: &[&str]) -> Self {
        Self(Mutex::new(answers.iter().rev().map(|a| (*a).to_owned()).collect()))
    }
}

#[async_trait]
impl Selector for FixedMenu {
    async fn select(&self, _prompt: &str, _options: &[MenuOption]) -> Result<String, SelectError> {
        self.0
            .lock()
            .ok()
            .and_then(|mut answers| answers.pop())
            .ok_or(SelectError::Canceled)
    }
}

/// Opener that never succeeds.
pub struct NoBrowser;

#[async_trait]
impl UrlOpener for NoBrowser {
    async fn open(&self, _url: &str) -> Result<(), OpenError> {
        Err(OpenError::Failed {
            program: "xdg-open".to_owned(),
            stderr: "no display".to_owned(),
        })
    }
}

/// A store root in a temporary directory with every file adapter opened.
pub struct Store {
    _temp: TempDir,
    pub root: Utf8PathBuf,
    pub tasks: Arc<FileTaskStore>,
    pub workspaces: Arc<FileWorkspaceStore>,
    pub backlog: Arc<FileBacklogStore>,
    pub worktrees: Arc<RecordingWorktrees>,
    pub clock: Arc<DefaultClock>,
}

impl Store {
    pub fn lifecycle(&self) -> TaskLifecycleService<FileTaskStore, DefaultClock> {
        TaskLifecycleService::new(Arc::clone(&self.tasks), Arc::clone(&self.clock))
    }

    pub fn manager(&self) -> WorkspaceManager<FileWorkspaceStore, RecordingWorktrees, DefaultClock> {
        WorkspaceManager::new(
            Arc::clone(&self.workspaces),
            Arc::clone(&self.worktrees),
            Arc::clone(&self.clock),
        )
    }

    /// Creates a workspace and starts a task in it, driving it to `status`.
    pub async fn seed(
        &self,
        name: &str,
        status: TaskStatus,
        metadata: TaskMetadata,
    ) -> Result<(Workspace, Task), eyre::Report> {
        let workspace = self
            .manager()
            .create(CreateWorkspaceRequest::new(
                name,
                format!("atelier/{name}"),
                self.root.join("worktrees").join(name),
            ))
            .await
            .wrap_err("create workspace")?;
        let lifecycle = self.lifecycle();
        let mut task = lifecycle
            .start_task(NewTask {
                workspace: workspace.name().clone(),
                template_id: "feature".to_owned(),
                description: format!("work in {name}"),
                steps: vec![
                    TaskStep::new("implement").wrap_err("step")?,
                    TaskStep::new("validate").wrap_err("step")?,
                ],
                metadata,
            })
            .await
            .wrap_err("start task")?;
        let cancel = CancellationToken::new();
        if status == TaskStatus::Completed {
            lifecycle
                .transition(&cancel, &mut task, TaskStatus::AwaitingApproval, "validated")
                .await
                .wrap_err("reach awaiting_approval")?;
        }
        if status != TaskStatus::Running {
            lifecycle
                .transition(&cancel, &mut task, status, "seeded")
                .await
                .wrap_err("reach seeded status")?;
        }
        Ok((workspace, task))
    }
}

#[fixture]
pub fn store() -> Store {
    let temp = tempfile::tempdir().expect("temp dir");
    let root = Utf8PathBuf::from_path_buf(temp.path().join("store")).expect("utf8 temp path");
    Store {
        tasks: Arc::new(FileTaskStore::open(&root).expect("task store")),
        workspaces: Arc::new(FileWorkspaceStore::open(&root).expect("workspace store")),
        backlog: Arc::new(FileBacklogStore::open(&root).expect("backlog store")),
        worktrees: Arc::new(RecordingWorktrees::default()),
        clock: Arc::new(DefaultClock),
        root,
        _temp: temp,
    }
}
