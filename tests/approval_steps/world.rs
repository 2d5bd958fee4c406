//! Shared world state for approval BDD scenarios.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use atelier::backlog::InMemoryBacklogStore;
use atelier::config::OutputMode;
use atelier::hosting::{HostingClient, HostingError, HostingResult, MergeOptions, PullRequestTarget};
use atelier::scan::ScanHit;
use atelier::task::{
    adapters::memory::InMemoryTaskStore,
    domain::{NewTask, Task, TaskMetadata, TaskStatus, TaskStep},
    ports::TaskStore,
    services::TaskLifecycleService,
};
use atelier::workflow::NullReporter;
use atelier::workflow::approval::{
    ApprovalError, ApprovalPlan, ApprovalReport, ApprovalRunner, ApprovalService,
};
use atelier::workspace::{
    adapters::memory::InMemoryWorkspaceStore,
    domain::{NewWorkspace, Workspace, WorkspaceName},
    ports::{WorkspaceStore, WorktreeOps, WorktreeResult},
    services::WorkspaceManager,
};
use camino::{Utf8Path, Utf8PathBuf};
use eyre::WrapErr;
use mockable::DefaultClock;
use rstest::fixture;
use tokio_util::sync::CancellationToken;

/// Worktree operations that always succeed.
pub struct NoopWorktrees;

#[async_trait]
impl WorktreeOps for NoopWorktrees {
    async fn add_worktree(&self, _path: &Utf8Path, _branch: &str) -> WorktreeResult<()> {
        Ok(())
    }

    async fn remove_worktree(&self, _path: &Utf8Path, _force: bool) -> WorktreeResult<()> {
        Ok(())
    }

    async fn delete_branch(&self, _branch: &str) -> WorktreeResult<()> {
        Ok(())
    }
}

/// Hosting client whose review outcome depends on PR ownership.
#[derive(Default)]
pub struct ScriptedHosting {
    pub owns_pr: AtomicBool,
}

#[async_trait]
impl HostingClient for ScriptedHosting {
    async fn approve_pull_request(&self, _target: &PullRequestTarget, _body: &str) -> HostingResult<()> {
        if self.owns_pr.load(Ordering::SeqCst) {
            return Err(HostingError::SelfApproval);
        }
        Ok(())
    }

    async fn comment_pull_request(&self, _target: &PullRequestTarget, _body: &str) -> HostingResult<()> {
        Ok(())
    }

    async fn merge_pull_request(
        &self,
        _target: &PullRequestTarget,
        _options: MergeOptions,
    ) -> HostingResult<()> {
        Ok(())
    }
}

/// Scenario world for approval behaviour tests.
pub struct ApprovalWorld {
    pub tasks: Arc<InMemoryTaskStore>,
    pub workspaces: Arc<InMemoryWorkspaceStore>,
    pub hosting: Arc<ScriptedHosting>,
    pub target: Option<ScanHit>,
    pub result: Option<Result<ApprovalReport, ApprovalError>>,
}

impl ApprovalWorld {
    /// Creates a world with empty stores.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tasks: Arc::new(InMemoryTaskStore::new()),
            workspaces: Arc::new(InMemoryWorkspaceStore::new()),
            hosting: Arc::new(ScriptedHosting::default()),
            target: None,
            result: None,
        }
    }

    /// Persists a workspace and a task driven to `status`.
    pub async fn seed(
        &mut self,
        name: &str,
        status: TaskStatus,
        metadata: TaskMetadata,
    ) -> Result<(), eyre::Report> {
        let clock = DefaultClock;
        let workspace_name = WorkspaceName::new(name).wrap_err("workspace name")?;
        let workspace = Workspace::new(
            NewWorkspace {
                name: workspace_name.clone(),
                branch: format!("atelier/{name}"),
                worktree_path: Utf8PathBuf::from(format!("/tmp/worktrees/{name}")),
                repository: Some("acme/app".to_owned()),
            },
            &clock,
        )?;
        let mut task = Task::new(
            NewTask {
                workspace: workspace_name,
                template_id: "feature".to_owned(),
                description: "add login flow".to_owned(),
                steps: vec![TaskStep::new("implement")?],
                metadata,
            },
            &clock,
        )?;
        if status != TaskStatus::Running {
            task.transition_to(status, "scenario setup", &clock)?;
        }
        self.workspaces.create(&workspace).await?;
        self.tasks.create(&task).await?;
        self.target = Some(ScanHit { workspace, task });
        Ok(())
    }

    /// Runs `plan` against the seeded target and stores the result.
    pub async fn approve(&mut self, plan: ApprovalPlan) -> Result<(), eyre::Report> {
        let target = self
            .target
            .clone()
            .ok_or_else(|| eyre::eyre!("missing target in scenario world"))?;
        let clock = Arc::new(DefaultClock);
        let runner = ApprovalRunner::new(
            TaskLifecycleService::new(Arc::clone(&self.tasks), Arc::clone(&clock)),
            WorkspaceManager::new(
                Arc::clone(&self.workspaces),
                Arc::new(NoopWorktrees),
                Arc::clone(&clock),
            ),
            Arc::clone(&self.hosting),
            Arc::new(InMemoryBacklogStore::new()),
            clock,
        );
        let service = ApprovalService::new(runner, Arc::new(NullReporter), OutputMode::Text);
        self.result = Some(service.approve(plan, target, &CancellationToken::new()).await);
        Ok(())
    }

    /// Returns the seeded task as currently persisted.
    pub async fn stored_task(&self) -> Result<Task, eyre::Report> {
        let target = self
            .target
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing target in scenario world"))?;
        Ok(self
            .tasks
            .get(target.task.workspace(), target.task.id())
            .await?)
    }
}

impl Default for ApprovalWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> ApprovalWorld {
    ApprovalWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
