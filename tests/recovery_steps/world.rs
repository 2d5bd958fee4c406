//! Shared world state for recovery BDD scenarios.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use atelier::interaction::{MenuOption, OpenError, SelectError, Selector, UrlOpener};
use atelier::recovery::{ActionOutcome, RecoveryError, RecoveryService};
use atelier::scan::ScanHit;
use atelier::task::{
    adapters::memory::InMemoryTaskStore,
    domain::{NewTask, Task, TaskMetadata, TaskStatus, TaskStep},
    ports::TaskStore,
    services::TaskLifecycleService,
};
use atelier::workspace::domain::{NewWorkspace, Workspace, WorkspaceName};
use camino::Utf8PathBuf;
use eyre::WrapErr;
use mockable::DefaultClock;
use rstest::fixture;

/// Opener that records URLs instead of launching a browser.
#[derive(Default)]
pub struct RecordingOpener {
    pub opened: Mutex<Vec<String>>,
}

#[async_trait]
impl UrlOpener for RecordingOpener {
    async fn open(&self, url: &str) -> Result<(), OpenError> {
        if let Ok(mut opened) = self.opened.lock() {
            opened.push(url.to_owned());
        }
        Ok(())
    }
}

/// Selector returning one preset answer.
pub struct Answer(pub String);

#[async_trait]
impl Selector for Answer {
    async fn select(&self, _prompt: &str, options: &[MenuOption]) -> Result<String, SelectError> {
        options
            .iter()
            .find(|option| option.value == self.0)
            .map(|option| option.value.clone())
            .ok_or(SelectError::Canceled)
    }
}

pub type TestRecovery = RecoveryService<InMemoryTaskStore, RecordingOpener, DefaultClock>;

/// Scenario world for recovery behaviour tests.
pub struct RecoveryWorld {
    pub tasks: Arc<InMemoryTaskStore>,
    pub service: TestRecovery,
    pub target: Option<ScanHit>,
    pub result: Option<Result<ActionOutcome, RecoveryError>>,
}

impl RecoveryWorld {
    /// Creates a world with an empty task store.
    #[must_use]
    pub fn new() -> Self {
        let clock = Arc::new(DefaultClock);
        let tasks = Arc::new(InMemoryTaskStore::new());
        let service = RecoveryService::new(
            TaskLifecycleService::new(Arc::clone(&tasks), Arc::clone(&clock)),
            Arc::new(RecordingOpener::default()),
            clock,
        );
        Self {
            tasks,
            service,
            target: None,
            result: None,
        }
    }

    /// Persists a task in workspace `alpha` and builds its scan hit.
    ///
    /// An empty `worktree` models a worktree that was already removed.
    pub async fn seed(
        &mut self,
        status: TaskStatus,
        worktree: &str,
        prepare: impl FnOnce(&mut Task) -> Result<(), eyre::Report>,
    ) -> Result<(), eyre::Report> {
        let clock = DefaultClock;
        let name = WorkspaceName::new("alpha").wrap_err("workspace name")?;
        let workspace = Workspace::new(
            NewWorkspace {
                name: name.clone(),
                branch: "atelier/alpha".to_owned(),
                worktree_path: Utf8PathBuf::from(worktree),
                repository: None,
            },
            &clock,
        )?;
        let mut task = Task::new(
            NewTask {
                workspace: name,
                template_id: "feature".to_owned(),
                description: "add login flow".to_owned(),
                steps: vec![TaskStep::new("implement")?, TaskStep::new("validate")?],
                metadata: TaskMetadata::new(),
            },
            &clock,
        )?;
        if status != TaskStatus::Running {
            task.transition_to(status, "scenario setup", &clock)?;
        }
        prepare(&mut task)?;
        self.tasks.create(&task).await?;
        self.target = Some(ScanHit { workspace, task });
        Ok(())
    }

    /// Returns the seeded target.
    pub fn target(&self) -> Result<&ScanHit, eyre::Report> {
        self.target
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing target in scenario world"))
    }

    /// Returns the seeded task as currently persisted.
    pub async fn stored_task(&self) -> Result<Task, eyre::Report> {
        let target = self.target()?;
        Ok(self
            .tasks
            .get(target.task.workspace(), target.task.id())
            .await?)
    }

    /// Returns the successful outcome of the last action.
    pub fn outcome(&self) -> Result<&ActionOutcome, eyre::Report> {
        match self.result.as_ref() {
            Some(Ok(outcome)) => Ok(outcome),
            Some(Err(err)) => Err(eyre::eyre!("recovery failed: {err}")),
            None => Err(eyre::eyre!("missing recovery result")),
        }
    }
}

impl Default for RecoveryWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> RecoveryWorld {
    RecoveryWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
