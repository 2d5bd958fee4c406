//! Shared recovery test doubles.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::interaction::{MenuOption, OpenError, SelectError, Selector, UrlOpener};
use crate::recovery::RecoveryService;
use crate::scan::ScanHit;
use crate::task::{
    adapters::memory::InMemoryTaskStore,
    domain::{ApprovalOption, StepResult, StepResultStatus, Task},
    ports::TaskStore,
    services::TaskLifecycleService,
};
use crate::test_support::workspace;
use async_trait::async_trait;
use chrono::Utc;
use mockable::DefaultClock;
use mockall::mock;

mock! {
    pub Opener {}

    #[async_trait]
    impl UrlOpener for Opener {
        async fn open(&self, url: &str) -> Result<(), OpenError>;
    }
}

/// Selector answering from a script and recording the values offered.
#[derive(Default)]
pub struct ScriptedMenu {
    answers: Mutex<VecDeque<Result<String, SelectError>>>,
    offered: Mutex<Vec<Vec<String>>>,
}

impl ScriptedMenu {
    pub fn answering(answers: &[&str]) -> Self {
        let script = answers.iter().map(|answer| Ok((*answer).to_owned())).collect();
        Self {
            answers: Mutex::new(script),
            offered: Mutex::default(),
        }
    }

    pub fn canceling() -> Self {
        Self {
            answers: Mutex::new(VecDeque::from([Err(SelectError::Canceled)])),
            offered: Mutex::default(),
        }
    }

    pub fn offered(&self) -> Vec<Vec<String>> {
        self.offered.lock().expect("offered lock").clone()
    }
}

#[async_trait]
impl Selector for ScriptedMenu {
    async fn select(&self, _prompt: &str, options: &[MenuOption]) -> Result<String, SelectError> {
        self.offered
            .lock()
            .expect("offered lock")
            .push(options.iter().map(|option| option.label.clone()).collect());
        self.answers
            .lock()
            .expect("answers lock")
            .pop_front()
            .unwrap_or(Err(SelectError::Failed("script exhausted".to_owned())))
    }
}

pub type TestRecovery = RecoveryService<InMemoryTaskStore, MockOpener, DefaultClock>;

pub struct Harness {
    pub store: Arc<InMemoryTaskStore>,
    pub service: TestRecovery,
}

pub fn harness(opener: MockOpener) -> Harness {
    let clock = Arc::new(DefaultClock);
    let store = Arc::new(InMemoryTaskStore::new());
    let lifecycle = TaskLifecycleService::new(Arc::clone(&store), Arc::clone(&clock));
    Harness {
        service: RecoveryService::new(lifecycle, Arc::new(opener), clock),
        store,
    }
}

impl Harness {
    pub async fn seed(&self, task: Task) -> ScanHit {
        self.store.create(&task).await.expect("create task");
        ScanHit {
            workspace: workspace(task.workspace().as_str()),
            task,
        }
    }

    pub async fn stored(&self, task: &Task) -> Task {
        self.store
            .get(task.workspace(), task.id())
            .await
            .expect("stored task")
    }

    pub async fn log(&self, task: &Task) -> String {
        let bytes = self
            .store
            .read_log(task.workspace(), task.id())
            .await
            .expect("read log");
        String::from_utf8(bytes).expect("utf8 log")
    }
}

/// Records a paused current step offering `keep` (recommended) and `delete`.
pub fn pause_for_approval(task: &mut Task) {
    task.record_step_result(
        StepResult {
            step_index: task.current_step(),
            step_name: "implement".to_owned(),
            status: StepResultStatus::AwaitingApproval,
            output: "unexpected file src/generated.rs".to_owned(),
            approval_options: vec![
                ApprovalOption::new("keep", "Keep the file").recommended(),
                ApprovalOption::new("delete", "Delete the file")
                    .with_description("Remove it before continuing"),
            ],
            recorded_at: Utc::now(),
        },
        &DefaultClock,
    )
    .expect("record paused step");
}
