//! In-memory task store for tests and embedding.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::storage;
use crate::task::{
    domain::{Task, TaskId},
    ports::{TaskStore, TaskStoreError, TaskStoreResult, versioned_artifact_name},
};
use crate::workspace::domain::WorkspaceName;

/// Thread-safe in-memory task store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskStore {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    records: HashMap<(WorkspaceName, TaskId), TaskRecord>,
}

#[derive(Debug)]
struct TaskRecord {
    task: Task,
    log: Vec<u8>,
    artifacts: BTreeMap<String, Vec<u8>>,
}

type Key = (WorkspaceName, TaskId);

fn key(workspace: &WorkspaceName, id: TaskId) -> Key {
    (workspace.clone(), id)
}

fn lock_error(err: impl std::fmt::Display) -> TaskStoreError {
    TaskStoreError::persistence(std::io::Error::other(err.to_string()))
}

fn ensure_artifact_name(name: &str) -> TaskStoreResult<()> {
    if storage::is_plain_file_name(name) {
        Ok(())
    } else {
        Err(TaskStoreError::InvalidArtifactName(name.to_owned()))
    }
}

impl InMemoryTaskStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> TaskStoreResult<RwLockReadGuard<'_, InMemoryTaskState>> {
        self.state.read().map_err(lock_error)
    }

    fn write(&self) -> TaskStoreResult<RwLockWriteGuard<'_, InMemoryTaskState>> {
        self.state.write().map_err(lock_error)
    }
}

impl InMemoryTaskState {
    fn record(&self, workspace: &WorkspaceName, id: TaskId) -> TaskStoreResult<&TaskRecord> {
        self.records
            .get(&key(workspace, id))
            .ok_or_else(|| TaskStoreError::TaskNotFound {
                workspace: workspace.clone(),
                id,
            })
    }

    fn record_mut(
        &mut self,
        workspace: &WorkspaceName,
        id: TaskId,
    ) -> TaskStoreResult<&mut TaskRecord> {
        self.records
            .get_mut(&key(workspace, id))
            .ok_or_else(|| TaskStoreError::TaskNotFound {
                workspace: workspace.clone(),
                id,
            })
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn create(&self, task: &Task) -> TaskStoreResult<()> {
        let mut state = self.write()?;
        let record_key = key(task.workspace(), task.id());
        if state.records.contains_key(&record_key) {
            return Err(TaskStoreError::Duplicate {
                workspace: task.workspace().clone(),
                id: task.id(),
            });
        }
        state.records.insert(
            record_key,
            TaskRecord {
                task: task.clone(),
                log: Vec::new(),
                artifacts: BTreeMap::new(),
            },
        );
        Ok(())
    }

    async fn get(&self, workspace: &WorkspaceName, id: TaskId) -> TaskStoreResult<Task> {
        Ok(self.read()?.record(workspace, id)?.task.clone())
    }

    async fn list(&self, workspace: &WorkspaceName) -> TaskStoreResult<Vec<Task>> {
        let state = self.read()?;
        let mut tasks: Vec<Task> = state
            .records
            .iter()
            .filter(|((owner, _), _)| owner == workspace)
            .map(|(_, record)| record.task.clone())
            .collect();
        tasks.sort_by(|left, right| {
            right
                .created_at()
                .cmp(&left.created_at())
                .then_with(|| right.id().cmp(&left.id()))
        });
        Ok(tasks)
    }

    async fn update(&self, task: &Task) -> TaskStoreResult<()> {
        let mut state = self.write()?;
        state.record_mut(task.workspace(), task.id())?.task = task.clone();
        Ok(())
    }

    async fn delete(&self, workspace: &WorkspaceName, id: TaskId) -> TaskStoreResult<()> {
        self.write()?
            .records
            .remove(&key(workspace, id))
            .map(|_| ())
            .ok_or_else(|| TaskStoreError::TaskNotFound {
                workspace: workspace.clone(),
                id,
            })
    }

    async fn append_log(
        &self,
        workspace: &WorkspaceName,
        id: TaskId,
        bytes: &[u8],
    ) -> TaskStoreResult<()> {
        let mut state = self.write()?;
        state.record_mut(workspace, id)?.log.extend_from_slice(bytes);
        Ok(())
    }

    async fn read_log(&self, workspace: &WorkspaceName, id: TaskId) -> TaskStoreResult<Vec<u8>> {
        Ok(self.read()?.record(workspace, id)?.log.clone())
    }

    async fn save_artifact(
        &self,
        workspace: &WorkspaceName,
        id: TaskId,
        name: &str,
        bytes: &[u8],
    ) -> TaskStoreResult<()> {
        ensure_artifact_name(name)?;
        let mut state = self.write()?;
        state
            .record_mut(workspace, id)?
            .artifacts
            .insert(name.to_owned(), bytes.to_vec());
        Ok(())
    }

    async fn get_artifact(
        &self,
        workspace: &WorkspaceName,
        id: TaskId,
        name: &str,
    ) -> TaskStoreResult<Vec<u8>> {
        ensure_artifact_name(name)?;
        self.read()?
            .record(workspace, id)?
            .artifacts
            .get(name)
            .cloned()
            .ok_or_else(|| TaskStoreError::ArtifactNotFound {
                id,
                name: name.to_owned(),
            })
    }

    async fn list_artifacts(
        &self,
        workspace: &WorkspaceName,
        id: TaskId,
    ) -> TaskStoreResult<Vec<String>> {
        Ok(self
            .read()?
            .record(workspace, id)?
            .artifacts
            .keys()
            .cloned()
            .collect())
    }

    async fn save_versioned_artifact(
        &self,
        workspace: &WorkspaceName,
        id: TaskId,
        name: &str,
        bytes: &[u8],
    ) -> TaskStoreResult<String> {
        ensure_artifact_name(name)?;
        let mut state = self.write()?;
        let record = state.record_mut(workspace, id)?;
        let versioned = (1..)
            .map(|version| versioned_artifact_name(name, version))
            .find(|candidate| !record.artifacts.contains_key(candidate))
            .ok_or_else(|| TaskStoreError::InvalidArtifactName(name.to_owned()))?;
        record.artifacts.insert(versioned.clone(), bytes.to_vec());
        Ok(versioned)
    }
}
