//! File-backed task store.
//!
//! Layout under the store root:
//!
//! ```text
//! workspaces/<workspace>/tasks/<id>/task.json
//! workspaces/<workspace>/tasks/<id>/task.log
//! workspaces/<workspace>/tasks/<id>/artifacts/<name>
//! ```

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::fs_utf8::{Dir, OpenOptions};
use std::io::{self, Write};
use std::sync::Arc;
use tracing::warn;

use crate::storage;
use crate::task::{
    domain::{Task, TaskId},
    ports::{TaskStore, TaskStoreError, TaskStoreResult, versioned_artifact_name},
};
use crate::workspace::{adapters::file::WORKSPACES_DIR, domain::WorkspaceName};

const TASKS_DIR: &str = "tasks";
const TASK_FILE: &str = "task.json";
const LOG_FILE: &str = "task.log";
const ARTIFACTS_DIR: &str = "artifacts";
const MAX_ARTIFACT_VERSION: u32 = 10_000;

/// Task store persisting tasks, logs and artifacts below a root directory.
#[derive(Debug, Clone)]
pub struct FileTaskStore {
    root: Arc<Dir>,
}

impl FileTaskStore {
    /// Opens (and creates, if needed) a store rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Persistence`] when the directory cannot be
    /// created or opened.
    pub fn open(root: &Utf8Path) -> TaskStoreResult<Self> {
        let dir = storage::open_root(root).map_err(TaskStoreError::persistence)?;
        Ok(Self::from_dir(Arc::new(dir)))
    }

    /// Wraps an already-open root directory.
    #[must_use]
    pub const fn from_dir(root: Arc<Dir>) -> Self {
        Self { root }
    }

    fn tasks_dir(workspace: &WorkspaceName) -> Utf8PathBuf {
        Utf8Path::new(WORKSPACES_DIR)
            .join(workspace.as_str())
            .join(TASKS_DIR)
    }

    fn task_dir(workspace: &WorkspaceName, id: TaskId) -> Utf8PathBuf {
        Self::tasks_dir(workspace).join(id.to_string())
    }

    fn record_path(workspace: &WorkspaceName, id: TaskId) -> Utf8PathBuf {
        Self::task_dir(workspace, id).join(TASK_FILE)
    }

    fn artifact_path(workspace: &WorkspaceName, id: TaskId, name: &str) -> Utf8PathBuf {
        Self::task_dir(workspace, id).join(ARTIFACTS_DIR).join(name)
    }

    fn not_found(workspace: &WorkspaceName, id: TaskId) -> TaskStoreError {
        TaskStoreError::TaskNotFound {
            workspace: workspace.clone(),
            id,
        }
    }

    fn ensure_exists(&self, workspace: &WorkspaceName, id: TaskId) -> TaskStoreResult<()> {
        if self.root.exists(Self::record_path(workspace, id)) {
            Ok(())
        } else {
            Err(Self::not_found(workspace, id))
        }
    }

    fn read_record(&self, workspace: &WorkspaceName, id: TaskId) -> TaskStoreResult<Task> {
        storage::read_json(&self.root, &Self::record_path(workspace, id)).map_err(|err| {
            if err.kind() == io::ErrorKind::NotFound {
                Self::not_found(workspace, id)
            } else {
                TaskStoreError::persistence(err)
            }
        })
    }

    fn write_record(&self, task: &Task) -> TaskStoreResult<()> {
        storage::write_json(
            &self.root,
            &Self::record_path(task.workspace(), task.id()),
            task,
        )
        .map_err(TaskStoreError::persistence)
    }
}

fn ensure_artifact_name(name: &str) -> TaskStoreResult<()> {
    if storage::is_plain_file_name(name) {
        Ok(())
    } else {
        Err(TaskStoreError::InvalidArtifactName(name.to_owned()))
    }
}

#[async_trait]
impl TaskStore for FileTaskStore {
    async fn create(&self, task: &Task) -> TaskStoreResult<()> {
        if self
            .root
            .exists(Self::record_path(task.workspace(), task.id()))
        {
            return Err(TaskStoreError::Duplicate {
                workspace: task.workspace().clone(),
                id: task.id(),
            });
        }
        self.write_record(task)
    }

    async fn get(&self, workspace: &WorkspaceName, id: TaskId) -> TaskStoreResult<Task> {
        self.read_record(workspace, id)
    }

    async fn list(&self, workspace: &WorkspaceName) -> TaskStoreResult<Vec<Task>> {
        let entries = storage::list_names(&self.root, &Self::tasks_dir(workspace))
            .map_err(TaskStoreError::persistence)?;

        let mut tasks = Vec::with_capacity(entries.len());
        for entry in entries {
            let Ok(id) = entry.parse::<TaskId>() else {
                warn!(workspace = %workspace, entry = %entry, "ignoring non-task directory");
                continue;
            };
            match self.read_record(workspace, id) {
                Ok(task) => tasks.push(task),
                Err(TaskStoreError::TaskNotFound { .. }) => {
                    warn!(workspace = %workspace, task_id = %id, "ignoring directory without task record");
                }
                Err(err) => return Err(err),
            }
        }
        tasks.sort_by(|left, right| {
            right
                .created_at()
                .cmp(&left.created_at())
                .then_with(|| right.id().cmp(&left.id()))
        });
        Ok(tasks)
    }

    async fn update(&self, task: &Task) -> TaskStoreResult<()> {
        self.ensure_exists(task.workspace(), task.id())?;
        self.write_record(task)
    }

    async fn delete(&self, workspace: &WorkspaceName, id: TaskId) -> TaskStoreResult<()> {
        self.ensure_exists(workspace, id)?;
        self.root
            .remove_dir_all(Self::task_dir(workspace, id))
            .map_err(TaskStoreError::persistence)
    }

    async fn append_log(
        &self,
        workspace: &WorkspaceName,
        id: TaskId,
        bytes: &[u8],
    ) -> TaskStoreResult<()> {
        self.ensure_exists(workspace, id)?;
        let mut options = OpenOptions::new();
        options.append(true).create(true);
        let mut file = self
            .root
            .open_with(Self::task_dir(workspace, id).join(LOG_FILE), &options)
            .map_err(TaskStoreError::persistence)?;
        file.write_all(bytes).map_err(TaskStoreError::persistence)
    }

    async fn read_log(&self, workspace: &WorkspaceName, id: TaskId) -> TaskStoreResult<Vec<u8>> {
        self.ensure_exists(workspace, id)?;
        match self.root.read(Self::task_dir(workspace, id).join(LOG_FILE)) {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(TaskStoreError::persistence(err)),
        }
    }

    async fn save_artifact(
        &self,
        workspace: &WorkspaceName,
        id: TaskId,
        name: &str,
        bytes: &[u8],
    ) -> TaskStoreResult<()> {
        ensure_artifact_name(name)?;
        self.ensure_exists(workspace, id)?;
        storage::write_atomic(&self.root, &Self::artifact_path(workspace, id, name), bytes)
            .map_err(TaskStoreError::persistence)
    }

    async fn get_artifact(
        &self,
        workspace: &WorkspaceName,
        id: TaskId,
        name: &str,
    ) -> TaskStoreResult<Vec<u8>> {
        ensure_artifact_name(name)?;
        self.ensure_exists(workspace, id)?;
        self.root
            .read(Self::artifact_path(workspace, id, name))
            .map_err(|err| {
                if err.kind() == io::ErrorKind::NotFound {
                    TaskStoreError::ArtifactNotFound {
                        id,
                        name: name.to_owned(),
                    }
                } else {
                    TaskStoreError::persistence(err)
                }
            })
    }

    async fn list_artifacts(
        &self,
        workspace: &WorkspaceName,
        id: TaskId,
    ) -> TaskStoreResult<Vec<String>> {
        self.ensure_exists(workspace, id)?;
        storage::list_names(
            &self.root,
            &Self::task_dir(workspace, id).join(ARTIFACTS_DIR),
        )
        .map_err(TaskStoreError::persistence)
    }

    async fn save_versioned_artifact(
        &self,
        workspace: &WorkspaceName,
        id: TaskId,
        name: &str,
        bytes: &[u8],
    ) -> TaskStoreResult<String> {
        ensure_artifact_name(name)?;
        self.ensure_exists(workspace, id)?;
        let artifacts = Self::task_dir(workspace, id).join(ARTIFACTS_DIR);
        self.root
            .create_dir_all(&artifacts)
            .map_err(TaskStoreError::persistence)?;

        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        // Existing versions are never overwritten.
        for version in 1..=MAX_ARTIFACT_VERSION {
            let candidate = versioned_artifact_name(name, version);
            match self.root.open_with(artifacts.join(&candidate), &options) {
                Ok(mut file) => {
                    file.write_all(bytes).map_err(TaskStoreError::persistence)?;
                    return Ok(candidate);
                }
                Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {}
                Err(err) => return Err(TaskStoreError::persistence(err)),
            }
        }
        Err(TaskStoreError::persistence(io::Error::other(format!(
            "no free version for artifact '{name}'"
        ))))
    }
}
