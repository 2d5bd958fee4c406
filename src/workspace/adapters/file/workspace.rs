//! File-backed workspace store.
//!
//! Layout: `<root>/workspaces/<name>/workspace.json`. Task records live next to
//! the workspace record under `<root>/workspaces/<name>/tasks/`.

use crate::storage;
use crate::workspace::{
    domain::{Workspace, WorkspaceName},
    ports::{WorkspaceStore, WorkspaceStoreError, WorkspaceStoreResult},
};
use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::fs_utf8::Dir;
use std::io;
use std::sync::Arc;
use tracing::warn;

/// Directory holding one subdirectory per workspace.
pub(crate) const WORKSPACES_DIR: &str = "workspaces";
const WORKSPACE_FILE: &str = "workspace.json";

/// Workspace store persisting one JSON record per workspace.
#[derive(Debug, Clone)]
pub struct FileWorkspaceStore {
    root: Arc<Dir>,
}

impl FileWorkspaceStore {
    /// Opens (and creates, if needed) a store rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceStoreError::Persistence`] when the directory cannot
    /// be created or opened.
    pub fn open(root: &Utf8Path) -> WorkspaceStoreResult<Self> {
        let dir = storage::open_root(root).map_err(WorkspaceStoreError::persistence)?;
        Ok(Self::from_dir(Arc::new(dir)))
    }

    /// Wraps an already-open root directory.
    #[must_use]
    pub const fn from_dir(root: Arc<Dir>) -> Self {
        Self { root }
    }

    fn record_path(name: &WorkspaceName) -> Utf8PathBuf {
        Utf8Path::new(WORKSPACES_DIR)
            .join(name.as_str())
            .join(WORKSPACE_FILE)
    }

    fn read_record(&self, name: &WorkspaceName) -> WorkspaceStoreResult<Workspace> {
        storage::read_json(&self.root, &Self::record_path(name)).map_err(|err| {
            if err.kind() == io::ErrorKind::NotFound {
                WorkspaceStoreError::NotFound(name.clone())
            } else {
                WorkspaceStoreError::persistence(err)
            }
        })
    }

    fn write_record(&self, workspace: &Workspace) -> WorkspaceStoreResult<()> {
        storage::write_json(&self.root, &Self::record_path(workspace.name()), workspace)
            .map_err(WorkspaceStoreError::persistence)
    }

    fn exists(&self, name: &WorkspaceName) -> bool {
        self.root.exists(Self::record_path(name))
    }
}

#[async_trait]
impl WorkspaceStore for FileWorkspaceStore {
    async fn list(&self) -> WorkspaceStoreResult<Vec<Workspace>> {
        let names = storage::list_names(&self.root, Utf8Path::new(WORKSPACES_DIR))
            .map_err(WorkspaceStoreError::persistence)?;

        let mut workspaces = Vec::with_capacity(names.len());
        for raw_name in names {
            let Ok(name) = WorkspaceName::new(raw_name.as_str()) else {
                warn!(entry = %raw_name, "ignoring directory with invalid workspace name");
                continue;
            };
            match storage::read_json(&self.root, &Self::record_path(&name)) {
                Ok(workspace) => workspaces.push(workspace),
                Err(err) if err.kind() == io::ErrorKind::NotFound => {
                    warn!(workspace = %name, "ignoring directory without workspace record");
                }
                Err(err) if err.kind() == io::ErrorKind::InvalidData => {
                    warn!(workspace = %name, error = %err, "ignoring corrupt workspace record");
                }
                Err(err) => return Err(WorkspaceStoreError::persistence(err)),
            }
        }
        Ok(workspaces)
    }

    async fn get(&self, name: &WorkspaceName) -> WorkspaceStoreResult<Workspace> {
        self.read_record(name)
    }

    async fn create(&self, workspace: &Workspace) -> WorkspaceStoreResult<()> {
        if self.exists(workspace.name()) {
            return Err(WorkspaceStoreError::Duplicate(workspace.name().clone()));
        }
        self.write_record(workspace)
    }

    async fn update(&self, workspace: &Workspace) -> WorkspaceStoreResult<()> {
        if !self.exists(workspace.name()) {
            return Err(WorkspaceStoreError::NotFound(workspace.name().clone()));
        }
        self.write_record(workspace)
    }

    async fn delete(&self, name: &WorkspaceName) -> WorkspaceStoreResult<()> {
        if !self.exists(name) {
            return Err(WorkspaceStoreError::NotFound(name.clone()));
        }
        self.root
            .remove_dir_all(Utf8Path::new(WORKSPACES_DIR).join(name.as_str()))
            .map_err(WorkspaceStoreError::persistence)
    }
}
