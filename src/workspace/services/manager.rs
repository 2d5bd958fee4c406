//! Workspace creation and best-effort closing.

use crate::error::{Classify, ErrorClass};
use crate::workspace::{
    domain::{NewWorkspace, Workspace, WorkspaceDomainError, WorkspaceName, WorkspaceStatus},
    ports::{WorkspaceStore, WorkspaceStoreError, WorktreeError, WorktreeOps},
};
use camino::Utf8PathBuf;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument, warn};

/// Request payload for creating a workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateWorkspaceRequest {
    name: String,
    branch: String,
    worktree_path: Utf8PathBuf,
    repository: Option<String>,
}

impl CreateWorkspaceRequest {
    /// Creates a request with required fields.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        branch: impl Into<String>,
        worktree_path: impl Into<Utf8PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            branch: branch.into(),
            worktree_path: worktree_path.into(),
            repository: None,
        }
    }

    /// Records the hosted repository (`owner/repo`).
    #[must_use]
    pub fn with_repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = Some(repository.into());
        self
    }
}

/// Result of closing a workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseOutcome {
    /// The workspace was already absent or closed.
    pub already_closed: bool,
    /// Cleanup problems that did not prevent closing.
    pub warnings: Vec<String>,
}

impl CloseOutcome {
    fn already_closed(name: &WorkspaceName) -> Self {
        Self {
            already_closed: true,
            warnings: vec![format!("workspace '{name}' already closed")],
        }
    }

    /// Joins the warnings into a single human-readable message.
    #[must_use]
    pub fn summary(&self) -> Option<String> {
        if self.warnings.is_empty() {
            return None;
        }
        Some(self.warnings.join("; "))
    }
}

/// Service-level errors for workspace management.
#[derive(Debug, Error)]
pub enum WorkspaceServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] WorkspaceDomainError),
    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] WorkspaceStoreError),
    /// Creating the worktree failed.
    #[error("failed to create worktree: {0}")]
    Worktree(#[from] WorktreeError),
}

impl Classify for WorkspaceServiceError {
    fn class(&self) -> ErrorClass {
        match self {
            Self::Domain(WorkspaceDomainError::InvalidStatusTransition { .. }) => {
                ErrorClass::InvalidTransition
            }
            Self::Domain(_) => ErrorClass::InvalidArgument,
            Self::Store(err) => err.class(),
            Self::Worktree(_) => ErrorClass::External,
        }
    }
}

/// Result type for workspace service operations.
pub type WorkspaceServiceResult<T> = Result<T, WorkspaceServiceError>;

/// Workspace lifecycle orchestration.
#[derive(Clone)]
pub struct WorkspaceManager<S, G, C>
where
    S: WorkspaceStore,
    G: WorktreeOps,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    worktrees: Arc<G>,
    clock: Arc<C>,
}

impl<S, G, C> WorkspaceManager<S, G, C>
where
    S: WorkspaceStore,
    G: WorktreeOps,
    C: Clock + Send + Sync,
{
    /// Creates a new workspace manager.
    #[must_use]
    pub const fn new(store: Arc<S>, worktrees: Arc<G>, clock: Arc<C>) -> Self {
        Self {
            store,
            worktrees,
            clock,
        }
    }

    /// Returns the underlying store.
    #[must_use]
    pub const fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Creates the worktree and persists the workspace record.
    ///
    /// When persistence fails the freshly created worktree is removed again on
    /// a best-effort basis.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceServiceError`] for invalid input, duplicate names,
    /// worktree failures or persistence failures.
    #[instrument(skip_all, fields(workspace = %request.name))]
    pub async fn create(&self, request: CreateWorkspaceRequest) -> WorkspaceServiceResult<Workspace> {
        let name = WorkspaceName::new(request.name)?;
        let workspace = Workspace::new(
            NewWorkspace {
                name,
                branch: request.branch,
                worktree_path: request.worktree_path,
                repository: request.repository,
            },
            &*self.clock,
        )?;

        if let Some(path) = workspace.worktree_path() {
            self.worktrees
                .add_worktree(path, workspace.branch())
                .await?;
        }

        if let Err(err) = self.store.create(&workspace).await {
            if let Some(path) = workspace.worktree_path() {
                if let Err(cleanup) = self.worktrees.remove_worktree(path, true).await {
                    warn!(error = %cleanup, "failed to roll back worktree after store failure");
                }
            }
            return Err(err.into());
        }

        info!("workspace created");
        Ok(workspace)
    }

    /// Looks up a workspace by raw name.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceServiceError::Domain`] for an invalid name and
    /// [`WorkspaceServiceError::Store`] when the lookup fails.
    pub async fn get(&self, name: &str) -> WorkspaceServiceResult<Workspace> {
        let validated = WorkspaceName::new(name)?;
        Ok(self.store.get(&validated).await?)
    }

    /// Closes a workspace, treating cleanup failures as warnings.
    ///
    /// A workspace that no longer exists, or is already closed, is reported as
    /// already closed rather than as an error.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceServiceError::Store`] when the workspace cannot be
    /// read or the closed state cannot be persisted.
    #[instrument(skip_all, fields(workspace = %name))]
    pub async fn close(&self, name: &WorkspaceName) -> WorkspaceServiceResult<CloseOutcome> {
        let mut workspace = match self.store.get(name).await {
            Ok(workspace) => workspace,
            Err(err) if err.is_not_found() => {
                info!("workspace already removed");
                return Ok(CloseOutcome::already_closed(name));
            }
            Err(err) => return Err(err.into()),
        };
        if workspace.status() == WorkspaceStatus::Closed {
            return Ok(CloseOutcome::already_closed(name));
        }

        let mut warnings = Vec::new();
        if let Some(path) = workspace.worktree_path() {
            if let Err(err) = self.worktrees.remove_worktree(path, true).await {
                warn!(error = %err, "worktree removal failed");
                warnings.push(format!("failed to remove worktree {path}: {err}"));
            }
        }
        if let Err(err) = self.worktrees.delete_branch(workspace.branch()).await {
            warn!(error = %err, "branch removal failed");
            warnings.push(format!(
                "failed to delete branch {}: {err}",
                workspace.branch()
            ));
        }

        workspace.close(&*self.clock);
        self.store.update(&workspace).await?;
        info!(warnings = warnings.len(), "workspace closed");
        Ok(CloseOutcome {
            already_closed: false,
            warnings,
        })
    }
}
