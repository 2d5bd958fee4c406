//! Workspace aggregate root and lifecycle status.

use super::{
    ParseWorkspaceStatusError, REPOSITORY_METADATA_KEY, WorkspaceDomainError, WorkspaceName,
};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Workspace lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkspaceStatus {
    /// Work is in progress in the worktree.
    Active,
    /// Work is suspended; the worktree is kept.
    Paused,
    /// The workspace was closed and its worktree released.
    Closed,
}

impl WorkspaceStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Closed => "closed",
        }
    }

    /// Returns whether transition to `target` is allowed.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Active, Self::Paused | Self::Closed) | (Self::Paused, Self::Active | Self::Closed)
        )
    }
}

impl fmt::Display for WorkspaceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for WorkspaceStatus {
    type Error = ParseWorkspaceStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "paused" => Ok(Self::Paused),
            "closed" => Ok(Self::Closed),
            _ => Err(ParseWorkspaceStatusError(value.to_owned())),
        }
    }
}

/// Parameter object for creating a workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWorkspace {
    /// Unique workspace name.
    pub name: WorkspaceName,
    /// Branch checked out in the worktree.
    pub branch: String,
    /// Worktree location on disk.
    pub worktree_path: Utf8PathBuf,
    /// Hosted repository in `owner/repo` form, if known.
    pub repository: Option<String>,
}

/// Workspace aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    name: WorkspaceName,
    branch: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    worktree_path: Option<Utf8PathBuf>,
    status: WorkspaceStatus,
    #[serde(default)]
    metadata: BTreeMap<String, String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Workspace {
    /// Creates an active workspace.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::EmptyBranch`] when the branch is blank.
    pub fn new(request: NewWorkspace, clock: &impl Clock) -> Result<Self, WorkspaceDomainError> {
        let branch = request.branch.trim();
        if branch.is_empty() {
            return Err(WorkspaceDomainError::EmptyBranch);
        }

        let mut metadata = BTreeMap::new();
        if let Some(repository) = request.repository {
            metadata.insert(REPOSITORY_METADATA_KEY.to_owned(), repository);
        }
        let worktree_path = Some(request.worktree_path).filter(|path| !path.as_str().is_empty());
        let timestamp = clock.utc();

        Ok(Self {
            name: request.name,
            branch: branch.to_owned(),
            worktree_path,
            status: WorkspaceStatus::Active,
            metadata,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Returns the workspace name.
    #[must_use]
    pub const fn name(&self) -> &WorkspaceName {
        &self.name
    }

    /// Returns the branch checked out in the worktree.
    #[must_use]
    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// Returns the worktree path, or `None` once the worktree was removed.
    #[must_use]
    pub fn worktree_path(&self) -> Option<&Utf8Path> {
        self.worktree_path.as_deref()
    }

    /// Returns the workspace status.
    #[must_use]
    pub const fn status(&self) -> WorkspaceStatus {
        self.status
    }

    /// Returns the open metadata map.
    #[must_use]
    pub const fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    /// Returns the hosted repository (`owner/repo`), if recorded.
    #[must_use]
    pub fn repository(&self) -> Option<&str> {
        self.metadata
            .get(REPOSITORY_METADATA_KEY)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Sets a metadata entry.
    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<String>, clock: &impl Clock) {
        self.metadata.insert(key.into(), value.into());
        self.touch(clock);
    }

    /// Changes the workspace status.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::InvalidStatusTransition`] when the
    /// change is not allowed.
    pub fn transition_to(
        &mut self,
        target: WorkspaceStatus,
        clock: &impl Clock,
    ) -> Result<(), WorkspaceDomainError> {
        if !self.status.can_transition_to(target) {
            return Err(WorkspaceDomainError::InvalidStatusTransition {
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        self.touch(clock);
        Ok(())
    }

    /// Marks the workspace closed and forgets its worktree path.
    ///
    /// Closing an already-closed workspace only refreshes `updated_at`.
    pub fn close(&mut self, clock: &impl Clock) {
        self.status = WorkspaceStatus::Closed;
        self.worktree_path = None;
        self.touch(clock);
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
