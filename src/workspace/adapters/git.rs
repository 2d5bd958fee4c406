//! Git subprocess adapter for worktree management.

use crate::process;
use crate::workspace::ports::{WorktreeError, WorktreeOps, WorktreeResult};
use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, instrument};

/// Worktree adapter invoking `git -C <repository_root> ...`.
#[derive(Debug, Clone)]
pub struct GitWorktrees {
    repository_root: Utf8PathBuf,
}

impl GitWorktrees {
    /// Creates an adapter operating on the repository at `repository_root`.
    #[must_use]
    pub fn new(repository_root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            repository_root: repository_root.into(),
        }
    }

    /// Returns the repository root.
    #[must_use]
    pub fn repository_root(&self) -> &Utf8Path {
        &self.repository_root
    }

    async fn git(&self, args: &[&str]) -> WorktreeResult<()> {
        let mut full_args = vec!["-C", self.repository_root.as_str()];
        full_args.extend_from_slice(args);

        let output = process::run("git", &full_args, None)
            .await
            .map_err(WorktreeError::spawn)?;
        if output.success {
            return Ok(());
        }
        Err(WorktreeError::Command {
            command: process::render("git", args),
            stderr: output.stderr,
        })
    }
}

#[async_trait]
impl WorktreeOps for GitWorktrees {
    #[instrument(skip_all, fields(path = %path, branch = %branch))]
    async fn add_worktree(&self, path: &Utf8Path, branch: &str) -> WorktreeResult<()> {
        debug!("adding worktree");
        self.git(&["worktree", "add", "-b", branch, path.as_str()])
            .await
    }

    #[instrument(skip_all, fields(path = %path, force = force))]
    async fn remove_worktree(&self, path: &Utf8Path, force: bool) -> WorktreeResult<()> {
        debug!("removing worktree");
        let mut args = vec!["worktree", "remove"];
        if force {
            args.push("--force");
        }
        args.push(path.as_str());
        self.git(&args).await
    }

    #[instrument(skip_all, fields(branch = %branch))]
    async fn delete_branch(&self, branch: &str) -> WorktreeResult<()> {
        debug!("deleting branch");
        self.git(&["branch", "-D", branch]).await
    }
}
