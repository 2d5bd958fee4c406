//! `gh` CLI adapter.

use crate::hosting::ports::{
    HostingClient, HostingError, HostingResult, MergeOptions, PullRequestTarget,
};
use crate::process;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, instrument};

/// stderr fragment `gh` prints when reviewing one's own pull request.
const SELF_APPROVAL_MARKER: &str = "approve your own pull request";

/// Hosting client invoking the `gh` command-line tool.
#[derive(Debug, Clone)]
pub struct GhCli {
    program: String,
}

impl GhCli {
    /// Creates an adapter invoking `gh` from `PATH`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_program("gh")
    }

    /// Creates an adapter invoking a specific binary.
    #[must_use]
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    async fn gh(&self, target: &PullRequestTarget, args: Vec<String>) -> HostingResult<()> {
        let mut full_args = args;
        if let Some(repository) = &target.repository {
            full_args.push("--repo".to_owned());
            full_args.push(repository.clone());
        }
        let borrowed: Vec<&str> = full_args.iter().map(String::as_str).collect();

        let output = process::run(&self.program, &borrowed, target.worktree.as_deref())
            .await
            .map_err(|err| HostingError::Spawn(Arc::new(err)))?;
        if output.success {
            return Ok(());
        }
        debug!(stderr = %output.stderr, "gh command failed");
        Err(classify_failure(
            process::render(&self.program, &borrowed),
            output.stderr,
        ))
    }
}

impl Default for GhCli {
    fn default() -> Self {
        Self::new()
    }
}

fn classify_failure(command: String, stderr: String) -> HostingError {
    if stderr.to_lowercase().contains(SELF_APPROVAL_MARKER) {
        return HostingError::SelfApproval;
    }
    HostingError::Command { command, stderr }
}

fn pr_args(subcommand: &str, number: u64) -> Vec<String> {
    vec!["pr".to_owned(), subcommand.to_owned(), number.to_string()]
}

#[async_trait]
impl HostingClient for GhCli {
    #[instrument(skip_all, fields(pr = target.number))]
    async fn approve_pull_request(
        &self,
        target: &PullRequestTarget,
        body: &str,
    ) -> HostingResult<()> {
        let mut args = pr_args("review", target.number);
        args.extend(["--approve".to_owned(), "--body".to_owned(), body.to_owned()]);
        self.gh(target, args).await
    }

    #[instrument(skip_all, fields(pr = target.number))]
    async fn comment_pull_request(
        &self,
        target: &PullRequestTarget,
        body: &str,
    ) -> HostingResult<()> {
        let mut args = pr_args("comment", target.number);
        args.extend(["--body".to_owned(), body.to_owned()]);
        self.gh(target, args).await
    }

    #[instrument(skip_all, fields(pr = target.number, admin = options.admin))]
    async fn merge_pull_request(
        &self,
        target: &PullRequestTarget,
        options: MergeOptions,
    ) -> HostingResult<()> {
        let mut args = pr_args("merge", target.number);
        args.push(options.method.flag().to_owned());
        if options.delete_branch {
            args.push("--delete-branch".to_owned());
        }
        if options.admin {
            args.push("--admin".to_owned());
        }
        self.gh(target, args).await
    }
}
