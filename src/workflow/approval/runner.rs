//! Executes approval steps, applying each step's fallback policy.

use super::step::ApprovalStep;
use crate::backlog::{BacklogStore, DiscoveryId};
use crate::error::{Classify, ErrorClass};
use crate::hosting::{HostingClient, HostingError, MergeOptions, PullRequestTarget};
use crate::task::{
    domain::{Task, TaskStatus},
    ports::TaskStore,
    services::{TaskLifecycleError, TaskLifecycleService},
};
use crate::workflow::tracker::StepRunner;
use crate::workspace::{
    domain::Workspace,
    ports::{WorkspaceStore, WorktreeOps},
    services::{WorkspaceManager, WorkspaceServiceError},
};
use async_trait::async_trait;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Default body for review approvals and fallback comments.
pub const DEFAULT_REVIEW_BODY: &str = "Approved via atelier";

/// State shared by the steps of one approval run.
#[derive(Debug, Clone)]
pub struct ApprovalContext {
    /// Workspace owning the task.
    pub workspace: Workspace,
    /// Task being approved; updated in place by `Approve Task`.
    pub task: Task,
    /// Cancellation for status changes.
    pub cancel: CancellationToken,
}

/// Errors returned by approval steps.
#[derive(Debug, Error)]
pub enum ApprovalStepError {
    /// The task metadata carries no usable pull request number.
    #[error("task has no pull request number")]
    MissingPullRequest,
    /// Both the review and the fallback comment failed.
    #[error("review failed ({review}); comment fallback failed ({comment})")]
    Review {
        /// Review error.
        review: Box<HostingError>,
        /// Comment error.
        comment: Box<HostingError>,
    },
    /// Both the squash merge and the admin merge failed.
    #[error("merge failed ({merge}); admin merge failed ({admin})")]
    Merge {
        /// Squash merge error.
        merge: Box<HostingError>,
        /// Admin merge error.
        admin: Box<HostingError>,
    },
    /// The task could not be completed.
    #[error(transparent)]
    Lifecycle(#[from] TaskLifecycleError),
    /// The workspace could not be closed.
    #[error(transparent)]
    Workspace(#[from] WorkspaceServiceError),
}

impl Classify for ApprovalStepError {
    fn class(&self) -> ErrorClass {
        match self {
            Self::MissingPullRequest => ErrorClass::InvalidArgument,
            Self::Review { .. } | Self::Merge { .. } => ErrorClass::External,
            Self::Lifecycle(err) => err.class(),
            Self::Workspace(err) => err.class(),
        }
    }
}

/// Runs [`ApprovalStep`]s against live collaborators.
pub struct ApprovalRunner<T, W, G, H, B, C>
where
    T: TaskStore,
    W: WorkspaceStore,
    G: WorktreeOps,
    H: HostingClient,
    B: BacklogStore,
    C: Clock + Send + Sync,
{
    lifecycle: TaskLifecycleService<T, C>,
    workspaces: WorkspaceManager<W, G, C>,
    hosting: Arc<H>,
    backlog: Arc<B>,
    clock: Arc<C>,
    review_body: String,
}

impl<T, W, G, H, B, C> ApprovalRunner<T, W, G, H, B, C>
where
    T: TaskStore,
    W: WorkspaceStore,
    G: WorktreeOps,
    H: HostingClient,
    B: BacklogStore,
    C: Clock + Send + Sync,
{
    /// Creates a runner using [`DEFAULT_REVIEW_BODY`].
    #[must_use]
    pub fn new(
        lifecycle: TaskLifecycleService<T, C>,
        workspaces: WorkspaceManager<W, G, C>,
        hosting: Arc<H>,
        backlog: Arc<B>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            lifecycle,
            workspaces,
            hosting,
            backlog,
            clock,
            review_body: DEFAULT_REVIEW_BODY.to_owned(),
        }
    }

    /// Overrides the review and comment body.
    #[must_use]
    pub fn with_review_body(mut self, body: impl Into<String>) -> Self {
        self.review_body = body.into();
        self
    }

    fn pull_request(ctx: &ApprovalContext) -> Result<PullRequestTarget, ApprovalStepError> {
        let number = ctx
            .task
            .metadata()
            .pr_number()
            .ok_or(ApprovalStepError::MissingPullRequest)?;
        let mut target = PullRequestTarget::new(number);
        if let Some(path) = ctx.workspace.worktree_path() {
            target = target.in_worktree(path);
        }
        if let Some(repository) = ctx.workspace.repository() {
            target = target.in_repository(repository);
        }
        Ok(target)
    }

    async fn add_review(&self, ctx: &ApprovalContext) -> Result<String, ApprovalStepError> {
        let target = Self::pull_request(ctx)?;
        let number = target.number;
        let review = match self
            .hosting
            .approve_pull_request(&target, &self.review_body)
            .await
        {
            Ok(()) => return Ok(format!("approved PR #{number}")),
            Err(err) => err,
        };

        let is_self_owned = matches!(review, HostingError::SelfApproval);
        if !is_self_owned {
            warn!(pr = number, error = %review, "review failed, trying comment");
        }
        match self
            .hosting
            .comment_pull_request(&target, &self.review_body)
            .await
        {
            Ok(()) if is_self_owned => Ok(format!(
                "cannot approve own PR; commented on PR #{number} instead"
            )),
            Ok(()) => Ok(format!(
                "review failed ({review}); commented on PR #{number} instead"
            )),
            Err(comment) => Err(ApprovalStepError::Review {
                review: Box::new(review),
                comment: Box::new(comment),
            }),
        }
    }

    async fn merge(&self, ctx: &ApprovalContext) -> Result<String, ApprovalStepError> {
        let target = Self::pull_request(ctx)?;
        let number = target.number;
        let options = MergeOptions::squash();
        let merge = match self.hosting.merge_pull_request(&target, options).await {
            Ok(()) => return Ok(format!("merged PR #{number}")),
            Err(err) => err,
        };

        warn!(pr = number, error = %merge, "merge failed, retrying with admin bypass");
        self.hosting
            .merge_pull_request(&target, options.with_admin())
            .await
            .map(|()| format!("merged PR #{number} with admin bypass"))
            .map_err(|admin| ApprovalStepError::Merge {
                merge: Box::new(merge),
                admin: Box::new(admin),
            })
    }

    async fn approve_task(&self, ctx: &mut ApprovalContext) -> Result<String, ApprovalStepError> {
        self.lifecycle
            .transition(&ctx.cancel, &mut ctx.task, TaskStatus::Completed, "User approved")
            .await?;
        if let Err(err) = self.lifecycle.append_log(&ctx.task, "approval: task approved").await {
            warn!(error = %err, "failed to append approval to task log");
        }
        self.complete_linked_discovery(&ctx.task).await;
        info!(task_id = %ctx.task.id(), "task approved");
        Ok("task completed".to_owned())
    }

    async fn complete_linked_discovery(&self, task: &Task) {
        let Some(raw) = task.metadata().from_backlog_id() else {
            return;
        };
        let id = match DiscoveryId::new(raw) {
            Ok(id) => id,
            Err(err) => {
                warn!(error = %err, "ignoring invalid linked discovery id");
                return;
            }
        };
        match self.backlog.complete(&id, task.id(), self.clock.utc()).await {
            Ok(_) => info!(discovery = %id, "linked discovery completed"),
            Err(err) => warn!(discovery = %id, error = %err, "failed to complete linked discovery"),
        }
    }

    async fn close_workspace(&self, ctx: &ApprovalContext) -> Result<String, ApprovalStepError> {
        let outcome = self.workspaces.close(ctx.workspace.name()).await?;
        let message = match outcome.summary() {
            Some(warnings) if outcome.already_closed => warnings,
            Some(warnings) => format!("workspace closed with warnings: {warnings}"),
            None => "workspace closed".to_owned(),
        };
        Ok(message)
    }
}

#[async_trait]
impl<T, W, G, H, B, C> StepRunner for ApprovalRunner<T, W, G, H, B, C>
where
    T: TaskStore,
    W: WorkspaceStore,
    G: WorktreeOps,
    H: HostingClient,
    B: BacklogStore,
    C: Clock + Send + Sync,
{
    type Step = ApprovalStep;
    type Context = ApprovalContext;
    type Error = ApprovalStepError;

    async fn run(
        &self,
        step: &ApprovalStep,
        ctx: &mut ApprovalContext,
    ) -> Result<Option<String>, ApprovalStepError> {
        let message = match step {
            ApprovalStep::AddPrReview => self.add_review(ctx).await?,
            ApprovalStep::MergePr => self.merge(ctx).await?,
            ApprovalStep::ApproveTask => self.approve_task(ctx).await?,
            ApprovalStep::CloseWorkspace => self.close_workspace(ctx).await?,
        };
        Ok(Some(message))
    }
}
