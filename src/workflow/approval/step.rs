//! Approval step catalog.

use crate::workflow::tracker::WorkflowStep;

/// One action of an approval workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApprovalStep {
    /// Approve the pull request, falling back to a comment.
    AddPrReview,
    /// Squash-merge the pull request, falling back to an admin merge.
    MergePr,
    /// Move the task to `completed`.
    ApproveTask,
    /// Close the workspace, tolerating partial cleanup.
    CloseWorkspace,
}

impl ApprovalStep {
    /// Returns the display name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AddPrReview => "Add PR Review",
            Self::MergePr => "Merge PR",
            Self::ApproveTask => "Approve Task",
            Self::CloseWorkspace => "Close Workspace",
        }
    }
}

impl WorkflowStep for ApprovalStep {
    fn name(&self) -> &str {
        self.as_str()
    }
}

/// Approval command variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApprovalPlan {
    /// Approve the task only.
    Approve,
    /// Approve the task and close its workspace.
    ApproveAndClose,
    /// Review and merge the pull request, approve, then close.
    ApproveMergeClose,
}

impl ApprovalPlan {
    /// Returns the ordered steps for this plan.
    #[must_use]
    pub fn steps(self) -> Vec<ApprovalStep> {
        match self {
            Self::Approve => vec![ApprovalStep::ApproveTask],
            Self::ApproveAndClose => vec![ApprovalStep::ApproveTask, ApprovalStep::CloseWorkspace],
            Self::ApproveMergeClose => vec![
                ApprovalStep::AddPrReview,
                ApprovalStep::MergePr,
                ApprovalStep::ApproveTask,
                ApprovalStep::CloseWorkspace,
            ],
        }
    }
}
