//! Recovery actions and the per-status menus offering them.

use crate::interaction::MenuOption;
use crate::task::domain::TaskStatus;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// An action offered to resolve a task in an error state.
///
/// Every action is either terminal (ends the recovery loop) or a view
/// (shows information and returns to the menu).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecoveryAction {
    /// Send the task back to the AI agent.
    RetryAi,
    /// Hand the worktree to the user.
    FixManually,
    /// Give up on the task.
    Abandon,
    /// Retry the GitHub push or PR step.
    RetryGh,
    /// Resume waiting for CI after a timeout.
    ContinueWaiting,
    /// Show the latest validation results.
    ViewErrors,
    /// Open the CI run in a browser.
    ViewLogs,
}

const VALIDATION_FAILED_MENU: &[RecoveryAction] = &[
    RecoveryAction::RetryAi,
    RecoveryAction::FixManually,
    RecoveryAction::ViewErrors,
    RecoveryAction::Abandon,
];

const GH_FAILED_MENU: &[RecoveryAction] = &[
    RecoveryAction::RetryGh,
    RecoveryAction::FixManually,
    RecoveryAction::ViewLogs,
    RecoveryAction::Abandon,
];

const CI_FAILED_MENU: &[RecoveryAction] = &[
    RecoveryAction::RetryAi,
    RecoveryAction::FixManually,
    RecoveryAction::ViewLogs,
    RecoveryAction::Abandon,
];

const CI_TIMEOUT_MENU: &[RecoveryAction] = &[
    RecoveryAction::ContinueWaiting,
    RecoveryAction::RetryAi,
    RecoveryAction::FixManually,
    RecoveryAction::ViewLogs,
    RecoveryAction::Abandon,
];

impl RecoveryAction {
    /// All actions.
    pub const ALL: [Self; 7] = [
        Self::RetryAi,
        Self::FixManually,
        Self::Abandon,
        Self::RetryGh,
        Self::ContinueWaiting,
        Self::ViewErrors,
        Self::ViewLogs,
    ];

    /// Returns the stable identifier used as menu value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RetryAi => "retry_ai",
            Self::FixManually => "fix_manually",
            Self::Abandon => "abandon",
            Self::RetryGh => "retry_gh",
            Self::ContinueWaiting => "continue_waiting",
            Self::ViewErrors => "view_errors",
            Self::ViewLogs => "view_logs",
        }
    }

    /// Returns the menu label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::RetryAi => "Retry with AI",
            Self::FixManually => "Fix manually",
            Self::Abandon => "Abandon task",
            Self::RetryGh => "Retry GitHub operation",
            Self::ContinueWaiting => "Continue waiting for CI",
            Self::ViewErrors => "View validation errors",
            Self::ViewLogs => "View CI logs",
        }
    }

    const fn description(self) -> &'static str {
        match self {
            Self::RetryAi => "Let the agent fix the failure and run again",
            Self::FixManually => "Print the worktree path and resume instructions",
            Self::Abandon => "Mark the task abandoned",
            Self::RetryGh => "Push and update the pull request again",
            Self::ContinueWaiting => "Keep polling the CI run",
            Self::ViewErrors => "Show the failed validation steps",
            Self::ViewLogs => "Open the CI run in a browser",
        }
    }

    /// Returns whether the action ends the recovery loop.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !self.is_view()
    }

    /// Returns whether the action only displays information.
    #[must_use]
    pub const fn is_view(self) -> bool {
        matches!(self, Self::ViewErrors | Self::ViewLogs)
    }

    /// Returns the actions offered for `status`, in menu order.
    ///
    /// Statuses outside the error set have no recovery menu.
    #[must_use]
    pub const fn menu_for(status: TaskStatus) -> &'static [Self] {
        match status {
            TaskStatus::ValidationFailed => VALIDATION_FAILED_MENU,
            TaskStatus::GhFailed => GH_FAILED_MENU,
            TaskStatus::CiFailed => CI_FAILED_MENU,
            TaskStatus::CiTimeout => CI_TIMEOUT_MENU,
            TaskStatus::Running
            | TaskStatus::AwaitingApproval
            | TaskStatus::Completed
            | TaskStatus::Abandoned => &[],
        }
    }

    /// Builds the menu entry for this action.
    #[must_use]
    pub fn menu_option(self) -> MenuOption {
        MenuOption::new(self.as_str(), self.label()).with_description(self.description())
    }
}

impl fmt::Display for RecoveryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown action identifier.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown recovery action: {0}")]
pub struct ParseRecoveryActionError(pub String);

impl FromStr for RecoveryAction {
    type Err = ParseRecoveryActionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == value)
            .ok_or_else(|| ParseRecoveryActionError(value.to_owned()))
    }
}
