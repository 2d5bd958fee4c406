//! Task lifecycle status and its transition table.

use super::ParseTaskStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// The AI agent is working through the plan.
    Running,
    /// Local validation (lint, test, build) failed.
    ValidationFailed,
    /// A GitHub operation (push, PR creation) failed.
    GhFailed,
    /// Remote CI reported a failure.
    CiFailed,
    /// Remote CI did not finish in time.
    CiTimeout,
    /// Work is done and waits for a human decision.
    AwaitingApproval,
    /// The task was approved.
    Completed,
    /// The task was given up.
    Abandoned,
}

impl TaskStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 8] = [
        Self::Running,
        Self::ValidationFailed,
        Self::GhFailed,
        Self::CiFailed,
        Self::CiTimeout,
        Self::AwaitingApproval,
        Self::Completed,
        Self::Abandoned,
    ];

    /// Statuses eligible for recovery.
    pub const ERROR_STATES: [Self; 4] = [
        Self::ValidationFailed,
        Self::GhFailed,
        Self::CiFailed,
        Self::CiTimeout,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::ValidationFailed => "validation_failed",
            Self::GhFailed => "gh_failed",
            Self::CiFailed => "ci_failed",
            Self::CiTimeout => "ci_timeout",
            Self::AwaitingApproval => "awaiting_approval",
            Self::Completed => "completed",
            Self::Abandoned => "abandoned",
        }
    }

    /// Returns whether no further transition is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Abandoned)
    }

    /// Returns whether the status belongs to the recoverable error set.
    #[must_use]
    pub const fn is_error(self) -> bool {
        matches!(
            self,
            Self::ValidationFailed | Self::GhFailed | Self::CiFailed | Self::CiTimeout
        )
    }

    /// Returns whether transition to `target` is allowed.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        match self {
            Self::Running => matches!(
                target,
                Self::ValidationFailed
                    | Self::GhFailed
                    | Self::CiFailed
                    | Self::CiTimeout
                    | Self::AwaitingApproval
                    | Self::Abandoned
            ),
            Self::ValidationFailed | Self::GhFailed | Self::CiFailed | Self::CiTimeout => {
                matches!(target, Self::Running | Self::Abandoned)
            }
            Self::AwaitingApproval => {
                matches!(target, Self::Completed | Self::Running | Self::Abandoned)
            }
            Self::Completed | Self::Abandoned => false,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| ParseTaskStatusError(value.to_owned()))
    }
}
