//! Cross-cutting error classification.
//!
//! Each bounded context owns its own error enums. This module provides the
//! shared vocabulary the CLI boundary uses to decide how to present a failure
//! without matching on every concrete variant.

use std::fmt;
use thiserror::Error;

/// Error returned when an operation observes a cancelled token.
#[derive(Debug, Clone, Copy, Default, Error, PartialEq, Eq)]
#[error("operation cancelled")]
pub struct Cancelled;

/// Broad category of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// A task, workspace, artifact or discovery does not exist.
    NotFound,
    /// The lifecycle state machine rejected a status change.
    InvalidTransition,
    /// The caller supplied input that cannot be acted upon.
    InvalidArgument,
    /// An external process (`git`, `gh`, opener) failed.
    External,
    /// The operation was cancelled cooperatively.
    Cancelled,
    /// Any other internal failure, typically persistence.
    Internal,
}

impl ErrorClass {
    /// Returns the canonical lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::InvalidTransition => "invalid_transition",
            Self::InvalidArgument => "invalid_argument",
            Self::External => "external",
            Self::Cancelled => "cancelled",
            Self::Internal => "internal",
        }
    }

    /// Returns whether the failure stems from user input rather than the
    /// system itself.
    #[must_use]
    pub const fn is_user_error(self) -> bool {
        matches!(self, Self::InvalidTransition | Self::InvalidArgument)
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies an error into an [`ErrorClass`].
pub trait Classify {
    /// Returns the broad category of this error.
    fn class(&self) -> ErrorClass;
}

impl Classify for Cancelled {
    fn class(&self) -> ErrorClass {
        ErrorClass::Cancelled
    }
}
