//! Validated workspace name.

use super::WorkspaceDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length of a workspace name.
const MAX_NAME_LENGTH: usize = 128;

/// Unique workspace identifier, also used as the worktree directory key.
///
/// # Examples
///
///     use atelier::workspace::domain::WorkspaceName;
///
///     let name = WorkspaceName::new("fix-login-bug").expect("valid");
///     assert_eq!(name.as_str(), "fix-login-bug");
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WorkspaceName(String);

impl WorkspaceName {
    /// Creates a validated workspace name.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError`] when the value is empty, too long, or
    /// unusable as a single path component.
    pub fn new(value: impl Into<String>) -> Result<Self, WorkspaceDomainError> {
        let raw = value.into();
        let normalized = raw.trim();

        if normalized.is_empty() {
            return Err(WorkspaceDomainError::EmptyName);
        }
        if normalized.chars().count() > MAX_NAME_LENGTH {
            return Err(WorkspaceDomainError::NameTooLong(raw));
        }
        let is_dot_path = normalized == "." || normalized == "..";
        let has_forbidden_char = normalized
            .chars()
            .any(|ch| ch == '/' || ch == '\\' || ch.is_whitespace() || ch.is_control());
        if is_dot_path || has_forbidden_char {
            return Err(WorkspaceDomainError::InvalidName(raw));
        }

        Ok(Self(normalized.to_owned()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for WorkspaceName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for WorkspaceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for WorkspaceName {
    type Error = WorkspaceDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for WorkspaceName {
    type Error = WorkspaceDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<WorkspaceName> for String {
    fn from(value: WorkspaceName) -> Self {
        value.0
    }
}
