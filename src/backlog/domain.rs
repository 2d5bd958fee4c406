//! Backlog discovery records.

use crate::storage;
use crate::task::domain::TaskId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors returned while constructing or mutating discoveries.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BacklogDomainError {
    /// The identifier is empty or not usable as a file name.
    #[error("invalid discovery identifier: '{0}'")]
    InvalidId(String),
    /// The title is empty after trimming.
    #[error("discovery title must not be empty")]
    EmptyTitle,
    /// A dismissed discovery cannot be completed.
    #[error("discovery {0} was dismissed")]
    Dismissed(DiscoveryId),
}

/// Identifier of a backlog discovery.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DiscoveryId(String);

impl DiscoveryId {
    /// Creates a validated identifier.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogDomainError::InvalidId`] unless the value is a plain
    /// file name.
    pub fn new(value: impl Into<String>) -> Result<Self, BacklogDomainError> {
        let raw = value.into();
        if !storage::is_plain_file_name(&raw) {
            return Err(BacklogDomainError::InvalidId(raw));
        }
        Ok(Self(raw))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DiscoveryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for DiscoveryId {
    type Error = BacklogDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DiscoveryId> for String {
    fn from(value: DiscoveryId) -> Self {
        value.0
    }
}

/// Discovery lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveryStatus {
    /// Not yet acted upon.
    Pending,
    /// Resolved by a completed task.
    Completed,
    /// Rejected without action.
    Dismissed,
}

/// Something noticed during earlier work and parked for later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discovery {
    id: DiscoveryId,
    title: String,
    status: DiscoveryStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    completed_by: Option<TaskId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Discovery {
    /// Creates a pending discovery.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogDomainError::EmptyTitle`] for a blank title.
    pub fn new(
        id: DiscoveryId,
        title: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<Self, BacklogDomainError> {
        let raw = title.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(BacklogDomainError::EmptyTitle);
        }
        let timestamp = clock.utc();
        Ok(Self {
            id,
            title: trimmed.to_owned(),
            status: DiscoveryStatus::Pending,
            completed_by: None,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Returns the identifier.
    #[must_use]
    pub const fn id(&self) -> &DiscoveryId {
        &self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> DiscoveryStatus {
        self.status
    }

    /// Returns the task that completed this discovery.
    #[must_use]
    pub const fn completed_by(&self) -> Option<TaskId> {
        self.completed_by
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Marks the discovery completed by `task`.
    ///
    /// Returns `false` when it was already completed; the record is then left
    /// as is.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogDomainError::Dismissed`] for a dismissed discovery.
    pub fn complete(&mut self, task: TaskId, at: DateTime<Utc>) -> Result<bool, BacklogDomainError> {
        match self.status {
            DiscoveryStatus::Completed => Ok(false),
            DiscoveryStatus::Dismissed => Err(BacklogDomainError::Dismissed(self.id.clone())),
            DiscoveryStatus::Pending => {
                self.status = DiscoveryStatus::Completed;
                self.completed_by = Some(task);
                self.updated_at = at;
                Ok(true)
            }
        }
    }

    /// Dismisses a pending discovery. Completed discoveries stay completed.
    pub fn dismiss(&mut self, clock: &impl Clock) {
        if self.status == DiscoveryStatus::Pending {
            self.status = DiscoveryStatus::Dismissed;
            self.updated_at = clock.utc();
        }
    }
}
