//! Typed access to the open task metadata map.
//!
//! Metadata is a side channel written by several collaborators, so values may
//! arrive with different JSON shapes. Accessors reconcile those shapes once.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Well-known metadata keys.
pub mod keys {
    /// Pull request web URL.
    pub const PR_URL: &str = "pr_url";
    /// Pull request number.
    pub const PR_NUMBER: &str = "pr_number";
    /// CI run URL.
    pub const CI_URL: &str = "ci_url";
    /// GitHub Actions run URL, used when `ci_url` is absent.
    pub const GITHUB_ACTIONS_URL: &str = "github_actions_url";
    /// Classification of the last failed push.
    pub const PUSH_ERROR_TYPE: &str = "push_error_type";
    /// Linked backlog discovery identifier.
    pub const FROM_BACKLOG_ID: &str = "from_backlog_id";
    /// The user's answer to a step-level approval prompt.
    pub const STEP_APPROVAL_CHOICE: &str = "step_approval_choice";
}

/// Open string-keyed task metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskMetadata(BTreeMap<String, Value>);

impl TaskMetadata {
    /// Creates an empty metadata map.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Returns the raw value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Sets `key` to `value`, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Removes `key`, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Returns whether no entries are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over all entries in key order.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Returns a non-blank string value for `key`.
    ///
    /// Numbers are rendered as strings; other JSON types yield `None`.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::String(text) => {
                let trimmed = text.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_owned())
            }
            Value::Number(number) => Some(number.to_string()),
            _ => None,
        }
    }

    /// Returns the pull request number.
    ///
    /// Accepts JSON integers, integral floats and numeric strings. Zero,
    /// negative and fractional values are rejected.
    #[must_use]
    pub fn pr_number(&self) -> Option<u64> {
        match self.0.get(keys::PR_NUMBER)? {
            Value::Number(number) => number.as_u64().or_else(|| {
                number
                    .as_f64()
                    .filter(|value| value.fract().abs() < f64::EPSILON && *value >= 1.0 && *value <= 9.0e15)
                    .and_then(|value| format!("{value:.0}").parse().ok())
            }),
            Value::String(text) => text.trim().parse().ok(),
            _ => None,
        }
        .filter(|number| *number > 0)
    }

    /// Returns the pull request URL.
    #[must_use]
    pub fn pr_url(&self) -> Option<String> {
        self.get_str(keys::PR_URL)
    }

    /// Returns the CI URL, preferring `ci_url` over `github_actions_url`.
    #[must_use]
    pub fn ci_url(&self) -> Option<String> {
        self.get_str(keys::CI_URL)
            .or_else(|| self.get_str(keys::GITHUB_ACTIONS_URL))
    }

    /// Returns the classification of the last failed push.
    #[must_use]
    pub fn push_error_type(&self) -> Option<String> {
        self.get_str(keys::PUSH_ERROR_TYPE)
    }

    /// Returns the linked backlog discovery identifier.
    #[must_use]
    pub fn from_backlog_id(&self) -> Option<String> {
        self.get_str(keys::FROM_BACKLOG_ID)
    }

    /// Returns the user's answer to a step-level approval prompt.
    #[must_use]
    pub fn step_approval_choice(&self) -> Option<String> {
        self.get_str(keys::STEP_APPROVAL_CHOICE)
    }

    /// Records the user's answer to a step-level approval prompt.
    pub fn set_step_approval_choice(&mut self, choice: impl Into<String>) {
        self.insert(keys::STEP_APPROVAL_CHOICE, choice.into());
    }
}

impl FromIterator<(String, Value)> for TaskMetadata {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
