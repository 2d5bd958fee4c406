//! Interactive selection contract.

use async_trait::async_trait;
use thiserror::Error;

/// One entry of a selection menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuOption {
    /// Value returned when the option is chosen.
    pub value: String,
    /// Short label.
    pub label: String,
    /// Optional longer explanation.
    pub description: String,
}

impl MenuOption {
    /// Creates an option without a description.
    #[must_use]
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            description: String::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Errors returned by [`Selector`] implementations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SelectError {
    /// The user dismissed the menu.
    #[error("menu canceled")]
    Canceled,
    /// The prompt could not be shown or read.
    #[error("selection failed: {0}")]
    Failed(String),
}

/// Presents a menu and returns the chosen option's value.
#[async_trait]
pub trait Selector: Send + Sync {
    /// Asks the user to pick one of `options`.
    ///
    /// # Errors
    ///
    /// Returns [`SelectError::Canceled`] when the user backs out.
    async fn select(&self, prompt: &str, options: &[MenuOption]) -> Result<String, SelectError>;
}
