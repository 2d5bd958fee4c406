//! Choosing one scan hit to act on.

use super::ScanHit;
use crate::error::{Classify, ErrorClass};
use crate::interaction::{MenuOption, SelectError, Selector};
use thiserror::Error;

/// How to resolve several candidates.
#[derive(Clone, Copy)]
pub enum SelectionMode<'a> {
    /// Several candidates are an error.
    NonInteractive,
    /// Several candidates are offered through a menu.
    Interactive(&'a dyn Selector),
}

/// Errors returned by [`select_target`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TargetError {
    /// No task matched.
    #[error("no eligible tasks found")]
    NoCandidates,
    /// The named workspace has no eligible task.
    #[error("workspace '{0}' has no eligible task")]
    WorkspaceNotEligible(String),
    /// Several candidates and no way to ask.
    #[error("{count} workspaces have eligible tasks; specify a workspace")]
    AmbiguousTarget {
        /// Number of candidates.
        count: usize,
    },
    /// The user dismissed the menu.
    #[error("selection canceled")]
    MenuCanceled,
    /// The menu failed or returned an unknown value.
    #[error("selection failed: {0}")]
    Selection(String),
}

impl Classify for TargetError {
    fn class(&self) -> ErrorClass {
        match self {
            Self::NoCandidates | Self::WorkspaceNotEligible(_) => ErrorClass::NotFound,
            Self::AmbiguousTarget { .. } => ErrorClass::InvalidArgument,
            Self::MenuCanceled => ErrorClass::Cancelled,
            Self::Selection(_) => ErrorClass::Internal,
        }
    }
}

/// Picks the hit to act on.
///
/// An explicit workspace name wins; otherwise a single candidate is chosen
/// automatically and several candidates go through the menu, if allowed.
///
/// # Errors
///
/// Returns [`TargetError`] when no unambiguous choice can be made.
pub async fn select_target(
    mut hits: Vec<ScanHit>,
    workspace: Option<&str>,
    mode: SelectionMode<'_>,
) -> Result<ScanHit, TargetError> {
    if let Some(name) = workspace {
        return hits
            .into_iter()
            .find(|hit| hit.workspace.name().as_str() == name)
            .ok_or_else(|| TargetError::WorkspaceNotEligible(name.to_owned()));
    }

    match hits.len() {
        0 => Err(TargetError::NoCandidates),
        1 => Ok(hits.remove(0)),
        count => {
            let SelectionMode::Interactive(selector) = mode else {
                return Err(TargetError::AmbiguousTarget { count });
            };
            let options: Vec<MenuOption> = hits.iter().map(menu_option).collect();
            let chosen = selector
                .select("Select a workspace", &options)
                .await
                .map_err(|err| match err {
                    SelectError::Canceled => TargetError::MenuCanceled,
                    SelectError::Failed(message) => TargetError::Selection(message),
                })?;
            let index = hits
                .iter()
                .position(|hit| hit.workspace.name().as_str() == chosen)
                .ok_or_else(|| TargetError::Selection(format!("unknown workspace '{chosen}'")))?;
            Ok(hits.swap_remove(index))
        }
    }
}

fn menu_option(hit: &ScanHit) -> MenuOption {
    MenuOption::new(hit.workspace.name().as_str(), hit.workspace.name().as_str()).with_description(
        format!("{} ({})", hit.task.description(), hit.task.status()),
    )
}
