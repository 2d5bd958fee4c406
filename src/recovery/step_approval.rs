//! Detection of steps paused for a user decision.

use crate::interaction::MenuOption;
use crate::task::domain::{StepResult, Task};

/// Returns the authoritative result for the task's current step.
///
/// Retries append further results for the same step, so the last matching
/// entry wins.
#[must_use]
pub fn find_current_step_result(task: &Task) -> Option<&StepResult> {
    task.current_step_result()
}

/// Returns the current step result when it is waiting for a user choice.
#[must_use]
pub fn pending_step_approval(task: &Task) -> Option<&StepResult> {
    find_current_step_result(task).filter(|result| result.needs_step_approval())
}

pub(super) fn approval_menu(result: &StepResult) -> Vec<MenuOption> {
    result
        .approval_options
        .iter()
        .map(|option| {
            let label = if option.recommended {
                format!("{} (recommended)", option.label)
            } else {
                option.label.clone()
            };
            MenuOption::new(option.key.clone(), label).with_description(option.description.clone())
        })
        .collect()
}
