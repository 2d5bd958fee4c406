//! Stable process exit codes for the command-line boundary.

use crate::error::{Classify, ErrorClass};

/// Command succeeded.
pub const OK: i32 = 0;
/// Command failed for an internal or external reason.
pub const FAILURE: i32 = 1;
/// Command was rejected because of an invalid transition or argument.
pub const INVALID_INPUT: i32 = 2;
/// Command was interrupted.
pub const CANCELLED: i32 = 130;

/// Maps an error class to its exit code.
#[must_use]
pub const fn for_class(class: ErrorClass) -> i32 {
    match class {
        ErrorClass::InvalidTransition | ErrorClass::InvalidArgument => INVALID_INPUT,
        ErrorClass::Cancelled => CANCELLED,
        ErrorClass::NotFound | ErrorClass::External | ErrorClass::Internal => FAILURE,
    }
}

/// Maps any classified error to its exit code.
#[must_use]
pub fn for_error(error: &impl Classify) -> i32 {
    for_class(error.class())
}
