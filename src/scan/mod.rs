//! Discovery scans over every workspace and the target selection built on
//! them.
//!
//! Scans are sequential and cooperatively cancellable. They yield at most one
//! task per workspace: the first task in store order matching the predicate.

mod scanner;
mod target;

pub use scanner::{ScanError, ScanHit, TaskScanner};
pub use target::{SelectionMode, TargetError, select_target};
