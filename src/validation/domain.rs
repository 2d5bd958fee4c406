//! Validation pipeline results.

use serde::{Deserialize, Serialize};

/// Artifact name under which pipeline results are stored.
pub const VALIDATION_ARTIFACT: &str = "validation.json";

/// Outcome of one pipeline command (lint, test, build, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationStepResult {
    /// Step name.
    pub name: String,
    /// Whether the command succeeded.
    pub success: bool,
    /// Combined command output.
    #[serde(default)]
    pub output: String,
    /// Wall-clock duration in milliseconds.
    #[serde(default)]
    pub duration_ms: u64,
}

/// Result of a full pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineResult {
    /// Whether every step succeeded.
    pub success: bool,
    /// Per-step results in execution order.
    #[serde(default)]
    pub steps: Vec<ValidationStepResult>,
}

impl PipelineResult {
    /// Builds a result whose `success` flag is derived from `steps`.
    #[must_use]
    pub fn from_steps(steps: Vec<ValidationStepResult>) -> Self {
        let success = steps.iter().all(|step| step.success);
        Self { success, steps }
    }

    /// Returns the failed steps.
    #[must_use]
    pub fn failed_steps(&self) -> impl Iterator<Item = &ValidationStepResult> {
        self.steps.iter().filter(|step| !step.success)
    }

    /// Returns a one-line summary.
    #[must_use]
    pub fn summary(&self) -> String {
        let failed: Vec<&str> = self.failed_steps().map(|step| step.name.as_str()).collect();
        if failed.is_empty() {
            format!("validation passed ({} steps)", self.steps.len())
        } else {
            format!("validation failed: {}", failed.join(", "))
        }
    }
}
