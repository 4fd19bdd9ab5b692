//! Per-step execution results.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::plan::Step;

/// Message reported for steps that need no tool.
pub const NO_TOOL_MESSAGE: &str = "no tool execution needed";

/// Error text used when a failing tool gives no message.
pub const UNKNOWN_ERROR: &str = "unknown error";

/// Result of executing one step.
///
/// Exactly one is produced per input step, successful or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub step_number: Option<i64>,
    pub description: String,
    /// Tool identifier exactly as the step named it.
    pub tool_used: Option<String>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// `Some(true)` when the tool result was served from cache.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_cache: Option<bool>,
}

impl ExecutionResult {
    fn for_step(step: &Step, success: bool) -> Self {
        Self {
            step_number: step.step_number,
            description: step.description.clone(),
            tool_used: step.tool.clone(),
            success,
            data: None,
            error: None,
            from_cache: None,
        }
    }

    /// Successful result carrying tool data.
    pub fn succeeded(step: &Step, data: Option<Value>) -> Self {
        Self {
            data,
            ..Self::for_step(step, true)
        }
    }

    /// Failed result with an error message.
    pub fn failed(step: &Step, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::for_step(step, false)
        }
    }

    /// Acknowledgement for a step without a tool.
    pub fn no_tool(step: &Step) -> Self {
        Self::succeeded(step, Some(json!({ "message": NO_TOOL_MESSAGE })))
    }

    /// Mark the result as served from cache.
    pub fn cached(mut self) -> Self {
        self.from_cache = Some(true);
        self
    }

    pub fn is_from_cache(&self) -> bool {
        self.from_cache == Some(true)
    }

    /// Ordering key; missing step numbers sort as `0`.
    pub fn sort_key(&self) -> i64 {
        self.step_number.unwrap_or(0)
    }
}

/// Aggregate counts over a run, for display by collaborators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub served_from_cache: usize,
}

impl ExecutionSummary {
    pub fn from_results(results: &[ExecutionResult]) -> Self {
        results.iter().fold(Self::default(), |mut summary, result| {
            summary.total += 1;
            if result.success {
                summary.succeeded += 1;
            } else {
                summary.failed += 1;
            }
            if result.is_from_cache() {
                summary.served_from_cache += 1;
            }
            summary
        })
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}
