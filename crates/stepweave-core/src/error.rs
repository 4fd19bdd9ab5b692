//! Error taxonomy for plan execution.
//!
//! None of these errors escape a step: the executor turns them into a failed
//! [`ExecutionResult`](crate::ExecutionResult) for the step that raised them.

use thiserror::Error;

/// Errors raised while resolving or invoking a tool.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    /// Requested tool is not registered.
    #[error("tool '{name}' not found (available: {})", .available.join(", "))]
    NotFound {
        name: String,
        available: Vec<String>,
    },

    /// Tool broke while running.
    #[error("{message}")]
    ExecutionFailed { message: String },

    /// Parameters could not be used by the tool.
    #[error("invalid parameters for '{tool}': {reason}")]
    InvalidParameters { tool: String, reason: String },
}

impl ToolError {
    pub fn not_found(name: impl Into<String>, available: Vec<String>) -> Self {
        ToolError::NotFound {
            name: name.into(),
            available,
        }
    }

    pub fn execution_failed(message: impl Into<String>) -> Self {
        ToolError::ExecutionFailed {
            message: message.into(),
        }
    }

    pub fn invalid_parameters(tool: impl Into<String>, reason: impl Into<String>) -> Self {
        ToolError::InvalidParameters {
            tool: tool.into(),
            reason: reason.into(),
        }
    }

    /// Get the error code suitable for logging or reporting.
    pub fn error_code(&self) -> &'static str {
        match self {
            ToolError::NotFound { .. } => "TOOL_NOT_FOUND",
            ToolError::ExecutionFailed { .. } => "TOOL_EXECUTION_ERROR",
            ToolError::InvalidParameters { .. } => "INVALID_PARAMETERS",
        }
    }
}

/// Errors at the plan input boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("malformed plan: {reason}")]
    Malformed { reason: String },
}

/// Result type alias for tool operations.
pub type ToolResult<T> = Result<T, ToolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_lists_available_tools() {
        let err = ToolError::not_found(
            "get_stock",
            vec!["get_weather".to_string(), "github_search".to_string()],
        );
        assert_eq!(
            err.to_string(),
            "tool 'get_stock' not found (available: get_weather, github_search)"
        );
        assert_eq!(err.error_code(), "TOOL_NOT_FOUND");
    }

    #[test]
    fn execution_failure_displays_bare_message() {
        let err = ToolError::execution_failed("connection reset");
        assert_eq!(err.to_string(), "connection reset");
    }

    #[test]
    fn invalid_parameters_names_tool() {
        let err = ToolError::invalid_parameters("get_weather", "city must be a string");
        assert_eq!(
            err.to_string(),
            "invalid parameters for 'get_weather': city must be a string"
        );
    }
}
