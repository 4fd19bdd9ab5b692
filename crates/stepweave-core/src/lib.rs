//! # Stepweave Core
//!
//! Core types and traits shared by the stepweave crates: the plan data model,
//! the tool capability boundary and the error taxonomy.

pub mod error;
pub mod plan;
pub mod result;
pub mod tool;

pub use error::{PlanError, ToolError, ToolResult};
pub use plan::{NULL_TOOL_TOKEN, Parameters, Plan, Step};
pub use result::{ExecutionResult, ExecutionSummary, NO_TOOL_MESSAGE, UNKNOWN_ERROR};
pub use tool::{CachePolicy, Tool, ToolOutput, ToolSchema};
