//! # Stepweave
//!
//! Stepweave executes multi-step tool plans produced by an AI planner. Steps
//! that look independent run concurrently, steps that say they build on
//! earlier output wait for them, and successful tool results are cached
//! in-process so repeated calls are served without re-invoking the tool.
//!
//! ## Core Components
//!
//! - **[Tool]**: a named capability invoked with JSON parameters
//! - **[ToolRegistry]**: name-keyed lookup of tools, built at startup
//! - **[ParallelEngine]**: groups steps and runs each group in parallel
//! - **[ToolCache]**: TTL cache of successful tool outputs
//! - **[Runtime]**: wires the above together from an [`EngineConfig`]
//!
//! ## Quick Start
//!
//! ```rust
//! use async_trait::async_trait;
//! use serde_json::json;
//! use std::sync::Arc;
//! use stepweave::{
//!     EngineConfig, InMemoryToolRegistry, Parameters, Plan, Runtime, Step, Tool, ToolError,
//!     ToolOutput,
//! };
//!
//! struct WeatherTool;
//!
//! #[async_trait]
//! impl Tool for WeatherTool {
//!     fn name(&self) -> &str {
//!         "get_weather"
//!     }
//!
//!     async fn execute(&self, parameters: &Parameters) -> Result<ToolOutput, ToolError> {
//!         let city = parameters.get("city").and_then(|c| c.as_str()).unwrap_or("unknown");
//!         Ok(ToolOutput::success(json!({ "city": city, "temp_c": 18 })))
//!     }
//! }
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), stepweave::RuntimeError> {
//! let registry = InMemoryToolRegistry::new().with_tool(Arc::new(WeatherTool));
//! let runtime = Runtime::new(Arc::new(registry), EngineConfig::default())?;
//!
//! let plan = Plan::new(vec![
//!     Step::new(1, "Get weather for Paris").with_tool("get_weather"),
//!     Step::new(2, "Summarize the above"),
//! ]);
//!
//! let results = runtime.execute_plan(&plan).await;
//! assert_eq!(results.len(), 2);
//! assert!(results.iter().all(|r| r.success));
//! # Ok(())
//! # }
//! ```

pub mod runtime;

// ============================================================================
// Module aliases for namespaced access
// ============================================================================

pub use stepweave_cache as cache;
pub use stepweave_core as core;
pub use stepweave_executor as executor;
pub use stepweave_observability as observability;
pub use stepweave_tools as tools;

#[cfg(feature = "testing")]
pub use stepweave_testing as testing;

// ============================================================================
// Flat re-exports of the common API
// ============================================================================

pub use runtime::{Runtime, RuntimeError};

pub use stepweave_core::{
    CachePolicy, ExecutionResult, ExecutionSummary, Parameters, Plan, PlanError, Step, Tool,
    ToolError, ToolOutput, ToolSchema,
};

pub use stepweave_cache::{CacheStats, CacheStore, InvocationCache, ToolCache, canonical_key};

pub use stepweave_tools::{InMemoryToolRegistry, ToolRegistry};

pub use stepweave_executor::{
    ConfigError, DependencyGrouper, EngineConfig, EngineConfigBuilder, ParallelEngine,
    StepExecutor, StepGroup, group_steps,
};

pub use stepweave_observability::{LogFormat, ObservabilityConfig, ObservabilityError, init_tracing};
