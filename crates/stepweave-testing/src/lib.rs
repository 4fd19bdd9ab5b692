//! # Stepweave Testing
//!
//! Test utilities for code built on the stepweave runtime.
//!
//! - **Mock Tools**: canned outputs with call tracking ([`MockTool`]), plus
//!   tools that error ([`ErrorTool`]), panic ([`PanicTool`]) or sleep
//!   ([`SlowTool`])
//! - **Concurrency probing**: [`ConcurrencyProbe`] measures how many tool
//!   executions overlapped
//! - **Plans**: [`PlanBuilder`] for numbered test plans
//!
//! ## Usage
//!
//! ```rust
//! use serde_json::json;
//! use stepweave_testing::{MockToolRegistry, PlanBuilder};
//!
//! let registry = MockToolRegistry::new().with_mock_tools();
//! let plan = PlanBuilder::new()
//!     .tool_step("Get weather", "get_weather", json!({"city": "Paris"}))
//!     .build();
//!
//! assert_eq!(registry.get_mock_tool("get_weather").unwrap().call_count(), 0);
//! assert_eq!(plan.len(), 1);
//! ```

/// Mock tools for predictable testing
pub mod mock_tools;
/// Plan construction helpers
pub mod plan_builder;

pub use mock_tools::{
    ConcurrencyProbe, ErrorTool, MockTool, MockToolRegistry, PanicTool, ProbeGuard, SlowTool,
};
pub use plan_builder::PlanBuilder;
