//! # Stepweave Tools
//!
//! Name-keyed tool registries. Tool implementations themselves (weather,
//! code search, news, ...) live with the application; this crate only maps
//! identifiers to [`Tool`](stepweave_core::Tool) objects and publishes their
//! schemas to the planner.

/// Tool registry implementations for managing collections of tools.
pub mod registry;

pub use registry::{InMemoryToolRegistry, ToolRegistry};
pub use stepweave_core::{CachePolicy, Tool, ToolError, ToolOutput, ToolSchema};
