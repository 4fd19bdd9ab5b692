//! # Stepweave Executor
//!
//! Turns a [`Plan`](stepweave_core::Plan) into per-step
//! [`ExecutionResult`](stepweave_core::ExecutionResult)s:
//!
//! 1. [`DependencyGrouper`] splits the steps into ordered groups
//! 2. [`ParallelEngine`] runs the groups in order, forking each multi-step
//!    group into one task per step
//! 3. [`StepExecutor`] resolves the tool, consults the cache and folds every
//!    failure mode into the step's result

pub mod config;
pub mod engine;
pub mod grouping;
pub mod step;

pub use config::{
    ConfigError, DEFAULT_CACHE_TTL_SECS, EngineConfig, EngineConfigBuilder, MAX_CACHE_TTL_SECS,
};
pub use engine::ParallelEngine;
pub use grouping::{DEFAULT_DEPENDENCY_KEYWORDS, DependencyGrouper, StepGroup, group_steps};
pub use step::StepExecutor;
