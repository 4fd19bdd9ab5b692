//! Single-step execution.
//!
//! Every outcome of running a step, including a missing tool, a tool error
//! and a tool panic, is folded into an [`ExecutionResult`]. Nothing escapes.

use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use stepweave_cache::{CachedCall, InvocationCache, ToolCache};
use stepweave_core::{
    ExecutionResult, Parameters, Step, Tool, ToolError, ToolOutput, UNKNOWN_ERROR,
};
use stepweave_tools::ToolRegistry;

use crate::config::EngineConfig;

/// Runs one step against the registry, consulting the cache when the tool
/// allows it.
pub struct StepExecutor {
    registry: Arc<dyn ToolRegistry>,
    cache: InvocationCache,
    cache_enabled: bool,
    default_ttl: Duration,
}

impl StepExecutor {
    pub fn new(
        registry: Arc<dyn ToolRegistry>,
        cache: Arc<ToolCache>,
        config: &EngineConfig,
    ) -> Self {
        Self {
            registry,
            cache: InvocationCache::new(cache),
            cache_enabled: config.cache_enabled,
            default_ttl: config.default_cache_ttl(),
        }
    }

    pub fn registry(&self) -> &Arc<dyn ToolRegistry> {
        &self.registry
    }

    pub fn cache(&self) -> &Arc<ToolCache> {
        self.cache.store()
    }

    /// Execute `step`, always producing a result.
    pub async fn execute_step(&self, step: &Step) -> ExecutionResult {
        let Some(tool_name) = step.tool_name() else {
            debug!(step = step.sort_key(), "Step needs no tool");
            return ExecutionResult::no_tool(step);
        };

        let tool = match self.registry.try_resolve(tool_name) {
            Ok(tool) => tool,
            Err(err) => {
                warn!(step = step.sort_key(), tool = tool_name, "Tool not registered");
                return ExecutionResult::failed(step, err.to_string());
            }
        };

        let parameters = step.parameters.clone().unwrap_or_default();
        debug!(step = step.sort_key(), tool = tool_name, "Executing step");

        let invocation = AssertUnwindSafe(self.invoke(tool.as_ref(), &parameters))
            .catch_unwind()
            .await;

        match invocation {
            Ok(Ok(call)) => Self::from_call(step, call),
            Ok(Err(err)) => {
                warn!(step = step.sort_key(), tool = tool_name, error = %err, "Tool returned an error");
                ExecutionResult::failed(step, format!("execution error: {err}"))
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                warn!(step = step.sort_key(), tool = tool_name, panic = %message, "Tool panicked");
                ExecutionResult::failed(step, format!("execution error: {message}"))
            }
        }
    }

    async fn invoke(
        &self,
        tool: &dyn Tool,
        parameters: &Parameters,
    ) -> Result<CachedCall, ToolError> {
        let policy = tool.cache_policy();
        if !self.cache_enabled || !policy.enabled {
            let output = tool.execute(parameters).await?;
            return Ok(CachedCall {
                output,
                from_cache: false,
            });
        }

        let ttl = policy.ttl.unwrap_or(self.default_ttl);
        self.cache
            .cached_call(tool.name(), parameters, ttl, || tool.execute(parameters))
            .await
    }

    fn from_call(step: &Step, call: CachedCall) -> ExecutionResult {
        let result = match call.output {
            ToolOutput::Success { data } => ExecutionResult::succeeded(step, Some(data)),
            ToolOutput::Failure { error, data } => ExecutionResult {
                data,
                ..ExecutionResult::failed(step, error.unwrap_or_else(|| UNKNOWN_ERROR.to_string()))
            },
        };

        if call.from_cache {
            debug!(step = step.sort_key(), "Served from cache");
            result.cached()
        } else {
            result
        }
    }
}

impl std::fmt::Debug for StepExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepExecutor")
            .field("tools", &self.registry.tool_names())
            .field("cache_enabled", &self.cache_enabled)
            .field("default_ttl", &self.default_ttl)
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "tool panicked".to_string()
    }
}
