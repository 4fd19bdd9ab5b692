//! Process-level wiring of cache, registry and engine.

use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

use stepweave_cache::{CacheStats, ToolCache, spawn_sweeper};
use stepweave_core::{ExecutionResult, Plan, PlanError, ToolSchema};
use stepweave_executor::{ConfigError, EngineConfig, EngineConfigBuilder, ParallelEngine};
use stepweave_tools::ToolRegistry;

/// Errors raised while bootstrapping or feeding a [`Runtime`].
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error("cache sweeping requires a running tokio runtime")]
    NoAsyncRuntime,
}

/// Owns the shared components of one process.
///
/// Construct once at startup and pass by reference. Dropping the runtime
/// stops the background sweeper if one was started.
pub struct Runtime {
    config: EngineConfig,
    cache: Arc<ToolCache>,
    registry: Arc<dyn ToolRegistry>,
    engine: ParallelEngine,
    sweeper: Option<JoinHandle<()>>,
}

impl Runtime {
    /// Validate `config` and wire the components.
    ///
    /// When `sweep_interval_secs` is set the sweeper is spawned on the
    /// current tokio runtime.
    pub fn new(registry: Arc<dyn ToolRegistry>, config: EngineConfig) -> Result<Self, RuntimeError> {
        config.validate()?;

        let cache = Arc::new(ToolCache::new());
        let engine = ParallelEngine::new(Arc::clone(&registry), Arc::clone(&cache), &config);

        let sweeper = match config.sweep_interval() {
            Some(interval) => {
                tokio::runtime::Handle::try_current().map_err(|_| RuntimeError::NoAsyncRuntime)?;
                Some(spawn_sweeper(Arc::clone(&cache), interval))
            }
            None => None,
        };

        info!(
            tools = registry.tool_names().len(),
            cache_enabled = config.cache_enabled,
            sweeper = sweeper.is_some(),
            "Runtime ready"
        );

        Ok(Self {
            config,
            cache,
            registry,
            engine,
            sweeper,
        })
    }

    /// Build from `STEPWEAVE_*` environment variables.
    pub fn from_env(registry: Arc<dyn ToolRegistry>) -> Result<Self, RuntimeError> {
        let config = EngineConfigBuilder::from_env()?.build()?;
        Self::new(registry, config)
    }

    pub async fn execute_plan(&self, plan: &Plan) -> Vec<ExecutionResult> {
        self.engine.execute_plan(plan).await
    }

    /// Parse a plan from JSON and execute it.
    pub async fn execute_plan_json(&self, json: &str) -> Result<Vec<ExecutionResult>, RuntimeError> {
        let plan = Plan::from_json(json)?;
        Ok(self.execute_plan(&plan).await)
    }

    /// Tool descriptions for the upstream planner.
    pub fn list_schemas(&self) -> Vec<ToolSchema> {
        self.registry.list_schemas()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn engine(&self) -> &ParallelEngine {
        &self.engine
    }

    pub fn cache(&self) -> &Arc<ToolCache> {
        &self.cache
    }

    pub fn registry(&self) -> &Arc<dyn ToolRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn has_sweeper(&self) -> bool {
        self.sweeper.is_some()
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        if let Some(sweeper) = self.sweeper.take() {
            sweeper.abort();
        }
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("config", &self.config)
            .field("tools", &self.registry.tool_names())
            .field("cache", &self.cache.stats())
            .field("sweeper", &self.sweeper.is_some())
            .finish()
    }
}
