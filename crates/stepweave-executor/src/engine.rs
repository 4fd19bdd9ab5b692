//! Group-wise parallel plan execution.
//!
//! Groups produced by the [`DependencyGrouper`] run strictly in order. Inside
//! a group with more than one member every step gets its own task, and the
//! group completes only when all of them have.

use futures::future::join_all;
use std::sync::Arc;
use std::time::Instant;
use tracing::{Instrument, debug, error, info, info_span};
use uuid::Uuid;

use stepweave_cache::ToolCache;
use stepweave_core::{ExecutionResult, ExecutionSummary, Plan, Step};
use stepweave_tools::ToolRegistry;

use crate::config::EngineConfig;
use crate::grouping::{DependencyGrouper, StepGroup};
use crate::step::StepExecutor;

/// Executes plans, running independent steps concurrently.
///
/// Concurrency comes from `tokio::spawn`, so a multi-threaded runtime is
/// needed for steps to make progress in parallel.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use stepweave_cache::ToolCache;
/// use stepweave_core::{Plan, Step};
/// use stepweave_executor::{EngineConfig, ParallelEngine};
/// use stepweave_tools::InMemoryToolRegistry;
///
/// # #[tokio::main]
/// # async fn main() {
/// let engine = ParallelEngine::new(
///     Arc::new(InMemoryToolRegistry::new()),
///     Arc::new(ToolCache::new()),
///     &EngineConfig::default(),
/// );
///
/// let plan = Plan::new(vec![Step::new(1, "Think it over")]);
/// let results = engine.execute_plan(&plan).await;
/// assert_eq!(results.len(), 1);
/// assert!(results[0].success);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ParallelEngine {
    executor: Arc<StepExecutor>,
    grouper: DependencyGrouper,
}

impl ParallelEngine {
    pub fn new(
        registry: Arc<dyn ToolRegistry>,
        cache: Arc<ToolCache>,
        config: &EngineConfig,
    ) -> Self {
        Self {
            executor: Arc::new(StepExecutor::new(registry, cache, config)),
            grouper: DependencyGrouper::with_keywords(&config.dependency_keywords),
        }
    }

    pub fn executor(&self) -> &Arc<StepExecutor> {
        &self.executor
    }

    pub fn grouper(&self) -> &DependencyGrouper {
        &self.grouper
    }

    /// Execute every step of `plan`.
    pub async fn execute_plan(&self, plan: &Plan) -> Vec<ExecutionResult> {
        self.execute_steps(&plan.steps).await
    }

    /// Execute `steps`, returning one result per step sorted by step number.
    ///
    /// Never fails as a whole: per-step problems are reported in the
    /// corresponding result.
    pub async fn execute_steps(&self, steps: &[Step]) -> Vec<ExecutionResult> {
        if steps.is_empty() {
            return Vec::new();
        }

        let run_id = Uuid::new_v4();
        let span = info_span!("execute_plan", run_id = %run_id, steps = steps.len());

        async move {
            let started = Instant::now();
            let groups = self.grouper.group(steps);
            info!(groups = groups.len(), "Executing plan");

            let mut results = Vec::with_capacity(steps.len());
            for (index, group) in groups.iter().enumerate() {
                debug!(
                    group = index,
                    steps = ?group.step_numbers(),
                    parallel = !group.is_singleton(),
                    "Running group"
                );
                results.extend(self.run_group(group).await);
            }

            results.sort_by_key(ExecutionResult::sort_key);

            let summary = ExecutionSummary::from_results(&results);
            info!(
                succeeded = summary.succeeded,
                failed = summary.failed,
                cached = summary.served_from_cache,
                elapsed = %humantime::format_duration(started.elapsed()),
                "Plan finished"
            );
            results
        }
        .instrument(span)
        .await
    }

    async fn run_group(&self, group: &StepGroup<'_>) -> Vec<ExecutionResult> {
        if let [step] = group.steps() {
            return vec![self.executor.execute_step(step).await];
        }

        let handles = group.iter().map(|step| {
            let executor = Arc::clone(&self.executor);
            let owned = step.clone();
            tokio::spawn(async move { executor.execute_step(&owned).await }.in_current_span())
        });
        let joined = join_all(handles).await;

        group
            .iter()
            .zip(joined)
            .map(|(step, outcome)| match outcome {
                Ok(result) => result,
                Err(join_error) => {
                    error!(step = step.sort_key(), error = %join_error, "Step task aborted");
                    ExecutionResult::failed(step, format!("execution error: {join_error}"))
                }
            })
            .collect()
    }
}
