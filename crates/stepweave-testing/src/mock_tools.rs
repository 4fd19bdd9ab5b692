//! # Mock Tools for Testing
//!
//! Tool implementations with predictable behaviour: canned outputs, errors,
//! panics and artificial latency, plus a registry that keeps handles to them
//! for inspection after a run.

use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use stepweave_core::{CachePolicy, Parameters, Tool, ToolError, ToolOutput, ToolSchema};
use stepweave_tools::{InMemoryToolRegistry, ToolRegistry};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn as_parameters(value: Value) -> Parameters {
    match value {
        Value::Object(map) => map,
        _ => Parameters::new(),
    }
}

/// A mock tool that returns predefined outputs based on its parameters
#[derive(Debug)]
pub struct MockTool {
    name: String,
    responses: Vec<(Parameters, ToolOutput)>,
    default_output: Option<ToolOutput>,
    cache_policy: CachePolicy,
    call_count: AtomicUsize,
    call_history: Mutex<Vec<Parameters>>,
}

impl MockTool {
    /// Create a new mock tool with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            responses: Vec::new(),
            default_output: None,
            cache_policy: CachePolicy::default(),
            call_count: AtomicUsize::new(0),
            call_history: Mutex::new(Vec::new()),
        }
    }

    /// Return `output` when called with exactly `parameters`
    pub fn with_response(mut self, parameters: Value, output: ToolOutput) -> Self {
        self.responses.push((as_parameters(parameters), output));
        self
    }

    /// Set the output for any unmatched parameters
    pub fn with_default_output(mut self, output: ToolOutput) -> Self {
        self.default_output = Some(output);
        self
    }

    /// Set a default failure for any unmatched parameters
    pub fn with_default_failure(self, error: impl Into<String>) -> Self {
        self.with_default_output(ToolOutput::failure(error))
    }

    pub fn with_cache_policy(mut self, policy: CachePolicy) -> Self {
        self.cache_policy = policy;
        self
    }

    /// Get the number of times this tool has been called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Get the history of parameters passed to this tool
    pub fn call_history(&self) -> Vec<Parameters> {
        lock(&self.call_history).clone()
    }

    /// Check if the tool was called with specific parameters
    pub fn was_called_with(&self, parameters: &Value) -> bool {
        let expected = as_parameters(parameters.clone());
        lock(&self.call_history).contains(&expected)
    }

    /// Reset call count and history
    pub fn reset(&self) {
        self.call_count.store(0, Ordering::SeqCst);
        lock(&self.call_history).clear();
    }
}

#[async_trait]
impl Tool for MockTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Mock tool"
    }

    fn cache_policy(&self) -> CachePolicy {
        self.cache_policy
    }

    async fn execute(&self, parameters: &Parameters) -> Result<ToolOutput, ToolError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        lock(&self.call_history).push(parameters.clone());

        let matched = self
            .responses
            .iter()
            .find(|(expected, _)| expected == parameters)
            .map(|(_, output)| output.clone());

        Ok(matched
            .or_else(|| self.default_output.clone())
            .unwrap_or_else(|| {
                ToolOutput::success(json!({ "tool": self.name, "parameters": parameters }))
            }))
    }
}

/// A tool whose `execute` always returns `Err`
#[derive(Debug, Clone)]
pub struct ErrorTool {
    name: String,
    message: String,
}

impl ErrorTool {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }
}

#[async_trait]
impl Tool for ErrorTool {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, _parameters: &Parameters) -> Result<ToolOutput, ToolError> {
        Err(ToolError::execution_failed(self.message.clone()))
    }
}

/// A tool that panics when executed
#[derive(Debug, Clone)]
pub struct PanicTool {
    name: String,
    message: String,
}

impl PanicTool {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }
}

#[async_trait]
impl Tool for PanicTool {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, _parameters: &Parameters) -> Result<ToolOutput, ToolError> {
        panic!("{}", self.message);
    }
}

/// Records how many tool executions overlap in time.
#[derive(Debug, Default)]
pub struct ConcurrencyProbe {
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    completed: AtomicUsize,
}

impl ConcurrencyProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an execution as started; it ends when the guard drops.
    pub fn enter(&self) -> ProbeGuard<'_> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        ProbeGuard { probe: self }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Highest number of simultaneous executions observed
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

pub struct ProbeGuard<'a> {
    probe: &'a ConcurrencyProbe,
}

impl Drop for ProbeGuard<'_> {
    fn drop(&mut self) {
        self.probe.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.probe.completed.fetch_add(1, Ordering::SeqCst);
    }
}

/// A tool that sleeps before succeeding, optionally reporting to a
/// [`ConcurrencyProbe`].
#[derive(Debug, Clone)]
pub struct SlowTool {
    name: String,
    delay: Duration,
    probe: Option<Arc<ConcurrencyProbe>>,
}

impl SlowTool {
    pub fn new(name: impl Into<String>, delay: Duration) -> Self {
        Self {
            name: name.into(),
            delay,
            probe: None,
        }
    }

    pub fn with_probe(mut self, probe: Arc<ConcurrencyProbe>) -> Self {
        self.probe = Some(probe);
        self
    }
}

#[async_trait]
impl Tool for SlowTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn cache_policy(&self) -> CachePolicy {
        CachePolicy::disabled()
    }

    async fn execute(&self, _parameters: &Parameters) -> Result<ToolOutput, ToolError> {
        let _guard = self.probe.as_deref().map(ConcurrencyProbe::enter);
        tokio::time::sleep(self.delay).await;
        Ok(ToolOutput::success(json!({ "tool": self.name })))
    }
}

/// A registry of mock tools for testing scenarios
///
/// Keeps a handle to every [`MockTool`] so tests can inspect calls after
/// the registry has been handed to an engine.
#[derive(Clone, Default)]
pub struct MockToolRegistry {
    inner: InMemoryToolRegistry,
    mocks: HashMap<String, Arc<MockTool>>,
}

impl MockToolRegistry {
    /// Create a new empty mock tool registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mock tool to the registry
    pub fn with_tool(mut self, tool: MockTool) -> Self {
        let tool = Arc::new(tool);
        self.mocks.insert(tool.name.clone(), Arc::clone(&tool));
        self.inner.register(tool);
        self
    }

    /// Add any other tool implementation
    pub fn with_dyn_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.mocks.remove(tool.name());
        self.inner.register(tool);
        self
    }

    /// Create a mock tool that always succeeds
    pub fn with_success_tool(self, name: impl Into<String>) -> Self {
        self.with_tool(MockTool::new(name))
    }

    /// Create a mock tool that always reports failure
    pub fn with_failure_tool(self, name: impl Into<String>) -> Self {
        self.with_tool(MockTool::new(name).with_default_failure("mock failure"))
    }

    /// Create a tool whose execution returns an error
    pub fn with_error_tool(self, name: impl Into<String>, message: impl Into<String>) -> Self {
        self.with_dyn_tool(Arc::new(ErrorTool::new(name, message)))
    }

    /// Create a tool whose execution panics
    pub fn with_panic_tool(self, name: impl Into<String>, message: impl Into<String>) -> Self {
        self.with_dyn_tool(Arc::new(PanicTool::new(name, message)))
    }

    pub fn with_slow_tool(self, tool: SlowTool) -> Self {
        self.with_dyn_tool(Arc::new(tool))
    }

    /// Add standard mock tools for testing
    pub fn with_mock_tools(self) -> Self {
        self.with_success_tool("get_weather")
            .with_success_tool("github_search")
            .with_success_tool("get_news")
            .with_failure_tool("fail_tool")
    }

    /// Get a reference to a mock tool for inspection
    pub fn get_mock_tool(&self, name: &str) -> Option<Arc<MockTool>> {
        self.mocks.get(name).cloned()
    }

    /// Reset all mock tools' call tracking
    pub fn reset_all(&self) {
        for tool in self.mocks.values() {
            tool.reset();
        }
    }
}

impl ToolRegistry for MockToolRegistry {
    fn resolve(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.inner.resolve(name)
    }

    fn tool_names(&self) -> Vec<String> {
        self.inner.tool_names()
    }

    fn list_schemas(&self) -> Vec<ToolSchema> {
        self.inner.list_schemas()
    }
}

impl std::fmt::Debug for MockToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockToolRegistry")
            .field("tools", &self.inner.tool_names())
            .finish()
    }
}
