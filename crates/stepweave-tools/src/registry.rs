use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

use stepweave_core::{Tool, ToolError, ToolSchema};

/// Trait for looking up tools by name.
///
/// Registries are populated at startup and read-only afterwards, so lookups
/// need no synchronization beyond `Send + Sync`.
pub trait ToolRegistry: Send + Sync {
    /// Look up a tool by its identifier.
    ///
    /// # Returns
    ///
    /// `Some(tool)` if registered, `None` otherwise
    fn resolve(&self, name: &str) -> Option<Arc<dyn Tool>>;

    /// Names of every registered tool, sorted.
    fn tool_names(&self) -> Vec<String>;

    /// Schemas of every registered tool, sorted by name, for the planner.
    fn list_schemas(&self) -> Vec<ToolSchema>;

    /// Look up a tool, producing a `NotFound` error that lists what exists.
    fn try_resolve(&self, name: &str) -> Result<Arc<dyn Tool>, ToolError> {
        self.resolve(name)
            .ok_or_else(|| ToolError::not_found(name, self.tool_names()))
    }
}

/// In-memory tool registry for local tool storage and lookup.
///
/// `InMemoryToolRegistry` stores tools in a HashMap keyed by the name each
/// tool reports, for O(1) lookup.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use std::sync::Arc;
/// use stepweave_core::{Parameters, Tool, ToolError, ToolOutput};
/// use stepweave_tools::{InMemoryToolRegistry, ToolRegistry};
///
/// struct EchoTool;
///
/// #[async_trait]
/// impl Tool for EchoTool {
///     fn name(&self) -> &str { "echo" }
///     async fn execute(&self, _: &Parameters) -> Result<ToolOutput, ToolError> {
///         Ok(ToolOutput::success(serde_json::Value::Null))
///     }
/// }
///
/// let registry = InMemoryToolRegistry::new().with_tool(Arc::new(EchoTool));
/// assert!(registry.resolve("echo").is_some());
/// ```
#[derive(Clone, Default)]
pub struct InMemoryToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl InMemoryToolRegistry {
    /// Create a new empty tool registry.
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Add a tool using the builder pattern.
    ///
    /// The tool is registered under the name it reports.
    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.register(tool);
        self
    }

    /// Register a tool, replacing any tool with the same name.
    ///
    /// # Returns
    ///
    /// The previously registered tool of that name, if any
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Option<Arc<dyn Tool>> {
        let name = tool.name().to_string();
        let previous = self.tools.insert(name.clone(), tool);
        if previous.is_some() {
            warn!(tool = %name, "Replaced previously registered tool");
        }
        previous
    }

    /// Get the number of tools registered.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl ToolRegistry for InMemoryToolRegistry {
    fn resolve(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    fn tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    fn list_schemas(&self) -> Vec<ToolSchema> {
        let mut schemas: Vec<ToolSchema> = self.tools.values().map(|tool| tool.schema()).collect();
        schemas.sort_by(|a, b| a.name.cmp(&b.name));
        schemas
    }
}

impl std::fmt::Debug for InMemoryToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryToolRegistry")
            .field("tools", &self.tool_names())
            .finish()
    }
}
