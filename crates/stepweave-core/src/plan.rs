//! Plan and step definitions.
//!
//! A [`Plan`] is produced by an upstream planner and is read-only to the
//! runtime. Steps arrive in the order the planner authored them; that order
//! drives dependency inference, while `step_number` drives the order of the
//! returned results.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::PlanError;

/// Tool parameters as passed to [`Tool::execute`](crate::Tool::execute).
pub type Parameters = serde_json::Map<String, Value>;

/// Literal token some planners emit instead of a JSON `null` tool.
pub const NULL_TOOL_TOKEN: &str = "null";

/// One unit of work, optionally bound to a named tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Unique within a plan, but not guaranteed contiguous or sorted.
    #[serde(default)]
    pub step_number: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default)]
    pub tool: Option<String>,
    #[serde(default, deserialize_with = "lenient_parameters")]
    pub parameters: Option<Parameters>,
}

impl Step {
    /// Create a step with no tool binding.
    pub fn new(step_number: i64, description: impl Into<String>) -> Self {
        Self {
            step_number: Some(step_number),
            description: description.into(),
            tool: None,
            parameters: None,
        }
    }

    /// Bind the step to a tool.
    pub fn with_tool(mut self, tool: impl Into<String>) -> Self {
        self.tool = Some(tool.into());
        self
    }

    /// Attach tool parameters.
    pub fn with_parameters(mut self, parameters: Parameters) -> Self {
        self.parameters = Some(parameters);
        self
    }

    /// The tool identifier, or `None` when the step needs no tool.
    ///
    /// Absent, empty and the literal `"null"` all mean "no tool".
    pub fn tool_name(&self) -> Option<&str> {
        match self.tool.as_deref() {
            None | Some("") | Some(NULL_TOOL_TOKEN) => None,
            Some(name) => Some(name),
        }
    }

    /// Number used to order results; missing numbers sort as `0`.
    pub fn sort_key(&self) -> i64 {
        self.step_number.unwrap_or(0)
    }
}

/// Ordered sequence of steps submitted for execution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(default, deserialize_with = "null_as_default")]
    pub steps: Vec<Step>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tools_needed: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub expected_outcome: String,
}

impl Plan {
    /// Create a plan from steps in authored order.
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps,
            ..Self::default()
        }
    }

    /// Parse a plan from its JSON wire shape.
    ///
    /// Missing fields are defaulted rather than rejected; only text that is
    /// not a JSON plan object at all is an error.
    pub fn from_json(json: &str) -> Result<Self, PlanError> {
        serde_json::from_str(json).map_err(|e| PlanError::Malformed {
            reason: e.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

// An explicit `null` takes the field's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// Anything other than a JSON object degrades to "no parameters".
fn lenient_parameters<'de, D>(deserializer: D) -> Result<Option<Parameters>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Object(map)) => Some(map),
        _ => None,
    })
}
