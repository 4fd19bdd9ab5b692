//! Tool capability boundary.
//!
//! Tools are external collaborators (HTTP clients for weather, code search,
//! news, ...). The runtime only sees them through the [`Tool`] trait and the
//! [`ToolOutput`] they return.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::error::ToolError;
use crate::plan::Parameters;

/// Outcome reported by a tool.
///
/// A tool that ran but could not do its job returns [`ToolOutput::Failure`];
/// that is an expected outcome, not an error. Serialized as
/// `{"success": bool, "data": ..., "error": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ToolOutputRepr", into = "ToolOutputRepr")]
pub enum ToolOutput {
    /// Tool produced data.
    Success { data: Value },
    /// Tool signalled failure, optionally with a message and partial data.
    Failure {
        error: Option<String>,
        data: Option<Value>,
    },
}

impl ToolOutput {
    pub fn success(data: Value) -> Self {
        ToolOutput::Success { data }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        ToolOutput::Failure {
            error: Some(error.into()),
            data: None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ToolOutput::Success { .. })
    }

    pub fn data(&self) -> Option<&Value> {
        match self {
            ToolOutput::Success { data } => Some(data),
            ToolOutput::Failure { data, .. } => data.as_ref(),
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            ToolOutput::Success { .. } => None,
            ToolOutput::Failure { error, .. } => error.as_deref(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
struct ToolOutputRepr {
    success: bool,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl From<ToolOutputRepr> for ToolOutput {
    fn from(repr: ToolOutputRepr) -> Self {
        if repr.success {
            ToolOutput::Success {
                data: repr.data.unwrap_or(Value::Null),
            }
        } else {
            ToolOutput::Failure {
                error: repr.error,
                data: repr.data,
            }
        }
    }
}

impl From<ToolOutput> for ToolOutputRepr {
    fn from(output: ToolOutput) -> Self {
        match output {
            ToolOutput::Success { data } => ToolOutputRepr {
                success: true,
                data: Some(data),
                error: None,
            },
            ToolOutput::Failure { error, data } => ToolOutputRepr {
                success: false,
                data,
                error,
            },
        }
    }
}

/// How results of a tool may be reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    /// Whether successful results are cached at all.
    pub enabled: bool,
    /// Tool-specific TTL. `None` uses the engine default.
    pub ttl: Option<Duration>,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl: None,
        }
    }
}

impl CachePolicy {
    /// Never cache this tool.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ttl: None,
        }
    }

    /// Cache with a tool-specific TTL.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            enabled: true,
            ttl: Some(ttl),
        }
    }
}

/// Description of a tool for the upstream planner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    /// Parameter name to human readable description.
    pub parameters: BTreeMap<String, String>,
}

/// A named capability the runtime can invoke for a step.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use serde_json::json;
/// use stepweave_core::{Parameters, Tool, ToolError, ToolOutput};
///
/// struct EchoTool;
///
/// #[async_trait]
/// impl Tool for EchoTool {
///     fn name(&self) -> &str {
///         "echo"
///     }
///
///     async fn execute(&self, parameters: &Parameters) -> Result<ToolOutput, ToolError> {
///         Ok(ToolOutput::success(json!(parameters)))
///     }
/// }
/// ```
#[async_trait]
pub trait Tool: Send + Sync {
    /// Identifier the planner uses to bind steps to this tool.
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    /// Expected parameters with descriptions.
    fn parameter_schema(&self) -> BTreeMap<String, String> {
        BTreeMap::new()
    }

    fn cache_policy(&self) -> CachePolicy {
        CachePolicy::default()
    }

    /// Run the tool.
    ///
    /// Return `Ok(ToolOutput::Failure { .. })` for expected failures (bad
    /// city name, empty search). Reserve `Err` for unexpected breakage; the
    /// runtime reports it as an execution error for the step.
    async fn execute(&self, parameters: &Parameters) -> Result<ToolOutput, ToolError>;

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameter_schema(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct CityTool;

    #[async_trait]
    impl Tool for CityTool {
        fn name(&self) -> &str {
            "get_weather"
        }

        fn description(&self) -> &str {
            "Weather forecast for a city"
        }

        fn parameter_schema(&self) -> BTreeMap<String, String> {
            BTreeMap::from([("city".to_string(), "City name".to_string())])
        }

        async fn execute(&self, parameters: &Parameters) -> Result<ToolOutput, ToolError> {
            match parameters.get("city").and_then(Value::as_str) {
                Some(city) => Ok(ToolOutput::success(json!({ "city": city }))),
                None => Ok(ToolOutput::failure("city is required")),
            }
        }
    }

    #[test]
    fn output_serializes_to_wire_shape() {
        let ok = serde_json::to_value(ToolOutput::success(json!({"t": 21}))).unwrap();
        assert_eq!(ok, json!({"success": true, "data": {"t": 21}}));

        let failed = serde_json::to_value(ToolOutput::failure("boom")).unwrap();
        assert_eq!(
            failed,
            json!({"success": false, "data": null, "error": "boom"})
        );
    }

    #[test]
    fn output_parses_failure_without_error() {
        let output: ToolOutput = serde_json::from_value(json!({"success": false})).unwrap();
        assert!(!output.is_success());
        assert_eq!(output.error_message(), None);
    }

    #[test]
    fn schema_collects_tool_metadata() {
        let schema = CityTool.schema();
        assert_eq!(schema.name, "get_weather");
        assert_eq!(schema.description, "Weather forecast for a city");
        assert_eq!(schema.parameters.get("city").unwrap(), "City name");
    }

    #[test]
    fn default_cache_policy_is_enabled_without_ttl() {
        assert_eq!(
            CityTool.cache_policy(),
            CachePolicy {
                enabled: true,
                ttl: None
            }
        );
        assert!(!CachePolicy::disabled().enabled);
    }

    #[tokio::test]
    async fn tool_reports_expected_failure_as_output() {
        let output = CityTool.execute(&Parameters::new()).await.unwrap();
        assert_eq!(output.error_message(), Some("city is required"));
    }
}
