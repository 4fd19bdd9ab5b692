//! Fluent construction of test plans.

use serde_json::Value;

use stepweave_core::{Plan, Step};

/// Builds a [`Plan`] with steps numbered from 1 in the order added.
///
/// ```rust
/// use serde_json::json;
/// use stepweave_testing::PlanBuilder;
///
/// let plan = PlanBuilder::new()
///     .tool_step("Get weather for Paris", "get_weather", json!({"city": "Paris"}))
///     .step("Summarize the above")
///     .build();
///
/// assert_eq!(plan.len(), 2);
/// assert_eq!(plan.tools_needed, vec!["get_weather"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PlanBuilder {
    steps: Vec<Step>,
    expected_outcome: String,
}

impl PlanBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_number(&self) -> i64 {
        self.steps.len() as i64 + 1
    }

    /// Add a step that needs no tool
    pub fn step(mut self, description: impl Into<String>) -> Self {
        let step = Step::new(self.next_number(), description);
        self.steps.push(step);
        self
    }

    /// Add a tool-bound step; non-object `parameters` are dropped
    pub fn tool_step(
        mut self,
        description: impl Into<String>,
        tool: impl Into<String>,
        parameters: Value,
    ) -> Self {
        let mut step = Step::new(self.next_number(), description).with_tool(tool);
        if let Value::Object(map) = parameters {
            step = step.with_parameters(map);
        }
        self.steps.push(step);
        self
    }

    /// Add a step verbatim, keeping its own number
    pub fn raw_step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn expected_outcome(mut self, outcome: impl Into<String>) -> Self {
        self.expected_outcome = outcome.into();
        self
    }

    /// Build the plan. `tools_needed` lists each tool once, in order of
    /// first use.
    pub fn build(self) -> Plan {
        let mut tools_needed: Vec<String> = Vec::new();
        for tool in self.steps.iter().filter_map(Step::tool_name) {
            if !tools_needed.iter().any(|t| t == tool) {
                tools_needed.push(tool.to_string());
            }
        }

        Plan {
            steps: self.steps,
            tools_needed,
            expected_outcome: self.expected_outcome,
        }
    }
}
