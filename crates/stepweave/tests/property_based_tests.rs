//! Property-Based Tests for Plan Execution
//!
//! Invariants that must hold for any plan: one result per step, results in
//! step-number order, and tool identity carried through unchanged.

use proptest::prelude::*;
use serde_json::json;
use std::sync::Arc;
use stepweave::{EngineConfig, ParallelEngine, Step, ToolCache, group_steps};
use stepweave_testing::MockToolRegistry;

const TOOLS: [&str; 5] = ["get_weather", "github_search", "get_news", "missing", "null"];

// Steps with arbitrary (possibly duplicate or absent) numbers
fn step_strategy() -> impl Strategy<Value = Step> {
    (
        prop::option::of(-5i64..50),
        prop::sample::select(vec![
            "Fetch data",
            "Compare with previous",
            "Summarize the above",
            "Look something up",
        ]),
        prop::option::of(prop::sample::select(TOOLS.to_vec())),
        0u8..4,
    )
        .prop_map(|(number, description, tool, arg)| Step {
            step_number: number,
            description: description.to_string(),
            tool: tool.map(str::to_string),
            parameters: json!({ "arg": arg }).as_object().cloned(),
        })
}

fn engine() -> ParallelEngine {
    ParallelEngine::new(
        Arc::new(
            MockToolRegistry::new()
                .with_success_tool("get_weather")
                .with_success_tool("github_search")
                .with_failure_tool("get_news"),
        ),
        Arc::new(ToolCache::new()),
        &EngineConfig::default(),
    )
}

proptest! {
    /// Property: exactly one result per input step
    #[test]
    fn prop_one_result_per_step(steps in prop::collection::vec(step_strategy(), 0..16)) {
        let results = tokio_test::block_on(engine().execute_steps(&steps));
        prop_assert_eq!(results.len(), steps.len());
    }

    /// Property: results are sorted by step number, missing numbers as 0
    #[test]
    fn prop_results_sorted(steps in prop::collection::vec(step_strategy(), 0..16)) {
        let results = tokio_test::block_on(engine().execute_steps(&steps));
        let keys: Vec<i64> = results.iter().map(|r| r.sort_key()).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        prop_assert_eq!(keys, sorted);
    }

    /// Property: results describe the same multiset of steps as the input
    #[test]
    fn prop_results_preserve_step_identity(steps in prop::collection::vec(step_strategy(), 0..16)) {
        let results = tokio_test::block_on(engine().execute_steps(&steps));

        let mut expected: Vec<(Option<i64>, String, Option<String>)> = steps
            .iter()
            .map(|s| (s.step_number, s.description.clone(), s.tool.clone()))
            .collect();
        let mut actual: Vec<(Option<i64>, String, Option<String>)> = results
            .iter()
            .map(|r| (r.step_number, r.description.clone(), r.tool_used.clone()))
            .collect();
        expected.sort();
        actual.sort();
        prop_assert_eq!(expected, actual);
    }

    /// Property: success depends only on the tool, never on grouping
    #[test]
    fn prop_outcome_determined_by_tool(steps in prop::collection::vec(step_strategy(), 1..16)) {
        let results = tokio_test::block_on(engine().execute_steps(&steps));
        for result in &results {
            let expected = match result.tool_used.as_deref() {
                None | Some("") | Some("null") => true,
                Some("get_weather") | Some("github_search") => true,
                _ => false,
            };
            prop_assert_eq!(result.success, expected);
            prop_assert_eq!(result.error.is_some(), !expected);
        }
    }

    /// Property: grouping partitions the steps without reordering them
    #[test]
    fn prop_grouping_is_a_partition(steps in prop::collection::vec(step_strategy(), 0..32)) {
        let groups = group_steps(&steps);
        let total: usize = groups.iter().map(|g| g.len()).sum();
        prop_assert_eq!(total, steps.len());
        prop_assert!(groups.iter().all(|g| !g.is_empty()));
    }
}
