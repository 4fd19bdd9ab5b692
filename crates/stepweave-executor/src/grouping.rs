//! Dependency grouping.
//!
//! Partitions an ordered step sequence into ordered groups of steps that may
//! run concurrently. The analysis is a textual heuristic, not a dependency
//! graph: a step that depends on an earlier one without saying so in one of
//! the keyword phrases is still grouped with it.

use std::collections::HashSet;

use stepweave_core::Step;

/// Phrases that mark a step as consuming an earlier step's output.
pub const DEFAULT_DEPENDENCY_KEYWORDS: [&str; 4] = ["previous", "above", "result from", "using the"];

/// A run of contiguous plan steps eligible for concurrent execution.
///
/// No two members share a tool and no member after the first is marked as
/// dependent on a prior step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepGroup<'a> {
    steps: Vec<&'a Step>,
}

impl<'a> StepGroup<'a> {
    pub fn steps(&self) -> &[&'a Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Whether the group runs inline rather than forked.
    pub fn is_singleton(&self) -> bool {
        self.steps.len() == 1
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Step> + '_ {
        self.steps.iter().copied()
    }

    /// Step numbers of the members, for logging.
    pub fn step_numbers(&self) -> Vec<i64> {
        self.steps.iter().map(|s| s.sort_key()).collect()
    }
}

/// Keyword-driven step grouper.
///
/// # Example
///
/// ```rust
/// use stepweave_core::Step;
/// use stepweave_executor::DependencyGrouper;
///
/// let steps = vec![
///     Step::new(1, "Get weather for Paris").with_tool("get_weather"),
///     Step::new(2, "Search GitHub for tokio").with_tool("github_search"),
///     Step::new(3, "Summarize the above"),
/// ];
///
/// let groups = DependencyGrouper::new().group(&steps);
/// assert_eq!(groups.len(), 2);
/// assert_eq!(groups[0].step_numbers(), vec![1, 2]);
/// assert_eq!(groups[1].step_numbers(), vec![3]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyGrouper {
    keywords: Vec<String>,
}

impl Default for DependencyGrouper {
    fn default() -> Self {
        Self::new()
    }
}

impl DependencyGrouper {
    /// Grouper using [`DEFAULT_DEPENDENCY_KEYWORDS`].
    pub fn new() -> Self {
        Self::with_keywords(DEFAULT_DEPENDENCY_KEYWORDS)
    }

    /// Grouper using a custom keyword list. Keywords are matched
    /// case-insensitively as substrings.
    pub fn with_keywords<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Whether `step` claims to consume an earlier step's output.
    pub fn depends_on_previous(&self, step: &Step) -> bool {
        let description = step.description.to_lowercase();
        self.keywords.iter().any(|k| description.contains(k.as_str()))
    }

    /// Partition `steps` into ordered groups.
    ///
    /// Pure function of input order. Flattening the result reproduces `steps`.
    pub fn group<'a>(&self, steps: &'a [Step]) -> Vec<StepGroup<'a>> {
        let mut groups = Vec::new();
        let mut current: Vec<&'a Step> = Vec::new();
        let mut used_tools: HashSet<&'a str> = HashSet::new();

        for step in steps {
            let tool = step.tool_name();
            let tool_conflict = tool.is_some_and(|t| used_tools.contains(t));

            if self.depends_on_previous(step) || tool_conflict {
                if !current.is_empty() {
                    groups.push(StepGroup {
                        steps: std::mem::take(&mut current),
                    });
                }
                current.push(step);
                used_tools.clear();
                used_tools.extend(tool);
            } else {
                current.push(step);
                used_tools.extend(tool);
            }
        }

        if !current.is_empty() {
            groups.push(StepGroup { steps: current });
        }

        groups
    }
}

/// Group `steps` with the default keywords.
pub fn group_steps(steps: &[Step]) -> Vec<StepGroup<'_>> {
    DependencyGrouper::new().group(steps)
}
