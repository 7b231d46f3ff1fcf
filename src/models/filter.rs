//! Problem table filters: topic, difficulty and "due only".
use super::status::{ReviewStatus, review_status};
use super::{Difficulty, ListProgress, Problem};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Saved between sessions as JSON; missing fields fall back to "show all".
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProblemFilter {
    /// `None` matches every topic
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub due_only: bool,
}

impl ProblemFilter {
    pub fn matches(&self, problem: &Problem, progress: &ListProgress, today: NaiveDate) -> bool {
        let category_match = self
            .category
            .as_ref()
            .is_none_or(|category| problem.topics.contains(category));
        let difficulty_match = self.difficulty.is_none_or(|d| d == problem.difficulty);

        if !self.due_only {
            return category_match && difficulty_match;
        }
        category_match
            && difficulty_match
            && review_status(&problem.id, progress, today) == ReviewStatus::Due
    }

    pub fn apply<'a>(
        &self,
        problems: &'a [Problem],
        progress: &ListProgress,
        today: NaiveDate,
    ) -> Vec<&'a Problem> {
        problems
            .iter()
            .filter(|problem| self.matches(problem, progress, today))
            .collect()
    }
}

/// Distinct topics in first-seen order
pub fn categories(problems: &[Problem]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for topic in problems.iter().flat_map(|p| p.topics.iter()) {
        if !seen.contains(topic) {
            seen.push(topic.clone());
        }
    }
    seen
}
