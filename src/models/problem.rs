//! Problem is a single entry of a problem list. Read-only input to the scheduler.
use super::Difficulty;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    pub id: String,
    pub title: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub topics: Vec<String>,
}

impl Problem {
    pub fn new(id: &str, title: &str, difficulty: Difficulty) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            difficulty,
            topics: Vec::new(),
        }
    }

    pub fn with_topics(mut self, topics: &[&str]) -> Self {
        self.topics = topics.iter().map(|t| t.to_string()).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_problem_creation() {
        let problem = Problem::new("two-sum", "Two Sum", Difficulty::Easy)
            .with_topics(&["Arrays & Hashing"]);

        assert_eq!(problem.id, "two-sum");
        assert_eq!(problem.difficulty.weight(), 1);
        assert_eq!(problem.topics, vec!["Arrays & Hashing".to_string()]);
    }
}
