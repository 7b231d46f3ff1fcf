//! Per-problem display state derived from its review record.
use super::ListProgress;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Unsolved,
    Due,
    Future,
}

impl ReviewStatus {
    pub fn label(self) -> &'static str {
        match self {
            ReviewStatus::Unsolved => "Not Solved",
            ReviewStatus::Due => "Due",
            ReviewStatus::Future => "Planned",
        }
    }

    /// Unsolved and due problems can be rated.
    pub fn can_review(self) -> bool {
        self != ReviewStatus::Future
    }
}

pub fn review_status(problem_id: &str, progress: &ListProgress, today: NaiveDate) -> ReviewStatus {
    match progress.get(problem_id) {
        Some(record) if record.solved => match record.next_review {
            Some(next) if next > today => ReviewStatus::Future,
            _ => ReviewStatus::Due,
        },
        _ => ReviewStatus::Unsolved,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReviewRecord;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn progress_with(record: ReviewRecord) -> ListProgress {
        let mut progress = ListProgress::new();
        progress.insert("p".to_string(), record);
        progress
    }

    #[test]
    fn test_absent_or_unsolved_is_unsolved() {
        let today = day(5);
        assert_eq!(review_status("p", &ListProgress::new(), today), ReviewStatus::Unsolved);

        let progress = progress_with(ReviewRecord {
            solved: false,
            next_review: Some(day(9)),
            ..Default::default()
        });
        assert_eq!(review_status("p", &progress, today), ReviewStatus::Unsolved);
    }

    #[test]
    fn test_due_and_future() {
        let today = day(5);
        let solved = |next| ReviewRecord {
            solved: true,
            next_review: next,
            ..Default::default()
        };

        assert_eq!(review_status("p", &progress_with(solved(None)), today), ReviewStatus::Due);
        assert_eq!(review_status("p", &progress_with(solved(Some(day(2)))), today), ReviewStatus::Due);
        assert_eq!(review_status("p", &progress_with(solved(Some(day(5)))), today), ReviewStatus::Due);
        assert_eq!(
            review_status("p", &progress_with(solved(Some(day(6)))), today),
            ReviewStatus::Future
        );
        assert!(!ReviewStatus::Future.can_review());
        assert!(ReviewStatus::Unsolved.can_review());
    }
}
