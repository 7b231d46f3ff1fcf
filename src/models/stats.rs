//! Per-list progress numbers shown on the dashboard.
use super::{Difficulty, ListProgress, Problem};
use chrono::NaiveDate;

/// Performance that counts a problem as mastered
pub const MASTERED_PERFORMANCE: u8 = 5;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListStats {
    pub total: usize,
    pub mastered: usize,
    pub easy: usize,
    pub medium: usize,
    pub hard: usize,
    pub due_today: usize,
}

impl ListStats {
    pub fn compute(problems: &[Problem], progress: &ListProgress, today: NaiveDate) -> Self {
        let mut stats = ListStats {
            total: problems.len(),
            ..Default::default()
        };

        for problem in problems {
            let Some(record) = progress.get(&problem.id) else {
                continue;
            };
            if record.solved && record.next_review.is_some_and(|next| next <= today) {
                stats.due_today += 1;
            }
            if record.performance == Some(MASTERED_PERFORMANCE) {
                stats.mastered += 1;
                match problem.difficulty {
                    Difficulty::Easy => stats.easy += 1,
                    Difficulty::Medium => stats.medium += 1,
                    Difficulty::Hard => stats.hard += 1,
                }
            }
        }
        stats
    }

    /// Mastered share in percent
    pub fn mastered_percent(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            self.mastered as f32 * 100.0 / self.total as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReviewRecord;

    #[test]
    fn test_compute() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let problems = vec![
            Problem::new("a", "A", Difficulty::Easy),
            Problem::new("b", "B", Difficulty::Hard),
            Problem::new("c", "C", Difficulty::Medium),
            Problem::new("d", "D", Difficulty::Medium),
        ];

        let mut progress = ListProgress::new();
        progress.insert(
            "a".into(),
            ReviewRecord {
                solved: true,
                performance: Some(5),
                next_review: NaiveDate::from_ymd_opt(2024, 1, 9),
                ..Default::default()
            },
        );
        progress.insert(
            "b".into(),
            ReviewRecord {
                solved: true,
                performance: Some(5),
                next_review: NaiveDate::from_ymd_opt(2024, 1, 5),
                ..Default::default()
            },
        );
        progress.insert(
            "c".into(),
            ReviewRecord {
                solved: true,
                performance: Some(2),
                next_review: NaiveDate::from_ymd_opt(2024, 1, 1),
                ..Default::default()
            },
        );
        // records for problems outside the list are ignored
        progress.insert(
            "zzz".into(),
            ReviewRecord {
                solved: true,
                performance: Some(5),
                ..Default::default()
            },
        );

        let stats = ListStats::compute(&problems, &progress, today);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.mastered, 2);
        assert_eq!((stats.easy, stats.medium, stats.hard), (1, 0, 1));
        assert_eq!(stats.due_today, 2);
        assert_eq!(stats.mastered_percent(), 50.0);
    }

    #[test]
    fn test_empty_list() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let stats = ListStats::compute(&[], &ListProgress::new(), today);
        assert_eq!(stats, ListStats::default());
        assert_eq!(stats.mastered_percent(), 0.0);
    }
}
