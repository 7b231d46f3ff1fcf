//! Per-problem review state, scoped to the list the problem belongs to.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Performance assumed for records that were never rated.
pub const DEFAULT_PERFORMANCE: u8 = 3;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReviewRecord {
    pub solved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_reviewed: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_review: Option<NaiveDate>,
    pub interval: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performance: Option<u8>,
    pub vruntime: f64,
    pub reviews: u32,
}

impl ReviewRecord {
    pub fn effective_performance(&self) -> u8 {
        self.performance.unwrap_or(DEFAULT_PERFORMANCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_iso_dates_in_camel_case() {
        let record = ReviewRecord {
            solved: true,
            last_reviewed: NaiveDate::from_ymd_opt(2024, 1, 1),
            next_review: NaiveDate::from_ymd_opt(2024, 1, 4),
            interval: 3,
            performance: Some(5),
            vruntime: 1.5,
            reviews: 1,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["lastReviewed"], "2024-01-01");
        assert_eq!(json["nextReview"], "2024-01-04");
        assert_eq!(json["interval"], 3);
        assert_eq!(json["vruntime"], 1.5);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let record: ReviewRecord = serde_json::from_str(r#"{ "solved": true }"#).unwrap();
        assert!(record.solved);
        assert_eq!(record.reviews, 0);
        assert_eq!(record.next_review, None);
        assert_eq!(record.effective_performance(), DEFAULT_PERFORMANCE);
    }
}
