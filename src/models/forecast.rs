//! Upcoming review load, one bucket per day starting today.
use super::ProgressStore;
use super::calendar::add_days;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Today plus the next ten days
pub const DEFAULT_FORECAST_DAYS: usize = 11;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ForecastTask {
    pub id: String,
    pub list: String,
    /// Last rating, 0 when the record was never rated
    pub performance: u8,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayBucket {
    pub day_index: usize,
    pub date: NaiveDate,
    pub label: String,
    pub tasks: Vec<ForecastTask>,
}

/// Projects every solved, scheduled record onto `days` consecutive days.
/// Overdue reviews are counted on today. Tasks keep store order (list, then id).
pub fn daily_forecast(store: &ProgressStore, days: usize, today: NaiveDate) -> Vec<DayBucket> {
    let mut by_date: BTreeMap<NaiveDate, Vec<ForecastTask>> = BTreeMap::new();

    for (list, id, record) in store.iter() {
        if !record.solved {
            continue;
        }
        if let Some(next) = record.next_review {
            by_date.entry(next.max(today)).or_default().push(ForecastTask {
                id: id.to_string(),
                list: list.to_string(),
                performance: record.performance.unwrap_or(0),
            });
        }
    }

    // Buckets stop at the end of the representable calendar
    (0..days)
        .map_while(|day_index| {
            let date = add_days(today, i64::try_from(day_index).ok()?)?;
            Some(DayBucket {
                day_index,
                date,
                label: day_index.to_string(),
                tasks: by_date.remove(&date).unwrap_or_default(),
            })
        })
        .collect()
}
