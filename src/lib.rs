pub mod config;
pub mod database;
pub mod export;
pub mod models;

pub use config::AppConfig;
pub use models::{
    DayBucket, Difficulty, ListProgress, Problem, ProgressStore, Rating, ReviewRecord,
    ReviewStatus, Scheduler, SchedulerConfig, SchedulerError, UpdateMap, daily_forecast,
    review_status, schedule_review,
};
