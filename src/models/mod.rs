pub mod calendar;
pub mod difficulty;
pub mod filter;
pub mod forecast;
pub mod problem;
pub mod progress;
pub mod rating;
pub mod review_record;
pub mod scheduler;
pub mod stats;
pub mod status;

pub use calendar::{Clock, SystemClock};
pub use difficulty::Difficulty;
pub use filter::ProblemFilter;
pub use forecast::{DayBucket, ForecastTask, daily_forecast};
pub use problem::Problem;
pub use progress::{ListProgress, ProgressStore, UpdateMap};
pub use rating::Rating;
pub use review_record::ReviewRecord;
pub use scheduler::{Resolution, Scheduler, SchedulerConfig, SchedulerError, schedule_review};
pub use stats::ListStats;
pub use status::{ReviewStatus, review_status};
