//! Fair Review Scheduler (FRS).
//!
//! Computes the next review date for a rated problem while keeping the
//! number of reviews per day, across every list, under a daily limit:
//! - Ratings 4-5 grow the interval by 2.5x, rating 3 by 1.5x, ratings 1-2 reset it to one day
//! - When the target day is full, a struggling review (rating 1-3) bumps the most
//!   comfortable review (performance 5, then 4) to the following day, recursively
//! - A bumped 4 is demoted to 3 so it cannot be bumped forever at the same priority
//! - Otherwise the review is load balanced onto the nearest day with room,
//!   checking later days before earlier ones and never landing on or before today
//! - `vruntime` accumulates `interval / (difficulty weight * (6 - rating))`; it is
//!   recorded for every review but no placement decision reads it yet
//!
//! Scheduling never mutates the store it is given. All changes are returned
//! as an [`UpdateMap`] for the caller to merge.

use super::calendar::add_days;
use super::{Problem, ProgressStore, Rating, ReviewRecord, UpdateMap};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, warn};

pub const DAILY_LIMIT: usize = 5;
pub const SEARCH_HORIZON_DAYS: u32 = 365;
/// Longest interval a review can grow to, roughly a century
pub const MAX_INTERVAL_DAYS: u32 = 36_500;

#[derive(Debug, Error, PartialEq)]
pub enum SchedulerError {
    /// Rating outside 1-5
    #[error("Invalid rating: {0} (expected 1-5)")]
    InvalidRating(u8),

    /// Load balancing found no day with room
    #[error("No day with free capacity within {horizon_days} days of {target}")]
    SchedulingExhausted { target: NaiveDate, horizon_days: u32 },

    /// Date arithmetic left the representable calendar
    #[error("Date out of range: {days} days from {from}")]
    DateOutOfRange { from: NaiveDate, days: i64 },
}

pub type Result<T> = std::result::Result<T, SchedulerError>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Maximum number of reviews on one day, all lists combined
    pub daily_limit: usize,
    /// Interval multiplier for ratings 4 and 5
    pub easy_multiplier: f64,
    /// Interval multiplier for rating 3
    pub medium_multiplier: f64,
    /// Intervals are capped at this many days
    pub max_interval_days: u32,
    pub search_horizon_days: u32,
    pub max_bump_depth: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            daily_limit: DAILY_LIMIT,
            easy_multiplier: 2.5,
            medium_multiplier: 1.5,
            max_interval_days: MAX_INTERVAL_DAYS,
            search_horizon_days: SEARCH_HORIZON_DAYS,
            max_bump_depth: SEARCH_HORIZON_DAYS,
        }
    }
}

/// Outcome of placing a review on a target day.
#[derive(Clone, Debug, PartialEq)]
pub struct Resolution {
    pub final_date: NaiveDate,
    /// Other records moved to make room. Empty when nothing was bumped.
    pub bumped_updates: UpdateMap,
}

fn shift(from: NaiveDate, days: i64) -> Result<NaiveDate> {
    add_days(from, days).ok_or(SchedulerError::DateOutOfRange { from, days })
}

/// A review occupying a day in the working load index.
#[derive(Clone, Debug)]
struct Slot {
    list: String,
    id: String,
    performance: u8,
}

impl Slot {
    fn is(&self, list: &str, id: &str) -> bool {
        self.list == list && self.id == id
    }
}

/// Working copy of the per-day load. Bumps update it as they happen so
/// cascading placements see the counts left behind by earlier ones.
struct DayLoad<'a> {
    store: &'a ProgressStore,
    config: &'a SchedulerConfig,
    today: NaiveDate,
    days: BTreeMap<NaiveDate, Vec<Slot>>,
    bumped: UpdateMap,
}

impl<'a> DayLoad<'a> {
    fn new(
        store: &'a ProgressStore,
        config: &'a SchedulerConfig,
        today: NaiveDate,
        exclude: Option<(&str, &str)>,
    ) -> Self {
        let mut days: BTreeMap<NaiveDate, Vec<Slot>> = BTreeMap::new();
        for (list, id, record) in store.iter() {
            // The record being rated is about to be moved
            if exclude.is_some_and(|(l, i)| l == list && i == id) {
                continue;
            }
            if let Some(date) = record.next_review {
                days.entry(date).or_default().push(Slot {
                    list: list.to_string(),
                    id: id.to_string(),
                    performance: record.effective_performance(),
                });
            }
        }

        Self {
            store,
            config,
            today,
            days,
            bumped: UpdateMap::new(),
        }
    }

    fn count(&self, date: NaiveDate) -> usize {
        self.days.get(&date).map_or(0, Vec::len)
    }

    fn has_room(&self, date: NaiveDate) -> bool {
        self.count(date) < self.config.daily_limit
    }

    fn occupy(&mut self, date: NaiveDate, slot: Slot) {
        self.days.entry(date).or_default().push(slot);
    }

    fn vacate(&mut self, date: NaiveDate, list: &str, id: &str) {
        if let Some(slots) = self.days.get_mut(&date) {
            slots.retain(|slot| !slot.is(list, id));
        }
    }

    /// Highest performance first among 4s and 5s, then lowest (list, id).
    fn pick_victim(&self, date: NaiveDate) -> Option<Slot> {
        self.days
            .get(&date)?
            .iter()
            .filter(|slot| slot.performance >= 4)
            .max_by(|a, b| {
                a.performance
                    .cmp(&b.performance)
                    .then_with(|| b.list.cmp(&a.list))
                    .then_with(|| b.id.cmp(&a.id))
            })
            .cloned()
    }

    /// Places `slot` on `target` or wherever the conflict resolution sends it,
    /// and returns the day it ended up on.
    fn resolve(
        &mut self,
        slot: Slot,
        target: NaiveDate,
        rating: Rating,
        depth: u32,
    ) -> Result<NaiveDate> {
        if self.has_room(target) {
            self.occupy(target, slot);
            return Ok(target);
        }

        if rating.is_high_priority() && depth < self.config.max_bump_depth {
            if let Some(victim) = self.pick_victim(target) {
                // The incoming review takes the victim's place before the
                // victim looks for a new day
                self.vacate(target, &victim.list, &victim.id);
                self.occupy(target, slot);
                self.bump(&victim, target, depth)?;
                return Ok(target);
            }
        }

        let date = self.balance(target)?;
        debug!(requested = %target, placed = %date, "load balanced review");
        self.occupy(date, slot);
        Ok(date)
    }

    /// Re-resolves a displaced `victim` from the day after `date` and
    /// records its new state.
    fn bump(&mut self, victim: &Slot, date: NaiveDate, depth: u32) -> Result<()> {
        let rating = Rating::new(victim.performance.clamp(Rating::MIN, Rating::MAX))?.demoted();
        let moved = Slot {
            performance: rating.value(),
            ..victim.clone()
        };
        let new_date = self.resolve(moved, shift(date, 1)?, rating, depth + 1)?;

        debug!(
            list = %victim.list,
            problem = %victim.id,
            from = %date,
            to = %new_date,
            performance = rating.value(),
            "bumped review"
        );

        let mut record = self
            .bumped
            .get(&victim.list, &victim.id)
            .or_else(|| self.store.get(&victim.list, &victim.id))
            .cloned()
            .unwrap_or_default();
        record.next_review = Some(new_date);
        record.performance = Some(rating.value());
        self.bumped.insert(&victim.list, &victim.id, record);
        Ok(())
    }

    /// Nearest day with room, searching outward from `target`. At each
    /// distance the later day is tried first; earlier days must be after today.
    fn balance(&self, target: NaiveDate) -> Result<NaiveDate> {
        for offset in 0..i64::from(self.config.search_horizon_days) {
            // Days past the end of the calendar are never free
            if let Some(later) = add_days(target, offset) {
                if later > self.today && self.has_room(later) {
                    return Ok(later);
                }
            }

            if offset != 0 {
                if let Some(earlier) = add_days(target, -offset) {
                    if earlier > self.today && self.has_room(earlier) {
                        return Ok(earlier);
                    }
                }
            }
        }

        warn!(
            requested = %target,
            horizon_days = self.config.search_horizon_days,
            "no day with free capacity"
        );
        Err(SchedulerError::SchedulingExhausted {
            target,
            horizon_days: self.config.search_horizon_days,
        })
    }
}

/// Interval after a review. A missing or zero interval counts as one day;
/// growth stops at `max_interval_days`.
pub fn next_interval(previous: u32, rating: Rating, config: &SchedulerConfig) -> u32 {
    let previous = f64::from(previous.max(1));
    let grown = match rating.value() {
        4..=5 => (previous * config.easy_multiplier).ceil(),
        3 => (previous * config.medium_multiplier).ceil(),
        _ => return 1,
    };
    let cap = config.max_interval_days.max(1);
    if grown >= f64::from(cap) { cap } else { grown as u32 }
}

#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    config: SchedulerConfig,
}

impl Scheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Rates `problem` and returns every record that has to be written back:
    /// the rated one plus anything bumped to make room for it.
    pub fn schedule_review(
        &self,
        problem: &Problem,
        current: Option<&ReviewRecord>,
        rating: u8,
        store: &ProgressStore,
        list_name: &str,
        today: NaiveDate,
    ) -> Result<UpdateMap> {
        let rating = Rating::try_from(rating)?;
        let current = current.cloned().unwrap_or_default();

        let weight = problem.difficulty.weight() * (6 - u32::from(rating.value()));
        let interval = next_interval(current.interval, rating, &self.config);
        let target = shift(today, i64::from(interval))?;

        let exclude = Some((list_name, problem.id.as_str()));
        let mut load = DayLoad::new(store, &self.config, today, exclude);
        let slot = Slot {
            list: list_name.to_string(),
            id: problem.id.clone(),
            performance: rating.value(),
        };
        let final_date = load.resolve(slot, target, rating, 0)?;

        debug!(
            list = %list_name,
            problem = %problem.id,
            rating = rating.value(),
            interval,
            next_review = %final_date,
            "scheduled review"
        );

        let record = ReviewRecord {
            solved: true,
            last_reviewed: Some(today),
            next_review: Some(final_date),
            interval,
            performance: Some(rating.value()),
            vruntime: current.vruntime + f64::from(interval) / f64::from(weight),
            reviews: current.reviews + 1,
        };

        let mut updates = load.bumped;
        updates.insert(list_name, &problem.id, record);
        Ok(updates)
    }

    /// Finds the final day for a review rated `rating` aimed at `target`,
    /// bumping lower-priority reviews if needed.
    pub fn resolve_scheduling(
        &self,
        target: NaiveDate,
        rating: Rating,
        store: &ProgressStore,
        today: NaiveDate,
    ) -> Result<Resolution> {
        let mut load = DayLoad::new(store, &self.config, today, None);
        let slot = Slot {
            list: String::new(),
            id: String::new(),
            performance: rating.value(),
        };
        let final_date = load.resolve(slot, target, rating, 0)?;
        Ok(Resolution {
            final_date,
            bumped_updates: load.bumped,
        })
    }

    pub fn perform_load_balancing(
        &self,
        target: NaiveDate,
        store: &ProgressStore,
        today: NaiveDate,
    ) -> Result<NaiveDate> {
        DayLoad::new(store, &self.config, today, None).balance(target)
    }
}

/// [`Scheduler::schedule_review`] with the default configuration
pub fn schedule_review(
    problem: &Problem,
    current: Option<&ReviewRecord>,
    rating: u8,
    store: &ProgressStore,
    list_name: &str,
    today: NaiveDate,
) -> Result<UpdateMap> {
    Scheduler::default().schedule_review(problem, current, rating, store, list_name, today)
}

pub fn resolve_scheduling(
    target: NaiveDate,
    rating: Rating,
    store: &ProgressStore,
    today: NaiveDate,
) -> Result<Resolution> {
    Scheduler::default().resolve_scheduling(target, rating, store, today)
}

pub fn perform_load_balancing(
    target: NaiveDate,
    store: &ProgressStore,
    today: NaiveDate,
) -> Result<NaiveDate> {
    Scheduler::default().perform_load_balancing(target, store, today)
}
