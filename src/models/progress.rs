//! Progress store: list name -> problem id -> review record.
//!
//! The scheduler only ever reads a snapshot of the store and hands back an
//! [`UpdateMap`] with the same shape; the owner merges it with
//! [`ProgressStore::apply_updates`]. `BTreeMap` keeps iteration ordered by
//! list name, then problem id.

use super::ReviewRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type ListProgress = BTreeMap<String, ReviewRecord>;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressStore {
    lists: BTreeMap<String, ListProgress>,
}

/// Records to write back after a scheduling call
pub type UpdateMap = ProgressStore;

impl ProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, list_name: &str, problem_id: &str) -> Option<&ReviewRecord> {
        self.lists.get(list_name)?.get(problem_id)
    }

    pub fn list(&self, list_name: &str) -> Option<&ListProgress> {
        self.lists.get(list_name)
    }

    pub fn list_names(&self) -> impl Iterator<Item = &str> {
        self.lists.keys().map(String::as_str)
    }

    /// Makes sure a (possibly empty) list exists.
    pub fn ensure_list(&mut self, list_name: &str) {
        self.lists.entry(list_name.to_string()).or_default();
    }

    pub fn insert(&mut self, list_name: &str, problem_id: &str, record: ReviewRecord) {
        self.lists
            .entry(list_name.to_string())
            .or_default()
            .insert(problem_id.to_string(), record);
    }

    /// Every record as `(list, problem id, record)`, list then id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &ReviewRecord)> {
        self.lists.iter().flat_map(|(list, records)| {
            records
                .iter()
                .map(move |(id, record)| (list.as_str(), id.as_str(), record))
        })
    }

    /// Records across all lists whose next review falls on `date`.
    pub fn all_by_date(&self, date: NaiveDate) -> Vec<(&str, &str, &ReviewRecord)> {
        self.iter()
            .filter(|(_, _, record)| record.next_review == Some(date))
            .collect()
    }

    /// Number of scheduled records per day, all lists combined.
    pub fn date_counts(&self) -> BTreeMap<NaiveDate, usize> {
        let mut counts = BTreeMap::new();
        for (_, _, record) in self.iter() {
            if let Some(date) = record.next_review {
                *counts.entry(date).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Merges updates in: records are replaced whole, untouched ones are kept.
    pub fn apply_updates(&mut self, updates: UpdateMap) {
        for (list_name, records) in updates.lists {
            self.lists.entry(list_name).or_default().extend(records);
        }
    }

    /// Total number of records in all lists
    pub fn len(&self) -> usize {
        self.lists.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
