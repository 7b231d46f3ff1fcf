//! Database operations for the study tracker
//!
//! Handles SQLite initialization, the problem lists, review records and the
//! simulated current date. The progress store is loaded as a whole snapshot
//! and scheduler updates are written back in a single transaction.

use crate::models::calendar::{add_days, iso_key, parse_iso};
use crate::models::{Difficulty, Problem, ProgressStore, ReviewRecord, UpdateMap};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Invalid date in database: {0}")]
    InvalidDate(String),

    #[error("Invalid JSON in database: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Opens (or creates) the database at `path` and prepares its tables.
/// The simulated date starts at the real current day.
pub fn init_database(path: &str, today: NaiveDate) -> Result<Connection> {
    let conn = Connection::open(path)?;
    prepare_database(&conn, today)?;
    info!(path, "database ready");
    Ok(conn)
}

/// Creates tables if missing and initializes the current date.
pub fn prepare_database(conn: &Connection, today: NaiveDate) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS lists (
            name TEXT PRIMARY KEY
        );

        CREATE TABLE IF NOT EXISTS problems (
            list_name TEXT NOT NULL,
            id TEXT NOT NULL,
            title TEXT NOT NULL,
            difficulty TEXT NOT NULL,
            topics TEXT NOT NULL DEFAULT '[]',
            PRIMARY KEY (list_name, id),
            FOREIGN KEY (list_name) REFERENCES lists(name)
        );

        CREATE TABLE IF NOT EXISTS review_records (
            list_name TEXT NOT NULL,
            problem_id TEXT NOT NULL,
            solved INTEGER NOT NULL DEFAULT 0,
            last_reviewed TEXT,
            next_review TEXT,
            interval INTEGER NOT NULL DEFAULT 0,
            performance INTEGER,
            vruntime REAL NOT NULL DEFAULT 0,
            reviews INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (list_name, problem_id)
        );

        CREATE INDEX IF NOT EXISTS idx_review_records_next_review
            ON review_records(next_review);

        CREATE TABLE IF NOT EXISTS app_state (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );",
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO app_state (key, value) VALUES ('current_date', ?1)",
        params![iso_key(today)],
    )?;

    Ok(())
}

/// Retrieves the simulated current date
pub fn get_current_date(conn: &Connection) -> Result<NaiveDate> {
    let value: String = conn.query_row(
        "SELECT value FROM app_state WHERE key = 'current_date'",
        [],
        |row| row.get(0),
    )?;

    parse_iso(&value).map_err(|_| StorageError::InvalidDate(value))
}

/// Moves the simulated date one day forward and returns it
pub fn advance_day(conn: &Connection) -> Result<NaiveDate> {
    let today = get_current_date(conn)?;
    let next_day =
        add_days(today, 1).ok_or_else(|| StorageError::InvalidDate(format!("{today} + 1 day")))?;

    conn.execute(
        "UPDATE app_state SET value = ?1 WHERE key = 'current_date'",
        params![iso_key(next_day)],
    )?;

    info!(date = %next_day, "advanced simulated date");
    Ok(next_day)
}

/// Reads a UI setting saved in `app_state`
pub fn get_setting(key: &str, conn: &Connection) -> Result<Option<String>> {
    let value = conn
        .query_row(
            "SELECT value FROM app_state WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()?;
    Ok(value)
}

/// Saves a UI setting, replacing any previous value
pub fn set_setting(key: &str, value: &str, conn: &Connection) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO app_state (key, value) VALUES (?1, ?2)",
        params![key, value],
    )?;
    Ok(())
}

/// Creates a problem list. Existing lists are left alone.
pub fn new_list(name: &str, conn: &Connection) -> Result<()> {
    conn.execute("INSERT OR IGNORE INTO lists (name) VALUES (?1)", params![name])?;
    Ok(())
}

pub fn get_all_lists(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM lists ORDER BY rowid")?;
    let lists = stmt
        .query_map([], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<String>>>()?;
    Ok(lists)
}

/// Adds a problem to a list. A problem with the same id is ignored.
pub fn add_problem(list_name: &str, problem: &Problem, conn: &Connection) -> Result<()> {
    new_list(list_name, conn)?;
    conn.execute(
        "INSERT OR IGNORE INTO problems (list_name, id, title, difficulty, topics)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            list_name,
            problem.id,
            problem.title,
            problem.difficulty.as_str(),
            serde_json::to_string(&problem.topics)?
        ],
    )?;
    Ok(())
}

/// Problems of a list in insertion order
pub fn get_problems_for_list(list_name: &str, conn: &Connection) -> Result<Vec<Problem>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, difficulty, topics FROM problems WHERE list_name = ?1 ORDER BY rowid",
    )?;

    let rows = stmt
        .query_map(params![list_name], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    rows.into_iter()
        .map(|(id, title, difficulty, topics)| -> Result<Problem> {
            Ok(Problem {
                id,
                title,
                difficulty: difficulty.parse::<Difficulty>().unwrap_or_default(),
                topics: serde_json::from_str(&topics)?,
            })
        })
        .collect()
}

fn parse_optional_date(value: Option<String>) -> Result<Option<NaiveDate>> {
    value
        .map(|v| parse_iso(&v).map_err(|_| StorageError::InvalidDate(v)))
        .transpose()
}

/// Loads the whole progress store. Every known list is present, even when empty.
pub fn load_progress(conn: &Connection) -> Result<ProgressStore> {
    let mut store = ProgressStore::new();
    for list in get_all_lists(conn)? {
        store.ensure_list(&list);
    }

    let mut stmt = conn.prepare(
        "SELECT list_name, problem_id, solved, last_reviewed, next_review, interval,
                performance, vruntime, reviews
         FROM review_records",
    )?;

    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, bool>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, Option<String>>(4)?,
                row.get::<_, u32>(5)?,
                row.get::<_, Option<u8>>(6)?,
                row.get::<_, f64>(7)?,
                row.get::<_, u32>(8)?,
            ))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    for (list, id, solved, last_reviewed, next_review, interval, performance, vruntime, reviews) in
        rows
    {
        let record = ReviewRecord {
            solved,
            last_reviewed: parse_optional_date(last_reviewed)?,
            next_review: parse_optional_date(next_review)?,
            interval,
            performance,
            vruntime,
            reviews,
        };
        store.insert(&list, &id, record);
    }

    Ok(store)
}

fn upsert_record(
    list_name: &str,
    problem_id: &str,
    record: &ReviewRecord,
    conn: &Connection,
) -> Result<()> {
    conn.execute(
        "INSERT INTO review_records
            (list_name, problem_id, solved, last_reviewed, next_review, interval,
             performance, vruntime, reviews)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
         ON CONFLICT (list_name, problem_id) DO UPDATE SET
            solved = excluded.solved,
            last_reviewed = excluded.last_reviewed,
            next_review = excluded.next_review,
            interval = excluded.interval,
            performance = excluded.performance,
            vruntime = excluded.vruntime,
            reviews = excluded.reviews",
        params![
            list_name,
            problem_id,
            record.solved,
            record.last_reviewed.map(iso_key),
            record.next_review.map(iso_key),
            record.interval,
            record.performance,
            record.vruntime,
            record.reviews
        ],
    )?;
    Ok(())
}

/// Writes a scheduler update map in one transaction
pub fn save_updates(updates: &UpdateMap, conn: &Connection) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    for list in updates.list_names() {
        new_list(list, &tx)?;
    }
    for (list, id, record) in updates.iter() {
        upsert_record(list, id, record, &tx)?;
    }
    tx.commit()?;

    info!(records = updates.len(), "saved review updates");
    Ok(())
}

/// Replaces every stored review record with the contents of `store`
pub fn replace_progress(store: &ProgressStore, conn: &Connection) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute("DELETE FROM review_records", [])?;
    for list in store.list_names() {
        new_list(list, &tx)?;
    }
    for (list, id, record) in store.iter() {
        upsert_record(list, id, record, &tx)?;
    }
    tx.commit()?;

    info!(records = store.len(), "replaced progress");
    Ok(())
}

/// Deletes every review record. Lists and problems stay.
pub fn clear_progress(conn: &Connection) -> Result<usize> {
    let removed = conn.execute("DELETE FROM review_records", [])?;
    if removed > 0 {
        warn!(removed, "cleared all progress");
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn test_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        prepare_database(&conn, day(1)).unwrap();
        conn
    }

    fn record(next: u32, performance: u8) -> ReviewRecord {
        ReviewRecord {
            solved: true,
            last_reviewed: Some(day(1)),
            next_review: Some(day(next)),
            interval: 3,
            performance: Some(performance),
            vruntime: 1.5,
            reviews: 1,
        }
    }

    #[test]
    fn test_current_date_and_advance() {
        let conn = test_db();
        assert_eq!(get_current_date(&conn).unwrap(), day(1));

        assert_eq!(advance_day(&conn).unwrap(), day(2));
        assert_eq!(get_current_date(&conn).unwrap(), day(2));

        // preparing again keeps the simulated date
        prepare_database(&conn, day(20)).unwrap();
        assert_eq!(get_current_date(&conn).unwrap(), day(2));
    }

    #[test]
    fn test_advance_past_last_date_fails() {
        let conn = Connection::open_in_memory().unwrap();
        prepare_database(&conn, NaiveDate::MAX).unwrap();

        assert!(matches!(advance_day(&conn), Err(StorageError::InvalidDate(_))));
    }

    #[test]
    fn test_settings_round_trip() {
        let conn = test_db();
        assert_eq!(get_setting("selected_list", &conn).unwrap(), None);

        set_setting("selected_list", "NeetCode 150", &conn).unwrap();
        set_setting("selected_list", "Blind 75", &conn).unwrap();
        assert_eq!(
            get_setting("selected_list", &conn).unwrap().as_deref(),
            Some("Blind 75")
        );

        // settings live beside the simulated date without touching it
        assert_eq!(get_current_date(&conn).unwrap(), day(1));
    }

    #[test]
    fn test_problems_keep_insertion_order() {
        let conn = test_db();
        let first = Problem::new("two-sum", "Two Sum", Difficulty::Easy).with_topics(&["Arrays"]);
        let second = Problem::new("lru-cache", "LRU Cache", Difficulty::Medium);

        add_problem("Blind 75", &first, &conn).unwrap();
        add_problem("Blind 75", &second, &conn).unwrap();
        add_problem("Blind 75", &first, &conn).unwrap();

        let problems = get_problems_for_list("Blind 75", &conn).unwrap();
        assert_eq!(problems, vec![first, second]);
        assert_eq!(get_all_lists(&conn).unwrap(), vec!["Blind 75".to_string()]);
    }

    #[test]
    fn test_save_and_load_progress() {
        let conn = test_db();
        new_list("LeetCode 75", &conn).unwrap();

        let mut updates = UpdateMap::new();
        updates.insert("Blind 75", "a", record(4, 5));
        updates.insert("NeetCode 150", "b", record(5, 3));
        save_updates(&updates, &conn).unwrap();

        let mut more = UpdateMap::new();
        more.insert("Blind 75", "a", record(9, 2));
        save_updates(&more, &conn).unwrap();

        let store = load_progress(&conn).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("Blind 75", "a"), Some(&record(9, 2)));
        assert_eq!(store.get("NeetCode 150", "b"), Some(&record(5, 3)));
        assert!(store.list("LeetCode 75").unwrap().is_empty());
    }

    #[test]
    fn test_replace_and_clear_progress() {
        let conn = test_db();
        let mut updates = UpdateMap::new();
        updates.insert("Blind 75", "a", record(4, 5));
        save_updates(&updates, &conn).unwrap();

        let mut imported = ProgressStore::new();
        imported.insert("Blind 75", "z", ReviewRecord::default());
        replace_progress(&imported, &conn).unwrap();

        let store = load_progress(&conn).unwrap();
        assert!(store.get("Blind 75", "a").is_none());
        assert_eq!(store.get("Blind 75", "z"), Some(&ReviewRecord::default()));

        assert_eq!(clear_progress(&conn).unwrap(), 1);
        assert!(load_progress(&conn).unwrap().is_empty());
    }
}
