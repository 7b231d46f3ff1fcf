mod app;
use codetrack::*;

use app::TrackerApp;
use database::db::{add_problem, get_all_lists, init_database};
use models::{Clock, SystemClock};
use rusqlite::Connection;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Small starter set so a fresh database has something to track
fn seed_sample_problems(conn: &Connection) -> database::db::Result<()> {
    let samples: [(&str, &[(&str, &str, Difficulty, &[&str])]); 3] = [
        (
            "Blind 75",
            &[
                ("two-sum", "Two Sum", Difficulty::Easy, &["Arrays & Hashing"]),
                ("valid-parentheses", "Valid Parentheses", Difficulty::Easy, &["Stack"]),
                ("longest-substring", "Longest Substring Without Repeating Characters", Difficulty::Medium, &["Sliding Window"]),
                ("merge-k-sorted-lists", "Merge K Sorted Lists", Difficulty::Hard, &["Linked List", "Heap"]),
            ],
        ),
        (
            "LeetCode 75",
            &[
                ("merge-strings-alternately", "Merge Strings Alternately", Difficulty::Easy, &["Array / String"]),
                ("max-vowels", "Maximum Number of Vowels in a Substring", Difficulty::Medium, &["Sliding Window"]),
                ("asteroid-collision", "Asteroid Collision", Difficulty::Medium, &["Stack"]),
            ],
        ),
        (
            "NeetCode 150",
            &[
                ("contains-duplicate", "Contains Duplicate", Difficulty::Easy, &["Arrays & Hashing"]),
                ("group-anagrams", "Group Anagrams", Difficulty::Medium, &["Arrays & Hashing"]),
                ("trapping-rain-water", "Trapping Rain Water", Difficulty::Hard, &["Two Pointers"]),
                ("lru-cache", "LRU Cache", Difficulty::Medium, &["Linked List"]),
            ],
        ),
    ];

    for (list, problems) in samples {
        for &(id, title, difficulty, topics) in problems {
            add_problem(list, &Problem::new(id, title, difficulty).with_topics(topics), conn)?;
        }
    }
    Ok(())
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = AppConfig::from_env();

    let conn = match init_database(&config.db_path, SystemClock.today()) {
        Ok(conn) => conn,
        Err(e) => {
            error!(path = %config.db_path, "failed to initialize database: {e}");
            std::process::exit(1);
        }
    };

    match get_all_lists(&conn) {
        Ok(lists) if lists.is_empty() => match seed_sample_problems(&conn) {
            Ok(()) => info!("sample problem lists created"),
            Err(e) => error!("failed to seed sample problems: {e}"),
        },
        Ok(_) => {}
        Err(e) => error!("failed to read problem lists, skipping sample data: {e}"),
    }

    let app = match TrackerApp::new(conn, config) {
        Ok(app) => app,
        Err(e) => {
            error!("failed to load progress: {e}");
            std::process::exit(1);
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1000.0, 750.0]),
        ..Default::default()
    };
    eframe::run_native(
        "CodeTrack",
        options,
        Box::new(|_cc| Ok(Box::new(app))),
    )
}
