//! Main application UI and state management.
//! Shows the problem lists with their review status, the upcoming review
//! forecast, and the progress import/export controls.

use codetrack::database::db;
use codetrack::export::json::{default_export_name, export_progress_to_path, import_progress};
use codetrack::models::filter::categories;
use chrono::NaiveDate;
use codetrack::AppConfig;
use codetrack::models::{
    DayBucket, Difficulty, ListStats, Problem, ProblemFilter, ProgressStore, Scheduler,
    daily_forecast, review_status,
};
use eframe::egui;
use rusqlite::Connection;
use tracing::{error, info, warn};

/// Application screen states
#[derive(Default, PartialEq)]
enum AppScreen {
    #[default]
    Problems,
    Forecast,
}

/// `app_state` keys for the UI state kept between sessions
const SELECTED_LIST_KEY: &str = "selected_list";
const FILTERS_KEY: &str = "filters";

/// Days shown in the compact forecast strip, today excluded
const RADAR_DAYS: usize = 5;

const RATING_LABELS: [(u8, &str); 5] = [
    (1, "1 - Struggled"),
    (2, "2 - Hard"),
    (3, "3 - Okay"),
    (4, "4 - Good"),
    (5, "5 - Perfect"),
];

/// Main application state
pub struct TrackerApp {
    conn: Connection,
    config: AppConfig,
    scheduler: Scheduler,

    lists: Vec<String>,
    selected_list: String,
    problems: Vec<Problem>,
    store: ProgressStore,
    today: NaiveDate,

    current_screen: AppScreen,
    filter: ProblemFilter,
    show_explanation: bool,

    show_confirmation_dialog: bool,
    allowed_to_close: bool,
    show_clear_dialog: bool,
    show_result_dialog: bool,
    result_message: String,
}

fn difficulty_color(difficulty: Difficulty) -> egui::Color32 {
    match difficulty {
        Difficulty::Easy => egui::Color32::from_rgb(22, 163, 74),
        Difficulty::Medium => egui::Color32::from_rgb(202, 138, 4),
        Difficulty::Hard => egui::Color32::from_rgb(220, 38, 38),
    }
}

fn performance_color(performance: u8) -> egui::Color32 {
    match performance {
        1 | 2 => egui::Color32::from_rgb(220, 38, 38),
        3 => egui::Color32::from_rgb(202, 138, 4),
        4 | 5 => egui::Color32::from_rgb(22, 163, 74),
        _ => egui::Color32::GRAY,
    }
}

impl eframe::App for TrackerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.render_top_bar(ctx);
        match self.current_screen {
            AppScreen::Problems => self.render_problems_screen(ctx),
            AppScreen::Forecast => self.render_forecast_screen(ctx),
        }

        // Handle window close requests with confirmation dialog
        if ctx.input(|i| i.viewport().close_requested()) && !self.allowed_to_close {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            self.show_confirmation_dialog = true;
        }

        if self.show_confirmation_dialog {
            egui::Window::new("Do you want to quit?")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        if ui.button("No").clicked() {
                            self.show_confirmation_dialog = false;
                            self.allowed_to_close = false;
                        }

                        if ui.button("Yes").clicked() {
                            self.show_confirmation_dialog = false;
                            self.allowed_to_close = true;
                            ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
                        }
                    });
                });
        }

        if self.show_clear_dialog {
            let mut confirmed = false;
            egui::Window::new("Clear all progress?")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label("Every review record in every list will be deleted.");
                    ui.horizontal(|ui| {
                        if ui.button("Cancel").clicked() {
                            self.show_clear_dialog = false;
                        }
                        if ui.button("Clear").clicked() {
                            confirmed = true;
                        }
                    });
                });
            if confirmed {
                self.show_clear_dialog = false;
                self.handle_clear();
            }
        }

        if self.show_result_dialog {
            egui::Window::new("Progress Data")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(&self.result_message);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.show_result_dialog = false;
                    }
                });
        }
    }
}

impl TrackerApp {
    /// Creates the application with lists, problems and progress loaded from the database
    pub fn new(conn: Connection, config: AppConfig) -> db::Result<Self> {
        let lists = db::get_all_lists(&conn)?;
        let selected_list = db::get_setting(SELECTED_LIST_KEY, &conn)?
            .filter(|saved| lists.contains(saved))
            .or_else(|| lists.first().cloned())
            .unwrap_or_default();
        let filter = restore_filter(&conn)?;
        let problems = db::get_problems_for_list(&selected_list, &conn)?;
        let store = db::load_progress(&conn)?;
        let today = db::get_current_date(&conn)?;
        let scheduler = Scheduler::new(config.scheduler.clone());

        info!(lists = lists.len(), records = store.len(), today = %today, "loaded tracker state");

        Ok(Self {
            conn,
            config,
            scheduler,
            lists,
            selected_list,
            problems,
            store,
            today,
            current_screen: AppScreen::Problems,
            filter,
            show_explanation: false,
            show_confirmation_dialog: false,
            allowed_to_close: false,
            show_clear_dialog: false,
            show_result_dialog: false,
            result_message: String::new(),
        })
    }

    /// Saves the selected list and filters so the next session starts from them
    fn save_ui_state(&self) {
        let saved = serde_json::to_string(&self.filter)
            .map_err(db::StorageError::from)
            .and_then(|filters| {
                db::set_setting(SELECTED_LIST_KEY, &self.selected_list, &self.conn)?;
                db::set_setting(FILTERS_KEY, &filters, &self.conn)
            });
        if let Err(e) = saved {
            warn!("failed to save UI state: {e}");
        }
    }

    fn show_message(&mut self, message: String) {
        self.result_message = message;
        self.show_result_dialog = true;
    }

    /// Renders the date, list selector and screen switcher
    fn render_top_bar(&mut self, ctx: &egui::Context) {
        let mut action_select: Option<String> = None;
        let mut action_next_day = false;

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(format!("CodeTrack - {}", self.selected_list));
                ui.separator();

                ui.label(self.today.format("%Y-%m-%d").to_string());
                if ui.button("Next Day").clicked() {
                    action_next_day = true;
                }
                ui.separator();

                egui::ComboBox::from_id_source("list_select")
                    .selected_text(self.selected_list.as_str())
                    .show_ui(ui, |ui| {
                        for list in &self.lists {
                            if ui
                                .selectable_label(*list == self.selected_list, list.as_str())
                                .clicked()
                            {
                                action_select = Some(list.clone());
                            }
                        }
                    });
                ui.separator();

                ui.selectable_value(&mut self.current_screen, AppScreen::Problems, "Problems");
                ui.selectable_value(&mut self.current_screen, AppScreen::Forecast, "Forecast");
            });
        });

        if action_next_day {
            match db::advance_day(&self.conn) {
                Ok(date) => self.today = date,
                Err(e) => self.show_message(format!("Failed to advance the date: {e}")),
            }
        }
        if let Some(list) = action_select {
            self.select_list(list);
        }
    }

    /// Renders stats, forecast strip, filters, data controls and the problem table
    fn render_problems_screen(&mut self, ctx: &egui::Context) {
        let mut action_review: Option<(String, u8)> = None;
        let mut action_export = false;
        let mut action_import = false;
        let filter_before = self.filter.clone();

        egui::CentralPanel::default().show(ctx, |ui| {
            let empty = Default::default();
            let list_progress = self.store.list(&self.selected_list).unwrap_or(&empty);

            if ui
                .button(if self.show_explanation {
                    "Hide Spaced Repetition Info"
                } else {
                    "Show Spaced Repetition Info"
                })
                .clicked()
            {
                self.show_explanation = !self.show_explanation;
            }
            if self.show_explanation {
                ui.group(|ui| {
                    ui.label("Reviews are planned by a fair scheduler:");
                    ui.label("- Rate your performance (1-5) after solving each problem.");
                    ui.label("- 1-2 (Struggled): review again tomorrow.");
                    ui.label("- 3 (Okay): interval grows 1.5x.");
                    ui.label("- 4-5 (Good): interval grows 2.5x.");
                    ui.label(format!(
                        "- At most {} reviews per day. Struggling reviews push comfortable ones to later days; the rest spread to nearby days.",
                        self.scheduler.config().daily_limit
                    ));
                });
            }
            ui.separator();

            // Stats
            let stats = ListStats::compute(&self.problems, list_progress, self.today);
            ui.horizontal(|ui| {
                ui.label(format!(
                    "Mastered: {} / {} ({:.0}%)",
                    stats.mastered,
                    stats.total,
                    stats.mastered_percent()
                ));
                ui.colored_label(difficulty_color(Difficulty::Easy), format!("Easy {}", stats.easy));
                ui.colored_label(
                    difficulty_color(Difficulty::Medium),
                    format!("Medium {}", stats.medium),
                );
                ui.colored_label(difficulty_color(Difficulty::Hard), format!("Hard {}", stats.hard));
                ui.label(format!("Due today: {}", stats.due_today));
            });

            // Forecast strip, all lists combined
            let radar = daily_forecast(&self.store, RADAR_DAYS + 1, self.today);
            ui.horizontal(|ui| {
                ui.label("Upcoming:");
                for bucket in radar.iter().skip(1) {
                    ui.label(format!("+{}d: {}", bucket.label, bucket.tasks.len()));
                }
            });
            ui.separator();

            // Filters
            let topics = categories(&self.problems);
            ui.horizontal(|ui| {
                egui::ComboBox::from_label("Category")
                    .selected_text(self.filter.category.as_deref().unwrap_or("All"))
                    .show_ui(ui, |ui| {
                        ui.selectable_value(&mut self.filter.category, None, "All");
                        for topic in topics {
                            let text = topic.clone();
                            ui.selectable_value(&mut self.filter.category, Some(topic), text);
                        }
                    });

                egui::ComboBox::from_label("Difficulty")
                    .selected_text(self.filter.difficulty.map_or("All", Difficulty::as_str))
                    .show_ui(ui, |ui| {
                        ui.selectable_value(&mut self.filter.difficulty, None, "All");
                        for difficulty in Difficulty::ALL {
                            ui.selectable_value(
                                &mut self.filter.difficulty,
                                Some(difficulty),
                                difficulty.as_str(),
                            );
                        }
                    });

                ui.checkbox(&mut self.filter.due_only, "Due only");
            });

            // Import/Export buttons
            ui.horizontal(|ui| {
                if ui.button("Export Progress").clicked() {
                    action_export = true;
                }
                if ui.button("Import Progress").clicked() {
                    action_import = true;
                }
                if ui.button("Clear Progress").clicked() {
                    self.show_clear_dialog = true;
                }
            });
            ui.separator();

            let visible = self.filter.apply(&self.problems, list_progress, self.today);
            ui.heading(format!("Problems ({})", visible.len()));

            egui::ScrollArea::vertical()
                .id_source("problems_list")
                .show(ui, |ui| {
                    egui::Grid::new("problems_grid")
                        .striped(true)
                        .num_columns(6)
                        .show(ui, |ui| {
                            ui.strong("#");
                            ui.strong("Name");
                            ui.strong("Category");
                            ui.strong("Difficulty");
                            ui.strong("Status");
                            ui.strong("Reviews & Due Dates");
                            ui.end_row();

                            for (i, problem) in visible.iter().enumerate() {
                                let status = review_status(&problem.id, list_progress, self.today);
                                let record = list_progress.get(&problem.id);

                                ui.label(format!("{}", i + 1));
                                ui.label(&problem.title);
                                ui.label(problem.topics.join(", "));
                                ui.colored_label(
                                    difficulty_color(problem.difficulty),
                                    problem.difficulty.as_str(),
                                );
                                ui.label(status.label());

                                ui.horizontal(|ui| {
                                    if let Some(record) = record.filter(|r| r.solved) {
                                        let performance = record.performance.unwrap_or(0);
                                        ui.colored_label(
                                            performance_color(performance),
                                            format!("{}x", record.reviews),
                                        );
                                        if let Some(next) = record.next_review {
                                            ui.label(format!(
                                                "Next: {} ({}d)",
                                                next.format("%b %-d"),
                                                record.interval
                                            ));
                                        }
                                    }
                                    if status.can_review() {
                                        for (rating, label) in RATING_LABELS {
                                            if ui
                                                .small_button(rating.to_string())
                                                .on_hover_text(label)
                                                .clicked()
                                            {
                                                action_review = Some((problem.id.clone(), rating));
                                            }
                                        }
                                    }
                                });
                                ui.end_row();
                            }
                        });
                });
        });

        if self.filter != filter_before {
            self.save_ui_state();
        }

        // Execute deferred actions
        if let Some((problem_id, rating)) = action_review {
            self.handle_review(&problem_id, rating);
        }
        if action_export {
            self.handle_export();
        }
        if action_import {
            self.handle_import();
        }
    }

    /// Renders one row per forecast day with the reviews planned for it
    fn render_forecast_screen(&mut self, ctx: &egui::Context) {
        let forecast: Vec<DayBucket> =
            daily_forecast(&self.store, self.config.forecast_days, self.today);
        let limit = self.scheduler.config().daily_limit;

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Review Forecast");
            ui.label(format!("Daily limit: {limit} reviews across all lists"));
            ui.separator();

            egui::ScrollArea::vertical()
                .id_source("forecast_list")
                .show(ui, |ui| {
                    for bucket in &forecast {
                        ui.group(|ui| {
                            let title = if bucket.day_index == 0 {
                                format!("Today ({})", bucket.date)
                            } else {
                                format!("Day {} ({})", bucket.label, bucket.date)
                            };
                            ui.strong(format!("{title} - {} / {limit}", bucket.tasks.len()));

                            for task in &bucket.tasks {
                                ui.colored_label(
                                    performance_color(task.performance),
                                    format!("{} / {}", task.list, task.id),
                                );
                            }
                        });
                    }
                });
        });
    }

    fn select_list(&mut self, list: String) {
        match db::get_problems_for_list(&list, &self.conn) {
            Ok(problems) => {
                self.problems = problems;
                self.selected_list = list;
                self.filter = ProblemFilter::default();
                self.save_ui_state();
            }
            Err(e) => self.show_message(format!("Failed to load list '{list}': {e}")),
        }
    }

    /// Schedules the next review for a rated problem and saves every changed record
    fn handle_review(&mut self, problem_id: &str, rating: u8) {
        let Some(problem) = self.problems.iter().find(|p| p.id == problem_id).cloned() else {
            return;
        };
        let current = self.store.get(&self.selected_list, problem_id);

        let updates = match self.scheduler.schedule_review(
            &problem,
            current,
            rating,
            &self.store,
            &self.selected_list,
            self.today,
        ) {
            Ok(updates) => updates,
            Err(e) => {
                error!(problem = problem_id, "scheduling failed: {e}");
                self.show_message(format!("Could not schedule '{}': {e}", problem.title));
                return;
            }
        };

        match db::save_updates(&updates, &self.conn) {
            Ok(()) => self.store.apply_updates(updates),
            Err(e) => self.show_message(format!("Failed to save review: {e}")),
        }
    }

    /// Reloads the progress snapshot after a bulk change
    fn reload_progress(&mut self) -> db::Result<()> {
        self.store = db::load_progress(&self.conn)?;
        Ok(())
    }

    /// Handles progress export to a JSON file
    fn handle_export(&mut self) {
        // Open file save dialog
        if let Some(path) = rfd::FileDialog::new()
            .set_file_name(default_export_name(self.today))
            .add_filter("JSON files", &["json"])
            .save_file()
        {
            match export_progress_to_path(&self.store, &path) {
                Ok(()) => self.show_message("Progress exported successfully!".to_string()),
                Err(e) => self.show_message(format!("Export failed: {e}")),
            }
        }
    }

    /// Handles progress import from a JSON file. The file replaces all current progress.
    fn handle_import(&mut self) {
        // Open file selection dialog
        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON files", &["json"])
            .pick_file()
        else {
            return;
        };

        let imported = match import_progress(&path) {
            Ok(store) => store,
            Err(e) => {
                self.show_message(format!(
                    "Error importing file: {e}\n\nExpected structure:\n{{\n  \"List Name\": {{ \"problem-id\": {{ ... }} }}\n}}"
                ));
                return;
            }
        };

        let result = db::replace_progress(&imported, &self.conn).and_then(|()| self.reload_progress());
        match result {
            Ok(()) => self.show_message(format!(
                "Progress imported successfully! ({} records)",
                imported.len()
            )),
            Err(e) => self.show_message(format!("Import failed: {e}")),
        }
    }

    fn handle_clear(&mut self) {
        let result = db::clear_progress(&self.conn).and_then(|_| self.reload_progress());
        if let Err(e) = result {
            self.show_message(format!("Failed to clear progress: {e}"));
        }
    }
}

/// Filters from the last session. An unreadable value starts from "show all".
fn restore_filter(conn: &Connection) -> db::Result<ProblemFilter> {
    let Some(saved) = db::get_setting(FILTERS_KEY, conn)? else {
        return Ok(ProblemFilter::default());
    };
    Ok(serde_json::from_str(&saved).unwrap_or_else(|e| {
        warn!("ignoring saved filters: {e}");
        ProblemFilter::default()
    }))
}
