// src/app.rs

use crate::config::Config;
use crate::core::checkin_log::CheckInLog;
use crate::core::export;
use crate::core::models::{CheckInMethod, ContentKind, ScanEvent, ScanOutcome, Verdict};
use crate::core::progress::ScanProgress;
use crate::core::scanner::ScanRequest;
use crate::logging;
use ratatui::widgets::{ListState, ScrollbarState};
use std::path::Path;
use std::sync::Arc;
use strum::Display;
use tracing::{error, info};

pub const SPINNER_CHARS: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// How many log lines the log panel keeps.
const LOG_TAIL_LINES: usize = 200;

pub enum ExportStatus {
    Idle,
    Success(String),
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Idle,
    Scanning,
    Finished,
}

/// The two simulated screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Screen {
    Moderation,
    #[strum(to_string = "Check-in")]
    CheckIn,
}

#[derive(Debug, Default)]
pub struct ScanSummary {
    /// Safety score for moderation, compliance rate for check-ins.
    pub score: u8,
    /// Tripped categories, or failed compliance checks.
    pub flagged: usize,
    pub checks_passed: usize,
    pub checks_total: usize,
}

pub struct App {
    pub should_quit: bool,
    pub show_disclaimer: bool,
    pub show_logs: bool,
    pub screen: Screen,
    pub state: AppState,
    pub input: String,
    pub content_kind: ContentKind,
    pub checkin_method: CheckInMethod,
    pub progress: ScanProgress,
    pub spinner_frame: usize,
    pub verdict: Option<Verdict>,
    pub checkin_log: CheckInLog,
    pub summary: ScanSummary,
    pub displayed_score: u8,
    pub analysis_list_state: ListState,
    pub log_content: Vec<String>,
    pub log_horizontal_scroll: usize,
    pub log_horizontal_scroll_state: ScrollbarState,
    pub export_status: ExportStatus,
    pub config: Arc<Config>,
}

impl App {
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            should_quit: false,
            show_disclaimer: true,
            show_logs: false,
            screen: Screen::Moderation,
            state: AppState::Idle,
            input: String::new(),
            content_kind: ContentKind::default(),
            checkin_method: CheckInMethod::default(),
            progress: ScanProgress::new(),
            spinner_frame: 0,
            verdict: None,
            checkin_log: CheckInLog::new(),
            summary: ScanSummary::default(),
            displayed_score: 0,
            analysis_list_state: ListState::default(),
            log_content: Vec::new(),
            log_horizontal_scroll: 0,
            log_horizontal_scroll_state: ScrollbarState::default(),
            export_status: ExportStatus::Idle,
            config,
        }
    }

    // --- Scan lifecycle ---

    /// Moves into `Scanning` and returns the request to simulate.
    ///
    /// Returns `None` if a scan is already running.
    pub fn start_scan(&mut self) -> Option<ScanRequest> {
        if self.state != AppState::Idle {
            return None;
        }
        let request = match self.screen {
            Screen::Moderation => ScanRequest::Moderation {
                kind: self.content_kind,
                text_len: self.input.chars().count(),
            },
            Screen::CheckIn => ScanRequest::CheckIn {
                subject_id: self.input.clone(),
                method: self.checkin_method,
            },
        };
        self.state = AppState::Scanning;
        self.progress = ScanProgress::new();
        self.export_status = ExportStatus::Idle;
        info!(screen = %self.screen, "Scan triggered.");
        Some(request)
    }

    /// Applies a message from the scan task.
    pub fn apply_event(&mut self, event: ScanEvent) {
        match event {
            ScanEvent::Progress(percent) => {
                self.progress.advance_to(percent);
            }
            ScanEvent::Completed(outcome) => {
                self.progress.complete();
                match outcome {
                    ScanOutcome::Moderation(verdict) => self.verdict = Some(verdict),
                    ScanOutcome::CheckIn(record) => self.checkin_log.append(record),
                }
                self.state = AppState::Finished;
                self.displayed_score = 0;
                self.analysis_list_state.select(None);
                self.update_summary();
            }
        }
    }

    /// Whether the result may be shown: the scan finished and progress reached 100.
    pub fn result_visible(&self) -> bool {
        self.state == AppState::Finished && self.progress.is_complete()
    }

    pub fn update_summary(&mut self) {
        self.summary = match self.screen {
            Screen::Moderation => match &self.verdict {
                Some(verdict) => {
                    let total = verdict.category_flags.len();
                    let flagged = verdict.tripped().count();
                    ScanSummary {
                        score: verdict.safety_score,
                        flagged,
                        checks_passed: total - flagged,
                        checks_total: total,
                    }
                }
                None => ScanSummary::default(),
            },
            Screen::CheckIn => match self.checkin_log.latest() {
                Some(latest) => {
                    let c = &latest.compliance;
                    let passed = [c.within_geofence, c.identity_verified, c.on_schedule]
                        .iter()
                        .filter(|ok| **ok)
                        .count();
                    ScanSummary {
                        score: self.checkin_log.compliance_rate().unwrap_or(0),
                        flagged: 3 - passed,
                        checks_passed: passed,
                        checks_total: 3,
                    }
                }
                None => ScanSummary::default(),
            },
        };
    }

    /// Advances the spinner and animates the summary gauge toward the real score.
    pub fn on_tick(&mut self) {
        if self.state == AppState::Scanning {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_CHARS.len();
        }
        if self.state == AppState::Finished && self.displayed_score < self.summary.score {
            self.displayed_score = self.displayed_score.saturating_add(2).min(self.summary.score);
        }
        if self.show_logs {
            self.refresh_logs();
        }
    }

    // --- Navigation ---

    /// Number of entries in the result list for the current screen.
    pub fn list_len(&self) -> usize {
        match self.screen {
            Screen::Moderation => self.verdict.as_ref().map_or(0, |v| v.category_flags.len()),
            Screen::CheckIn => self.checkin_log.len(),
        }
    }

    pub fn scroll_up(&mut self) {
        let selected = self.analysis_list_state.selected().map_or(0, |i| i.saturating_sub(1));
        if self.list_len() > 0 {
            self.analysis_list_state.select(Some(selected));
        }
    }

    pub fn scroll_down(&mut self) {
        let len = self.list_len();
        if len == 0 {
            return;
        }
        let selected = self.analysis_list_state.selected().map_or(0, |i| (i + 1).min(len - 1));
        self.analysis_list_state.select(Some(selected));
    }

    pub fn scroll_logs_left(&mut self) {
        self.log_horizontal_scroll = self.log_horizontal_scroll.saturating_sub(4);
        self.log_horizontal_scroll_state =
            self.log_horizontal_scroll_state.position(self.log_horizontal_scroll);
    }

    pub fn scroll_logs_right(&mut self) {
        self.log_horizontal_scroll = self.log_horizontal_scroll.saturating_add(4);
        self.log_horizontal_scroll_state =
            self.log_horizontal_scroll_state.position(self.log_horizontal_scroll);
    }

    pub fn switch_screen(&mut self) {
        if self.state == AppState::Scanning {
            return;
        }
        self.screen = match self.screen {
            Screen::Moderation => Screen::CheckIn,
            Screen::CheckIn => Screen::Moderation,
        };
        self.reset();
    }

    pub fn next_option(&mut self) {
        match self.screen {
            Screen::Moderation => self.content_kind = self.content_kind.next(),
            Screen::CheckIn => self.checkin_method = self.checkin_method.next(),
        }
    }

    pub fn previous_option(&mut self) {
        match self.screen {
            Screen::Moderation => self.content_kind = self.content_kind.previous(),
            Screen::CheckIn => self.checkin_method = self.checkin_method.previous(),
        }
    }

    pub fn toggle_logs(&mut self) {
        self.show_logs = !self.show_logs;
        if self.show_logs {
            self.refresh_logs();
        }
    }

    pub fn refresh_logs(&mut self) {
        self.log_content = logging::read_log_tail(LOG_TAIL_LINES);
    }

    // --- Export ---

    pub fn export(&mut self) {
        self.export_to(&logging::get_data_dir());
    }

    /// Exports the current result into `dir` and records the outcome for the footer.
    pub fn export_to(&mut self, dir: &Path) {
        let result = match self.screen {
            Screen::Moderation => match &self.verdict {
                Some(verdict) => export::write_json(dir, "verdict", verdict),
                None => return,
            },
            Screen::CheckIn => {
                if self.checkin_log.is_empty() {
                    return;
                }
                export::write_json(dir, "check-ins", self.checkin_log.records())
            }
        };
        self.export_status = match result {
            Ok(path) => ExportStatus::Success(path.display().to_string()),
            Err(e) => {
                error!(error = ?e, "Export failed.");
                ExportStatus::Error(e.to_string())
            }
        };
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Clears the current result and returns to `Idle`. The check-in history is kept.
    pub fn reset(&mut self) {
        self.state = AppState::Idle;
        self.input = String::new();
        self.verdict = None;
        self.progress = ScanProgress::new();
        self.summary = ScanSummary::default();
        self.displayed_score = 0;
        self.analysis_list_state = ListState::default();
        self.export_status = ExportStatus::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::CheckInRecord;
    use crate::core::scanner::produce_outcome;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn app() -> App {
        App::new(Arc::new(Config::default()))
    }

    fn finish(app: &mut App, request: &ScanRequest, seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        let outcome = produce_outcome(request, &app.config, &mut rng);
        app.apply_event(ScanEvent::Progress(40));
        app.apply_event(ScanEvent::Progress(100));
        app.apply_event(ScanEvent::Completed(outcome));
    }

    #[test]
    fn scan_lifecycle_moderation() {
        let mut app = app();
        app.input = "hello 2050".into();
        let request = app.start_scan().unwrap();
        assert_eq!(app.state, AppState::Scanning);
        assert!(app.start_scan().is_none());
        assert!(matches!(request, ScanRequest::Moderation { text_len: 10, .. }));

        assert!(!app.result_visible());
        finish(&mut app, &request, 9);
        assert_eq!(app.state, AppState::Finished);
        assert!(app.progress.is_complete());
        assert!(app.result_visible());
        let verdict = app.verdict.as_ref().unwrap();
        assert_eq!(app.summary.score, verdict.safety_score);
        assert_eq!(app.summary.checks_total, verdict.category_flags.len());
    }

    #[test]
    fn progress_never_moves_backwards() {
        let mut app = app();
        app.start_scan();
        app.apply_event(ScanEvent::Progress(50));
        app.apply_event(ScanEvent::Progress(20));
        assert_eq!(app.progress.percent(), 50);
    }

    #[test]
    fn check_ins_accumulate_across_resets() {
        let mut app = app();
        app.switch_screen();
        assert_eq!(app.screen, Screen::CheckIn);

        for seed in 0..3 {
            let request = app.start_scan().unwrap();
            finish(&mut app, &request, seed);
            app.reset();
        }
        assert_eq!(app.checkin_log.len(), 3);
        assert_eq!(app.list_len(), 3);
    }

    #[test]
    fn gauge_animates_up_to_score() {
        let mut app = app();
        let request = app.start_scan().unwrap();
        finish(&mut app, &request, 1);
        for _ in 0..100 {
            app.on_tick();
        }
        assert_eq!(app.displayed_score, app.summary.score);
    }

    #[test]
    fn selection_is_clamped_to_list() {
        let mut app = app();
        app.scroll_down();
        assert_eq!(app.analysis_list_state.selected(), None);

        let request = app.start_scan().unwrap();
        finish(&mut app, &request, 2);
        let len = app.list_len();
        for _ in 0..len + 5 {
            app.scroll_down();
        }
        assert_eq!(app.analysis_list_state.selected(), Some(len - 1));
        for _ in 0..len + 5 {
            app.scroll_up();
        }
        assert_eq!(app.analysis_list_state.selected(), Some(0));
    }

    #[test]
    fn export_writes_file_and_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app();
        app.export_to(dir.path());
        assert!(matches!(app.export_status, ExportStatus::Idle));

        let request = app.start_scan().unwrap();
        finish(&mut app, &request, 3);
        app.export_to(dir.path());
        match &app.export_status {
            ExportStatus::Success(path) => assert!(Path::new(path).exists()),
            _ => panic!("export did not succeed"),
        }
    }

    #[test]
    fn export_writes_check_in_history() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app();
        app.switch_screen();
        app.export_to(dir.path());
        assert!(matches!(app.export_status, ExportStatus::Idle));

        for seed in 0..2 {
            let request = app.start_scan().unwrap();
            finish(&mut app, &request, seed);
            app.reset();
        }
        let request = app.start_scan().unwrap();
        finish(&mut app, &request, 7);
        app.export_to(dir.path());

        let path = match &app.export_status {
            ExportStatus::Success(path) => path.clone(),
            _ => panic!("check-in export did not succeed"),
        };
        let contents = std::fs::read_to_string(&path).unwrap();
        let records: Vec<CheckInRecord> = serde_json::from_str(&contents).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[2].id, app.checkin_log.latest().unwrap().id);
    }

    #[test]
    fn selectors_follow_screen() {
        let mut app = app();
        app.next_option();
        assert_eq!(app.content_kind, ContentKind::Image);
        app.switch_screen();
        app.previous_option();
        assert_eq!(app.checkin_method, CheckInMethod::Manual);
    }
}
