//! Application state management for Rollcall.
//!
//! The `App` struct owns the tracker, executes the side effects its
//! mutations request, and holds the UI state (selection, overlays, status
//! message).

use tracing::{error, info};

use crate::models::MAX_SUBJECTS;
use crate::store::SubjectStore;
use crate::tracker::{AttendanceError, Effect, Tracker};

/// Maximum length for a subject name in the add overlay.
const MAX_NAME_LENGTH: usize = 30;

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    AddingSubject,
    ConfirmingDelete,
    ShowingHelp,
}

pub struct App {
    pub state: AppState,
    pub tracker: Tracker,
    pub selected: usize,
    pub name_input: String,
    pub status_message: Option<String>,
    /// Cached header statistics, refreshed by the Rerender effect.
    pub average: u32,
    store: SubjectStore,
}

impl App {
    pub fn new(store: SubjectStore) -> Self {
        let subjects = store.load();
        info!(count = subjects.len(), "loaded subject collection");
        let tracker = Tracker::new(subjects);
        let average = tracker.average_attendance();

        Self {
            state: AppState::Normal,
            tracker,
            selected: 0,
            name_input: String::new(),
            status_message: None,
            average,
            store,
        }
    }

    /// Carry out the side effects a tracker mutation requested.
    fn apply_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Persist => {
                    if let Err(e) = self.store.save(self.tracker.subjects()) {
                        error!(error = %e, "failed to persist subjects");
                        self.status_message = Some("Warning: could not save data".to_string());
                    }
                }
                Effect::Rerender => {
                    self.average = self.tracker.average_attendance();
                }
            }
        }
    }

    fn report(&mut self, error: AttendanceError) {
        self.status_message = Some(error.to_string());
    }

    /// Open the add-subject overlay, unless the collection is full.
    pub fn start_add_subject(&mut self) {
        if self.tracker.is_full() {
            self.report(AttendanceError::CapacityExceeded);
            return;
        }
        self.name_input.clear();
        self.state = AppState::AddingSubject;
    }

    /// Submit the add overlay's input. Stays in the overlay on a
    /// validation error so the name can be corrected.
    pub fn submit_add_subject(&mut self) {
        let name = self.name_input.clone();
        match self.tracker.add_subject(&name) {
            Ok(effects) => {
                self.apply_effects(effects);
                self.selected = self.tracker.len() - 1;
                self.name_input.clear();
                self.status_message = None;
                self.state = AppState::Normal;
            }
            Err(e) => self.report(e),
        }
    }

    pub fn cancel_add_subject(&mut self) {
        self.name_input.clear();
        self.status_message = None;
        self.state = AppState::Normal;
    }

    pub fn push_name_char(&mut self, c: char) {
        if self.name_input.chars().count() < MAX_NAME_LENGTH {
            self.name_input.push(c);
        }
    }

    pub fn pop_name_char(&mut self) {
        self.name_input.pop();
    }

    /// Record one class for the selected subject.
    pub fn mark_selected(&mut self, present: bool) {
        match self.tracker.mark_attendance(self.selected, present) {
            Ok(effects) => {
                self.apply_effects(effects);
                self.status_message = None;
            }
            Err(e) => self.report(e),
        }
    }

    /// Ask for confirmation before deleting the selected subject.
    pub fn start_delete_subject(&mut self) {
        if self.tracker.get(self.selected).is_some() {
            self.state = AppState::ConfirmingDelete;
        }
    }

    /// Delete the selected subject after the user confirmed.
    pub fn confirm_delete_subject(&mut self) {
        match self.tracker.delete_subject(self.selected) {
            Ok(effects) => {
                self.apply_effects(effects);
                if self.selected >= self.tracker.len() {
                    self.selected = self.tracker.len().saturating_sub(1);
                }
                self.status_message = None;
            }
            Err(e) => self.report(e),
        }
        self.state = AppState::Normal;
    }

    pub fn cancel_delete_subject(&mut self) {
        self.state = AppState::Normal;
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.tracker.len() {
            self.selected += 1;
        }
    }

    /// Header counter, e.g. "3/7".
    pub fn subject_count(&self) -> String {
        format!("{}/{}", self.tracker.len(), MAX_SUBJECTS)
    }
}
