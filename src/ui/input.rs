//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{App, AppState};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }

    // Handle the add-subject overlay
    if matches!(app.state, AppState::AddingSubject) {
        match key.code {
            KeyCode::Enter => app.submit_add_subject(),
            KeyCode::Esc => app.cancel_add_subject(),
            KeyCode::Backspace => app.pop_name_char(),
            KeyCode::Char(c) => app.push_name_char(c),
            _ => {}
        }
        return Ok(false);
    }

    // Handle delete confirmation
    if matches!(app.state, AppState::ConfirmingDelete) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.confirm_delete_subject();
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.cancel_delete_subject();
            }
            _ => {}
        }
        return Ok(false);
    }

    // Normal mode
    match key.code {
        KeyCode::Char('q') => return Ok(true),
        KeyCode::Char('?') => app.state = AppState::ShowingHelp,
        KeyCode::Char('a') => app.start_add_subject(),
        KeyCode::Char('p') => app.mark_selected(true),
        KeyCode::Char('x') => app.mark_selected(false),
        KeyCode::Char('d') => app.start_delete_subject(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Esc => app.status_message = None,
        _ => {}
    }

    Ok(false)
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyEvent, KeyModifiers};

    use super::*;
    use crate::store::SubjectStore;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn test_app() -> (App, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = SubjectStore::new(dir.path().to_path_buf());
        (App::new(store), dir)
    }

    #[test]
    fn test_quit_key() {
        let (mut app, _dir) = test_app();
        assert!(handle_input(&mut app, key(KeyCode::Char('q'))).unwrap());
    }

    #[test]
    fn test_add_overlay_typing() {
        let (mut app, _dir) = test_app();
        handle_input(&mut app, key(KeyCode::Char('a'))).unwrap();
        assert_eq!(app.state, AppState::AddingSubject);

        for c in "Math".chars() {
            handle_input(&mut app, key(KeyCode::Char(c))).unwrap();
        }
        handle_input(&mut app, key(KeyCode::Backspace)).unwrap();
        assert_eq!(app.name_input, "Mat");

        handle_input(&mut app, key(KeyCode::Esc)).unwrap();
        assert_eq!(app.state, AppState::Normal);
        assert!(app.tracker.is_empty());
    }

    #[test]
    fn test_delete_confirmation_keys() {
        let (mut app, _dir) = test_app();
        app.tracker.add_subject("Math").unwrap();

        handle_input(&mut app, key(KeyCode::Char('d'))).unwrap();
        assert_eq!(app.state, AppState::ConfirmingDelete);
        handle_input(&mut app, key(KeyCode::Char('n'))).unwrap();
        assert_eq!(app.tracker.len(), 1);

        handle_input(&mut app, key(KeyCode::Char('d'))).unwrap();
        handle_input(&mut app, key(KeyCode::Char('y'))).unwrap();
        assert!(app.tracker.is_empty());
    }

    #[test]
    fn test_help_toggle() {
        let (mut app, _dir) = test_app();
        handle_input(&mut app, key(KeyCode::Char('?'))).unwrap();
        assert_eq!(app.state, AppState::ShowingHelp);
        handle_input(&mut app, key(KeyCode::Esc)).unwrap();
        assert_eq!(app.state, AppState::Normal);
    }
}
