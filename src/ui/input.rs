//! Input handling for the TUI.
//!
//! While an overlay is open its modal captures every key; otherwise keys go
//! to the menu shortcuts and then to the focused list.

use crate::app::{App, Button};
use crate::nav::{NavState, OverlayKind};
use crossterm::event::{KeyCode, KeyModifiers};

use super::Action;

/// Main input dispatch function.
pub fn handle_key(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Action {
    if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
        return Action::Quit;
    }

    match app.nav.state() {
        NavState::Overlay(_) => handle_modal_input(app, code),
        NavState::Browsing => handle_browse_input(app, code),
    }
}

fn handle_modal_input(app: &mut App, code: KeyCode) -> Action {
    let Some(modal) = app.modal.as_mut() else {
        return Action::Continue;
    };

    let button = match code {
        KeyCode::Left | KeyCode::BackTab => {
            modal.select_prev();
            None
        }
        KeyCode::Right | KeyCode::Tab => {
            modal.select_next();
            None
        }
        KeyCode::Enter | KeyCode::Char(' ') => Some(modal.selected_button()),
        KeyCode::Esc => modal.cancel_button(),
        KeyCode::Char('y') | KeyCode::Char('Y') => Some(Button::Yes),
        KeyCode::Char('n') | KeyCode::Char('N') => Some(Button::No),
        _ => None,
    };

    match button {
        Some(button) => app.press_button(button),
        None => Action::Continue,
    }
}

fn handle_browse_input(app: &mut App, code: KeyCode) -> Action {
    let overlay = match code {
        KeyCode::Char('q') => Some(OverlayKind::Quit),
        KeyCode::Char('h') => Some(OverlayKind::Help),
        KeyCode::Char('r') => Some(OverlayKind::Refresh),
        _ => None,
    };
    if let Some(kind) = overlay {
        if let Err(e) = app.open_overlay(kind) {
            tracing::debug!(error = %e, ?kind, "Overlay not opened");
        }
        return Action::Continue;
    }

    match code {
        KeyCode::Down | KeyCode::Char('j') => app.move_selection(true),
        KeyCode::Up | KeyCode::Char('k') => app.move_selection(false),
        KeyCode::Enter => app.activate(),
        KeyCode::Esc => app.back(),
        _ => {}
    }
    Action::Continue
}
