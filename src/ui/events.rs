//! Background event processing.

use crate::app::{App, AppEvent};

/// Apply a background event to the application state.
pub fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::RefreshFinished {
            generation,
            outcome,
        } => {
            tracing::debug!(generation, ok = outcome.is_ok(), "Refresh finished");
            app.apply_refresh_outcome(generation, outcome);
        }
    }
}
