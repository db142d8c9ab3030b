//! Shared helpers for the dispatchers.

use tracing::debug;

use crate::controller::state_coordinator::StateCoordinator;
use crate::error::{ErrorKind, OpError};
use crate::model::ui_state::RedrawFlag;

pub const SESSION_EXPIRED: &str = "Session expired. Please log in again.";

/// Surface a failed operation. An expired session signs the user out and
/// drops everything loaded under it. Outcomes from before a reset are
/// ignored.
pub fn report_failure(state: &StateCoordinator, what: &str, err: &OpError) {
    if err.is_superseded() {
        debug!(what, "outcome from an earlier session ignored");
        return;
    }
    if err.is_session_expired() {
        state.movies.reset();
        state.update_ui_state(|ui| {
            ui.reset_session_views();
            ui.show_error(SESSION_EXPIRED);
        });
        return;
    }

    state.update_ui_state(|ui| match err.kind {
        ErrorKind::Validation => ui.show_warning(err.message.as_str()),
        _ => ui.show_error(format!("{what}: {err}")),
    });
}

/// Keep the table highlight inside the current page.
pub fn clamp_to_list(state: &StateCoordinator) {
    let len = state.movies.state().movies().len();
    state.update_ui_state(|ui| {
        ui.clamp_selection(len);
        ui.request_redraw(RedrawFlag::All);
    });
}

/// Quote a title for notifications.
pub fn quoted(title: &str) -> String {
    format!("\"{title}\"")
}
