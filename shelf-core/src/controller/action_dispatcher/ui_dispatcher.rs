//! action_dispatcher/ui_dispatcher.rs
//! Overlays, notifications and quitting

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;

use super::{ActionMatcher, ActionPriority, DispatchResult};
use crate::controller::{Action, state_coordinator::StateCoordinator};
use crate::model::{RedrawFlag, UIOverlay};

/// UI control dispatcher for overlays and interface state
pub struct UIControlDispatcher {
    state: Arc<StateCoordinator>,
}

impl UIControlDispatcher {
    pub fn new(state: Arc<StateCoordinator>) -> Self {
        Self { state }
    }

    fn toggle_help(&self) -> DispatchResult {
        self.state.update_ui_state(|ui| {
            if ui.overlay == UIOverlay::Help {
                ui.close_overlay();
            } else {
                ui.open_overlay(UIOverlay::Help);
            }
        });
        DispatchResult::Continue
    }

    fn close_overlay(&self) -> DispatchResult {
        let closing = self.state.ui_state().overlay;
        if closing == UIOverlay::Details {
            self.state.movies.clear_selection();
        }
        self.state.update_ui_state(|ui| ui.close_overlay());
        DispatchResult::Continue
    }

    fn dismiss(&self) -> DispatchResult {
        if !self.state.is_authenticated() {
            self.state.auth.clear_error();
            self.state.request_redraw(RedrawFlag::Main);
        }
        self.state.update_ui_state(|ui| ui.dismiss_notification());
        DispatchResult::Continue
    }

    /// Tick only counts as handled when something on screen changed.
    fn tick(&self) -> DispatchResult {
        let now = Instant::now();
        if self.state.update_ui_state(|ui| ui.update_notification(now)) {
            DispatchResult::Continue
        } else {
            DispatchResult::NotHandled
        }
    }
}

#[async_trait]
impl ActionMatcher for UIControlDispatcher {
    fn can_handle(&self, action: &Action) -> bool {
        matches!(
            action,
            Action::Quit
                | Action::ToggleHelp
                | Action::CloseOverlay
                | Action::DismissNotification
                | Action::Tick
        )
    }

    async fn handle(&mut self, action: &Action) -> Result<DispatchResult> {
        match action {
            Action::Quit => Ok(DispatchResult::Terminate),
            Action::ToggleHelp => Ok(self.toggle_help()),
            Action::CloseOverlay => Ok(self.close_overlay()),
            Action::DismissNotification => Ok(self.dismiss()),
            Action::Tick => Ok(self.tick()),
            _ => Ok(DispatchResult::NotHandled),
        }
    }

    fn priority(&self) -> ActionPriority {
        ActionPriority::Critical
    }

    fn name(&self) -> &'static str {
        "ui_control"
    }
}
