// shelf-core/src/controller/action_dispatcher/navigation_dispatcher.rs
// Table selection, paging, sorting and list refresh

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::controller::Action;
use crate::controller::event_loop::TaskResult;
use crate::controller::state_coordinator::StateCoordinator;
use crate::error::OpError;
use crate::model::ui_state::RedrawFlag;

use super::utils::{clamp_to_list, report_failure};
use super::{ActionMatcher, ActionPriority, DispatchResult};

#[derive(Clone)]
pub struct NavigationDispatcher {
    state: Arc<StateCoordinator>,
    task_tx: UnboundedSender<TaskResult>,
}

impl NavigationDispatcher {
    pub fn new(state: Arc<StateCoordinator>, task_tx: UnboundedSender<TaskResult>) -> Self {
        Self { state, task_tx }
    }

    fn handle_selection(&self, action: &Action) -> Option<DispatchResult> {
        let len = self.state.movies.state().movies().len();
        self.state.update_ui_state(|ui| match action {
            Action::MoveSelectionUp => Some(ui.move_selection_up()),
            Action::MoveSelectionDown => Some(ui.move_selection_down(len)),
            _ => None,
        })?;
        Some(DispatchResult::Continue)
    }

    /// Start a list request; the new page is highlighted from the top.
    fn reload(&self, action: &Action) -> DispatchResult {
        let (has_next, has_prev) = {
            let pagination = self.state.movies.state().pagination();
            (pagination.has_next(), pagination.has_prev())
        };
        let blocked = match action {
            Action::NextPage => !has_next,
            Action::PrevPage => !has_prev,
            _ => false,
        };
        if blocked {
            debug!("page boundary reached; ignoring {:?}", action);
            return DispatchResult::Continue;
        }

        if !matches!(action, Action::Refresh) {
            self.state.update_ui_state(|ui| ui.selected = 0);
        }

        let movies = self.state.movies.clone();
        let action = action.clone();
        self.state.spawn(&self.task_tx, async move {
            let result = match action {
                Action::NextPage => movies.next_page().await,
                Action::PrevPage => movies.prev_page().await,
                Action::CycleSort => movies.cycle_sort().await,
                Action::ToggleOrder => movies.toggle_order().await,
                _ => movies.refresh().await,
            };
            TaskResult::MoviesLoaded(result)
        });
        self.state.request_redraw(RedrawFlag::StatusBar);
        DispatchResult::Continue
    }

    fn handle_loaded(&self, result: &Result<bool, OpError>) -> DispatchResult {
        match result {
            Ok(true) => clamp_to_list(&self.state),
            Ok(false) => debug!("stale list response dropped"),
            Err(e) => report_failure(&self.state, "Failed to load movies", e),
        }
        self.state.request_redraw(RedrawFlag::All);
        DispatchResult::Continue
    }
}

#[async_trait]
impl ActionMatcher for NavigationDispatcher {
    fn can_handle(&self, action: &Action) -> bool {
        matches!(
            action,
            Action::MoveSelectionUp
                | Action::MoveSelectionDown
                | Action::NextPage
                | Action::PrevPage
                | Action::CycleSort
                | Action::ToggleOrder
                | Action::Refresh
                | Action::Resize(_, _)
                | Action::TaskResult(TaskResult::MoviesLoaded(_))
        )
    }

    async fn handle(&mut self, action: &Action) -> Result<DispatchResult> {
        if let Some(result) = self.handle_selection(action) {
            return Ok(result);
        }

        match action {
            Action::NextPage
            | Action::PrevPage
            | Action::CycleSort
            | Action::ToggleOrder
            | Action::Refresh => Ok(self.reload(action)),

            Action::Resize(_, _) => {
                self.state.request_redraw(RedrawFlag::All);
                Ok(DispatchResult::Continue)
            }

            Action::TaskResult(TaskResult::MoviesLoaded(result)) => Ok(self.handle_loaded(result)),

            _ => Ok(DispatchResult::NotHandled),
        }
    }

    fn priority(&self) -> ActionPriority {
        ActionPriority::High
    }

    fn name(&self) -> &'static str {
        "navigation"
    }
}
