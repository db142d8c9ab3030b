// shelf-core/src/controller/action_dispatcher/search_dispatcher.rs
// Search bar editing and debounced list reloads

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::controller::Action;
use crate::controller::event_loop::TaskResult;
use crate::controller::state_coordinator::StateCoordinator;
use crate::model::search_state::SearchIntent;
use crate::model::ui_state::{RedrawFlag, UIMode};

use super::{ActionMatcher, ActionPriority, DispatchResult};

pub struct SearchDispatcher {
    state: Arc<StateCoordinator>,
    task_tx: UnboundedSender<TaskResult>,
}

impl SearchDispatcher {
    pub fn new(state: Arc<StateCoordinator>, task_tx: UnboundedSender<TaskResult>) -> Self {
        Self { state, task_tx }
    }

    fn edit(&self, action: &Action, now: Instant) -> DispatchResult {
        self.state.update_ui_state(|ui| {
            match action {
                Action::FocusSearch => ui.mode = UIMode::Search,
                Action::ExitSearch => ui.mode = UIMode::Browse,
                Action::SearchInput(c) => ui.search.push_char(*c, now),
                Action::SearchBackspace => ui.search.pop_char(now),
                Action::CycleSearchType => ui.search.cycle_type(now),
                Action::CycleFormatFilter => ui.search.cycle_format(now),
                _ => return,
            }
            ui.request_redraw(RedrawFlag::Main);
        });
        DispatchResult::Continue
    }

    /// Clear immediately, without waiting for the debounce window.
    fn clear(&self) -> DispatchResult {
        let had_filters = self.state.update_ui_state(|ui| {
            ui.request_redraw(RedrawFlag::Main);
            ui.search.reset()
        });
        if had_filters {
            self.run(SearchIntent::Clear);
        }
        DispatchResult::Continue
    }

    fn poll(&self, now: Instant) -> DispatchResult {
        let intent = self.state.update_ui_state(|ui| ui.search.poll(now));
        match intent {
            Some(intent) => {
                self.run(intent);
                DispatchResult::Continue
            }
            None => DispatchResult::NotHandled,
        }
    }

    fn run(&self, intent: SearchIntent) {
        debug!(?intent, "search settled");
        self.state.update_ui_state(|ui| ui.selected = 0);

        let movies = self.state.movies.clone();
        self.state.spawn(&self.task_tx, async move {
            let result = match intent {
                SearchIntent::Clear => movies.clear_search().await,
                SearchIntent::Search(filters) => movies.search(filters).await,
            };
            TaskResult::MoviesLoaded(result)
        });
        self.state.request_redraw(RedrawFlag::StatusBar);
    }
}

#[async_trait]
impl ActionMatcher for SearchDispatcher {
    fn can_handle(&self, action: &Action) -> bool {
        matches!(
            action,
            Action::FocusSearch
                | Action::ExitSearch
                | Action::SearchInput(_)
                | Action::SearchBackspace
                | Action::CycleSearchType
                | Action::CycleFormatFilter
                | Action::ClearSearch
                | Action::Tick
        )
    }

    async fn handle(&mut self, action: &Action) -> Result<DispatchResult> {
        let now = Instant::now();
        match action {
            Action::ClearSearch => Ok(self.clear()),
            Action::Tick => Ok(self.poll(now)),
            _ => Ok(self.edit(action, now)),
        }
    }

    fn priority(&self) -> ActionPriority {
        ActionPriority::Normal
    }

    fn name(&self) -> &'static str {
        "search"
    }
}
