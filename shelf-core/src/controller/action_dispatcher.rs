//! src/controller/action_dispatcher.rs
//! ============================================================================
//! # `ModularActionDispatcher`: routes actions to focused sub-dispatchers
//!
//! Each sub-dispatcher owns one area (listing, search bar, records, auth,
//! overlays). User actions stop at the first dispatcher that handles them;
//! clock and task actions are offered to every dispatcher that matches, so a
//! single `Tick` can both settle the search box and expire a toast.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use crate::controller::actions::Action;
use crate::controller::event_loop::TaskResult;
use crate::controller::state_coordinator::StateCoordinator;

mod auth_dispatcher;
mod movie_dispatcher;
mod navigation_dispatcher;
mod search_dispatcher;
mod ui_dispatcher;
pub mod utils;

pub use auth_dispatcher::AuthDispatcher;
pub use movie_dispatcher::MovieDispatcher;
pub use navigation_dispatcher::NavigationDispatcher;
pub use search_dispatcher::SearchDispatcher;
pub use ui_dispatcher::UIControlDispatcher;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchResult {
    Continue,
    Terminate,
    NotHandled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ActionPriority {
    Low = 0,
    Normal = 1,
    High = 2,
    Critical = 3,
}

#[async_trait]
pub trait ActionMatcher: Send {
    fn can_handle(&self, action: &Action) -> bool;

    async fn handle(&mut self, action: &Action) -> Result<DispatchResult>;

    fn priority(&self) -> ActionPriority;

    fn name(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DispatcherStats {
    pub total_actions: u64,
    pub total_handlers: usize,
    pub unhandled: u64,
    pub failures: u64,
}

pub struct ModularActionDispatcher {
    handlers: Vec<Box<dyn ActionMatcher>>,
    stats: DispatcherStats,
}

impl ModularActionDispatcher {
    pub fn new(state: Arc<StateCoordinator>, task_tx: UnboundedSender<TaskResult>) -> Self {
        let mut handlers: Vec<Box<dyn ActionMatcher>> = vec![
            Box::new(UIControlDispatcher::new(state.clone())),
            Box::new(NavigationDispatcher::new(state.clone(), task_tx.clone())),
            Box::new(SearchDispatcher::new(state.clone(), task_tx.clone())),
            Box::new(MovieDispatcher::new(state.clone(), task_tx.clone())),
            Box::new(AuthDispatcher::new(state, task_tx)),
        ];
        handlers.sort_by_key(|h| std::cmp::Reverse(h.priority()));

        let stats = DispatcherStats {
            total_handlers: handlers.len(),
            ..DispatcherStats::default()
        };
        Self { handlers, stats }
    }

    /// Apply `action`. Returns `false` when the application should exit.
    pub async fn handle(&mut self, action: Action) -> bool {
        self.stats.total_actions += 1;
        let broadcast = action.is_background();
        let mut handled = false;

        for handler in &mut self.handlers {
            if !handler.can_handle(&action) {
                continue;
            }

            match handler.handle(&action).await {
                Ok(DispatchResult::Terminate) => return false,
                Ok(DispatchResult::Continue) => {
                    handled = true;
                    if !broadcast {
                        break;
                    }
                }
                Ok(DispatchResult::NotHandled) => {}
                Err(e) => {
                    self.stats.failures += 1;
                    warn!(handler = handler.name(), "action failed: {e:#}");
                }
            }
        }

        if !handled {
            self.stats.unhandled += 1;
            debug!("No handler for {:?}", action);
        }
        true
    }

    pub const fn get_stats(&self) -> DispatcherStats {
        self.stats
    }
}
