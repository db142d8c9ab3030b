//! `StateCoordinator`: single owner of the UI state and the two stores
//!
//! Dispatchers and the renderer reach every piece of state through here.
//! UI state sits behind a `parking_lot::RwLock`; the stores carry their own
//! locks. No lock is held across an await.

use std::sync::Arc;
use std::time::Instant;

use parking_lot::{RwLock, RwLockReadGuard};
use tokio::sync::mpsc::UnboundedSender;

use crate::config::Config;
use crate::controller::auth_store::AuthStore;
use crate::controller::event_loop::TaskResult;
use crate::controller::movie_store::MovieStore;
use crate::model::ui_state::{RedrawFlag, UIState};

pub struct StateCoordinator {
    pub config: Arc<Config>,

    pub ui_state: RwLock<UIState>,

    pub movies: MovieStore,

    pub auth: AuthStore,
}

impl StateCoordinator {
    pub fn new(config: Arc<Config>, movies: MovieStore, auth: AuthStore) -> Self {
        let ui = UIState::new(config.notification_timeout, config.debounce());
        Self {
            config,
            ui_state: RwLock::new(ui),
            movies,
            auth,
        }
    }

    pub fn ui_state(&self) -> RwLockReadGuard<'_, UIState> {
        self.ui_state.read()
    }

    pub fn update_ui_state<F, R>(&self, update: F) -> R
    where
        F: FnOnce(&mut UIState) -> R,
    {
        update(&mut *self.ui_state.write())
    }

    pub fn request_redraw(&self, flag: RedrawFlag) {
        self.ui_state.read().request_redraw(flag);
    }

    pub fn needs_redraw(&self) -> bool {
        self.ui_state.read().needs_redraw()
    }

    pub fn clear_redraw(&self) {
        self.ui_state.read().clear_redraw();
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.session().is_authenticated()
    }

    /// Earliest instant at which a timer-driven update is due.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.ui_state.read().search.deadline()
    }

    /// Run `work` in the background and post its result to the event loop.
    pub fn spawn<F>(&self, task_tx: &UnboundedSender<TaskResult>, work: F)
    where
        F: Future<Output = TaskResult> + Send + 'static,
    {
        let tx = task_tx.clone();
        tokio::spawn(async move {
            let result = work.await;
            if tx.send(result).is_err() {
                tracing::debug!("event loop gone; dropping task result");
            }
        });
    }
}

impl std::fmt::Debug for StateCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateCoordinator")
            .field("api_url", &self.config.api_url)
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}
