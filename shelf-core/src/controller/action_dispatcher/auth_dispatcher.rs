// shelf-core/src/controller/action_dispatcher/auth_dispatcher.rs
// Login / register form and logout

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::controller::Action;
use crate::controller::event_loop::TaskResult;
use crate::controller::state_coordinator::StateCoordinator;
use crate::error::OpError;
use crate::model::form::{AuthMode, FormEdit};
use crate::model::ui_state::RedrawFlag;

use super::{ActionMatcher, ActionPriority, DispatchResult};

pub struct AuthDispatcher {
    state: Arc<StateCoordinator>,
    task_tx: UnboundedSender<TaskResult>,
}

impl AuthDispatcher {
    pub fn new(state: Arc<StateCoordinator>, task_tx: UnboundedSender<TaskResult>) -> Self {
        Self { state, task_tx }
    }

    fn edit(&self, edit: FormEdit) -> DispatchResult {
        if edit == FormEdit::Submit {
            return self.submit();
        }

        self.state.update_ui_state(|ui| {
            let form = &mut ui.auth_form;
            match edit {
                FormEdit::Char(c) => form.focused_mut().push(c),
                FormEdit::Backspace => form.focused_mut().pop(),
                FormEdit::NextField => form.move_focus(true),
                FormEdit::PrevField => form.move_focus(false),
                FormEdit::Submit => {}
            }
            ui.request_redraw(RedrawFlag::Main);
        });
        DispatchResult::Continue
    }

    fn submit(&self) -> DispatchResult {
        if self.state.auth.snapshot().loading {
            debug!("auth request already in flight");
            return DispatchResult::Continue;
        }

        let form = self.state.ui_state().auth_form.clone();
        let auth = self.state.auth.clone();
        match form.mode {
            AuthMode::Login => {
                let email = form.email.value;
                let password = form.password.value;
                self.state.spawn(&self.task_tx, async move {
                    TaskResult::Authenticated {
                        registered: false,
                        result: auth.login(&email, &password).await,
                    }
                });
            }
            AuthMode::Register => {
                let request = form.register_request();
                self.state.spawn(&self.task_tx, async move {
                    TaskResult::Authenticated {
                        registered: true,
                        result: auth.register(request).await,
                    }
                });
            }
        }
        self.state.request_redraw(RedrawFlag::Main);
        DispatchResult::Continue
    }

    fn toggle_mode(&self) -> DispatchResult {
        self.state.auth.clear_error();
        self.state.update_ui_state(|ui| {
            ui.auth_form.toggle_mode();
            ui.request_redraw(RedrawFlag::All);
        });
        DispatchResult::Continue
    }

    fn logout(&self) -> DispatchResult {
        self.state.auth.logout();
        self.state.update_ui_state(|ui| {
            ui.reset_session_views();
            ui.show_info("Logged out");
        });
        DispatchResult::Continue
    }

    fn authenticated(&self, registered: bool, result: &Result<(), OpError>) -> DispatchResult {
        match result {
            Ok(()) => {
                self.state.update_ui_state(|ui| {
                    ui.reset_session_views();
                    ui.show_success(if registered {
                        "Account created"
                    } else {
                        "Logged in"
                    });
                });

                let movies = self.state.movies.clone();
                self.state.spawn(&self.task_tx, async move {
                    TaskResult::MoviesLoaded(movies.refresh().await)
                });
            }
            // The auth view shows the recorded error next to the form.
            Err(e) => debug!(error = %e, "authentication rejected"),
        }
        self.state.request_redraw(RedrawFlag::All);
        DispatchResult::Continue
    }
}

#[async_trait]
impl ActionMatcher for AuthDispatcher {
    fn can_handle(&self, action: &Action) -> bool {
        matches!(
            action,
            Action::AuthForm(_)
                | Action::ToggleAuthMode
                | Action::Logout
                | Action::TaskResult(TaskResult::Authenticated { .. })
        )
    }

    async fn handle(&mut self, action: &Action) -> Result<DispatchResult> {
        let result = match action {
            Action::AuthForm(edit) => self.edit(*edit),
            Action::ToggleAuthMode => self.toggle_mode(),
            Action::Logout => self.logout(),
            Action::TaskResult(TaskResult::Authenticated { registered, result }) => {
                self.authenticated(*registered, result)
            }
            _ => DispatchResult::NotHandled,
        };
        Ok(result)
    }

    fn priority(&self) -> ActionPriority {
        ActionPriority::Critical
    }

    fn name(&self) -> &'static str {
        "auth"
    }
}
