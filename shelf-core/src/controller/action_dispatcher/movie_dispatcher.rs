// shelf-core/src/controller/action_dispatcher/movie_dispatcher.rs
// Details, add / edit / delete and catalog import

use anyhow::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};

use crate::controller::Action;
use crate::controller::event_loop::TaskResult;
use crate::controller::movie_store::NO_VALID_MOVIES;
use crate::controller::state_coordinator::StateCoordinator;
use crate::import::catalog::CatalogFile;
use crate::model::form::FormEdit;
use crate::model::movie::{Movie, current_year};
use crate::model::movie_state::ImportSummary;
use crate::model::ui_state::{PendingDelete, RedrawFlag, UIOverlay};

use super::utils::{clamp_to_list, quoted, report_failure};
use super::{ActionMatcher, ActionPriority, DispatchResult};

pub const ENTER_FILE_PATH: &str = "Enter the path of a .txt file";

pub struct MovieDispatcher {
    state: Arc<StateCoordinator>,
    task_tx: UnboundedSender<TaskResult>,
}

impl MovieDispatcher {
    pub fn new(state: Arc<StateCoordinator>, task_tx: UnboundedSender<TaskResult>) -> Self {
        Self { state, task_tx }
    }

    /// Movie the record actions apply to: the open details, else the
    /// highlighted row.
    fn target(&self) -> Option<Movie> {
        let (overlay, row) = {
            let ui = self.state.ui_state();
            (ui.overlay, ui.selected)
        };
        let movies = self.state.movies.state();
        if overlay == UIOverlay::Details
            && let Some(movie) = movies.selected()
        {
            return Some(movie.clone());
        }
        movies.movies().get(row).cloned()
    }

    fn open_selected(&self) -> DispatchResult {
        let Some(movie) = self.target() else {
            return DispatchResult::Continue;
        };

        self.state
            .update_ui_state(|ui| ui.open_overlay(UIOverlay::Details));

        let movies = self.state.movies.clone();
        self.state.spawn(&self.task_tx, async move {
            TaskResult::MovieLoaded(movies.load_by_id(movie.id).await)
        });
        DispatchResult::Continue
    }

    fn open_form(&self, action: &Action) -> DispatchResult {
        match action {
            Action::ShowAddMovie => {
                self.state.update_ui_state(|ui| ui.open_movie_form(None));
            }
            Action::ShowEditMovie => {
                if let Some(movie) = self.target() {
                    self.state
                        .update_ui_state(|ui| ui.open_movie_form(Some(&movie)));
                }
            }
            Action::ShowImport => {
                self.state.movies.clear_import_summary();
                self.state.update_ui_state(|ui| ui.open_import());
            }
            _ => return DispatchResult::NotHandled,
        }
        DispatchResult::Continue
    }

    fn request_delete(&self) -> DispatchResult {
        if let Some(movie) = self.target() {
            self.state.update_ui_state(|ui| {
                ui.open_overlay(UIOverlay::ConfirmDelete);
                ui.pending_delete = Some(PendingDelete {
                    id: movie.id,
                    title: movie.title,
                });
            });
        }
        DispatchResult::Continue
    }

    fn confirm_delete(&self) -> DispatchResult {
        let pending = self.state.update_ui_state(|ui| {
            let pending = ui.pending_delete.take();
            ui.close_overlay();
            pending
        });
        let Some(PendingDelete { id, title }) = pending else {
            return DispatchResult::Continue;
        };

        let movies = self.state.movies.clone();
        self.state.spawn(&self.task_tx, async move {
            let result = movies.remove(id).await;
            TaskResult::MovieDeleted { title, result }
        });
        DispatchResult::Continue
    }

    fn movie_form(&self, edit: FormEdit) -> DispatchResult {
        if edit != FormEdit::Submit {
            self.state.update_ui_state(|ui| {
                let form = &mut ui.movie_form;
                match edit {
                    FormEdit::Char(c) => form.focused_mut().push(c),
                    FormEdit::Backspace => form.focused_mut().pop(),
                    FormEdit::NextField => form.move_focus(true),
                    FormEdit::PrevField => form.move_focus(false),
                    FormEdit::Submit => {}
                }
                ui.request_redraw(RedrawFlag::Overlay);
            });
            return DispatchResult::Continue;
        }

        let year = current_year();
        let form = self.state.ui_state().movie_form.clone();
        let movies = self.state.movies.clone();

        if form.editing.is_some() {
            match form.patch(year) {
                Ok((id, patch)) => self.state.spawn(&self.task_tx, async move {
                    TaskResult::MovieUpdated(movies.update(id, patch, year).await)
                }),
                Err(e) => report_failure(&self.state, "Update failed", &e),
            }
        } else {
            match form.draft(year) {
                Ok(draft) => self.state.spawn(&self.task_tx, async move {
                    TaskResult::MovieCreated(movies.create(draft, year).await)
                }),
                Err(e) => report_failure(&self.state, "Create failed", &e),
            }
        }
        DispatchResult::Continue
    }

    /// First `Enter` reads and previews the file; a second one uploads it.
    fn import_form(&self, edit: FormEdit) -> DispatchResult {
        if edit != FormEdit::Submit {
            self.state.update_ui_state(|ui| {
                ui.import_form.edit(edit);
                ui.request_redraw(RedrawFlag::Overlay);
            });
            return DispatchResult::Continue;
        }

        let (path, preview, uploading) = {
            let ui = self.state.ui_state();
            let form = &ui.import_form;
            let preview = form.can_upload().then(|| form.preview.clone()).flatten();
            (form.path.value.trim().to_owned(), preview, form.uploading)
        };

        if uploading {
            return DispatchResult::Continue;
        }

        if let Some(file) = preview {
            self.state.update_ui_state(|ui| {
                ui.import_form.uploading = true;
                ui.request_redraw(RedrawFlag::Overlay);
            });
            let movies = self.state.movies.clone();
            self.state.spawn(&self.task_tx, async move {
                TaskResult::Imported(movies.import_catalog(&file).await)
            });
            return DispatchResult::Continue;
        }

        if path.is_empty() {
            self.state.update_ui_state(|ui| ui.show_warning(ENTER_FILE_PATH));
            return DispatchResult::Continue;
        }

        let path = PathBuf::from(path);
        self.state.spawn(&self.task_tx, async move {
            let result = CatalogFile::read(&path, current_year())
                .await
                .map_err(|e| e.to_string());
            TaskResult::ImportPreviewed { path, result }
        });
        DispatchResult::Continue
    }

    fn handle_task(&self, result: &TaskResult) -> DispatchResult {
        match result {
            TaskResult::MovieLoaded(Ok(applied)) => {
                debug!(applied, "details loaded");
                self.state.request_redraw(RedrawFlag::Overlay);
            }
            TaskResult::MovieLoaded(Err(e)) => {
                report_failure(&self.state, "Failed to load movie", e);
            }

            TaskResult::MovieCreated(Ok(movie)) => {
                let message = format!("Added {}", quoted(&movie.title));
                self.state.update_ui_state(|ui| {
                    ui.close_overlay();
                    ui.selected = 0;
                    ui.show_success(message);
                });
            }
            TaskResult::MovieCreated(Err(e)) => report_failure(&self.state, "Create failed", e),

            TaskResult::MovieUpdated(Ok(movie)) => {
                let message = format!("Updated {}", quoted(&movie.title));
                self.state.update_ui_state(|ui| {
                    ui.close_overlay();
                    ui.show_success(message);
                });
            }
            TaskResult::MovieUpdated(Err(e)) => report_failure(&self.state, "Update failed", e),

            TaskResult::MovieDeleted { title, result } => match result {
                Ok(()) => {
                    clamp_to_list(&self.state);
                    let message = format!("Deleted {}", quoted(title));
                    self.state.update_ui_state(|ui| ui.show_success(message));
                }
                Err(e) => report_failure(&self.state, "Delete failed", e),
            },

            TaskResult::ImportPreviewed { path, result } => self.apply_preview(path, result),

            TaskResult::Imported(Ok(summary)) => self.finish_import(summary),
            TaskResult::Imported(Err(e)) if e.is_superseded() => {
                debug!("import from an earlier session ignored");
            }
            TaskResult::Imported(Err(e)) => {
                self.state.update_ui_state(|ui| {
                    ui.import_form.uploading = false;
                    ui.import_form.error = Some(e.message.clone());
                });
                report_failure(&self.state, "Import failed", e);
            }

            _ => return DispatchResult::NotHandled,
        }
        self.state.request_redraw(RedrawFlag::All);
        DispatchResult::Continue
    }

    /// Previews for a path that has since been edited are dropped.
    fn apply_preview(&self, path: &Path, result: &Result<CatalogFile, String>) {
        self.state.update_ui_state(|ui| {
            let form = &mut ui.import_form;
            if ui.overlay != UIOverlay::Import || Path::new(form.path.value.trim()) != path {
                debug!(path = %path.display(), "stale import preview dropped");
                return;
            }
            match result {
                Ok(file) => {
                    form.error = (!file.outcome.has_movies()).then(|| NO_VALID_MOVIES.to_owned());
                    form.preview = Some(file.clone());
                }
                Err(e) => {
                    form.preview = None;
                    form.error = Some(e.clone());
                }
            }
        });
    }

    fn finish_import(&self, summary: &ImportSummary) {
        info!(
            imported = summary.imported,
            total = summary.total,
            "import finished"
        );
        let message = format!("Imported {} of {} movies", summary.imported, summary.total);
        let problems = summary.failed + summary.parse_errors.len() as u64;
        self.state.update_ui_state(|ui| {
            ui.close_overlay();
            ui.selected = 0;
            if problems > 0 {
                ui.show_warning(format!("{message} ({problems} skipped)"));
            } else {
                ui.show_success(message);
            }
        });
    }
}

#[async_trait]
impl ActionMatcher for MovieDispatcher {
    fn can_handle(&self, action: &Action) -> bool {
        matches!(
            action,
            Action::OpenSelected
                | Action::ShowAddMovie
                | Action::ShowEditMovie
                | Action::ShowImport
                | Action::RequestDelete
                | Action::ConfirmDelete
                | Action::MovieForm(_)
                | Action::ImportForm(_)
                | Action::TaskResult(
                    TaskResult::MovieLoaded(_)
                        | TaskResult::MovieCreated(_)
                        | TaskResult::MovieUpdated(_)
                        | TaskResult::MovieDeleted { .. }
                        | TaskResult::ImportPreviewed { .. }
                        | TaskResult::Imported(_)
                )
        )
    }

    async fn handle(&mut self, action: &Action) -> Result<DispatchResult> {
        let result = match action {
            Action::OpenSelected => self.open_selected(),
            Action::ShowAddMovie | Action::ShowEditMovie | Action::ShowImport => {
                self.open_form(action)
            }
            Action::RequestDelete => self.request_delete(),
            Action::ConfirmDelete => self.confirm_delete(),
            Action::MovieForm(edit) => self.movie_form(*edit),
            Action::ImportForm(edit) => self.import_form(*edit),
            Action::TaskResult(result) => self.handle_task(result),
            _ => DispatchResult::NotHandled,
        };
        Ok(result)
    }

    fn priority(&self) -> ActionPriority {
        ActionPriority::Normal
    }

    fn name(&self) -> &'static str {
        "movies"
    }
}
