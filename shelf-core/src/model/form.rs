//! ``src/model/form.rs``
//! ============================================================================
//! # Form state for the auth view and the movie / import overlays
//!
//! Forms only hold text. Turning that text into requests (and reporting what
//! is wrong with it) happens in the conversion methods, so the dispatcher
//! never touches individual fields.

use smallvec::SmallVec;

use crate::api::backend::RegisterRequest;
use crate::error::{ErrorKind, OpError};
use crate::import::catalog::CatalogFile;
use crate::model::movie::{Movie, MovieDraft, MovieId, MoviePatch};
use crate::util::humanize::count_noun;

/// Rows shown in the import preview.
pub const PREVIEW_SAMPLE: usize = 3;

pub const NOTHING_TO_UPDATE: &str = "Nothing to update";

/// Single-line text input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextField {
    pub label: &'static str,
    pub value: String,
    pub masked: bool,
}

impl TextField {
    pub const fn new(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
            masked: false,
        }
    }

    pub const fn secret(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
            masked: true,
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn push(&mut self, c: char) {
        self.value.push(c);
    }

    pub fn pop(&mut self) {
        self.value.pop();
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    /// What the widget should print.
    pub fn display(&self) -> String {
        if self.masked {
            "•".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }
}

/// Edits routed to whichever form is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEdit {
    Char(char),
    Backspace,
    NextField,
    PrevField,
    Submit,
}

fn step(focus: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if forward {
        (focus + 1) % len
    } else {
        (focus + len - 1) % len
    }
}

// ------------------------------------------------------------------
// auth
// ------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub name: TextField,
    pub email: TextField,
    pub password: TextField,
    pub confirm: TextField,
    pub focus: usize,
}

impl Default for AuthForm {
    fn default() -> Self {
        Self {
            mode: AuthMode::Login,
            name: TextField::new("Name"),
            email: TextField::new("Email"),
            password: TextField::secret("Password"),
            confirm: TextField::secret("Confirm password"),
            focus: 0,
        }
    }
}

impl AuthForm {
    /// Visible fields in tab order.
    pub fn fields(&self) -> SmallVec<[&TextField; 4]> {
        match self.mode {
            AuthMode::Login => SmallVec::from_slice(&[&self.email, &self.password]),
            AuthMode::Register => SmallVec::from_slice(&[
                &self.name,
                &self.email,
                &self.password,
                &self.confirm,
            ]),
        }
    }

    pub fn focused_mut(&mut self) -> &mut TextField {
        match (self.mode, self.focus) {
            (AuthMode::Login, 0) | (AuthMode::Register, 1) => &mut self.email,
            (AuthMode::Login, _) | (AuthMode::Register, 2) => &mut self.password,
            (AuthMode::Register, 0) => &mut self.name,
            (AuthMode::Register, _) => &mut self.confirm,
        }
    }

    pub fn move_focus(&mut self, forward: bool) {
        let len = self.fields().len();
        self.focus = step(self.focus, len, forward);
    }

    /// Switch login/register; secrets never carry over.
    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        };
        self.focus = 0;
        self.clear_secrets();
    }

    pub fn clear_secrets(&mut self) {
        self.password.clear();
        self.confirm.clear();
    }

    pub fn register_request(&self) -> RegisterRequest {
        RegisterRequest {
            email: self.email.value.trim().to_owned(),
            name: self.name.value.trim().to_owned(),
            password: self.password.value.clone(),
            confirm_password: self.confirm.value.clone(),
        }
    }
}

// ------------------------------------------------------------------
// movie
// ------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieForm {
    pub title: TextField,
    pub year: TextField,
    pub format: TextField,
    pub actors: TextField,
    pub focus: usize,
    /// Set when editing an existing movie.
    pub editing: Option<Movie>,
}

impl Default for MovieForm {
    fn default() -> Self {
        Self {
            title: TextField::new("Title"),
            year: TextField::new("Year"),
            format: TextField::new("Format (VHS / DVD / Blu-Ray)"),
            actors: TextField::new("Actors (comma separated)"),
            focus: 0,
            editing: None,
        }
    }
}

impl MovieForm {
    pub fn for_edit(movie: &Movie) -> Self {
        let base = Self::default();
        Self {
            title: base.title.with_value(movie.title.clone()),
            year: base.year.with_value(movie.year.to_string()),
            format: base.format.with_value(movie.format.as_str()),
            actors: base.actors.with_value(movie.actors.join(", ")),
            focus: 0,
            editing: Some(movie.clone()),
        }
    }

    pub fn fields(&self) -> [&TextField; 4] {
        [&self.title, &self.year, &self.format, &self.actors]
    }

    pub fn focused_mut(&mut self) -> &mut TextField {
        match self.focus {
            0 => &mut self.title,
            1 => &mut self.year,
            2 => &mut self.format,
            _ => &mut self.actors,
        }
    }

    pub fn move_focus(&mut self, forward: bool) {
        self.focus = step(self.focus, 4, forward);
    }

    pub fn draft(&self, current_year: i32) -> Result<MovieDraft, OpError> {
        MovieDraft::from_fields(
            &self.title.value,
            &self.year.value,
            &self.format.value,
            &self.actors.value,
            current_year,
        )
    }

    /// Only the fields that differ from the movie being edited.
    pub fn patch(&self, current_year: i32) -> Result<(MovieId, MoviePatch), OpError> {
        let Some(original) = &self.editing else {
            return Err(OpError::new(ErrorKind::Validation, NOTHING_TO_UPDATE));
        };
        let draft = self.draft(current_year)?;

        let patch = MoviePatch {
            title: (draft.title != original.title).then_some(draft.title),
            year: (draft.year != original.year).then_some(draft.year),
            format: (draft.format != original.format).then_some(draft.format),
            actors: (draft.actors != original.actors).then_some(draft.actors),
        };
        if patch.is_empty() {
            return Err(OpError::new(ErrorKind::Validation, NOTHING_TO_UPDATE));
        }
        Ok((original.id.clone(), patch))
    }
}

// ------------------------------------------------------------------
// import
// ------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ImportForm {
    pub path: TextField,
    /// Parsed file for the path currently typed, if it was read.
    pub preview: Option<CatalogFile>,
    pub error: Option<String>,
    pub uploading: bool,
}

impl Default for ImportForm {
    fn default() -> Self {
        Self {
            path: TextField::new("File (.txt)"),
            preview: None,
            error: None,
            uploading: false,
        }
    }
}

impl ImportForm {
    /// Any edit of the path invalidates the preview.
    pub fn edit(&mut self, edit: FormEdit) {
        match edit {
            FormEdit::Char(c) => self.path.push(c),
            FormEdit::Backspace => self.path.pop(),
            _ => return,
        }
        self.preview = None;
        self.error = None;
    }

    /// A preview with at least one record can be uploaded.
    pub fn can_upload(&self) -> bool {
        self.preview.as_ref().is_some_and(|p| p.outcome.has_movies())
    }

    /// "N movies found" plus "M errors" when there are any.
    pub fn summary(&self) -> Option<String> {
        let outcome = &self.preview.as_ref()?.outcome;
        let mut line = format!("{} found", count_noun(outcome.movies.len() as u64, "movie"));
        if !outcome.errors.is_empty() {
            line.push_str(", ");
            line.push_str(&count_noun(outcome.errors.len() as u64, "error"));
        }
        Some(line)
    }

    pub fn sample(&self) -> &[MovieDraft] {
        self.preview.as_ref().map_or(&[][..], |p| {
            let movies = &p.outcome.movies;
            &movies[..movies.len().min(PREVIEW_SAMPLE)]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::parser::parse_catalog;
    use crate::model::movie::MovieFormat;
    use std::path::PathBuf;

    fn movie() -> Movie {
        Movie {
            id: "7".into(),
            title: "Casablanca".into(),
            year: 1942,
            format: MovieFormat::Dvd,
            actors: vec!["Humphrey Bogart".into(), "Ingrid Bergman".into()],
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn auth_focus_wraps_per_mode() {
        let mut form = AuthForm::default();
        form.move_focus(true);
        form.move_focus(true);
        assert_eq!(form.focus, 0);

        form.toggle_mode();
        form.move_focus(false);
        assert_eq!(form.focus, 3);
        form.focused_mut().push('x');
        assert_eq!(form.confirm.value, "x");
    }

    #[test]
    fn toggling_mode_drops_secrets() {
        let mut form = AuthForm::default();
        form.email.value = "a@b.c".into();
        form.password.value = "hunter2".into();
        form.toggle_mode();
        assert!(form.password.value.is_empty());
        assert_eq!(form.email.value, "a@b.c");
        assert_eq!(form.password.display(), "");
    }

    #[test]
    fn masked_fields_hide_text() {
        let field = TextField::secret("Password").with_value("abc");
        assert_eq!(field.display(), "•••");
    }

    #[test]
    fn edit_form_patches_only_changes() {
        let mut form = MovieForm::for_edit(&movie());
        assert_eq!(form.patch(2024).unwrap_err().message, NOTHING_TO_UPDATE);

        form.year.value = "1943".into();
        form.format.value = "blu-ray".into();
        let (id, patch) = form.patch(2024).unwrap();
        assert_eq!(id, "7");
        assert_eq!(patch.year, Some(1943));
        assert_eq!(patch.format, Some(MovieFormat::BluRay));
        assert!(patch.title.is_none() && patch.actors.is_none());
    }

    #[test]
    fn import_preview_summary_and_sample() {
        let text = (1..=5)
            .map(|i| format!("Title: M{i}\nRelease Year: 2000\nFormat: DVD\n"))
            .chain(std::iter::once("Title: Broken\n".to_owned()))
            .collect::<Vec<_>>()
            .join("\n");
        let mut form = ImportForm::default();
        form.preview = Some(CatalogFile {
            path: PathBuf::from("m.txt"),
            file_name: "m.txt".into(),
            bytes: text.clone().into_bytes(),
            outcome: parse_catalog(&text, 2024),
        });

        assert!(form.can_upload());
        assert_eq!(form.summary().as_deref(), Some("5 movies found, 1 error"));
        assert_eq!(form.sample().len(), PREVIEW_SAMPLE);

        form.edit(FormEdit::Char('x'));
        assert!(form.preview.is_none());
        assert!(!form.can_upload());
    }
}
