//! src/controller/key_handler.rs
//! ============================================================================
//! # Key bindings
//!
//! Terminal keys become [`Action`]s here and nowhere else. Which binding
//! applies depends on where input is going: the auth form, an open overlay,
//! the search bar or the movie table.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::controller::actions::Action;
use crate::model::form::FormEdit;
use crate::model::ui_state::{UIMode, UIOverlay, UIState};

/// Routing inputs for [`map_key`], captured from the UI state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyContext {
    pub authenticated: bool,
    pub mode: UIMode,
    pub overlay: UIOverlay,
}

impl KeyContext {
    pub const fn new(authenticated: bool, ui: &UIState) -> Self {
        Self {
            authenticated,
            mode: ui.mode,
            overlay: ui.overlay,
        }
    }
}

/// Map a key press to an action, or `None` when the key is unbound here.
pub fn map_key(key: KeyEvent, ctx: KeyContext) -> Option<Action> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    if !ctx.authenticated {
        return auth_key(key, ctrl);
    }

    match ctx.overlay {
        UIOverlay::None => match ctx.mode {
            UIMode::Search => search_key(key, ctrl),
            UIMode::Browse => browse_key(key, ctrl),
        },
        UIOverlay::Help => match key.code {
            KeyCode::Esc | KeyCode::Char('?' | 'q') => Some(Action::CloseOverlay),
            _ => None,
        },
        UIOverlay::Details => match key.code {
            KeyCode::Esc | KeyCode::Char('q') => Some(Action::CloseOverlay),
            KeyCode::Char('e') => Some(Action::ShowEditMovie),
            KeyCode::Char('d') => Some(Action::RequestDelete),
            _ => None,
        },
        UIOverlay::ConfirmDelete => match key.code {
            KeyCode::Char('y' | 'Y') | KeyCode::Enter => Some(Action::ConfirmDelete),
            KeyCode::Char('n' | 'N') | KeyCode::Esc => Some(Action::CloseOverlay),
            _ => None,
        },
        UIOverlay::MovieForm => form_key(key, ctrl, Action::MovieForm),
        UIOverlay::Import => form_key(key, ctrl, Action::ImportForm),
    }
}

/// Common text-entry keys. `Esc` is handled by the caller.
fn form_edit(key: KeyEvent, ctrl: bool) -> Option<FormEdit> {
    match key.code {
        KeyCode::Enter => Some(FormEdit::Submit),
        KeyCode::Backspace => Some(FormEdit::Backspace),
        KeyCode::Tab | KeyCode::Down => Some(FormEdit::NextField),
        KeyCode::BackTab | KeyCode::Up => Some(FormEdit::PrevField),
        KeyCode::Char(c) if !ctrl => Some(FormEdit::Char(c)),
        _ => None,
    }
}

fn form_key(key: KeyEvent, ctrl: bool, wrap: fn(FormEdit) -> Action) -> Option<Action> {
    if key.code == KeyCode::Esc {
        return Some(Action::CloseOverlay);
    }
    form_edit(key, ctrl).map(wrap)
}

fn auth_key(key: KeyEvent, ctrl: bool) -> Option<Action> {
    match key.code {
        KeyCode::Tab | KeyCode::BackTab => Some(Action::ToggleAuthMode),
        KeyCode::Esc => Some(Action::DismissNotification),
        _ => form_edit(key, ctrl).map(Action::AuthForm),
    }
}

fn search_key(key: KeyEvent, ctrl: bool) -> Option<Action> {
    match key.code {
        KeyCode::Char('t') if ctrl => Some(Action::CycleSearchType),
        KeyCode::Char('f') if ctrl => Some(Action::CycleFormatFilter),
        KeyCode::Char('u') if ctrl => Some(Action::ClearSearch),
        KeyCode::Esc | KeyCode::Enter => Some(Action::ExitSearch),
        KeyCode::Backspace => Some(Action::SearchBackspace),
        KeyCode::Char(c) if !ctrl => Some(Action::SearchInput(c)),
        _ => None,
    }
}

fn browse_key(key: KeyEvent, ctrl: bool) -> Option<Action> {
    if ctrl {
        return match key.code {
            KeyCode::Char('t') => Some(Action::CycleSearchType),
            KeyCode::Char('f') => Some(Action::CycleFormatFilter),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('k') | KeyCode::Up => Some(Action::MoveSelectionUp),
        KeyCode::Char('j') | KeyCode::Down => Some(Action::MoveSelectionDown),
        KeyCode::Enter => Some(Action::OpenSelected),
        KeyCode::Char('n') | KeyCode::Right | KeyCode::PageDown => Some(Action::NextPage),
        KeyCode::Char('p') | KeyCode::Left | KeyCode::PageUp => Some(Action::PrevPage),
        KeyCode::Char('s') => Some(Action::CycleSort),
        KeyCode::Char('o') => Some(Action::ToggleOrder),
        KeyCode::Char('/') => Some(Action::FocusSearch),
        KeyCode::Char('x') => Some(Action::ClearSearch),
        KeyCode::Char('a') => Some(Action::ShowAddMovie),
        KeyCode::Char('e') => Some(Action::ShowEditMovie),
        KeyCode::Char('d') | KeyCode::Delete => Some(Action::RequestDelete),
        KeyCode::Char('i') => Some(Action::ShowImport),
        KeyCode::Char('r') | KeyCode::F(5) => Some(Action::Refresh),
        KeyCode::Char('?') | KeyCode::F(1) => Some(Action::ToggleHelp),
        KeyCode::Char('L') => Some(Action::Logout),
        KeyCode::Esc => Some(Action::DismissNotification),
        _ => None,
    }
}
