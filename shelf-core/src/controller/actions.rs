//! src/controller/actions.rs
//! ============================================================================
//! # Actions: every intent the client reacts to
//!
//! Key presses are mapped to an [`Action`] by the key handler; completed
//! background requests come back as [`Action::TaskResult`]; the event loop
//! adds [`Action::Tick`] so timers (search debounce, toast expiry) advance.

use crate::controller::event_loop::TaskResult;
use crate::model::form::FormEdit;

#[derive(Debug, Clone)]
pub enum Action {
    Quit,

    /// Terminal resized.
    Resize(u16, u16),

    /// Timer wake-up from the event loop.
    Tick,

    // Listing
    MoveSelectionUp,
    MoveSelectionDown,
    NextPage,
    PrevPage,
    CycleSort,
    ToggleOrder,
    Refresh,

    // Search bar
    FocusSearch,
    ExitSearch,
    SearchInput(char),
    SearchBackspace,
    CycleSearchType,
    CycleFormatFilter,
    ClearSearch,

    // Records
    OpenSelected,
    ShowAddMovie,
    ShowEditMovie,
    ShowImport,
    RequestDelete,
    ConfirmDelete,

    // Forms
    AuthForm(FormEdit),
    MovieForm(FormEdit),
    ImportForm(FormEdit),
    ToggleAuthMode,
    Logout,

    // Overlays
    ToggleHelp,
    CloseOverlay,
    DismissNotification,

    /// A background request finished.
    TaskResult(TaskResult),
}

impl Action {
    /// Actions produced by the clock rather than the user.
    pub const fn is_background(&self) -> bool {
        matches!(self, Self::Tick | Self::TaskResult(_))
    }
}
