pub mod error;

pub mod config;

pub mod api {
    pub mod backend;
    pub use backend::{MovieBackend, MoviePage};

    pub mod http;
    pub use http::HttpBackend;

    pub mod token_store;
    pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore};

    pub mod wire;
}

pub mod import {
    pub mod catalog;
    pub use catalog::CatalogFile;

    pub mod parser;
    pub use parser::{ParseOutcome, parse_catalog};
}

pub mod controller {

    pub mod actions;
    pub use actions::Action;

    pub mod action_dispatcher;

    pub mod auth_store;
    pub use auth_store::AuthStore;

    pub mod event_loop;
    pub use event_loop::{EventLoop, TaskResult};

    pub mod key_handler;

    pub mod movie_store;
    pub use movie_store::MovieStore;

    pub mod state_coordinator;
}

pub mod model {
    pub mod auth_state;

    pub mod form;

    pub mod movie;
    pub use movie::{Movie, MovieDraft, MovieFormat, MovieId, MoviePatch};

    pub mod movie_state;
    pub use movie_state::{ImportSummary, MovieState, OpKind};

    pub mod query;
    pub use query::{MovieFilters, MovieQuery, Pagination, QueryPatch, SortField, SortOrder};

    pub mod search_state;

    pub mod session;
    pub use session::Session;

    pub mod ui_state;
    pub use ui_state::{Notification, NotificationLevel, RedrawFlag, UIMode, UIOverlay, UIState};
}

pub mod view {
    pub mod theme;

    pub mod ui;

    pub mod snapshots;
    pub use snapshots::*;

    pub mod components {
        pub mod auth_form;
        pub use auth_form::AuthView;
        pub mod confirm_delete;
        pub use confirm_delete::ConfirmDeleteOverlay;
        pub mod error_overlay;
        pub use error_overlay::ErrorOverlay;
        pub mod form_fields;
        pub mod help_overlay;
        pub use help_overlay::OptimizedHelpOverlay;
        pub mod import_overlay;
        pub use import_overlay::ImportOverlay;
        pub mod movie_details;
        pub use movie_details::MovieDetailsOverlay;
        pub mod movie_form;
        pub use movie_form::MovieFormOverlay;
        pub mod movie_table;
        pub use movie_table::MovieTable;
        pub mod notification_overlay;
        pub use notification_overlay::OptimizedNotificationOverlay;
        pub mod search_bar;
        pub use search_bar::SearchBar;
        pub mod status_bar;
        pub use status_bar::OptimizedStatusBar;
    }

    pub use components::*;
}

pub mod logging;
pub use logging::Logger;

pub mod util {
    pub mod debounce;
    pub mod humanize;
}

pub use error::AppError;

pub use model::ui_state::UIState;
