//! Per-screen view state.
//!
//! Each screen owns its data exclusively. Actions return the network command
//! they need (if any); response handlers return [`Effect`]s for the app layer
//! to apply, since navigation and notices reach outside a single screen.

pub mod dashboard;
pub mod deck_create;
pub mod deck_edit;
pub mod import;

pub use dashboard::DashboardState;
pub use deck_create::{CreateField, DeckCreateState};
pub use deck_edit::{DeckEditState, EditableCard, EditorStatus};
pub use import::{ImportField, ImportMode, ImportState};

use crate::app::input::TextInput;
use crate::messages::ui_events::ScreenKind;
use crate::routes::Route;

/// Data fetched on mount
#[derive(Clone, Debug, PartialEq)]
pub enum LoadState<T> {
    Loading,
    Failed(String),
    Loaded(T),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// Blocking message shown until dismissed
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Notice {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notice {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

/// Consequence of a network response beyond the screen's own state
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Re-run the current screen's mount load
    Reload,
    Navigate(Route),
    Notice(Notice),
    /// Write a downloaded package to the download directory
    SavePackage { deck_id: String, bytes: Vec<u8> },
}

/// The active screen
#[derive(Clone, Debug)]
pub enum Screen {
    DeckList(DashboardState),
    DeckCreate(DeckCreateState),
    DeckEdit(DeckEditState),
    Import(ImportState),
}

impl Screen {
    pub fn kind(&self) -> ScreenKind {
        match self {
            Screen::DeckList(_) => ScreenKind::DeckList,
            Screen::DeckCreate(_) => ScreenKind::DeckCreate,
            Screen::DeckEdit(_) => ScreenKind::DeckEdit,
            Screen::Import(_) => ScreenKind::Import,
        }
    }

    /// Text buffer receiving keystrokes in editing mode
    pub fn active_input_mut(&mut self) -> Option<&mut TextInput> {
        match self {
            Screen::DeckList(_) => None,
            Screen::DeckCreate(state) => state.active_input_mut(),
            Screen::DeckEdit(state) => state.cell.as_mut(),
            Screen::Import(state) => state.active_input_mut(),
        }
    }

    pub fn active_input(&self) -> Option<&TextInput> {
        match self {
            Screen::DeckList(_) => None,
            Screen::DeckCreate(state) => state.active_input(),
            Screen::DeckEdit(state) => state.cell.as_ref(),
            Screen::Import(state) => state.active_input(),
        }
    }

    /// Whether a confirmation prompt is waiting for y/n
    pub fn confirm_open(&self) -> bool {
        matches!(self, Screen::DeckList(state) if state.confirm_delete.is_some())
    }
}
