//! Render state - data structure sent from App layer to UI for rendering

use std::path::PathBuf;

use crate::app::screens::{DashboardState, Notice, Screen};
use crate::messages::ui_events::{InputMode, KeyContext};
use crate::models::DeckFilter;
use crate::routes::Route;

/// Complete state needed by the UI to render
#[derive(Debug, Clone)]
pub struct RenderState {
    pub route: Route,
    pub screen: Screen,
    pub input_mode: InputMode,
    pub show_help: bool,
    pub notice: Option<Notice>,
    /// Shown in the status bar
    pub api_url: String,
    pub download_dir: PathBuf,
}

impl RenderState {
    /// Context for mapping the next key press
    pub fn key_context(&self) -> KeyContext {
        KeyContext {
            screen: self.screen.kind(),
            input_mode: self.input_mode,
            show_help: self.show_help,
            notice_open: self.notice.is_some(),
            confirm_open: self.screen.confirm_open(),
        }
    }
}

impl Default for RenderState {
    fn default() -> Self {
        use crate::constants::DEFAULT_API_URL;
        RenderState {
            route: Route::DeckList,
            screen: Screen::DeckList(DashboardState::new(DeckFilter::default())),
            input_mode: InputMode::Normal,
            show_help: false,
            notice: None,
            api_url: String::from(DEFAULT_API_URL),
            download_dir: PathBuf::from("."),
        }
    }
}
