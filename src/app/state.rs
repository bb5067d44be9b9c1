//! App state - pure data structure with no I/O logic

use std::path::PathBuf;

use crate::app::screens::{DashboardState, DeckCreateState, DeckEditState, ImportState, Notice, Screen};
use crate::config::Config;
use crate::messages::ui_events::InputMode;
use crate::messages::{NetworkCommand, RenderState};
use crate::models::DeckFilter;
use crate::routes::Route;

/// Main application state - pure data, no I/O
pub struct AppState {
    pub route: Route,
    pub screen: Screen,
    pub input_mode: InputMode,

    // Popups
    pub show_help: bool,
    pub notice: Option<Notice>,

    // Settings
    pub api_url: String,
    pub download_dir: PathBuf,
    pub filter: DeckFilter,

    pub next_request_id: u64,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let filter = config.deck_filter();
        AppState {
            route: Route::DeckList,
            screen: Screen::DeckList(DashboardState::new(filter.clone())),
            input_mode: InputMode::Normal,
            show_help: false,
            notice: None,
            api_url: config.api_url.clone(),
            download_dir: config.download_dir.clone(),
            filter,
            next_request_id: 1,
        }
    }

    /// Generate a unique request ID
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    /// Replace the current screen and return its mount request.
    ///
    /// Pending responses for the old screen are dropped when they arrive,
    /// since the new screen never issued their ids. Open notices survive.
    pub fn navigate(&mut self, route: Route) -> Option<NetworkCommand> {
        tracing::info!(from = %self.route, to = %route, "Navigating");
        self.input_mode = InputMode::Normal;
        self.show_help = false;
        let id = self.next_id();
        let (screen, command) = match &route {
            Route::DeckList => {
                let mut state = DashboardState::new(self.filter.clone());
                let command = state.load(id);
                (Screen::DeckList(state), Some(command))
            }
            Route::DeckCreate => {
                let mut state = DeckCreateState::new();
                let command = state.mount(id);
                (Screen::DeckCreate(state), Some(command))
            }
            Route::DeckEdit(deck_id) => {
                let mut state = DeckEditState::new(deck_id.clone());
                let command = state.load(id);
                (Screen::DeckEdit(state), Some(command))
            }
            Route::Import => (Screen::Import(ImportState::new()), None),
        };
        self.route = route;
        self.screen = screen;
        command
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        RenderState {
            route: self.route.clone(),
            screen: self.screen.clone(),
            input_mode: self.input_mode,
            show_help: self.show_help,
            notice: self.notice.clone(),
            api_url: self.api_url.clone(),
            download_dir: self.download_dir.clone(),
        }
    }
}
