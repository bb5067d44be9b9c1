//! Command handlers - business logic for processing UI events

use crate::app::screens::{CreateField, Effect, ImportField, Notice, Screen};
use crate::app::AppState;
use crate::messages::ui_events::InputMode;
use crate::messages::{NetworkCommand, NetworkResponse};
use crate::routes::Route;
use crate::storage;

impl AppState {
    // ========================
    // Navigation
    // ========================

    /// Leave a form or the editor for the deck list
    pub fn back(&mut self) -> Option<NetworkCommand> {
        match self.screen {
            Screen::DeckList(_) => None,
            _ => self.navigate(Route::DeckList),
        }
    }

    pub fn next_field(&mut self) {
        match &mut self.screen {
            Screen::DeckCreate(state) => state.focus_next(),
            Screen::Import(state) => state.focus_next(),
            _ => {}
        }
    }

    pub fn prev_field(&mut self) {
        match &mut self.screen {
            Screen::DeckCreate(state) => state.focus_prev(),
            Screen::Import(state) => state.focus_prev(),
            _ => {}
        }
    }

    pub fn move_up(&mut self) {
        match &mut self.screen {
            Screen::DeckList(state) => state.select_prev(),
            Screen::DeckEdit(state) => state.move_up(),
            _ => {}
        }
    }

    pub fn move_down(&mut self) {
        match &mut self.screen {
            Screen::DeckList(state) => state.select_next(),
            Screen::DeckEdit(state) => state.move_down(),
            _ => {}
        }
    }

    pub fn move_left(&mut self) {
        match &mut self.screen {
            Screen::DeckCreate(state) => state.cycle(false),
            Screen::Import(state) => state.cycle(false),
            Screen::DeckEdit(state) => state.move_left(),
            Screen::DeckList(_) => {}
        }
    }

    pub fn move_right(&mut self) {
        match &mut self.screen {
            Screen::DeckCreate(state) => state.cycle(true),
            Screen::Import(state) => state.cycle(true),
            Screen::DeckEdit(state) => state.move_right(),
            Screen::DeckList(_) => {}
        }
    }

    // ========================
    // Input editing
    // ========================

    pub fn start_editing(&mut self) {
        let editable = match &mut self.screen {
            Screen::DeckEdit(state) => state.begin_edit(),
            screen => screen.active_input().is_some(),
        };
        if editable {
            self.input_mode = InputMode::Editing;
        }
    }

    pub fn stop_editing(&mut self) {
        if let Screen::DeckEdit(state) = &mut self.screen {
            state.end_edit();
        }
        self.input_mode = InputMode::Normal;
    }

    /// Run `f` on the active buffer, then mirror the edit into the editor row
    fn edit_input(&mut self, f: impl FnOnce(&mut crate::app::input::TextInput)) {
        if let Some(input) = self.screen.active_input_mut() {
            f(input);
        }
        if let Screen::DeckEdit(state) = &mut self.screen {
            state.sync_cell();
        }
    }

    pub fn enter_char(&mut self, c: char) {
        self.edit_input(|input| input.insert(c));
    }

    pub fn delete_char(&mut self) {
        self.edit_input(|input| input.backspace());
    }

    pub fn move_cursor_left(&mut self) {
        if let Some(input) = self.screen.active_input_mut() {
            input.move_left();
        }
    }

    pub fn move_cursor_right(&mut self) {
        if let Some(input) = self.screen.active_input_mut() {
            input.move_right();
        }
    }

    /// Enter while editing: adds a tag, breaks a line in the text body,
    /// otherwise finishes editing
    pub fn input_enter(&mut self) {
        let handled = match &mut self.screen {
            Screen::DeckCreate(state) if state.focus == CreateField::Tags => {
                state.add_tag();
                true
            }
            Screen::Import(state) if state.focus == ImportField::Body => {
                if let Some(input) = state.active_input_mut() {
                    input.insert('\n');
                }
                true
            }
            _ => false,
        };
        if !handled {
            self.stop_editing();
        }
    }

    pub fn input_tab(&mut self) {
        if let Screen::Import(state) = &mut self.screen {
            if state.focus == ImportField::File {
                state.complete_file_path();
            }
        }
    }

    // ========================
    // Deck list
    // ========================

    /// Re-run the current screen's load
    pub fn reload(&mut self) -> Option<NetworkCommand> {
        let id = self.next_id();
        match &mut self.screen {
            Screen::DeckList(state) => Some(state.load(id)),
            Screen::DeckEdit(state) => Some(state.load(id)),
            _ => None,
        }
    }

    pub fn open_selected(&mut self) -> Option<NetworkCommand> {
        let deck_id = match &self.screen {
            Screen::DeckList(state) => state.selected_deck()?.id.clone(),
            _ => return None,
        };
        self.navigate(Route::DeckEdit(deck_id))
    }

    pub fn download_selected(&mut self) -> Option<NetworkCommand> {
        let id = self.next_id();
        match &mut self.screen {
            Screen::DeckList(state) => state.download_selected(id),
            _ => None,
        }
    }

    pub fn request_delete(&mut self) {
        if let Screen::DeckList(state) = &mut self.screen {
            state.request_delete();
        }
    }

    pub fn confirm_delete(&mut self) -> Option<NetworkCommand> {
        let id = self.next_id();
        match &mut self.screen {
            Screen::DeckList(state) => state.confirm_delete(id),
            _ => None,
        }
    }

    pub fn cancel_delete(&mut self) {
        if let Screen::DeckList(state) = &mut self.screen {
            state.cancel_delete();
        }
    }

    // ========================
    // Forms and editor
    // ========================

    pub fn remove_tag(&mut self) {
        if let Screen::DeckCreate(state) = &mut self.screen {
            if state.focus == CreateField::Tags {
                state.remove_selected_tag();
            }
        }
    }

    pub fn add_card(&mut self) {
        if let Screen::DeckEdit(state) = &mut self.screen {
            state.add_card();
        }
    }

    /// Create the deck, save the editor or run the import
    pub fn submit(&mut self) -> Option<NetworkCommand> {
        if self.input_mode == InputMode::Editing {
            self.stop_editing();
        }
        let id = self.next_id();
        match &mut self.screen {
            Screen::DeckCreate(state) => state.submit(id),
            Screen::DeckEdit(state) => state.save(id),
            Screen::Import(state) => state.submit(id),
            Screen::DeckList(_) => None,
        }
    }

    pub fn toggle_import_mode(&mut self) {
        if let Screen::Import(state) = &mut self.screen {
            state.toggle_mode();
        }
    }

    // ========================
    // Popups
    // ========================

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    // ========================
    // Network responses
    // ========================

    /// Hand a response to the screen that asked for it. Responses for a
    /// screen that is no longer showing are dropped.
    pub fn handle_response(&mut self, response: NetworkResponse) -> Vec<NetworkCommand> {
        let effects = match (response, &mut self.screen) {
            (NetworkResponse::DecksLoaded { id, result }, Screen::DeckList(state)) => {
                state.handle_decks_loaded(id, result);
                Vec::new()
            }
            (NetworkResponse::DeckDeleted { id, deck_id, result }, Screen::DeckList(state)) => {
                state.handle_deleted(id, &deck_id, result)
            }
            (NetworkResponse::PackageDownloaded { id, deck_id, result }, Screen::DeckList(state)) => {
                state.handle_downloaded(id, deck_id, result)
            }
            (NetworkResponse::TagSuggestions { id, result }, Screen::DeckCreate(state)) => {
                state.handle_suggestions(id, result);
                Vec::new()
            }
            (NetworkResponse::DeckCreated { id, result }, Screen::DeckCreate(state)) => {
                state.handle_created(id, result)
            }
            (NetworkResponse::EditorLoaded { id, result }, Screen::DeckEdit(state)) => {
                state.handle_loaded(id, result);
                Vec::new()
            }
            (NetworkResponse::CardsSaved { id, result }, Screen::DeckEdit(state)) => {
                state.handle_saved(id, result)
            }
            (NetworkResponse::Imported { id, result }, Screen::Import(state)) => {
                state.handle_imported(id, result)
            }
            (response, _) => {
                tracing::debug!(id = response.id(), "Dropping response for inactive screen");
                Vec::new()
            }
        };
        self.apply_effects(effects)
    }

    fn apply_effects(&mut self, effects: Vec<Effect>) -> Vec<NetworkCommand> {
        let mut commands = Vec::new();
        for effect in effects {
            let command = match effect {
                Effect::Reload => self.reload(),
                Effect::Navigate(route) => self.navigate(route),
                Effect::Notice(notice) => {
                    self.notice = Some(notice);
                    None
                }
                Effect::SavePackage { deck_id, bytes } => {
                    self.notice = Some(self.save_package(&deck_id, &bytes));
                    None
                }
            };
            commands.extend(command);
        }
        commands
    }

    fn save_package(&self, deck_id: &str, bytes: &[u8]) -> Notice {
        match storage::save_package(&self.download_dir, deck_id, bytes) {
            Ok(path) => {
                tracing::info!(deck_id, path = %path.display(), "Saved package");
                Notice::info(format!("Downloaded {}", path.display()))
            }
            Err(e) => {
                tracing::error!(deck_id, error = %e, "Error saving package");
                Notice::error(format!("Failed to save package: {:#}", e))
            }
        }
    }
}
