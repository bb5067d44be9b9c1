//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::routes::Route;

/// Which screen is showing (needed for context-aware key mapping)
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum ScreenKind {
    #[default]
    DeckList,
    DeckCreate,
    DeckEdit,
    Import,
}

/// Input mode
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Editing,
}

/// Everything the key mapping depends on
#[derive(Clone, Copy, Debug, Default)]
pub struct KeyContext {
    pub screen: ScreenKind,
    pub input_mode: InputMode,
    pub show_help: bool,
    pub notice_open: bool,
    pub confirm_open: bool,
}

/// Events generated from user input in the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    // Navigation
    Navigate(Route),
    Back,
    NextField,
    PrevField,
    Up,
    Down,
    Left,
    Right,

    // Input editing
    StartEditing,
    StopEditing,
    CharInput(char),
    Backspace,
    CursorLeft,
    CursorRight,
    /// Enter while editing; meaning depends on the field
    InputEnter,
    /// Tab while editing; completes file paths
    InputTab,

    // Deck list
    Reload,
    OpenSelected,
    DownloadSelected,
    RequestDelete,
    ConfirmDelete,
    CancelDelete,

    // Forms and editor
    RemoveTag,
    AddCard,
    Submit,
    ToggleImportMode,

    // Popups
    ToggleHelp,
    CloseHelp,
    DismissNotice,

    // System
    Quit,
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(key: KeyEvent, ctx: KeyContext) -> Option<UiEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(UiEvent::Quit);
    }

    // Popups first, innermost wins
    if ctx.show_help {
        return Some(UiEvent::CloseHelp);
    }

    if ctx.notice_open {
        return match key.code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => Some(UiEvent::DismissNotice),
            _ => None,
        };
    }

    if ctx.confirm_open {
        return match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(UiEvent::ConfirmDelete),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(UiEvent::CancelDelete),
            _ => None,
        };
    }

    match ctx.input_mode {
        InputMode::Editing => editing_keys(key),
        InputMode::Normal => match ctx.screen {
            ScreenKind::DeckList => deck_list_keys(key),
            ScreenKind::DeckCreate => form_keys(key),
            ScreenKind::DeckEdit => editor_keys(key),
            ScreenKind::Import => match key.code {
                KeyCode::Char('t') => Some(UiEvent::ToggleImportMode),
                _ => form_keys(key),
            },
        },
    }
}

fn global_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Char('q') => Some(UiEvent::Quit),
        KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
        _ => None,
    }
}

fn editing_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Esc => Some(UiEvent::StopEditing),
        KeyCode::Left => Some(UiEvent::CursorLeft),
        KeyCode::Right => Some(UiEvent::CursorRight),
        KeyCode::Backspace => Some(UiEvent::Backspace),
        KeyCode::Enter => Some(UiEvent::InputEnter),
        KeyCode::Tab => Some(UiEvent::InputTab),
        KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
        _ => None,
    }
}

fn deck_list_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::Up),
        KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::Down),
        KeyCode::Enter | KeyCode::Char('e') => Some(UiEvent::OpenSelected),
        KeyCode::Char('n') => Some(UiEvent::Navigate(Route::DeckCreate)),
        KeyCode::Char('i') => Some(UiEvent::Navigate(Route::Import)),
        KeyCode::Char('g') => Some(UiEvent::DownloadSelected),
        KeyCode::Char('d') => Some(UiEvent::RequestDelete),
        KeyCode::Char('r') => Some(UiEvent::Reload),
        _ => global_keys(key),
    }
}

fn form_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Esc => Some(UiEvent::Back),
        KeyCode::Tab | KeyCode::Down => Some(UiEvent::NextField),
        KeyCode::BackTab | KeyCode::Up => Some(UiEvent::PrevField),
        KeyCode::Left => Some(UiEvent::Left),
        KeyCode::Right => Some(UiEvent::Right),
        KeyCode::Char('e') | KeyCode::Enter => Some(UiEvent::StartEditing),
        KeyCode::Char('x') => Some(UiEvent::RemoveTag),
        KeyCode::Char('s') => Some(UiEvent::Submit),
        _ => global_keys(key),
    }
}

fn editor_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Esc => Some(UiEvent::Back),
        KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::Up),
        KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::Down),
        KeyCode::Left | KeyCode::Char('h') => Some(UiEvent::Left),
        KeyCode::Right | KeyCode::Char('l') => Some(UiEvent::Right),
        KeyCode::Char('e') | KeyCode::Enter => Some(UiEvent::StartEditing),
        KeyCode::Char('a') => Some(UiEvent::AddCard),
        KeyCode::Char('s') => Some(UiEvent::Submit),
        KeyCode::Char('r') => Some(UiEvent::Reload),
        _ => global_keys(key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctx(screen: ScreenKind) -> KeyContext {
        KeyContext {
            screen,
            ..KeyContext::default()
        }
    }

    #[test]
    fn confirm_prompt_only_takes_yes_or_no() {
        let ctx = KeyContext {
            confirm_open: true,
            ..ctx(ScreenKind::DeckList)
        };
        assert_eq!(key_to_ui_event(press(KeyCode::Char('y')), ctx), Some(UiEvent::ConfirmDelete));
        assert_eq!(key_to_ui_event(press(KeyCode::Esc), ctx), Some(UiEvent::CancelDelete));
        assert_eq!(key_to_ui_event(press(KeyCode::Char('d')), ctx), None);
        assert_eq!(key_to_ui_event(press(KeyCode::Char('q')), ctx), None);
    }

    #[test]
    fn typing_q_while_editing_is_text() {
        let ctx = KeyContext {
            input_mode: InputMode::Editing,
            ..ctx(ScreenKind::DeckCreate)
        };
        assert_eq!(key_to_ui_event(press(KeyCode::Char('q')), ctx), Some(UiEvent::CharInput('q')));
        assert_eq!(key_to_ui_event(press(KeyCode::Tab), ctx), Some(UiEvent::InputTab));
    }

    #[test]
    fn ctrl_c_always_quits() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        let ctx = KeyContext {
            show_help: true,
            ..ctx(ScreenKind::Import)
        };
        assert_eq!(key_to_ui_event(key, ctx), Some(UiEvent::Quit));
    }

    #[test]
    fn screens_map_their_own_keys() {
        assert_eq!(
            key_to_ui_event(press(KeyCode::Char('n')), ctx(ScreenKind::DeckList)),
            Some(UiEvent::Navigate(Route::DeckCreate))
        );
        assert_eq!(
            key_to_ui_event(press(KeyCode::Char('a')), ctx(ScreenKind::DeckEdit)),
            Some(UiEvent::AddCard)
        );
        assert_eq!(
            key_to_ui_event(press(KeyCode::Char('t')), ctx(ScreenKind::Import)),
            Some(UiEvent::ToggleImportMode)
        );
        assert_eq!(key_to_ui_event(press(KeyCode::Char('t')), ctx(ScreenKind::DeckCreate)), None);
    }

    #[test]
    fn key_release_is_ignored() {
        let mut key = press(KeyCode::Char('q'));
        key.kind = KeyEventKind::Release;
        assert_eq!(key_to_ui_event(key, ctx(ScreenKind::DeckList)), None);
    }
}
