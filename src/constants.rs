//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// Default base URL of the deck generator API
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";

/// Environment variable that overrides the API base URL
pub const API_URL_ENV: &str = "ANKI_DECK_API_URL";

/// Directory (under the home directory) holding config and logs
pub const CONFIG_DIR_NAME: &str = ".anki-deck-tui";

/// Config file name inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Log file name inside the config directory
pub const LOG_FILE_NAME: &str = "anki-deck-tui.log";

/// Extension of downloaded deck packages
pub const PACKAGE_EXTENSION: &str = "apkg";

/// Application name
pub const APP_NAME: &str = "Anki Deck Manager";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Language tags offered by the forms, with their display labels
pub const LANGUAGES: &[(&str, &str)] = &[
    ("spanish", "Spanish"),
    ("english", "English"),
    ("french", "French"),
    ("german", "German"),
    ("italian", "Italian"),
    ("portuguese", "Portuguese"),
    ("russian", "Russian"),
    ("japanese", "Japanese"),
    ("chinese", "Chinese"),
    ("korean", "Korean"),
    ("generic", "Other"),
];

/// Display label for a language tag, falling back to the tag itself
pub fn language_label(tag: &str) -> &str {
    LANGUAGES
        .iter()
        .find(|(t, _)| *t == tag)
        .map(|(_, label)| *label)
        .unwrap_or(tag)
}
