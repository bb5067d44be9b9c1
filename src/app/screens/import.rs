//! Import screen: CSV file or pasted text, one form per mode

use std::fs;
use std::path::{Path, PathBuf};

use crate::app::input::TextInput;
use crate::app::screens::Effect;
use crate::constants::LANGUAGES;
use crate::error::ApiError;
use crate::messages::NetworkCommand;
use crate::models::{CardType, CsvImport, Deck, Separator, TextImport};
use crate::routes::Route;

/// Card types the CSV importer understands
pub const CSV_CARD_TYPES: [CardType; 2] = [CardType::Basic, CardType::Cloze];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ImportMode {
    #[default]
    Csv,
    Text,
}

impl ImportMode {
    pub fn label(&self) -> &'static str {
        match self {
            ImportMode::Csv => "CSV File",
            ImportMode::Text => "Text",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImportField {
    File,
    DeckName,
    Language,
    CardType,
    Separator,
    Body,
}

impl ImportField {
    pub fn is_text(self) -> bool {
        matches!(self, ImportField::File | ImportField::DeckName | ImportField::Body)
    }
}

const CSV_FIELDS: [ImportField; 4] = [
    ImportField::File,
    ImportField::DeckName,
    ImportField::Language,
    ImportField::CardType,
];

const TEXT_FIELDS: [ImportField; 5] = [
    ImportField::DeckName,
    ImportField::Language,
    ImportField::Separator,
    ImportField::CardType,
    ImportField::Body,
];

#[derive(Clone, Debug)]
pub struct CsvForm {
    pub path: TextInput,
    /// Optional; the server derives one from the file name when blank
    pub deck_name: TextInput,
    pub language: usize,
    pub card_type: CardType,
}

#[derive(Clone, Debug)]
pub struct TextForm {
    pub deck_name: TextInput,
    pub language: usize,
    pub separator: Separator,
    pub card_type: CardType,
    pub text: TextInput,
}

fn default_language() -> usize {
    LANGUAGES.iter().position(|(tag, _)| *tag == "spanish").unwrap_or(0)
}

fn language_tag(index: usize) -> String {
    LANGUAGES
        .get(index)
        .map(|(tag, _)| tag.to_string())
        .unwrap_or_else(|| String::from("spanish"))
}

#[derive(Clone, Debug)]
pub struct ImportState {
    pub mode: ImportMode,
    pub csv: CsvForm,
    pub text: TextForm,
    pub focus: ImportField,
    pub submitting: bool,
    pub error: Option<String>,
    pending: Option<u64>,
}

impl Default for ImportState {
    fn default() -> Self {
        ImportState {
            mode: ImportMode::Csv,
            csv: CsvForm {
                path: TextInput::default(),
                deck_name: TextInput::default(),
                language: default_language(),
                card_type: CardType::Basic,
            },
            text: TextForm {
                deck_name: TextInput::default(),
                language: default_language(),
                separator: Separator::Tab,
                card_type: CardType::Basic,
                text: TextInput::default(),
            },
            focus: ImportField::File,
            submitting: false,
            error: None,
            pending: None,
        }
    }
}

impl ImportState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields(&self) -> &'static [ImportField] {
        match self.mode {
            ImportMode::Csv => &CSV_FIELDS,
            ImportMode::Text => &TEXT_FIELDS,
        }
    }

    /// Switch between CSV and text; each form keeps what was typed
    pub fn toggle_mode(&mut self) {
        if self.submitting {
            return;
        }
        self.mode = match self.mode {
            ImportMode::Csv => ImportMode::Text,
            ImportMode::Text => ImportMode::Csv,
        };
        self.focus = self.fields()[0];
        self.error = None;
    }

    pub fn focus_next(&mut self) {
        let fields = self.fields();
        let i = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = fields[(i + 1) % fields.len()];
    }

    pub fn focus_prev(&mut self) {
        let fields = self.fields();
        let i = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = fields[(i + fields.len() - 1) % fields.len()];
    }

    pub fn active_input(&self) -> Option<&TextInput> {
        match (self.mode, self.focus) {
            (ImportMode::Csv, ImportField::File) => Some(&self.csv.path),
            (ImportMode::Csv, ImportField::DeckName) => Some(&self.csv.deck_name),
            (ImportMode::Text, ImportField::DeckName) => Some(&self.text.deck_name),
            (ImportMode::Text, ImportField::Body) => Some(&self.text.text),
            _ => None,
        }
    }

    pub fn active_input_mut(&mut self) -> Option<&mut TextInput> {
        match (self.mode, self.focus) {
            (ImportMode::Csv, ImportField::File) => Some(&mut self.csv.path),
            (ImportMode::Csv, ImportField::DeckName) => Some(&mut self.csv.deck_name),
            (ImportMode::Text, ImportField::DeckName) => Some(&mut self.text.deck_name),
            (ImportMode::Text, ImportField::Body) => Some(&mut self.text.text),
            _ => None,
        }
    }

    /// Left/right on an option field
    pub fn cycle(&mut self, forward: bool) {
        let step = |i: usize, len: usize| if forward { (i + 1) % len } else { (i + len - 1) % len };
        match (self.mode, self.focus) {
            (ImportMode::Csv, ImportField::Language) => {
                self.csv.language = step(self.csv.language, LANGUAGES.len());
            }
            (ImportMode::Csv, ImportField::CardType) => {
                let i = CSV_CARD_TYPES.iter().position(|t| *t == self.csv.card_type).unwrap_or(0);
                self.csv.card_type = CSV_CARD_TYPES[step(i, CSV_CARD_TYPES.len())];
            }
            (ImportMode::Text, ImportField::Language) => {
                self.text.language = step(self.text.language, LANGUAGES.len());
            }
            (ImportMode::Text, ImportField::Separator) => {
                let i = Separator::ALL.iter().position(|s| *s == self.text.separator).unwrap_or(0);
                self.text.separator = Separator::ALL[step(i, Separator::ALL.len())];
            }
            (ImportMode::Text, ImportField::CardType) => {
                let i = CardType::ALL.iter().position(|t| *t == self.text.card_type).unwrap_or(0);
                self.text.card_type = CardType::ALL[step(i, CardType::ALL.len())];
            }
            _ => {}
        }
    }

    /// Tab in the file field
    pub fn complete_file_path(&mut self) {
        if let Some(completed) = complete_path(self.csv.path.value()) {
            self.csv.path.set(completed);
        }
    }

    fn csv_request(&self) -> Result<CsvImport, String> {
        let raw = self.csv.path.value().trim();
        if raw.is_empty() {
            return Err(String::from("Please select a CSV file"));
        }
        let path = expand_home(raw);
        let is_csv = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);
        if !is_csv {
            return Err(String::from("Please select a CSV file"));
        }
        if !path.is_file() {
            return Err(format!("File not found: {}", path.display()));
        }
        let deck_name = self.csv.deck_name.value().trim();
        Ok(CsvImport {
            path,
            deck_name: (!deck_name.is_empty()).then(|| deck_name.to_string()),
            language: language_tag(self.csv.language),
            card_type: self.csv.card_type,
        })
    }

    fn text_request(&self) -> Result<TextImport, String> {
        if self.text.deck_name.is_blank() || self.text.text.is_blank() {
            return Err(String::from("Please provide both deck name and text data"));
        }
        Ok(TextImport {
            text: self.text.text.value().to_string(),
            deck_name: self.text.deck_name.value().trim().to_string(),
            language: language_tag(self.text.language),
            separator: self.text.separator,
            card_type: self.text.card_type,
        })
    }

    pub fn submit(&mut self, id: u64) -> Option<NetworkCommand> {
        if self.submitting {
            return None;
        }
        let command = match self.mode {
            ImportMode::Csv => self
                .csv_request()
                .map(|request| NetworkCommand::ImportCsv { id, request }),
            ImportMode::Text => self
                .text_request()
                .map(|request| NetworkCommand::ImportText { id, request }),
        };
        match command {
            Ok(command) => {
                self.error = None;
                self.submitting = true;
                self.pending = Some(id);
                Some(command)
            }
            Err(message) => {
                self.error = Some(message);
                None
            }
        }
    }

    pub fn handle_imported(&mut self, id: u64, result: Result<Deck, ApiError>) -> Vec<Effect> {
        if self.pending != Some(id) {
            return Vec::new();
        }
        self.pending = None;
        self.submitting = false;
        match result {
            Ok(deck) => {
                tracing::info!(deck_id = %deck.id, mode = ?self.mode, "Imported deck");
                vec![Effect::Navigate(Route::DeckEdit(deck.id))]
            }
            Err(e) => {
                let fallback = match self.mode {
                    ImportMode::Csv => "Failed to import CSV",
                    ImportMode::Text => "Failed to import text",
                };
                tracing::error!(error = %e, "{}", fallback);
                self.error = Some(e.user_message(fallback));
                Vec::new()
            }
        }
    }
}

fn expand_home(input: &str) -> PathBuf {
    match (input.strip_prefix('~'), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest.trim_start_matches('/')),
        _ => PathBuf::from(input),
    }
}

fn is_candidate(path: &Path) -> bool {
    path.is_dir()
        || path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false)
}

/// Complete a typed path against the filesystem.
///
/// Offers directories and `.csv` files. A single match is completed fully
/// (directories gain a trailing `/`); several matches complete to their
/// common prefix. Returns `None` when nothing would change.
pub fn complete_path(input: &str) -> Option<String> {
    let expanded = expand_home(input).to_string_lossy().to_string();
    let path = PathBuf::from(&expanded);

    if path.is_dir() && !expanded.ends_with('/') && !expanded.is_empty() {
        return Some(format!("{}/", expanded));
    }

    let (parent, prefix) = if expanded.is_empty() || expanded.ends_with('/') {
        (PathBuf::from(if expanded.is_empty() { "." } else { expanded.as_str() }), String::new())
    } else {
        let prefix = path.file_name()?.to_string_lossy().to_string();
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        (parent, prefix)
    };

    let mut matches: Vec<String> = fs::read_dir(&parent)
        .ok()?
        .filter_map(|e| e.ok())
        .filter(|e| is_candidate(&e.path()))
        .filter_map(|e| e.file_name().into_string().ok())
        .filter(|name| name.starts_with(&prefix) && !name.starts_with('.'))
        .collect();
    matches.sort();

    let join = |name: &str| -> String {
        if expanded.is_empty() {
            name.to_string()
        } else if expanded.ends_with('/') {
            format!("{}{}", expanded, name)
        } else {
            let head = expanded.strip_suffix(prefix.as_str()).unwrap_or(&expanded);
            format!("{}{}", head, name)
        }
    };

    match matches.as_slice() {
        [] => None,
        [only] => {
            let completed = join(only.as_str());
            if parent.join(only).is_dir() {
                Some(format!("{}/", completed))
            } else {
                Some(completed)
            }
        }
        many => {
            let common = common_prefix(many)?;
            (common.len() > prefix.len()).then(|| join(common.as_str()))
        }
    }
}

/// Longest shared prefix, cut on a char boundary
fn common_prefix(strings: &[String]) -> Option<String> {
    let first = strings.first()?;
    let mut end = first.len();
    for s in &strings[1..] {
        end = first
            .char_indices()
            .zip(s.chars())
            .take_while(|((_, a), b)| a == b)
            .last()
            .map(|((i, a), _)| i + a.len_utf8())
            .unwrap_or(0)
            .min(end);
    }
    (end > 0).then(|| first[..end].to_string())
}
