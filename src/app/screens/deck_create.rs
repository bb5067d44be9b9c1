//! New deck form

use crate::app::input::TextInput;
use crate::app::screens::Effect;
use crate::constants::LANGUAGES;
use crate::error::ApiError;
use crate::messages::NetworkCommand;
use crate::models::{CardType, Deck, DeckCreate};
use crate::routes::Route;

/// Focusable form fields, in tab order
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CreateField {
    #[default]
    Name,
    Language,
    CardType,
    Description,
    Tags,
}

impl CreateField {
    const ORDER: [CreateField; 5] = [
        CreateField::Name,
        CreateField::Language,
        CreateField::CardType,
        CreateField::Description,
        CreateField::Tags,
    ];

    pub fn next(self) -> Self {
        let i = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(i + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        let i = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(i + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    /// Whether the field takes typed text
    pub fn is_text(self) -> bool {
        matches!(self, CreateField::Name | CreateField::Description | CreateField::Tags)
    }
}

#[derive(Clone, Debug)]
pub struct DeckCreateState {
    pub name: TextInput,
    /// Index into `LANGUAGES`
    pub language: usize,
    pub card_type: CardType,
    pub description: TextInput,
    pub tag_input: TextInput,
    pub tags: Vec<String>,
    pub selected_tag: usize,
    pub focus: CreateField,
    pub submitting: bool,
    /// Inline banner for a rejected submit
    pub error: Option<String>,
    pub suggestions: Vec<String>,
    pending_submit: Option<u64>,
    pending_suggestions: Option<u64>,
}

impl Default for DeckCreateState {
    fn default() -> Self {
        DeckCreateState {
            name: TextInput::default(),
            language: LANGUAGES.iter().position(|(tag, _)| *tag == "spanish").unwrap_or(0),
            card_type: CardType::Basic,
            description: TextInput::default(),
            tag_input: TextInput::default(),
            tags: Vec::new(),
            selected_tag: 0,
            focus: CreateField::Name,
            submitting: false,
            error: None,
            suggestions: Vec::new(),
            pending_submit: None,
            pending_suggestions: None,
        }
    }
}

impl DeckCreateState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch known tags to show as suggestions
    pub fn mount(&mut self, id: u64) -> NetworkCommand {
        self.pending_suggestions = Some(id);
        NetworkCommand::LoadTagSuggestions { id }
    }

    pub fn handle_suggestions(&mut self, id: u64, result: Result<Vec<String>, ApiError>) {
        if self.pending_suggestions != Some(id) {
            return;
        }
        self.pending_suggestions = None;
        match result {
            Ok(tags) => self.suggestions = tags,
            Err(e) => tracing::debug!(error = %e, "Tag suggestions unavailable"),
        }
    }

    pub fn language_tag(&self) -> &'static str {
        LANGUAGES.get(self.language).map(|(tag, _)| *tag).unwrap_or("spanish")
    }

    pub fn active_input(&self) -> Option<&TextInput> {
        match self.focus {
            CreateField::Name => Some(&self.name),
            CreateField::Description => Some(&self.description),
            CreateField::Tags => Some(&self.tag_input),
            CreateField::Language | CreateField::CardType => None,
        }
    }

    pub fn active_input_mut(&mut self) -> Option<&mut TextInput> {
        match self.focus {
            CreateField::Name => Some(&mut self.name),
            CreateField::Description => Some(&mut self.description),
            CreateField::Tags => Some(&mut self.tag_input),
            CreateField::Language | CreateField::CardType => None,
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    /// Left/right on the focused field: cycle an option or move the tag cursor
    pub fn cycle(&mut self, forward: bool) {
        match self.focus {
            CreateField::Language => self.language = step(self.language, LANGUAGES.len(), forward),
            CreateField::CardType => {
                let i = CardType::ALL.iter().position(|t| *t == self.card_type).unwrap_or(0);
                self.card_type = CardType::ALL[step(i, CardType::ALL.len(), forward)];
            }
            CreateField::Tags if !self.tags.is_empty() => {
                self.selected_tag = step(self.selected_tag, self.tags.len(), forward);
            }
            _ => {}
        }
    }

    /// Add the typed tag. Blank and duplicate tags are ignored; the input is
    /// cleared only when the tag was added.
    pub fn add_tag(&mut self) -> bool {
        let tag = self.tag_input.value().trim().to_string();
        if tag.is_empty() || self.tags.contains(&tag) {
            return false;
        }
        self.tags.push(tag);
        self.tag_input.clear();
        true
    }

    pub fn remove_tag(&mut self, index: usize) {
        if index < self.tags.len() {
            self.tags.remove(index);
            if self.selected_tag >= self.tags.len() {
                self.selected_tag = self.tags.len().saturating_sub(1);
            }
        }
    }

    pub fn remove_selected_tag(&mut self) {
        self.remove_tag(self.selected_tag);
    }

    pub fn draft(&self) -> DeckCreate {
        let description = self.description.value().trim();
        DeckCreate {
            name: self.name.value().trim().to_string(),
            language: self.language_tag().to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            tags: self.tags.clone(),
            card_type: self.card_type,
        }
    }

    pub fn submit(&mut self, id: u64) -> Option<NetworkCommand> {
        if self.submitting {
            return None;
        }
        if self.name.is_blank() {
            self.error = Some(String::from("Deck name is required"));
            return None;
        }
        self.error = None;
        self.submitting = true;
        self.pending_submit = Some(id);
        Some(NetworkCommand::CreateDeck {
            id,
            draft: self.draft(),
        })
    }

    pub fn handle_created(&mut self, id: u64, result: Result<Deck, ApiError>) -> Vec<Effect> {
        if self.pending_submit != Some(id) {
            return Vec::new();
        }
        self.pending_submit = None;
        self.submitting = false;
        match result {
            Ok(deck) => {
                tracing::info!(deck_id = %deck.id, "Created deck");
                vec![Effect::Navigate(Route::DeckEdit(deck.id))]
            }
            Err(e) => {
                tracing::error!(error = %e, "Error creating deck");
                self.error = Some(e.user_message("Failed to create deck"));
                Vec::new()
            }
        }
    }
}

fn step(i: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        0
    } else if forward {
        (i + 1) % len
    } else {
        (i + len - 1) % len
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::testing::deck;

    fn typed(state: &mut DeckCreateState, text: &str) {
        for c in text.chars() {
            state.tag_input.insert(c);
        }
    }

    #[test]
    fn defaults_to_spanish_basic() {
        let state = DeckCreateState::new();
        assert_eq!(state.language_tag(), "spanish");
        assert_eq!(state.card_type, CardType::Basic);
    }

    #[test]
    fn tags_are_trimmed_and_deduplicated() {
        let mut state = DeckCreateState::new();
        typed(&mut state, "  verbs ");
        assert!(state.add_tag());
        assert_eq!(state.tag_input.value(), "");

        typed(&mut state, "verbs");
        assert!(!state.add_tag());
        assert_eq!(state.tag_input.value(), "verbs");

        state.tag_input.set("   ");
        assert!(!state.add_tag());
        assert_eq!(state.tags, vec!["verbs"]);
    }

    #[test]
    fn remove_tag_keeps_selection_in_range() {
        let mut state = DeckCreateState::new();
        state.tags = vec!["a".into(), "b".into()];
        state.selected_tag = 1;
        state.remove_selected_tag();
        assert_eq!(state.tags, vec!["a"]);
        assert_eq!(state.selected_tag, 0);
        state.remove_tag(5);
        assert_eq!(state.tags.len(), 1);
    }

    #[test]
    fn submit_requires_a_name() {
        let mut state = DeckCreateState::new();
        state.name.set("   ");
        assert!(state.submit(1).is_none());
        assert!(state.error.is_some());
        assert!(!state.submitting);
    }

    #[test]
    fn draft_omits_empty_description() {
        let mut state = DeckCreateState::new();
        state.name.set("Spanish Vocabulary");
        let draft = match state.submit(2) {
            Some(NetworkCommand::CreateDeck { draft, .. }) => draft,
            other => panic!("unexpected command: {:?}", other),
        };
        assert_eq!(draft.description, None);
        assert!(draft.tags.is_empty());
        assert_eq!(draft.language, "spanish");
    }

    #[test]
    fn success_opens_the_editor() {
        let mut state = DeckCreateState::new();
        state.name.set("Trip");
        state.submit(3);
        let effects = state.handle_created(3, Ok(deck("trip", 0)));
        assert_eq!(effects, vec![Effect::Navigate(Route::DeckEdit("trip".into()))]);
    }

    #[test]
    fn server_message_is_shown_verbatim() {
        let mut state = DeckCreateState::new();
        state.name.set("Trip");
        state.submit(3);
        let err = ApiError::Server {
            status: 400,
            detail: Some("Deck already exists".into()),
        };
        assert!(state.handle_created(3, Err(err)).is_empty());
        assert_eq!(state.error.as_deref(), Some("Deck already exists"));

        state.submit(4);
        state.handle_created(4, Err(ApiError::Transport("refused".into())));
        assert_eq!(state.error.as_deref(), Some("Failed to create deck"));
    }

    #[test]
    fn suggestion_failure_is_silent() {
        let mut state = DeckCreateState::new();
        state.mount(1);
        state.handle_suggestions(1, Err(ApiError::Transport("x".into())));
        assert!(state.suggestions.is_empty());
        assert_eq!(state.error, None);
    }

    #[test]
    fn cycling_wraps_options() {
        let mut state = DeckCreateState::new();
        state.focus = CreateField::CardType;
        state.cycle(false);
        assert_eq!(state.card_type, CardType::Reversed);
        state.focus = CreateField::Language;
        state.language = 0;
        state.cycle(false);
        assert_eq!(state.language_tag(), "generic");
    }
}
