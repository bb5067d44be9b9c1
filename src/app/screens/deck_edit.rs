//! Card editor for one deck.
//!
//! Rows are edited locally and only reach the server on save. Rows loaded
//! from the server keep their id; rows added here get a negative placeholder
//! (-1, -2, ...) that is never sent. Saving updates every persisted row one
//! call at a time, then creates all pending rows in a single batch.

use crate::app::input::TextInput;
use crate::app::screens::{Effect, Notice};
use crate::error::ApiError;
use crate::messages::NetworkCommand;
use crate::models::{Card, CardCreate, CardFields, CardId, CardUpdate, Deck};
use crate::network::workflows::{EditorData, EditorLoadError, SavePlan, SaveReport};
use crate::routes::Route;

/// Column header for the tag list, shown after the field columns
pub const TAGS_COLUMN: &str = "Tags";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditorStatus {
    Loading,
    Failed(String),
    Ready,
}

/// One row of the editor
#[derive(Clone, Debug, PartialEq)]
pub struct EditableCard {
    pub id: CardId,
    pub fields: CardFields,
    pub tags: Vec<String>,
}

impl From<Card> for EditableCard {
    fn from(card: Card) -> Self {
        EditableCard {
            id: CardId::Persisted(card.id),
            fields: card.fields,
            tags: card.tags,
        }
    }
}

#[derive(Clone, Debug)]
pub struct DeckEditState {
    pub deck_id: String,
    pub status: EditorStatus,
    pub deck: Option<Deck>,
    pub cards: Vec<EditableCard>,
    /// Placeholder for the next added row; only ever decreases
    pub next_placeholder: i64,
    pub selected_row: usize,
    pub selected_col: usize,
    /// Buffer for the cell being edited
    pub cell: Option<TextInput>,
    pub saving: bool,
    pending_load: Option<u64>,
    pending_save: Option<u64>,
}

impl DeckEditState {
    pub fn new(deck_id: impl Into<String>) -> Self {
        DeckEditState {
            deck_id: deck_id.into(),
            status: EditorStatus::Loading,
            deck: None,
            cards: Vec::new(),
            next_placeholder: -1,
            selected_row: 0,
            selected_col: 0,
            cell: None,
            saving: false,
            pending_load: None,
            pending_save: None,
        }
    }

    /// Fetch the deck, then its cards
    pub fn load(&mut self, id: u64) -> NetworkCommand {
        self.status = EditorStatus::Loading;
        self.pending_load = Some(id);
        NetworkCommand::LoadEditor {
            id,
            deck_id: self.deck_id.clone(),
        }
    }

    pub fn handle_loaded(&mut self, id: u64, result: Result<EditorData, EditorLoadError>) {
        if self.pending_load != Some(id) {
            return;
        }
        self.pending_load = None;
        match result {
            Ok(EditorData { deck, cards }) => {
                self.deck = Some(deck);
                self.cards = cards.into_iter().map(EditableCard::from).collect();
                self.selected_row = 0;
                self.selected_col = 0;
                self.status = EditorStatus::Ready;
            }
            Err(e) => {
                let message = match &e {
                    EditorLoadError::DeckMissing => "Deck not found",
                    EditorLoadError::Deck(_) => "Failed to load deck",
                    EditorLoadError::Cards(_) => "Failed to load cards",
                };
                tracing::error!(deck_id = %self.deck_id, error = ?e, "{}", message);
                self.status = EditorStatus::Failed(message.to_string());
            }
        }
    }

    /// Column names: the first row's fields, else the deck type's schema
    pub fn field_names(&self) -> Vec<String> {
        match (self.cards.first(), &self.deck) {
            (Some(card), _) => card.fields.names().into_iter().map(String::from).collect(),
            (None, Some(deck)) => deck.card_type.field_names().iter().map(|n| n.to_string()).collect(),
            (None, None) => Vec::new(),
        }
    }

    /// Field columns plus the tags column
    pub fn column_count(&self) -> usize {
        self.field_names().len() + 1
    }

    /// Append an empty row with the current columns (the deck type's schema
    /// when there are no rows yet)
    pub fn add_card(&mut self) {
        if self.deck.is_none() {
            return;
        }
        let fields = CardFields::from_pairs(
            self.field_names()
                .into_iter()
                .map(|name| (name, String::new()))
                .collect(),
        );
        let id = CardId::Pending(self.next_placeholder);
        self.next_placeholder -= 1;
        self.cards.push(EditableCard {
            id,
            fields,
            tags: Vec::new(),
        });
        self.selected_row = self.cards.len() - 1;
        self.selected_col = 0;
        tracing::debug!(deck_id = %self.deck_id, placeholder = id.as_i64(), "Added card row");
    }

    /// Overwrite one field of one row. Out-of-range rows are ignored.
    pub fn edit_field(&mut self, index: usize, field: &str, value: impl Into<String>) {
        if let Some(card) = self.cards.get_mut(index) {
            card.fields.set(field, value);
        }
    }

    pub fn set_tags(&mut self, index: usize, raw: &str) {
        if let Some(card) = self.cards.get_mut(index) {
            card.tags = raw
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(String::from)
                .collect();
        }
    }

    pub fn move_up(&mut self) {
        self.selected_row = self.selected_row.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.selected_row + 1 < self.cards.len() {
            self.selected_row += 1;
        }
    }

    pub fn move_left(&mut self) {
        self.selected_col = self.selected_col.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.selected_col + 1 < self.column_count() {
            self.selected_col += 1;
        }
    }

    /// Current text of the selected cell
    pub fn selected_value(&self) -> Option<String> {
        let card = self.cards.get(self.selected_row)?;
        let names = self.field_names();
        match names.get(self.selected_col) {
            Some(name) => Some(card.fields.get(name).unwrap_or_default().to_string()),
            None => Some(card.tags.join(", ")),
        }
    }

    /// Open the selected cell for editing
    pub fn begin_edit(&mut self) -> bool {
        if self.status != EditorStatus::Ready || self.saving {
            return false;
        }
        match self.selected_value() {
            Some(value) => {
                self.cell = Some(TextInput::new(value));
                true
            }
            None => false,
        }
    }

    /// Copy the cell buffer into the row; called after every keystroke
    pub fn sync_cell(&mut self) {
        let Some(value) = self.cell.as_ref().map(|c| c.value().to_string()) else {
            return;
        };
        let row = self.selected_row;
        match self.field_names().get(self.selected_col) {
            Some(name) => self.edit_field(row, name, value),
            None => self.set_tags(row, &value),
        }
    }

    pub fn end_edit(&mut self) {
        self.sync_cell();
        self.cell = None;
    }

    /// Split rows into updates for persisted cards and creates for pending ones
    pub fn save_plan(&self) -> SavePlan {
        let mut plan = SavePlan::default();
        for card in &self.cards {
            match card.id {
                CardId::Persisted(id) => plan.updates.push((
                    id,
                    CardUpdate {
                        fields: Some(card.fields.clone()),
                        tags: Some(card.tags.clone()),
                    },
                )),
                CardId::Pending(_) => plan.creates.push(CardCreate {
                    fields: card.fields.clone(),
                    tags: card.tags.clone(),
                }),
            }
        }
        plan
    }

    pub fn save(&mut self, id: u64) -> Option<NetworkCommand> {
        if self.saving || self.status != EditorStatus::Ready {
            return None;
        }
        if self.cell.is_some() {
            self.end_edit();
        }
        self.saving = true;
        self.pending_save = Some(id);
        let plan = self.save_plan();
        tracing::info!(
            deck_id = %self.deck_id,
            updates = plan.updates.len(),
            creates = plan.creates.len(),
            "Saving deck"
        );
        Some(NetworkCommand::SaveCards {
            id,
            deck_id: self.deck_id.clone(),
            plan,
        })
    }

    /// Swap pending rows for the cards the server created, in order
    fn reconcile(&mut self, created: Vec<Card>) {
        let mut created = created.into_iter();
        for card in self.cards.iter_mut().filter(|c| !c.id.is_persisted()) {
            match created.next() {
                Some(saved) => *card = EditableCard::from(saved),
                None => break,
            }
        }
    }

    pub fn handle_saved(&mut self, id: u64, result: Result<SaveReport, ApiError>) -> Vec<Effect> {
        if self.pending_save != Some(id) {
            return Vec::new();
        }
        self.pending_save = None;
        self.saving = false;
        match result {
            Ok(report) => {
                self.reconcile(report.created);
                vec![
                    Effect::Notice(Notice::info("Deck saved successfully!")),
                    Effect::Navigate(Route::DeckList),
                ]
            }
            Err(e) => {
                tracing::error!(deck_id = %self.deck_id, error = %e, "Error saving deck");
                vec![Effect::Notice(Notice::error("Failed to save deck"))]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CardType;
    use crate::network::testing::deck;

    fn card(id: u64, front: &str) -> Card {
        Card {
            id,
            deck_id: "trip".into(),
            fields: CardFields::Basic {
                front: front.into(),
                back: String::new(),
            },
            tags: Vec::new(),
        }
    }

    fn ready(cards: Vec<Card>) -> DeckEditState {
        let mut state = DeckEditState::new("trip");
        state.load(1);
        state.handle_loaded(
            1,
            Ok(EditorData {
                deck: deck("trip", cards.len() as u32),
                cards,
            }),
        );
        state
    }

    #[test]
    fn added_rows_get_decreasing_placeholders() {
        let mut state = ready(Vec::new());
        state.add_card();
        state.add_card();
        state.add_card();
        let ids: Vec<CardId> = state.cards.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![CardId::Pending(-1), CardId::Pending(-2), CardId::Pending(-3)]);
        assert_eq!(state.next_placeholder, -4);
        assert_eq!(state.cards[0].fields, CardType::Basic.empty_fields());
    }

    #[test]
    fn save_partitions_rows_in_order() {
        let mut state = ready(vec![card(3, "three")]);
        state.add_card();
        state.cards.push(EditableCard::from(card(5, "five")));
        state.add_card();
        state.edit_field(3, "Front", "second new");

        let plan = state.save_plan();
        let updated: Vec<u64> = plan.updates.iter().map(|(id, _)| *id).collect();
        assert_eq!(updated, vec![3, 5]);
        assert_eq!(plan.creates.len(), 2);
        assert_eq!(plan.creates[1].fields.get("Front"), Some("second new"));
        assert_eq!(plan.updates[0].1.tags, Some(Vec::new()));
    }

    #[test]
    fn columns_follow_first_card_then_deck_type() {
        let mut state = ready(Vec::new());
        assert_eq!(state.field_names(), vec!["Front", "Back"]);

        let mut cloze = deck("trip", 0);
        cloze.card_type = CardType::Cloze;
        state.deck = Some(cloze);
        assert_eq!(state.field_names(), vec!["Text", "Translation", "Explanation"]);

        state.cards.push(EditableCard {
            id: CardId::Persisted(1),
            fields: CardFields::Custom(vec![("Word".into(), "gato".into())]),
            tags: Vec::new(),
        });
        assert_eq!(state.field_names(), vec!["Word"]);
    }

    #[test]
    fn successful_save_reconciles_and_leaves() {
        let mut state = ready(vec![card(3, "three")]);
        state.add_card();
        state.edit_field(1, "Front", "nuevo");
        state.save(2).unwrap();

        let report = SaveReport {
            updated: 1,
            created: vec![card(100, "nuevo")],
        };
        let effects = state.handle_saved(2, Ok(report));

        assert_eq!(state.cards[1].id, CardId::Persisted(100));
        assert!(state.cards.iter().all(|c| c.id.is_persisted()));
        assert_eq!(
            effects,
            vec![
                Effect::Notice(Notice::info("Deck saved successfully!")),
                Effect::Navigate(Route::DeckList)
            ]
        );
    }

    #[test]
    fn failed_save_keeps_edits() {
        let mut state = ready(vec![card(3, "three")]);
        state.edit_field(0, "Back", "tres");
        state.add_card();
        state.save(2).unwrap();

        let effects = state.handle_saved(2, Err(ApiError::Transport("refused".into())));

        assert_eq!(effects, vec![Effect::Notice(Notice::error("Failed to save deck"))]);
        assert_eq!(state.cards[0].fields.get("Back"), Some("tres"));
        assert_eq!(state.cards[1].id, CardId::Pending(-1));
        assert!(!state.saving);
    }

    #[test]
    fn second_save_waits_for_the_first() {
        let mut state = ready(Vec::new());
        assert!(state.save(1).is_some());
        assert!(state.save(2).is_none());
    }

    #[test]
    fn load_errors_are_named_by_stage() {
        let mut state = DeckEditState::new("gone");
        state.load(1);
        state.handle_loaded(1, Err(EditorLoadError::DeckMissing));
        assert_eq!(state.status, EditorStatus::Failed("Deck not found".into()));

        state.load(2);
        state.handle_loaded(2, Err(EditorLoadError::Cards(ApiError::Transport("x".into()))));
        assert_eq!(state.status, EditorStatus::Failed("Failed to load cards".into()));
    }

    #[test]
    fn cell_edits_apply_live() {
        let mut state = ready(vec![card(3, "three")]);
        assert!(state.begin_edit());
        if let Some(cell) = state.cell.as_mut() {
            cell.insert('!');
        }
        state.sync_cell();
        assert_eq!(state.cards[0].fields.get("Front"), Some("three!"));

        state.end_edit();
        state.selected_col = 2;
        assert!(state.begin_edit());
        if let Some(cell) = state.cell.as_mut() {
            cell.set("food, travel ,");
        }
        state.end_edit();
        assert_eq!(state.cards[0].tags, vec!["food", "travel"]);
    }

    #[test]
    fn new_rows_follow_custom_columns() {
        let mut state = ready(vec![Card {
            id: 9,
            deck_id: "trip".into(),
            fields: CardFields::Custom(vec![
                ("Word".into(), "gato".into()),
                ("Meaning".into(), "cat".into()),
            ]),
            tags: Vec::new(),
        }]);
        state.add_card();
        assert_eq!(state.cards[1].fields.names(), vec!["Word", "Meaning"]);

        state.selected_col = 0;
        assert!(state.begin_edit());
        if let Some(cell) = state.cell.as_mut() {
            cell.set("perro");
        }
        state.end_edit();
        state.edit_field(1, "Meaning", "dog");

        let plan = state.save_plan();
        assert_eq!(plan.creates.len(), 1);
        assert_eq!(plan.creates[0].fields.get("Word"), Some("perro"));
        assert_eq!(
            serde_json::to_value(&plan.creates[0].fields).unwrap(),
            serde_json::json!({"Word": "perro", "Meaning": "dog"})
        );
    }

    #[test]
    fn edits_to_unknown_fields_are_kept() {
        let mut state = ready(vec![card(3, "three")]);
        state.edit_field(0, "Notes", "irregular");
        assert_eq!(state.cards[0].fields.get("Notes"), Some("irregular"));
        assert_eq!(state.cards[0].fields.get("Front"), Some("three"));
        assert_eq!(state.save_plan().updates[0].1.fields.as_ref().and_then(|f| f.get("Notes")), Some("irregular"));
    }

    #[test]
    fn add_card_needs_a_loaded_deck() {
        let mut state = DeckEditState::new("trip");
        state.add_card();
        assert!(state.cards.is_empty());
        assert_eq!(state.next_placeholder, -1);
    }
}
