//! Recording [`DeckApi`] double for tests

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::ApiError;
use crate::models::{
    Card, CardCreate, CardFields, CardListResponse, CardType, CardUpdate, CsvImport, Deck,
    DeckCreate, DeckFilter, DeckListResponse, DeckResponse, DeckUpdate, Template,
    TemplateListResponse, TextImport,
};
use crate::network::client::DeckApi;

#[derive(Clone, Debug, PartialEq)]
pub enum ApiCall {
    ListDecks(DeckFilter),
    GetDeck(String),
    CreateDeck(DeckCreate),
    UpdateDeck(String),
    DeleteDeck(String),
    GenerateDeck(String),
    DownloadDeck(String),
    ListCards(String),
    CreateCard(String),
    CreateCards { deck_id: String, count: usize },
    UpdateCard { deck_id: String, card_id: u64 },
    DeleteCard { deck_id: String, card_id: u64 },
    ListTemplates,
    GetTemplate(String),
    ListTags,
    ImportCsv(CsvImport),
    ImportText(TextImport),
}

#[derive(Default)]
pub struct RecordingApi {
    calls: Mutex<Vec<ApiCall>>,
    decks: HashMap<String, usize>,
    failing_updates: Vec<u64>,
    fail_generate: bool,
    fail_list: bool,
    fail_delete: bool,
    reject_create: Option<String>,
}

pub fn deck(id: &str, card_count: u32) -> Deck {
    Deck {
        id: id.to_string(),
        name: id.to_string(),
        language: "spanish".into(),
        description: None,
        tags: Vec::new(),
        card_type: CardType::Basic,
        card_count,
        created_at: None,
        updated_at: None,
        csv_path: format!("csv/{}.csv", id),
        apkg_path: None,
    }
}

fn server_error() -> ApiError {
    ApiError::Server {
        status: 500,
        detail: Some("boom".into()),
    }
}

impl RecordingApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deck(mut self, deck_id: &str, cards: usize) -> Self {
        self.decks.insert(deck_id.to_string(), cards);
        self
    }

    pub fn failing_update(mut self, card_id: u64) -> Self {
        self.failing_updates.push(card_id);
        self
    }

    pub fn failing_generate(mut self) -> Self {
        self.fail_generate = true;
        self
    }

    pub fn failing_list(mut self) -> Self {
        self.fail_list = true;
        self
    }

    pub fn failing_delete(mut self) -> Self {
        self.fail_delete = true;
        self
    }

    pub fn rejecting_create(mut self, message: &str) -> Self {
        self.reject_create = Some(message.to_string());
        self
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: ApiCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn deck_response(deck: Option<Deck>) -> DeckResponse {
        DeckResponse {
            success: deck.is_some(),
            message: String::new(),
            deck,
        }
    }
}

#[async_trait]
impl DeckApi for RecordingApi {
    async fn list_decks(&self, filter: &DeckFilter) -> Result<DeckListResponse, ApiError> {
        self.record(ApiCall::ListDecks(filter.clone()));
        if self.fail_list {
            return Err(server_error());
        }
        let mut decks: Vec<Deck> = self
            .decks
            .iter()
            .map(|(id, cards)| deck(id, *cards as u32))
            .collect();
        decks.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(DeckListResponse {
            success: true,
            count: decks.len(),
            decks,
        })
    }

    async fn get_deck(&self, deck_id: &str) -> Result<DeckResponse, ApiError> {
        self.record(ApiCall::GetDeck(deck_id.to_string()));
        match self.decks.get(deck_id) {
            Some(cards) => Ok(Self::deck_response(Some(deck(deck_id, *cards as u32)))),
            None => Err(ApiError::NotFound(format!("Deck '{}' not found", deck_id))),
        }
    }

    async fn create_deck(&self, draft: &DeckCreate) -> Result<DeckResponse, ApiError> {
        self.record(ApiCall::CreateDeck(draft.clone()));
        if let Some(message) = &self.reject_create {
            return Ok(DeckResponse {
                success: false,
                message: message.clone(),
                deck: None,
            });
        }
        let id = draft.name.to_lowercase().replace(' ', "_");
        Ok(Self::deck_response(Some(deck(&id, 0))))
    }

    async fn update_deck(&self, deck_id: &str, _update: &DeckUpdate) -> Result<DeckResponse, ApiError> {
        self.record(ApiCall::UpdateDeck(deck_id.to_string()));
        Ok(Self::deck_response(Some(deck(deck_id, 0))))
    }

    async fn delete_deck(&self, deck_id: &str) -> Result<DeckResponse, ApiError> {
        self.record(ApiCall::DeleteDeck(deck_id.to_string()));
        if self.fail_delete {
            return Err(server_error());
        }
        Ok(Self::deck_response(None))
    }

    async fn generate_deck(&self, deck_id: &str) -> Result<DeckResponse, ApiError> {
        self.record(ApiCall::GenerateDeck(deck_id.to_string()));
        if self.fail_generate {
            return Err(server_error());
        }
        Ok(Self::deck_response(Some(deck(deck_id, 0))))
    }

    async fn download_deck(&self, deck_id: &str) -> Result<Vec<u8>, ApiError> {
        self.record(ApiCall::DownloadDeck(deck_id.to_string()));
        Ok(b"PK\x03\x04package".to_vec())
    }

    async fn list_cards(&self, deck_id: &str) -> Result<CardListResponse, ApiError> {
        self.record(ApiCall::ListCards(deck_id.to_string()));
        let count = self.decks.get(deck_id).copied().unwrap_or(0);
        let cards: Vec<Card> = (0..count as u64)
            .map(|id| Card {
                id,
                deck_id: deck_id.to_string(),
                fields: CardFields::Basic {
                    front: format!("front {}", id),
                    back: format!("back {}", id),
                },
                tags: Vec::new(),
            })
            .collect();
        Ok(CardListResponse {
            success: true,
            count: cards.len(),
            cards,
        })
    }

    async fn create_card(&self, deck_id: &str, card: &CardCreate) -> Result<Card, ApiError> {
        self.record(ApiCall::CreateCard(deck_id.to_string()));
        Ok(Card {
            id: 100,
            deck_id: deck_id.to_string(),
            fields: card.fields.clone(),
            tags: card.tags.clone(),
        })
    }

    async fn create_cards(&self, deck_id: &str, cards: &[CardCreate]) -> Result<CardListResponse, ApiError> {
        self.record(ApiCall::CreateCards {
            deck_id: deck_id.to_string(),
            count: cards.len(),
        });
        let created: Vec<Card> = cards
            .iter()
            .enumerate()
            .map(|(i, card)| Card {
                id: 100 + i as u64,
                deck_id: deck_id.to_string(),
                fields: card.fields.clone(),
                tags: card.tags.clone(),
            })
            .collect();
        Ok(CardListResponse {
            success: true,
            count: created.len(),
            cards: created,
        })
    }

    async fn update_card(&self, deck_id: &str, card_id: u64, update: &CardUpdate) -> Result<Card, ApiError> {
        self.record(ApiCall::UpdateCard {
            deck_id: deck_id.to_string(),
            card_id,
        });
        if self.failing_updates.contains(&card_id) {
            return Err(server_error());
        }
        Ok(Card {
            id: card_id,
            deck_id: deck_id.to_string(),
            fields: update.fields.clone().unwrap_or_else(|| CardType::Basic.empty_fields()),
            tags: update.tags.clone().unwrap_or_default(),
        })
    }

    async fn delete_card(&self, deck_id: &str, card_id: u64) -> Result<(), ApiError> {
        self.record(ApiCall::DeleteCard {
            deck_id: deck_id.to_string(),
            card_id,
        });
        Ok(())
    }

    async fn list_templates(&self) -> Result<TemplateListResponse, ApiError> {
        self.record(ApiCall::ListTemplates);
        Ok(TemplateListResponse {
            success: true,
            count: 0,
            templates: Vec::new(),
        })
    }

    async fn get_template(&self, template_id: &str) -> Result<Template, ApiError> {
        self.record(ApiCall::GetTemplate(template_id.to_string()));
        Err(ApiError::NotFound(format!("Template '{}' not found", template_id)))
    }

    async fn list_tags(&self) -> Result<Vec<String>, ApiError> {
        self.record(ApiCall::ListTags);
        Ok(vec!["vocabulary".into(), "verb".into()])
    }

    async fn import_csv(&self, request: &CsvImport) -> Result<DeckResponse, ApiError> {
        self.record(ApiCall::ImportCsv(request.clone()));
        let name = request.deck_name.clone().unwrap_or_else(|| String::from("imported"));
        Ok(Self::deck_response(Some(deck(&name, 0))))
    }

    async fn import_text(&self, request: &TextImport) -> Result<DeckResponse, ApiError> {
        self.record(ApiCall::ImportText(request.clone()));
        Ok(Self::deck_response(Some(deck(&request.deck_name, 2))))
    }
}
