//! Multi-call sequences run against a [`DeckApi`].
//!
//! The screens describe what they want (a [`SavePlan`], a deck id to
//! download); these functions perform the calls in the required order.

use crate::error::ApiError;
use crate::models::{Card, CardCreate, CardUpdate, CsvImport, Deck, DeckCreate, DeckFilter, DeckResponse, TextImport};
use crate::network::client::DeckApi;

/// Deck metadata plus its cards, as loaded by the editor
#[derive(Clone, Debug, PartialEq)]
pub struct EditorData {
    pub deck: Deck,
    pub cards: Vec<Card>,
}

/// Stage at which loading the editor failed
#[derive(Clone, Debug, PartialEq)]
pub enum EditorLoadError {
    DeckMissing,
    Deck(ApiError),
    Cards(ApiError),
}

/// Calls needed to persist the editor's rows
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SavePlan {
    /// Persisted cards, in row order
    pub updates: Vec<(u64, CardUpdate)>,
    /// Pending cards, in row order
    pub creates: Vec<CardCreate>,
}

/// What a successful save did
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SaveReport {
    pub updated: usize,
    /// Cards the batch call created, in the order they were sent
    pub created: Vec<Card>,
}

pub async fn load_decks(api: &dyn DeckApi, filter: &DeckFilter) -> Result<Vec<Deck>, ApiError> {
    let response = api.list_decks(filter).await?;
    tracing::info!(count = response.decks.len(), "Loaded decks");
    Ok(response.decks)
}

/// Fetch deck metadata, then the deck's cards
pub async fn load_editor(api: &dyn DeckApi, deck_id: &str) -> Result<EditorData, EditorLoadError> {
    let deck = match api.get_deck(deck_id).await {
        Ok(DeckResponse { deck: Some(deck), .. }) => deck,
        Ok(_) | Err(ApiError::NotFound(_)) => return Err(EditorLoadError::DeckMissing),
        Err(e) => return Err(EditorLoadError::Deck(e)),
    };
    let cards = api
        .list_cards(deck_id)
        .await
        .map_err(EditorLoadError::Cards)?
        .cards;
    tracing::info!(deck_id, cards = cards.len(), "Loaded deck for editing");
    Ok(EditorData { deck, cards })
}

/// Update every persisted card one at a time, then batch-create the new ones.
///
/// Stops at the first failure; calls already made are not undone.
pub async fn save_cards(api: &dyn DeckApi, deck_id: &str, plan: &SavePlan) -> Result<SaveReport, ApiError> {
    for (card_id, update) in &plan.updates {
        if let Err(e) = api.update_card(deck_id, *card_id, update).await {
            tracing::warn!(deck_id, card_id, error = %e, "Card update failed, aborting save");
            return Err(e);
        }
    }

    let created = if plan.creates.is_empty() {
        Vec::new()
    } else {
        match api.create_cards(deck_id, &plan.creates).await {
            Ok(response) => response.cards,
            Err(e) => {
                tracing::warn!(deck_id, count = plan.creates.len(), error = %e, "Batch create failed");
                return Err(e);
            }
        }
    };

    tracing::info!(deck_id, updated = plan.updates.len(), created = created.len(), "Saved cards");
    Ok(SaveReport {
        updated: plan.updates.len(),
        created,
    })
}

/// Regenerate the package server-side, then fetch it. A failed generation
/// means no download is attempted.
pub async fn download_package(api: &dyn DeckApi, deck_id: &str) -> Result<Vec<u8>, ApiError> {
    if let Err(e) = api.generate_deck(deck_id).await {
        tracing::warn!(deck_id, error = %e, "Package generation failed, skipping download");
        return Err(e);
    }
    let bytes = api.download_deck(deck_id).await?;
    tracing::info!(deck_id, bytes = bytes.len(), "Downloaded package");
    Ok(bytes)
}

fn expect_deck(response: DeckResponse) -> Result<Deck, ApiError> {
    match response.deck {
        Some(deck) if response.success => Ok(deck),
        _ => Err(ApiError::Server {
            status: 200,
            detail: Some(response.message).filter(|m| !m.is_empty()),
        }),
    }
}

pub async fn create_deck(api: &dyn DeckApi, draft: &DeckCreate) -> Result<Deck, ApiError> {
    api.create_deck(draft).await.and_then(expect_deck)
}

pub async fn delete_deck(api: &dyn DeckApi, deck_id: &str) -> Result<(), ApiError> {
    api.delete_deck(deck_id).await.map(|_| ())
}

pub async fn import_csv(api: &dyn DeckApi, request: &CsvImport) -> Result<Deck, ApiError> {
    api.import_csv(request).await.and_then(expect_deck)
}

pub async fn import_text(api: &dyn DeckApi, request: &TextImport) -> Result<Deck, ApiError> {
    api.import_text(request).await.and_then(expect_deck)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CardFields;
    use crate::network::testing::{ApiCall, RecordingApi};

    fn fields(front: &str, back: &str) -> CardFields {
        CardFields::Basic {
            front: front.into(),
            back: back.into(),
        }
    }

    fn update(front: &str) -> CardUpdate {
        CardUpdate {
            fields: Some(fields(front, "")),
            tags: Some(Vec::new()),
        }
    }

    fn create(front: &str) -> CardCreate {
        CardCreate {
            fields: fields(front, ""),
            tags: Vec::new(),
        }
    }

    #[tokio::test]
    async fn save_updates_then_batches() {
        let api = RecordingApi::new();
        let plan = SavePlan {
            updates: vec![(3, update("three")), (5, update("five"))],
            creates: vec![create("new one"), create("new two")],
        };

        let report = save_cards(&api, "trip", &plan).await.unwrap();

        assert_eq!(
            api.calls(),
            vec![
                ApiCall::UpdateCard { deck_id: "trip".into(), card_id: 3 },
                ApiCall::UpdateCard { deck_id: "trip".into(), card_id: 5 },
                ApiCall::CreateCards { deck_id: "trip".into(), count: 2 },
            ]
        );
        assert_eq!(report.updated, 2);
        assert_eq!(report.created.len(), 2);
    }

    #[tokio::test]
    async fn save_without_new_cards_skips_batch() {
        let api = RecordingApi::new();
        let plan = SavePlan {
            updates: vec![(0, update("zero"))],
            creates: Vec::new(),
        };
        save_cards(&api, "trip", &plan).await.unwrap();
        assert_eq!(api.calls().len(), 1);
    }

    #[tokio::test]
    async fn failed_update_aborts_save() {
        let api = RecordingApi::new().failing_update(3);
        let plan = SavePlan {
            updates: vec![(3, update("three")), (5, update("five"))],
            creates: vec![create("new")],
        };

        assert!(save_cards(&api, "trip", &plan).await.is_err());
        assert_eq!(
            api.calls(),
            vec![ApiCall::UpdateCard { deck_id: "trip".into(), card_id: 3 }]
        );
    }

    #[tokio::test]
    async fn download_skipped_when_generate_fails() {
        let api = RecordingApi::new().failing_generate();
        assert!(download_package(&api, "trip").await.is_err());
        assert_eq!(api.calls(), vec![ApiCall::GenerateDeck("trip".into())]);
    }

    #[tokio::test]
    async fn download_after_generate() {
        let api = RecordingApi::new();
        let bytes = download_package(&api, "trip").await.unwrap();
        assert!(!bytes.is_empty());
        assert_eq!(
            api.calls(),
            vec![
                ApiCall::GenerateDeck("trip".into()),
                ApiCall::DownloadDeck("trip".into())
            ]
        );
    }

    #[tokio::test]
    async fn editor_load_reports_missing_deck() {
        let api = RecordingApi::new();
        assert_eq!(
            load_editor(&api, "missing").await,
            Err(EditorLoadError::DeckMissing)
        );
        assert_eq!(api.calls(), vec![ApiCall::GetDeck("missing".into())]);
    }

    #[tokio::test]
    async fn editor_load_fetches_deck_then_cards() {
        let api = RecordingApi::new().with_deck("trip", 2);
        let data = load_editor(&api, "trip").await.unwrap();
        assert_eq!(data.deck.id, "trip");
        assert_eq!(data.cards.len(), 2);
        assert_eq!(
            api.calls(),
            vec![ApiCall::GetDeck("trip".into()), ApiCall::ListCards("trip".into())]
        );
    }

    #[tokio::test]
    async fn unsuccessful_create_response_is_an_error() {
        let api = RecordingApi::new().rejecting_create("Deck already exists");
        let draft = DeckCreate {
            name: "Trip".into(),
            language: "spanish".into(),
            description: None,
            tags: Vec::new(),
            card_type: crate::models::CardType::Basic,
        };
        let err = create_deck(&api, &draft).await.unwrap_err();
        assert_eq!(err.user_message("Failed to create deck"), "Deck already exists");
    }
}
