//! Network messages - communication between App and Network layers

use crate::error::ApiError;
use crate::models::{CsvImport, Deck, DeckCreate, DeckFilter, TextImport};
use crate::network::workflows::{EditorData, EditorLoadError, SavePlan, SaveReport};

/// Commands sent from App layer to Network layer
#[derive(Debug, Clone)]
pub enum NetworkCommand {
    /// Fetch the deck list
    LoadDecks { id: u64, filter: DeckFilter },
    /// Fetch a deck and its cards for the editor
    LoadEditor { id: u64, deck_id: String },
    /// Fetch known tags for the create form
    LoadTagSuggestions { id: u64 },
    CreateDeck { id: u64, draft: DeckCreate },
    DeleteDeck { id: u64, deck_id: String },
    /// Generate, then download, a deck package
    DownloadPackage { id: u64, deck_id: String },
    /// Persist the editor's rows
    SaveCards { id: u64, deck_id: String, plan: SavePlan },
    ImportCsv { id: u64, request: CsvImport },
    ImportText { id: u64, request: TextImport },
    /// Shutdown the network actor
    Shutdown,
}

impl NetworkCommand {
    pub fn id(&self) -> Option<u64> {
        match self {
            NetworkCommand::LoadDecks { id, .. }
            | NetworkCommand::LoadEditor { id, .. }
            | NetworkCommand::LoadTagSuggestions { id }
            | NetworkCommand::CreateDeck { id, .. }
            | NetworkCommand::DeleteDeck { id, .. }
            | NetworkCommand::DownloadPackage { id, .. }
            | NetworkCommand::SaveCards { id, .. }
            | NetworkCommand::ImportCsv { id, .. }
            | NetworkCommand::ImportText { id, .. } => Some(*id),
            NetworkCommand::Shutdown => None,
        }
    }
}

/// Responses sent from Network layer to App layer
#[derive(Debug, Clone)]
pub enum NetworkResponse {
    DecksLoaded {
        id: u64,
        result: Result<Vec<Deck>, ApiError>,
    },
    EditorLoaded {
        id: u64,
        result: Result<EditorData, EditorLoadError>,
    },
    TagSuggestions {
        id: u64,
        result: Result<Vec<String>, ApiError>,
    },
    DeckCreated {
        id: u64,
        result: Result<Deck, ApiError>,
    },
    DeckDeleted {
        id: u64,
        deck_id: String,
        result: Result<(), ApiError>,
    },
    PackageDownloaded {
        id: u64,
        deck_id: String,
        result: Result<Vec<u8>, ApiError>,
    },
    CardsSaved {
        id: u64,
        result: Result<SaveReport, ApiError>,
    },
    Imported {
        id: u64,
        result: Result<Deck, ApiError>,
    },
}

impl NetworkResponse {
    /// Get the request ID from the response
    pub fn id(&self) -> u64 {
        match self {
            NetworkResponse::DecksLoaded { id, .. } => *id,
            NetworkResponse::EditorLoaded { id, .. } => *id,
            NetworkResponse::TagSuggestions { id, .. } => *id,
            NetworkResponse::DeckCreated { id, .. } => *id,
            NetworkResponse::DeckDeleted { id, .. } => *id,
            NetworkResponse::PackageDownloaded { id, .. } => *id,
            NetworkResponse::CardsSaved { id, .. } => *id,
            NetworkResponse::Imported { id, .. } => *id,
        }
    }

    pub fn is_success(&self) -> bool {
        match self {
            NetworkResponse::DecksLoaded { result, .. } => result.is_ok(),
            NetworkResponse::EditorLoaded { result, .. } => result.is_ok(),
            NetworkResponse::TagSuggestions { result, .. } => result.is_ok(),
            NetworkResponse::DeckCreated { result, .. } => result.is_ok(),
            NetworkResponse::DeckDeleted { result, .. } => result.is_ok(),
            NetworkResponse::PackageDownloaded { result, .. } => result.is_ok(),
            NetworkResponse::CardsSaved { result, .. } => result.is_ok(),
            NetworkResponse::Imported { result, .. } => result.is_ok(),
        }
    }
}
