//! Network actor - runs API calls in the Tokio async runtime

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::messages::{NetworkCommand, NetworkResponse};
use crate::network::client::DeckApi;
use crate::network::workflows;

/// Network actor that executes commands against the deck API
pub struct NetworkActor {
    api: Arc<dyn DeckApi>,
    response_tx: mpsc::UnboundedSender<NetworkResponse>,
    active_requests: JoinSet<()>,
}

impl NetworkActor {
    pub fn new(api: Arc<dyn DeckApi>, response_tx: mpsc::UnboundedSender<NetworkResponse>) -> Self {
        NetworkActor {
            api,
            response_tx,
            active_requests: JoinSet::new(),
        }
    }

    /// Run the network actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<NetworkCommand>) {
        loop {
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(NetworkCommand::Shutdown) | None => {
                            self.active_requests.abort_all();
                            break;
                        }
                        Some(cmd) => {
                            let api = Arc::clone(&self.api);
                            let response_tx = self.response_tx.clone();
                            self.active_requests.spawn(async move {
                                let id = cmd.id();
                                tracing::info!(?id, "Executing command");
                                if let Some(response) = execute(api.as_ref(), cmd).await {
                                    tracing::info!(id = response.id(), ok = response.is_success(), "Command completed");
                                    let _ = response_tx.send(response);
                                }
                            });
                        }
                    }
                }

                // Clean up completed tasks
                Some(_result) = self.active_requests.join_next() => {}
            }
        }
    }
}

/// Run one command to completion and describe the outcome
pub async fn execute(api: &dyn DeckApi, cmd: NetworkCommand) -> Option<NetworkResponse> {
    let response = match cmd {
        NetworkCommand::LoadDecks { id, filter } => NetworkResponse::DecksLoaded {
            id,
            result: workflows::load_decks(api, &filter).await,
        },
        NetworkCommand::LoadEditor { id, deck_id } => NetworkResponse::EditorLoaded {
            id,
            result: workflows::load_editor(api, &deck_id).await,
        },
        NetworkCommand::LoadTagSuggestions { id } => NetworkResponse::TagSuggestions {
            id,
            result: api.list_tags().await,
        },
        NetworkCommand::CreateDeck { id, draft } => NetworkResponse::DeckCreated {
            id,
            result: workflows::create_deck(api, &draft).await,
        },
        NetworkCommand::DeleteDeck { id, deck_id } => {
            let result = workflows::delete_deck(api, &deck_id).await;
            NetworkResponse::DeckDeleted { id, deck_id, result }
        }
        NetworkCommand::DownloadPackage { id, deck_id } => {
            let result = workflows::download_package(api, &deck_id).await;
            NetworkResponse::PackageDownloaded { id, deck_id, result }
        }
        NetworkCommand::SaveCards { id, deck_id, plan } => NetworkResponse::CardsSaved {
            id,
            result: workflows::save_cards(api, &deck_id, &plan).await,
        },
        NetworkCommand::ImportCsv { id, request } => NetworkResponse::Imported {
            id,
            result: workflows::import_csv(api, &request).await,
        },
        NetworkCommand::ImportText { id, request } => NetworkResponse::Imported {
            id,
            result: workflows::import_text(api, &request).await,
        },
        NetworkCommand::Shutdown => return None,
    };
    Some(response)
}
