//! HTTP client wrapper - one method per remote resource/action

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::models::{
    Card, CardBatch, CardCreate, CardListResponse, CardResponse, CardUpdate, CsvImport, DeckCreate,
    DeckFilter, DeckListResponse, DeckResponse, DeckUpdate, TagsResponse, Template,
    TemplateListResponse, TemplateResponse, TextImport,
};

/// The remote deck API.
///
/// Every call issues exactly one request and never retries.
#[async_trait]
pub trait DeckApi: Send + Sync {
    async fn list_decks(&self, filter: &DeckFilter) -> Result<DeckListResponse, ApiError>;
    async fn get_deck(&self, deck_id: &str) -> Result<DeckResponse, ApiError>;
    async fn create_deck(&self, deck: &DeckCreate) -> Result<DeckResponse, ApiError>;
    async fn update_deck(&self, deck_id: &str, update: &DeckUpdate) -> Result<DeckResponse, ApiError>;
    async fn delete_deck(&self, deck_id: &str) -> Result<DeckResponse, ApiError>;
    async fn generate_deck(&self, deck_id: &str) -> Result<DeckResponse, ApiError>;
    async fn download_deck(&self, deck_id: &str) -> Result<Vec<u8>, ApiError>;

    async fn list_cards(&self, deck_id: &str) -> Result<CardListResponse, ApiError>;
    async fn create_card(&self, deck_id: &str, card: &CardCreate) -> Result<Card, ApiError>;
    async fn create_cards(&self, deck_id: &str, cards: &[CardCreate]) -> Result<CardListResponse, ApiError>;
    async fn update_card(&self, deck_id: &str, card_id: u64, update: &CardUpdate) -> Result<Card, ApiError>;
    async fn delete_card(&self, deck_id: &str, card_id: u64) -> Result<(), ApiError>;

    async fn list_templates(&self) -> Result<TemplateListResponse, ApiError>;
    async fn get_template(&self, template_id: &str) -> Result<Template, ApiError>;
    async fn list_tags(&self) -> Result<Vec<String>, ApiError>;

    async fn import_csv(&self, request: &CsvImport) -> Result<DeckResponse, ApiError>;
    async fn import_text(&self, request: &TextImport) -> Result<DeckResponse, ApiError>;
}

/// `reqwest`-backed implementation of [`DeckApi`]
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Self {
        ApiClient {
            http: create_client(timeout),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// Create an HTTP client; no timeout unless one is configured
pub fn create_client(timeout: Option<Duration>) -> reqwest::Client {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().unwrap_or_else(|_| reqwest::Client::new())
}

/// Turn a response into `T`, or into an error carrying status and detail
async fn parse_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ApiError> {
    let resp = check_status(resp).await?;
    let body = resp.text().await?;
    serde_json::from_str(&body).map_err(ApiError::from)
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    tracing::warn!(status = status.as_u16(), body = %body, "API request failed");
    Err(ApiError::from_response(status.as_u16(), &body))
}

fn text_form(fields: Vec<(&'static str, String)>) -> Form {
    fields
        .into_iter()
        .fold(Form::new(), |form, (name, value)| form.text(name, value))
}

async fn file_part(path: &Path) -> Result<Part, ApiError> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| String::from("import.csv"));
    Part::bytes(bytes)
        .file_name(file_name)
        .mime_str("text/csv")
        .map_err(ApiError::from)
}

fn require_card(resp: CardResponse) -> Result<Card, ApiError> {
    resp.card
        .ok_or_else(|| ApiError::Decode(format!("response carried no card: {}", resp.message)))
}

#[async_trait]
impl DeckApi for ApiClient {
    async fn list_decks(&self, filter: &DeckFilter) -> Result<DeckListResponse, ApiError> {
        tracing::debug!(?filter, "GET /decks");
        let resp = self
            .http
            .get(self.url("decks"))
            .query(&filter.query_pairs())
            .send()
            .await?;
        parse_json(resp).await
    }

    async fn get_deck(&self, deck_id: &str) -> Result<DeckResponse, ApiError> {
        tracing::debug!(deck_id, "GET /decks/{{id}}");
        let resp = self.http.get(self.url(&format!("decks/{}", deck_id))).send().await?;
        parse_json(resp).await
    }

    async fn create_deck(&self, deck: &DeckCreate) -> Result<DeckResponse, ApiError> {
        tracing::debug!(name = %deck.name, "POST /decks");
        let resp = self.http.post(self.url("decks")).json(deck).send().await?;
        parse_json(resp).await
    }

    async fn update_deck(&self, deck_id: &str, update: &DeckUpdate) -> Result<DeckResponse, ApiError> {
        tracing::debug!(deck_id, "PUT /decks/{{id}}");
        let resp = self
            .http
            .put(self.url(&format!("decks/{}", deck_id)))
            .json(update)
            .send()
            .await?;
        parse_json(resp).await
    }

    async fn delete_deck(&self, deck_id: &str) -> Result<DeckResponse, ApiError> {
        tracing::debug!(deck_id, "DELETE /decks/{{id}}");
        let resp = self.http.delete(self.url(&format!("decks/{}", deck_id))).send().await?;
        parse_json(resp).await
    }

    async fn generate_deck(&self, deck_id: &str) -> Result<DeckResponse, ApiError> {
        tracing::debug!(deck_id, "POST /decks/{{id}}/generate");
        let resp = self
            .http
            .post(self.url(&format!("decks/{}/generate", deck_id)))
            .send()
            .await?;
        parse_json(resp).await
    }

    async fn download_deck(&self, deck_id: &str) -> Result<Vec<u8>, ApiError> {
        tracing::debug!(deck_id, "GET /decks/{{id}}/download");
        let resp = self
            .http
            .get(self.url(&format!("decks/{}/download", deck_id)))
            .send()
            .await?;
        let resp = check_status(resp).await?;

        let mut stream = resp.bytes_stream();
        let mut package = Vec::new();
        while let Some(chunk) = stream.next().await {
            let bytes = chunk.map_err(|e| ApiError::Transport(format!("Stream error: {}", e)))?;
            package.extend_from_slice(&bytes);
            tracing::trace!(deck_id, bytes_received = package.len(), "package chunk");
        }
        Ok(package)
    }

    async fn list_cards(&self, deck_id: &str) -> Result<CardListResponse, ApiError> {
        tracing::debug!(deck_id, "GET /cards/{{deck}}/cards");
        let resp = self
            .http
            .get(self.url(&format!("cards/{}/cards", deck_id)))
            .send()
            .await?;
        parse_json(resp).await
    }

    async fn create_card(&self, deck_id: &str, card: &CardCreate) -> Result<Card, ApiError> {
        tracing::debug!(deck_id, "POST /cards/{{deck}}/cards");
        let resp = self
            .http
            .post(self.url(&format!("cards/{}/cards", deck_id)))
            .json(card)
            .send()
            .await?;
        parse_json::<CardResponse>(resp).await.and_then(require_card)
    }

    async fn create_cards(&self, deck_id: &str, cards: &[CardCreate]) -> Result<CardListResponse, ApiError> {
        tracing::debug!(deck_id, count = cards.len(), "POST /cards/{{deck}}/cards/batch");
        let resp = self
            .http
            .post(self.url(&format!("cards/{}/cards/batch", deck_id)))
            .json(&CardBatch { cards })
            .send()
            .await?;
        parse_json(resp).await
    }

    async fn update_card(&self, deck_id: &str, card_id: u64, update: &CardUpdate) -> Result<Card, ApiError> {
        tracing::debug!(deck_id, card_id, "PUT /cards/{{deck}}/cards/{{card}}");
        let resp = self
            .http
            .put(self.url(&format!("cards/{}/cards/{}", deck_id, card_id)))
            .json(update)
            .send()
            .await?;
        parse_json::<CardResponse>(resp).await.and_then(require_card)
    }

    async fn delete_card(&self, deck_id: &str, card_id: u64) -> Result<(), ApiError> {
        tracing::debug!(deck_id, card_id, "DELETE /cards/{{deck}}/cards/{{card}}");
        let resp = self
            .http
            .delete(self.url(&format!("cards/{}/cards/{}", deck_id, card_id)))
            .send()
            .await?;
        check_status(resp).await?;
        Ok(())
    }

    async fn list_templates(&self) -> Result<TemplateListResponse, ApiError> {
        let resp = self.http.get(self.url("templates")).send().await?;
        parse_json(resp).await
    }

    async fn get_template(&self, template_id: &str) -> Result<Template, ApiError> {
        let resp = self
            .http
            .get(self.url(&format!("templates/{}", template_id)))
            .send()
            .await?;
        let body: TemplateResponse = parse_json(resp).await?;
        body.template
            .ok_or_else(|| ApiError::NotFound(format!("Template '{}' not found", template_id)))
    }

    async fn list_tags(&self) -> Result<Vec<String>, ApiError> {
        let resp = self.http.get(self.url("tags")).send().await?;
        let body: TagsResponse = parse_json(resp).await?;
        Ok(body.tags)
    }

    async fn import_csv(&self, request: &CsvImport) -> Result<DeckResponse, ApiError> {
        tracing::debug!(path = %request.path.display(), "POST /import/csv");
        let form = text_form(request.form_fields()).part("file", file_part(&request.path).await?);
        let resp = self
            .http
            .post(self.url("import/csv"))
            .multipart(form)
            .send()
            .await?;
        parse_json(resp).await
    }

    async fn import_text(&self, request: &TextImport) -> Result<DeckResponse, ApiError> {
        tracing::debug!(deck_name = %request.deck_name, "POST /import/text");
        let resp = self
            .http
            .post(self.url("import/text"))
            .multipart(text_form(request.form_fields()))
            .send()
            .await?;
        parse_json(resp).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_without_double_slash() {
        let client = ApiClient::new("http://localhost:8000/api/v1/", None);
        assert_eq!(client.base_url(), "http://localhost:8000/api/v1");
        assert_eq!(client.url("decks"), "http://localhost:8000/api/v1/decks");
        assert_eq!(
            client.url("/cards/trip/cards/batch"),
            "http://localhost:8000/api/v1/cards/trip/cards/batch"
        );
    }

    #[test]
    fn missing_card_is_a_decode_error() {
        let resp = CardResponse {
            success: true,
            message: "Card updated".into(),
            card: None,
        };
        assert!(matches!(require_card(resp), Err(ApiError::Decode(_))));
    }
}
