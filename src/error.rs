//! API error taxonomy
//!
//! Every failure of a remote call ends up as an [`ApiError`]. The variants are
//! `Clone` so they can travel inside network messages.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Connection refused, timeout, broken stream
    #[error("{0}")]
    Transport(String),

    /// Non-2xx response other than 404
    #[error("server returned {status}: {}", .detail.as_deref().unwrap_or("no details"))]
    Server { status: u16, detail: Option<String> },

    #[error("{0}")]
    NotFound(String),

    /// Body did not match the expected shape
    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl ApiError {
    /// Build an error from a failed response's status and raw body
    pub fn from_response(status: u16, body: &str) -> Self {
        let detail = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|json| json.get("detail").and_then(normalize_detail));

        if status == 404 {
            ApiError::NotFound(detail.unwrap_or_else(|| String::from("Resource not found")))
        } else {
            ApiError::Server { status, detail }
        }
    }

    /// Message suitable for a banner: the server's own words when it sent any,
    /// otherwise the caller's fallback.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Server { detail: Some(detail), .. } => detail.clone(),
            ApiError::NotFound(message) => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

/// Normalize a `detail` payload: strings verbatim, validation lists joined.
pub fn normalize_detail(detail: &Value) -> Option<String> {
    match detail {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(items) if !items.is_empty() => {
            let messages: Vec<String> = items
                .iter()
                .map(|item| match item.get("msg") {
                    Some(Value::String(msg)) => msg.clone(),
                    _ => match item {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    },
                })
                .collect();
            Some(messages.join("; "))
        }
        _ => None,
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else if e.is_timeout() {
            ApiError::Transport(String::from("Request timed out"))
        } else if e.is_connect() {
            ApiError::Transport(format!("Connection failed: {}", e))
        } else {
            ApiError::Transport(format!("Request failed: {}", e))
        }
    }
}

impl From<std::io::Error> for ApiError {
    fn from(e: std::io::Error) -> Self {
        ApiError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}
