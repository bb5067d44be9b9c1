//! # Anki Deck TUI
//!
//! A terminal client for an Anki deck generator API.
//!
//! ## Features
//! - Deck list with package download and delete
//! - Deck creation form with tag suggestions
//! - Card editor with batched saves
//! - CSV file and pasted text import
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine)
//! - Network Layer (Tokio runtime)

pub mod app;
pub mod config;
pub mod constants;
pub mod error;
pub mod messages;
pub mod models;
pub mod network;
pub mod routes;
pub mod storage;
pub mod ui;

// Re-export commonly used types
pub use app::{AppActor, AppState};
pub use config::{Cli, Config};
pub use error::ApiError;
pub use messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
pub use models::{Card, CardFields, CardId, CardType, Deck};
pub use network::{ApiClient, DeckApi, NetworkActor};
pub use routes::Route;
