//! Network layer - deck API client and request execution
//!
//! The Network actor receives commands, runs them against a [`client::DeckApi`]
//! and sends back responses.

pub mod actor;
pub mod client;
pub mod workflows;

#[cfg(test)]
pub mod testing;

pub use actor::NetworkActor;
pub use client::{ApiClient, DeckApi};
