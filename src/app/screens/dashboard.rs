//! Deck list screen

use crate::app::screens::{Effect, LoadState, Notice};
use crate::error::ApiError;
use crate::messages::NetworkCommand;
use crate::models::{Deck, DeckFilter};

#[derive(Clone, Debug)]
pub struct DashboardState {
    pub decks: LoadState<Vec<Deck>>,
    pub selected: usize,
    /// Deck awaiting delete confirmation
    pub confirm_delete: Option<String>,
    /// Progress line for an in-flight download or delete
    pub busy: Option<String>,
    filter: DeckFilter,
    pending_load: Option<u64>,
    pending_action: Option<u64>,
}

impl DashboardState {
    pub fn new(filter: DeckFilter) -> Self {
        DashboardState {
            decks: LoadState::Loading,
            selected: 0,
            confirm_delete: None,
            busy: None,
            filter,
            pending_load: None,
            pending_action: None,
        }
    }

    pub fn filter(&self) -> &DeckFilter {
        &self.filter
    }

    /// (Re)fetch the full list
    pub fn load(&mut self, id: u64) -> NetworkCommand {
        self.decks = LoadState::Loading;
        self.pending_load = Some(id);
        NetworkCommand::LoadDecks {
            id,
            filter: self.filter.clone(),
        }
    }

    pub fn handle_decks_loaded(&mut self, id: u64, result: Result<Vec<Deck>, ApiError>) {
        if self.pending_load != Some(id) {
            return;
        }
        self.pending_load = None;
        self.decks = match result {
            Ok(decks) => {
                if self.selected >= decks.len() {
                    self.selected = decks.len().saturating_sub(1);
                }
                LoadState::Loaded(decks)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load decks");
                LoadState::Failed(String::from("Failed to load decks"))
            }
        };
    }

    pub fn selected_deck(&self) -> Option<&Deck> {
        match &self.decks {
            LoadState::Loaded(decks) => decks.get(self.selected),
            _ => None,
        }
    }

    fn deck_count(&self) -> usize {
        match &self.decks {
            LoadState::Loaded(decks) => decks.len(),
            _ => 0,
        }
    }

    pub fn select_next(&mut self) {
        let count = self.deck_count();
        if count > 0 {
            self.selected = (self.selected + 1) % count;
        }
    }

    pub fn select_prev(&mut self) {
        let count = self.deck_count();
        if count > 0 {
            self.selected = self.selected.checked_sub(1).unwrap_or(count - 1);
        }
    }

    /// Generate and download the selected deck's package
    pub fn download_selected(&mut self, id: u64) -> Option<NetworkCommand> {
        if self.pending_action.is_some() {
            return None;
        }
        let deck_id = self.selected_deck()?.id.clone();
        self.pending_action = Some(id);
        self.busy = Some(format!("Generating package for {}...", deck_id));
        Some(NetworkCommand::DownloadPackage { id, deck_id })
    }

    pub fn handle_downloaded(&mut self, id: u64, deck_id: String, result: Result<Vec<u8>, ApiError>) -> Vec<Effect> {
        if self.pending_action != Some(id) {
            return Vec::new();
        }
        self.pending_action = None;
        self.busy = None;
        match result {
            Ok(bytes) => vec![Effect::SavePackage { deck_id, bytes }],
            Err(e) => {
                tracing::error!(deck_id = %deck_id, error = %e, "Error downloading deck");
                vec![Effect::Notice(Notice::error("Failed to download deck"))]
            }
        }
    }

    /// Ask for confirmation before deleting the selected deck
    pub fn request_delete(&mut self) {
        if self.pending_action.is_some() {
            return;
        }
        self.confirm_delete = self.selected_deck().map(|d| d.id.clone());
    }

    pub fn cancel_delete(&mut self) {
        self.confirm_delete = None;
    }

    /// The user said yes: issue the delete
    pub fn confirm_delete(&mut self, id: u64) -> Option<NetworkCommand> {
        let deck_id = self.confirm_delete.take()?;
        self.pending_action = Some(id);
        self.busy = Some(format!("Deleting {}...", deck_id));
        Some(NetworkCommand::DeleteDeck { id, deck_id })
    }

    /// Reload on success; the list is never edited locally
    pub fn handle_deleted(&mut self, id: u64, deck_id: &str, result: Result<(), ApiError>) -> Vec<Effect> {
        if self.pending_action != Some(id) {
            return Vec::new();
        }
        self.pending_action = None;
        self.busy = None;
        match result {
            Ok(()) => {
                tracing::info!(deck_id, "Deleted deck");
                vec![Effect::Reload]
            }
            Err(e) => {
                tracing::error!(deck_id, error = %e, "Error deleting deck");
                vec![Effect::Notice(Notice::error("Failed to delete deck"))]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::testing::deck;

    fn loaded(ids: &[&str]) -> DashboardState {
        let mut state = DashboardState::new(DeckFilter::default());
        state.load(1);
        state.handle_decks_loaded(1, Ok(ids.iter().map(|id| deck(id, 0)).collect()));
        state
    }

    #[test]
    fn mount_sends_no_filters_by_default() {
        let mut state = DashboardState::new(DeckFilter::default());
        match state.load(4) {
            NetworkCommand::LoadDecks { id, filter } => {
                assert_eq!(id, 4);
                assert!(filter.query_pairs().is_empty());
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert_eq!(state.decks, LoadState::Loading);
    }

    #[test]
    fn failed_load_is_terminal_until_retry() {
        let mut state = DashboardState::new(DeckFilter::default());
        state.load(1);
        state.handle_decks_loaded(1, Err(ApiError::Transport("refused".into())));
        assert_eq!(state.decks, LoadState::Failed("Failed to load decks".into()));

        state.load(2);
        assert_eq!(state.decks, LoadState::Loading);
    }

    #[test]
    fn stale_responses_are_ignored() {
        let mut state = DashboardState::new(DeckFilter::default());
        state.load(1);
        state.load(2);
        state.handle_decks_loaded(1, Ok(vec![deck("old", 0)]));
        assert_eq!(state.decks, LoadState::Loading);
    }

    #[test]
    fn declining_delete_issues_nothing() {
        let mut state = loaded(&["a", "b"]);
        state.select_next();
        state.request_delete();
        assert_eq!(state.confirm_delete.as_deref(), Some("b"));

        state.cancel_delete();
        assert_eq!(state.confirm_delete, None);
        assert!(state.confirm_delete(9).is_none());
    }

    #[test]
    fn confirmed_delete_reloads_on_success() {
        let mut state = loaded(&["a"]);
        state.request_delete();
        let cmd = state.confirm_delete(5).unwrap();
        assert!(matches!(cmd, NetworkCommand::DeleteDeck { id: 5, ref deck_id } if deck_id == "a"));

        assert_eq!(state.handle_deleted(5, "a", Ok(())), vec![Effect::Reload]);
        // list untouched until the reload answers
        assert_eq!(state.selected_deck().map(|d| d.id.as_str()), Some("a"));
    }

    #[test]
    fn failed_delete_shows_notice() {
        let mut state = loaded(&["a"]);
        state.request_delete();
        state.confirm_delete(5);
        let effects = state.handle_deleted(5, "a", Err(ApiError::Transport("x".into())));
        assert_eq!(effects, vec![Effect::Notice(Notice::error("Failed to delete deck"))]);
    }

    #[test]
    fn download_saves_package_bytes() {
        let mut state = loaded(&["trip"]);
        let cmd = state.download_selected(3).unwrap();
        assert!(matches!(cmd, NetworkCommand::DownloadPackage { id: 3, .. }));
        assert!(state.download_selected(4).is_none());

        let effects = state.handle_downloaded(3, "trip".into(), Ok(vec![1, 2, 3]));
        assert_eq!(
            effects,
            vec![Effect::SavePackage {
                deck_id: "trip".into(),
                bytes: vec![1, 2, 3]
            }]
        );
        assert_eq!(state.busy, None);
    }

    #[test]
    fn selection_wraps() {
        let mut state = loaded(&["a", "b", "c"]);
        state.select_prev();
        assert_eq!(state.selected, 2);
        state.select_next();
        assert_eq!(state.selected, 0);
    }

    #[test]
    fn nothing_to_download_on_empty_list() {
        let mut state = loaded(&[]);
        assert!(state.download_selected(1).is_none());
        state.request_delete();
        assert_eq!(state.confirm_delete, None);
    }
}
