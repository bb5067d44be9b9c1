//! App actor - message loop processing UI events and network responses

use tokio::sync::mpsc;

use crate::app::state::AppState;
use crate::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
use crate::routes::Route;

/// App actor that processes UI events and network responses
pub struct AppActor {
    state: AppState,
    start: Route,
    network_tx: mpsc::UnboundedSender<NetworkCommand>,
    render_tx: mpsc::UnboundedSender<RenderState>,
}

impl AppActor {
    pub fn new(
        state: AppState,
        start: Route,
        network_tx: mpsc::UnboundedSender<NetworkCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        AppActor {
            state,
            start,
            network_tx,
            render_tx,
        }
    }

    fn send(&self, command: Option<NetworkCommand>) {
        if let Some(command) = command {
            let _ = self.network_tx.send(command);
        }
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut net_rx: mpsc::UnboundedReceiver<NetworkResponse>,
    ) {
        // Mount the first screen
        let command = self.state.navigate(self.start.clone());
        self.send(command);
        let _ = self.render_tx.send(self.state.to_render_state());

        loop {
            tokio::select! {
                Some(event) = ui_rx.recv() => {
                    if self.handle_ui_event(event) {
                        // Quit signal received
                        let _ = self.network_tx.send(NetworkCommand::Shutdown);
                        break;
                    }
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                Some(response) = net_rx.recv() => {
                    for command in self.state.handle_response(response) {
                        let _ = self.network_tx.send(command);
                    }
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                else => break,
            }
        }
    }

    /// Handle a UI event, returns true if quit was requested
    fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        match event {
            // Navigation
            UiEvent::Navigate(route) => {
                let command = self.state.navigate(route);
                self.send(command);
            }
            UiEvent::Back => {
                let command = self.state.back();
                self.send(command);
            }
            UiEvent::NextField => self.state.next_field(),
            UiEvent::PrevField => self.state.prev_field(),
            UiEvent::Up => self.state.move_up(),
            UiEvent::Down => self.state.move_down(),
            UiEvent::Left => self.state.move_left(),
            UiEvent::Right => self.state.move_right(),

            // Input editing
            UiEvent::StartEditing => self.state.start_editing(),
            UiEvent::StopEditing => self.state.stop_editing(),
            UiEvent::CharInput(c) => self.state.enter_char(c),
            UiEvent::Backspace => self.state.delete_char(),
            UiEvent::CursorLeft => self.state.move_cursor_left(),
            UiEvent::CursorRight => self.state.move_cursor_right(),
            UiEvent::InputEnter => self.state.input_enter(),
            UiEvent::InputTab => self.state.input_tab(),

            // Deck list
            UiEvent::Reload => {
                let command = self.state.reload();
                self.send(command);
            }
            UiEvent::OpenSelected => {
                let command = self.state.open_selected();
                self.send(command);
            }
            UiEvent::DownloadSelected => {
                let command = self.state.download_selected();
                self.send(command);
            }
            UiEvent::RequestDelete => self.state.request_delete(),
            UiEvent::ConfirmDelete => {
                let command = self.state.confirm_delete();
                self.send(command);
            }
            UiEvent::CancelDelete => self.state.cancel_delete(),

            // Forms and editor
            UiEvent::RemoveTag => self.state.remove_tag(),
            UiEvent::AddCard => self.state.add_card(),
            UiEvent::Submit => {
                let command = self.state.submit();
                self.send(command);
            }
            UiEvent::ToggleImportMode => self.state.toggle_import_mode(),

            // Popups
            UiEvent::ToggleHelp => self.state.toggle_help(),
            UiEvent::CloseHelp => self.state.close_help(),
            UiEvent::DismissNotice => self.state.dismiss_notice(),

            // System
            UiEvent::Quit => return true,
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[tokio::test]
    async fn mounts_start_route_and_shuts_down_network() {
        let (ui_tx, ui_rx) = mpsc::unbounded_channel();
        let (_net_tx, net_rx) = mpsc::unbounded_channel();
        let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel();
        let (render_tx, mut render_rx) = mpsc::unbounded_channel();

        let state = AppState::new(&Config::default());
        let actor = AppActor::new(state, Route::DeckEdit("trip".into()), cmd_tx, render_tx);
        let handle = tokio::spawn(actor.run(ui_rx, net_rx));

        assert!(matches!(cmd_rx.recv().await, Some(NetworkCommand::LoadEditor { .. })));
        let first = render_rx.recv().await.unwrap();
        assert_eq!(first.route, Route::DeckEdit("trip".into()));

        ui_tx.send(UiEvent::Quit).unwrap();
        handle.await.unwrap();
        assert!(matches!(cmd_rx.recv().await, Some(NetworkCommand::Shutdown)));
    }
}
