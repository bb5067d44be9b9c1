//! Anki Deck TUI - Actor-based deck manager
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - central state machine processing events
//! - Network Layer (Tokio) - async calls against the deck API

use std::fs;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc;

use anki_deck_tui::app::screens::{
    deck_edit::TAGS_COLUMN, CreateField, DashboardState, DeckCreateState, DeckEditState, EditorStatus, ImportField,
    ImportMode, ImportState, LoadState, Screen,
};
use anki_deck_tui::config::{start_route, Cli, Config};
use anki_deck_tui::constants::{language_label, APP_NAME, APP_VERSION, LANGUAGES};
use anki_deck_tui::messages::ui_events::{key_to_ui_event, InputMode, ScreenKind};
use anki_deck_tui::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
use anki_deck_tui::network::{ApiClient, NetworkActor};
use anki_deck_tui::ui::{
    card_type_color, cell_text, centered_rect, cursor_position, notice_color, render_choice, render_input, render_tabs,
};
use anki_deck_tui::{AppActor, AppState};

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_cli(&cli)?;

    // Initialize logging to file; the terminal belongs to the UI
    let log_dir = config
        .log_file
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| ".".into());
    let log_name = config
        .log_file
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "anki-deck-tui.log".into());
    fs::create_dir_all(&log_dir).with_context(|| format!("creating log directory {}", log_dir.display()))?;
    let file_appender = tracing_appender::rolling::never(&log_dir, log_name);
    let (non_blocking, _log_guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    tracing::info!(api_url = %config.api_url, version = APP_VERSION, "Starting");
    let start = start_route(&cli);
    let api = Arc::new(ApiClient::new(config.api_url.clone(), config.request_timeout()));

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (net_cmd_tx, net_cmd_rx) = mpsc::unbounded_channel::<NetworkCommand>();
    let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel::<NetworkResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn network actor
    let network_actor = NetworkActor::new(api, net_resp_tx);
    tokio::spawn(network_actor.run(net_cmd_rx));

    // Spawn app actor
    let app_actor = AppActor::new(AppState::new(&config), start, net_cmd_tx, render_tx);
    tokio::spawn(app_actor.run(ui_rx, net_resp_rx));

    // Run UI loop (synchronous with async polling)
    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    tracing::info!("Exiting");
    Ok(())
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();

    loop {
        // Draw with current state
        terminal.draw(|f| draw_ui(f, &current_state))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(event) = key_to_ui_event(key, current_state.key_context()) {
                    let quit = matches!(event, UiEvent::Quit);
                    let _ = ui_tx.send(event);
                    if quit {
                        break;
                    }
                }
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState) {
    let area = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Screen bar
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_screen_bar(f, state, main_chunks[0]);

    let editing = state.input_mode == InputMode::Editing;
    let cursor_area = match &state.screen {
        Screen::DeckList(screen) => {
            draw_deck_list(f, screen, main_chunks[1]);
            None
        }
        Screen::DeckCreate(screen) => draw_create_form(f, screen, editing, main_chunks[1]),
        Screen::DeckEdit(screen) => draw_editor(f, screen, editing, main_chunks[1]),
        Screen::Import(screen) => draw_import(f, screen, editing, main_chunks[1]),
    };

    // Place the terminal cursor inside the field being edited
    if let (true, Some(rect), Some(input)) = (editing, cursor_area, state.screen.active_input()) {
        let (line, col) = input.cursor_line_col();
        f.set_cursor_position(cursor_position(rect, line, col));
    }

    draw_status_bar(f, state, main_chunks[2]);

    // Popups
    if let Screen::DeckList(screen) = &state.screen {
        if let Some(deck_id) = &screen.confirm_delete {
            draw_confirm_popup(f, deck_id, area);
        }
    }

    if let Some(notice) = &state.notice {
        draw_notice_popup(f, &notice.message, notice_color(notice.kind), area);
    }

    if state.show_help {
        draw_help_popup(f, area);
    }
}

fn draw_screen_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(24)])
        .split(area);

    let selected = match state.screen.kind() {
        ScreenKind::DeckList => 0,
        ScreenKind::DeckCreate => 1,
        ScreenKind::DeckEdit => 2,
        ScreenKind::Import => 3,
    };
    f.render_widget(render_tabs(&[" Decks ", " New Deck ", " Editor ", " Import "], selected), chunks[0]);

    let title = Paragraph::new(format!("{} v{} ", APP_NAME, APP_VERSION))
        .alignment(Alignment::Right)
        .style(Style::default().fg(Color::Cyan));
    f.render_widget(title, chunks[1]);
}

fn draw_deck_list(f: &mut Frame, screen: &DashboardState, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Decks ");

    let decks = match &screen.decks {
        LoadState::Loading => {
            f.render_widget(Paragraph::new("Loading decks...").block(block), area);
            return;
        }
        LoadState::Failed(message) => {
            let text = vec![
                Line::from(Span::styled(message.as_str(), Style::default().fg(Color::Red))),
                Line::from(""),
                Line::from(Span::styled("Press r to retry", Style::default().fg(Color::DarkGray))),
            ];
            f.render_widget(Paragraph::new(text).block(block), area);
            return;
        }
        LoadState::Loaded(decks) => decks,
    };

    if decks.is_empty() {
        let text = "No decks yet. Press n to create one or i to import.";
        f.render_widget(Paragraph::new(text).block(block), area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let header = Row::new(["Name", "Language", "Type", "Cards", "Tags", "Updated"])
        .style(Style::default().fg(Color::Yellow).bold());

    let rows: Vec<Row> = decks
        .iter()
        .map(|deck| {
            let updated = deck
                .updated_at
                .or(deck.created_at)
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default();
            Row::new(vec![
                Cell::from(deck.name.clone()),
                Cell::from(language_label(&deck.language).to_string()),
                Cell::from(deck.card_type.label()).style(Style::default().fg(card_type_color(deck.card_type))),
                Cell::from(deck.card_count.to_string()),
                Cell::from(deck.tags.join(", ")),
                Cell::from(updated),
            ])
        })
        .collect();

    let widths = [
        Constraint::Percentage(28),
        Constraint::Length(12),
        Constraint::Length(10),
        Constraint::Length(6),
        Constraint::Percentage(30),
        Constraint::Length(17),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().bg(Color::DarkGray).bold())
        .highlight_symbol("> ");

    let mut table_state = TableState::default().with_selected(Some(screen.selected));
    f.render_stateful_widget(table, chunks[0], &mut table_state);

    if let Some(busy) = &screen.busy {
        f.render_widget(Paragraph::new(busy.as_str()).style(Style::default().fg(Color::Cyan)), chunks[1]);
    } else if let Some(description) = screen.selected_deck().and_then(|d| d.description.as_deref()) {
        f.render_widget(
            Paragraph::new(description).style(Style::default().fg(Color::DarkGray)),
            chunks[1],
        );
    }
}

/// Draws the create form; returns the area of the focused text field
fn draw_create_form(f: &mut Frame, screen: &DeckCreateState, editing: bool, area: Rect) -> Option<Rect> {
    let block = Block::default().borders(Borders::ALL).title(" Create Deck ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Name
            Constraint::Length(3), // Language + card type
            Constraint::Length(3), // Description
            Constraint::Length(3), // Tag input
            Constraint::Length(2), // Tags
            Constraint::Length(1), // Suggestions
            Constraint::Min(0),    // Error / progress
        ])
        .split(inner);

    let focused = |field: CreateField| screen.focus == field;
    let editing_field = |field: CreateField| editing && screen.focus == field;

    f.render_widget(
        render_input(&screen.name, " Deck Name * ", focused(CreateField::Name), editing_field(CreateField::Name)),
        chunks[0],
    );

    let row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);
    let language = LANGUAGES
        .get(screen.language)
        .map(|(_, label)| *label)
        .unwrap_or_default();
    f.render_widget(render_choice(language, " Language ", focused(CreateField::Language)), row[0]);
    f.render_widget(
        render_choice(screen.card_type.label(), " Card Type ", focused(CreateField::CardType)),
        row[1],
    );

    f.render_widget(
        render_input(
            &screen.description,
            " Description ",
            focused(CreateField::Description),
            editing_field(CreateField::Description),
        ),
        chunks[2],
    );
    f.render_widget(
        render_input(
            &screen.tag_input,
            " Add Tag (Enter to add) ",
            focused(CreateField::Tags),
            editing_field(CreateField::Tags),
        ),
        chunks[3],
    );

    let tags: Vec<Span> = screen
        .tags
        .iter()
        .enumerate()
        .flat_map(|(i, tag)| {
            let style = if focused(CreateField::Tags) && i == screen.selected_tag {
                Style::default().fg(Color::Black).bg(Color::Yellow)
            } else {
                Style::default().fg(Color::Black).bg(Color::Cyan)
            };
            [Span::styled(format!(" {} ", tag), style), Span::raw(" ")]
        })
        .collect();
    f.render_widget(Paragraph::new(Line::from(tags)).wrap(Wrap { trim: true }), chunks[4]);

    if !screen.suggestions.is_empty() {
        let hint = format!("Known tags: {}", screen.suggestions.join(", "));
        f.render_widget(Paragraph::new(hint).style(Style::default().fg(Color::DarkGray)), chunks[5]);
    }

    if screen.submitting {
        f.render_widget(Paragraph::new("Creating deck...").style(Style::default().fg(Color::Cyan)), chunks[6]);
    } else if let Some(error) = &screen.error {
        f.render_widget(
            Paragraph::new(error.as_str())
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true }),
            chunks[6],
        );
    }

    match screen.focus {
        CreateField::Name => Some(chunks[0]),
        CreateField::Description => Some(chunks[2]),
        CreateField::Tags => Some(chunks[3]),
        CreateField::Language | CreateField::CardType => None,
    }
}

fn draw_editor(f: &mut Frame, screen: &DeckEditState, editing: bool, area: Rect) -> Option<Rect> {
    let title = match &screen.deck {
        Some(deck) => format!(" {} ", deck.name),
        None => format!(" {} ", screen.deck_id),
    };
    let block = Block::default().borders(Borders::ALL).title(title);

    match &screen.status {
        EditorStatus::Loading => {
            f.render_widget(Paragraph::new("Loading deck...").block(block), area);
            return None;
        }
        EditorStatus::Failed(message) => {
            let text = vec![
                Line::from(Span::styled(message.as_str(), Style::default().fg(Color::Red))),
                Line::from(""),
                Line::from(Span::styled(
                    "Press r to retry or Esc to go back",
                    Style::default().fg(Color::DarkGray),
                )),
            ];
            f.render_widget(Paragraph::new(text).block(block), area);
            return None;
        }
        EditorStatus::Ready => {}
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Deck info
            Constraint::Min(0),    // Cards
            Constraint::Length(if editing { 5 } else { 0 }),
        ])
        .split(area);

    if let Some(deck) = &screen.deck {
        let mut info = vec![
            Span::styled(language_label(&deck.language).to_string(), Style::default().fg(Color::Cyan)),
            Span::raw(" | "),
            Span::styled(deck.card_type.label(), Style::default().fg(card_type_color(deck.card_type))),
            Span::raw(format!(" | {} cards", screen.cards.len())),
        ];
        if screen.saving {
            info.push(Span::styled(" | Saving...", Style::default().fg(Color::Yellow)));
        }
        f.render_widget(Paragraph::new(Line::from(info)), chunks[0]);
    }

    let names = screen.field_names();
    let mut headers: Vec<String> = vec![String::from("#")];
    headers.extend(names.iter().cloned());
    headers.push(String::from(TAGS_COLUMN));
    let header = Row::new(headers).style(Style::default().fg(Color::Yellow).bold());

    let rows: Vec<Row> = screen
        .cards
        .iter()
        .enumerate()
        .map(|(row_index, card)| {
            let mut cells = vec![Cell::from(card.id.to_string()).style(Style::default().fg(Color::DarkGray))];
            let values = names
                .iter()
                .map(|name| card.fields.get(name).unwrap_or_default().to_string())
                .chain(std::iter::once(card.tags.join(", ")));
            for (col, value) in values.enumerate() {
                let selected = row_index == screen.selected_row && col == screen.selected_col;
                let style = if selected {
                    Style::default().fg(Color::Black).bg(Color::Yellow)
                } else {
                    Style::default()
                };
                cells.push(Cell::from(cell_text(&value, 40)).style(style));
            }
            Row::new(cells)
        })
        .collect();

    let mut widths = vec![Constraint::Length(5)];
    let share = (100 / (names.len() as u16 + 1)).max(1);
    widths.extend(names.iter().map(|_| Constraint::Percentage(share)));
    widths.push(Constraint::Percentage(share));

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().bg(Color::Rgb(40, 40, 40)));

    if screen.cards.is_empty() {
        f.render_widget(
            Paragraph::new("No cards yet. Press a to add one.").block(
                Block::default().borders(Borders::ALL).title(format!(" {} ", screen.deck_id)),
            ),
            chunks[1],
        );
    } else {
        let mut table_state = TableState::default().with_selected(Some(screen.selected_row));
        f.render_stateful_widget(table, chunks[1], &mut table_state);
    }

    if !editing {
        return None;
    }
    let column = names
        .get(screen.selected_col)
        .cloned()
        .unwrap_or_else(|| String::from(TAGS_COLUMN));
    let cell = screen.cell.clone().unwrap_or_default();
    let title = format!(" Editing {} (comma separated for tags) ", column);
    f.render_widget(render_input(&cell, &title, true, true), chunks[2]);
    Some(chunks[2])
}

fn draw_import(f: &mut Frame, screen: &ImportState, editing: bool, area: Rect) -> Option<Rect> {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    let selected = match screen.mode {
        ImportMode::Csv => 0,
        ImportMode::Text => 1,
    };
    f.render_widget(
        render_tabs(&[ImportMode::Csv.label(), ImportMode::Text.label()], selected),
        chunks[0],
    );

    let block = Block::default().borders(Borders::ALL).title(" Import Deck ");
    let inner = block.inner(chunks[1]);
    f.render_widget(block, chunks[1]);

    let focused = |field: ImportField| screen.focus == field;
    let editing_field = |field: ImportField| editing && screen.focus == field;
    let label = |index: usize| LANGUAGES.get(index).map(|(_, l)| *l).unwrap_or_default();

    match screen.mode {
        ImportMode::Csv => {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(3),
                    Constraint::Length(3),
                    Constraint::Length(3),
                    Constraint::Min(0),
                ])
                .split(inner);
            let options = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(rows[2]);

            let form = &screen.csv;
            f.render_widget(
                render_input(
                    &form.path,
                    " CSV File (Tab completes) * ",
                    focused(ImportField::File),
                    editing_field(ImportField::File),
                ),
                rows[0],
            );
            f.render_widget(
                render_input(
                    &form.deck_name,
                    " Deck Name (optional) ",
                    focused(ImportField::DeckName),
                    editing_field(ImportField::DeckName),
                ),
                rows[1],
            );
            f.render_widget(render_choice(label(form.language), " Language ", focused(ImportField::Language)), options[0]);
            f.render_widget(
                render_choice(form.card_type.label(), " Card Type ", focused(ImportField::CardType)),
                options[1],
            );
            draw_import_footer(f, screen, rows[3]);

            match screen.focus {
                ImportField::File => Some(rows[0]),
                ImportField::DeckName => Some(rows[1]),
                _ => None,
            }
        }
        ImportMode::Text => {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(3),
                    Constraint::Length(3),
                    Constraint::Min(5),
                    Constraint::Length(2),
                ])
                .split(inner);
            let options = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([
                    Constraint::Percentage(34),
                    Constraint::Percentage(33),
                    Constraint::Percentage(33),
                ])
                .split(rows[1]);

            let form = &screen.text;
            f.render_widget(
                render_input(
                    &form.deck_name,
                    " Deck Name * ",
                    focused(ImportField::DeckName),
                    editing_field(ImportField::DeckName),
                ),
                rows[0],
            );
            f.render_widget(render_choice(label(form.language), " Language ", focused(ImportField::Language)), options[0]);
            f.render_widget(
                render_choice(form.separator.label(), " Separator ", focused(ImportField::Separator)),
                options[1],
            );
            f.render_widget(
                render_choice(form.card_type.label(), " Card Type ", focused(ImportField::CardType)),
                options[2],
            );
            f.render_widget(
                render_input(
                    &form.text,
                    " Text Data * (one card per line) ",
                    focused(ImportField::Body),
                    editing_field(ImportField::Body),
                ),
                rows[2],
            );
            draw_import_footer(f, screen, rows[3]);

            match screen.focus {
                ImportField::DeckName => Some(rows[0]),
                ImportField::Body => Some(rows[2]),
                _ => None,
            }
        }
    }
}

fn draw_import_footer(f: &mut Frame, screen: &ImportState, area: Rect) {
    if screen.submitting {
        f.render_widget(Paragraph::new("Importing...").style(Style::default().fg(Color::Cyan)), area);
    } else if let Some(error) = &screen.error {
        f.render_widget(
            Paragraph::new(error.as_str())
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true }),
            area,
        );
    }
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let hints = if state.input_mode == InputMode::Editing {
        match &state.screen {
            Screen::DeckCreate(s) if s.focus == CreateField::Tags => " Enter:add tag | ESC:stop editing ",
            Screen::Import(s) if s.focus == ImportField::File => " Tab:complete path | ESC:stop editing ",
            Screen::Import(s) if s.focus == ImportField::Body => " Enter:new line | ESC:stop editing ",
            _ => " Enter/ESC:stop editing | arrows:move cursor ",
        }
    } else {
        match state.screen.kind() {
            ScreenKind::DeckList => " ↑↓:select | Enter:edit | n:new | i:import | g:download | d:delete | r:reload | ?:help ",
            ScreenKind::DeckCreate => " Tab:field | ←→:choose | e:edit | x:remove tag | s:create | Esc:back ",
            ScreenKind::DeckEdit => " arrows:move | e:edit | a:add card | s:save | Esc:back ",
            ScreenKind::Import => " Tab:field | ←→:choose | e:edit | t:mode | s:import | Esc:back ",
        }
    };

    let line = Line::from(vec![
        Span::styled(hints, Style::default().fg(Color::DarkGray)),
        Span::styled(format!(" {} ", state.api_url), Style::default().fg(Color::Blue)),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn draw_confirm_popup(f: &mut Frame, deck_id: &str, area: Rect) {
    let popup_area = centered_rect(50, 20, area);
    let text = vec![
        Line::from(format!("Delete deck '{}'?", deck_id)),
        Line::from(""),
        Line::from(Span::styled("y: delete   n/Esc: cancel", Style::default().fg(Color::DarkGray))),
    ];
    let popup = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(" Confirm ")
                .style(Style::default().bg(Color::Black)),
        );

    f.render_widget(Clear, popup_area);
    f.render_widget(popup, popup_area);
}

fn draw_notice_popup(f: &mut Frame, message: &str, color: Color, area: Rect) {
    let popup_area = centered_rect(50, 20, area);
    let text = vec![
        Line::from(Span::styled(message, Style::default().fg(color))),
        Line::from(""),
        Line::from(Span::styled("Press Enter to continue", Style::default().fg(Color::DarkGray))),
    ];
    let popup = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .style(Style::default().bg(Color::Black)),
        );

    f.render_widget(Clear, popup_area);
    f.render_widget(popup, popup_area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 80, area);

    let help_text = r#"
 ANKI DECK MANAGER - Keyboard Shortcuts

 DECK LIST
   ↑ / ↓              Select deck
   Enter / e          Edit cards
   n                  New deck
   i                  Import CSV or text
   g                  Generate and download .apkg
   d                  Delete deck (asks first)
   r                  Reload

 FORMS
   Tab / ↑ / ↓        Next / previous field
   ← / →              Change option, select tag
   e / Enter          Edit field
   x                  Remove selected tag
   t                  Switch CSV / text (import)
   s                  Submit
   Esc                Back to deck list

 EDITOR
   arrows             Move between cells
   e / Enter          Edit cell
   a                  Add card
   s                  Save all cards

 GENERAL
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}
