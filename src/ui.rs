use ratatui::{prelude::*, widgets::*};

use crate::app::input::TextInput;
use crate::app::screens::NoticeKind;
use crate::models::CardType;

/// Renders a text input field; focused fields are highlighted
pub fn render_input<'a>(input: &'a TextInput, title: &'a str, is_focused: bool, editing: bool) -> Paragraph<'a> {
    let style = if editing {
        Style::default().fg(Color::Green)
    } else if is_focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title);

    Paragraph::new(input.value()).block(block).wrap(Wrap { trim: false })
}

/// Renders a left/right option picker
pub fn render_choice<'a>(value: &'a str, title: &'a str, is_focused: bool) -> Paragraph<'a> {
    let style = if is_focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let text = if is_focused {
        format!("< {} >", value)
    } else {
        value.to_string()
    };

    Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(style)
            .title(title),
    )
}

/// Renders tabs
pub fn render_tabs<'a>(titles: &[&'a str], selected: usize) -> Tabs<'a> {
    let titles: Vec<Line> = titles.iter().map(|t| Line::from(*t)).collect();

    Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::Yellow).bold())
        .divider("|")
}

/// Card type color
pub fn card_type_color(card_type: CardType) -> Color {
    match card_type {
        CardType::Basic => Color::Green,
        CardType::Cloze => Color::Cyan,
        CardType::Reversed => Color::Magenta,
    }
}

pub fn notice_color(kind: NoticeKind) -> Color {
    match kind {
        NoticeKind::Info => Color::Green,
        NoticeKind::Error => Color::Red,
    }
}

/// Helper function to create a centered rect
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Cursor cell for a (line, col) offset inside a bordered input, clamped to
/// the inner area
pub fn cursor_position(area: Rect, line: usize, col: usize) -> Position {
    let offset = |n: usize| u16::try_from(n).unwrap_or(u16::MAX);
    let x = area
        .x
        .saturating_add(1)
        .saturating_add(offset(col))
        .min(area.right().saturating_sub(2));
    let y = area
        .y
        .saturating_add(1)
        .saturating_add(offset(line))
        .min(area.bottom().saturating_sub(2));
    Position::new(x, y)
}

/// Clip text for a table cell to one line
pub fn cell_text(value: &str, max_chars: usize) -> String {
    let line = value.lines().next().unwrap_or("");
    let mut clipped: String = line.chars().take(max_chars).collect();
    if line.chars().count() > max_chars || value.contains('\n') {
        clipped.push('…');
    }
    clipped
}
