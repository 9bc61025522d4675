//! Title input rendering.
//!
//! One input box serves both forms: it creates a task while viewing and
//! rewrites the selected task's title while editing. The panel title shows
//! which of the two submitting Enter will do.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::theme;
use crate::app::{App, EditMode, PanelFocus};

/// Render the input box.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let is_focused = app.focus == PanelFocus::Input;

    // Build the input text with a cursor at the character position.
    let mut display_text = app.input.clone();
    if is_focused {
        let byte_idx = display_text
            .char_indices()
            .nth(app.cursor_position)
            .map_or(display_text.len(), |(i, _)| i);
        display_text.insert(byte_idx, '█');
    }

    let input_line = if display_text.is_empty() && !is_focused {
        Line::from(Span::styled("Type a task...", theme::dimmed()))
    } else {
        Line::from(Span::styled(display_text, theme::normal()))
    };

    let title = match app.edit {
        EditMode::Viewing => "New task",
        EditMode::Editing(_) => "Edit task",
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(if is_focused {
            theme::highlighted()
        } else {
            theme::normal()
        });

    let paragraph = Paragraph::new(input_line).block(block);

    frame.render_widget(paragraph, area);
}
