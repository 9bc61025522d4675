//! Task list rendering.

use chrono::DateTime;
use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
};

use super::theme;
use crate::app::{App, EditMode, PanelFocus};

/// Render the task list.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let is_focused = app.focus == PanelFocus::Tasks;

    let items: Vec<ListItem> = app
        .tasks
        .iter()
        .map(|task| {
            let editing = matches!(&app.edit, EditMode::Editing(id) if *id == task.id);
            let marker = if editing { "✎ " } else { "  " };
            let line = Line::from(vec![
                Span::styled(marker, theme::notice()),
                Span::styled(&task.title, theme::normal()),
                Span::raw("  "),
                Span::styled(
                    format_created_at(&task.created_at, &app.timestamp_format),
                    theme::dimmed(),
                ),
            ]);
            ListItem::new(line)
        })
        .collect();

    let title = format!("Tasks ({})", app.tasks.len());
    let block = Block::default()
        .title(Span::styled(title, theme::panel_title(theme::TASKS_TITLE)))
        .borders(Borders::ALL)
        .border_style(if is_focused {
            theme::highlighted()
        } else {
            theme::normal()
        });

    let list = List::new(items)
        .block(block)
        .highlight_style(theme::selected());

    let mut state = ListState::default();
    if !app.tasks.is_empty() {
        state.select(Some(app.selected_task));
    }

    frame.render_stateful_widget(list, area, &mut state);
}

/// Format an RFC 3339 creation timestamp for display.
///
/// Falls back to the raw string when it does not parse; the store owns the
/// timestamp and the UI never rejects what it sent.
fn format_created_at(created_at: &str, format: &str) -> String {
    DateTime::parse_from_rfc3339(created_at).map_or_else(
        |_| created_at.to_string(),
        |dt| dt.format(format).to_string(),
    )
}
