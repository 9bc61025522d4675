//! Status bar rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::theme;
use crate::app::{App, PanelFocus};

/// Render the status bar at the bottom of the screen.
///
/// A pending notice takes the place of the help text until it expires.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let help_text = match app.focus {
        PanelFocus::Input => "Enter: submit | Tab: switch panel | Esc: cancel/quit | ←→: move cursor",
        PanelFocus::Tasks => {
            "Tab: switch panel | ↑↓/jk: navigate | Enter/e: edit | d: delete | r: refresh | Esc: quit"
        }
    };

    let trailing = app.notice.as_ref().map_or_else(
        || Span::styled(help_text, theme::dimmed()),
        |notice| Span::styled(notice.clone(), theme::notice()),
    );

    let status_line = Line::from(vec![
        Span::styled(
            concat!("TaskDeck v", env!("CARGO_PKG_VERSION")),
            theme::bold(),
        ),
        Span::raw(" | "),
        Span::styled(app.store_label.clone(), theme::dimmed()),
        Span::raw(" | "),
        trailing,
    ]);

    let paragraph = Paragraph::new(status_line).style(theme::status_bar_bg());
    frame.render_widget(paragraph, area);
}
