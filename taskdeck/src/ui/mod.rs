//! Terminal UI rendering.

pub mod input_panel;
pub mod status_bar;
pub mod task_list;
pub mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use crate::app::App;

/// Main draw function for the entire UI.
pub fn draw(frame: &mut Frame, app: &App) {
    // Input box on top, task list below, status bar at the bottom.
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    input_panel::render(frame, chunks[0], app);
    task_list::render(frame, chunks[1], app);
    status_bar::render(frame, chunks[2], app);
}
