use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::app::{App, InputMode};
use crate::components::pane_view::PaneWidget;
use crate::components::status_bar::StatusBarWidget;
use crate::nav::filter::FilterMode;
use crate::nav::pane::Pane;

/// Render the application UI.
pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    // Keep each cursor visible inside its bordered pane.
    let visible_height = rows[0].height.saturating_sub(2) as usize;
    let ids: Vec<_> = app.navigator.panes().iter().map(Pane::id).collect();
    for id in &ids {
        if let Some(pane) = app.navigator.pane_mut(*id) {
            pane.update_scroll(visible_height);
        }
    }

    for (pane, column) in app.navigator.panes().iter().zip(columns.iter()) {
        frame.render_widget(PaneWidget::new(pane, pane.id() == app.active), *column);
    }

    let info = selection_summary(app);
    let mut status = StatusBarWidget::new(&info);
    let label = match app.mode {
        InputMode::Normal => None,
        InputMode::Filter(FilterMode::Regex) => Some("regex"),
        InputMode::Filter(_) => Some("filter"),
        InputMode::GotoPath => Some("cd"),
    };
    if let Some(label) = label {
        status = status.prompt(label, &app.input_state.input);
    } else if let Some((msg, _)) = &app.status_message {
        status = status.status_message(msg);
    }
    frame.render_widget(status, rows[1]);
}

fn selection_summary(app: &App) -> String {
    let Some(pane) = app.active_pane() else {
        return String::new();
    };
    let count = pane.entries().iter().filter(|e| !e.is_parent()).count();
    match pane.selected_path() {
        Some(path) => format!(" {} ({count} entries)", path.display()),
        None => format!(" ({count} entries)"),
    }
}
