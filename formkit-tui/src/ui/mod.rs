//! Top-level UI layout — form panel, commit log and status bar.

pub mod form_panel;
pub mod log_panel;
pub mod status_bar;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders};
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &AppState) {
    f.render_widget(
        Block::default().style(Style::default().bg(theme::BACKGROUND)),
        f.area(),
    );

    // Split: main area + 1-line status bar.
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(f.area());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(chunks[0]);

    let title = app.form.title().unwrap_or("Form");
    let inner = draw_block(f, columns[0], title, true);
    form_panel::render(f, inner, app);

    let inner = draw_block(f, columns[1], "Commits", false);
    log_panel::render(f, inner, app);

    status_bar::render(f, chunks[1], app);
}

/// Draw a bordered block and return its inner area.
fn draw_block(f: &mut Frame, area: Rect, title: &str, active: bool) -> Rect {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(active))
        .title(format!(" {title} "))
        .title_style(theme::panel_title(active));

    let inner = block.inner(area);
    f.render_widget(block, area);
    inner
}
