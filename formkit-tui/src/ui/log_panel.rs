//! Commit log — most recent routed changes first.

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use formkit_core::ChangeOutcome;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    if app.log.is_empty() {
        let para = Paragraph::new(Span::styled(
            "Type a value and press Enter",
            theme::muted(),
        ));
        f.render_widget(para, area);
        return;
    }

    let lines: Vec<Line> = app
        .log
        .iter()
        .take(area.height as usize)
        .map(|entry| {
            Line::from(vec![
                Span::styled(entry.timestamp.format("%H:%M:%S ").to_string(), theme::muted()),
                Span::styled(format!("{:<12} ", entry.field), theme::text()),
                Span::styled(
                    describe(&entry.outcome),
                    Style::default().fg(theme::outcome_color(&entry.outcome)),
                ),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines), area);
}

fn describe(outcome: &ChangeOutcome) -> String {
    match outcome {
        ChangeOutcome::Committed(value) => format!("= {value}"),
        ChangeOutcome::Cleared => "cleared".to_string(),
        ChangeOutcome::Rejected(message) => format!("x {message}"),
        ChangeOutcome::Ignored => "-".to_string(),
    }
}
