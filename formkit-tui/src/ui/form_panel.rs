//! Form panel — one block of lines per field, read back from the surface.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::Frame;

use formkit_core::{FormSurface, Widget};

use crate::app::{AppState, ControlKind, FocusTarget};
use crate::theme;

const SLIDER_WIDTH: usize = 24;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let focused = app.focused();
    let targets = app.focus_targets();

    let mut lines: Vec<Line> = Vec::new();
    for widget in app.form.widgets() {
        lines.extend(field_lines(app, widget, &targets, focused.as_ref()));
        lines.push(Line::from(""));
    }
    if lines.is_empty() {
        lines.push(Line::from(Span::styled("No fields", theme::muted())));
    }

    let para = Paragraph::new(lines).wrap(Wrap { trim: false });
    f.render_widget(para, area);
}

fn field_lines<'a>(
    app: &'a AppState,
    widget: &'a dyn Widget,
    targets: &[FocusTarget],
    focused: Option<&FocusTarget>,
) -> Vec<Line<'a>> {
    let schema = widget.field();
    let field_focused = focused.is_some_and(|t| t.field == schema.name);

    let mut header = vec![Span::styled(
        schema.display_label(),
        if field_focused {
            theme::accent_bold()
        } else {
            theme::text()
        },
    )];
    if schema.optional {
        header.push(Span::styled(" (optional)", theme::muted()));
    }
    let mut lines = vec![Line::from(header)];

    for target in targets.iter().filter(|t| t.field == schema.name) {
        let is_focused = focused == Some(target);
        let value = app.surface.value(target.control).unwrap_or_default();
        let line = match target.kind {
            ControlKind::Slider => {
                let attr = |name: &str| {
                    app.surface
                        .attribute(target.control, name)
                        .and_then(|v| v.parse::<f64>().ok())
                        .unwrap_or(0.0)
                };
                let (min, max) = (attr("min"), attr("max"));
                let current = value.parse::<f64>().unwrap_or(min);
                Line::from(vec![
                    Span::raw("  "),
                    Span::styled(
                        render_slider_inline(current, min, max, SLIDER_WIDTH),
                        if is_focused { theme::accent() } else { theme::neutral() },
                    ),
                    Span::styled(format!(" {min} .. {max}"), theme::muted()),
                ])
            }
            ControlKind::Text => {
                let cursor = if is_focused { "_" } else { " " };
                Line::from(vec![
                    Span::raw("  "),
                    Span::styled(
                        format!("[ {value}{cursor} ]"),
                        theme::input(is_focused, widget.state()),
                    ),
                ])
            }
        };
        lines.push(line);
    }

    for message in widget.errors(&app.surface) {
        lines.push(Line::from(Span::styled(format!("  ! {message}"), theme::negative())));
    }
    if let Some(description) = &schema.description {
        lines.push(Line::from(Span::styled(format!("  {description}"), theme::muted())));
    }
    lines
}

/// Render a slider as `[=====     ]`.
pub fn render_slider_inline(value: f64, min: f64, max: f64, width: usize) -> String {
    let range = max - min;
    if range <= 0.0 {
        return format!("[{}]", "=".repeat(width));
    }
    let frac = ((value - min) / range).clamp(0.0, 1.0);
    let filled = (frac * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);
    format!("[{}{}]", "=".repeat(filled), " ".repeat(empty))
}
