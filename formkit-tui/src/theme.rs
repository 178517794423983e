//! Neon-on-charcoal theme tokens for the formkit TUI.
//!
//! # Color Palette
//! - **Background**: deep charcoal
//! - **Accent**: electric cyan (focus, active control)
//! - **Positive**: neon green (committed values)
//! - **Negative**: hot pink (validation errors)
//! - **Warning**: neon orange (cleared values, warnings)
//! - **Muted**: steel blue (hints, descriptions)

use ratatui::style::{Color, Modifier, Style};

use formkit_core::{ChangeOutcome, FieldState};

pub const BACKGROUND: Color = Color::Rgb(18, 18, 20);
pub const ACCENT: Color = Color::Rgb(0, 255, 255);
pub const POSITIVE: Color = Color::Rgb(0, 255, 128);
pub const NEGATIVE: Color = Color::Rgb(255, 20, 147);
pub const WARNING: Color = Color::Rgb(255, 140, 0);
pub const NEUTRAL: Color = Color::Rgb(147, 112, 219);
pub const MUTED: Color = Color::Rgb(100, 149, 237);
pub const TEXT_PRIMARY: Color = Color::Rgb(240, 240, 240);

pub fn accent() -> Style {
    Style::default().fg(ACCENT)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn positive() -> Style {
    Style::default().fg(POSITIVE)
}

pub fn negative() -> Style {
    Style::default().fg(NEGATIVE)
}

pub fn warning() -> Style {
    Style::default().fg(WARNING)
}

pub fn neutral() -> Style {
    Style::default().fg(NEUTRAL)
}

pub fn muted() -> Style {
    Style::default().fg(MUTED)
}

pub fn text() -> Style {
    Style::default().fg(TEXT_PRIMARY)
}

pub fn panel_border(active: bool) -> Style {
    if active {
        accent()
    } else {
        muted()
    }
}

pub fn panel_title(active: bool) -> Style {
    if active {
        accent_bold()
    } else {
        neutral()
    }
}

/// Style for a text input, by focus and validation state.
pub fn input(focused: bool, state: FieldState) -> Style {
    let base = match state {
        FieldState::Clean => text(),
        FieldState::Invalid => negative(),
    };
    if focused {
        base.add_modifier(Modifier::REVERSED)
    } else {
        base
    }
}

/// Color for a commit-log entry.
pub fn outcome_color(outcome: &ChangeOutcome) -> Color {
    match outcome {
        ChangeOutcome::Committed(_) => POSITIVE,
        ChangeOutcome::Cleared => WARNING,
        ChangeOutcome::Rejected(_) => NEGATIVE,
        ChangeOutcome::Ignored => MUTED,
    }
}
