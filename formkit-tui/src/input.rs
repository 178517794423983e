//! Keyboard input dispatch — global keys, then the focused control.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use formkit_core::FormSurface;

use crate::app::{AppState, ControlKind, FocusTarget};
use crate::persistence;

/// Handle a key event.
pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // 1. Global keys. Letters stay free for typing.
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => {
            app.running = false;
            return;
        }
        KeyCode::Char('c') if ctrl => {
            app.running = false;
            return;
        }
        KeyCode::Char('s') if ctrl => {
            save(app);
            return;
        }
        KeyCode::Tab | KeyCode::Down => {
            app.focus_next();
            return;
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.focus_prev();
            return;
        }
        _ => {}
    }

    // 2. Control-specific keys. Modified letters are shortcuts, not text.
    if let KeyCode::Char(_) = key.code {
        if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return;
        }
    }
    let Some(target) = app.focused() else { return };
    match target.kind {
        ControlKind::Text => handle_text_key(app, &target, key),
        ControlKind::Slider => handle_slider_key(app, &target, key),
    }
}

fn handle_text_key(app: &mut AppState, target: &FocusTarget, key: KeyEvent) {
    let mut text = app.surface.value(target.control).unwrap_or_default();
    match key.code {
        KeyCode::Char(c) => text.push(c),
        KeyCode::Backspace => {
            text.pop();
        }
        KeyCode::Enter => {
            app.surface.emit_change(target.control);
            app.dispatch();
            return;
        }
        _ => return,
    }
    if let Err(err) = app.surface.set_value(target.control, &text) {
        app.set_error(err.to_string());
    }
}

fn handle_slider_key(app: &mut AppState, target: &FocusTarget, key: KeyEvent) {
    let direction = match key.code {
        KeyCode::Left | KeyCode::Char('h') => -1.0,
        KeyCode::Right | KeyCode::Char('l') => 1.0,
        _ => return,
    };
    let Some(next) = step_slider(app, target, direction) else {
        return;
    };
    if let Err(err) = app.surface.set_value(target.control, &next.to_string()) {
        app.set_error(err.to_string());
        return;
    }
    app.surface.emit_change(target.control);
    app.dispatch();
}

/// Next slider position, one step in `direction`, clamped to the range.
pub fn step_slider(app: &AppState, target: &FocusTarget, direction: f64) -> Option<f64> {
    let attr = |name: &str| -> Option<f64> {
        app.surface.attribute(target.control, name)?.parse().ok()
    };
    let (min, max, step) = (attr("min")?, attr("max")?, attr("step")?);
    let current = app
        .surface
        .value(target.control)
        .and_then(|v| v.parse::<f64>().ok())
        .unwrap_or(min);
    Some((current + direction * step).clamp(min, max))
}

fn save(app: &mut AppState) {
    let Some(path) = app.state_path.clone() else {
        app.set_warning("No state file configured");
        return;
    };
    let state = persistence::extract(app);
    match persistence::save(&path, &state) {
        Ok(()) => app.set_status(format!("Saved {}", path.display())),
        Err(err) => app.set_error(format!("Save failed: {err}")),
    }
}
