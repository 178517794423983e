//! Form state persistence — JSON save/load across restarts.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use formkit_core::FormConfig;

use crate::app::AppState;

/// Serializable subset of app state that persists across restarts.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PersistedState {
    /// Committed parameters, keyed by field name.
    #[serde(default)]
    pub values: Map<String, Value>,
    #[serde(default)]
    pub focus: usize,
}

/// Load persisted state from disk. Returns defaults if file is missing or corrupt.
pub fn load(path: &Path) -> PersistedState {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
        Err(_) => PersistedState::default(),
    }
}

/// Save persisted state to disk. Creates parent directories if needed.
pub fn save(path: &Path, state: &PersistedState) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(state)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Extract persisted state from AppState.
pub fn extract(app: &AppState) -> PersistedState {
    PersistedState {
        values: app.form.params().clone(),
        focus: app.focus,
    }
}

/// Seed the config's initial values. Must run before the form is built.
///
/// Values for fields the config no longer declares are dropped.
pub fn apply_values(config: &mut FormConfig, state: &PersistedState) {
    for (name, value) in &state.values {
        if config.field(name).is_some() {
            config.values.insert(name.clone(), value.clone());
        }
    }
}

/// Restore UI state on a built app.
pub fn apply_focus(app: &mut AppState, state: &PersistedState) {
    if state.focus < app.focus_targets().len() {
        app.focus = state.focus;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formkit_core::FieldSchema;
    use serde_json::json;

    #[test]
    fn roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");

        let mut state = PersistedState::default();
        state.values.insert("count".into(), json!(7));
        state.focus = 1;

        save(&path, &state).unwrap();
        let loaded = load(&path);

        assert_eq!(loaded.values.get("count"), Some(&json!(7)));
        assert_eq!(loaded.focus, 1);
    }

    #[test]
    fn missing_file_returns_defaults() {
        let loaded = load(Path::new("/nonexistent/path/state.json"));
        assert!(loaded.values.is_empty());
        assert_eq!(loaded.focus, 0);
    }

    #[test]
    fn corrupt_file_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "not valid json {{{").unwrap();

        let loaded = load(&path);
        assert!(loaded.values.is_empty());
    }

    #[test]
    fn apply_skips_unknown_fields() {
        let mut config = FormConfig::new(vec![FieldSchema::number("count")]);
        let mut state = PersistedState::default();
        state.values.insert("count".into(), json!(3));
        state.values.insert("gone".into(), json!(9));

        apply_values(&mut config, &state);
        assert_eq!(config.values.get("count"), Some(&json!(3)));
        assert!(!config.values.contains_key("gone"));
    }

    #[test]
    fn extract_then_apply_restores_form() {
        let config = FormConfig::new(vec![FieldSchema::number("count")]);
        let mut app = AppState::new(&config, None).unwrap();
        let input = app.focus_targets()[0].control;
        app.surface.input(input, "12").unwrap();
        app.dispatch();

        let state = extract(&app);
        let mut config = config.clone();
        apply_values(&mut config, &state);
        let restored = AppState::new(&config, None).unwrap();
        assert_eq!(restored.form.params().get("count"), Some(&json!(12)));
    }
}
