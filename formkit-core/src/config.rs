//! Form configuration — field schemas, initial values and message overrides.
//!
//! Files are TOML unless the extension is `.json`:
//!
//! ```toml
//! title = "Quiz settings"
//!
//! [[fields]]
//! name = "attempts"
//! type = "number"
//! min = 0
//! max = 10
//! step = 1
//!
//! [values]
//! attempts = 3
//!
//! [messages]
//! exceedsMax = "Too many! At most :max."
//! ```

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::i18n::Catalog;
use crate::schema::{FieldSchema, SchemaError};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("duplicate field name: {0}")]
    DuplicateField(String),
    #[error("form has no fields")]
    NoFields,
}

/// A complete form description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    pub fields: Vec<FieldSchema>,

    /// Initial parameter values keyed by field name.
    #[serde(default)]
    pub values: BTreeMap<String, serde_json::Value>,

    /// Message template overrides keyed by message key.
    #[serde(default)]
    pub messages: BTreeMap<String, String>,
}

impl FormConfig {
    pub fn new(fields: Vec<FieldSchema>) -> Self {
        Self {
            title: None,
            fields,
            values: BTreeMap::new(),
            messages: BTreeMap::new(),
        }
    }

    /// Load and check a config file. `.json` files are parsed as JSON,
    /// everything else as TOML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_toml_str(&text)
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.check()?;
        Ok(config)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.check()?;
        Ok(config)
    }

    /// Schema sanity plus unique field names.
    pub fn check(&self) -> Result<(), ConfigError> {
        if self.fields.is_empty() {
            return Err(ConfigError::NoFields);
        }
        let mut seen = HashSet::new();
        for field in &self.fields {
            field.check()?;
            if !seen.insert(field.name.as_str()) {
                return Err(ConfigError::DuplicateField(field.name.clone()));
            }
        }
        Ok(())
    }

    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// English catalog with this form's overrides applied.
    pub fn catalog(&self) -> Catalog {
        Catalog::english().with_overrides(self.messages.clone())
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Translator;

    const SAMPLE: &str = r#"
title = "Settings"

[[fields]]
name = "attempts"
type = "number"
label = "Attempts"
min = 0
max = 10
step = 1

[[fields]]
name = "ratio"
type = "number"
decimals = 2
optional = true

[values]
attempts = 3

[messages]
exceedsMax = "At most :max please"
"#;

    #[test]
    fn parses_toml() {
        let config = FormConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.title.as_deref(), Some("Settings"));
        assert_eq!(config.fields.len(), 2);
        assert_eq!(config.values["attempts"], serde_json::json!(3));
        assert!(config.field("ratio").unwrap().requires_decimal());
        assert!(config.field("attempts").unwrap().has_slider());
    }

    #[test]
    fn messages_override_catalog() {
        let config = FormConfig::from_toml_str(SAMPLE).unwrap();
        let text = config.catalog().translate("exceedsMax", &[(":max", "10".into())]);
        assert_eq!(text, "At most 10 please");
    }

    #[test]
    fn rejects_duplicate_names() {
        let config = FormConfig::new(vec![FieldSchema::number("a"), FieldSchema::number("a")]);
        assert!(matches!(config.check(), Err(ConfigError::DuplicateField(name)) if name == "a"));
    }

    #[test]
    fn rejects_bad_schema() {
        let text = "[[fields]]\nname = \"a\"\ntype = \"number\"\nstep = 0\n";
        assert!(matches!(
            FormConfig::from_toml_str(text),
            Err(ConfigError::Schema(SchemaError::InvalidStep { .. }))
        ));
    }

    #[test]
    fn rejects_empty_form() {
        assert!(matches!(FormConfig::from_toml_str("fields = []"), Err(ConfigError::NoFields)));
    }

    #[test]
    fn toml_roundtrip_keeps_fields() {
        let config = FormConfig::from_toml_str(SAMPLE).unwrap();
        let text = config.to_toml_string().unwrap();
        assert_eq!(FormConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn load_dispatches_on_extension() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("form.json");
        std::fs::write(&json_path, r#"{"fields":[{"name":"n","type":"number"}]}"#).unwrap();
        assert_eq!(FormConfig::load(&json_path).unwrap().fields[0].name, "n");

        let missing = dir.path().join("missing.toml");
        assert!(matches!(FormConfig::load(&missing), Err(ConfigError::Io { .. })));
    }
}
