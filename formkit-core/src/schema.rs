//! Field schema — declarative description of a form field.
//!
//! Schemas are read from form configuration files (TOML or JSON) and stay
//! immutable for the lifetime of the widget built from them.

use serde::{Deserialize, Serialize};

/// Errors found when sanity-checking a schema.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    #[error("field '{field}': min ({min}) is greater than max ({max})")]
    InvertedBounds { field: String, min: f64, max: f64 },
    #[error("field '{field}': step must be a positive number, got {step}")]
    InvalidStep { field: String, step: f64 },
    #[error("field '{field}': {bound} must be finite")]
    NonFiniteBound { field: String, bound: &'static str },
    #[error("field has an empty name")]
    EmptyName,
}

/// The `decimals` setting: either a plain flag or a digit count.
///
/// Both `decimals = true` and `decimals = 2` turn on decimal mode;
/// `false` and `0` leave the field in integer mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Decimals {
    Flag(bool),
    Count(u32),
}

impl Decimals {
    /// Whether this setting requires a decimal-formatted value.
    pub fn is_enabled(self) -> bool {
        match self {
            Decimals::Flag(flag) => flag,
            Decimals::Count(count) => count > 0,
        }
    }
}

/// Declarative description of a single form field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    /// Parameter key the committed value is stored under.
    pub name: String,

    /// Widget type tag (e.g. `"number"`).
    #[serde(rename = "type")]
    pub field_type: String,

    /// Display label. Falls back to `name` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Help text rendered next to the control.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Inclusive lower bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    /// Inclusive upper bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,

    /// Values must be a multiple of this increment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimals: Option<Decimals>,

    /// When false (the default), an empty value is rejected.
    #[serde(default)]
    pub optional: bool,

    /// Initial value used when the form supplies no parameter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

impl FieldSchema {
    /// A bare number field with no constraints.
    pub fn number(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: "number".to_string(),
            label: None,
            description: None,
            min: None,
            max: None,
            step: None,
            decimals: None,
            optional: false,
            default: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_bounds(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    pub fn with_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn with_max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn with_step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    pub fn with_decimals(mut self, decimals: Decimals) -> Self {
        self.decimals = Some(decimals);
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Label text shown to the user.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    /// True when the value must be written as a decimal number.
    pub fn requires_decimal(&self) -> bool {
        self.decimals.is_some_and(Decimals::is_enabled)
    }

    /// A slider is paired with the text input only when all three of
    /// `min`, `max` and `step` are set.
    pub fn has_slider(&self) -> bool {
        self.min.is_some() && self.max.is_some() && self.step.is_some()
    }

    /// Check that the constraints are internally consistent.
    pub fn check(&self) -> Result<(), SchemaError> {
        if self.name.trim().is_empty() {
            return Err(SchemaError::EmptyName);
        }
        for (bound, value) in [("min", self.min), ("max", self.max)] {
            if value.is_some_and(|v| !v.is_finite()) {
                return Err(SchemaError::NonFiniteBound {
                    field: self.name.clone(),
                    bound,
                });
            }
        }
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(SchemaError::InvertedBounds {
                    field: self.name.clone(),
                    min,
                    max,
                });
            }
        }
        if let Some(step) = self.step {
            if !step.is_finite() || step <= 0.0 {
                return Err(SchemaError::InvalidStep {
                    field: self.name.clone(),
                    step,
                });
            }
        }
        Ok(())
    }
}
