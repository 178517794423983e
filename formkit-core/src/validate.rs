//! Number validation — raw text in, parsed value or a single rejection out.
//!
//! Checks run in a fixed order and stop at the first failure:
//! required → format → max → min → step.
//!
//! Step divisibility uses Rust's `%` on `f64`, which truncates toward zero
//! (the remainder takes the dividend's sign). `-7 % 2 == -1`, so `-7` is off
//! step; `-8 % 2 == 0`, so `-8` is on step.

use std::sync::OnceLock;

use regex::Regex;

use crate::i18n::{keys, Translator};
use crate::schema::FieldSchema;
use crate::value::NumberValue;

/// Substituted for `:property` in every number field message.
pub const PROPERTY_NAME: &str = "number field";

/// Why a raw input was rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("a value is required")]
    MissingRequiredValue,
    #[error("value is not a number")]
    NotANumber,
    #[error("value exceeds the maximum of {max}")]
    ExceedsMaximum { max: f64 },
    #[error("value is below the minimum of {min}")]
    ExceedsMinimum { min: f64 },
    #[error("value is not a multiple of {step}")]
    NotOnStep { step: f64 },
}

impl ValidationError {
    /// Translation key for this rejection.
    pub fn message_key(&self) -> &'static str {
        match self {
            ValidationError::MissingRequiredValue => keys::REQUIRED_PROPERTY,
            ValidationError::NotANumber => keys::ONLY_NUMBERS,
            ValidationError::ExceedsMaximum { .. } => keys::EXCEEDS_MAX,
            ValidationError::ExceedsMinimum { .. } => keys::EXCEEDS_MIN,
            ValidationError::NotOnStep { .. } => keys::OUT_OF_STEP,
        }
    }

    pub fn substitutions(&self) -> Vec<(&'static str, String)> {
        let mut subs = vec![(":property", PROPERTY_NAME.to_string())];
        match self {
            ValidationError::ExceedsMaximum { max } => subs.push((":max", max.to_string())),
            ValidationError::ExceedsMinimum { min } => subs.push((":min", min.to_string())),
            ValidationError::NotOnStep { step } => subs.push((":step", step.to_string())),
            ValidationError::MissingRequiredValue | ValidationError::NotANumber => {}
        }
        subs
    }

    /// Localized message text.
    pub fn message(&self, translator: &dyn Translator) -> String {
        translator.translate(self.message_key(), &self.substitutions())
    }
}

fn integer_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^-?[0-9]+$").expect("integer pattern is valid"))
}

fn decimal_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^-?[0-9]+[.,][0-9]+$").expect("decimal pattern is valid"))
}

/// Validate raw input text against a field schema.
///
/// Returns `Ok(None)` for an empty value on an optional field: nothing to
/// commit, nothing to report.
pub fn validate_input(
    schema: &FieldSchema,
    raw: &str,
) -> Result<Option<NumberValue>, ValidationError> {
    let text = raw.trim();

    if text.is_empty() {
        return if schema.optional {
            Ok(None)
        } else {
            Err(ValidationError::MissingRequiredValue)
        };
    }

    let value = parse_number(text, schema.requires_decimal())?;
    check_constraints(schema, value)?;
    Ok(Some(value))
}

/// Format check and parse. `text` must already be trimmed.
fn parse_number(text: &str, decimal: bool) -> Result<NumberValue, ValidationError> {
    if decimal {
        if !decimal_pattern().is_match(text) {
            return Err(ValidationError::NotANumber);
        }
        // Enough digits overflow to infinity, which is not a number either.
        text.replacen(',', ".", 1)
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(NumberValue::Decimal)
            .ok_or(ValidationError::NotANumber)
    } else {
        if !integer_pattern().is_match(text) {
            return Err(ValidationError::NotANumber);
        }
        // Digits only at this point; the only failure left is i64 overflow.
        text.parse::<i64>()
            .map(NumberValue::Integer)
            .map_err(|_| ValidationError::NotANumber)
    }
}

/// Bound and step checks on an already parsed value.
pub fn check_constraints(schema: &FieldSchema, value: NumberValue) -> Result<(), ValidationError> {
    let v = value.as_f64();

    if let Some(max) = schema.max {
        if v > max {
            return Err(ValidationError::ExceedsMaximum { max });
        }
    }
    if let Some(min) = schema.min {
        if v < min {
            return Err(ValidationError::ExceedsMinimum { min });
        }
    }
    if let Some(step) = schema.step {
        if v % step != 0.0 {
            return Err(ValidationError::NotOnStep { step });
        }
    }
    Ok(())
}
