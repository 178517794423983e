//! Numeric field values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A validated number, kept in the form it was entered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberValue {
    Integer(i64),
    Decimal(f64),
}

impl NumberValue {
    pub fn as_f64(self) -> f64 {
        match self {
            NumberValue::Integer(v) => v as f64,
            NumberValue::Decimal(v) => v,
        }
    }

    /// Convert to a JSON number for committing to the form parameters.
    ///
    /// Values come from validation or [`NumberValue::from_json`], both of
    /// which only produce finite numbers.
    pub fn to_json(self) -> serde_json::Value {
        match self {
            NumberValue::Integer(v) => serde_json::Value::from(v),
            NumberValue::Decimal(v) => serde_json::Value::from(v),
        }
    }

    /// Match the kind a field expects, so the value displays as text that
    /// passes that field's format check.
    ///
    /// Whole decimals become integers in integer mode; integers become
    /// decimals in decimal mode. Fractional decimals are left alone.
    pub fn coerce(self, decimal: bool) -> Self {
        match self {
            NumberValue::Integer(v) if decimal => NumberValue::Decimal(v as f64),
            NumberValue::Decimal(v)
                if !decimal && v.fract() == 0.0 && v.abs() < i64::MAX as f64 =>
            {
                NumberValue::Integer(v as i64)
            }
            other => other,
        }
    }

    /// Read a value back from stored form parameters.
    ///
    /// Strings are accepted too since hand-written configs sometimes quote numbers.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(NumberValue::Integer)
                .or_else(|| n.as_f64().map(NumberValue::Decimal)),
            serde_json::Value::String(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .map(NumberValue::Integer)
                    .ok()
                    .or_else(|| {
                        s.parse::<f64>()
                            .ok()
                            .filter(|v| v.is_finite())
                            .map(NumberValue::Decimal)
                    })
            }
            _ => None,
        }
    }
}

impl fmt::Display for NumberValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumberValue::Integer(v) => write!(f, "{v}"),
            // Keep a fractional part so "2.0" does not come back as "2".
            NumberValue::Decimal(v) if v.fract() == 0.0 => write!(f, "{v:.1}"),
            NumberValue::Decimal(v) => write!(f, "{v}"),
        }
    }
}

impl From<i64> for NumberValue {
    fn from(v: i64) -> Self {
        NumberValue::Integer(v)
    }
}

impl From<f64> for NumberValue {
    fn from(v: f64) -> Self {
        NumberValue::Decimal(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn display_matches_typed_form() {
        assert_eq!(NumberValue::Integer(-4).to_string(), "-4");
        assert_eq!(NumberValue::Decimal(2.5).to_string(), "2.5");
        assert_eq!(NumberValue::Decimal(2.0).to_string(), "2.0");
        assert_eq!(NumberValue::Decimal(-0.125).to_string(), "-0.125");
    }

    #[test]
    fn coerce_follows_field_mode() {
        assert_eq!(NumberValue::Decimal(3.0).coerce(false), NumberValue::Integer(3));
        assert_eq!(NumberValue::Decimal(3.5).coerce(false), NumberValue::Decimal(3.5));
        assert_eq!(NumberValue::Integer(3).coerce(true), NumberValue::Decimal(3.0));
        assert_eq!(NumberValue::Integer(3).coerce(false), NumberValue::Integer(3));
    }

    #[test]
    fn json_numbers_keep_integer_kind() {
        assert_eq!(NumberValue::from_json(&json!(8)), Some(NumberValue::Integer(8)));
        assert_eq!(NumberValue::from_json(&json!(0.25)), Some(NumberValue::Decimal(0.25)));
        assert_eq!(NumberValue::from_json(&json!(" 3 ")), Some(NumberValue::Integer(3)));
        assert_eq!(NumberValue::from_json(&json!(null)), None);
        assert_eq!(NumberValue::from_json(&json!("abc")), None);
    }

    #[test]
    fn non_finite_strings_are_not_values() {
        assert_eq!(NumberValue::from_json(&json!("inf")), None);
        assert_eq!(NumberValue::from_json(&json!("NaN")), None);
        assert_eq!(NumberValue::Integer(7).to_json(), json!(7));
        assert_eq!(NumberValue::Decimal(2.0).to_json(), json!(2.0));
    }
}
