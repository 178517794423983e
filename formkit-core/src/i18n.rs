//! Message translation — key + substitutions → user-facing text.

use std::collections::HashMap;

/// Looks up localized message text.
///
/// Substitutions are `(placeholder, value)` pairs; placeholders include their
/// leading colon (e.g. `":max"`).
pub trait Translator: Send + Sync {
    fn translate(&self, key: &str, substitutions: &[(&str, String)]) -> String;
}

/// Message keys used by the number field.
pub mod keys {
    pub const REQUIRED_PROPERTY: &str = "requiredProperty";
    pub const ONLY_NUMBERS: &str = "onlyNumbers";
    pub const EXCEEDS_MAX: &str = "exceedsMax";
    pub const EXCEEDS_MIN: &str = "exceedsMin";
    pub const OUT_OF_STEP: &str = "outOfStep";
}

const ENGLISH: [(&str, &str); 5] = [
    (keys::REQUIRED_PROPERTY, "The :property is required and must have a value."),
    (keys::ONLY_NUMBERS, "The :property value can only contain numbers."),
    (keys::EXCEEDS_MAX, "The :property value exceeds the maximum of :max."),
    (keys::EXCEEDS_MIN, "The :property value is below the minimum of :min."),
    (keys::OUT_OF_STEP, "The :property value can only be changed in steps of :step."),
];

/// Template catalog with `:placeholder` substitution.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    templates: HashMap<String, String>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::english()
    }
}

impl Catalog {
    /// Built-in English messages.
    pub fn english() -> Self {
        Self {
            templates: ENGLISH
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// An empty catalog; every lookup reports a missing translation.
    pub fn empty() -> Self {
        Self {
            templates: HashMap::new(),
        }
    }

    /// Replace or add templates, e.g. from the `[messages]` config table.
    pub fn with_overrides<I, K, V>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, template) in overrides {
            self.templates.insert(key.into(), template.into());
        }
        self
    }

    pub fn template(&self, key: &str) -> Option<&str> {
        self.templates.get(key).map(String::as_str)
    }
}

impl Translator for Catalog {
    fn translate(&self, key: &str, substitutions: &[(&str, String)]) -> String {
        let Some(template) = self.templates.get(key) else {
            return format!("[Missing translation {key}]");
        };
        // One pass over the template: inserted values are never rescanned,
        // and the longest placeholder wins so ":maximum" beats ":max".
        let mut out = String::with_capacity(template.len());
        let mut rest = template.as_str();
        while let Some(c) = rest.chars().next() {
            let hit = substitutions
                .iter()
                .filter(|(placeholder, _)| !placeholder.is_empty() && rest.starts_with(placeholder))
                .max_by_key(|(placeholder, _)| placeholder.len());
            match hit {
                Some((placeholder, value)) => {
                    out.push_str(value);
                    rest = &rest[placeholder.len()..];
                }
                None => {
                    out.push(c);
                    rest = &rest[c.len_utf8()..];
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substituted_values_are_not_rescanned() {
        let text = Catalog::english().translate(
            keys::EXCEEDS_MAX,
            &[(":property", "field :max".into()), (":max", "10".into())],
        );
        assert_eq!(text, "The field :max value exceeds the maximum of 10.");
    }

    #[test]
    fn substitutes_placeholders() {
        let text = Catalog::english().translate(
            keys::EXCEEDS_MAX,
            &[(":property", "number field".into()), (":max", "10".into())],
        );
        assert_eq!(text, "The number field value exceeds the maximum of 10.");
    }

    #[test]
    fn missing_key_is_visible() {
        assert_eq!(
            Catalog::empty().translate("nope", &[]),
            "[Missing translation nope]"
        );
    }

    #[test]
    fn overrides_replace_builtin_text() {
        let catalog = Catalog::english().with_overrides([(keys::ONLY_NUMBERS, "Digits only in :property!")]);
        assert_eq!(
            catalog.translate(keys::ONLY_NUMBERS, &[(":property", "age".into())]),
            "Digits only in age!"
        );
        assert!(catalog.template(keys::OUT_OF_STEP).is_some());
    }

    #[test]
    fn longer_placeholder_wins() {
        let catalog = Catalog::empty().with_overrides([("k", ":maximum/:max")]);
        let text = catalog.translate("k", &[(":max", "1".into()), (":maximum", "2".into())]);
        assert_eq!(text, "2/1");
    }
}
