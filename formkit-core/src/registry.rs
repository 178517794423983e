//! Widget registry — maps schema type tags to widget constructors.
//!
//! There is no global registry; the host builds one at startup, usually with
//! [`WidgetRegistry::with_defaults`], and passes it to the form builder.

use std::collections::BTreeMap;

use crate::number::{self, NumberField};
use crate::schema::FieldSchema;
use crate::widget::{Setter, Toolkit, Widget};

/// Constructs a widget from schema, initial parameter, setter and toolkit.
pub type WidgetFactory = fn(FieldSchema, Option<serde_json::Value>, Setter, Toolkit) -> Box<dyn Widget>;

/// Errors that can occur during widget lookup or registration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Unknown widget type: {0}")]
    UnknownWidget(String),
    #[error("Widget type already registered: {0}")]
    AlreadyRegistered(String),
}

#[derive(Debug, Clone, Default)]
pub struct WidgetRegistry {
    factories: BTreeMap<String, WidgetFactory>,
}

impl WidgetRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in widget.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        register_defaults(&mut registry);
        registry
    }

    /// Register `factory` under `type_tag`. Tags are unique.
    pub fn register(&mut self, type_tag: impl Into<String>, factory: WidgetFactory) -> Result<(), RegistryError> {
        let type_tag = type_tag.into();
        if self.factories.contains_key(&type_tag) {
            return Err(RegistryError::AlreadyRegistered(type_tag));
        }
        self.factories.insert(type_tag, factory);
        Ok(())
    }

    pub fn contains(&self, type_tag: &str) -> bool {
        self.factories.contains_key(type_tag)
    }

    /// Registered type tags, sorted.
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Build the widget for `schema.field_type`.
    pub fn create(
        &self,
        schema: FieldSchema,
        params: Option<serde_json::Value>,
        setter: Setter,
        toolkit: Toolkit,
    ) -> Result<Box<dyn Widget>, RegistryError> {
        let factory = self
            .factories
            .get(&schema.field_type)
            .ok_or_else(|| RegistryError::UnknownWidget(schema.field_type.clone()))?;
        Ok(factory(schema, params, setter, toolkit))
    }
}

/// Register the built-in widgets.
pub fn register_defaults(registry: &mut WidgetRegistry) {
    // Only fails on a duplicate tag, and defaults go in first or not at all.
    if !registry.contains(number::WIDGET_TYPE) {
        let _ = registry.register(number::WIDGET_TYPE, NumberField::boxed);
    }
}
