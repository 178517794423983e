//! Form controller — builds widgets from a config and collects commits.
//!
//! Widgets report through setters that send [`Commit`]s over a channel; the
//! form drains the channel after each routed change. The parameter object
//! starts from the configured initial values, which are not validated until
//! [`Form::validate_all`] runs; every later change is a validated commit.

use std::sync::mpsc::{channel, Receiver, Sender};

use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::config::FormConfig;
use crate::registry::{RegistryError, WidgetRegistry};
use crate::surface::{ChangeEvent, FormSurface, NodeId};
use crate::widget::{ChangeOutcome, FieldState, Setter, Toolkit, Widget, WidgetError};

#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Widget(#[from] WidgetError),
    #[error("no field named '{0}'")]
    UnknownField(String),
}

/// A value reported by a widget's setter.
#[derive(Debug, Clone, PartialEq)]
pub struct Commit {
    pub field: String,
    pub value: Value,
}

/// Result of routing one change event.
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatched {
    pub field: String,
    pub outcome: ChangeOutcome,
}

pub struct Form {
    title: Option<String>,
    widgets: Vec<Box<dyn Widget>>,
    params: Map<String, Value>,
    commits: Receiver<Commit>,
    mounted: bool,
}

impl std::fmt::Debug for Form {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Form")
            .field("title", &self.title)
            .field("fields", &self.field_names().collect::<Vec<_>>())
            .field("params", &self.params)
            .field("mounted", &self.mounted)
            .finish()
    }
}

fn channel_setter(tx: &Sender<Commit>) -> Setter {
    let tx = tx.clone();
    Box::new(move |schema, value| {
        // The receiver lives as long as the form; a closed channel means the
        // form is gone and the commit has nowhere to land.
        let _ = tx.send(Commit {
            field: schema.name.clone(),
            value,
        });
    })
}

impl Form {
    /// Create one widget per field through `registry`.
    ///
    /// Initial values come from `config.values`, falling back to each
    /// schema's `default`. The parameter object starts with those values
    /// as the widgets read them, unvalidated.
    pub fn build(config: &FormConfig, registry: &WidgetRegistry) -> Result<Self, FormError> {
        let toolkit = Toolkit::default().with_translator(config.catalog());
        Self::build_with(config, registry, toolkit)
    }

    pub fn build_with(
        config: &FormConfig,
        registry: &WidgetRegistry,
        toolkit: Toolkit,
    ) -> Result<Self, FormError> {
        let (tx, rx) = channel();
        let mut widgets = Vec::with_capacity(config.fields.len());
        let mut params = Map::new();

        for schema in &config.fields {
            let initial = config
                .values
                .get(&schema.name)
                .or(schema.default.as_ref())
                .cloned();
            let widget = registry.create(schema.clone(), initial, channel_setter(&tx), toolkit.clone())?;
            if let Some(value) = widget.current_value() {
                params.insert(schema.name.clone(), value);
            }
            widgets.push(widget);
        }

        Ok(Self {
            title: config.title.clone(),
            widgets,
            params,
            commits: rx,
            mounted: false,
        })
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Render every widget under `parent`, in config order.
    pub fn mount(&mut self, surface: &mut dyn FormSurface, parent: NodeId) -> Result<(), FormError> {
        for widget in &mut self.widgets {
            widget.append_to(surface, parent)?;
        }
        self.mounted = true;
        Ok(())
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Route every queued change event to its widget, then apply commits.
    pub fn dispatch(&mut self, surface: &mut dyn FormSurface) -> Result<Vec<Dispatched>, FormError> {
        let mut dispatched = Vec::new();
        for event in surface.drain_events() {
            if let Some(result) = self.route(surface, event)? {
                dispatched.push(result);
            }
        }
        self.apply_commits();
        Ok(dispatched)
    }

    fn route(
        &mut self,
        surface: &mut dyn FormSurface,
        event: ChangeEvent,
    ) -> Result<Option<Dispatched>, FormError> {
        let Some(widget) = self.widgets.iter_mut().find(|w| w.owns(event.control)) else {
            trace!(control = %event.control, "change for unowned control");
            return Ok(None);
        };
        let outcome = widget.handle_change(surface, event)?;
        trace!(field = %widget.field().name, ?outcome, "routed change");
        Ok(Some(Dispatched {
            field: widget.field().name.clone(),
            outcome,
        }))
    }

    fn apply_commits(&mut self) {
        while let Ok(commit) = self.commits.try_recv() {
            debug!(field = %commit.field, value = %commit.value, "applying commit");
            if commit.value.is_null() {
                self.params.remove(&commit.field);
            } else {
                self.params.insert(commit.field, commit.value);
            }
        }
    }

    /// Validate every field without committing. Returns names of invalid fields.
    pub fn validate_all(&mut self, surface: &mut dyn FormSurface) -> Result<Vec<String>, FormError> {
        let mut invalid = Vec::new();
        for widget in &mut self.widgets {
            widget.validate(surface)?;
            if !widget.errors(&*surface).is_empty() {
                invalid.push(widget.field().name.clone());
            }
        }
        Ok(invalid)
    }

    /// Committed parameters.
    pub fn params(&self) -> &Map<String, Value> {
        &self.params
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.widgets.iter().map(|w| w.field().name.as_str())
    }

    pub fn widget(&self, name: &str) -> Option<&dyn Widget> {
        self.widgets
            .iter()
            .find(|w| w.field().name == name)
            .map(|w| w.as_ref())
    }

    pub fn widgets(&self) -> impl Iterator<Item = &dyn Widget> {
        self.widgets.iter().map(|w| w.as_ref())
    }

    pub fn field_state(&self, name: &str) -> Result<FieldState, FormError> {
        self.widget(name)
            .map(|w| w.state())
            .ok_or_else(|| FormError::UnknownField(name.to_string()))
    }

    /// Remove every widget's markup from the surface.
    pub fn unmount(&mut self, surface: &mut dyn FormSurface) -> Result<(), FormError> {
        for widget in &mut self.widgets {
            widget.remove(surface)?;
        }
        self.mounted = false;
        Ok(())
    }
}
