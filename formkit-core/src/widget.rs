//! Widget trait — the capability set every field editor provides.
//!
//! A widget is built from a schema, an initial parameter value and a setter,
//! renders itself onto a [`FormSurface`], reacts to change events on the
//! controls it owns, and tears its markup down on removal.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::i18n::{Catalog, Translator};
use crate::markup::{DefaultMarkup, MarkupBuilder};
use crate::schema::FieldSchema;
use crate::surface::{ChangeEvent, FormSurface, NodeId, SurfaceError};

/// Callback a widget commits validated values through.
///
/// `serde_json::Value::Null` means the field was cleared.
pub type Setter = Box<dyn FnMut(&FieldSchema, serde_json::Value) + Send>;

/// Errors from driving a widget against a surface.
#[derive(Debug, thiserror::Error)]
pub enum WidgetError {
    #[error("surface error: {0}")]
    Surface(#[from] SurfaceError),
    #[error("widget for '{0}' is not rendered")]
    NotRendered(String),
    #[error("widget for '{field}' produced unexpected markup: {reason}")]
    MalformedMarkup { field: String, reason: &'static str },
}

/// Whether the committed value matches what is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FieldState {
    #[default]
    Clean,
    /// An error is shown; the committed value is unchanged.
    Invalid,
}

/// What a change event did.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeOutcome {
    /// A valid value was committed through the setter.
    Committed(serde_json::Value),
    /// An empty optional field was cleared.
    Cleared,
    /// Validation failed with the given (translated) message.
    Rejected(String),
    /// The event was for a control this widget does not own.
    Ignored,
}

/// Shared collaborators a widget renders and reports through.
#[derive(Clone)]
pub struct Toolkit {
    pub markup: Arc<dyn MarkupBuilder>,
    pub translator: Arc<dyn Translator>,
}

impl Default for Toolkit {
    fn default() -> Self {
        Self {
            markup: Arc::new(DefaultMarkup),
            translator: Arc::new(Catalog::english()),
        }
    }
}

impl std::fmt::Debug for Toolkit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Toolkit").finish_non_exhaustive()
    }
}

impl Toolkit {
    pub fn with_translator(mut self, translator: impl Translator + 'static) -> Self {
        self.translator = Arc::new(translator);
        self
    }

    pub fn with_markup(mut self, markup: impl MarkupBuilder + 'static) -> Self {
        self.markup = Arc::new(markup);
        self
    }
}

/// A field editor.
pub trait Widget: Send {
    fn field(&self) -> &FieldSchema;

    /// Build markup, attach it under `parent`, and subscribe to control changes.
    fn append_to(&mut self, surface: &mut dyn FormSurface, parent: NodeId)
        -> Result<(), WidgetError>;

    /// True when `control` is one of this widget's inputs.
    fn owns(&self, control: NodeId) -> bool;

    /// React to a change of one of this widget's controls.
    fn handle_change(
        &mut self,
        surface: &mut dyn FormSurface,
        event: ChangeEvent,
    ) -> Result<ChangeOutcome, WidgetError>;

    /// Validate the displayed input. Returns the value that would be
    /// committed, or `None` when invalid or empty.
    fn validate(&mut self, surface: &mut dyn FormSurface)
        -> Result<Option<serde_json::Value>, WidgetError>;

    /// Detach and drop every element this widget created.
    fn remove(&mut self, surface: &mut dyn FormSurface) -> Result<(), WidgetError>;

    /// Error messages currently shown for this field.
    fn errors(&self, surface: &dyn FormSurface) -> Vec<String>;

    /// The outer item container, once rendered.
    fn item(&self) -> Option<NodeId>;

    fn state(&self) -> FieldState;

    /// Last committed value.
    fn current_value(&self) -> Option<serde_json::Value>;
}
