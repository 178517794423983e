//! formkit core — schema-driven form fields.
//!
//! This crate contains:
//! - Field schemas and form configuration (TOML / JSON)
//! - Number validation with a fixed check order
//! - A markup model and builder seam
//! - A form surface trait plus an in-memory implementation
//! - The number field widget (text input with optional range slider)
//! - An explicit widget registry and the form controller that collects commits

pub mod config;
pub mod form;
pub mod i18n;
pub mod markup;
pub mod number;
pub mod registry;
pub mod schema;
pub mod surface;
pub mod validate;
pub mod value;
pub mod widget;

pub use config::{ConfigError, FormConfig};
pub use form::{Commit, Dispatched, Form, FormError};
pub use i18n::{Catalog, Translator};
pub use markup::{DefaultMarkup, Element, ElementKind, MarkupBuilder};
pub use number::NumberField;
pub use registry::{register_defaults, RegistryError, WidgetRegistry};
pub use schema::{Decimals, FieldSchema, SchemaError};
pub use surface::{check_errors, ChangeEvent, FormSurface, MemorySurface, NodeId, SurfaceError};
pub use validate::{validate_input, ValidationError};
pub use value::NumberValue;
pub use widget::{ChangeOutcome, FieldState, Setter, Toolkit, Widget, WidgetError};
