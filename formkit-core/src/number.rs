//! Number field — text input with an optional paired range slider.
//!
//! The text input is authoritative: slider changes are copied into it and
//! then go through the same validate → commit path as typed input.

use tracing::{debug, trace, warn};

use crate::markup::ElementKind;
use crate::schema::FieldSchema;
use crate::surface::{check_errors, ChangeEvent, FormSurface, NodeId};
use crate::validate::{validate_input, ValidationError};
use crate::value::NumberValue;
use crate::widget::{ChangeOutcome, FieldState, Setter, Toolkit, Widget, WidgetError};

/// Registry tag for this widget.
pub const WIDGET_TYPE: &str = "number";

/// Max length of the text input.
const TEXT_MAX_LENGTH: usize = 15;

/// Nodes the widget created and owns.
#[derive(Debug, Clone, Copy)]
struct Rendered {
    item: NodeId,
    errors: NodeId,
    input: NodeId,
    range: Option<NodeId>,
}

pub struct NumberField {
    schema: FieldSchema,
    value: Option<NumberValue>,
    setter: Setter,
    toolkit: Toolkit,
    rendered: Option<Rendered>,
    state: FieldState,
    last_error: Option<ValidationError>,
}

impl std::fmt::Debug for NumberField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NumberField")
            .field("schema", &self.schema)
            .field("value", &self.value)
            .field("rendered", &self.rendered)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl NumberField {
    /// Store schema, initial parameter and setter. Nothing is rendered yet.
    ///
    /// An initial parameter that is not a number is ignored; the schema's
    /// `default` is used when no parameter is given. Whole numbers are
    /// converted to the field's integer or decimal mode.
    pub fn new(
        schema: FieldSchema,
        params: Option<serde_json::Value>,
        setter: Setter,
        toolkit: Toolkit,
    ) -> Self {
        let value = params
            .as_ref()
            .or(schema.default.as_ref())
            .and_then(NumberValue::from_json)
            .map(|v| v.coerce(schema.requires_decimal()));
        Self {
            schema,
            value,
            setter,
            toolkit,
            rendered: None,
            state: FieldState::Clean,
            last_error: None,
        }
    }

    /// Factory used by the widget registry.
    pub fn boxed(
        schema: FieldSchema,
        params: Option<serde_json::Value>,
        setter: Setter,
        toolkit: Toolkit,
    ) -> Box<dyn Widget> {
        Box::new(Self::new(schema, params, setter, toolkit))
    }

    pub fn value(&self) -> Option<NumberValue> {
        self.value
    }

    /// The rejection shown after the last validation, if any.
    pub fn last_error(&self) -> Option<&ValidationError> {
        self.last_error.as_ref()
    }

    pub fn text_input(&self) -> Option<NodeId> {
        self.rendered.map(|r| r.input)
    }

    pub fn slider(&self) -> Option<NodeId> {
        self.rendered.and_then(|r| r.range)
    }

    pub fn error_region(&self) -> Option<NodeId> {
        self.rendered.map(|r| r.errors)
    }

    fn rendered(&self) -> Result<Rendered, WidgetError> {
        self.rendered
            .ok_or_else(|| WidgetError::NotRendered(self.schema.name.clone()))
    }

    fn malformed(&self, reason: &'static str) -> WidgetError {
        WidgetError::MalformedMarkup {
            field: self.schema.name.clone(),
            reason,
        }
    }

    fn create_markup(&self) -> crate::markup::Element {
        let markup = &self.toolkit.markup;
        let shown = self.value.map(|v| v.to_string());

        let mut inputs = Vec::with_capacity(2);
        if let (Some(min), Some(max), Some(step)) = (self.schema.min, self.schema.max, self.schema.step) {
            inputs.push(markup.create_range(min, max, step, shown.as_deref()));
        }
        inputs.push(markup.create_text(shown.as_deref(), TEXT_MAX_LENGTH));

        let label = markup.create_label(&self.schema, inputs);
        markup.create_item(&self.schema, &self.schema.field_type, label)
    }

    /// Locate the error region and inputs inside the attached item.
    fn locate(&self, surface: &dyn FormSurface, item: NodeId) -> Result<Rendered, WidgetError> {
        let children = surface.children(item);
        let errors = children
            .iter()
            .copied()
            .find(|c| matches!(surface.kind(*c), Some(ElementKind::ErrorList)))
            .ok_or_else(|| self.malformed("missing error region"))?;
        let label = children
            .iter()
            .copied()
            .find(|c| matches!(surface.kind(*c), Some(ElementKind::Label)))
            .ok_or_else(|| self.malformed("missing label"))?;
        let inputs: Vec<NodeId> = surface
            .children(label)
            .into_iter()
            .filter(|c| matches!(surface.kind(*c), Some(ElementKind::Input { .. })))
            .collect();

        let (range, input) = match inputs.as_slice() {
            [] => return Err(self.malformed("no input inside label")),
            [input] => (None, *input),
            [range, input, ..] => (Some(*range), *input),
        };
        Ok(Rendered {
            item,
            errors,
            input,
            range,
        })
    }

    /// Validate the text input and render at most one error.
    ///
    /// Returns the parsed value when it should be committed. Errors from the
    /// previous change are cleared first.
    pub fn validate_number(
        &mut self,
        surface: &mut dyn FormSurface,
    ) -> Result<Option<NumberValue>, WidgetError> {
        let rendered = self.rendered()?;
        surface.clear_errors(rendered.errors)?;

        let raw = surface.value(rendered.input).unwrap_or_default();
        let parsed = match validate_input(&self.schema, &raw) {
            Ok(value) => {
                self.last_error = None;
                value
            }
            Err(err) => {
                let message = err.message(self.toolkit.translator.as_ref());
                debug!(field = %self.schema.name, input = %raw.trim(), error = %err, "rejected");
                surface.attach(rendered.errors, self.toolkit.markup.create_error(&message))?;
                self.last_error = Some(err);
                None
            }
        };

        Ok(check_errors(surface, rendered.errors, rendered.input, parsed)?.flatten())
    }

    fn on_text_change(&mut self, surface: &mut dyn FormSurface) -> Result<ChangeOutcome, WidgetError> {
        let rendered = self.rendered()?;

        match self.validate_number(surface)? {
            Some(value) => {
                let json = value.to_json();
                (self.setter)(&self.schema, json.clone());
                self.value = Some(value);
                self.state = FieldState::Clean;
                if let Some(range) = rendered.range {
                    surface.set_value(range, &value.to_string())?;
                }
                debug!(field = %self.schema.name, %value, "committed");
                Ok(ChangeOutcome::Committed(json))
            }
            None if self.last_error.is_none() => {
                (self.setter)(&self.schema, serde_json::Value::Null);
                self.value = None;
                self.state = FieldState::Clean;
                debug!(field = %self.schema.name, "cleared");
                Ok(ChangeOutcome::Cleared)
            }
            None => {
                self.state = FieldState::Invalid;
                let message = surface
                    .error_messages(rendered.errors)
                    .into_iter()
                    .next()
                    .unwrap_or_default();
                Ok(ChangeOutcome::Rejected(message))
            }
        }
    }

    fn on_slider_change(
        &mut self,
        surface: &mut dyn FormSurface,
        range: NodeId,
    ) -> Result<ChangeOutcome, WidgetError> {
        let rendered = self.rendered()?;
        let slider_value = surface.value(range).unwrap_or_default();
        trace!(field = %self.schema.name, value = %slider_value, "slider moved");
        surface.set_value(rendered.input, &slider_value)?;
        self.on_text_change(surface)
    }
}

impl Widget for NumberField {
    fn field(&self) -> &FieldSchema {
        &self.schema
    }

    fn append_to(&mut self, surface: &mut dyn FormSurface, parent: NodeId) -> Result<(), WidgetError> {
        let item = surface.attach(parent, self.create_markup())?;
        let mut rendered = self.locate(surface, item)?;

        surface.listen(rendered.input)?;

        if let Some(range) = rendered.range {
            if surface.control_type(range).as_deref() == Some("range") {
                surface.listen(range)?;
            } else {
                warn!(field = %self.schema.name, "surface has no range control, dropping slider");
                surface.remove(range)?;
                rendered.range = None;
            }
        }

        self.rendered = Some(rendered);
        Ok(())
    }

    fn owns(&self, control: NodeId) -> bool {
        self.rendered
            .is_some_and(|r| r.input == control || r.range == Some(control))
    }

    fn handle_change(
        &mut self,
        surface: &mut dyn FormSurface,
        event: ChangeEvent,
    ) -> Result<ChangeOutcome, WidgetError> {
        let rendered = self.rendered()?;
        if event.control == rendered.input {
            self.on_text_change(surface)
        } else if rendered.range == Some(event.control) {
            self.on_slider_change(surface, event.control)
        } else {
            Ok(ChangeOutcome::Ignored)
        }
    }

    fn validate(
        &mut self,
        surface: &mut dyn FormSurface,
    ) -> Result<Option<serde_json::Value>, WidgetError> {
        let value = self.validate_number(surface)?;
        self.state = if self.last_error.is_some() {
            FieldState::Invalid
        } else {
            FieldState::Clean
        };
        Ok(value.map(NumberValue::to_json))
    }

    fn remove(&mut self, surface: &mut dyn FormSurface) -> Result<(), WidgetError> {
        if let Some(rendered) = self.rendered.take() {
            surface.remove(rendered.item)?;
        }
        Ok(())
    }

    fn errors(&self, surface: &dyn FormSurface) -> Vec<String> {
        self.rendered
            .map(|r| surface.error_messages(r.errors))
            .unwrap_or_default()
    }

    fn item(&self) -> Option<NodeId> {
        self.rendered.map(|r| r.item)
    }

    fn state(&self) -> FieldState {
        self.state
    }

    fn current_value(&self) -> Option<serde_json::Value> {
        self.value.map(NumberValue::to_json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::MemorySurface;
    use std::sync::{Arc, Mutex};

    type Commits = Arc<Mutex<Vec<(String, serde_json::Value)>>>;

    fn recording_setter() -> (Setter, Commits) {
        let commits: Commits = Arc::default();
        let sink = Arc::clone(&commits);
        let setter: Setter = Box::new(move |schema, value| {
            sink.lock().unwrap().push((schema.name.clone(), value));
        });
        (setter, commits)
    }

    fn render(schema: FieldSchema, params: Option<serde_json::Value>) -> (NumberField, MemorySurface, Commits) {
        let (setter, commits) = recording_setter();
        let mut field = NumberField::new(schema, params, setter, Toolkit::default());
        let mut surface = MemorySurface::new();
        let root = surface.root();
        field.append_to(&mut surface, root).unwrap();
        (field, surface, commits)
    }

    #[test]
    fn construction_has_no_side_effects() {
        let (setter, commits) = recording_setter();
        let field = NumberField::new(FieldSchema::number("n"), Some(serde_json::json!(3)), setter, Toolkit::default());
        assert_eq!(field.value(), Some(NumberValue::Integer(3)));
        assert!(field.item().is_none());
        assert!(commits.lock().unwrap().is_empty());
    }

    #[test]
    fn schema_default_fills_missing_param() {
        let mut schema = FieldSchema::number("n");
        schema.default = Some(serde_json::json!(4));
        let (field, surface, _) = render(schema, None);
        assert_eq!(surface.value(field.text_input().unwrap()).as_deref(), Some("4"));
    }

    #[test]
    fn text_only_without_full_slider_constraints() {
        let (field, surface, _) = render(FieldSchema::number("n").with_bounds(0.0, 5.0), None);
        assert!(field.slider().is_none());
        assert_eq!(surface.control_type(field.text_input().unwrap()).as_deref(), Some("text"));
    }

    #[test]
    fn slider_precedes_text_input() {
        let schema = FieldSchema::number("n").with_bounds(0.0, 10.0).with_step(2.0);
        let (field, surface, _) = render(schema, Some(serde_json::json!(4)));
        let range = field.slider().unwrap();
        let input = field.text_input().unwrap();
        assert!(range < input);
        assert_eq!(surface.control_type(range).as_deref(), Some("range"));
        assert_eq!(surface.value(range).as_deref(), Some("4"));
        assert_eq!(surface.attribute(range, "step"), Some("2"));
    }

    #[test]
    fn validate_without_render_fails() {
        let (setter, _) = recording_setter();
        let mut field = NumberField::new(FieldSchema::number("n"), None, setter, Toolkit::default());
        let mut surface = MemorySurface::new();
        assert!(matches!(
            field.validate_number(&mut surface),
            Err(WidgetError::NotRendered(name)) if name == "n"
        ));
    }

    #[test]
    fn ignores_foreign_controls() {
        let (mut field, mut surface, commits) = render(FieldSchema::number("n"), None);
        let outcome = field
            .handle_change(&mut surface, ChangeEvent { control: NodeId(999) })
            .unwrap();
        assert_eq!(outcome, ChangeOutcome::Ignored);
        assert!(commits.lock().unwrap().is_empty());
    }

    #[test]
    fn zero_is_committed() {
        let (mut field, mut surface, commits) = render(FieldSchema::number("n"), None);
        let input = field.text_input().unwrap();
        surface.set_value(input, "0").unwrap();
        let outcome = field.handle_change(&mut surface, ChangeEvent { control: input }).unwrap();
        assert_eq!(outcome, ChangeOutcome::Committed(serde_json::json!(0)));
        assert_eq!(commits.lock().unwrap().len(), 1);
    }
}
