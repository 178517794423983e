//! Integration tests for the number field widget on an in-memory surface.
//!
//! Tests:
//! 1. Validation outcomes: each rejection renders exactly one message and
//!    leaves the committed value alone.
//! 2. Slider/text synchronization in both directions.
//! 3. Render and teardown: markup layout, slider fallback, removal.

use std::sync::{Arc, Mutex};

use formkit_core::{
    ChangeEvent, ChangeOutcome, Decimals, ElementKind, FieldSchema, FieldState, FormSurface,
    MemorySurface, NumberField, NumberValue, Setter, Toolkit, ValidationError, Widget,
};
use serde_json::{json, Value};

// ──────────────────────────────────────────────
// Helpers
// ──────────────────────────────────────────────

type Commits = Arc<Mutex<Vec<Value>>>;

struct Harness {
    field: NumberField,
    surface: MemorySurface,
    commits: Commits,
}

impl Harness {
    fn new(schema: FieldSchema) -> Self {
        Self::with_surface(schema, None, MemorySurface::new())
    }

    fn with_initial(schema: FieldSchema, initial: Value) -> Self {
        Self::with_surface(schema, Some(initial), MemorySurface::new())
    }

    fn with_surface(schema: FieldSchema, initial: Option<Value>, mut surface: MemorySurface) -> Self {
        let commits: Commits = Arc::default();
        let sink = Arc::clone(&commits);
        let setter: Setter = Box::new(move |_, value| sink.lock().unwrap().push(value));
        let mut field = NumberField::new(schema, initial, setter, Toolkit::default());
        let root = surface.root();
        field.append_to(&mut surface, root).unwrap();
        Self {
            field,
            surface,
            commits,
        }
    }

    /// Type into the text input and deliver the resulting change event.
    fn type_text(&mut self, text: &str) -> ChangeOutcome {
        let input = self.field.text_input().unwrap();
        assert!(self.surface.input(input, text).unwrap());
        self.deliver()
    }

    /// Move the slider and deliver the resulting change event.
    fn slide(&mut self, value: &str) -> ChangeOutcome {
        let range = self.field.slider().unwrap();
        assert!(self.surface.input(range, value).unwrap());
        self.deliver()
    }

    fn deliver(&mut self) -> ChangeOutcome {
        let events = self.surface.drain_events();
        assert_eq!(events.len(), 1);
        self.field.handle_change(&mut self.surface, events[0]).unwrap()
    }

    /// Fire a change on the text input without editing it.
    fn deliver_text_unchanged(&mut self) -> ChangeOutcome {
        let input = self.field.text_input().unwrap();
        assert!(self.surface.emit_change(input));
        self.deliver()
    }

    fn errors(&self) -> Vec<String> {
        self.field.errors(&self.surface)
    }

    fn commits(&self) -> Vec<Value> {
        self.commits.lock().unwrap().clone()
    }

    fn text(&self) -> String {
        self.surface.value(self.field.text_input().unwrap()).unwrap()
    }

    fn slider_value(&self) -> String {
        self.surface.value(self.field.slider().unwrap()).unwrap()
    }
}

fn stepped() -> FieldSchema {
    FieldSchema::number("n").with_bounds(0.0, 10.0).with_step(2.0)
}

// ──────────────────────────────────────────────
// Validation outcomes
// ──────────────────────────────────────────────

#[test]
fn valid_value_is_committed_without_errors() {
    let mut h = Harness::new(FieldSchema::number("n").with_bounds(0.0, 100.0));
    assert_eq!(h.type_text("42"), ChangeOutcome::Committed(json!(42)));
    assert!(h.errors().is_empty());
    assert_eq!(h.commits(), vec![json!(42)]);
    assert_eq!(h.field.value(), Some(NumberValue::Integer(42)));
    assert_eq!(h.field.state(), FieldState::Clean);
}

#[test]
fn empty_required_reports_missing_value() {
    let mut h = Harness::with_initial(FieldSchema::number("n"), json!(5));
    let outcome = h.type_text("   ");
    assert_eq!(
        outcome,
        ChangeOutcome::Rejected("The number field is required and must have a value.".into())
    );
    assert_eq!(h.field.last_error(), Some(&ValidationError::MissingRequiredValue));
    assert_eq!(h.field.value(), Some(NumberValue::Integer(5)));
    assert!(h.commits().is_empty());
}

#[test]
fn empty_optional_clears_without_error() {
    let mut h = Harness::with_initial(FieldSchema::number("n").optional(), json!(5));
    assert_eq!(h.type_text(""), ChangeOutcome::Cleared);
    assert!(h.errors().is_empty());
    assert_eq!(h.field.value(), None);
    assert_eq!(h.commits(), vec![Value::Null]);
}

#[test]
fn fraction_in_integer_mode_is_not_a_number() {
    let mut h = Harness::new(FieldSchema::number("n"));
    h.type_text("12.5");
    assert_eq!(h.field.last_error(), Some(&ValidationError::NotANumber));
    assert_eq!(h.errors(), vec!["The number field value can only contain numbers.".to_string()]);
}

#[test]
fn integer_in_decimal_mode_is_not_a_number() {
    let mut h = Harness::new(FieldSchema::number("n").with_decimals(Decimals::Count(2)));
    h.type_text("12");
    assert_eq!(h.field.last_error(), Some(&ValidationError::NotANumber));
}

#[test]
fn decimal_with_comma_commits_float() {
    let mut h = Harness::new(FieldSchema::number("n").with_decimals(Decimals::Flag(true)));
    assert_eq!(h.type_text("2,5"), ChangeOutcome::Committed(json!(2.5)));
}

#[test]
fn above_max_and_below_min() {
    let mut h = Harness::new(FieldSchema::number("n").with_max(10.0));
    h.type_text("15");
    assert_eq!(h.field.last_error(), Some(&ValidationError::ExceedsMaximum { max: 10.0 }));
    assert_eq!(
        h.errors(),
        vec!["The number field value exceeds the maximum of 10.".to_string()]
    );

    let mut h = Harness::new(FieldSchema::number("n").with_min(0.0));
    h.type_text("-5");
    assert_eq!(h.field.last_error(), Some(&ValidationError::ExceedsMinimum { min: 0.0 }));
}

#[test]
fn off_step_rejected_on_step_accepted() {
    let mut h = Harness::new(stepped());
    h.type_text("7");
    assert_eq!(h.field.last_error(), Some(&ValidationError::NotOnStep { step: 2.0 }));
    assert_eq!(h.field.state(), FieldState::Invalid);

    assert_eq!(h.type_text("8"), ChangeOutcome::Committed(json!(8)));
    assert_eq!(h.field.state(), FieldState::Clean);
}

#[test]
fn overflowing_decimal_renders_error_and_stays_invalid() {
    let schema = FieldSchema::number("n").with_decimals(Decimals::Flag(true));
    let mut h = Harness::with_initial(schema, json!(1.5));
    let huge = format!("{}.5", "9".repeat(400));

    let outcome = h.type_text(&huge);
    let message = "The number field value can only contain numbers.".to_string();
    assert_eq!(outcome, ChangeOutcome::Rejected(message.clone()));
    assert_eq!(h.errors(), vec![message]);
    assert!(h.surface.is_invalid(h.field.text_input().unwrap()));
    assert_eq!(h.field.state(), FieldState::Invalid);
    assert!(h.commits().is_empty());

    // Re-validating outside a change event reaches the same verdict.
    assert_eq!(h.field.validate(&mut h.surface).unwrap(), None);
    assert_eq!(h.errors().len(), 1);
    assert_eq!(h.field.state(), FieldState::Invalid);
}

#[test]
fn integer_longer_than_max_length_overflowing_i64_is_not_a_number() {
    let mut h = Harness::new(FieldSchema::number("n"));
    h.type_text("99999999999999999999");
    assert_eq!(h.field.last_error(), Some(&ValidationError::NotANumber));
    assert_eq!(h.errors().len(), 1);
}

#[test]
fn exactly_one_message_per_rejection() {
    // "abc" fails the format check; later checks must not pile on.
    let mut h = Harness::new(stepped());
    h.type_text("abc");
    assert_eq!(h.errors().len(), 1);
    h.type_text("11");
    assert_eq!(h.errors().len(), 1);
}

#[test]
fn invalid_text_stays_visible_and_input_is_flagged() {
    let mut h = Harness::with_initial(stepped(), json!(4));
    h.type_text("7");
    assert_eq!(h.text(), "7");
    assert!(h.surface.is_invalid(h.field.text_input().unwrap()));
    assert_eq!(h.field.value(), Some(NumberValue::Integer(4)));
    assert_eq!(h.slider_value(), "4");
}

#[test]
fn correction_clears_stale_error() {
    let mut h = Harness::new(stepped());
    h.type_text("7");
    assert_eq!(h.errors().len(), 1);

    h.type_text("6");
    assert!(h.errors().is_empty());
    assert!(!h.surface.is_invalid(h.field.text_input().unwrap()));
    assert_eq!(h.commits(), vec![json!(6)]);
}

#[test]
fn whole_decimal_initial_value_keeps_its_fraction() {
    let schema = FieldSchema::number("n").with_decimals(Decimals::Flag(true));
    let mut h = Harness::with_initial(schema, json!(2.0));
    assert_eq!(h.text(), "2.0");
    assert_eq!(h.field.validate(&mut h.surface).unwrap(), Some(json!(2.0)));
    assert!(h.errors().is_empty());
}

#[test]
fn initial_value_follows_field_mode() {
    // An integer seed on a decimal field, and a whole decimal on an integer field.
    let dec = FieldSchema::number("n").with_decimals(Decimals::Flag(true));
    let mut h = Harness::with_initial(dec, json!(3));
    assert_eq!(h.text(), "3.0");
    assert!(h.field.validate(&mut h.surface).unwrap().is_some());

    let mut h = Harness::with_initial(FieldSchema::number("n"), json!(4.0));
    assert_eq!(h.text(), "4");
    assert_eq!(h.field.validate(&mut h.surface).unwrap(), Some(json!(4)));
}

#[test]
fn committed_decimal_survives_remount() {
    let schema = FieldSchema::number("n").with_decimals(Decimals::Flag(true));
    let mut h = Harness::new(schema.clone());
    assert_eq!(h.type_text("2.0"), ChangeOutcome::Committed(json!(2.0)));
    let stored = h.commits().pop().unwrap();

    let mut again = Harness::with_initial(schema, stored);
    assert_eq!(again.text(), "2.0");
    again.deliver_text_unchanged();
    assert!(again.errors().is_empty());
    assert_eq!(again.commits(), vec![json!(2.0)]);
}

// ──────────────────────────────────────────────
// Slider / text synchronization
// ──────────────────────────────────────────────

#[test]
fn slider_change_flows_into_text_and_commits() {
    let mut h = Harness::new(stepped());
    assert_eq!(h.slide("6"), ChangeOutcome::Committed(json!(6)));
    assert_eq!(h.text(), "6");
    assert_eq!(h.commits(), vec![json!(6)]);
}

#[test]
fn programmatic_slider_value_goes_through_text_validation() {
    let mut h = Harness::new(stepped());
    h.slide("5");
    assert_eq!(h.text(), "5");
    assert_eq!(h.field.last_error(), Some(&ValidationError::NotOnStep { step: 2.0 }));
    assert!(h.commits().is_empty());
}

#[test]
fn text_commit_mirrors_into_slider() {
    let mut h = Harness::new(stepped());
    h.type_text("10");
    assert_eq!(h.slider_value(), "10");
}

// ──────────────────────────────────────────────
// Render and teardown
// ──────────────────────────────────────────────

#[test]
fn layout_item_label_errors() {
    let h = Harness::with_initial(stepped(), json!(2));
    let item = h.field.item().unwrap();
    assert_eq!(
        h.surface.kind(item),
        Some(ElementKind::Item {
            type_tag: "number".into()
        })
    );
    let children = h.surface.children(item);
    assert!(matches!(h.surface.kind(children[0]), Some(ElementKind::Label)));
    assert_eq!(Some(*children.last().unwrap()), h.field.error_region());
    assert_eq!(h.text(), "2");
}

#[test]
fn non_interactive_slider_is_discarded() {
    let mut h = Harness::with_surface(stepped(), None, MemorySurface::without_range_support());
    assert!(h.field.slider().is_none());
    let label = h.surface.parent(h.field.text_input().unwrap()).unwrap();
    let inputs = h
        .surface
        .children(label)
        .into_iter()
        .filter(|c| matches!(h.surface.kind(*c), Some(ElementKind::Input { .. })))
        .count();
    assert_eq!(inputs, 1);
    assert_eq!(h.type_text("4"), ChangeOutcome::Committed(json!(4)));
}

#[test]
fn remove_leaves_no_markup() {
    let mut h = Harness::new(stepped());
    let before = h.surface.node_count();
    assert!(before > 1);

    h.field.remove(&mut h.surface).unwrap();
    assert!(h.surface.children(h.surface.root()).is_empty());
    assert_eq!(h.surface.node_count(), 1);
    assert!(h.field.item().is_none());
}

#[test]
fn events_after_remove_are_not_routed() {
    let mut h = Harness::new(FieldSchema::number("n"));
    let input = h.field.text_input().unwrap();
    h.field.remove(&mut h.surface).unwrap();
    assert!(!h.surface.emit_change(input));
    assert!(!h.field.owns(input));
    assert!(h
        .field
        .handle_change(&mut h.surface, ChangeEvent { control: input })
        .is_err());
}
