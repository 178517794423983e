//! Markup model — element trees built by widgets and attached to a surface.
//!
//! Widgets never build markup by hand; they go through a [`MarkupBuilder`]
//! so a host can restyle every field in one place. [`DefaultMarkup`]
//! produces the standard layout:
//!
//! ```text
//! div.field.<type>
//! ├── label
//! │   ├── span.label        (label text)
//! │   ├── input[type=range] (only with min + max + step)
//! │   └── input[type=text]
//! ├── div.description       (optional)
//! └── div.errors
//! ```

use std::fmt::Write as _;

use crate::schema::FieldSchema;

/// What an element is. Surfaces use this to find controls and regions.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    /// Surface root; never produced by a builder.
    Root,
    /// Outer field container, classified by the widget type tag.
    Item { type_tag: String },
    Label,
    /// Static text (label caption, description).
    Text { class: String, text: String },
    /// An input control. `input_type` is the HTML-style type (`text`, `range`).
    Input { input_type: String },
    /// Region that collects error messages.
    ErrorList,
    Error { message: String },
}

/// A markup node with attributes and children.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub kind: ElementKind,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Render as HTML with escaped text and attribute values.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        let (tag, class) = match &self.kind {
            ElementKind::Root => ("div", Some("form".to_string())),
            ElementKind::Item { type_tag } => ("div", Some(format!("field {type_tag}"))),
            ElementKind::Label => ("label", None),
            ElementKind::Text { class, .. } => ("span", Some(class.clone())),
            ElementKind::Input { .. } => ("input", None),
            ElementKind::ErrorList => ("div", Some("errors".to_string())),
            ElementKind::Error { .. } => ("p", None),
        };

        out.push('<');
        out.push_str(tag);
        if let Some(class) = class {
            let _ = write!(out, " class=\"{}\"", escape(&class));
        }
        if let ElementKind::Input { input_type } = &self.kind {
            let _ = write!(out, " type=\"{}\"", escape(input_type));
        }
        for (name, value) in &self.attributes {
            let _ = write!(out, " {}=\"{}\"", name, escape(value));
        }

        if matches!(self.kind, ElementKind::Input { .. }) {
            out.push_str("/>");
            return;
        }
        out.push('>');

        match &self.kind {
            ElementKind::Text { text, .. } => out.push_str(&escape(text)),
            ElementKind::Error { message } => out.push_str(&escape(message)),
            _ => {}
        }
        for child in &self.children {
            child.write_html(out);
        }
        let _ = write!(out, "</{tag}>");
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Builds the markup pieces every field widget is assembled from.
pub trait MarkupBuilder: Send + Sync {
    /// A text input, pre-filled with `value`.
    fn create_text(&self, value: Option<&str>, max_length: usize) -> Element;

    /// A range slider with the given bounds.
    fn create_range(&self, min: f64, max: f64, step: f64, value: Option<&str>) -> Element;

    /// Wrap controls with the field's label.
    fn create_label(&self, schema: &FieldSchema, inner: Vec<Element>) -> Element;

    /// The outer field container, including its empty error region.
    fn create_item(&self, schema: &FieldSchema, type_tag: &str, label: Element) -> Element;

    /// A single error message.
    fn create_error(&self, message: &str) -> Element;
}

/// Standard field layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultMarkup;

impl MarkupBuilder for DefaultMarkup {
    fn create_text(&self, value: Option<&str>, max_length: usize) -> Element {
        let mut input = Element::new(ElementKind::Input {
            input_type: "text".into(),
        })
        .with_attr("maxlength", max_length.to_string());
        if let Some(value) = value {
            input = input.with_attr("value", value);
        }
        input
    }

    fn create_range(&self, min: f64, max: f64, step: f64, value: Option<&str>) -> Element {
        let mut input = Element::new(ElementKind::Input {
            input_type: "range".into(),
        })
        .with_attr("min", min.to_string())
        .with_attr("max", max.to_string())
        .with_attr("step", step.to_string());
        if let Some(value) = value {
            input = input.with_attr("value", value);
        }
        input
    }

    fn create_label(&self, schema: &FieldSchema, inner: Vec<Element>) -> Element {
        Element::new(ElementKind::Label)
            .with_child(Element::new(ElementKind::Text {
                class: "label".into(),
                text: schema.display_label().to_string(),
            }))
            .with_children(inner)
    }

    fn create_item(&self, schema: &FieldSchema, type_tag: &str, label: Element) -> Element {
        let mut item = Element::new(ElementKind::Item {
            type_tag: type_tag.to_string(),
        })
        .with_child(label);
        if let Some(description) = &schema.description {
            item = item.with_child(Element::new(ElementKind::Text {
                class: "description".into(),
                text: description.clone(),
            }));
        }
        item.with_child(Element::new(ElementKind::ErrorList))
    }

    fn create_error(&self, message: &str) -> Element {
        Element::new(ElementKind::Error {
            message: message.to_string(),
        })
    }
}
