//! Application state — single-owner, main-thread only.
//!
//! The form and its surface live here. Key handlers edit control values on
//! the surface and fire change events; `AppState::dispatch` routes them and
//! records the outcomes.

use std::collections::VecDeque;
use std::path::PathBuf;

use chrono::NaiveDateTime;

use formkit_core::{
    ChangeOutcome, Form, FormConfig, FormError, FormSurface, MemorySurface, NodeId,
    WidgetRegistry,
};

const LOG_CAPACITY: usize = 50;

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// What kind of control has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    Text,
    Slider,
}

/// A focusable control on the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct FocusTarget {
    pub field: String,
    pub control: NodeId,
    pub kind: ControlKind,
}

/// One routed change, for the commit log.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: NaiveDateTime,
    pub field: String,
    pub outcome: ChangeOutcome,
}

pub struct AppState {
    pub form: Form,
    pub surface: MemorySurface,
    pub focus: usize,
    pub running: bool,
    pub status_message: Option<(String, StatusLevel)>,
    pub log: VecDeque<LogEntry>,
    pub state_path: Option<PathBuf>,
}

impl AppState {
    /// Build the form from `config` and mount it on a fresh surface.
    pub fn new(config: &FormConfig, state_path: Option<PathBuf>) -> Result<Self, FormError> {
        let mut form = Form::build(config, &WidgetRegistry::with_defaults())?;
        let mut surface = MemorySurface::new();
        let root = surface.root();
        form.mount(&mut surface, root)?;
        Ok(Self {
            form,
            surface,
            focus: 0,
            running: true,
            status_message: None,
            log: VecDeque::new(),
            state_path,
        })
    }

    /// Every focusable control, in document order.
    pub fn focus_targets(&self) -> Vec<FocusTarget> {
        let mut targets = Vec::new();
        for widget in self.form.widgets() {
            let Some(item) = widget.item() else { continue };
            for node in self.surface.descendants(item) {
                let kind = match self.surface.control_type(node).as_deref() {
                    Some("range") => ControlKind::Slider,
                    Some(_) => ControlKind::Text,
                    None => continue,
                };
                targets.push(FocusTarget {
                    field: widget.field().name.clone(),
                    control: node,
                    kind,
                });
            }
        }
        targets
    }

    pub fn focused(&self) -> Option<FocusTarget> {
        self.focus_targets().into_iter().nth(self.focus)
    }

    pub fn focus_next(&mut self) {
        let count = self.focus_targets().len();
        if count > 0 {
            self.focus = (self.focus + 1) % count;
        }
    }

    pub fn focus_prev(&mut self) {
        let count = self.focus_targets().len();
        if count > 0 {
            self.focus = (self.focus + count - 1) % count;
        }
    }

    /// Route queued change events and log what happened.
    pub fn dispatch(&mut self) {
        match self.form.dispatch(&mut self.surface) {
            Ok(dispatched) => {
                for d in dispatched {
                    match &d.outcome {
                        ChangeOutcome::Committed(value) => {
                            self.set_status(format!("{} = {value}", d.field));
                        }
                        ChangeOutcome::Cleared => self.set_warning(format!("{} cleared", d.field)),
                        ChangeOutcome::Rejected(message) => self.set_error(message.clone()),
                        ChangeOutcome::Ignored => {}
                    }
                    self.push_log(d.field, d.outcome);
                }
            }
            Err(err) => self.set_error(err.to_string()),
        }
    }

    fn push_log(&mut self, field: String, outcome: ChangeOutcome) {
        self.log.push_front(LogEntry {
            timestamp: chrono::Local::now().naive_local(),
            field,
            outcome,
        });
        if self.log.len() > LOG_CAPACITY {
            self.log.pop_back();
        }
    }

    /// Set an info status message.
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    /// Set a warning status message.
    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Error));
    }
}
