//! Form surface — where widgets attach markup and receive change events.
//!
//! The surface owns the attached element tree and the control values. A
//! user edit is `set_value` followed by `emit_change`; the change is queued
//! only when some widget has called `listen` on that control. The host
//! drains the queue and routes each event to its widget.

use std::collections::VecDeque;
use std::fmt;

use crate::markup::{Element, ElementKind};

/// Handle to a node attached to a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A control's value changed through user interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent {
    pub control: NodeId,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SurfaceError {
    #[error("node {0} is not attached")]
    UnknownNode(NodeId),
    #[error("node {0} is not a control")]
    NotAControl(NodeId),
}

/// Minimal rendering surface a widget needs.
pub trait FormSurface {
    /// The node forms attach their items under.
    fn root(&self) -> NodeId;

    /// Attach `element` (and its subtree) as the last child of `parent`.
    fn attach(&mut self, parent: NodeId, element: Element) -> Result<NodeId, SurfaceError>;

    /// Detach and drop `node` with its whole subtree.
    fn remove(&mut self, node: NodeId) -> Result<(), SurfaceError>;

    fn contains(&self, node: NodeId) -> bool;

    fn children(&self, node: NodeId) -> Vec<NodeId>;

    fn kind(&self, node: NodeId) -> Option<ElementKind>;

    /// The control type the surface actually rendered. May differ from the
    /// requested type when the surface lacks support (e.g. `range` → `text`).
    fn control_type(&self, control: NodeId) -> Option<String>;

    fn value(&self, control: NodeId) -> Option<String>;

    /// Programmatic update. Never produces a change event.
    fn set_value(&mut self, control: NodeId, value: &str) -> Result<(), SurfaceError>;

    /// Route future changes of `control` as events.
    fn listen(&mut self, control: NodeId) -> Result<(), SurfaceError>;

    /// User-driven change. Returns whether an event was queued.
    fn emit_change(&mut self, control: NodeId) -> bool;

    fn drain_events(&mut self) -> Vec<ChangeEvent>;

    /// Flag a control as holding an invalid value (error styling).
    fn set_invalid(&mut self, control: NodeId, invalid: bool) -> Result<(), SurfaceError>;

    fn is_invalid(&self, control: NodeId) -> bool;

    /// Messages of every error element under `region`, in order.
    fn error_messages(&self, region: NodeId) -> Vec<String> {
        self.children(region)
            .into_iter()
            .filter_map(|child| match self.kind(child) {
                Some(ElementKind::Error { message }) => Some(message),
                _ => None,
            })
            .collect()
    }

    /// Remove every child of an error region.
    fn clear_errors(&mut self, region: NodeId) -> Result<(), SurfaceError> {
        for child in self.children(region) {
            self.remove(child)?;
        }
        Ok(())
    }
}

/// Finalize error display for a validated control.
///
/// When `region` holds any error the control is flagged invalid and `None`
/// is returned; otherwise the flag is cleared and `value` passes through.
pub fn check_errors<T>(
    surface: &mut dyn FormSurface,
    region: NodeId,
    control: NodeId,
    value: T,
) -> Result<Option<T>, SurfaceError> {
    let has_errors = !surface.children(region).is_empty();
    surface.set_invalid(control, has_errors)?;
    Ok(if has_errors { None } else { Some(value) })
}

// ─── In-memory surface ───────────────────────────────────────────────

#[derive(Debug, Clone)]
struct Node {
    kind: ElementKind,
    attributes: Vec<(String, String)>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    value: String,
    listened: bool,
    invalid: bool,
}

/// Arena-backed surface with no rendering environment.
///
/// Used by tests and as the model behind the terminal front-end.
#[derive(Debug, Clone)]
pub struct MemorySurface {
    nodes: Vec<Option<Node>>,
    /// Slots of removed nodes, reused by later attaches.
    free: Vec<usize>,
    root: NodeId,
    events: VecDeque<ChangeEvent>,
    supports_range: bool,
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySurface {
    pub fn new() -> Self {
        let root = Node {
            kind: ElementKind::Root,
            attributes: Vec::new(),
            parent: None,
            children: Vec::new(),
            value: String::new(),
            listened: false,
            invalid: false,
        };
        Self {
            nodes: vec![Some(root)],
            free: Vec::new(),
            root: NodeId(0),
            events: VecDeque::new(),
            supports_range: true,
        }
    }

    /// A surface that renders `range` inputs as plain text inputs.
    pub fn without_range_support() -> Self {
        Self {
            supports_range: false,
            ..Self::new()
        }
    }

    /// Simulate a user typing `text` into a control and committing it.
    pub fn input(&mut self, control: NodeId, text: &str) -> Result<bool, SurfaceError> {
        self.set_value(control, text)?;
        Ok(self.emit_change(control))
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.node(node)?
            .attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node)?.parent
    }

    /// Number of live nodes, the root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Arena slots allocated so far, live or free.
    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }

    /// Live nodes under `node` in document order (pre-order, `node` excluded).
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).into_iter().rev().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).into_iter().rev());
        }
        out
    }

    /// Rebuild the element tree under `node` with live control state.
    ///
    /// Inputs carry their current value; invalid controls get
    /// `aria-invalid="true"`.
    pub fn snapshot(&self, node: NodeId) -> Option<Element> {
        let n = self.node(node)?;
        let mut attributes: Vec<(String, String)> = n
            .attributes
            .iter()
            .filter(|(k, _)| k != "value" && k != "aria-invalid")
            .cloned()
            .collect();
        if matches!(n.kind, ElementKind::Input { .. }) {
            if !n.value.is_empty() {
                attributes.push(("value".to_string(), n.value.clone()));
            }
            if n.invalid {
                attributes.push(("aria-invalid".to_string(), "true".to_string()));
            }
        }
        Some(Element {
            kind: n.kind.clone(),
            attributes,
            children: n.children.iter().filter_map(|c| self.snapshot(*c)).collect(),
        })
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, SurfaceError> {
        self.nodes
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(SurfaceError::UnknownNode(id))
    }

    fn control_mut(&mut self, id: NodeId) -> Result<&mut Node, SurfaceError> {
        let node = self.node_mut(id)?;
        if matches!(node.kind, ElementKind::Input { .. }) {
            Ok(node)
        } else {
            Err(SurfaceError::NotAControl(id))
        }
    }

    fn insert(&mut self, parent: NodeId, element: Element) -> NodeId {
        let Element {
            mut kind,
            attributes,
            children,
        } = element;

        if let ElementKind::Input { input_type } = &mut kind {
            if input_type == "range" && !self.supports_range {
                *input_type = "text".to_string();
            }
        }
        let value = attributes
            .iter()
            .find(|(k, _)| k == "value")
            .map(|(_, v)| v.clone())
            .unwrap_or_default();

        let node = Node {
            kind,
            attributes,
            parent: Some(parent),
            children: Vec::new(),
            value,
            listened: false,
            invalid: false,
        };
        let id = match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = Some(node);
                NodeId(slot)
            }
            None => {
                self.nodes.push(Some(node));
                NodeId(self.nodes.len() - 1)
            }
        };
        if let Some(Some(p)) = self.nodes.get_mut(parent.0) {
            p.children.push(id);
        }
        for child in children {
            self.insert(id, child);
        }
        id
    }
}

impl FormSurface for MemorySurface {
    fn root(&self) -> NodeId {
        self.root
    }

    fn attach(&mut self, parent: NodeId, element: Element) -> Result<NodeId, SurfaceError> {
        if !self.contains(parent) {
            return Err(SurfaceError::UnknownNode(parent));
        }
        Ok(self.insert(parent, element))
    }

    fn remove(&mut self, node: NodeId) -> Result<(), SurfaceError> {
        if node == self.root {
            // The root stays; clear it instead.
            for child in self.children(node) {
                self.remove(child)?;
            }
            return Ok(());
        }
        let parent = self.node(node).ok_or(SurfaceError::UnknownNode(node))?.parent;
        if let Some(parent) = parent {
            if let Ok(p) = self.node_mut(parent) {
                p.children.retain(|c| *c != node);
            }
        }
        let mut doomed = self.descendants(node);
        doomed.push(node);
        for id in &doomed {
            self.nodes[id.0] = None;
            self.free.push(id.0);
        }
        self.events.retain(|e| !doomed.contains(&e.control));
        Ok(())
    }

    fn contains(&self, node: NodeId) -> bool {
        self.node(node).is_some()
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.node(node).map(|n| n.children.clone()).unwrap_or_default()
    }

    fn kind(&self, node: NodeId) -> Option<ElementKind> {
        self.node(node).map(|n| n.kind.clone())
    }

    fn control_type(&self, control: NodeId) -> Option<String> {
        match &self.node(control)?.kind {
            ElementKind::Input { input_type } => Some(input_type.clone()),
            _ => None,
        }
    }

    fn value(&self, control: NodeId) -> Option<String> {
        let node = self.node(control)?;
        matches!(node.kind, ElementKind::Input { .. }).then(|| node.value.clone())
    }

    fn set_value(&mut self, control: NodeId, value: &str) -> Result<(), SurfaceError> {
        self.control_mut(control)?.value = value.to_string();
        Ok(())
    }

    fn listen(&mut self, control: NodeId) -> Result<(), SurfaceError> {
        self.control_mut(control)?.listened = true;
        Ok(())
    }

    fn emit_change(&mut self, control: NodeId) -> bool {
        let listened = self.node(control).is_some_and(|n| n.listened);
        if listened {
            self.events.push_back(ChangeEvent { control });
        }
        listened
    }

    fn drain_events(&mut self) -> Vec<ChangeEvent> {
        self.events.drain(..).collect()
    }

    fn set_invalid(&mut self, control: NodeId, invalid: bool) -> Result<(), SurfaceError> {
        self.control_mut(control)?.invalid = invalid;
        Ok(())
    }

    fn is_invalid(&self, control: NodeId) -> bool {
        self.node(control).is_some_and(|n| n.invalid)
    }
}
