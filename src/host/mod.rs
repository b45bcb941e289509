//! Rendering-target abstraction.
//!
//! The engine treats presentation as an external collaborator: a host that
//! can create elements, set attributes, and subscribe to events. The engine
//! writes into the host and never reads back; the authoritative form state
//! lives in the field registry. Event subscriptions are reified as
//! [`BindingId`]s: the host delivers `(binding, event)` pairs to
//! [`FormSession::handle_event`](crate::session::FormSession::handle_event)
//! and the engine decides what they mean.

/// In-memory host for tests and headless driving.
pub mod memory;

/// Opaque handle to a host element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u64);

/// Handle to an engine-side event binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindingId(pub(crate) u32);

/// Event classes the engine subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Keydown,
    Change,
}

/// A user interaction delivered by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// Primary pointer activation.
    Click,
    /// Key press; carries the key name (`"Enter"`, `" "`, ...).
    Key(String),
    /// Value change; carries the control's new value.
    Change(String),
}

impl UiEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            UiEvent::Click => EventKind::Click,
            UiEvent::Key(_) => EventKind::Keydown,
            UiEvent::Change(_) => EventKind::Change,
        }
    }
}

/// Operations the engine needs from a presentation layer.
///
/// Implementations own no authoritative form state. Display, classes and
/// attributes written through here are write-only from the engine's point
/// of view.
pub trait RenderHost {
    /// Create a detached element of the given tag.
    fn create_element(&mut self, tag: &str) -> NodeId;

    /// Create a detached plain text node.
    fn create_text(&mut self, text: &str) -> NodeId;

    /// Append `child` as the last child of `parent`.
    fn append(&mut self, parent: NodeId, child: NodeId);

    /// Detach every child of `parent`.
    fn clear_children(&mut self, parent: NodeId);

    fn set_attr(&mut self, node: NodeId, name: &str, value: &str);

    /// Replace the element's text content.
    fn set_text(&mut self, node: NodeId, text: &str);

    fn add_class(&mut self, node: NodeId, class: &str);

    /// Flip presence of a class (collapse state and the like).
    fn toggle_class(&mut self, node: NodeId, class: &str);

    /// Show or hide the element subtree.
    fn set_display(&mut self, node: NodeId, visible: bool);

    /// Subscribe `binding` to events of `kind` on `node`. The host is
    /// expected to deliver matching events back to the session.
    fn listen(&mut self, node: NodeId, kind: EventKind, binding: BindingId);

    /// Present a blocking user notice (aggregate save/load outcomes).
    fn notify(&mut self, message: &str);
}
