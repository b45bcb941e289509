//! In-memory render host.
//!
//! Keeps the rendered tree as plain data: tags, attributes, classes,
//! children, display state and event listeners. Used by the test suite and
//! the headless CLI driver; a real presentation layer implements
//! [`RenderHost`] against its own widget toolkit instead.

use std::collections::BTreeMap;

use super::{BindingId, EventKind, NodeId, RenderHost, UiEvent};
use crate::session::FormSession;

/// One element in the in-memory tree.
#[derive(Debug, Clone, Default)]
pub struct ElementData {
    pub tag: String,
    pub text: String,
    pub attrs: BTreeMap<String, String>,
    pub classes: Vec<String>,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
    /// Display state as last written by the engine.
    pub visible: bool,
    pub listeners: Vec<(EventKind, BindingId)>,
    pub is_text: bool,
}

/// A [`RenderHost`] backed by an element arena.
#[derive(Debug)]
pub struct MemoryHost {
    nodes: Vec<ElementData>,
    mount: NodeId,
    notices: Vec<String>,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHost {
    pub fn new() -> Self {
        let mut host = Self {
            nodes: Vec::new(),
            mount: NodeId(0),
            notices: Vec::new(),
        };
        host.mount = host.alloc("div", false);
        host
    }

    /// The mount point the form renders into.
    pub fn mount(&self) -> NodeId {
        self.mount
    }

    pub fn node(&self, id: NodeId) -> &ElementData {
        &self.nodes[id.0 as usize]
    }

    /// First element under the mount with `attrs[name] == value`, in
    /// document order. Detached elements are not searched.
    pub fn find_by_attr(&self, name: &str, value: &str) -> Option<NodeId> {
        self.walk(self.mount)
            .into_iter()
            .find(|id| self.node(*id).attrs.get(name).map(String::as_str) == Some(value))
    }

    /// Every element under `from` in document order, `from` included.
    pub fn walk(&self, from: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.node(id).children.iter().rev().copied());
        }
        out
    }

    /// Concatenated text of the subtree rooted at `id`.
    pub fn text_content(&self, id: NodeId) -> String {
        self.walk(id)
            .into_iter()
            .map(|node| self.node(node).text.clone())
            .collect()
    }

    /// Whether `id` and all its ancestors are displayed.
    pub fn effectively_visible(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            let data = self.node(node);
            if !data.visible {
                return false;
            }
            current = data.parent;
        }
        true
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.node(id).classes.iter().any(|c| c == class)
    }

    /// Bindings subscribed on `node` for events of `kind`.
    pub fn bindings_for(&self, node: NodeId, kind: EventKind) -> Vec<BindingId> {
        self.node(node)
            .listeners
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, binding)| *binding)
            .collect()
    }

    /// Notices presented so far; draining.
    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }

    pub fn notices(&self) -> &[String] {
        &self.notices
    }

    fn alloc(&mut self, tag: &str, is_text: bool) -> NodeId {
        let id = NodeId(self.nodes.len() as u64);
        self.nodes.push(ElementData {
            tag: tag.to_string(),
            visible: true,
            is_text,
            ..ElementData::default()
        });
        id
    }

    fn node_mut(&mut self, id: NodeId) -> &mut ElementData {
        &mut self.nodes[id.0 as usize]
    }
}

impl RenderHost for MemoryHost {
    fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(tag, false)
    }

    fn create_text(&mut self, text: &str) -> NodeId {
        let id = self.alloc("#text", true);
        self.node_mut(id).text = text.to_string();
        id
    }

    fn append(&mut self, parent: NodeId, child: NodeId) {
        self.node_mut(parent).children.push(child);
        self.node_mut(child).parent = Some(parent);
    }

    fn clear_children(&mut self, parent: NodeId) {
        let children = std::mem::take(&mut self.node_mut(parent).children);
        for child in children {
            self.node_mut(child).parent = None;
        }
    }

    fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        self.node_mut(node)
            .attrs
            .insert(name.to_string(), value.to_string());
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        self.node_mut(node).text = text.to_string();
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        let data = self.node_mut(node);
        if !data.classes.iter().any(|c| c == class) {
            data.classes.push(class.to_string());
        }
    }

    fn toggle_class(&mut self, node: NodeId, class: &str) {
        let data = self.node_mut(node);
        if let Some(position) = data.classes.iter().position(|c| c == class) {
            data.classes.remove(position);
        } else {
            data.classes.push(class.to_string());
        }
    }

    fn set_display(&mut self, node: NodeId, visible: bool) {
        self.node_mut(node).visible = visible;
    }

    fn listen(&mut self, node: NodeId, kind: EventKind, binding: BindingId) {
        self.node_mut(node).listeners.push((kind, binding));
    }

    fn notify(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }
}

/// Deliver a user event on `node` to every binding subscribed for its kind,
/// the way a real host dispatches DOM events into the session.
pub fn dispatch(host: &mut MemoryHost, session: &mut FormSession, node: NodeId, event: UiEvent) {
    for binding in host.bindings_for(node, event.kind()) {
        session.handle_event(host, binding, &event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_building_and_walk() {
        let mut host = MemoryHost::new();
        let mount = host.mount();
        let section = host.create_element("section");
        let text = host.create_text("hello");
        host.append(mount, section);
        host.append(section, text);
        assert_eq!(host.walk(mount).len(), 3);
        assert_eq!(host.text_content(mount), "hello");
    }

    #[test]
    fn test_find_by_attr_ignores_detached_nodes() {
        let mut host = MemoryHost::new();
        let mount = host.mount();
        let attached = host.create_element("div");
        host.set_attr(attached, "data-path", "a");
        host.append(mount, attached);
        let detached = host.create_element("div");
        host.set_attr(detached, "data-path", "b");
        assert_eq!(host.find_by_attr("data-path", "a"), Some(attached));
        assert_eq!(host.find_by_attr("data-path", "b"), None);
    }

    #[test]
    fn test_effective_visibility_follows_ancestors() {
        let mut host = MemoryHost::new();
        let mount = host.mount();
        let outer = host.create_element("section");
        let inner = host.create_element("div");
        host.append(mount, outer);
        host.append(outer, inner);
        assert!(host.effectively_visible(inner));
        host.set_display(outer, false);
        assert!(!host.effectively_visible(inner));
        assert!(host.node(inner).visible);
    }

    #[test]
    fn test_toggle_class() {
        let mut host = MemoryHost::new();
        let node = host.create_element("section");
        host.toggle_class(node, "collapsed");
        assert!(host.has_class(node, "collapsed"));
        host.toggle_class(node, "collapsed");
        assert!(!host.has_class(node, "collapsed"));
    }

    #[test]
    fn test_clear_children_detaches() {
        let mut host = MemoryHost::new();
        let mount = host.mount();
        let child = host.create_element("div");
        host.append(mount, child);
        host.clear_children(mount);
        assert!(host.node(mount).children.is_empty());
        assert!(host.node(child).parent.is_none());
    }
}
