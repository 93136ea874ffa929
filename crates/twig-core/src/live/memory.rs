use std::collections::BTreeMap;

use super::{Event, LiveId, LiveTree, LiveTreeError};
use crate::model::{EventHandler, PropValue, STYLE_PROP};

/// What a live node is
#[derive(Debug, Clone, PartialEq)]
pub enum LiveNodeKind {
    Element { tag: String },
    Text { content: String },
}

/// One node of a [`MemoryDom`]
#[derive(Debug, Clone)]
pub struct LiveNode {
    kind: LiveNodeKind,
    attributes: BTreeMap<String, String>,
    properties: BTreeMap<String, PropValue>,
    style_text: Option<String>,
    style: BTreeMap<String, String>,
    listeners: BTreeMap<String, Vec<EventHandler>>,
    inner_html: Option<String>,
    children: Vec<LiveId>,
    parent: Option<LiveId>,
}

impl LiveNode {
    fn new(kind: LiveNodeKind) -> Self {
        Self {
            kind,
            attributes: BTreeMap::new(),
            properties: BTreeMap::new(),
            style_text: None,
            style: BTreeMap::new(),
            listeners: BTreeMap::new(),
            inner_html: None,
            children: Vec::new(),
            parent: None,
        }
    }

    pub fn kind(&self) -> &LiveNodeKind {
        &self.kind
    }

    /// Tag name for elements, `None` for text nodes
    pub fn tag(&self) -> Option<&str> {
        match &self.kind {
            LiveNodeKind::Element { tag } => Some(tag),
            LiveNodeKind::Text { .. } => None,
        }
    }

    /// Content for text nodes, `None` for elements
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            LiveNodeKind::Text { content } => Some(content),
            LiveNodeKind::Element { .. } => None,
        }
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    pub fn properties(&self) -> &BTreeMap<String, PropValue> {
        &self.properties
    }

    pub fn style_text(&self) -> Option<&str> {
        self.style_text.as_deref()
    }

    pub fn style(&self) -> &BTreeMap<String, String> {
        &self.style
    }

    /// Number of listeners per event name
    pub fn listener_counts(&self) -> BTreeMap<String, usize> {
        self.listeners
            .iter()
            .filter(|(_, handlers)| !handlers.is_empty())
            .map(|(event, handlers)| (event.clone(), handlers.len()))
            .collect()
    }

    pub fn inner_html(&self) -> Option<&str> {
        self.inner_html.as_deref()
    }

    pub fn children(&self) -> &[LiveId] {
        &self.children
    }

    pub fn parent(&self) -> Option<LiveId> {
        self.parent
    }

    fn is_element(&self) -> bool {
        matches!(self.kind, LiveNodeKind::Element { .. })
    }
}

/// Arena-backed in-memory live tree
///
/// Detached nodes stay in the arena; removing a node from its parent only
/// unlinks it, the same way a removed DOM node lives on until nothing
/// references it.
#[derive(Debug, Clone, Default)]
pub struct MemoryDom {
    nodes: Vec<LiveNode>,
}

impl MemoryDom {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Number of nodes ever created, attached or not
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: LiveId) -> Option<&LiveNode> {
        self.nodes.get(id.index())
    }

    pub fn tag(&self, id: LiveId) -> Option<&str> {
        self.node(id).and_then(LiveNode::tag)
    }

    pub fn text(&self, id: LiveId) -> Option<&str> {
        self.node(id).and_then(LiveNode::text)
    }

    pub fn attribute(&self, id: LiveId, name: &str) -> Option<&str> {
        self.node(id)
            .and_then(|n| n.attributes.get(name))
            .map(String::as_str)
    }

    pub fn property(&self, id: LiveId, name: &str) -> Option<&PropValue> {
        self.node(id).and_then(|n| n.properties.get(name))
    }

    pub fn style_text(&self, id: LiveId) -> Option<&str> {
        self.node(id).and_then(LiveNode::style_text)
    }

    pub fn style_property(&self, id: LiveId, name: &str) -> Option<&str> {
        self.node(id)
            .and_then(|n| n.style.get(name))
            .map(String::as_str)
    }

    pub fn inner_html(&self, id: LiveId) -> Option<&str> {
        self.node(id).and_then(LiveNode::inner_html)
    }

    pub fn listener_count(&self, id: LiveId, event: &str) -> usize {
        self.node(id)
            .and_then(|n| n.listeners.get(event))
            .map_or(0, Vec::len)
    }

    /// Concatenated text content of a subtree
    pub fn text_content(&self, id: LiveId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: LiveId, out: &mut String) {
        let Some(node) = self.node(id) else {
            return;
        };
        match &node.kind {
            LiveNodeKind::Text { content } => out.push_str(content),
            LiveNodeKind::Element { .. } => {
                for child in &node.children {
                    self.collect_text(*child, out);
                }
            }
        }
    }

    /// Invoke every listener registered for `event` on `target`
    ///
    /// Returns the number of handlers called. There is no bubbling.
    pub fn dispatch(&self, target: LiveId, event: &str) -> usize {
        let handlers: Vec<EventHandler> = self
            .node(target)
            .and_then(|n| n.listeners.get(event))
            .cloned()
            .unwrap_or_default();
        let payload = Event {
            name: event.to_string(),
            target,
        };
        for handler in &handlers {
            handler.call(&payload);
        }
        handlers.len()
    }

    fn push(&mut self, node: LiveNode) -> LiveId {
        let id = LiveId::from_index(self.nodes.len());
        self.nodes.push(node);
        id
    }

    fn get_mut(&mut self, id: LiveId) -> Result<&mut LiveNode, LiveTreeError> {
        self.nodes
            .get_mut(id.index())
            .ok_or(LiveTreeError::NotFound { id })
    }

    fn element_mut(&mut self, id: LiveId, op: &str) -> Result<&mut LiveNode, LiveTreeError> {
        let node = self.get_mut(id)?;
        if !node.is_element() {
            return Err(LiveTreeError::Unsupported {
                id,
                reason: format!("{} requires an element", op),
            });
        }
        Ok(node)
    }

    fn require(&self, id: LiveId) -> Result<&LiveNode, LiveTreeError> {
        self.node(id).ok_or(LiveTreeError::NotFound { id })
    }

    fn is_ancestor_or_self(&self, candidate: LiveId, of: LiveId) -> bool {
        let mut cursor = Some(of);
        while let Some(id) = cursor {
            if id == candidate {
                return true;
            }
            cursor = self.node(id).and_then(|n| n.parent);
        }
        false
    }

    fn detach(&mut self, child: LiveId) {
        let Some(parent) = self.node(child).and_then(|n| n.parent) else {
            return;
        };
        if let Some(p) = self.nodes.get_mut(parent.index()) {
            p.children.retain(|c| *c != child);
        }
        if let Some(c) = self.nodes.get_mut(child.index()) {
            c.parent = None;
        }
    }
}

impl LiveTree for MemoryDom {
    fn contains(&self, id: LiveId) -> bool {
        id.index() < self.nodes.len()
    }

    fn parent(&self, id: LiveId) -> Option<LiveId> {
        self.node(id).and_then(|n| n.parent)
    }

    fn children(&self, id: LiveId) -> Vec<LiveId> {
        self.node(id).map(|n| n.children.clone()).unwrap_or_default()
    }

    fn create_element(&mut self, tag: &str) -> LiveId {
        self.push(LiveNode::new(LiveNodeKind::Element {
            tag: tag.to_string(),
        }))
    }

    fn create_text(&mut self, content: &str) -> LiveId {
        self.push(LiveNode::new(LiveNodeKind::Text {
            content: content.to_string(),
        }))
    }

    fn insert_before(
        &mut self,
        parent: LiveId,
        child: LiveId,
        before: Option<LiveId>,
    ) -> Result<(), LiveTreeError> {
        if !self.require(parent)?.is_element() {
            return Err(LiveTreeError::Unsupported {
                id: parent,
                reason: "text nodes cannot have children".to_string(),
            });
        }
        self.require(child)?;
        if self.is_ancestor_or_self(child, parent) {
            return Err(LiveTreeError::Cycle { parent, child });
        }
        if let Some(anchor) = before {
            if self.require(anchor)?.parent != Some(parent) {
                return Err(LiveTreeError::NotAChild {
                    parent,
                    child: anchor,
                });
            }
            if anchor == child {
                return Ok(());
            }
        }

        self.detach(child);

        let node = self.get_mut(parent)?;
        let slot = before
            .and_then(|anchor| node.children.iter().position(|c| *c == anchor))
            .unwrap_or(node.children.len());
        node.children.insert(slot, child);
        self.get_mut(child)?.parent = Some(parent);
        Ok(())
    }

    fn remove_child(&mut self, parent: LiveId, child: LiveId) -> Result<(), LiveTreeError> {
        self.require(parent)?;
        if self.require(child)?.parent != Some(parent) {
            return Err(LiveTreeError::NotAChild { parent, child });
        }
        self.detach(child);
        Ok(())
    }

    fn set_attribute(&mut self, id: LiveId, name: &str, value: &str) -> Result<(), LiveTreeError> {
        let node = self.element_mut(id, "set_attribute")?;
        if name == STYLE_PROP {
            node.style.clear();
            node.style_text = Some(value.to_string());
            return Ok(());
        }
        node.attributes.insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn remove_attribute(&mut self, id: LiveId, name: &str) -> Result<(), LiveTreeError> {
        let node = self.get_mut(id)?;
        if name == STYLE_PROP {
            node.style.clear();
            node.style_text = None;
        }
        node.attributes.remove(name);
        Ok(())
    }

    fn set_property(
        &mut self,
        id: LiveId,
        name: &str,
        value: &PropValue,
    ) -> Result<(), LiveTreeError> {
        let node = self.element_mut(id, "set_property")?;
        node.properties.insert(name.to_string(), value.clone());
        Ok(())
    }

    fn set_style_text(&mut self, id: LiveId, css: &str) -> Result<(), LiveTreeError> {
        let node = self.element_mut(id, "set_style_text")?;
        node.style.clear();
        node.style_text = if css.is_empty() {
            None
        } else {
            Some(css.to_string())
        };
        Ok(())
    }

    fn set_style_property(
        &mut self,
        id: LiveId,
        name: &str,
        value: &str,
    ) -> Result<(), LiveTreeError> {
        let node = self.element_mut(id, "set_style_property")?;
        node.style.insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn remove_style_property(&mut self, id: LiveId, name: &str) -> Result<(), LiveTreeError> {
        self.get_mut(id)?.style.remove(name);
        Ok(())
    }

    fn add_listener(
        &mut self,
        id: LiveId,
        event: &str,
        handler: EventHandler,
    ) -> Result<(), LiveTreeError> {
        self.get_mut(id)?
            .listeners
            .entry(event.to_string())
            .or_default()
            .push(handler);
        Ok(())
    }

    fn remove_listener(
        &mut self,
        id: LiveId,
        event: &str,
        handler: &EventHandler,
    ) -> Result<(), LiveTreeError> {
        let node = self.get_mut(id)?;
        if let Some(handlers) = node.listeners.get_mut(event) {
            if let Some(pos) = handlers.iter().position(|h| h.same(handler)) {
                handlers.remove(pos);
            }
        }
        Ok(())
    }

    fn set_inner_html(&mut self, id: LiveId, html: &str) -> Result<(), LiveTreeError> {
        let children = self.element_mut(id, "set_inner_html")?.children.clone();
        for child in children {
            self.detach(child);
        }
        self.get_mut(id)?.inner_html = Some(html.to_string());
        Ok(())
    }

    fn set_text(&mut self, id: LiveId, content: &str) -> Result<(), LiveTreeError> {
        match &mut self.get_mut(id)?.kind {
            LiveNodeKind::Text { content: current } => {
                *current = content.to_string();
                Ok(())
            }
            LiveNodeKind::Element { .. } => Err(LiveTreeError::Unsupported {
                id,
                reason: "set_text requires a text node".to_string(),
            }),
        }
    }
}
