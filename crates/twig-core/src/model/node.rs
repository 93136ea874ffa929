use std::rc::Rc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::effect::NodeSummary;
use super::props::{PropValue, Props, KEY_PROP};
use crate::live::LiveId;

/// Stable token for one instance of a view function
///
/// Assigned when the instance is first mounted and carried to the new Node
/// every time the instance is re-rendered at the same position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComponentId(String);

impl ComponentId {
    /// Generate a new ComponentId using UUIDv7
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ComponentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ComponentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a view function sees when it is invoked
pub struct ViewContext<'a> {
    pub id: &'a ComponentId,
    pub props: &'a Props,
    pub children: &'a [Node],
}

/// A stateful view function
///
/// Identity is the identity of the shared function object: two `ViewFn`s are
/// the same type only when one is a clone of the other. Construct each view
/// function once and clone it into every Node that uses it.
#[derive(Clone)]
pub struct ViewFn {
    name: String,
    render: Rc<dyn Fn(&ViewContext<'_>) -> Node>,
}

impl ViewFn {
    pub fn new(name: impl Into<String>, render: impl Fn(&ViewContext<'_>) -> Node + 'static) -> Self {
        Self {
            name: name.into(),
            render: Rc::new(render),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke the function to obtain its expanded output
    pub fn render(&self, cx: &ViewContext<'_>) -> Node {
        (self.render)(cx)
    }

    pub fn same(&self, other: &ViewFn) -> bool {
        Rc::as_ptr(&self.render) as *const () == Rc::as_ptr(&other.render) as *const ()
    }
}

impl std::fmt::Debug for ViewFn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ViewFn({}@{:p})",
            self.name,
            Rc::as_ptr(&self.render) as *const ()
        )
    }
}

/// Type discriminator of a Node
#[derive(Debug, Clone)]
pub enum NodeType {
    /// Element with a tag name
    Tag(String),
    /// Text leaf; the content is data, not part of the type
    Text(String),
    /// Stateful view function, expanded on every render
    Component(ViewFn),
}

impl NodeType {
    /// Whether an old node of this type may be reused for a new node of `other`
    pub fn same_type(&self, other: &NodeType) -> bool {
        match (self, other) {
            (NodeType::Tag(a), NodeType::Tag(b)) => a == b,
            (NodeType::Text(_), NodeType::Text(_)) => true,
            (NodeType::Component(a), NodeType::Component(b)) => a.same(b),
            _ => false,
        }
    }
}

/// Reconciliation identity of a child within its sibling list
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Explicit(String),
    /// Positional fallback for unkeyed children
    Index(usize),
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Key::Explicit(k) => write!(f, "{}", k),
            Key::Index(i) => write!(f, "#{}", i),
        }
    }
}

/// Description of one tree position for one render pass
///
/// `live` and `component_id` are filled in by the reconciler. A Node is
/// built fresh for every pass; the old tree is only read.
#[derive(Debug, Clone)]
pub struct Node {
    node_type: NodeType,
    props: Props,
    key: Option<String>,
    children: Vec<Node>,
    live: Option<LiveId>,
    component_id: Option<ComponentId>,
}

impl Node {
    fn with_type(node_type: NodeType) -> Self {
        Self {
            node_type,
            props: Props::new(),
            key: None,
            children: Vec::new(),
            live: None,
            component_id: None,
        }
    }

    pub fn tag(name: impl Into<String>) -> Self {
        Self::with_type(NodeType::Tag(name.into()))
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::with_type(NodeType::Text(content.into()))
    }

    pub fn component(view: &ViewFn) -> Self {
        Self::with_type(NodeType::Component(view.clone()))
    }

    pub fn with_key(mut self, key: impl std::fmt::Display) -> Self {
        self.key = Some(key.to_string());
        self
    }

    /// Set one prop; `key` is routed to the node key
    pub fn with_prop(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        let name = name.into();
        let value = value.into();
        if name == KEY_PROP {
            self.key = value.as_attribute();
        } else {
            self.props.insert(name, value);
        }
        self
    }

    pub fn with_props(mut self, props: Props) -> Self {
        for (name, value) in props.iter() {
            self = self.with_prop(name, value.clone());
        }
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn node_type(&self) -> &NodeType {
        &self.node_type
    }

    pub fn props(&self) -> &Props {
        &self.props
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Live node this description was reconciled onto, if any
    pub fn live(&self) -> Option<LiveId> {
        self.live
    }

    pub fn component_id(&self) -> Option<&ComponentId> {
        self.component_id.as_ref()
    }

    pub fn is_component(&self) -> bool {
        matches!(self.node_type, NodeType::Component(_))
    }

    /// Explicit key, else the position among siblings
    pub fn reconcile_key(&self, index: usize) -> Key {
        match &self.key {
            Some(k) => Key::Explicit(k.clone()),
            None => Key::Index(index),
        }
    }

    pub fn summary(&self) -> NodeSummary {
        NodeSummary::of(self)
    }

    pub(crate) fn set_live(&mut self, live: LiveId) {
        self.live = Some(live);
    }

    pub(crate) fn set_component_id(&mut self, id: ComponentId) {
        self.component_id = Some(id);
    }

    pub(crate) fn children_mut(&mut self) -> &mut [Node] {
        &mut self.children
    }
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.summary())
    }
}
