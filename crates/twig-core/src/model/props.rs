use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::live::{Event, LiveId};

/// Reserved entry holding child descriptions; never reconciled as a prop
pub const CHILDREN_PROP: &str = "children";
/// Reserved entry holding the reconciliation key; never reconciled as a prop
pub const KEY_PROP: &str = "key";
pub const CLASS_NAME_PROP: &str = "className";
pub const CLASS_ATTRIBUTE: &str = "class";
pub const STYLE_PROP: &str = "style";
pub const REF_PROP: &str = "ref";
/// Replaces the rendered content of an element with raw markup
pub const RAW_HTML_PROP: &str = "dangerouslySetInnerHTML";
/// Props written as live properties instead of attributes
pub const LIVE_PROPERTIES: [&str; 2] = ["value", "checked"];

pub fn is_reserved(name: &str) -> bool {
    name == CHILDREN_PROP || name == KEY_PROP
}

pub fn is_live_property(name: &str) -> bool {
    LIVE_PROPERTIES.contains(&name)
}

/// Event name for a listener prop: `onClick` -> `click`
///
/// Only `on` followed by an uppercase letter counts, so `one` or `only`
/// stay ordinary attributes.
pub fn event_name(prop: &str) -> Option<String> {
    let rest = prop.strip_prefix("on")?;
    if rest.starts_with(|c: char| c.is_ascii_uppercase()) {
        Some(rest.to_ascii_lowercase())
    } else {
        None
    }
}

/// Attribute name a prop is written under
pub fn attribute_name(prop: &str) -> &str {
    if prop == CLASS_NAME_PROP {
        CLASS_ATTRIBUTE
    } else {
        prop
    }
}

/// An event listener with reference identity
#[derive(Clone)]
pub struct EventHandler(Rc<dyn Fn(&Event)>);

impl EventHandler {
    pub fn new(f: impl Fn(&Event) + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self, event: &Event) {
        (self.0)(event)
    }

    /// Whether both handles point at the same listener
    pub fn same(&self, other: &EventHandler) -> bool {
        Rc::as_ptr(&self.0) as *const () == Rc::as_ptr(&other.0) as *const ()
    }
}

impl PartialEq for EventHandler {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl std::fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EventHandler({:p})", Rc::as_ptr(&self.0) as *const ())
    }
}

/// Assignable holder that receives a live node through the `ref` prop
#[derive(Clone, Default)]
pub struct NodeRef(Rc<Cell<Option<LiveId>>>);

impl NodeRef {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<LiveId> {
        self.0.get()
    }

    pub fn set(&self, live: LiveId) {
        self.0.set(Some(live));
    }

    pub fn clear(&self) {
        self.0.set(None);
    }
}

/// Holders are equal when they share the same cell
impl PartialEq for NodeRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl std::fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("NodeRef").field(&self.0.get()).finish()
    }
}

/// Target of a `ref` prop
#[derive(Clone)]
pub enum RefTarget {
    Callback(Rc<dyn Fn(LiveId)>),
    Holder(NodeRef),
}

impl RefTarget {
    pub fn callback(f: impl Fn(LiveId) + 'static) -> Self {
        RefTarget::Callback(Rc::new(f))
    }

    pub fn holder(holder: &NodeRef) -> Self {
        RefTarget::Holder(holder.clone())
    }

    /// Hand the live node to the target
    pub fn assign(&self, live: LiveId) {
        match self {
            RefTarget::Callback(f) => f(live),
            RefTarget::Holder(holder) => holder.set(live),
        }
    }
}

impl PartialEq for RefTarget {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (RefTarget::Callback(a), RefTarget::Callback(b)) => {
                Rc::as_ptr(a) as *const () == Rc::as_ptr(b) as *const ()
            }
            (RefTarget::Holder(a), RefTarget::Holder(b)) => a == b,
            _ => false,
        }
    }
}

impl std::fmt::Debug for RefTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RefTarget::Callback(cb) => {
                write!(f, "RefTarget::Callback({:p})", Rc::as_ptr(cb) as *const ())
            }
            RefTarget::Holder(holder) => write!(f, "RefTarget::Holder({:?})", holder),
        }
    }
}

/// Value of one prop
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    /// Absent value; removes the attribute it is assigned to
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    /// Structured inline style, merged field by field
    Style(BTreeMap<String, String>),
    Handler(EventHandler),
    Ref(RefTarget),
}

impl PropValue {
    /// `Null` and `false` remove the attribute instead of setting it
    pub fn is_absent(&self) -> bool {
        matches!(self, PropValue::Null | PropValue::Bool(false))
    }

    /// String form used when the value is written as an attribute
    pub fn as_attribute(&self) -> Option<String> {
        match self {
            PropValue::Null => None,
            PropValue::Bool(b) => Some(b.to_string()),
            PropValue::Number(n) => Some(n.to_string()),
            PropValue::Text(s) => Some(s.clone()),
            PropValue::Style(fields) => Some(style_to_css(fields)),
            PropValue::Handler(_) | PropValue::Ref(_) => None,
        }
    }

    pub fn style<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        PropValue::Style(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn handler(f: impl Fn(&Event) + 'static) -> Self {
        PropValue::Handler(EventHandler::new(f))
    }
}

/// Render a structured style as CSS text
pub fn style_to_css(fields: &BTreeMap<String, String>) -> String {
    fields
        .iter()
        .map(|(k, v)| format!("{}: {};", k, v))
        .collect::<Vec<_>>()
        .join(" ")
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::Text(value.to_string())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::Text(value)
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        PropValue::Bool(value)
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        PropValue::Number(value)
    }
}

impl From<i64> for PropValue {
    fn from(value: i64) -> Self {
        PropValue::Number(value as f64)
    }
}

impl From<i32> for PropValue {
    fn from(value: i32) -> Self {
        PropValue::Number(f64::from(value))
    }
}

impl From<EventHandler> for PropValue {
    fn from(value: EventHandler) -> Self {
        PropValue::Handler(value)
    }
}

impl From<RefTarget> for PropValue {
    fn from(value: RefTarget) -> Self {
        PropValue::Ref(value)
    }
}

/// Ordered prop mapping
///
/// Iteration is sorted by name so that reconciliation output is
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Props(BTreeMap<String, PropValue>);

impl Props {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<PropValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<PropValue> {
        self.0.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&PropValue> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<PropValue>> FromIterator<(K, V)> for Props {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
