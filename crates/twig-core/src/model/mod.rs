//! Data definitions for one render pass
//!
//! Nodes, props, and effects carry no reconciliation logic of their own.

pub mod effect;
pub mod node;
pub mod props;

pub use effect::{Effect, EffectTag, NodeSummary};
pub use node::{ComponentId, Key, Node, NodeType, ViewContext, ViewFn};
pub use props::{
    attribute_name, event_name, is_live_property, is_reserved, EventHandler, NodeRef, PropValue,
    Props, RefTarget, CHILDREN_PROP, CLASS_ATTRIBUTE, CLASS_NAME_PROP, KEY_PROP, RAW_HTML_PROP,
    REF_PROP, STYLE_PROP,
};
