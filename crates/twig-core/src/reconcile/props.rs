//! Prop reconciliation for a single live node
//!
//! [`diff_props`] is pure: it compares two prop maps and yields the
//! operations that bring a live node from one to the other. The operations
//! are applied later by [`apply_prop_ops`], either directly on a detached
//! node being mounted or at commit through an Update effect.

use std::collections::BTreeMap;

use crate::live::{LiveId, LiveTree, LiveTreeError};
use crate::model::{
    attribute_name, event_name, is_live_property, is_reserved, EventHandler, NodeRef, PropValue,
    Props, RefTarget, RAW_HTML_PROP, REF_PROP, STYLE_PROP,
};

/// One attribute-level mutation of a live node
#[derive(Debug, Clone, PartialEq)]
pub enum PropOp {
    SetAttribute { name: String, value: String },
    RemoveAttribute { name: String },
    SetProperty { name: String, value: PropValue },
    SetStyleText { css: String },
    ClearStyleText,
    SetStyleField { name: String, value: String },
    RemoveStyleField { name: String },
    AddListener { event: String, handler: EventHandler },
    RemoveListener { event: String, handler: EventHandler },
    SetInnerHtml { html: String },
    AssignRef(RefTarget),
    ClearRef(NodeRef),
    SetText { content: String },
}

/// Compute the operations turning `old` props into `new` props
///
/// Removals come first so a prop that changes shape never sees stale state.
/// Every key of `new` is assigned, changed or not. The reserved `children`
/// and `key` entries are never touched.
pub fn diff_props(old: &Props, new: &Props) -> Vec<PropOp> {
    let mut ops = Vec::new();

    for (name, value) in old.iter() {
        if is_reserved(name) || new.contains(name) {
            continue;
        }
        remove_prop(&mut ops, name, value);
    }

    for (name, value) in new.iter() {
        if is_reserved(name) {
            continue;
        }
        assign_prop(&mut ops, name, old.get(name), value);
    }

    ops
}

fn remove_prop(ops: &mut Vec<PropOp>, name: &str, value: &PropValue) {
    match (event_name(name), value) {
        (Some(event), PropValue::Handler(handler)) => ops.push(PropOp::RemoveListener {
            event,
            handler: handler.clone(),
        }),
        (_, PropValue::Ref(RefTarget::Holder(holder))) if name == REF_PROP => {
            ops.push(PropOp::ClearRef(holder.clone()))
        }
        (_, PropValue::Ref(_)) if name == REF_PROP => {}
        _ => ops.push(PropOp::RemoveAttribute {
            name: attribute_name(name).to_string(),
        }),
    }
}

fn assign_prop(ops: &mut Vec<PropOp>, name: &str, old: Option<&PropValue>, value: &PropValue) {
    if is_live_property(name) {
        ops.push(PropOp::SetProperty {
            name: name.to_string(),
            value: value.clone(),
        });
        return;
    }

    if name == STYLE_PROP {
        match value {
            PropValue::Text(css) => {
                ops.push(PropOp::SetStyleText { css: css.clone() });
                return;
            }
            PropValue::Style(fields) => {
                assign_style_fields(ops, old, fields);
                return;
            }
            _ => {}
        }
    }

    if let Some(event) = event_name(name) {
        if let Some(PropValue::Handler(previous)) = old {
            ops.push(PropOp::RemoveListener {
                event: event.clone(),
                handler: previous.clone(),
            });
        }
        if let PropValue::Handler(handler) = value {
            ops.push(PropOp::AddListener {
                event,
                handler: handler.clone(),
            });
            return;
        }
    }

    if name == RAW_HTML_PROP {
        if let PropValue::Text(html) = value {
            ops.push(PropOp::SetInnerHtml { html: html.clone() });
            return;
        }
    }

    if name == REF_PROP {
        if let Some(PropValue::Ref(RefTarget::Holder(previous))) = old {
            if old != Some(value) {
                ops.push(PropOp::ClearRef(previous.clone()));
            }
        }
        if let PropValue::Ref(target) = value {
            ops.push(PropOp::AssignRef(target.clone()));
            return;
        }
    }

    if value.is_absent() {
        ops.push(PropOp::RemoveAttribute {
            name: attribute_name(name).to_string(),
        });
        return;
    }

    if let Some(text) = value.as_attribute() {
        ops.push(PropOp::SetAttribute {
            name: attribute_name(name).to_string(),
            value: text,
        });
    }
}

fn assign_style_fields(
    ops: &mut Vec<PropOp>,
    old: Option<&PropValue>,
    fields: &BTreeMap<String, String>,
) {
    match old {
        Some(PropValue::Text(_)) => ops.push(PropOp::ClearStyleText),
        Some(PropValue::Style(previous)) => {
            for name in previous.keys().filter(|k| !fields.contains_key(*k)) {
                ops.push(PropOp::RemoveStyleField { name: name.clone() });
            }
        }
        _ => {}
    }
    for (name, value) in fields {
        ops.push(PropOp::SetStyleField {
            name: name.clone(),
            value: value.clone(),
        });
    }
}

/// Apply prop operations to one live node, in order
///
/// # Errors
///
/// Returns the first [`LiveTreeError`] the live tree reports.
pub fn apply_prop_ops<H: LiveTree>(
    host: &mut H,
    live: LiveId,
    ops: &[PropOp],
) -> Result<(), LiveTreeError> {
    for op in ops {
        match op {
            PropOp::SetAttribute { name, value } => host.set_attribute(live, name, value)?,
            PropOp::RemoveAttribute { name } => host.remove_attribute(live, name)?,
            PropOp::SetProperty { name, value } => host.set_property(live, name, value)?,
            PropOp::SetStyleText { css } => host.set_style_text(live, css)?,
            PropOp::ClearStyleText => host.set_style_text(live, "")?,
            PropOp::SetStyleField { name, value } => host.set_style_property(live, name, value)?,
            PropOp::RemoveStyleField { name } => host.remove_style_property(live, name)?,
            PropOp::AddListener { event, handler } => {
                host.add_listener(live, event, handler.clone())?
            }
            PropOp::RemoveListener { event, handler } => {
                host.remove_listener(live, event, handler)?
            }
            PropOp::SetInnerHtml { html } => host.set_inner_html(live, html)?,
            PropOp::AssignRef(target) => target.assign(live),
            PropOp::ClearRef(holder) => holder.clear(),
            PropOp::SetText { content } => host.set_text(live, content)?,
        }
    }
    Ok(())
}
