//! Structural snapshots of an in-memory live tree.
//!
//! A [`LiveSnapshot`] captures what a subtree looks like (tags, attributes,
//! live properties, style, inner html, text) without live identities, so two
//! trees built independently compare equal when they render the same.
//!
//! ## Determinism Guarantees
//!
//! - Same structure → same digest (canonical JSON serialization, sorted maps)
//! - Child order is significant
//! - Listeners are recorded by event name and count only

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::errors::Result;
use crate::live::{LiveId, LiveNodeKind, LiveTreeError, MemoryDom};
use crate::model::PropValue;

/// Identity-free description of a live subtree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LiveSnapshot {
    Element {
        tag: String,
        #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
        attributes: BTreeMap<String, String>,
        #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
        properties: BTreeMap<String, String>,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        style_text: Option<String>,
        #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
        style: BTreeMap<String, String>,
        #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
        listeners: BTreeMap<String, usize>,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        inner_html: Option<String>,
        #[serde(skip_serializing_if = "Vec::is_empty", default)]
        children: Vec<LiveSnapshot>,
    },
    Text {
        content: String,
    },
}

impl LiveSnapshot {
    /// Capture the subtree rooted at `root`.
    ///
    /// ## Errors
    ///
    /// Returns `ReconcileError::Host` if `root` or a descendant is missing.
    pub fn capture(dom: &MemoryDom, root: LiveId) -> Result<Self> {
        let node = dom.node(root).ok_or(LiveTreeError::NotFound { id: root })?;
        let snapshot = match node.kind() {
            LiveNodeKind::Text { content } => LiveSnapshot::Text {
                content: content.clone(),
            },
            LiveNodeKind::Element { tag } => LiveSnapshot::Element {
                tag: tag.clone(),
                attributes: node.attributes().clone(),
                properties: node
                    .properties()
                    .iter()
                    .map(|(k, v)| (k.clone(), property_text(v)))
                    .collect(),
                style_text: node.style_text().map(str::to_string),
                style: node.style().clone(),
                listeners: node
                    .listener_counts()
                    .into_iter()
                    .filter(|(_, n)| *n > 0)
                    .collect(),
                inner_html: node.inner_html().map(str::to_string),
                children: node
                    .children()
                    .iter()
                    .map(|child| Self::capture(dom, *child))
                    .collect::<Result<Vec<_>>>()?,
            },
        };
        Ok(snapshot)
    }

    /// Capture every child of `parent`, in order.
    ///
    /// ## Errors
    ///
    /// Returns `ReconcileError::Host` if `parent` or a descendant is missing.
    pub fn capture_children(dom: &MemoryDom, parent: LiveId) -> Result<Vec<Self>> {
        let node = dom
            .node(parent)
            .ok_or(LiveTreeError::NotFound { id: parent })?;
        node.children()
            .iter()
            .map(|child| Self::capture(dom, *child))
            .collect()
    }

    /// Hex-encoded SHA256 of the canonical JSON form (64 characters).
    ///
    /// ## Errors
    ///
    /// Returns `ReconcileError::Serialization` if JSON serialization fails.
    pub fn digest(&self) -> Result<String> {
        let canonical = serde_json::to_string(self)?;
        Ok(hash_string(&canonical))
    }

    /// Markup-like rendering for test output; attribute values are not escaped.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            LiveSnapshot::Text { content } => out.push_str(content),
            LiveSnapshot::Element {
                tag,
                attributes,
                style_text,
                style,
                inner_html,
                children,
                ..
            } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attributes {
                    out.push_str(&format!(" {}=\"{}\"", name, value));
                }
                let css = match style_text {
                    Some(text) => Some(text.clone()),
                    None if !style.is_empty() => Some(crate::model::props::style_to_css(style)),
                    None => None,
                };
                if let Some(css) = css {
                    out.push_str(&format!(" style=\"{}\"", css));
                }
                out.push('>');
                if let Some(html) = inner_html {
                    out.push_str(html);
                }
                for child in children {
                    child.write_html(out);
                }
                out.push_str(&format!("</{}>", tag));
            }
        }
    }
}

fn property_text(value: &PropValue) -> String {
    value
        .as_attribute()
        .unwrap_or_else(|| format!("{:?}", value))
}

fn hash_string(s: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(s.as_bytes());
    hex::encode(hasher.finalize())
}
