//! The live output tree
//!
//! [`LiveTree`] is the seam between the reconciler and whatever stateful
//! output it drives (a browser DOM, a native widget tree, a terminal
//! buffer). The reconciler only ever reaches the output through this trait.
//! [`MemoryDom`] is the in-process implementation used for headless
//! rendering and tests.

pub mod memory;

pub use memory::{LiveNode, LiveNodeKind, MemoryDom};

use crate::model::{EventHandler, PropValue};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Handle to one node of a live tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LiveId(usize);

impl LiveId {
    /// Create a handle from an arena slot
    pub fn from_index(index: usize) -> Self {
        Self(index)
    }

    /// The arena slot this handle points at
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for LiveId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An event delivered to listeners attached through the prop reconciler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub name: String,
    pub target: LiveId,
}

/// Mutations a live tree refused to perform
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LiveTreeError {
    #[error("live node not found: {id}")]
    NotFound { id: LiveId },

    #[error("live node {child} is not a child of {parent}")]
    NotAChild { parent: LiveId, child: LiveId },

    #[error("inserting {child} under {parent} would create a cycle")]
    Cycle { parent: LiveId, child: LiveId },

    #[error("unsupported operation on {id}: {reason}")]
    Unsupported { id: LiveId, reason: String },
}

impl LiveTreeError {
    /// The live node the failure is about
    pub fn live_id(&self) -> Option<LiveId> {
        match self {
            LiveTreeError::NotFound { id } | LiveTreeError::Unsupported { id, .. } => Some(*id),
            LiveTreeError::NotAChild { child, .. } | LiveTreeError::Cycle { child, .. } => {
                Some(*child)
            }
        }
    }
}

/// A stateful output tree the reconciler can inspect and mutate
///
/// Structural reads (`contains`, `parent`, `children`) must reflect every
/// mutation applied so far. `insert_before` has DOM semantics: inserting a
/// node that is already attached somewhere moves it.
pub trait LiveTree {
    /// Whether the handle refers to a node this tree holds
    fn contains(&self, id: LiveId) -> bool;

    /// The current parent of a node, if attached
    fn parent(&self, id: LiveId) -> Option<LiveId>;

    /// The current children of a node, in order
    fn children(&self, id: LiveId) -> Vec<LiveId>;

    /// Create a detached element node
    fn create_element(&mut self, tag: &str) -> LiveId;

    /// Create a detached text node
    fn create_text(&mut self, content: &str) -> LiveId;

    /// Insert `child` under `parent` before `before`, or append when `before` is `None`
    ///
    /// # Errors
    ///
    /// Fails when a handle is unknown, `before` is not a child of `parent`,
    /// or the insertion would make a node its own ancestor.
    fn insert_before(
        &mut self,
        parent: LiveId,
        child: LiveId,
        before: Option<LiveId>,
    ) -> Result<(), LiveTreeError>;

    /// Detach `child` from `parent`
    ///
    /// # Errors
    ///
    /// Fails when a handle is unknown or `child` is not a child of `parent`.
    fn remove_child(&mut self, parent: LiveId, child: LiveId) -> Result<(), LiveTreeError>;

    /// Set a string attribute
    ///
    /// # Errors
    ///
    /// Fails when the node is unknown or cannot carry attributes.
    fn set_attribute(&mut self, id: LiveId, name: &str, value: &str) -> Result<(), LiveTreeError>;

    /// Remove an attribute; removing an absent attribute is not an error
    ///
    /// # Errors
    ///
    /// Fails when the node is unknown.
    fn remove_attribute(&mut self, id: LiveId, name: &str) -> Result<(), LiveTreeError>;

    /// Write a live property (`value`, `checked`)
    ///
    /// # Errors
    ///
    /// Fails when the node is unknown or cannot carry properties.
    fn set_property(
        &mut self,
        id: LiveId,
        name: &str,
        value: &PropValue,
    ) -> Result<(), LiveTreeError>;

    /// Replace the whole inline style with a raw CSS string
    ///
    /// # Errors
    ///
    /// Fails when the node is unknown or cannot carry style.
    fn set_style_text(&mut self, id: LiveId, css: &str) -> Result<(), LiveTreeError>;

    /// Set one inline style field
    ///
    /// # Errors
    ///
    /// Fails when the node is unknown or cannot carry style.
    fn set_style_property(
        &mut self,
        id: LiveId,
        name: &str,
        value: &str,
    ) -> Result<(), LiveTreeError>;

    /// Remove one inline style field
    ///
    /// # Errors
    ///
    /// Fails when the node is unknown.
    fn remove_style_property(&mut self, id: LiveId, name: &str) -> Result<(), LiveTreeError>;

    /// Attach a listener for `event`
    ///
    /// # Errors
    ///
    /// Fails when the node is unknown.
    fn add_listener(
        &mut self,
        id: LiveId,
        event: &str,
        handler: EventHandler,
    ) -> Result<(), LiveTreeError>;

    /// Detach one specific listener; detaching an unknown handler is not an error
    ///
    /// # Errors
    ///
    /// Fails when the node is unknown.
    fn remove_listener(
        &mut self,
        id: LiveId,
        event: &str,
        handler: &EventHandler,
    ) -> Result<(), LiveTreeError>;

    /// Replace the rendered content of a node with raw markup
    ///
    /// # Errors
    ///
    /// Fails when the node is unknown or is not an element.
    fn set_inner_html(&mut self, id: LiveId, html: &str) -> Result<(), LiveTreeError>;

    /// Replace the content of a text node
    ///
    /// # Errors
    ///
    /// Fails when the node is unknown or is not a text node.
    fn set_text(&mut self, id: LiveId, content: &str) -> Result<(), LiveTreeError>;

    /// Append `child` as the last child of `parent`
    ///
    /// # Errors
    ///
    /// See [`LiveTree::insert_before`].
    fn append_child(&mut self, parent: LiveId, child: LiveId) -> Result<(), LiveTreeError> {
        self.insert_before(parent, child, None)
    }
}
