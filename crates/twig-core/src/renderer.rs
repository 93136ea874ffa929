//! Injected collaborators: the Renderer Adapter and the Cleanup Hook
//!
//! Both are traits with closure blanket impls so a host can pass a plain
//! function, or a type that carries its own state.

use thiserror::Error;

use crate::live::{LiveId, LiveTree, LiveTreeError};
use crate::model::{Node, NodeType};

/// Failure reported by a renderer for one node
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MaterializeError {
    #[error("renderer does not support {0}")]
    Unsupported(String),

    #[error("{0}")]
    Rejected(String),

    #[error(transparent)]
    Host(#[from] LiveTreeError),
}

impl MaterializeError {
    pub fn rejected(reason: impl Into<String>) -> Self {
        MaterializeError::Rejected(reason.into())
    }
}

/// Converts the description of one node into a detached live node
///
/// Called once per tag or text node, never for view functions (those are
/// expanded by the reconciler). The renderer creates only the node itself;
/// props and children are applied by the caller. `depth` is the nesting
/// level below the root of the current diff.
pub trait Renderer<H: LiveTree> {
    /// # Errors
    ///
    /// Returns [`MaterializeError`] when the node cannot be represented.
    fn materialize(&self, host: &mut H, node: &Node, depth: usize)
        -> Result<LiveId, MaterializeError>;
}

impl<H, F> Renderer<H> for F
where
    H: LiveTree,
    F: Fn(&mut H, &Node, usize) -> Result<LiveId, MaterializeError>,
{
    fn materialize(
        &self,
        host: &mut H,
        node: &Node,
        depth: usize,
    ) -> Result<LiveId, MaterializeError> {
        self(host, node, depth)
    }
}

/// Creates an element for every tag and a text node for every text leaf
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRenderer;

impl<H: LiveTree> Renderer<H> for DefaultRenderer {
    fn materialize(
        &self,
        host: &mut H,
        node: &Node,
        _depth: usize,
    ) -> Result<LiveId, MaterializeError> {
        match node.node_type() {
            NodeType::Tag(tag) => Ok(host.create_element(tag)),
            NodeType::Text(content) => Ok(host.create_text(content)),
            NodeType::Component(_) => Err(MaterializeError::Unsupported(node.to_string())),
        }
    }
}

/// Tears down stateful state rooted at a live node before it is detached
///
/// The node is still attached when the hook runs. Descendants are the
/// hook's responsibility.
pub trait CleanupHook<H: LiveTree> {
    fn cleanup(&self, host: &H, live: LiveId);
}

impl<H, F> CleanupHook<H> for F
where
    H: LiveTree,
    F: Fn(&H, LiveId),
{
    fn cleanup(&self, host: &H, live: LiveId) {
        self(host, live)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCleanup;

impl<H: LiveTree> CleanupHook<H> for NoopCleanup {
    fn cleanup(&self, _host: &H, _live: LiveId) {}
}
