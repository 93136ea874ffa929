//! Reconciliation engine
//!
//! A cycle has two phases. [`Reconciler::diff`] compares an old and a new
//! Node tree, materializes whatever is new into detached live nodes, and
//! records the structural and prop mutations it needs in a
//! [`ReconcileSession`]. [`Reconciler::commit_root`] then applies those
//! effects to the attached live tree, deletions first.
//!
//! ```
//! use twig_core::{DefaultRenderer, LiveTree, MemoryDom, Node, ReconcileConfig, ReconcileSession, Reconciler};
//!
//! let mut dom = MemoryDom::new();
//! let root = dom.create_element("body");
//! let reconciler = Reconciler::new(ReconcileConfig::diagnostic()).with_renderer(DefaultRenderer);
//!
//! let mut tree = Node::tag("p").with_child(Node::text("hello"));
//! let mut session = ReconcileSession::new();
//! reconciler.diff(&mut session, &mut dom, root, None, &mut tree, None).unwrap();
//! reconciler.commit_root(&mut session, &mut dom);
//!
//! assert_eq!(dom.text_content(root), "hello");
//! ```

mod children;
mod commit;
mod differ;
pub mod props;
mod session;
pub mod summary;

pub use commit::CommitReport;
pub use props::{apply_prop_ops, diff_props, PropOp};
pub use session::ReconcileSession;

use crate::config::ReconcileConfig;
use crate::errors::ReconcileError;
use crate::live::LiveTree;
use crate::renderer::{CleanupHook, NoopCleanup, Renderer};

/// Result of a top-level `diff` that did not fail
#[derive(Debug, Clone, PartialEq)]
pub enum DiffOutcome {
    /// Effects describe a reconciliation of the old tree into the new one
    Reconciled,
    /// Reconciliation failed and the parent's content is rebuilt from scratch
    /// instead; `cause` is the original failure
    Recovered { cause: ReconcileError },
}

impl DiffOutcome {
    pub fn is_recovered(&self) -> bool {
        matches!(self, DiffOutcome::Recovered { .. })
    }
}

/// Reconciliation engine for one kind of live tree
///
/// Holds the injected renderer and cleanup hook. All per-cycle state lives
/// in the [`ReconcileSession`] passed to each call.
pub struct Reconciler<H: LiveTree> {
    config: ReconcileConfig,
    renderer: Option<Box<dyn Renderer<H>>>,
    cleanup: Box<dyn CleanupHook<H>>,
}

impl<H: LiveTree> Reconciler<H> {
    /// A reconciler without a renderer; install one before the first `diff`
    pub fn new(config: ReconcileConfig) -> Self {
        Self {
            config,
            renderer: None,
            cleanup: Box::new(NoopCleanup),
        }
    }

    pub fn with_renderer(mut self, renderer: impl Renderer<H> + 'static) -> Self {
        self.init_renderer(renderer);
        self
    }

    /// Install the renderer used to materialize every new node
    pub fn init_renderer(&mut self, renderer: impl Renderer<H> + 'static) {
        self.renderer = Some(Box::new(renderer));
    }

    pub fn with_cleanup(mut self, cleanup: impl CleanupHook<H> + 'static) -> Self {
        self.cleanup = Box::new(cleanup);
        self
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    pub fn has_renderer(&self) -> bool {
        self.renderer.is_some()
    }
}
