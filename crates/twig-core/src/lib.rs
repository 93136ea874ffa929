//! twig core - keyed reconciliation engine for declarative UI trees
//!
//! This crate brings a live, stateful output tree into agreement with a new
//! declarative description of it, including:
//! - Node model with tag, text, and stateful view-function variants
//! - Prop reconciliation (attributes, live properties, styles, listeners, refs)
//! - Keyed child list reconciliation with positional repair
//! - Two-phase diff/commit protocol driven by a caller-owned session
//! - Production-mode recovery that bounds a failure to one subtree
//! - An in-memory live tree and structural snapshots for headless use

pub mod config;
pub mod errors;
pub mod live;
pub mod logging_facility;
pub mod model;
pub mod reconcile;
pub mod renderer;
pub mod snapshot;

// Re-export commonly used types
pub use config::{ErrorMode, ReconcileConfig};
pub use errors::{ExError, ExErrorKind, ReconcileError, Result};
pub use live::{Event, LiveId, LiveTree, LiveTreeError, MemoryDom};
pub use model::{
    ComponentId, Effect, EffectTag, EventHandler, Key, Node, NodeRef, NodeType, PropValue, Props,
    RefTarget, ViewContext, ViewFn,
};
pub use reconcile::{CommitReport, DiffOutcome, ReconcileSession, Reconciler};
pub use renderer::{CleanupHook, DefaultRenderer, MaterializeError, NoopCleanup, Renderer};
pub use snapshot::LiveSnapshot;
pub use twig_core_types::{schema, SessionId, TraceId};
