use std::time::Instant;

use tracing::{debug, error, warn};
use twig_core_types::schema;

use super::props::{apply_prop_ops, diff_props, PropOp};
use super::session::Checkpoint;
use super::{DiffOutcome, ReconcileSession, Reconciler};
use crate::config::ErrorMode;
use crate::errors::{ExError, ReconcileError, Result};
use crate::live::{LiveId, LiveTree};
use crate::model::{ComponentId, Effect, Node, NodeType, Props, ViewContext};
use crate::{log_op_end, log_op_error, log_op_start};

impl<H: LiveTree> Reconciler<H> {
    /// Reconcile `old` into `new` under `parent`, recording effects in `session`
    ///
    /// `old` is `None` for a first mount, which is inserted before `before`
    /// (or appended). Nothing attached to the live tree changes until
    /// [`commit_root`](Reconciler::commit_root); new nodes are materialized
    /// detached. On success every Node of `new` carries its live reference.
    ///
    /// # Errors
    ///
    /// Precondition violations ([`ReconcileError::is_precondition`]) are
    /// always returned. Any other failure is logged with its tree context
    /// and returned in diagnostic mode. In production mode the parent's
    /// content is rebuilt from `new` instead and the call returns
    /// [`DiffOutcome::Recovered`]; if that also fails the result is
    /// [`ReconcileError::RecoveryFailed`]. Effects recorded by a failed call
    /// are discarded from the session.
    pub fn diff(
        &self,
        session: &mut ReconcileSession,
        host: &mut H,
        parent: LiveId,
        old: Option<&Node>,
        new: &mut Node,
        before: Option<LiveId>,
    ) -> Result<DiffOutcome> {
        let start = Instant::now();
        log_op_start!(
            "diff",
            session_id = session.id().as_str(),
            parent = %parent,
            new_node = %new
        );

        let result = self.diff_root(session, host, parent, old, new, before);

        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(outcome) => {
                log_op_end!(
                    "diff",
                    duration_ms = duration_ms,
                    session_id = session.id().as_str(),
                    recovered = outcome.is_recovered(),
                    deletions = session.deletions().len(),
                    effects = session.effects().len()
                );
            }
            Err(err) => {
                log_op_error!(
                    "diff",
                    err,
                    duration_ms = duration_ms,
                    session_id = session.id().as_str()
                );
            }
        }
        result
    }

    fn diff_root(
        &self,
        session: &mut ReconcileSession,
        host: &mut H,
        parent: LiveId,
        old: Option<&Node>,
        new: &mut Node,
        before: Option<LiveId>,
    ) -> Result<DiffOutcome> {
        if !host.contains(parent) {
            return Err(ReconcileError::ParentNotFound { parent });
        }

        let checkpoint = session.checkpoint();
        let cause = match self.diff_node(session, host, parent, old, new, before) {
            Ok(()) => return Ok(DiffOutcome::Reconciled),
            Err(err) => err,
        };
        session.rollback(checkpoint);

        if cause.is_precondition() {
            return Err(cause);
        }

        match self.config.mode {
            ErrorMode::Diagnostic => {
                error!(
                    component = module_path!(),
                    op = "diff",
                    session_id = session.id().as_str(),
                    parent = %parent,
                    old_node = ?old.map(|n| n.to_string()),
                    new_node = %new,
                    err_code = ExError::from(&cause).code(),
                    error = %cause,
                    "reconciliation failed"
                );
                Err(cause)
            }
            ErrorMode::Production => self.recover(session, host, parent, new, checkpoint, cause),
        }
    }

    /// Clear the parent's live content and mount `new` from scratch, once
    fn recover(
        &self,
        session: &mut ReconcileSession,
        host: &mut H,
        parent: LiveId,
        new: &mut Node,
        checkpoint: Checkpoint,
        cause: ReconcileError,
    ) -> Result<DiffOutcome> {
        for child in host.children(parent) {
            session.enqueue(Effect::deletion(child, parent));
        }

        match self.mount(session, host, new, 0) {
            Ok(live) => {
                session.enqueue(Effect::placement(live, parent, None).with_new(new.summary()));
                warn!(
                    component = module_path!(),
                    op = "diff",
                    event = schema::EVENT_RECOVERED,
                    session_id = session.id().as_str(),
                    parent = %parent,
                    err_code = ExError::from(&cause).code(),
                    error = %cause,
                    "rebuilding parent content after failed reconciliation"
                );
                Ok(DiffOutcome::Recovered { cause })
            }
            Err(secondary) => {
                session.rollback(checkpoint);
                error!(
                    component = module_path!(),
                    op = "diff",
                    session_id = session.id().as_str(),
                    parent = %parent,
                    err_code = ExError::from(&secondary).code(),
                    error = %secondary,
                    original = %cause,
                    "recovery failed; not retrying"
                );
                Err(ReconcileError::RecoveryFailed {
                    original: Box::new(cause),
                    secondary: Box::new(secondary),
                })
            }
        }
    }

    fn diff_node(
        &self,
        session: &mut ReconcileSession,
        host: &mut H,
        parent: LiveId,
        old: Option<&Node>,
        new: &mut Node,
        before: Option<LiveId>,
    ) -> Result<()> {
        let Some(old) = old else {
            let live = self.mount(session, host, new, 0)?;
            session.enqueue(Effect::placement(live, parent, before).with_new(new.summary()));
            return Ok(());
        };

        if !old.node_type().same_type(new.node_type()) {
            let old_live = live_ref(host, old)?;
            let live = self.mount(session, host, new, 0)?;
            session.enqueue(
                Effect::replacement(live, parent, old_live)
                    .with_old(old.summary())
                    .with_new(new.summary()),
            );
            return Ok(());
        }

        if new.is_component() {
            self.rerender_component(session, host, parent, old, new, 0)?;
        } else {
            self.update_in_place(session, host, old, new, 0)?;
        }
        Ok(())
    }

    /// Build the live subtree for `node`, detached, and record live refs
    ///
    /// Initial props are applied and children appended directly, since
    /// nothing here is attached yet. Ref assignments are queued as an Update
    /// so a ref never sees a node from a diff that is rolled back.
    pub(super) fn mount(
        &self,
        session: &mut ReconcileSession,
        host: &mut H,
        node: &mut Node,
        depth: usize,
    ) -> Result<LiveId> {
        if let NodeType::Component(view) = node.node_type() {
            let view = view.clone();
            let id = node.component_id().cloned().unwrap_or_else(ComponentId::new);
            let mut rendered = view.render(&ViewContext {
                id: &id,
                props: node.props(),
                children: node.children(),
            });
            let live = self.mount(session, host, &mut rendered, depth)?;
            node.set_component_id(id);
            node.set_live(live);
            return Ok(live);
        }

        reject_text_props(node)?;
        let live = self.materialize(host, node, depth)?;
        let (refs, ops): (Vec<_>, Vec<_>) = diff_props(&Props::new(), node.props())
            .into_iter()
            .partition(|op| matches!(op, PropOp::AssignRef(_)));
        apply_prop_ops(host, live, &ops)?;
        for child in node.children_mut() {
            let child_live = self.mount(session, host, child, depth + 1)?;
            host.append_child(live, child_live)?;
        }
        if !refs.is_empty() {
            session.enqueue(Effect::update(live, refs).with_new(node.summary()));
        }
        node.set_live(live);
        Ok(live)
    }

    fn materialize(&self, host: &mut H, node: &Node, depth: usize) -> Result<LiveId> {
        let renderer = self
            .renderer
            .as_ref()
            .ok_or(ReconcileError::RendererNotInitialized)?;
        renderer
            .materialize(host, node, depth)
            .map_err(|e| ReconcileError::Materialize {
                node: node.to_string(),
                reason: e.to_string(),
            })
    }

    /// Reuse the old live node for a same-typed tag or text node
    ///
    /// Children are reconciled only when either side declares any.
    pub(super) fn update_in_place(
        &self,
        session: &mut ReconcileSession,
        host: &mut H,
        old: &Node,
        new: &mut Node,
        depth: usize,
    ) -> Result<LiveId> {
        let live = live_ref(host, old)?;
        reject_text_props(new)?;
        new.set_live(live);

        let ops = match (old.node_type(), new.node_type()) {
            (NodeType::Text(before), NodeType::Text(after)) if before != after => {
                vec![PropOp::SetText {
                    content: after.clone(),
                }]
            }
            (NodeType::Text(_), NodeType::Text(_)) => Vec::new(),
            _ => diff_props(old.props(), new.props()),
        };
        if !ops.is_empty() {
            session.enqueue(
                Effect::update(live, ops)
                    .with_old(old.summary())
                    .with_new(new.summary()),
            );
        }

        if !old.children().is_empty() || !new.children().is_empty() {
            self.reconcile_children(
                session,
                host,
                live,
                old.children(),
                new.children_mut(),
                depth + 1,
            )?;
        }
        Ok(live)
    }

    /// Re-invoke a view function and replace the old live subtree with the result
    ///
    /// The previous expansion is never diffed. The old subtree is cleaned up
    /// and removed when the replacement commits.
    pub(super) fn rerender_component(
        &self,
        session: &mut ReconcileSession,
        host: &mut H,
        parent: LiveId,
        old: &Node,
        new: &mut Node,
        depth: usize,
    ) -> Result<LiveId> {
        let old_live = live_ref(host, old)?;
        if let Some(id) = old.component_id() {
            new.set_component_id(id.clone());
        }

        let live = self.mount(session, host, new, depth)?;
        debug!(
            component = module_path!(),
            op = "diff",
            session_id = session.id().as_str(),
            old_node = %old,
            new_node = %new,
            "re-rendered view function"
        );
        session.enqueue(
            Effect::replacement(live, parent, old_live)
                .with_old(old.summary())
                .with_new(new.summary()),
        );
        Ok(live)
    }
}

/// Text nodes render their content only
///
/// # Errors
///
/// `Materialize` when a text node declares props.
fn reject_text_props(node: &Node) -> Result<()> {
    if matches!(node.node_type(), NodeType::Text(_)) && !node.props().is_empty() {
        return Err(ReconcileError::Materialize {
            node: node.to_string(),
            reason: "text nodes take no props".to_string(),
        });
    }
    Ok(())
}

/// The live node an old Node owns
///
/// # Errors
///
/// `MissingLiveRef` when the Node was never reconciled or its live node is
/// gone from the tree.
pub(super) fn live_ref<H: LiveTree>(host: &H, node: &Node) -> Result<LiveId> {
    node.live()
        .filter(|id| host.contains(*id))
        .ok_or_else(|| ReconcileError::MissingLiveRef {
            node: node.to_string(),
        })
}
