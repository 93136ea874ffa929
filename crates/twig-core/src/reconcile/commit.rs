use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use twig_core_types::schema;

use super::props::apply_prop_ops;
use super::{ReconcileSession, Reconciler};
use crate::errors::{ExError, ReconcileError, Result};
use crate::live::{LiveId, LiveTree};
use crate::model::{Effect, EffectTag};
use crate::{log_op_end, log_op_start};

/// What one `commit_root` applied
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitReport {
    pub deletions: usize,
    pub placements: usize,
    pub updates: usize,
    /// Effects that could not be applied and were logged instead
    pub skipped: usize,
}

impl CommitReport {
    pub fn applied(&self) -> usize {
        self.deletions + self.placements + self.updates
    }

    fn record(&mut self, tag: EffectTag) {
        match tag {
            EffectTag::Placement => self.placements += 1,
            EffectTag::Update => self.updates += 1,
            EffectTag::Deletion => self.deletions += 1,
        }
    }
}

impl<H: LiveTree> Reconciler<H> {
    /// Apply every effect recorded in `session`, then leave it empty
    ///
    /// All deletions are applied before any other effect, whatever the
    /// enqueue order; the rest follow in enqueue order. An effect that does
    /// not fit the live tree is logged and skipped, and the remaining
    /// effects are still applied.
    pub fn commit_root(&self, session: &mut ReconcileSession, host: &mut H) -> CommitReport {
        let start = Instant::now();
        let (deletions, effects) = session.take();
        log_op_start!(
            "commit_root",
            session_id = session.id().as_str(),
            deletions = deletions.len(),
            effects = effects.len()
        );

        let mut report = CommitReport::default();
        for effect in deletions.iter().chain(effects.iter()) {
            match self.commit_effect(host, effect) {
                Ok(()) => report.record(effect.tag),
                Err(err) => {
                    report.skipped += 1;
                    let ex = ExError::from(&err);
                    error!(
                        component = module_path!(),
                        op = "commit_root",
                        event = schema::EVENT_INCONSISTENT,
                        session_id = session.id().as_str(),
                        effect = %effect.tag,
                        live_id = %effect.target,
                        err_kind = ?ex.kind(),
                        err_code = ex.code(),
                        error = %err,
                        "skipping effect"
                    );
                }
            }
        }

        log_op_end!(
            "commit_root",
            duration_ms = start.elapsed().as_millis() as u64,
            session_id = session.id().as_str(),
            deletions = report.deletions,
            placements = report.placements,
            updates = report.updates,
            skipped = report.skipped
        );
        report
    }

    fn commit_effect(&self, host: &mut H, effect: &Effect) -> Result<()> {
        match effect.tag {
            EffectTag::Deletion => self.commit_deletion(host, effect),
            EffectTag::Placement => match effect.replaces {
                Some(replaced) => self.commit_replacement(host, effect, replaced),
                None => commit_placement(host, effect),
            },
            EffectTag::Update => commit_update(host, effect),
        }
    }

    /// Cleanup runs while the node is still attached
    fn commit_deletion(&self, host: &mut H, effect: &Effect) -> Result<()> {
        let parent = require_parent(host, effect)?;
        require_live(host, effect, effect.target)?;
        if effect.replaces.is_some() || !effect.ops.is_empty() {
            return Err(inconsistent(effect, "deletion carries placement or update payload"));
        }
        if host.parent(effect.target) != Some(parent) {
            return Err(inconsistent(effect, format!("not a child of {}", parent)));
        }

        self.cleanup.cleanup(host, effect.target);
        host.remove_child(parent, effect.target)?;
        Ok(())
    }

    /// Insert the new node before the replaced one in its actual parent, then remove it
    fn commit_replacement(&self, host: &mut H, effect: &Effect, replaced: LiveId) -> Result<()> {
        let parent = require_parent(host, effect)?;
        require_live(host, effect, effect.target)?;
        require_live(host, effect, replaced)?;
        if !effect.ops.is_empty() {
            return Err(inconsistent(effect, "placement carries prop ops"));
        }

        self.cleanup.cleanup(host, replaced);
        match host.parent(replaced) {
            Some(actual) => {
                if actual != parent {
                    warn!(
                        component = module_path!(),
                        op = "commit_root",
                        expected = %parent,
                        actual = %actual,
                        live_id = %replaced,
                        "replaced node moved; replacing under its current parent"
                    );
                }
                host.insert_before(actual, effect.target, Some(replaced))?;
                host.remove_child(actual, replaced)?;
            }
            None => {
                warn!(
                    component = module_path!(),
                    op = "commit_root",
                    parent = %parent,
                    live_id = %replaced,
                    "replaced node is detached; appending replacement"
                );
                host.append_child(parent, effect.target)?;
            }
        }
        Ok(())
    }
}

fn commit_placement<H: LiveTree>(host: &mut H, effect: &Effect) -> Result<()> {
    let parent = require_parent(host, effect)?;
    require_live(host, effect, effect.target)?;
    if !effect.ops.is_empty() {
        return Err(inconsistent(effect, "placement carries prop ops"));
    }

    let before = match effect.before {
        Some(anchor) if host.parent(anchor) == Some(parent) => Some(anchor),
        Some(anchor) => {
            warn!(
                component = module_path!(),
                op = "commit_root",
                parent = %parent,
                live_id = %effect.target,
                anchor = %anchor,
                "stale insertion anchor; appending"
            );
            None
        }
        None => None,
    };
    host.insert_before(parent, effect.target, before)?;
    Ok(())
}

fn commit_update<H: LiveTree>(host: &mut H, effect: &Effect) -> Result<()> {
    require_live(host, effect, effect.target)?;
    if effect.ops.is_empty() || effect.replaces.is_some() {
        return Err(inconsistent(effect, "update without prop ops"));
    }
    apply_prop_ops(host, effect.target, &effect.ops)?;
    Ok(())
}

fn require_parent<H: LiveTree>(host: &H, effect: &Effect) -> Result<LiveId> {
    let parent = effect
        .parent
        .ok_or_else(|| inconsistent(effect, "missing parent"))?;
    require_live(host, effect, parent)?;
    Ok(parent)
}

fn require_live<H: LiveTree>(host: &H, effect: &Effect, id: LiveId) -> Result<()> {
    if host.contains(id) {
        Ok(())
    } else {
        Err(inconsistent(effect, format!("live node {} does not exist", id)))
    }
}

fn inconsistent(effect: &Effect, reason: impl Into<String>) -> ReconcileError {
    ReconcileError::InconsistentEffect {
        tag: effect.tag,
        target: effect.target,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReconcileConfig;
    use crate::live::MemoryDom;
    use crate::renderer::DefaultRenderer;

    fn reconciler() -> Reconciler<MemoryDom> {
        Reconciler::new(ReconcileConfig::diagnostic()).with_renderer(DefaultRenderer)
    }

    #[test]
    fn test_deletions_commit_before_placements() {
        let mut dom = MemoryDom::new();
        let root = dom.create_element("ul");
        let old = dom.create_element("li");
        dom.append_child(root, old).unwrap();
        let fresh = dom.create_element("li");

        let mut session = ReconcileSession::new();
        session.enqueue(Effect::placement(fresh, root, None));
        session.enqueue(Effect::deletion(old, root));

        let report = reconciler().commit_root(&mut session, &mut dom);

        assert_eq!(report.deletions, 1);
        assert_eq!(report.placements, 1);
        assert_eq!(dom.children(root), vec![fresh]);
        assert!(session.is_empty());
    }

    #[test]
    fn test_inconsistent_effect_is_skipped() {
        let mut dom = MemoryDom::new();
        let root = dom.create_element("div");
        let child = dom.create_element("p");
        let stray = LiveId::from_index(99);

        let mut session = ReconcileSession::new();
        session.enqueue(Effect::deletion(child, root));
        session.enqueue(Effect::placement(stray, root, None));
        session.enqueue(Effect::placement(child, root, None));

        let report = reconciler().commit_root(&mut session, &mut dom);

        assert_eq!(report.skipped, 2);
        assert_eq!(report.placements, 1);
        assert_eq!(dom.children(root), vec![child]);
    }

    #[test]
    fn test_stale_anchor_appends() {
        let mut dom = MemoryDom::new();
        let root = dom.create_element("div");
        let first = dom.create_element("a");
        dom.append_child(root, first).unwrap();
        let elsewhere = dom.create_element("b");
        let fresh = dom.create_element("c");

        let mut session = ReconcileSession::new();
        session.enqueue(Effect::placement(fresh, root, Some(elsewhere)));
        let report = reconciler().commit_root(&mut session, &mut dom);

        assert_eq!(report.skipped, 0);
        assert_eq!(dom.children(root), vec![first, fresh]);
    }

    #[test]
    fn test_update_without_ops_is_inconsistent() {
        let mut dom = MemoryDom::new();
        let el = dom.create_element("div");
        let mut session = ReconcileSession::new();
        session.enqueue(Effect::update(el, Vec::new()));
        let report = reconciler().commit_root(&mut session, &mut dom);
        assert_eq!(report, CommitReport { skipped: 1, ..Default::default() });
    }
}
