//! Keyed reconciliation of one live parent's children
//!
//! Old and new children are matched through a key index (explicit key, else
//! position). Unmatched old children, and matched ones whose type changed,
//! are deleted. The new list is then walked in order, and each child's live
//! node is repaired into its slot against a simulated child list. This is
//! positional repair, not a minimal-move edit script: some permutations move
//! more nodes than strictly needed.

use std::collections::{HashMap, HashSet};

use tracing::warn;

use super::differ::live_ref;
use super::{ReconcileSession, Reconciler};
use crate::errors::Result;
use crate::live::{LiveId, LiveTree};
use crate::model::{Effect, Key, Node};

/// Key to sibling position, scoped to one pass
///
/// The first occurrence of a key owns it; later duplicates are shadowed.
#[derive(Debug, Default)]
pub(crate) struct KeyIndex {
    slots: HashMap<Key, usize>,
    duplicates: Vec<Key>,
}

impl KeyIndex {
    pub(crate) fn build(nodes: &[Node]) -> Self {
        let mut index = Self {
            slots: HashMap::with_capacity(nodes.len()),
            duplicates: Vec::new(),
        };
        for (i, node) in nodes.iter().enumerate() {
            let key = node.reconcile_key(i);
            if index.slots.contains_key(&key) {
                index.duplicates.push(key);
            } else {
                index.slots.insert(key, i);
            }
        }
        index
    }

    pub(crate) fn get(&self, key: &Key) -> Option<usize> {
        self.slots.get(key).copied()
    }

    /// Whether `slot` is the owner of `key`
    pub(crate) fn owns(&self, key: &Key, slot: usize) -> bool {
        self.get(key) == Some(slot)
    }

    pub(crate) fn duplicates(&self) -> &[Key] {
        &self.duplicates
    }
}

impl<H: LiveTree> Reconciler<H> {
    pub(super) fn reconcile_children(
        &self,
        session: &mut ReconcileSession,
        host: &mut H,
        parent: LiveId,
        old: &[Node],
        new: &mut [Node],
        depth: usize,
    ) -> Result<()> {
        let old_index = KeyIndex::build(old);
        let new_index = KeyIndex::build(new);
        for key in old_index.duplicates().iter().chain(new_index.duplicates()) {
            warn!(
                component = module_path!(),
                op = "diff",
                session_id = session.id().as_str(),
                parent = %parent,
                key = %key,
                "duplicate sibling key; later occurrences are not matched"
            );
        }

        // Unmatched old children, and matched ones whose type changed, go first
        let mut doomed = HashSet::new();
        for (i, child) in old.iter().enumerate() {
            let key = child.reconcile_key(i);
            if old_index.owns(&key, i) {
                if let Some(j) = new_index.get(&key) {
                    if child.node_type().same_type(new[j].node_type()) {
                        continue;
                    }
                }
            }
            if let Some(live) = child.live() {
                session.enqueue(Effect::deletion(live, parent).with_old(child.summary()));
                doomed.insert(live);
            }
        }

        // Children as the committer will see them once deletions are applied
        let mut slots = SlotCursor::new(
            host.children(parent)
                .into_iter()
                .filter(|id| !doomed.contains(id))
                .collect(),
        );

        for j in 0..new.len() {
            let key = new[j].reconcile_key(j);
            let matched = if new_index.owns(&key, j) {
                old_index
                    .get(&key)
                    .map(|i| &old[i])
                    .filter(|previous| previous.node_type().same_type(new[j].node_type()))
            } else {
                None
            };

            let live = match matched {
                Some(previous) if new[j].is_component() => {
                    let old_live = live_ref(host, previous)?;
                    let fresh = self.rerender_component(
                        session,
                        host,
                        parent,
                        previous,
                        &mut new[j],
                        depth,
                    )?;
                    slots.substitute(old_live, fresh);
                    fresh
                }
                Some(previous) => {
                    self.update_in_place(session, host, previous, &mut new[j], depth)?
                }
                None => self.mount(session, host, &mut new[j], depth)?,
            };

            if let Some(before) = slots.place(live) {
                session.enqueue(
                    Effect::placement(live, parent, before).with_new(new[j].summary()),
                );
            }
        }
        Ok(())
    }
}

/// Simulated child list of one parent, consumed front to back
///
/// Entries before the cursor are settled. The occupant of the next slot is
/// the first entry at or after the cursor that has not already been moved
/// ahead of it, so each child is looked at a bounded number of times.
struct SlotCursor {
    existing: Vec<LiveId>,
    positions: HashMap<LiveId, usize>,
    placed: HashSet<LiveId>,
    cursor: usize,
}

impl SlotCursor {
    fn new(existing: Vec<LiveId>) -> Self {
        let positions = existing
            .iter()
            .enumerate()
            .map(|(i, id)| (*id, i))
            .collect();
        Self {
            existing,
            positions,
            placed: HashSet::new(),
            cursor: 0,
        }
    }

    /// The node that will sit in the next slot unless something is placed before it
    fn occupant(&mut self) -> Option<LiveId> {
        while let Some(id) = self.existing.get(self.cursor) {
            if !self.placed.contains(id) {
                return Some(*id);
            }
            self.cursor += 1;
        }
        None
    }

    /// `fresh` takes the place of `old` when the replacement commits
    fn substitute(&mut self, old: LiveId, fresh: LiveId) {
        if let Some(pos) = self.positions.remove(&old) {
            self.existing[pos] = fresh;
            self.positions.insert(fresh, pos);
        }
    }

    /// Fill the next slot with `live`
    ///
    /// Returns `None` when `live` already occupies it. Otherwise `live` must be
    /// moved or inserted, and the returned anchor is the occupant it goes
    /// before (`Some(None)` to append).
    fn place(&mut self, live: LiveId) -> Option<Option<LiveId>> {
        let occupant = self.occupant();
        self.placed.insert(live);
        if occupant == Some(live) {
            self.cursor += 1;
            None
        } else {
            Some(occupant)
        }
    }
}
