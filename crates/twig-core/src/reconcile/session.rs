use twig_core_types::{SessionId, TraceId};

use crate::model::{Effect, EffectTag};

/// Effect queues for one diff/commit cycle
///
/// Owned by the caller and passed to every `diff` of the cycle and then to
/// `commit_root`, which drains it. Deletions are held apart from all other
/// effects so they can be committed first.
#[derive(Debug, Default)]
pub struct ReconcileSession {
    id: SessionId,
    trace_id: Option<TraceId>,
    deletions: Vec<Effect>,
    effects: Vec<Effect>,
}

/// Queue lengths at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Checkpoint {
    deletions: usize,
    effects: usize,
}

impl ReconcileSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }

    /// Pending deletions, in enqueue order
    pub fn deletions(&self) -> &[Effect] {
        &self.deletions
    }

    /// Pending placements and updates, in enqueue order
    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    pub fn count(&self, tag: EffectTag) -> usize {
        match tag {
            EffectTag::Deletion => self.deletions.len(),
            _ => self.effects.iter().filter(|e| e.tag == tag).count(),
        }
    }

    pub fn len(&self) -> usize {
        self.deletions.len() + self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deletions.is_empty() && self.effects.is_empty()
    }

    /// Record an effect; deletions go to their own queue
    pub fn enqueue(&mut self, effect: Effect) {
        match effect.tag {
            EffectTag::Deletion => self.deletions.push(effect),
            EffectTag::Placement | EffectTag::Update => self.effects.push(effect),
        }
    }

    pub(crate) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            deletions: self.deletions.len(),
            effects: self.effects.len(),
        }
    }

    /// Drop everything enqueued after `checkpoint`
    pub(crate) fn rollback(&mut self, checkpoint: Checkpoint) {
        self.deletions.truncate(checkpoint.deletions);
        self.effects.truncate(checkpoint.effects);
    }

    /// Drain both queues, deletions first
    pub(crate) fn take(&mut self) -> (Vec<Effect>, Vec<Effect>) {
        (
            std::mem::take(&mut self.deletions),
            std::mem::take(&mut self.effects),
        )
    }
}
