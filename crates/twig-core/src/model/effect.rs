use serde::{Deserialize, Serialize};

use super::node::{Node, NodeType};
use crate::live::LiveId;
use crate::reconcile::props::PropOp;

/// Kind of a deferred mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectTag {
    /// Insert or move a live node, optionally replacing another
    Placement,
    /// Apply prop operations to a live node in place
    Update,
    /// Tear down and detach a live node
    Deletion,
}

impl EffectTag {
    pub const ALL: [EffectTag; 3] = [EffectTag::Placement, EffectTag::Update, EffectTag::Deletion];

    pub fn code(&self) -> &'static str {
        match self {
            EffectTag::Placement => "PLACEMENT",
            EffectTag::Update => "UPDATE",
            EffectTag::Deletion => "DELETION",
        }
    }
}

impl std::fmt::Display for EffectTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Back-reference to the Node an effect was derived from
///
/// Nodes are discarded after the pass that produced them, so effects keep a
/// plain description instead of borrowing the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSummary {
    pub kind: String,
    pub key: Option<String>,
    pub live: Option<LiveId>,
}

impl NodeSummary {
    pub fn of(node: &Node) -> Self {
        let kind = match node.node_type() {
            NodeType::Tag(tag) => format!("<{}>", tag),
            NodeType::Text(content) => format!("{:?}", content),
            NodeType::Component(view) => format!("<{}/>", view.name()),
        };
        Self {
            kind,
            key: node.key().map(str::to_string),
            live: node.live(),
        }
    }
}

impl std::fmt::Display for NodeSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.kind)?;
        if let Some(key) = &self.key {
            write!(f, " key={}", key)?;
        }
        if let Some(live) = self.live {
            write!(f, " @{}", live)?;
        }
        Ok(())
    }
}

/// An intent to mutate the live tree, recorded during diff and applied at commit
#[derive(Debug, Clone, PartialEq)]
pub struct Effect {
    pub tag: EffectTag,
    pub target: LiveId,
    pub parent: Option<LiveId>,
    /// Insert before this sibling; `None` appends
    pub before: Option<LiveId>,
    /// Live node the target takes the place of
    pub replaces: Option<LiveId>,
    /// Prop operations carried by an Update
    pub ops: Vec<PropOp>,
    pub old: Option<NodeSummary>,
    pub new: Option<NodeSummary>,
}

impl Effect {
    fn new(tag: EffectTag, target: LiveId) -> Self {
        Self {
            tag,
            target,
            parent: None,
            before: None,
            replaces: None,
            ops: Vec::new(),
            old: None,
            new: None,
        }
    }

    /// Insert `target` under `parent` before `before`, moving it if already attached
    pub fn placement(target: LiveId, parent: LiveId, before: Option<LiveId>) -> Self {
        Self {
            parent: Some(parent),
            before,
            ..Self::new(EffectTag::Placement, target)
        }
    }

    /// Put `target` where `replaced` is, then remove `replaced`
    pub fn replacement(target: LiveId, parent: LiveId, replaced: LiveId) -> Self {
        Self {
            parent: Some(parent),
            replaces: Some(replaced),
            ..Self::new(EffectTag::Placement, target)
        }
    }

    pub fn update(target: LiveId, ops: Vec<PropOp>) -> Self {
        Self {
            ops,
            ..Self::new(EffectTag::Update, target)
        }
    }

    pub fn deletion(target: LiveId, parent: LiveId) -> Self {
        Self {
            parent: Some(parent),
            ..Self::new(EffectTag::Deletion, target)
        }
    }

    pub fn with_old(mut self, old: NodeSummary) -> Self {
        self.old = Some(old);
        self
    }

    pub fn with_new(mut self, new: NodeSummary) -> Self {
        self.new = Some(new);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effect_tag_codes_are_distinct() {
        let codes: Vec<_> = EffectTag::ALL.iter().map(EffectTag::code).collect();
        assert_eq!(codes, vec!["PLACEMENT", "UPDATE", "DELETION"]);
    }

    #[test]
    fn test_replacement_is_a_placement() {
        let effect = Effect::replacement(LiveId::from_index(3), LiveId::from_index(0), LiveId::from_index(1));
        assert_eq!(effect.tag, EffectTag::Placement);
        assert_eq!(effect.replaces, Some(LiveId::from_index(1)));
        assert_eq!(effect.before, None);
    }

    #[test]
    fn test_summary_display() {
        let node = Node::tag("li").with_key("a");
        assert_eq!(node.summary().to_string(), "<li> key=a");
        assert_eq!(Node::text("hi").summary().to_string(), "\"hi\"");
    }
}
