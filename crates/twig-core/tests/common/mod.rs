use std::cell::RefCell;
use std::rc::Rc;

use twig_core::{
    CommitReport, DefaultRenderer, DiffOutcome, ErrorMode, LiveId, LiveTree, MemoryDom, Node,
    ReconcileConfig, ReconcileSession, Reconciler,
};

/// Create an empty live tree with a single root element
#[allow(dead_code)]
pub fn new_dom() -> (MemoryDom, LiveId) {
    let mut dom = MemoryDom::new();
    let root = dom.create_element("root");
    (dom, root)
}

/// Reconciler with the default renderer and no cleanup hook
#[allow(dead_code)]
pub fn reconciler(mode: ErrorMode) -> Reconciler<MemoryDom> {
    Reconciler::new(ReconcileConfig::default().with_mode(mode)).with_renderer(DefaultRenderer)
}

/// Records every live node the cleanup hook is called with
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct CleanupLog(Rc<RefCell<Vec<LiveId>>>);

#[allow(dead_code)]
impl CleanupLog {
    pub fn calls(&self) -> Vec<LiveId> {
        self.0.borrow().clone()
    }

    /// Install on a reconciler
    pub fn attach(&self, reconciler: Reconciler<MemoryDom>) -> Reconciler<MemoryDom> {
        let log = self.0.clone();
        reconciler.with_cleanup(move |_: &MemoryDom, live: LiveId| log.borrow_mut().push(live))
    }
}

/// Run one diff/commit cycle and return its session for inspection
///
/// The session is inspected before commit drains it, so the returned tuple
/// holds counts taken at diff time.
#[allow(dead_code)]
pub fn cycle(
    reconciler: &Reconciler<MemoryDom>,
    dom: &mut MemoryDom,
    root: LiveId,
    old: Option<&Node>,
    new: &mut Node,
) -> (DiffOutcome, PendingCounts, CommitReport) {
    let mut session = ReconcileSession::new();
    let outcome = reconciler
        .diff(&mut session, dom, root, old, new, None)
        .expect("diff should succeed");
    let pending = PendingCounts::of(&session);
    let report = reconciler.commit_root(&mut session, dom);
    (outcome, pending, report)
}

/// Effect counts of a session before commit
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingCounts {
    pub placements: usize,
    pub updates: usize,
    pub deletions: usize,
}

impl PendingCounts {
    pub fn of(session: &ReconcileSession) -> Self {
        use twig_core::EffectTag;
        Self {
            placements: session.count(EffectTag::Placement),
            updates: session.count(EffectTag::Update),
            deletions: session.count(EffectTag::Deletion),
        }
    }
}

/// `<ul>` with one keyed `<li>` per key, each holding its key as text
#[allow(dead_code)]
pub fn keyed_list(keys: &[&str]) -> Node {
    Node::tag("ul").with_children(
        keys.iter()
            .map(|k| Node::tag("li").with_key(k).with_child(Node::text(*k))),
    )
}

/// Live nodes of the list items of a mounted list, by key
#[allow(dead_code)]
pub fn item_lives(list: &Node) -> Vec<(String, LiveId)> {
    list.children()
        .iter()
        .map(|c| {
            (
                c.key().unwrap_or_default().to_string(),
                c.live().expect("mounted child has a live node"),
            )
        })
        .collect()
}

/// Text of each live child of `parent`, in live order
#[allow(dead_code)]
pub fn child_texts(dom: &MemoryDom, parent: LiveId) -> Vec<String> {
    dom.children(parent)
        .into_iter()
        .map(|c| dom.text_content(c))
        .collect()
}
