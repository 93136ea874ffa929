//! Logging Facility Tests
//!
//! Structured events emitted by diff and commit, captured in memory.
//! Tests share one global capture, so each filters by its own session.

mod common;

use std::cell::Cell;
use std::rc::Rc;

use common::{keyed_list, new_dom, reconciler};
use tracing::Level;
use twig_core::logging_facility::test_capture::init_test_capture;
use twig_core::{log_op_end, log_op_error, log_op_start};
use twig_core::{
    DefaultRenderer, Effect, ErrorMode, LiveId, LiveTree, MaterializeError, MemoryDom, Node,
    ReconcileConfig, ReconcileError, ReconcileSession, Reconciler, Renderer,
};

#[test]
fn test_log_macros_emit_canonical_events() {
    let capture = init_test_capture();

    log_op_start!("macro_check");
    log_op_end!("macro_check", duration_ms = 5);
    let err = ReconcileError::RendererNotInitialized;
    log_op_error!("macro_check", &err, duration_ms = 6);

    capture.assert_event_exists("macro_check", "start");
    capture.assert_event_exists("macro_check", "end");
    let errors: Vec<_> = capture
        .events()
        .into_iter()
        .filter(|e| e.op.as_deref() == Some("macro_check") && e.event.as_deref() == Some("end_error"))
        .collect();
    assert!(!errors.is_empty());
    assert_eq!(errors[0].field("err_code"), Some("ERR_RENDERER_NOT_INITIALIZED"));
}

#[test]
fn test_diff_and_commit_log_start_and_end_with_session() {
    // GIVEN a capture and a fresh session
    let capture = init_test_capture();
    let (mut dom, root) = new_dom();
    let r = reconciler(ErrorMode::Diagnostic);
    let mut session = ReconcileSession::new();
    let mut tree = keyed_list(&["a"]);

    // WHEN a full cycle runs
    r.diff(&mut session, &mut dom, root, None, &mut tree, None)
        .unwrap();
    r.commit_root(&mut session, &mut dom);

    // THEN both operations log start and end under the session id
    let events = capture.for_session(session.id().as_str());
    let has = |op: &str, event: &str| {
        events
            .iter()
            .any(|e| e.op.as_deref() == Some(op) && e.event.as_deref() == Some(event))
    };
    assert!(has("diff", "start"));
    assert!(has("diff", "end"));
    assert!(has("commit_root", "start"));
    assert!(has("commit_root", "end"));

    let end = events
        .iter()
        .find(|e| e.op.as_deref() == Some("commit_root") && e.event.as_deref() == Some("end"))
        .unwrap();
    assert_eq!(end.field("placements"), Some("1"));
    assert_eq!(end.field("skipped"), Some("0"));
}

#[test]
fn test_diagnostic_failure_logs_context() {
    // GIVEN a renderer that always fails
    let capture = init_test_capture();
    let (mut dom, root) = new_dom();
    let r = Reconciler::new(ReconcileConfig::diagnostic()).with_renderer(
        |_: &mut MemoryDom, _: &Node, _: usize| -> Result<LiveId, MaterializeError> {
            Err(MaterializeError::rejected("nope"))
        },
    );
    let mut session = ReconcileSession::new();
    let mut tree = Node::tag("div");

    // WHEN a diff fails
    let result = r.diff(&mut session, &mut dom, root, None, &mut tree, None);
    assert!(result.is_err());

    // THEN an error with the new node and an end_error event are logged
    let events = capture.for_session(session.id().as_str());
    let context = events
        .iter()
        .find(|e| e.level == Level::ERROR && e.fields.contains_key("new_node") && e.event.is_none())
        .expect("context event");
    assert_eq!(context.field("err_code"), Some("ERR_MATERIALIZATION"));
    assert!(events
        .iter()
        .any(|e| e.op.as_deref() == Some("diff") && e.event.as_deref() == Some("end_error")));
}

#[test]
fn test_production_recovery_is_logged() {
    // GIVEN a production reconciler whose renderer refuses the first nested node
    let capture = init_test_capture();
    let (mut dom, root) = new_dom();
    let armed = Rc::new(Cell::new(true));
    let r = Reconciler::new(ReconcileConfig::production()).with_renderer(
        move |host: &mut MemoryDom, node: &Node, depth: usize| {
            if depth > 0 && armed.replace(false) {
                return Err(MaterializeError::rejected("first nested node refused"));
            }
            DefaultRenderer.materialize(host, node, depth)
        },
    );
    let mut tree = Node::tag("div").with_child(Node::tag("span"));
    let mut session = ReconcileSession::new();

    // WHEN the diff recovers
    let outcome = r
        .diff(&mut session, &mut dom, root, None, &mut tree, None)
        .unwrap();
    assert!(outcome.is_recovered());

    // THEN a recovered warning carries the original error code
    let events = capture.for_session(session.id().as_str());
    let recovered = events
        .iter()
        .find(|e| e.event.as_deref() == Some("recovered"))
        .expect("recovered event");
    assert_eq!(recovered.level, Level::WARN);
    assert_eq!(recovered.field("err_code"), Some("ERR_MATERIALIZATION"));

    // AND the diff still ends normally
    let end = events
        .iter()
        .find(|e| e.op.as_deref() == Some("diff") && e.event.as_deref() == Some("end"))
        .expect("end event");
    assert_eq!(end.field("recovered"), Some("true"));
}

#[test]
fn test_inconsistent_effect_is_logged_with_code() {
    let capture = init_test_capture();
    let mut dom = MemoryDom::new();
    let root = dom.create_element("root");
    let r = reconciler(ErrorMode::Diagnostic);
    let mut session = ReconcileSession::new();
    session.enqueue(Effect::deletion(LiveId::from_index(77), root));

    let report = r.commit_root(&mut session, &mut dom);

    assert_eq!(report.skipped, 1);
    let events = capture.for_session(session.id().as_str());
    let inconsistent = events
        .iter()
        .find(|e| e.event.as_deref() == Some("inconsistent"))
        .expect("inconsistent event");
    assert_eq!(inconsistent.level, Level::ERROR);
    assert_eq!(inconsistent.field("err_code"), Some("ERR_INCONSISTENT_EFFECT"));
}
