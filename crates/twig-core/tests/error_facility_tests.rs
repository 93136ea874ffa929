//! Error Facility Tests
//!
//! Every domain error maps to a stable code through `ExError`.

use twig_core::{
    EffectTag, ExError, ExErrorKind, LiveId, LiveTreeError, ReconcileConfig, ReconcileError,
};

#[test]
fn test_every_variant_has_a_stable_code() {
    let id = LiveId::from_index(1);
    let cases = vec![
        (ReconcileError::ParentNotFound { parent: id }, "ERR_PARENT_NOT_FOUND"),
        (
            ReconcileError::MissingLiveRef {
                node: "<div>".into(),
            },
            "ERR_MISSING_LIVE_REF",
        ),
        (ReconcileError::RendererNotInitialized, "ERR_RENDERER_NOT_INITIALIZED"),
        (
            ReconcileError::Materialize {
                node: "<div>".into(),
                reason: "no".into(),
            },
            "ERR_MATERIALIZATION",
        ),
        (
            ReconcileError::Host(LiveTreeError::NotFound { id }),
            "ERR_HOST_REJECTED",
        ),
        (
            ReconcileError::InconsistentEffect {
                tag: EffectTag::Update,
                target: id,
                reason: "empty".into(),
            },
            "ERR_INCONSISTENT_EFFECT",
        ),
        (
            ReconcileError::Serialization {
                message: "x".into(),
            },
            "ERR_SERIALIZATION",
        ),
        (
            ReconcileError::Internal {
                message: "x".into(),
            },
            "ERR_INTERNAL",
        ),
    ];

    for (err, code) in cases {
        assert_eq!(ExError::from(&err).code(), code, "code for {}", err);
    }
}

#[test]
fn test_only_preconditions_are_preconditions() {
    assert!(ReconcileError::ParentNotFound {
        parent: LiveId::from_index(0)
    }
    .is_precondition());
    assert!(ReconcileError::RendererNotInitialized.is_precondition());
    assert!(!ReconcileError::Materialize {
        node: "<p>".into(),
        reason: "x".into()
    }
    .is_precondition());
    assert!(!ReconcileError::Host(LiveTreeError::NotFound {
        id: LiveId::from_index(0)
    })
    .is_precondition());
}

#[test]
fn test_host_error_carries_live_id() {
    let err = ReconcileError::Host(LiveTreeError::NotAChild {
        parent: LiveId::from_index(1),
        child: LiveId::from_index(2),
    });
    let ex: ExError = err.into();
    assert_eq!(ex.kind(), ExErrorKind::HostRejected);
    assert_eq!(ex.live_id(), Some(LiveId::from_index(2)));
    assert!(ex.to_string().contains("(live_id: #2)"));
}

#[test]
fn test_inconsistent_effect_names_tag_and_op() {
    let ex = ExError::from(ReconcileError::InconsistentEffect {
        tag: EffectTag::Deletion,
        target: LiveId::from_index(9),
        reason: "missing parent".into(),
    });
    assert_eq!(ex.op(), Some("commit_root"));
    assert_eq!(ex.message(), "DELETION effect: missing parent");
}

#[test]
fn test_config_from_env_value() {
    use twig_core::ErrorMode;
    assert_eq!(
        ReconcileConfig::from_env_value(Some("PRODUCTION")).mode,
        ErrorMode::Production
    );
    assert_eq!(
        ReconcileConfig::from_env_value(Some("nonsense")).mode,
        ErrorMode::default()
    );
}
