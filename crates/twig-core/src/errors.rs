use crate::live::{LiveId, LiveTreeError};
use crate::model::EffectTag;
use thiserror::Error;

/// Result type alias using ReconcileError
pub type Result<T> = std::result::Result<T, ReconcileError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, log assertions, and host-facing reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Preconditions
    ParentNotFound,
    MissingLiveRef,
    RendererNotInitialized,

    // Materialization
    Materialization,

    // Reconciliation
    HostRejected,
    RecoveryFailed,

    // Commit
    InconsistentEffect,

    // Snapshots
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::ParentNotFound => "ERR_PARENT_NOT_FOUND",
            ExErrorKind::MissingLiveRef => "ERR_MISSING_LIVE_REF",
            ExErrorKind::RendererNotInitialized => "ERR_RENDERER_NOT_INITIALIZED",
            ExErrorKind::Materialization => "ERR_MATERIALIZATION",
            ExErrorKind::HostRejected => "ERR_HOST_REJECTED",
            ExErrorKind::RecoveryFailed => "ERR_RECOVERY_FAILED",
            ExErrorKind::InconsistentEffect => "ERR_INCONSISTENT_EFFECT",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Whether this kind is a precondition violation (never recovered)
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            ExErrorKind::ParentNotFound
                | ExErrorKind::MissingLiveRef
                | ExErrorKind::RendererNotInitialized
        )
    }
}

/// Canonical structured error type
///
/// Classification fields for programmatic handling plus the tree position
/// the failure was observed at.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    node: Option<String>,
    live_id: Option<LiveId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            node: None,
            live_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add node description context
    pub fn with_node(mut self, node: impl Into<String>) -> Self {
        self.node = Some(node.into());
        self
    }

    /// Add live node context
    pub fn with_live_id(mut self, live_id: LiveId) -> Self {
        self.live_id = Some(live_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the node description context, if any
    pub fn node(&self) -> Option<&str> {
        self.node.as_deref()
    }

    /// Get the live node context, if any
    pub fn live_id(&self) -> Option<LiveId> {
        self.live_id
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(node) = &self.node {
            write!(f, " (node: {})", node)?;
        }
        if let Some(live_id) = self.live_id {
            write!(f, " (live_id: {})", live_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|s| s as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Error taxonomy for reconciliation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReconcileError {
    // ===== Preconditions =====
    /// The parent live node passed to `diff` does not exist in the live tree
    #[error("Parent live node not found: {parent}")]
    ParentNotFound { parent: LiveId },

    /// A reused node carries no live reference, or references a node the
    /// live tree no longer holds
    #[error("Node has no usable live reference: {node}")]
    MissingLiveRef { node: String },

    /// `diff` needed to materialize a node before a renderer was installed
    #[error("No renderer installed; call init_renderer first")]
    RendererNotInitialized,

    // ===== Materialization =====
    /// The renderer adapter rejected a node
    #[error("Failed to materialize {node}: {reason}")]
    Materialize { node: String, reason: String },

    // ===== Reconciliation =====
    /// The live tree rejected a mutation
    #[error("Live tree rejected mutation: {0}")]
    Host(#[from] LiveTreeError),

    /// Production-mode recovery failed after the original failure
    #[error("Recovery failed: {secondary} (original failure: {original})")]
    RecoveryFailed {
        original: Box<ReconcileError>,
        secondary: Box<ReconcileError>,
    },

    // ===== Commit =====
    /// A queued effect does not match the live tree it is committed against
    #[error("Inconsistent {tag} effect on {target}: {reason}")]
    InconsistentEffect {
        tag: EffectTag,
        target: LiveId,
        reason: String,
    },

    // ===== Internal =====
    /// Serialization error
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ReconcileError {
    /// Precondition violations are raised immediately in every mode
    pub fn is_precondition(&self) -> bool {
        ExError::from(self).kind().is_precondition()
    }
}

impl From<&ReconcileError> for ExError {
    fn from(err: &ReconcileError) -> Self {
        match err {
            ReconcileError::ParentNotFound { parent } => ExError::new(ExErrorKind::ParentNotFound)
                .with_live_id(*parent)
                .with_message("Parent live node not found"),

            ReconcileError::MissingLiveRef { node } => ExError::new(ExErrorKind::MissingLiveRef)
                .with_node(node.clone())
                .with_message("Reused node has no usable live reference"),

            ReconcileError::RendererNotInitialized => {
                ExError::new(ExErrorKind::RendererNotInitialized)
                    .with_message("No renderer installed")
            }

            ReconcileError::Materialize { node, reason } => {
                ExError::new(ExErrorKind::Materialization)
                    .with_node(node.clone())
                    .with_message(reason.clone())
            }

            ReconcileError::Host(source) => {
                let ex = ExError::new(ExErrorKind::HostRejected).with_message(source.to_string());
                match source.live_id() {
                    Some(id) => ex.with_live_id(id),
                    None => ex,
                }
            }

            ReconcileError::RecoveryFailed {
                original,
                secondary,
            } => ExError::new(ExErrorKind::RecoveryFailed)
                .with_op("recover")
                .with_message(secondary.to_string())
                .with_source(ExError::from(original.as_ref())),

            ReconcileError::InconsistentEffect {
                tag,
                target,
                reason,
            } => ExError::new(ExErrorKind::InconsistentEffect)
                .with_op("commit_root")
                .with_live_id(*target)
                .with_message(format!("{} effect: {}", tag, reason)),

            ReconcileError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message.clone())
            }

            ReconcileError::Internal { message } => {
                ExError::new(ExErrorKind::Internal).with_message(message.clone())
            }
        }
    }
}

impl From<ReconcileError> for ExError {
    fn from(err: ReconcileError) -> Self {
        ExError::from(&err)
    }
}

/// Conversion from serde_json::Error to ReconcileError
impl From<serde_json::Error> for ReconcileError {
    fn from(err: serde_json::Error) -> Self {
        ReconcileError::Serialization {
            message: err.to_string(),
        }
    }
}
