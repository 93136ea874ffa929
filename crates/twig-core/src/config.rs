//! Reconciler configuration

use serde::{Deserialize, Serialize};

/// Environment variable selecting the error mode
pub const MODE_ENV_VAR: &str = "TWIG_MODE";

/// How a failed top-level `diff` is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorMode {
    /// Log the failure with its tree context, then return it
    Diagnostic,
    /// Clear the parent's live content and mount the new tree from scratch once
    Production,
}

impl Default for ErrorMode {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            ErrorMode::Diagnostic
        } else {
            ErrorMode::Production
        }
    }
}

impl ErrorMode {
    /// Parse a mode name, case-insensitively
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "diagnostic" | "development" => Some(ErrorMode::Diagnostic),
            "production" => Some(ErrorMode::Production),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileConfig {
    pub mode: ErrorMode,
}

impl ReconcileConfig {
    pub fn with_mode(mut self, mode: ErrorMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn diagnostic() -> Self {
        Self::default().with_mode(ErrorMode::Diagnostic)
    }

    pub fn production() -> Self {
        Self::default().with_mode(ErrorMode::Production)
    }

    /// Read the mode from `TWIG_MODE`, falling back to the build default
    pub fn from_env() -> Self {
        Self::from_env_value(std::env::var(MODE_ENV_VAR).ok().as_deref())
    }

    pub fn from_env_value(value: Option<&str>) -> Self {
        match value {
            None => Self::default(),
            Some(raw) => match ErrorMode::parse(raw) {
                Some(mode) => Self::default().with_mode(mode),
                None => {
                    tracing::warn!(
                        component = module_path!(),
                        value = raw,
                        "unknown {}; using default mode",
                        MODE_ENV_VAR
                    );
                    Self::default()
                }
            },
        }
    }
}
