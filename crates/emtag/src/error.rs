//! CLI error types.

use emtag_config::ConfigError;
use emtag_core::RulerError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Ruler(#[from] RulerError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
