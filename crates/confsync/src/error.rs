//! CLI error types.

use confsync_config::ConfigError;
use confsync_confluence::ConfluenceError;
use confsync_engine::SyncError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Confluence(#[from] ConfluenceError),

    #[error("{0}")]
    Sync(#[from] SyncError),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Incomplete(String),
}
