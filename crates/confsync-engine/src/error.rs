//! Error types for sync runs.

use confsync_confluence::ConfluenceError;
use confsync_docs::DocsError;

/// Error while synchronizing a single folder.
///
/// The orchestrator catches these per folder; the run continues.
#[derive(Debug, thiserror::Error)]
pub enum FolderError {
    /// Reading local content failed.
    #[error("failed to read folder content: {0}")]
    Content(#[from] DocsError),

    /// Confluence API error.
    #[error("Confluence API error: {0}")]
    Remote(#[from] ConfluenceError),

    /// Another folder already owns the page title.
    #[error("title '{title}' for {path} is already used by {owner}")]
    TitleConflict {
        /// Conflicting title.
        title: String,
        /// Folder that tried to use the title.
        path: String,
        /// Folder that owns the title.
        owner: String,
    },

    /// The title is reserved for the sync state page.
    #[error("title '{title}' for {path} is reserved for the sync state page")]
    ReservedTitle {
        /// Reserved title.
        title: String,
        /// Folder that tried to use the title.
        path: String,
    },
}

/// Error that aborts a whole sync run.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Folder discovery failed.
    #[error("failed to discover folders: {0}")]
    Discovery(#[source] DocsError),

    /// Loading the previous state failed.
    #[error("failed to load sync state: {0}")]
    StateLoad(#[source] ConfluenceError),

    /// Saving the new state failed.
    #[error("failed to save sync state: {0}")]
    StateSave(#[source] ConfluenceError),
}
