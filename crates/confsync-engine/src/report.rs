//! Outcome of a sync run.

use std::collections::BTreeMap;

/// What happened to a folder's page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAction {
    /// Page did not exist and was created.
    Created,
    /// Page body was replaced.
    Updated,
    /// Page body already matched.
    Unchanged,
}

/// What happened to the page of a folder that no longer exists locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Removal {
    /// Page was deleted.
    Deleted,
    /// Page is still used by a synced folder or as an ancestor and was kept.
    Retained,
    /// Deleting the page failed.
    Failed(String),
}

/// Per-folder result of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderOutcome {
    /// Folder was synchronized to a page.
    Synced {
        /// Page ID.
        page_id: String,
        /// Action taken on the page.
        action: PageAction,
    },
    /// Synchronizing the folder failed; its previous page mapping is kept.
    Failed {
        /// Page ID from the previous run, if any.
        previous_id: Option<String>,
        /// Error message.
        error: String,
    },
    /// Folder was removed locally.
    Removed {
        /// Page ID from the previous run.
        page_id: String,
        /// What happened to the page.
        removal: Removal,
    },
}

/// An attachment that could not be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentFailure {
    /// Folder the attachment belongs to.
    pub folder: String,
    /// Attachment filename.
    pub filename: String,
    /// Error message.
    pub error: String,
}

/// Aggregated result of a sync run.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Outcome per folder path.
    pub outcomes: BTreeMap<String, FolderOutcome>,
    /// Number of attachments uploaded.
    pub attachments_uploaded: usize,
    /// Attachments that failed to upload.
    pub attachment_failures: Vec<AttachmentFailure>,
}

impl SyncReport {
    fn count(&self, predicate: impl Fn(&FolderOutcome) -> bool) -> usize {
        self.outcomes.values().filter(|o| predicate(o)).count()
    }

    /// Number of synced folders with the given action.
    #[must_use]
    pub fn synced(&self, action: PageAction) -> usize {
        self.count(|o| matches!(o, FolderOutcome::Synced { action: a, .. } if *a == action))
    }

    /// Number of folders that failed to sync.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, FolderOutcome::Failed { .. }))
    }

    /// Number of pages deleted.
    #[must_use]
    pub fn deleted(&self) -> usize {
        self.count(|o| {
            matches!(
                o,
                FolderOutcome::Removed {
                    removal: Removal::Deleted,
                    ..
                }
            )
        })
    }

    /// Number of pages that could not be deleted.
    #[must_use]
    pub fn deletion_failures(&self) -> usize {
        self.count(|o| {
            matches!(
                o,
                FolderOutcome::Removed {
                    removal: Removal::Failed(_),
                    ..
                }
            )
        })
    }

    /// Whether anything failed during the run.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failed() > 0 || self.deletion_failures() > 0 || !self.attachment_failures.is_empty()
    }

    pub(crate) fn record(&mut self, path: &str, outcome: FolderOutcome) {
        self.outcomes.insert(path.to_owned(), outcome);
    }
}
