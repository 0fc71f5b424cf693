//! Full sync run: discover, synchronize, remove orphans, save state.

use std::collections::HashMap;

use confsync_confluence::PageStore;
use confsync_docs::DocsSource;
use tracing::{info, warn};

use crate::context::{HierarchyCache, RunContext};
use crate::error::SyncError;
use crate::report::{FolderOutcome, Removal, SyncReport};
use crate::settings::SyncSettings;
use crate::state::{StateStore, SyncState};
use crate::synchronizer::PageSynchronizer;
use crate::tree::FolderTree;

/// Drives sync runs of a document source into a page store.
pub struct Orchestrator<'a, S: PageStore + ?Sized, D: DocsSource + ?Sized> {
    store: &'a S,
    docs: &'a D,
    settings: &'a SyncSettings,
}

impl<'a, S: PageStore + ?Sized, D: DocsSource + ?Sized> Orchestrator<'a, S, D> {
    /// Create an orchestrator.
    pub fn new(store: &'a S, docs: &'a D, settings: &'a SyncSettings) -> Self {
        Self {
            store,
            docs,
            settings,
        }
    }

    /// Run one full reconciliation pass.
    ///
    /// Folders are synchronized parents first. A folder that fails keeps its
    /// previous page mapping; pages of folders that no longer exist are
    /// deleted. The new state is saved even when folders failed.
    ///
    /// # Errors
    ///
    /// Returns an error if folders cannot be discovered or the state cannot
    /// be loaded or saved. Per-folder failures are reported in the
    /// [`SyncReport`] instead.
    pub fn run(&self) -> Result<SyncReport, SyncError> {
        let discovered = self.docs.find_folders().map_err(SyncError::Discovery)?;
        let tree = FolderTree::from_paths(&discovered);
        info!("Discovered {} folder(s)", tree.len());

        let states = StateStore::new(self.store, self.settings);
        let previous = states.load().map_err(SyncError::StateLoad)?;

        let ctx = RunContext::new(self.settings).with_previous_owners(&previous, &tree);
        let mut synchronizer = PageSynchronizer::new(self.store, self.docs, self.settings, ctx);
        let mut report = SyncReport::default();
        let mut current = SyncState::default();

        for folder in tree.sync_order() {
            info!("Syncing {}", folder);
            match synchronizer.sync(&folder) {
                Ok(synced) => {
                    current.insert(folder.clone(), synced.page_id.clone());
                    report.attachments_uploaded += synced.attachments_uploaded;
                    report
                        .attachment_failures
                        .extend(synced.attachment_failures);
                    report.record(
                        &folder,
                        FolderOutcome::Synced {
                            page_id: synced.page_id,
                            action: synced.action,
                        },
                    );
                }
                Err(err) => {
                    warn!("Failed to sync {}: {}", folder, err);
                    let previous_id = previous.get(&folder).map(str::to_owned);
                    if let Some(page_id) = &previous_id {
                        current.insert(folder.clone(), page_id.clone());
                    }
                    report.record(
                        &folder,
                        FolderOutcome::Failed {
                            previous_id,
                            error: err.to_string(),
                        },
                    );
                }
            }
        }

        let resolved = &synchronizer.context().cache;
        self.remove_orphans(&previous, &tree, &current, resolved, &mut report);

        states.save(&current).map_err(SyncError::StateSave)?;
        Ok(report)
    }

    fn remove_orphans(
        &self,
        previous: &SyncState,
        tree: &FolderTree,
        current: &SyncState,
        resolved: &HierarchyCache,
        report: &mut SyncReport,
    ) {
        // One delete per page ID; later paths mapped to it share the result
        let mut removed: HashMap<&str, Removal> = HashMap::new();
        for (path, page_id) in previous.iter().filter(|(path, _)| !tree.contains(path)) {
            let removal = if current.contains_page(page_id) {
                info!("Keeping page {} of removed {}, now used by another folder", page_id, path);
                Removal::Retained
            } else if resolved.contains_page(page_id) {
                info!("Keeping page {} of removed {}, still an ancestor of synced pages", page_id, path);
                Removal::Retained
            } else if let Some(removal) = removed.get(page_id) {
                removal.clone()
            } else {
                let removal = match self.store.delete_page(page_id) {
                    Ok(()) => {
                        info!("Deleted page {} of removed {}", page_id, path);
                        Removal::Deleted
                    }
                    Err(err) => {
                        warn!("Failed to delete page {} of removed {}: {}", page_id, path, err);
                        Removal::Failed(err.to_string())
                    }
                };
                removed.insert(page_id, removal.clone());
                removal
            };
            report.record(
                path,
                FolderOutcome::Removed {
                    page_id: page_id.to_owned(),
                    removal,
                },
            );
        }
    }
}
