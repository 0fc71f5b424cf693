//! Per-run context shared by the hierarchy resolver and page synchronizer.
//!
//! A [`RunContext`] is created by the orchestrator at the start of a run and
//! dropped at its end. Nothing in it is persisted.

use std::collections::{HashMap, HashSet};

use crate::error::FolderError;
use crate::settings::SyncSettings;
use crate::state::SyncState;
use crate::tree::FolderTree;

/// Resolved page IDs keyed by joined folder path prefix.
#[derive(Debug, Default)]
pub struct HierarchyCache {
    pages: HashMap<String, String>,
}

impl HierarchyCache {
    /// Page ID resolved for a path prefix.
    #[must_use]
    pub fn get(&self, prefix: &str) -> Option<&str> {
        self.pages.get(prefix).map(String::as_str)
    }

    /// Record the page for a path prefix, replacing any earlier entry.
    pub fn insert(&mut self, prefix: impl Into<String>, page_id: impl Into<String>) {
        self.pages.insert(prefix.into(), page_id.into());
    }

    /// Whether any prefix resolved to the page ID.
    #[must_use]
    pub fn contains_page(&self, page_id: &str) -> bool {
        self.pages.values().any(|id| id == page_id)
    }
}

/// State of a single sync run.
#[derive(Debug, Default)]
pub struct RunContext {
    /// Pages resolved so far, by path prefix.
    pub cache: HierarchyCache,
    /// Title -> folder path that claimed it this run.
    claims: HashMap<String, String>,
    reserved: HashSet<String>,
    /// Page ID -> folder path, from the previous state.
    owners: HashMap<String, String>,
}

impl RunContext {
    /// Context for a run with the state page title reserved.
    #[must_use]
    pub fn new(settings: &SyncSettings) -> Self {
        let mut ctx = Self::default();
        ctx.reserved.insert(settings.state_page_title.clone());
        ctx
    }

    /// Remember which folder owned each page in the previous run.
    ///
    /// Only folders still present in `tree` keep ownership; pages of removed
    /// folders may be adopted by others.
    #[must_use]
    pub fn with_previous_owners(mut self, previous: &SyncState, tree: &FolderTree) -> Self {
        self.owners = previous
            .iter()
            .filter(|(path, _)| tree.contains(path))
            .map(|(path, page_id)| (page_id.to_owned(), path.to_owned()))
            .collect();
        self
    }

    /// Claim a page title for a folder path.
    ///
    /// Claiming the same title again for the same path succeeds.
    pub fn claim_title(&mut self, title: &str, path: &str) -> Result<(), FolderError> {
        if self.reserved.contains(title) {
            return Err(FolderError::ReservedTitle {
                title: title.to_owned(),
                path: path.to_owned(),
            });
        }
        match self.claims.get(title) {
            Some(owner) if owner != path => Err(FolderError::TitleConflict {
                title: title.to_owned(),
                path: path.to_owned(),
                owner: owner.clone(),
            }),
            Some(_) => Ok(()),
            None => {
                self.claims.insert(title.to_owned(), path.to_owned());
                Ok(())
            }
        }
    }

    /// Check that an existing page is not owned by a different folder.
    pub fn check_owner(&self, page_id: &str, title: &str, path: &str) -> Result<(), FolderError> {
        match self.owners.get(page_id) {
            Some(owner) if owner != path => Err(FolderError::TitleConflict {
                title: title.to_owned(),
                path: path.to_owned(),
                owner: owner.clone(),
            }),
            _ => Ok(()),
        }
    }
}
