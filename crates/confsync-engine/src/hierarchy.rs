//! Ancestor page resolution.
//!
//! Before a folder's page is written, every ancestor path prefix must map to
//! a remote page. Prefixes already synced this run are taken from the
//! [`HierarchyCache`](crate::HierarchyCache); others are looked up by their
//! derived title, and created as placeholder pages when missing.

use confsync_confluence::PageStore;
use tracing::{debug, info};

use crate::context::RunContext;
use crate::error::FolderError;
use crate::settings::SyncSettings;
use crate::title::format_title;

/// Body of pages created for ancestors without a folder of their own.
pub const PLACEHOLDER_BODY: &str = "<p>(placeholder)</p>";

/// Resolves ancestor segments to the ID of the direct parent page.
pub struct HierarchyResolver<'a, S: PageStore + ?Sized> {
    store: &'a S,
    settings: &'a SyncSettings,
    ctx: &'a mut RunContext,
}

impl<'a, S: PageStore + ?Sized> HierarchyResolver<'a, S> {
    /// Create a resolver writing resolved prefixes into `ctx`.
    pub fn new(store: &'a S, settings: &'a SyncSettings, ctx: &'a mut RunContext) -> Self {
        Self {
            store,
            settings,
            ctx,
        }
    }

    /// Ensure every ancestor exists and return the direct parent's page ID.
    ///
    /// With no ancestors this is the configured default parent, which may be
    /// `None` (space root).
    pub fn resolve(&mut self, ancestors: &[&str]) -> Result<Option<String>, FolderError> {
        let mut parent_id = self.settings.default_parent_id.clone();
        let mut prefix = String::new();

        for segment in ancestors {
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(segment);

            if let Some(cached) = self.ctx.cache.get(&prefix) {
                parent_id = Some(cached.to_owned());
                continue;
            }

            let title = format_title(segment);
            self.ctx.claim_title(&title, &prefix)?;

            let page_id = match self
                .store
                .find_page_by_title(&self.settings.space_key, &title)?
            {
                Some(page) => {
                    self.ctx.check_owner(&page.id, &title, &prefix)?;
                    debug!("Ancestor '{}' resolved to page {}", prefix, page.id);
                    page.id
                }
                None => {
                    info!("Creating placeholder page '{}' for {}", title, prefix);
                    self.store
                        .create_page(
                            &self.settings.space_key,
                            &title,
                            PLACEHOLDER_BODY,
                            parent_id.as_deref(),
                        )?
                        .id
                }
            };

            self.ctx.cache.insert(prefix.clone(), page_id.clone());
            parent_id = Some(page_id);
        }

        Ok(parent_id)
    }
}
