//! Single folder synchronization.

use std::path::Path;

use confsync_confluence::PageStore;
use confsync_docs::{AttachmentFile, DocsSource};
use tracing::{debug, info, warn};

use crate::context::RunContext;
use crate::error::FolderError;
use crate::hierarchy::HierarchyResolver;
use crate::report::{AttachmentFailure, PageAction};
use crate::settings::SyncSettings;
use crate::title::format_title;

/// Result of synchronizing one folder.
#[derive(Debug)]
pub struct PageSync {
    /// ID of the folder's page.
    pub page_id: String,
    /// Action taken on the page.
    pub action: PageAction,
    /// Number of attachments uploaded.
    pub attachments_uploaded: usize,
    /// Attachments that failed to upload.
    pub attachment_failures: Vec<AttachmentFailure>,
}

/// Synchronizes folders to pages, one at a time.
///
/// Owns the [`RunContext`] of the run so that ancestors resolved and pages
/// written for earlier folders are reused for later ones.
pub struct PageSynchronizer<'a, S: PageStore + ?Sized, D: DocsSource + ?Sized> {
    store: &'a S,
    docs: &'a D,
    settings: &'a SyncSettings,
    ctx: RunContext,
}

impl<'a, S: PageStore + ?Sized, D: DocsSource + ?Sized> PageSynchronizer<'a, S, D> {
    /// Create a synchronizer for one run.
    pub fn new(store: &'a S, docs: &'a D, settings: &'a SyncSettings, ctx: RunContext) -> Self {
        Self {
            store,
            docs,
            settings,
            ctx,
        }
    }

    /// Context of the run, with every page resolved so far.
    pub fn context(&self) -> &RunContext {
        &self.ctx
    }

    /// Synchronize a folder and return its page.
    ///
    /// The page is placed under the page of the nearest ancestor, creating
    /// placeholder pages for ancestors without one. Attachment upload
    /// failures are collected in the result; any other failure is returned.
    pub fn sync(&mut self, folder: &str) -> Result<PageSync, FolderError> {
        let content = self.docs.read_folder(folder)?;

        let segments: Vec<&str> = folder.split('/').filter(|s| !s.is_empty()).collect();
        let Some((name, ancestors)) = segments.split_last() else {
            return Err(confsync_docs::DocsError::UnknownFolder(folder.to_owned()).into());
        };
        let title = content
            .frontmatter
            .title
            .clone()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| format_title(name));
        self.ctx.claim_title(&title, folder)?;

        let parent_id =
            HierarchyResolver::new(self.store, self.settings, &mut self.ctx).resolve(ancestors)?;

        let (page_id, action) = match self
            .store
            .find_page_by_title(&self.settings.space_key, &title)?
        {
            Some(page) => {
                self.ctx.check_owner(&page.id, &title, folder)?;
                if page.storage_value().trim_end() == content.body.trim_end() {
                    debug!("Page '{}' is up to date", title);
                    (page.id, PageAction::Unchanged)
                } else {
                    info!("Updating page '{}' (id={})", title, page.id);
                    self.store
                        .update_page(&page.id, &title, &content.body, page.version.number)?;
                    (page.id, PageAction::Updated)
                }
            }
            None => {
                info!("Creating page '{}'", title);
                let page = self.store.create_page(
                    &self.settings.space_key,
                    &title,
                    &content.body,
                    parent_id.as_deref(),
                )?;
                (page.id, PageAction::Created)
            }
        };

        // Descendants attach to this page even when its title is overridden
        self.ctx.cache.insert(folder, page_id.clone());

        if !content.frontmatter.labels.is_empty() {
            self.store.add_labels(&page_id, &content.frontmatter.labels)?;
        }

        let mut result = PageSync {
            page_id,
            action,
            attachments_uploaded: 0,
            attachment_failures: Vec::new(),
        };
        for file in self.docs.list_attachments(folder)? {
            match self.upload(&result.page_id, &file) {
                Ok(()) => result.attachments_uploaded += 1,
                Err(err) => {
                    warn!("Failed to upload attachment '{}': {}", file.filename, err);
                    result.attachment_failures.push(AttachmentFailure {
                        folder: folder.to_owned(),
                        filename: file.filename.clone(),
                        error: err.to_string(),
                    });
                }
            }
        }
        Ok(result)
    }

    fn upload(&self, page_id: &str, file: &AttachmentFile) -> Result<(), FolderError> {
        let data = self.docs.read_attachment(file)?;
        self.store.upload_attachment(
            page_id,
            &file.filename,
            &data,
            content_type(&file.filename),
        )?;
        Ok(())
    }
}

/// MIME type for an attachment, guessed from its extension.
pub(crate) fn content_type(filename: &str) -> &'static str {
    let extension = Path::new(filename)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase());
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        Some("pdf") => "application/pdf",
        Some("json") => "application/json",
        Some("txt" | "md") => "text/plain",
        Some("csv") => "text/csv",
        _ => "application/octet-stream",
    }
}
