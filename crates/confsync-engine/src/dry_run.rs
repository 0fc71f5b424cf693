//! Page store wrapper that performs no writes.
//!
//! Reads go to the wrapped store; writes are logged and answered with
//! fabricated pages and attachments, so a whole run can be previewed.

use std::cell::Cell;

use confsync_confluence::types::{AttachmentLinks, Body, Storage, Version};
use confsync_confluence::{Attachment, ConfluenceError, Page, PageStore};
use tracing::info;

/// Prefix of IDs handed out for pages that were never created.
pub const DRY_RUN_ID_PREFIX: &str = "dry-run-";

/// [`PageStore`] that forwards reads and fakes writes.
pub struct DryRunStore<'a, S: PageStore + ?Sized> {
    inner: &'a S,
    next_id: Cell<u32>,
    writes: Cell<usize>,
}

impl<'a, S: PageStore + ?Sized> DryRunStore<'a, S> {
    /// Wrap a store.
    pub fn new(inner: &'a S) -> Self {
        Self {
            inner,
            next_id: Cell::new(0),
            writes: Cell::new(0),
        }
    }

    /// Number of writes that were skipped.
    #[must_use]
    pub fn skipped_writes(&self) -> usize {
        self.writes.get()
    }

    fn fake_id(&self) -> String {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        format!("{DRY_RUN_ID_PREFIX}{id}")
    }

    fn skip(&self) {
        self.writes.set(self.writes.get() + 1);
    }
}

fn is_fake(id: &str) -> bool {
    id.starts_with(DRY_RUN_ID_PREFIX)
}

fn fake_page(id: String, title: &str, body: &str, version: u32) -> Page {
    Page {
        id,
        title: title.to_owned(),
        version: Version { number: version },
        body: Some(Body {
            storage: Some(Storage {
                value: body.to_owned(),
                representation: "storage".to_owned(),
            }),
        }),
    }
}

impl<S: PageStore + ?Sized> PageStore for DryRunStore<'_, S> {
    fn find_page_by_title(
        &self,
        space_key: &str,
        title: &str,
    ) -> Result<Option<Page>, ConfluenceError> {
        self.inner.find_page_by_title(space_key, title)
    }

    fn create_page(
        &self,
        _space_key: &str,
        title: &str,
        body: &str,
        parent_id: Option<&str>,
    ) -> Result<Page, ConfluenceError> {
        self.skip();
        info!(
            "[dry run] Would create page '{}' (parent: {})",
            title,
            parent_id.unwrap_or("none")
        );
        Ok(fake_page(self.fake_id(), title, body, 1))
    }

    fn update_page(
        &self,
        page_id: &str,
        title: &str,
        body: &str,
        version: u32,
    ) -> Result<Page, ConfluenceError> {
        self.skip();
        info!("[dry run] Would update page '{}' (id={})", title, page_id);
        Ok(fake_page(page_id.to_owned(), title, body, version + 1))
    }

    fn delete_page(&self, page_id: &str) -> Result<(), ConfluenceError> {
        self.skip();
        info!("[dry run] Would delete page {}", page_id);
        Ok(())
    }

    fn add_labels(&self, page_id: &str, labels: &[String]) -> Result<(), ConfluenceError> {
        self.skip();
        info!(
            "[dry run] Would add labels [{}] to page {}",
            labels.join(", "),
            page_id
        );
        Ok(())
    }

    fn find_attachment(
        &self,
        page_id: &str,
        filename: &str,
    ) -> Result<Option<Attachment>, ConfluenceError> {
        if is_fake(page_id) {
            return Ok(None);
        }
        self.inner.find_attachment(page_id, filename)
    }

    fn upload_attachment(
        &self,
        page_id: &str,
        filename: &str,
        data: &[u8],
        _content_type: &str,
    ) -> Result<Attachment, ConfluenceError> {
        self.skip();
        info!(
            "[dry run] Would upload '{}' ({} bytes) to page {}",
            filename,
            data.len(),
            page_id
        );
        Ok(Attachment {
            id: self.fake_id(),
            title: filename.to_owned(),
            links: Some(AttachmentLinks { download: None }),
        })
    }

    fn download_attachment(&self, attachment: &Attachment) -> Result<Vec<u8>, ConfluenceError> {
        if is_fake(&attachment.id) {
            return Err(ConfluenceError::UnexpectedResponse(format!(
                "attachment {} was not uploaded in dry run",
                attachment.id
            )));
        }
        self.inner.download_attachment(attachment)
    }
}
