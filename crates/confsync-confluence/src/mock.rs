//! Mock page store implementation for testing.
//!
//! Provides [`MockPageStore`] for unit testing without a Confluence server.

use std::collections::{BTreeMap, HashSet};
use std::sync::RwLock;

use crate::error::ConfluenceError;
use crate::store::PageStore;
use crate::types::{Attachment, AttachmentLinks, Body, Page, Storage, Version};

/// A call recorded by [`MockPageStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    /// `find_page_by_title`
    FindPage {
        /// Requested title.
        title: String,
    },
    /// `create_page`
    CreatePage {
        /// Title of the new page.
        title: String,
        /// Parent page, if any.
        parent_id: Option<String>,
    },
    /// `update_page`
    UpdatePage {
        /// Updated page.
        page_id: String,
        /// Version the caller read before updating.
        version: u32,
    },
    /// `delete_page`
    DeletePage {
        /// Deleted page.
        page_id: String,
    },
    /// `add_labels`
    AddLabels {
        /// Labelled page.
        page_id: String,
        /// Labels added.
        labels: Vec<String>,
    },
    /// `find_attachment`
    FindAttachment {
        /// Page searched.
        page_id: String,
        /// Requested filename.
        filename: String,
    },
    /// `upload_attachment`
    UploadAttachment {
        /// Target page.
        page_id: String,
        /// Attachment filename.
        filename: String,
    },
    /// `download_attachment`
    DownloadAttachment {
        /// Downloaded attachment.
        attachment_id: String,
    },
}

impl StoreCall {
    /// Whether this call modifies the store.
    #[must_use]
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Self::CreatePage { .. }
                | Self::UpdatePage { .. }
                | Self::DeletePage { .. }
                | Self::AddLabels { .. }
                | Self::UploadAttachment { .. }
        )
    }
}

/// A page held by [`MockPageStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockPage {
    /// Page ID.
    pub id: String,
    /// Space the page lives in.
    pub space_key: String,
    /// Page title.
    pub title: String,
    /// Storage-format body.
    pub body: String,
    /// Current version number.
    pub version: u32,
    /// Parent page ID.
    pub parent_id: Option<String>,
    /// Labels in the order they were added.
    pub labels: Vec<String>,
    /// Attachments with their data.
    pub attachments: Vec<(Attachment, Vec<u8>)>,
}

impl MockPage {
    fn to_page(&self) -> Page {
        Page {
            id: self.id.clone(),
            title: self.title.clone(),
            version: Version {
                number: self.version,
            },
            body: Some(Body {
                storage: Some(Storage {
                    value: self.body.clone(),
                    representation: "storage".to_owned(),
                }),
            }),
        }
    }
}

#[derive(Debug, Default)]
struct MockState {
    pages: BTreeMap<String, MockPage>,
    next_id: u64,
    calls: Vec<StoreCall>,
    failing_titles: HashSet<String>,
    failing_uploads: HashSet<String>,
    failing_deletes: HashSet<String>,
}

impl MockState {
    fn allocate_id(&mut self, prefix: &str) -> String {
        loop {
            self.next_id += 1;
            let id = format!("{prefix}-{}", self.next_id);
            let taken = self.pages.contains_key(&id)
                || self
                    .pages
                    .values()
                    .any(|p| p.attachments.iter().any(|(a, _)| a.id == id));
            if !taken {
                return id;
            }
        }
    }

    fn page_mut(&mut self, page_id: &str) -> Result<&mut MockPage, ConfluenceError> {
        self.pages.get_mut(page_id).ok_or_else(|| not_found(page_id))
    }
}

fn not_found(page_id: &str) -> ConfluenceError {
    ConfluenceError::HttpResponse {
        status: 404,
        body: format!("No content found with id: {page_id}"),
    }
}

fn injected(what: &str) -> ConfluenceError {
    ConfluenceError::HttpResponse {
        status: 500,
        body: format!("injected failure: {what}"),
    }
}

/// Mock page store for testing.
///
/// Holds pages in memory and records every call. Use the builder methods
/// to configure the mock with test data and injected failures.
///
/// # Example
///
/// ```ignore
/// use confsync_confluence::{MockPageStore, PageStore};
///
/// let store = MockPageStore::new("DOCS")
///     .with_page("1", "Home", "<p>Welcome</p>", None)
///     .fail_upload("broken.png");
///
/// let page = store.find_page_by_title("DOCS", "Home").unwrap();
/// ```
#[derive(Debug)]
pub struct MockPageStore {
    space_key: String,
    state: RwLock<MockState>,
}

impl MockPageStore {
    /// Create an empty store for the given space.
    #[must_use]
    pub fn new(space_key: impl Into<String>) -> Self {
        Self {
            space_key: space_key.into(),
            state: RwLock::new(MockState::default()),
        }
    }

    /// Add a page at version 1.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_page(
        self,
        id: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
        parent_id: Option<&str>,
    ) -> Self {
        let id = id.into();
        let page = MockPage {
            id: id.clone(),
            space_key: self.space_key.clone(),
            title: title.into(),
            body: body.into(),
            version: 1,
            parent_id: parent_id.map(str::to_owned),
            labels: Vec::new(),
            attachments: Vec::new(),
        };
        self.state.write().unwrap().pages.insert(id, page);
        self
    }

    /// Add an attachment to an existing page.
    ///
    /// # Panics
    ///
    /// Panics if the page does not exist or the internal lock is poisoned.
    #[must_use]
    pub fn with_attachment(self, page_id: &str, filename: &str, data: impl Into<Vec<u8>>) -> Self {
        {
            let mut state = self.state.write().unwrap();
            let id = state.allocate_id("att");
            let page = state.page_mut(page_id).unwrap();
            page.attachments
                .push((attachment(&id, page_id, filename), data.into()));
        }
        self
    }

    /// Make `create_page` and `update_page` fail for a title.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn fail_page(self, title: impl Into<String>) -> Self {
        self.state
            .write()
            .unwrap()
            .failing_titles
            .insert(title.into());
        self
    }

    /// Make `upload_attachment` fail for a filename.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn fail_upload(self, filename: impl Into<String>) -> Self {
        self.state
            .write()
            .unwrap()
            .failing_uploads
            .insert(filename.into());
        self
    }

    /// Make `delete_page` fail for a page ID.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn fail_delete(self, page_id: impl Into<String>) -> Self {
        self.state
            .write()
            .unwrap()
            .failing_deletes
            .insert(page_id.into());
        self
    }

    /// All calls recorded so far, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn calls(&self) -> Vec<StoreCall> {
        self.state.read().unwrap().calls.clone()
    }

    /// Calls that modified the store.
    #[must_use]
    pub fn write_calls(&self) -> Vec<StoreCall> {
        self.calls().into_iter().filter(StoreCall::is_write).collect()
    }

    /// Forget recorded calls.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn clear_calls(&self) {
        self.state.write().unwrap().calls.clear();
    }

    /// Snapshot of a page by ID.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn page(&self, page_id: &str) -> Option<MockPage> {
        self.state.read().unwrap().pages.get(page_id).cloned()
    }

    /// Snapshot of a page by title.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn page_by_title(&self, title: &str) -> Option<MockPage> {
        self.state
            .read()
            .unwrap()
            .pages
            .values()
            .find(|p| p.title == title)
            .cloned()
    }

    /// Number of pages in the store.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.state.read().unwrap().pages.len()
    }

    /// Data of an attachment on a page.
    #[must_use]
    pub fn attachment_data(&self, page_id: &str, filename: &str) -> Option<Vec<u8>> {
        self.page(page_id)?
            .attachments
            .into_iter()
            .find(|(a, _)| a.title == filename)
            .map(|(_, data)| data)
    }

    fn record(&self, call: StoreCall) {
        self.lock().calls.push(call);
    }

    fn lock(&self) -> std::sync::RwLockWriteGuard<'_, MockState> {
        self.state
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

fn attachment(id: &str, page_id: &str, filename: &str) -> Attachment {
    Attachment {
        id: id.to_owned(),
        title: filename.to_owned(),
        links: Some(AttachmentLinks {
            download: Some(format!("/download/attachments/{page_id}/{filename}")),
        }),
    }
}

impl PageStore for MockPageStore {
    fn find_page_by_title(
        &self,
        space_key: &str,
        title: &str,
    ) -> Result<Option<Page>, ConfluenceError> {
        self.record(StoreCall::FindPage {
            title: title.to_owned(),
        });
        Ok(self
            .lock()
            .pages
            .values()
            .find(|p| p.space_key == space_key && p.title == title)
            .map(MockPage::to_page))
    }

    fn create_page(
        &self,
        space_key: &str,
        title: &str,
        body: &str,
        parent_id: Option<&str>,
    ) -> Result<Page, ConfluenceError> {
        self.record(StoreCall::CreatePage {
            title: title.to_owned(),
            parent_id: parent_id.map(str::to_owned),
        });
        let mut state = self.lock();
        if state.failing_titles.contains(title) {
            return Err(injected(title));
        }
        if state
            .pages
            .values()
            .any(|p| p.space_key == space_key && p.title == title)
        {
            return Err(ConfluenceError::HttpResponse {
                status: 400,
                body: format!("A page with this title already exists: {title}"),
            });
        }
        if let Some(parent) = parent_id
            && !state.pages.contains_key(parent)
        {
            return Err(not_found(parent));
        }
        let id = state.allocate_id("page");
        let page = MockPage {
            id: id.clone(),
            space_key: space_key.to_owned(),
            title: title.to_owned(),
            body: body.to_owned(),
            version: 1,
            parent_id: parent_id.map(str::to_owned),
            labels: Vec::new(),
            attachments: Vec::new(),
        };
        let created = page.to_page();
        state.pages.insert(id, page);
        Ok(created)
    }

    fn update_page(
        &self,
        page_id: &str,
        title: &str,
        body: &str,
        version: u32,
    ) -> Result<Page, ConfluenceError> {
        self.record(StoreCall::UpdatePage {
            page_id: page_id.to_owned(),
            version,
        });
        let mut state = self.lock();
        if state.failing_titles.contains(title) {
            return Err(injected(title));
        }
        let page = state.page_mut(page_id)?;
        if page.version != version {
            return Err(ConfluenceError::HttpResponse {
                status: 409,
                body: format!(
                    "Version must be incremented on update. Current version is: {}",
                    page.version
                ),
            });
        }
        page.title = title.to_owned();
        page.body = body.to_owned();
        page.version += 1;
        Ok(page.to_page())
    }

    fn delete_page(&self, page_id: &str) -> Result<(), ConfluenceError> {
        self.record(StoreCall::DeletePage {
            page_id: page_id.to_owned(),
        });
        let mut state = self.lock();
        if state.failing_deletes.contains(page_id) {
            return Err(injected(page_id));
        }
        state
            .pages
            .remove(page_id)
            .map(|_| ())
            .ok_or_else(|| not_found(page_id))
    }

    fn add_labels(&self, page_id: &str, labels: &[String]) -> Result<(), ConfluenceError> {
        self.record(StoreCall::AddLabels {
            page_id: page_id.to_owned(),
            labels: labels.to_vec(),
        });
        let mut state = self.lock();
        let page = state.page_mut(page_id)?;
        for label in labels {
            if !page.labels.contains(label) {
                page.labels.push(label.clone());
            }
        }
        Ok(())
    }

    fn find_attachment(
        &self,
        page_id: &str,
        filename: &str,
    ) -> Result<Option<Attachment>, ConfluenceError> {
        self.record(StoreCall::FindAttachment {
            page_id: page_id.to_owned(),
            filename: filename.to_owned(),
        });
        let mut state = self.lock();
        let page = state.page_mut(page_id)?;
        Ok(page
            .attachments
            .iter()
            .find(|(a, _)| a.title == filename)
            .map(|(a, _)| a.clone()))
    }

    fn upload_attachment(
        &self,
        page_id: &str,
        filename: &str,
        data: &[u8],
        _content_type: &str,
    ) -> Result<Attachment, ConfluenceError> {
        self.record(StoreCall::UploadAttachment {
            page_id: page_id.to_owned(),
            filename: filename.to_owned(),
        });
        let mut state = self.lock();
        if state.failing_uploads.contains(filename) {
            return Err(injected(filename));
        }
        let id = state.allocate_id("att");
        let page = state.page_mut(page_id)?;
        if let Some((existing, existing_data)) =
            page.attachments.iter_mut().find(|(a, _)| a.title == filename)
        {
            *existing_data = data.to_vec();
            return Ok(existing.clone());
        }
        let created = attachment(&id, page_id, filename);
        page.attachments.push((created.clone(), data.to_vec()));
        Ok(created)
    }

    fn download_attachment(&self, attachment: &Attachment) -> Result<Vec<u8>, ConfluenceError> {
        self.record(StoreCall::DownloadAttachment {
            attachment_id: attachment.id.clone(),
        });
        self.lock()
            .pages
            .values()
            .flat_map(|p| p.attachments.iter())
            .find(|(a, _)| a.id == attachment.id)
            .map(|(_, data)| data.clone())
            .ok_or_else(|| not_found(&attachment.id))
    }
}
