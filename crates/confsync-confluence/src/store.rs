//! Page store abstraction.
//!
//! [`PageStore`] is the narrow interface the sync engine talks to. The real
//! implementation is [`ConfluenceClient`]; tests use `MockPageStore`
//! (behind the `mock` feature).

use crate::client::ConfluenceClient;
use crate::error::ConfluenceError;
use crate::types::{Attachment, Page};

/// Remote page operations needed to mirror a folder tree.
///
/// All operations are blocking and fail with [`ConfluenceError`] on any
/// non-success response.
pub trait PageStore {
    /// Find a page by exact title within a space.
    fn find_page_by_title(&self, space_key: &str, title: &str)
    -> Result<Option<Page>, ConfluenceError>;

    /// Create a page, optionally under a parent page.
    fn create_page(
        &self,
        space_key: &str,
        title: &str,
        body: &str,
        parent_id: Option<&str>,
    ) -> Result<Page, ConfluenceError>;

    /// Replace title and body of a page.
    ///
    /// `version` is the current version; the page is written as `version + 1`.
    fn update_page(
        &self,
        page_id: &str,
        title: &str,
        body: &str,
        version: u32,
    ) -> Result<Page, ConfluenceError>;

    /// Delete a page.
    fn delete_page(&self, page_id: &str) -> Result<(), ConfluenceError>;

    /// Add labels to a page. Labels already present are kept.
    fn add_labels(&self, page_id: &str, labels: &[String]) -> Result<(), ConfluenceError>;

    /// Find an attachment on a page by filename.
    fn find_attachment(
        &self,
        page_id: &str,
        filename: &str,
    ) -> Result<Option<Attachment>, ConfluenceError>;

    /// Upload an attachment, replacing the data of one with the same filename.
    fn upload_attachment(
        &self,
        page_id: &str,
        filename: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<Attachment, ConfluenceError>;

    /// Download the data of an attachment.
    fn download_attachment(&self, attachment: &Attachment) -> Result<Vec<u8>, ConfluenceError>;
}

impl PageStore for ConfluenceClient {
    fn find_page_by_title(
        &self,
        space_key: &str,
        title: &str,
    ) -> Result<Option<Page>, ConfluenceError> {
        ConfluenceClient::find_page_by_title(self, space_key, title)
    }

    fn create_page(
        &self,
        space_key: &str,
        title: &str,
        body: &str,
        parent_id: Option<&str>,
    ) -> Result<Page, ConfluenceError> {
        ConfluenceClient::create_page(self, space_key, title, body, parent_id)
    }

    fn update_page(
        &self,
        page_id: &str,
        title: &str,
        body: &str,
        version: u32,
    ) -> Result<Page, ConfluenceError> {
        ConfluenceClient::update_page(self, page_id, title, body, version)
    }

    fn delete_page(&self, page_id: &str) -> Result<(), ConfluenceError> {
        ConfluenceClient::delete_page(self, page_id)
    }

    fn add_labels(&self, page_id: &str, labels: &[String]) -> Result<(), ConfluenceError> {
        ConfluenceClient::add_labels(self, page_id, labels)
    }

    fn find_attachment(
        &self,
        page_id: &str,
        filename: &str,
    ) -> Result<Option<Attachment>, ConfluenceError> {
        ConfluenceClient::find_attachment(self, page_id, filename)
    }

    fn upload_attachment(
        &self,
        page_id: &str,
        filename: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<Attachment, ConfluenceError> {
        ConfluenceClient::upload_attachment(self, page_id, filename, data, content_type)
    }

    fn download_attachment(&self, attachment: &Attachment) -> Result<Vec<u8>, ConfluenceError> {
        ConfluenceClient::download_attachment(self, attachment)
    }
}
