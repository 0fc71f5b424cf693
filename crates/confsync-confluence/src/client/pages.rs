//! Page operations for Confluence API.

use serde_json::json;
use tracing::info;

use super::{ConfluenceClient, check_status, encode_query};
use crate::error::ConfluenceError;
use crate::types::{Page, PagesResponse};

/// Fields expanded on every page lookup.
const PAGE_EXPAND: &str = "body.storage,version";

impl ConfluenceClient {
    /// Find a page by exact title within a space.
    pub(crate) fn find_page_by_title(
        &self,
        space_key: &str,
        title: &str,
    ) -> Result<Option<Page>, ConfluenceError> {
        let url = format!(
            "{}/content?type=page&spaceKey={}&title={}&expand={}",
            self.api_url(),
            encode_query(space_key),
            encode_query(title),
            PAGE_EXPAND
        );

        info!("Looking up page '{}' in space {}", title, space_key);

        let response = self
            .agent
            .get(&url)
            .header("Authorization", self.auth.header())
            .header("Accept", "application/json")
            .call()?;

        let pages: PagesResponse = check_status(response)?.read_json()?;
        Ok(pages.results.into_iter().next())
    }

    /// Create a page, optionally under a parent.
    pub(crate) fn create_page(
        &self,
        space_key: &str,
        title: &str,
        body: &str,
        parent_id: Option<&str>,
    ) -> Result<Page, ConfluenceError> {
        let url = format!("{}/content", self.api_url());

        let mut payload = json!({
            "type": "page",
            "title": title,
            "space": {"key": space_key},
            "body": {
                "storage": {
                    "value": body,
                    "representation": "storage"
                }
            }
        });

        if let Some(parent) = parent_id {
            payload["ancestors"] = json!([{"id": parent}]);
        }

        info!(
            "Creating page '{}' in space {} (parent: {})",
            title,
            space_key,
            parent_id.unwrap_or("none")
        );

        let payload_bytes = serde_json::to_vec(&payload)?;

        let response = self
            .agent
            .post(&url)
            .header("Authorization", self.auth.header())
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .send(&payload_bytes[..])?;

        let page: Page = check_status(response)?.read_json()?;
        info!("Created page '{}' (id={})", page.title, page.id);
        Ok(page)
    }

    /// Update existing page (auto-increments version).
    pub(crate) fn update_page(
        &self,
        page_id: &str,
        title: &str,
        body: &str,
        version: u32,
    ) -> Result<Page, ConfluenceError> {
        let url = format!("{}/content/{}", self.api_url(), page_id);

        let payload = json!({
            "id": page_id,
            "type": "page",
            "title": title,
            "body": {
                "storage": {
                    "value": body,
                    "representation": "storage"
                }
            },
            "version": {"number": version + 1}
        });

        info!(
            "Updating page {} from version {} to {}",
            page_id,
            version,
            version + 1
        );

        let payload_bytes = serde_json::to_vec(&payload)?;

        let response = self
            .agent
            .put(&url)
            .header("Authorization", self.auth.header())
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .send(&payload_bytes[..])?;

        let page: Page = check_status(response)?.read_json()?;
        info!(
            "Updated page {} to version {}",
            page_id, page.version.number
        );
        Ok(page)
    }

    /// Delete a page.
    pub(crate) fn delete_page(&self, page_id: &str) -> Result<(), ConfluenceError> {
        let url = format!("{}/content/{}", self.api_url(), page_id);

        info!("Deleting page {}", page_id);

        let response = self
            .agent
            .delete(&url)
            .header("Authorization", self.auth.header())
            .header("Accept", "application/json")
            .call()?;

        check_status(response)?;
        Ok(())
    }
}
