//! Label operations for Confluence API.

use serde::Serialize;
use tracing::info;

use super::{ConfluenceClient, check_status};
use crate::error::ConfluenceError;

/// Label in the add-labels request body.
#[derive(Serialize)]
struct NewLabel<'a> {
    prefix: &'static str,
    name: &'a str,
}

impl ConfluenceClient {
    /// Add global labels to a page. Existing labels are kept.
    pub(crate) fn add_labels(&self, page_id: &str, labels: &[String]) -> Result<(), ConfluenceError> {
        if labels.is_empty() {
            return Ok(());
        }

        let url = format!("{}/content/{}/label", self.api_url(), page_id);
        let payload: Vec<NewLabel<'_>> = labels
            .iter()
            .map(|name| NewLabel {
                prefix: "global",
                name,
            })
            .collect();

        info!("Adding {} label(s) to page {}", labels.len(), page_id);

        let payload_bytes = serde_json::to_vec(&payload)?;

        let response = self
            .agent
            .post(&url)
            .header("Authorization", self.auth.header())
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .send(&payload_bytes[..])?;

        check_status(response)?;
        Ok(())
    }
}
