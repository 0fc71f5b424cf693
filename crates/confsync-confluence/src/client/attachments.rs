//! Attachment operations for Confluence API.

use rand::RngExt;
use tracing::info;

use super::{ConfluenceClient, check_status, encode_query};
use crate::error::ConfluenceError;
use crate::types::{Attachment, AttachmentsResponse};

impl ConfluenceClient {
    /// Find attachment by filename on a page.
    pub(crate) fn find_attachment(
        &self,
        page_id: &str,
        filename: &str,
    ) -> Result<Option<Attachment>, ConfluenceError> {
        let url = format!(
            "{}/content/{}/child/attachment?filename={}",
            self.api_url(),
            page_id,
            encode_query(filename)
        );

        info!("Looking up attachment '{}' on page {}", filename, page_id);

        let response = self
            .agent
            .get(&url)
            .header("Authorization", self.auth.header())
            .header("Accept", "application/json")
            .call()?;

        let attachments: AttachmentsResponse = check_status(response)?.read_json()?;
        Ok(attachments
            .results
            .into_iter()
            .find(|a| a.title == filename))
    }

    /// Upload or update attachment (upsert by filename).
    pub(crate) fn upload_attachment(
        &self,
        page_id: &str,
        filename: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<Attachment, ConfluenceError> {
        let existing = self.find_attachment(page_id, filename)?;

        let url = if let Some(ref att) = existing {
            info!(
                "Updating existing attachment '{}' (id={})",
                filename, att.id
            );
            format!(
                "{}/content/{}/child/attachment/{}/data",
                self.api_url(),
                page_id,
                att.id
            )
        } else {
            info!(
                "Uploading new attachment '{}' to page {}",
                filename, page_id
            );
            format!("{}/content/{}/child/attachment", self.api_url(), page_id)
        };

        let boundary = format!(
            "----ConfsyncFormBoundary{:016x}",
            rand::rng().random::<u64>()
        );
        let body = multipart_body(&boundary, filename, content_type, data);

        let response = self
            .agent
            .post(&url)
            .header("Authorization", self.auth.header())
            .header(
                "Content-Type",
                &format!("multipart/form-data; boundary={boundary}"),
            )
            .header("X-Atlassian-Token", "nocheck")
            .header("Accept", "application/json")
            .send(&body[..])?;

        let mut body_reader = check_status(response)?;

        // Response is a list for new uploads, single object for updates
        if existing.is_some() {
            Ok(body_reader.read_json()?)
        } else {
            let response: AttachmentsResponse = body_reader.read_json()?;
            response.results.into_iter().next().ok_or_else(|| {
                ConfluenceError::UnexpectedResponse("empty attachment response".to_owned())
            })
        }
    }

    /// Download attachment data through its download link.
    pub(crate) fn download_attachment(
        &self,
        attachment: &Attachment,
    ) -> Result<Vec<u8>, ConfluenceError> {
        let download = attachment
            .links
            .as_ref()
            .and_then(|l| l.download.as_deref())
            .ok_or_else(|| {
                ConfluenceError::UnexpectedResponse(format!(
                    "attachment {} has no download link",
                    attachment.id
                ))
            })?;
        let url = format!("{}{}", self.base_url, download);

        info!("Downloading attachment '{}'", attachment.title);

        let response = self
            .agent
            .get(&url)
            .header("Authorization", self.auth.header())
            .call()?;

        Ok(check_status(response)?.read_to_vec()?)
    }
}

/// Build a `multipart/form-data` body with a single `file` part.
fn multipart_body(boundary: &str, filename: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(data.len() + 256);

    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(b"\r\n");

    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(b"Content-Disposition: form-data; name=\"minorEdit\"\r\n\r\n");
    body.extend_from_slice(b"true\r\n");

    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multipart_body_layout() {
        let body = multipart_body("XYZ", "notes.txt", "text/plain", b"hello");
        let text = String::from_utf8(body).unwrap();

        assert!(text.starts_with("--XYZ\r\n"));
        assert!(text.contains("name=\"file\"; filename=\"notes.txt\"\r\n"));
        assert!(text.contains("Content-Type: text/plain\r\n\r\nhello\r\n"));
        assert!(text.contains("name=\"minorEdit\"\r\n\r\ntrue\r\n"));
        assert!(text.ends_with("--XYZ--\r\n"));
    }
}
