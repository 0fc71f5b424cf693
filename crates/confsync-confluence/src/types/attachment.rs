//! Confluence attachment types.

use serde::{Deserialize, Serialize};

/// Confluence attachment.
///
/// Only includes fields that are actually used.
/// Serde ignores unknown fields from the API response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Attachment {
    /// Attachment ID.
    pub id: String,
    /// Attachment title/filename.
    pub title: String,
    /// Hypermedia links.
    #[serde(rename = "_links", default)]
    pub links: Option<AttachmentLinks>,
}

/// Attachment links.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AttachmentLinks {
    /// Download path relative to the Confluence base URL.
    #[serde(default)]
    pub download: Option<String>,
}

/// Attachments API response.
///
/// Only includes `results` since we only need the attachment list.
/// Serde ignores unknown fields like `size` from the API response.
#[derive(Debug, Clone, Deserialize)]
pub struct AttachmentsResponse {
    /// List of attachments.
    pub results: Vec<Attachment>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_upload_response() {
        let json = r#"{
            "results": [{
                "id": "att123",
                "type": "attachment",
                "title": "diagram.png",
                "_links": {"download": "/download/attachments/42/diagram.png?version=1"}
            }],
            "size": 1
        }"#;
        let response: AttachmentsResponse = serde_json::from_str(json).unwrap();
        let attachment = &response.results[0];
        assert_eq!(attachment.id, "att123");
        assert_eq!(attachment.title, "diagram.png");
        assert_eq!(
            attachment.links.as_ref().and_then(|l| l.download.as_deref()),
            Some("/download/attachments/42/diagram.png?version=1")
        );
    }
}
