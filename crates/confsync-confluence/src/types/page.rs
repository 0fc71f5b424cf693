//! Confluence page types.

use serde::{Deserialize, Serialize};

/// Confluence page.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Page {
    /// Page ID.
    pub id: String,
    /// Page title.
    pub title: String,
    /// Version information.
    pub version: Version,
    /// Page body content.
    #[serde(default)]
    pub body: Option<Body>,
}

impl Page {
    /// Storage-format body, or an empty string when it was not expanded.
    #[must_use]
    pub fn storage_value(&self) -> &str {
        self.body
            .as_ref()
            .and_then(|b| b.storage.as_ref())
            .map_or("", |s| s.value.as_str())
    }
}

/// Page version.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Version {
    /// Version number.
    pub number: u32,
}

/// Page body content.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Body {
    /// Storage format content.
    #[serde(default)]
    pub storage: Option<Storage>,
}

/// Storage format representation.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Storage {
    /// HTML content in Confluence storage format.
    pub value: String,
    /// Content representation (always "storage").
    pub representation: String,
}

/// Content search response.
#[derive(Debug, Clone, Deserialize)]
pub struct PagesResponse {
    /// Matching pages.
    pub results: Vec<Page>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_search_result() {
        let json = r#"{
            "results": [{
                "id": "123",
                "type": "page",
                "title": "Getting Started",
                "version": {"number": 7, "when": "2024-01-01T00:00:00.000Z"},
                "body": {"storage": {"value": "<p>Hi</p>", "representation": "storage"}}
            }],
            "size": 1
        }"#;
        let response: PagesResponse = serde_json::from_str(json).unwrap();
        let page = &response.results[0];
        assert_eq!(page.id, "123");
        assert_eq!(page.version.number, 7);
        assert_eq!(page.storage_value(), "<p>Hi</p>");
    }

    #[test]
    fn test_storage_value_without_body() {
        let json = r#"{"id": "5", "title": "T", "version": {"number": 1}}"#;
        let page: Page = serde_json::from_str(json).unwrap();
        assert_eq!(page.storage_value(), "");
    }
}
