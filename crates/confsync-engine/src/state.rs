//! Sync state persisted on a dedicated Confluence page.
//!
//! The state maps folder paths to page IDs. It is stored as a JSON
//! attachment on the state page, wrapped in a versioned envelope:
//!
//! ```json
//! {"format": 1, "pages": {"guide": "123456", "guide/setup": "123457"}}
//! ```
//!
//! Older deployments stored a bare `{path: id}` object, either as the
//! attachment or escaped into the page body. Both are still read; saving
//! always writes the envelope.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use confsync_confluence::{ConfluenceError, Page, PageStore};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::settings::SyncSettings;

/// Current state format version.
pub const STATE_FORMAT: u32 = 1;

/// Body of the state page.
pub const STATE_PAGE_BODY: &str = "<p>This page stores the sync state.</p>";

static PARAGRAPH_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"</?p>").unwrap());

/// Mapping from folder path to page ID.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncState {
    pages: BTreeMap<String, String>,
}

/// Error decoding stored state.
#[derive(Debug, thiserror::Error)]
pub enum StateDecodeError {
    /// Not valid JSON of a known shape.
    #[error("invalid state JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Written by a newer version.
    #[error("unsupported state format {0}")]
    UnsupportedFormat(u32),

    /// Attachment data is not UTF-8.
    #[error("state is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

#[derive(Serialize, Deserialize)]
struct Envelope {
    format: u32,
    pages: BTreeMap<String, String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Stored {
    Versioned(Envelope),
    Legacy(BTreeMap<String, String>),
}

impl SyncState {
    /// Page ID recorded for a folder.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&str> {
        self.pages.get(path).map(String::as_str)
    }

    /// Record the page ID of a folder.
    pub fn insert(&mut self, path: impl Into<String>, page_id: impl Into<String>) {
        self.pages.insert(path.into(), page_id.into());
    }

    /// Whether a folder is recorded.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.pages.contains_key(path)
    }

    /// Whether any folder maps to the page ID.
    #[must_use]
    pub fn contains_page(&self, page_id: &str) -> bool {
        self.pages.values().any(|id| id == page_id)
    }

    /// Entries sorted by folder path.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pages.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of recorded folders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether no folder is recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Encode as a versioned envelope.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Envelope {
            format: STATE_FORMAT,
            pages: self.pages.clone(),
        })
    }

    /// Decode a versioned envelope or a legacy bare mapping.
    pub fn from_json(json: &str) -> Result<Self, StateDecodeError> {
        let pages = match serde_json::from_str::<Stored>(json.trim())? {
            Stored::Versioned(envelope) if envelope.format > STATE_FORMAT => {
                return Err(StateDecodeError::UnsupportedFormat(envelope.format));
            }
            Stored::Versioned(envelope) => envelope.pages,
            Stored::Legacy(pages) => pages,
        };
        Ok(Self { pages })
    }

    /// Decode state escaped into a storage-format page body.
    pub fn from_page_body(body: &str) -> Result<Self, StateDecodeError> {
        let stripped = PARAGRAPH_RE.replace_all(body, "");
        let json = stripped
            .replace("&quot;", "\"")
            .replace("&#34;", "\"")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&amp;", "&");
        Self::from_json(&json)
    }
}

impl FromIterator<(String, String)> for SyncState {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            pages: iter.into_iter().collect(),
        }
    }
}

/// Loads and saves [`SyncState`] through a page store.
pub struct StateStore<'a, S: PageStore + ?Sized> {
    store: &'a S,
    settings: &'a SyncSettings,
}

impl<'a, S: PageStore + ?Sized> StateStore<'a, S> {
    /// Create a state store for the configured state page.
    pub fn new(store: &'a S, settings: &'a SyncSettings) -> Self {
        Self { store, settings }
    }

    /// Load the previous state.
    ///
    /// A missing state page gives an empty state. Stored state that cannot
    /// be decoded is logged and treated as empty; transport errors are
    /// returned.
    pub fn load(&self) -> Result<SyncState, ConfluenceError> {
        let Some(page) = self.find_state_page()? else {
            info!(
                "No state page '{}' found, starting with empty state",
                self.settings.state_page_title
            );
            return Ok(SyncState::default());
        };

        let decoded = match self
            .store
            .find_attachment(&page.id, &self.settings.state_attachment_name)?
        {
            Some(attachment) => {
                let data = self.store.download_attachment(&attachment)?;
                String::from_utf8(data)
                    .map_err(StateDecodeError::from)
                    .and_then(|json| SyncState::from_json(&json))
            }
            None if is_state_body(page.storage_value()) => {
                debug!("State page {} has no state attachment", page.id);
                Ok(SyncState::default())
            }
            None => {
                info!("Reading legacy state from body of page {}", page.id);
                SyncState::from_page_body(page.storage_value())
            }
        };

        match decoded {
            Ok(state) => {
                info!("Loaded state with {} folder(s)", state.len());
                Ok(state)
            }
            Err(err) => {
                warn!("Ignoring unreadable sync state: {}", err);
                Ok(SyncState::default())
            }
        }
    }

    /// Replace the stored state, creating the state page if needed.
    pub fn save(&self, state: &SyncState) -> Result<(), ConfluenceError> {
        let page = match self.find_state_page()? {
            Some(page) if is_state_body(page.storage_value()) => page,
            Some(page) => {
                info!("Replacing legacy state body of page {}", page.id);
                self.store.update_page(
                    &page.id,
                    &page.title,
                    STATE_PAGE_BODY,
                    page.version.number,
                )?
            }
            None => {
                info!("Creating state page '{}'", self.settings.state_page_title);
                self.store.create_page(
                    &self.settings.space_key,
                    &self.settings.state_page_title,
                    STATE_PAGE_BODY,
                    None,
                )?
            }
        };

        let json = state.to_json()?;
        self.store.upload_attachment(
            &page.id,
            &self.settings.state_attachment_name,
            json.as_bytes(),
            "application/json",
        )?;
        info!("Saved state with {} folder(s)", state.len());
        Ok(())
    }

    fn find_state_page(&self) -> Result<Option<Page>, ConfluenceError> {
        self.store
            .find_page_by_title(&self.settings.space_key, &self.settings.state_page_title)
    }
}

fn is_state_body(body: &str) -> bool {
    let body = body.trim();
    body.is_empty() || body == STATE_PAGE_BODY
}

#[cfg(test)]
mod tests {
    use super::*;
    use confsync_confluence::{MockPageStore, StoreCall};
    use pretty_assertions::assert_eq;

    fn state(entries: &[(&str, &str)]) -> SyncState {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn test_decode_envelope() {
        let decoded =
            SyncState::from_json(r#"{"format": 1, "pages": {"a": "1", "a/b": "2"}}"#).unwrap();
        assert_eq!(decoded, state(&[("a", "1"), ("a/b", "2")]));
    }

    #[test]
    fn test_decode_legacy_map() {
        let decoded = SyncState::from_json(r#"{"docs/a": "1"}"#).unwrap();
        assert_eq!(decoded, state(&[("docs/a", "1")]));
    }

    #[test]
    fn test_decode_legacy_map_with_envelope_like_keys() {
        let decoded = SyncState::from_json(r#"{"format": "7", "pages": "8"}"#).unwrap();
        assert_eq!(decoded, state(&[("format", "7"), ("pages", "8")]));
    }

    #[test]
    fn test_decode_newer_format_rejected() {
        let err = SyncState::from_json(r#"{"format": 2, "pages": {}}"#).unwrap_err();
        assert!(matches!(err, StateDecodeError::UnsupportedFormat(2)));
    }

    #[test]
    fn test_decode_page_body() {
        let body = "<p>{&quot;docs/a&quot;: &quot;42&quot;}</p>";
        assert_eq!(
            SyncState::from_page_body(body).unwrap(),
            state(&[("docs/a", "42")])
        );
    }

    #[test]
    fn test_encode_is_versioned() {
        let json = state(&[("a", "1")]).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["format"], 1);
        assert_eq!(value["pages"]["a"], "1");
    }

    #[test]
    fn test_load_without_state_page() {
        let store = MockPageStore::new("DOCS");
        let settings = SyncSettings::new("DOCS");

        let loaded = StateStore::new(&store, &settings).load().unwrap();

        assert!(loaded.is_empty());
        assert!(store.write_calls().is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let store = MockPageStore::new("DOCS");
        let settings = SyncSettings::new("DOCS");
        let states = StateStore::new(&store, &settings);

        states.save(&state(&[("a", "1"), ("a/b", "2")])).unwrap();
        let page = store.page_by_title("Confluence Sync State").unwrap();
        assert_eq!(page.body, STATE_PAGE_BODY);
        assert_eq!(page.parent_id, None);

        states.save(&state(&[("a", "1")])).unwrap();
        assert_eq!(store.page_count(), 1);
        assert_eq!(states.load().unwrap(), state(&[("a", "1")]));
    }

    #[test]
    fn test_load_legacy_attachment() {
        let store = MockPageStore::new("DOCS")
            .with_page("9", "Confluence Sync State", STATE_PAGE_BODY, None)
            .with_attachment("9", "state.json", br#"{"docs/old": "99"}"#.to_vec());
        let settings = SyncSettings::new("DOCS");

        let loaded = StateStore::new(&store, &settings).load().unwrap();

        assert_eq!(loaded, state(&[("docs/old", "99")]));
    }

    #[test]
    fn test_load_legacy_body_and_migrate() {
        let store = MockPageStore::new("DOCS").with_page(
            "9",
            "Confluence Sync State",
            "<p>{&quot;a&quot;: &quot;1&quot;}</p>",
            None,
        );
        let settings = SyncSettings::new("DOCS");
        let states = StateStore::new(&store, &settings);

        let loaded = states.load().unwrap();
        assert_eq!(loaded, state(&[("a", "1")]));

        states.save(&loaded).unwrap();
        assert_eq!(store.page("9").unwrap().body, STATE_PAGE_BODY);
        assert_eq!(states.load().unwrap(), loaded);
    }

    #[test]
    fn test_load_corrupt_state_is_empty() {
        let store = MockPageStore::new("DOCS")
            .with_page("9", "Confluence Sync State", STATE_PAGE_BODY, None)
            .with_attachment("9", "state.json", b"not json".to_vec());
        let settings = SyncSettings::new("DOCS");

        let loaded = StateStore::new(&store, &settings).load().unwrap();

        assert!(loaded.is_empty());
    }

    #[test]
    fn test_custom_state_location() {
        let store = MockPageStore::new("DOCS");
        let settings = SyncSettings::new("DOCS").with_state_page("Sync Ledger", "ledger.json");

        StateStore::new(&store, &settings)
            .save(&state(&[("a", "1")]))
            .unwrap();

        let page = store.page_by_title("Sync Ledger").unwrap();
        assert!(store.attachment_data(&page.id, "ledger.json").is_some());
        assert!(store.calls().contains(&StoreCall::UploadAttachment {
            page_id: page.id.clone(),
            filename: "ledger.json".to_owned(),
        }));
    }
}
