//! Settings shared by all components of a sync run.

/// Default title of the page holding the sync state.
pub const DEFAULT_STATE_PAGE_TITLE: &str = "Confluence Sync State";

/// Default name of the state attachment.
pub const DEFAULT_STATE_ATTACHMENT: &str = "state.json";

/// Target space and state location for a sync run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSettings {
    /// Space pages are created in.
    pub space_key: String,
    /// Parent of top-level pages; `None` puts them at the space root.
    pub default_parent_id: Option<String>,
    /// Title of the page holding the sync state.
    pub state_page_title: String,
    /// Name of the state attachment on that page.
    pub state_attachment_name: String,
}

impl SyncSettings {
    /// Settings for a space with default state location and no parent page.
    #[must_use]
    pub fn new(space_key: impl Into<String>) -> Self {
        Self {
            space_key: space_key.into(),
            default_parent_id: None,
            state_page_title: DEFAULT_STATE_PAGE_TITLE.to_owned(),
            state_attachment_name: DEFAULT_STATE_ATTACHMENT.to_owned(),
        }
    }

    /// Create top-level pages under the given page.
    #[must_use]
    pub fn with_default_parent(mut self, page_id: Option<String>) -> Self {
        self.default_parent_id = page_id;
        self
    }

    /// Use a different state page and attachment.
    #[must_use]
    pub fn with_state_page(
        mut self,
        title: impl Into<String>,
        attachment_name: impl Into<String>,
    ) -> Self {
        self.state_page_title = title.into();
        self.state_attachment_name = attachment_name.into();
        self
    }
}
