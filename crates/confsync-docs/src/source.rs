//! Document source trait and the values it returns.
//!
//! # Folder Path Convention
//!
//! Folders are identified by their path relative to the documents root,
//! with `/` as separator regardless of platform:
//! - `"guide"` - top-level folder
//! - `"guide/setup"` - nested folder
//!
//! The documents root itself is never a folder.

use std::path::PathBuf;

use crate::error::DocsError;
use crate::frontmatter::Frontmatter;

/// Content of a page folder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderContent {
    /// Metadata from frontmatter, with labels file entries merged in.
    pub frontmatter: Frontmatter,
    /// Body in Confluence storage format.
    pub body: String,
}

/// A file to upload as a page attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentFile {
    /// Attachment name on the page.
    pub filename: String,
    /// Where the data lives.
    pub path: PathBuf,
}

/// Source of page folders.
///
/// Covers folder discovery, content reading, and attachment enumeration.
pub trait DocsSource {
    /// Discover page folders, in no particular order.
    fn find_folders(&self) -> Result<Vec<String>, DocsError>;

    /// Read frontmatter and rendered body of a folder.
    fn read_folder(&self, folder: &str) -> Result<FolderContent, DocsError>;

    /// List attachment files of a folder, sorted by filename.
    fn list_attachments(&self, folder: &str) -> Result<Vec<AttachmentFile>, DocsError>;

    /// Read the data of an attachment file.
    fn read_attachment(&self, file: &AttachmentFile) -> Result<Vec<u8>, DocsError>;
}
