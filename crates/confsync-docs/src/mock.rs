//! Mock document source for testing.
//!
//! Provides [`MockDocs`] for engine tests without filesystem access.

use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

use crate::error::DocsError;
use crate::frontmatter::Frontmatter;
use crate::source::{AttachmentFile, DocsSource, FolderContent};

#[derive(Debug, Default)]
struct MockFolder {
    content: FolderContent,
    attachments: BTreeMap<String, Vec<u8>>,
}

/// Mock document source.
///
/// # Example
///
/// ```ignore
/// use confsync_docs::MockDocs;
///
/// let docs = MockDocs::new()
///     .with_folder("guide", "<p>Guide</p>")
///     .with_title("guide", "User Guide")
///     .with_attachment("guide", "flow.png", b"png".to_vec());
/// ```
#[derive(Debug, Default)]
pub struct MockDocs {
    folders: BTreeMap<String, MockFolder>,
    failing_reads: HashSet<String>,
}

impl MockDocs {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a folder with a rendered body.
    #[must_use]
    pub fn with_folder(mut self, path: impl Into<String>, body: impl Into<String>) -> Self {
        let folder = self.folders.entry(path.into()).or_default();
        folder.content.body = body.into();
        self
    }

    /// Set the frontmatter title of a folder, adding the folder if needed.
    #[must_use]
    pub fn with_title(mut self, path: impl Into<String>, title: impl Into<String>) -> Self {
        let folder = self.folders.entry(path.into()).or_default();
        folder.content.frontmatter.title = Some(title.into());
        self
    }

    /// Set the labels of a folder, adding the folder if needed.
    #[must_use]
    pub fn with_labels(mut self, path: impl Into<String>, labels: &[&str]) -> Self {
        let folder = self.folders.entry(path.into()).or_default();
        folder.content.frontmatter = Frontmatter {
            labels: labels.iter().map(|l| (*l).to_owned()).collect(),
            ..folder.content.frontmatter.clone()
        };
        self
    }

    /// Add an attachment to a folder, adding the folder if needed.
    #[must_use]
    pub fn with_attachment(
        mut self,
        path: impl Into<String>,
        filename: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) -> Self {
        let folder = self.folders.entry(path.into()).or_default();
        folder.attachments.insert(filename.into(), data.into());
        self
    }

    /// Make `read_folder` fail for a folder.
    #[must_use]
    pub fn fail_read(mut self, path: impl Into<String>) -> Self {
        self.failing_reads.insert(path.into());
        self
    }

    /// Remove a folder, as if it was deleted locally.
    #[must_use]
    pub fn without_folder(mut self, path: &str) -> Self {
        self.folders.remove(path);
        self
    }

    fn folder(&self, path: &str) -> Result<&MockFolder, DocsError> {
        self.folders
            .get(path)
            .ok_or_else(|| DocsError::UnknownFolder(path.to_owned()))
    }
}

impl DocsSource for MockDocs {
    fn find_folders(&self) -> Result<Vec<String>, DocsError> {
        // Reverse order so callers cannot rely on discovery order
        Ok(self.folders.keys().rev().cloned().collect())
    }

    fn read_folder(&self, folder: &str) -> Result<FolderContent, DocsError> {
        if self.failing_reads.contains(folder) {
            return Err(DocsError::io(
                folder,
                std::io::Error::other("injected read failure"),
            ));
        }
        Ok(self.folder(folder)?.content.clone())
    }

    fn list_attachments(&self, folder: &str) -> Result<Vec<AttachmentFile>, DocsError> {
        Ok(self
            .folder(folder)?
            .attachments
            .keys()
            .map(|filename| AttachmentFile {
                filename: filename.clone(),
                path: PathBuf::from(folder).join(filename),
            })
            .collect())
    }

    fn read_attachment(&self, file: &AttachmentFile) -> Result<Vec<u8>, DocsError> {
        let folder = file
            .path
            .parent()
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .unwrap_or_default();
        self.folder(&folder)?
            .attachments
            .get(&file.filename)
            .cloned()
            .ok_or_else(|| DocsError::io(&file.path, std::io::ErrorKind::NotFound.into()))
    }
}
