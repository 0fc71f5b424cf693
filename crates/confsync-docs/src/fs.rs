//! Filesystem document source.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::DocsError;
use crate::frontmatter::{parse_frontmatter, parse_labels_file, split_frontmatter};
use crate::markup::render_storage;
use crate::scanner::Scanner;
use crate::source::{AttachmentFile, DocsSource, FolderContent};

/// Document source backed by a directory tree.
///
/// # Folder Layout
///
/// ```text
/// docs/
/// └── guide/
///     ├── README.md        # marker file: frontmatter + markdown body
///     ├── labels.yaml      # optional: `labels: [...]`
///     └── attachments/     # optional: uploaded as page attachments
///         └── flow.png
/// ```
#[derive(Debug, Clone)]
pub struct FsDocs {
    source_dir: PathBuf,
    marker_file: String,
    labels_file: String,
    attachments_dir: String,
}

impl FsDocs {
    /// Create a source rooted at `source_dir` with default file names.
    #[must_use]
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            marker_file: "README.md".to_owned(),
            labels_file: "labels.yaml".to_owned(),
            attachments_dir: "attachments".to_owned(),
        }
    }

    /// Set the file name that marks a page folder.
    #[must_use]
    pub fn with_marker_file(mut self, name: impl Into<String>) -> Self {
        self.marker_file = name.into();
        self
    }

    /// Set the per-folder labels file name.
    #[must_use]
    pub fn with_labels_file(mut self, name: impl Into<String>) -> Self {
        self.labels_file = name.into();
        self
    }

    /// Set the per-folder attachments directory name.
    #[must_use]
    pub fn with_attachments_dir(mut self, name: impl Into<String>) -> Self {
        self.attachments_dir = name.into();
        self
    }

    /// Documents root.
    #[must_use]
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Absolute directory of a folder path.
    fn folder_dir(&self, folder: &str) -> PathBuf {
        folder
            .split('/')
            .filter(|s| !s.is_empty())
            .fold(self.source_dir.clone(), |dir, segment| dir.join(segment))
    }
}

impl DocsSource for FsDocs {
    fn find_folders(&self) -> Result<Vec<String>, DocsError> {
        Scanner::new(self.source_dir.clone(), self.marker_file.clone()).scan()
    }

    fn read_folder(&self, folder: &str) -> Result<FolderContent, DocsError> {
        let dir = self.folder_dir(folder);
        let marker_path = dir.join(&self.marker_file);
        let content =
            fs::read_to_string(&marker_path).map_err(|e| DocsError::io(&marker_path, e))?;

        let (yaml, markdown) = split_frontmatter(&content);
        let mut frontmatter = match yaml {
            Some(yaml) => parse_frontmatter(yaml, &marker_path)?,
            None => Default::default(),
        };

        let labels_path = dir.join(&self.labels_file);
        if labels_path.is_file() {
            let yaml =
                fs::read_to_string(&labels_path).map_err(|e| DocsError::io(&labels_path, e))?;
            frontmatter.merge_labels(parse_labels_file(&yaml, &labels_path)?);
        }

        Ok(FolderContent {
            frontmatter,
            body: render_storage(markdown),
        })
    }

    fn list_attachments(&self, folder: &str) -> Result<Vec<AttachmentFile>, DocsError> {
        let dir = self.folder_dir(folder).join(&self.attachments_dir);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(&dir).map_err(|e| DocsError::io(&dir, e))? {
            let entry = entry.map_err(|e| DocsError::io(&dir, e))?;
            let filename = entry.file_name().to_string_lossy().into_owned();
            if filename.starts_with('.') || !entry.file_type().is_ok_and(|t| t.is_file()) {
                continue;
            }
            files.push(AttachmentFile {
                filename,
                path: entry.path(),
            });
        }
        files.sort_by(|a, b| a.filename.cmp(&b.filename));
        Ok(files)
    }

    fn read_attachment(&self, file: &AttachmentFile) -> Result<Vec<u8>, DocsError> {
        fs::read(&file.path).map_err(|e| DocsError::io(&file.path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_read_folder_with_frontmatter_and_labels_file() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "guide/README.md",
            "---\ntitle: User Guide\nlabels: [guide]\n---\n# Intro\n",
        );
        write(dir.path(), "guide/labels.yaml", "labels:\n  - docs\n  - guide\n");

        let content = FsDocs::new(dir.path()).read_folder("guide").unwrap();

        assert_eq!(content.frontmatter.title.as_deref(), Some("User Guide"));
        assert_eq!(
            content.frontmatter.labels,
            vec!["guide".to_owned(), "docs".to_owned()]
        );
        assert_eq!(content.body, "<h1>Intro</h1>\n");
    }

    #[test]
    fn test_read_folder_without_frontmatter() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a/b/README.md", "Plain text");

        let content = FsDocs::new(dir.path()).read_folder("a/b").unwrap();

        assert_eq!(content.frontmatter.title, None);
        assert!(content.frontmatter.labels.is_empty());
        assert_eq!(content.body, "<p>Plain text</p>\n");
    }

    #[test]
    fn test_read_folder_missing_marker() {
        let dir = tempfile::tempdir().unwrap();
        let err = FsDocs::new(dir.path()).read_folder("nope").unwrap_err();
        assert!(matches!(err, DocsError::Io { .. }));
    }

    #[test]
    fn test_list_attachments_sorted_files_only() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "p/README.md", "");
        write(dir.path(), "p/attachments/b.png", "b");
        write(dir.path(), "p/attachments/a.pdf", "a");
        write(dir.path(), "p/attachments/.DS_Store", "");
        write(dir.path(), "p/attachments/nested/c.txt", "c");

        let docs = FsDocs::new(dir.path());
        let files = docs.list_attachments("p").unwrap();

        let names: Vec<_> = files.iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(names, vec!["a.pdf", "b.png"]);
        assert_eq!(docs.read_attachment(&files[1]).unwrap(), b"b".to_vec());
    }

    #[test]
    fn test_list_attachments_without_directory() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "p/README.md", "");
        assert!(FsDocs::new(dir.path()).list_attachments("p").unwrap().is_empty());
    }

    #[test]
    fn test_custom_file_names() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "p/index.md", "---\nlabels: [x]\n---\nBody");
        write(dir.path(), "p/tags.yaml", "labels: [y]");
        write(dir.path(), "p/files/f.txt", "f");

        let docs = FsDocs::new(dir.path())
            .with_marker_file("index.md")
            .with_labels_file("tags.yaml")
            .with_attachments_dir("files");

        assert_eq!(docs.find_folders().unwrap(), vec!["p".to_owned()]);
        let content = docs.read_folder("p").unwrap();
        assert_eq!(content.frontmatter.labels, vec!["x".to_owned(), "y".to_owned()]);
        assert_eq!(docs.list_attachments("p").unwrap().len(), 1);
    }
}
